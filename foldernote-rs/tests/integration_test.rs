//! End-to-end tests driving the manager the way a host application would.

use foldernote::{
    FlagBundle, FsVault, JsonSettingsStore, Manager, MemorySettingsStore, MemoryVault, NodeKind,
    RenameOutcome, Rule, Settings, SettingsStore, StorageLocation, Vault, WhitelistBundle,
};
use pretty_assertions::assert_eq;

fn manager_with(settings: Settings) -> Manager<MemoryVault, MemorySettingsStore> {
    let store = MemorySettingsStore {
        saved: Some(settings),
        save_count: 0,
    };
    Manager::open(MemoryVault::new(), store).unwrap()
}

fn index_settings(storage: StorageLocation) -> Settings {
    Settings {
        folder_note_name_template: "{{folder_name}} Index".to_string(),
        storage_location: storage,
        ..Default::default()
    }
}

mod resolution {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn note_path_inside_folder() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut().create_folder("Projects/Alpha").unwrap();

        let note = m.create_folder_note("Projects/Alpha").unwrap();
        assert_eq!(note, "Projects/Alpha/Alpha Index.md");
        assert_eq!(m.resolve_note("Projects/Alpha"), Some(note.clone()));
        assert_eq!(m.resolve_folder(&note), Some("Projects/Alpha".to_string()));
    }

    #[test]
    fn note_path_parent_folder() {
        let mut m = manager_with(index_settings(StorageLocation::ParentFolder));
        m.vault_mut().create_folder("Projects/Alpha").unwrap();

        let note = m.create_folder_note("Projects/Alpha").unwrap();
        assert_eq!(note, "Projects/Alpha Index.md");
        assert_eq!(m.resolve_note("Projects/Alpha"), Some(note));
    }

    #[test]
    fn storage_switch_rebinds_the_same_folder() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "")
            .unwrap();
        m.vault_mut().create_file("Projects/Alpha Index.md", "").unwrap();

        assert_eq!(
            m.resolve_note("Projects/Alpha"),
            Some("Projects/Alpha/Alpha Index.md".to_string())
        );

        m.settings_mut().storage_location = StorageLocation::ParentFolder;
        assert_eq!(
            m.resolve_note("Projects/Alpha"),
            Some("Projects/Alpha Index.md".to_string())
        );
    }
}

mod rename_propagation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn folder_rename_renames_note_inside_folder() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "body")
            .unwrap();

        m.vault_mut().rename("Projects/Alpha", "Projects/Beta").unwrap();
        let outcome = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();

        assert_eq!(
            outcome,
            RenameOutcome::NoteRenamed {
                from: "Projects/Beta/Alpha Index.md".to_string(),
                to: "Projects/Beta/Beta Index.md".to_string(),
            }
        );
        assert_eq!(
            m.vault().read_file("Projects/Beta/Beta Index.md").unwrap(),
            "body"
        );
    }

    #[test]
    fn folder_rename_renames_note_parent_folder() {
        let mut m = manager_with(index_settings(StorageLocation::ParentFolder));
        m.vault_mut().create_folder("Projects/Alpha").unwrap();
        m.vault_mut().create_file("Projects/Alpha Index.md", "").unwrap();

        m.vault_mut().rename("Projects/Alpha", "Projects/Beta").unwrap();
        let outcome = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();

        assert_eq!(
            outcome,
            RenameOutcome::NoteRenamed {
                from: "Projects/Alpha Index.md".to_string(),
                to: "Projects/Beta Index.md".to_string(),
            }
        );
    }

    #[test]
    fn note_rename_renames_folder_and_reentrant_event_settles() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "")
            .unwrap();

        m.vault_mut()
            .rename("Projects/Alpha/Alpha Index.md", "Projects/Alpha/Beta Index.md")
            .unwrap();
        let outcome = m
            .on_rename("Projects/Alpha/Alpha Index.md", "Projects/Alpha/Beta Index.md")
            .unwrap();
        assert_eq!(
            outcome,
            RenameOutcome::FolderRenamed {
                from: "Projects/Alpha".to_string(),
                to: "Projects/Beta".to_string(),
            }
        );

        // The host now delivers the folder-rename event the propagation
        // itself caused; it must not cascade further.
        let echo = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();
        assert_eq!(echo, RenameOutcome::Ignored);
        assert!(m.vault().is_file("Projects/Beta/Beta Index.md"));
        assert!(m.settings().excluded_folders.is_empty());
    }

    #[test]
    fn sync_disabled_by_exclusion_rule_stops_propagation() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        let mut rule: Rule<FlagBundle> = Rule::for_pattern("Beta*");
        rule.flags.disable_sync = Some(true);
        m.add_exclusion(rule).unwrap();
        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "")
            .unwrap();

        m.vault_mut().rename("Projects/Alpha", "Projects/Beta").unwrap();
        let outcome = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();

        assert_eq!(outcome, RenameOutcome::Ignored);
        assert!(m.vault().is_file("Projects/Beta/Alpha Index.md"));
    }

    #[test]
    fn whitelist_reenables_sync_under_broad_exclusion() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        let mut rule: Rule<FlagBundle> = Rule::for_pattern("*");
        rule.flags.disable_sync = Some(true);
        m.add_exclusion(rule).unwrap();
        let mut wl: Rule<WhitelistBundle> = Rule::for_path("Projects/Beta");
        wl.flags.enable_sync = Some(true);
        m.add_whitelist(wl).unwrap();

        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "")
            .unwrap();
        m.vault_mut().rename("Projects/Alpha", "Projects/Beta").unwrap();
        let outcome = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();

        assert_eq!(
            outcome,
            RenameOutcome::NoteRenamed {
                from: "Projects/Beta/Alpha Index.md".to_string(),
                to: "Projects/Beta/Beta Index.md".to_string(),
            }
        );
    }

    #[test]
    fn collision_reverts_and_reports() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "note")
            .unwrap();
        m.vault_mut()
            .create_file("Projects/Alpha/Beta Index.md", "occupied")
            .unwrap();

        m.vault_mut().rename("Projects/Alpha", "Projects/Beta").unwrap();
        let outcome = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();

        assert!(matches!(outcome, RenameOutcome::Reverted { .. }));
        assert!(m.vault().is_folder("Projects/Alpha"));
        assert_eq!(
            m.vault().read_file("Projects/Alpha/Beta Index.md").unwrap(),
            "occupied"
        );
    }
}

mod lifecycle {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_lifecycle_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path()).unwrap();
        let store = JsonSettingsStore::new(dir.path().join(".foldernote.json"));
        let mut m = Manager::open(vault, store).unwrap();
        m.settings_mut().auto_create_folder_note = true;

        m.vault_mut().create_folder("Projects/Alpha").unwrap();
        let note = m.on_create("Projects/Alpha").unwrap().unwrap();
        assert_eq!(note, "Projects/Alpha/Alpha.md");

        m.vault_mut().rename("Projects/Alpha", "Projects/Beta").unwrap();
        let outcome = m.on_rename("Projects/Alpha", "Projects/Beta").unwrap();
        assert_eq!(
            outcome,
            RenameOutcome::NoteRenamed {
                from: "Projects/Beta/Alpha.md".to_string(),
                to: "Projects/Beta/Beta.md".to_string(),
            }
        );

        assert_eq!(
            m.scan(),
            vec![foldernote::FolderNotePairing {
                folder: "Projects/Beta".to_string(),
                note: "Projects/Beta/Beta.md".to_string(),
            }]
        );
    }

    #[test]
    fn settings_survive_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        {
            let vault = FsVault::open(dir.path()).unwrap();
            let mut m = Manager::open(vault, JsonSettingsStore::new(path.clone())).unwrap();
            let mut rule: Rule<FlagBundle> = Rule::for_pattern("*Draft*");
            rule.flags.disable_folder_note = Some(true);
            m.add_exclusion(rule).unwrap();
        }

        let reloaded = JsonSettingsStore::new(path).load().unwrap();
        assert_eq!(reloaded.excluded_folders.len(), 1);
        let rule = reloaded.excluded_folders.iter().next().unwrap();
        assert_eq!(rule.flags.disable_folder_note, Some(true));
    }

    #[test]
    fn delete_event_cleans_up_parent_stored_note() {
        let mut settings = index_settings(StorageLocation::ParentFolder);
        settings.sync_on_delete = true;
        let mut m = manager_with(settings);
        m.vault_mut().create_folder("Projects/Alpha").unwrap();
        m.vault_mut().create_file("Projects/Alpha Index.md", "").unwrap();

        m.vault_mut().delete("Projects/Alpha").unwrap();
        let deleted = m.on_delete("Projects/Alpha", NodeKind::Folder).unwrap();

        assert_eq!(deleted, Some("Projects/Alpha Index.md".to_string()));
        assert!(!m.vault().exists("Projects/Alpha Index.md"));
    }
}

mod decoration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn whitelist_forces_note_visible_in_explorer() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut()
            .create_file("Projects/Alpha/Alpha Index.md", "")
            .unwrap();

        m.add_exclusion(Rule::for_path("Projects/Alpha")).unwrap();
        let mut wl: Rule<WhitelistBundle> = Rule::for_path("Projects/Alpha");
        wl.flags.hide_in_explorer = Some(false);
        m.add_whitelist(wl).unwrap();

        let deco = m.decoration("Projects/Alpha");
        assert!(deco.show_note_in_explorer);
        assert_eq!(
            deco.folder_note,
            Some("Projects/Alpha/Alpha Index.md".to_string())
        );
    }

    #[test]
    fn excluded_subtree_loses_decoration() {
        let mut m = manager_with(index_settings(StorageLocation::InsideFolder));
        m.vault_mut()
            .create_file("Archive/Old/Old Index.md", "")
            .unwrap();

        let mut rule: Rule<FlagBundle> = Rule::for_path("Archive");
        rule.flags.disable_folder_note = Some(true);
        if let foldernote::RuleKind::Path {
            include_subfolders, ..
        } = &mut rule.kind
        {
            *include_subfolders = true;
        }
        m.add_exclusion(rule).unwrap();

        assert_eq!(m.decoration("Archive/Old").folder_note, None);
        assert_eq!(m.scan(), vec![]);
    }
}
