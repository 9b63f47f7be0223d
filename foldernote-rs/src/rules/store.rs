//! Ordered rule collections.

use crate::rules::types::Rule;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ordered collection of rules (path and pattern variants mixed),
/// addressed by id, ordered by position.
///
/// Positions are unique at rest; `move_by` may leave a transient duplicate
/// that the following `resync` resolves. Persistence is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleList<F> {
    rules: Vec<Rule<F>>,
}

impl<F> RuleList<F> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// All rules in storage order (not position order).
    pub fn iter(&self) -> impl Iterator<Item = &Rule<F>> {
        self.rules.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Rule<F>> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Rule<F>> {
        self.rules.iter_mut().find(|r| r.id == id)
    }

    /// Appends a rule, assigning it the next free position.
    pub fn add(&mut self, mut rule: Rule<F>) -> Uuid {
        rule.position = self
            .rules
            .iter()
            .map(|r| r.position + 1)
            .max()
            .unwrap_or(0);
        let id = rule.id;
        self.rules.push(rule);
        id
    }

    /// Removes the rule with the given id. Returns whether one was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() != before
    }

    /// Replaces the rule with the given id wholesale (value edits and
    /// position edits alike), keeping the id stable.
    pub fn update(&mut self, id: Uuid, mut rule: Rule<F>) -> bool {
        match self.rules.iter().position(|r| r.id == id) {
            Some(idx) => {
                rule.id = id;
                self.rules[idx] = rule;
                true
            }
            None => false,
        }
    }

    /// Moves a rule up or down by swapping positions with whatever rule
    /// occupies the target position. With no occupant the rule simply takes
    /// the target position.
    pub fn move_by(&mut self, id: Uuid, delta: i64) -> bool {
        let Some(idx) = self.rules.iter().position(|r| r.id == id) else {
            return false;
        };
        let current = self.rules[idx].position as i64;
        let target = current + delta;
        if target < 0 {
            return false;
        }
        let target = target as u32;

        if let Some(other) = self
            .rules
            .iter()
            .position(|r| r.position == target && r.id != id)
        {
            self.rules[other].position = current as u32;
        }
        self.rules[idx].position = target;
        true
    }

    /// Sorts by position and reassigns dense positions `0..n`. Idempotent.
    pub fn resync(&mut self) {
        self.rules.sort_by_key(|r| r.position);
        for (i, rule) in self.rules.iter_mut().enumerate() {
            rule.position = i as u32;
        }
    }
}

impl<'a, F> IntoIterator for &'a RuleList<F> {
    type Item = &'a Rule<F>;
    type IntoIter = std::slice::Iter<'a, Rule<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
