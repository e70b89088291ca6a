//! Ordered check registry

use super::check::Check;

/// A fixed, ordered list of checks for one exercise
///
/// Ordinals are assigned from registration order and never change.
#[derive(Debug, Clone)]
pub struct Registry {
    checks: Vec<Check>,
}

impl Registry {
    pub fn new(checks: Vec<Check>) -> Self {
        let checks = checks
            .into_iter()
            .enumerate()
            .map(|(i, mut check)| {
                check.ordinal = i + 1;
                check
            })
            .collect();
        Self { checks }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }

    /// Check by 1-based ordinal
    pub fn get(&self, ordinal: usize) -> Option<&Check> {
        ordinal.checked_sub(1).and_then(|i| self.checks.get(i))
    }
}
