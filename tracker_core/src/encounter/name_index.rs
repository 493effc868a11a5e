//! Name-collision indexing

use std::collections::HashMap;

/// Shared display-name count table
///
/// Owned by the encounter; combatants read and write it whenever their
/// template name changes. The count for a name doubles as the next index
/// label handed out for it.
#[derive(Debug, Clone, Default)]
pub struct NameCounts {
    counts: HashMap<String, u32>,
}

impl NameCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many live combatants currently share this name
    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Move one combatant from `old_name` to `name`
    ///
    /// Decrements (or removes) the old entry, increments (or initializes)
    /// the new one, and returns the post-increment count to use as the
    /// index label. Passing an unchanged name leaves the table untouched,
    /// so repeated calls with the same pair never double-count.
    pub(crate) fn assign(&mut self, name: &str, old_name: Option<&str>) -> u32 {
        if let Some(old) = old_name {
            if old == name {
                return self.count(name);
            }
            self.release(old);
        }
        let entry = self.counts.entry(name.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Drop one combatant from a name's count, removing empty entries
    pub(crate) fn release(&mut self, name: &str) {
        if let Some(count) = self.counts.get_mut(name) {
            if *count <= 1 {
                self.counts.remove(name);
            } else {
                *count -= 1;
            }
        }
    }
}
