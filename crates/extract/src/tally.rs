use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntry {
    pub name: String,
    pub count: usize,
    pub context: Vec<String>,
}

/// Name -> count table that remembers first-seen order.
///
/// Each heuristic pass builds its own tally; passes are combined with
/// [`Tally::absorb`] and [`Tally::admit_new`] rather than sharing one table.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<TallyEntry>,
    name_to_idx: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one hit for `name`, returning its entry so the caller can attach context
    pub fn hit(&mut self, name: &str) -> &mut TallyEntry {
        let idx = self.entry_idx(name);
        let entry = &mut self.entries[idx];
        entry.count += 1;
        entry
    }

    fn entry_idx(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.name_to_idx.get(name) {
            return idx;
        }

        let idx = self.entries.len();
        self.entries.push(TallyEntry {
            name: name.to_string(),
            count: 0,
            context: Vec::new(),
        });
        self.name_to_idx.insert(name.to_string(), idx);
        idx
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_idx.contains_key(name)
    }

    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&TallyEntry> {
        self.name_to_idx.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add every entry of `other` into this table: counts are summed, contexts
    /// appended up to `max_context`, unseen names keep `other`'s order at the end.
    pub fn absorb(&mut self, other: Tally, max_context: usize) {
        for entry in other.entries {
            let idx = self.entry_idx(&entry.name);
            let target = &mut self.entries[idx];
            target.count += entry.count;
            for sentence in entry.context {
                if target.context.len() >= max_context {
                    break;
                }
                target.context.push(sentence);
            }
        }
    }

    /// Admit names from `other` that are not yet present and reached `min_count`.
    /// Names already in this table are left untouched.
    pub fn admit_new(&mut self, other: Tally, min_count: usize) {
        for entry in other.entries {
            if entry.count >= min_count && !self.contains(&entry.name) {
                self.name_to_idx
                    .insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Entries sorted by descending count; ties keep first-seen order
    pub fn into_ranked(self) -> Vec<TallyEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }
}
