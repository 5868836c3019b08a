//! A single per-kind interning table.
//!
//! Dedup is structural: `register` linearly scans for an attribute match
//! before appending, so two calls with equal attributes return the same
//! index regardless of whether a name was supplied either time.

use std::collections::HashMap;

pub struct Table<V> {
    entries: Vec<V>,
    by_name: HashMap<String, usize>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<V: PartialEq> Table<V> {
    pub fn register(&mut self, name: Option<&str>, attrs: V) -> usize {
        let index = match self.entries.iter().position(|existing| existing == &attrs) {
            Some(index) => index,
            None => {
                self.entries.push(attrs);
                self.entries.len() - 1
            }
        };
        if let Some(name) = name {
            self.by_name.entry(name.to_string()).or_insert(index);
        }
        index
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, index: usize) -> &V {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn each(&self, mut visitor: impl FnMut(usize, &V)) {
        for (index, entry) in self.entries.iter().enumerate() {
            visitor(index, entry);
        }
    }
}
