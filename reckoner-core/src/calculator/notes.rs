//! Footnote numbering.
//!
//! Rows get footnote numbers in the order callers ask for their notes. The
//! numbering is ephemeral: the calculator clears it whenever a field-change
//! cascade starts, so numbers are only stable between cascades.

use indexmap::IndexSet;

#[derive(Debug, Default, Clone)]
pub struct NoteIndex {
    rows: IndexSet<String>,
}

impl NoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based number for `row`, assigning the next one if needed.
    pub fn assign(&mut self, row: &str) -> usize {
        match self.rows.get_index_of(row) {
            Some(i) => i + 1,
            None => {
                let (i, _) = self.rows.insert_full(row.to_string());
                i + 1
            }
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(number, row name)` in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.rows.iter().enumerate().map(|(i, name)| (i + 1, name.as_str()))
    }
}
