//! Marks: named offsets that follow the text as it is edited.
//!
//! `m{a-zA-Z}` stores the cursor offset under a name; `` `{name} `` jumps
//! back to it. Every buffer mutation is reported through [`MarkTable::shift`]
//! so stored offsets keep pointing at the same text:
//!
//! - marks before the edit don't move;
//! - marks inside the removed span are dropped;
//! - marks after the removed span move by `inserted - removed`.
//!
//! A pure insertion at a mark's offset pushes the mark forward, so the
//! mark stays on the char it was set on.

use std::collections::BTreeMap;

/// True for the names `m` accepts.
#[inline]
#[must_use]
pub const fn is_valid_name(name: char) -> bool {
    name.is_ascii_alphabetic()
}

/// Name → offset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkTable {
    marks: BTreeMap<char, usize>,
}

impl MarkTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            marks: BTreeMap::new(),
        }
    }

    /// Set (or move) mark `name`. Invalid names are ignored.
    pub fn set(&mut self, name: char, offset: usize) {
        if is_valid_name(name) {
            self.marks.insert(name, offset);
        }
    }

    /// Offset of mark `name`, if set.
    #[must_use]
    pub fn get(&self, name: char) -> Option<usize> {
        self.marks.get(&name).copied()
    }

    /// Number of marks set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// True if no marks are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// All marks in name order.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.marks.iter().map(|(&name, &offset)| (name, offset))
    }

    /// Translate marks for an edit that replaced `removed` chars at `start`
    /// with `inserted` chars.
    pub fn shift(&mut self, start: usize, removed: usize, inserted: usize) {
        let removed_end = start + removed;
        self.marks.retain(|_, offset| !(*offset >= start && *offset < removed_end));
        for offset in self.marks.values_mut() {
            if *offset >= removed_end {
                *offset = *offset - removed + inserted;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(marks: &[(char, usize)]) -> MarkTable {
        let mut t = MarkTable::new();
        for &(name, offset) in marks {
            t.set(name, offset);
        }
        t
    }

    #[test]
    fn set_and_get() {
        let t = table(&[('a', 3), ('Z', 7)]);
        assert_eq!(t.get('a'), Some(3));
        assert_eq!(t.get('Z'), Some(7));
        assert_eq!(t.get('b'), None);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn invalid_names_ignored() {
        let t = table(&[('1', 3), ('!', 4)]);
        assert!(t.is_empty());
    }

    #[test]
    fn insert_before_mark_shifts_it() {
        let mut t = table(&[('a', 5)]);
        t.shift(2, 0, 3);
        assert_eq!(t.get('a'), Some(8));
    }

    #[test]
    fn insert_at_mark_shifts_it() {
        let mut t = table(&[('a', 5)]);
        t.shift(5, 0, 2);
        assert_eq!(t.get('a'), Some(7));
    }

    #[test]
    fn insert_after_mark_leaves_it() {
        let mut t = table(&[('a', 5)]);
        t.shift(6, 0, 2);
        assert_eq!(t.get('a'), Some(5));
    }

    #[test]
    fn delete_containing_mark_drops_it() {
        let mut t = table(&[('a', 5), ('b', 9)]);
        t.shift(4, 3, 0);
        assert_eq!(t.get('a'), None);
        assert_eq!(t.get('b'), Some(6));
    }

    #[test]
    fn delete_ending_at_mark_keeps_it() {
        let mut t = table(&[('a', 5)]);
        t.shift(2, 3, 0);
        assert_eq!(t.get('a'), Some(2));
    }

    #[test]
    fn replace_shifts_by_difference() {
        let mut t = table(&[('a', 10)]);
        t.shift(0, 4, 1);
        assert_eq!(t.get('a'), Some(7));
    }

    #[test]
    fn iter_in_name_order() {
        let t = table(&[('c', 1), ('a', 2)]);
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![('a', 2), ('c', 1)]);
    }
}
