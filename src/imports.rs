//! Import alias table.
//!
//! Every external package referenced by generated code is imported under
//! a synthetic alias `aliasN`, numbered in first-use order. One table is
//! owned by one generation run and handed by reference to every builder
//! that needs to reference a package.

use std::collections::HashMap;

/// Import path of the standard context package.
pub const CONTEXT_PATH: &str = "context";

#[derive(Debug, Default, Clone)]
pub struct ImportTable {
    /// (path, alias) in allocation order.
    entries: Vec<(String, String)>,
    by_path: HashMap<String, usize>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the alias for `path`, allocating the next one on first use.
    pub fn add(&mut self, path: &str) -> String {
        if let Some(&idx) = self.by_path.get(path) {
            return self.entries[idx].1.clone();
        }
        let alias = format!("alias{}", self.entries.len() + 1);
        self.by_path.insert(path.to_string(), self.entries.len());
        self.entries.push((path.to_string(), alias.clone()));
        tracing::debug!(path, alias = %alias, "registered import");
        alias
    }

    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.by_path
            .get(path)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn path_of(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, a)| a == alias)
            .map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(alias, path)` pairs sorted by path, the order an import block is
    /// written in.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(p, a)| (a.as_str(), p.as_str()))
            .collect();
        out.sort_by(|a, b| a.1.cmp(b.1));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_follow_first_use() {
        let mut table = ImportTable::new();
        assert_eq!(table.add("github.com/acme/svc"), "alias1");
        assert_eq!(table.add("time"), "alias2");
        assert_eq!(table.add("github.com/acme/svc"), "alias1");
        assert_eq!(table.add(CONTEXT_PATH), "alias3");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_lookup_both_ways() {
        let mut table = ImportTable::new();
        table.add("time");
        table.add(CONTEXT_PATH);
        assert_eq!(table.alias_of(CONTEXT_PATH), Some("alias2"));
        assert_eq!(table.path_of("alias1"), Some("time"));
        assert_eq!(table.alias_of("io"), None);
    }

    #[test]
    fn test_sorted_by_path() {
        let mut table = ImportTable::new();
        table.add("time");
        table.add("github.com/acme/svc");
        table.add(CONTEXT_PATH);
        assert_eq!(
            table.sorted(),
            vec![
                ("alias3", "context"),
                ("alias2", "github.com/acme/svc"),
                ("alias1", "time"),
            ]
        );
    }

    #[test]
    fn test_fresh_table_restarts_numbering() {
        let mut first = ImportTable::new();
        first.add("a");
        first.add("b");
        let mut second = ImportTable::new();
        assert_eq!(second.add("b"), "alias1");
    }
}
