/// Hidden track set
use serde::{Deserialize, Serialize};

/// Track names excluded from the default list view
///
/// Stored as a plain JSON array of names in insertion order, without
/// duplicates. Duplicates in a stored array are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct HiddenSet {
    names: Vec<String>,
}

impl HiddenSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is hidden
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Hide `name`; returns `false` if it already was
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Unhide `name`; returns `false` if it was not hidden
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    /// Number of hidden names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is hidden
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Hidden names in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for HiddenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl From<Vec<String>> for HiddenSet {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<HiddenSet> for Vec<String> {
    fn from(set: HiddenSet) -> Self {
        set.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_are_idempotent() {
        let mut set = HiddenSet::new();
        assert!(set.insert("song"));
        assert!(!set.insert("song"));
        assert_eq!(set.len(), 1);

        assert!(set.remove("song"));
        assert!(!set.remove("song"));
        assert!(set.is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let set: HiddenSet = ["b", "a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["b","a"]"#);

        let parsed: HiddenSet = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert!(parsed.contains("x"));
        assert!(parsed.contains("y"));
    }

    #[test]
    fn stored_duplicates_are_dropped_on_load() {
        let mut parsed: HiddenSet = serde_json::from_str(r#"["x","y","x"]"#).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.iter().collect::<Vec<_>>(), vec!["x", "y"]);

        assert!(parsed.remove("x"));
        assert!(!parsed.contains("x"));
    }
}
