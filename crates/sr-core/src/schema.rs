//! The required table set and schema presence state.

use serde::Serialize;
use std::fmt;

/// One of the seven tables the inventory store must contain.
///
/// Variants are listed parents first, so iterating [`RequiredTable::ALL`]
/// gives a valid creation order and its reverse a valid deletion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequiredTable {
    Items,
    Events,
    Credentials,
    Units,
    BarCodes,
    EventItems,
    OcrItems,
}

impl RequiredTable {
    /// Every required table, in dependency order.
    pub const ALL: [RequiredTable; 7] = [
        RequiredTable::Items,
        RequiredTable::Events,
        RequiredTable::Credentials,
        RequiredTable::Units,
        RequiredTable::BarCodes,
        RequiredTable::EventItems,
        RequiredTable::OcrItems,
    ];

    /// Table name as it appears in the catalog.
    pub fn name(self) -> &'static str {
        match self {
            RequiredTable::Items => "Items",
            RequiredTable::Events => "Events",
            RequiredTable::Credentials => "Credentials",
            RequiredTable::Units => "Units",
            RequiredTable::BarCodes => "BarCodes",
            RequiredTable::EventItems => "EventItems",
            RequiredTable::OcrItems => "OCRItems",
        }
    }

    /// Look up a required table by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for RequiredTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether all required tables exist.
///
/// A partially created schema counts as `Missing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaState {
    Missing,
    Present,
}

impl SchemaState {
    pub fn is_present(self) -> bool {
        self == SchemaState::Present
    }
}

impl fmt::Display for SchemaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaState::Missing => write!(f, "missing"),
            SchemaState::Present => write!(f, "present"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_unique() {
        let mut names: Vec<&str> = RequiredTable::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(
            RequiredTable::from_name("ocritems"),
            Some(RequiredTable::OcrItems)
        );
        assert_eq!(
            RequiredTable::from_name("BARCODES"),
            Some(RequiredTable::BarCodes)
        );
        assert_eq!(RequiredTable::from_name("__MigrationsHistory"), None);
    }

    #[test]
    fn test_parents_precede_children() {
        let pos = |t: RequiredTable| RequiredTable::ALL.iter().position(|x| *x == t).unwrap();
        assert!(pos(RequiredTable::Items) < pos(RequiredTable::Units));
        assert!(pos(RequiredTable::Units) < pos(RequiredTable::BarCodes));
        assert!(pos(RequiredTable::Events) < pos(RequiredTable::EventItems));
        assert!(pos(RequiredTable::Units) < pos(RequiredTable::EventItems));
        assert!(pos(RequiredTable::Units) < pos(RequiredTable::OcrItems));
    }
}
