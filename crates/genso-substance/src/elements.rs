//! Element-set boundary
//!
//! Chemical formula parsing and full periodic-table data live outside this
//! crate. A substance carries only the set of element symbols its formula
//! contains, and classifiers ask a narrow [`ElementClassifier`] capability
//! about metal grouping. [`BasicElementTable`] covers the elements the
//! built-in catalog uses; callers with a real periodic-table source can
//! plug in their own implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of element symbols appearing in a substance's formula.
///
/// Symbols are kept sorted and deduplicated; only the *set* of elements
/// matters for classification, not their counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSet(BTreeSet<String>);

impl ElementSet {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    /// True if the set contains exactly the given symbols, no more, no less.
    pub fn is_exactly(&self, symbols: &[&str]) -> bool {
        self.0.len() == symbols.len() && symbols.iter().all(|s| self.0.contains(*s))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Periodic-table capability needed by the ore classifier.
///
/// Implemented over element *symbols* so the substance model never owns
/// periodic-table data itself.
pub trait ElementClassifier {
    fn is_metal(&self, symbol: &str) -> bool;
    fn is_alkali_metal(&self, symbol: &str) -> bool;
    fn is_alkaline_earth_metal(&self, symbol: &str) -> bool;
}

/// Built-in classification table for the common elements.
///
/// Covers everything the default substance catalog references. Not a full
/// periodic table; unknown symbols classify as non-metal.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicElementTable;

impl ElementClassifier for BasicElementTable {
    fn is_metal(&self, symbol: &str) -> bool {
        matches!(
            symbol,
            "Li" | "Be"
                | "Na" | "Mg" | "Al"
                | "K" | "Ca" | "Sc" | "Ti" | "V" | "Cr" | "Mn" | "Fe" | "Co" | "Ni" | "Cu"
                | "Zn" | "Ga"
                | "Rb" | "Sr" | "Y" | "Zr" | "Nb" | "Mo" | "Tc" | "Ru" | "Rh" | "Pd" | "Ag"
                | "Cd" | "In" | "Sn"
                | "Cs" | "Ba" | "La" | "Ce" | "Nd" | "Hf" | "Ta" | "W" | "Re" | "Os" | "Ir"
                | "Pt" | "Au" | "Hg" | "Tl" | "Pb" | "Bi"
                | "Fr" | "Ra" | "Th" | "U" | "Pu"
        )
    }

    fn is_alkali_metal(&self, symbol: &str) -> bool {
        matches!(symbol, "Li" | "Na" | "K" | "Rb" | "Cs" | "Fr")
    }

    fn is_alkaline_earth_metal(&self, symbol: &str) -> bool {
        matches!(symbol, "Be" | "Mg" | "Ca" | "Sr" | "Ba" | "Ra")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exactly() {
        let water = ElementSet::new(["H", "O"]);
        assert!(water.is_exactly(&["H", "O"]));
        assert!(water.is_exactly(&["O", "H"]));
        assert!(!water.is_exactly(&["H"]));
        assert!(!water.is_exactly(&["H", "O", "C"]));
    }

    #[test]
    fn test_deduplicates() {
        let set = ElementSet::new(["C", "H", "H", "C"]);
        assert_eq!(set.len(), 2);
        assert!(set.is_exactly(&["C", "H"]));
    }

    #[test]
    fn test_basic_table_groups() {
        let table = BasicElementTable;
        assert!(table.is_metal("Fe"));
        assert!(table.is_metal("Na"));
        assert!(table.is_alkali_metal("Na"));
        assert!(!table.is_alkali_metal("Fe"));
        assert!(table.is_alkaline_earth_metal("Ca"));
        // Metalloids and nonmetals are not metals here
        assert!(!table.is_metal("Si"));
        assert!(!table.is_metal("O"));
        assert!(!table.is_metal("??"));
    }
}
