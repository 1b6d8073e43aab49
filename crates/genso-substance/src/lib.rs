//! Substance data and physical property derivation for genso
//!
//! This crate provides the foundational data types for the composition
//! algebra in `genso-core`:
//! - Substance definitions (Substance, SubstanceKey, AntoineCoefficients)
//! - The shared substance registry (SubstanceCatalog, SubstanceIds)
//! - Phase states (Phase, PhaseSet)
//! - Exact proportion arithmetic (Proportion)
//! - The element-set boundary (ElementSet, ElementClassifier)

mod catalog;
mod elements;
mod phase;
mod proportion;
mod substance;

pub use catalog::{SubstanceCatalog, SubstanceIds};
pub use elements::{BasicElementTable, ElementClassifier, ElementSet};
pub use phase::{Phase, PhaseSet};
pub use proportion::{PROPORTION_SCALE, Proportion, normalize};
pub use substance::{
    AMBIENT_TEMPERATURE, AntoineCoefficients, GAS_CONSTANT, STANDARD_PRESSURE, Substance,
    SubstanceError, SubstanceKey,
};
