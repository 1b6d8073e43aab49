//! Phase states and phase sets

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical phase of a substance at some temperature and pressure.
///
/// `Plasma` and `Glass` cannot be derived from the solid/liquid/gas model;
/// a substance only ever reports them through its fixed-phase override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Solid,
    Liquid,
    Gas,
    Plasma,
    Glass,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Solid => "solid",
            Phase::Liquid => "liquid",
            Phase::Gas => "gas",
            Phase::Plasma => "plasma",
            Phase::Glass => "glass",
        };
        write!(f, "{name}")
    }
}

bitflags! {
    /// A set of phases.
    ///
    /// Phase separation takes one `PhaseSet` per requested bucket, so a
    /// single bucket can collect several phases and overlapping requests
    /// count a constituent in every bucket it matches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PhaseSet: u8 {
        const SOLID = 1 << 0;
        const LIQUID = 1 << 1;
        const GAS = 1 << 2;
        const PLASMA = 1 << 3;
        const GLASS = 1 << 4;
    }
}

impl PhaseSet {
    /// Does this set cover the given phase?
    pub fn matches(self, phase: Phase) -> bool {
        self.contains(PhaseSet::from(phase))
    }
}

impl From<Phase> for PhaseSet {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Solid => PhaseSet::SOLID,
            Phase::Liquid => PhaseSet::LIQUID,
            Phase::Gas => PhaseSet::GAS,
            Phase::Plasma => PhaseSet::PLASMA,
            Phase::Glass => PhaseSet::GLASS,
        }
    }
}
