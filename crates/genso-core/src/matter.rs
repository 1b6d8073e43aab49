//! Bulk composition: a substance or a blend
//!
//! [`Matter`] is the closed sum type a bulk material's composition takes:
//! either a single catalog substance or a flat weighted mixture. Edits are
//! functional; every operation returns a new value and keeps the result
//! canonical (an empty blend collapses to the none sentinel, a one-entry
//! blend collapses back to its leaf).

use crate::mixture::{Mixture, PhaseBucket};
use genso_substance::{Phase, PhaseSet, Proportion, Substance, SubstanceCatalog, SubstanceKey};
use serde::{Deserialize, Serialize};

/// The composition of a bulk material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Matter {
    /// A single catalog substance.
    Substance(SubstanceKey),
    /// A flat weighted blend of substances.
    Mixture(Mixture),
}

impl Matter {
    /// The empty composition: a reference to the none sentinel substance.
    pub fn none() -> Self {
        Matter::Substance(SubstanceKey::from(Substance::NONE_KEY))
    }

    pub fn is_none(&self) -> bool {
        match self {
            Matter::Substance(key) => key.as_str() == Substance::NONE_KEY,
            Matter::Mixture(mixture) => mixture.is_empty(),
        }
    }

    /// Canonical form of a flat mapping: empty collapses to the none
    /// sentinel, a single full-proportion entry collapses to its leaf.
    pub fn from_mixture(mixture: Mixture) -> Self {
        match mixture.entries() {
            [] => Matter::none(),
            [only] if only.proportion.is_one() => Matter::Substance(only.substance.clone()),
            _ => Matter::Mixture(mixture),
        }
    }

    /// The constituents mapping. A leaf substance always maps to exactly
    /// itself at proportion one.
    pub fn constituents(&self) -> Mixture {
        match self {
            Matter::Substance(key) => Mixture::of(key.clone()),
            Matter::Mixture(mixture) => mixture.clone(),
        }
    }

    /// Flatten to leaf-level proportions. Bulk compositions are already
    /// flat, so this is the identity mapping; it exists so matter and
    /// layered materials homogenize through one name.
    pub fn homogenize(&self) -> Mixture {
        self.constituents()
    }

    /// Blend `other` into this composition.
    ///
    /// A proportion at or above one returns `other` outright, at or below
    /// zero returns `self` unchanged. Otherwise both sides' constituents
    /// are folded flat: existing entries scale by `1 - proportion`,
    /// incoming by `proportion`, duplicates summed.
    pub fn combine(self, other: Matter, proportion: Proportion) -> Matter {
        if proportion.is_one() {
            return other;
        }
        if proportion.is_zero() {
            return self;
        }
        Matter::from_mixture(self.constituents().blended(&other.constituents(), proportion))
    }

    /// Blend a single substance in at the given proportion. Shorthand for
    /// [`Matter::combine`] with a leaf.
    pub fn add_constituent(
        self,
        substance: impl Into<SubstanceKey>,
        proportion: Proportion,
    ) -> Matter {
        self.combine(Matter::Substance(substance.into()), proportion)
    }

    /// Remove a constituent.
    ///
    /// For a leaf: the none sentinel when the key matches, `self` otherwise.
    /// For a blend: matching entries are dropped and the rest renormalized;
    /// when nothing remains the none sentinel is returned.
    pub fn remove(self, substance: &SubstanceKey) -> Matter {
        match self {
            Matter::Substance(key) if &key == substance => Matter::none(),
            Matter::Substance(key) => Matter::Substance(key),
            Matter::Mixture(mixture) => Matter::from_mixture(mixture.without(substance)),
        }
    }

    /// Density (kg/m³) at the given conditions.
    pub fn density(&self, catalog: &SubstanceCatalog, temperature: f64, pressure: f64) -> f64 {
        match self {
            Matter::Substance(key) => catalog.get(key).density(temperature, pressure),
            Matter::Mixture(mixture) => mixture.density(catalog, temperature, pressure),
        }
    }

    /// Phase at the given conditions; a blend reports its dominant
    /// constituent's phase.
    pub fn phase(&self, catalog: &SubstanceCatalog, temperature: f64, pressure: f64) -> Phase {
        match self {
            Matter::Substance(key) => catalog.get(key).phase(temperature, pressure),
            Matter::Mixture(mixture) => mixture.phase(catalog, temperature, pressure),
        }
    }

    /// Phase-separate the constituents. See [`Mixture::separate_by_phase`].
    pub fn separate_by_phase(
        &self,
        catalog: &SubstanceCatalog,
        temperature: f64,
        pressure: f64,
        requested: &[PhaseSet],
    ) -> Vec<PhaseBucket> {
        self.constituents()
            .separate_by_phase(catalog, temperature, pressure, requested)
    }
}

impl Default for Matter {
    fn default() -> Self {
        Matter::none()
    }
}

impl From<SubstanceKey> for Matter {
    fn from(key: SubstanceKey) -> Self {
        Matter::Substance(key)
    }
}

impl From<Mixture> for Matter {
    fn from(mixture: Mixture) -> Self {
        Matter::from_mixture(mixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genso_substance::SubstanceIds;

    fn key(k: &str) -> SubstanceKey {
        SubstanceKey::from(k)
    }

    fn water() -> Matter {
        Matter::Substance(key(SubstanceIds::WATER))
    }

    fn quartz() -> Matter {
        Matter::Substance(key(SubstanceIds::QUARTZ))
    }

    #[test]
    fn test_leaf_constituents_is_self_at_one() {
        let constituents = water().constituents();
        assert_eq!(constituents.len(), 1);
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::WATER)),
            Proportion::ONE
        );
    }

    #[test]
    fn test_combine_degenerate_proportions() {
        // >= 1 returns the other side outright
        assert_eq!(water().combine(quartz(), Proportion::ONE), quartz());
        // <= 0 leaves self unchanged
        assert_eq!(water().combine(quartz(), Proportion::ZERO), water());
    }

    #[test]
    fn test_combine_two_leaves() {
        let blend = water().combine(quartz(), Proportion::from_f64(0.25));
        let constituents = blend.constituents();
        assert_eq!(constituents.len(), 2);
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::WATER)),
            Proportion::from_f64(0.75)
        );
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::QUARTZ)),
            Proportion::from_f64(0.25)
        );
    }

    #[test]
    fn test_combine_folds_aggregates_flat() {
        let brine = water().combine(Matter::Substance(key(SubstanceIds::HALITE)), Proportion::from_f64(0.1));
        let muddy = brine.combine(quartz(), Proportion::HALF);

        // No nesting: result is one flat mapping
        let constituents = muddy.constituents();
        assert_eq!(constituents.len(), 3);
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::WATER)),
            Proportion::from_f64(0.45)
        );
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::QUARTZ)),
            Proportion::HALF
        );
        assert_eq!(constituents.total(), Proportion::ONE);
    }

    #[test]
    fn test_combine_same_substance_collapses_to_leaf() {
        let result = water().combine(water(), Proportion::from_f64(0.3));
        assert_eq!(result, water());
    }

    #[test]
    fn test_add_constituent() {
        let brine = water().add_constituent(key(SubstanceIds::HALITE), Proportion::from_f64(0.1));
        let constituents = brine.constituents();
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::WATER)),
            Proportion::from_f64(0.9)
        );
        assert_eq!(
            constituents.proportion_of(&key(SubstanceIds::HALITE)),
            Proportion::from_f64(0.1)
        );
    }

    #[test]
    fn test_remove_from_leaf() {
        assert!(water().remove(&key(SubstanceIds::WATER)).is_none());
        assert_eq!(water().remove(&key(SubstanceIds::QUARTZ)), water());
    }

    #[test]
    fn test_remove_from_blend_renormalizes() {
        let blend = water().combine(quartz(), Proportion::from_f64(0.25));
        let rest = blend.remove(&key(SubstanceIds::WATER));
        // Only quartz remains, collapsed back to a leaf at proportion one
        assert_eq!(rest, quartz());
    }

    #[test]
    fn test_remove_everything_yields_sentinel() {
        let blend = water().combine(quartz(), Proportion::from_f64(0.25));
        let nothing = blend
            .remove(&key(SubstanceIds::WATER))
            .remove(&key(SubstanceIds::QUARTZ));
        assert!(nothing.is_none());
    }

    #[test]
    fn test_homogenize_is_idempotent() {
        let blend = water().combine(quartz(), Proportion::from_f64(0.25));
        let flat = blend.homogenize();
        let again = Matter::from_mixture(flat.clone()).homogenize();
        assert_eq!(flat, again);
    }
}
