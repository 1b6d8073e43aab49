//! Weighted substance blends
//!
//! A mixture is the flat composition mapping the whole algebra is built on:
//! an ordered list of (substance key, proportion) entries, no duplicate
//! keys, proportions summing to exactly one whenever the mixture is
//! non-empty. Substances are referenced by key; the data lives in the
//! shared catalog.

use genso_substance::{Phase, PhaseSet, Proportion, SubstanceCatalog, SubstanceKey, normalize};
use serde::{Deserialize, Serialize};

/// One weighted constituent of a mixture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub substance: SubstanceKey,
    pub proportion: Proportion,
}

/// A flat, proportion-weighted collection of substance references.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mixture {
    entries: Vec<MixEntry>,
}

/// One bucket of a phase separation.
///
/// `phases` is the requested set this bucket collected for; `None` marks
/// the trailing bucket of constituents that matched no requested set.
/// `proportion` is the share of the source mapping that landed here, while
/// `components` is renormalized to stand on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseBucket {
    pub phases: Option<PhaseSet>,
    pub components: Mixture,
    pub proportion: Proportion,
}

impl Mixture {
    /// Build a mixture from weighted entries.
    ///
    /// Duplicate keys are summed, zero proportions dropped, and the result
    /// normalized to sum to exactly one. An input that sums to zero yields
    /// the empty mixture.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SubstanceKey, Proportion)>,
    {
        let mut mixture = Self::default();
        for (substance, proportion) in entries {
            mixture.accumulate(substance, proportion);
        }
        mixture.renormalize();
        mixture
    }

    /// The singleton mapping `{substance -> 1}`.
    pub fn of(substance: impl Into<SubstanceKey>) -> Self {
        Self {
            entries: vec![MixEntry {
                substance: substance.into(),
                proportion: Proportion::ONE,
            }],
        }
    }

    pub fn entries(&self) -> &[MixEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Proportion of the given substance, zero when absent.
    pub fn proportion_of(&self, substance: &SubstanceKey) -> Proportion {
        self.entries
            .iter()
            .find(|e| &e.substance == substance)
            .map(|e| e.proportion)
            .unwrap_or(Proportion::ZERO)
    }

    /// Sum of all entry proportions. Exactly one for a normalized
    /// non-empty mixture.
    pub fn total(&self) -> Proportion {
        self.entries.iter().map(|e| e.proportion).sum()
    }

    /// The highest-proportion constituent, earliest entry winning ties.
    pub fn dominant(&self) -> Option<&SubstanceKey> {
        let mut best: Option<&MixEntry> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.proportion > b.proportion) {
                best = Some(entry);
            }
        }
        best.map(|e| &e.substance)
    }

    /// Merge-add an entry without renormalizing.
    pub(crate) fn accumulate(&mut self, substance: SubstanceKey, proportion: Proportion) {
        if proportion.is_zero() {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.substance == substance) {
            entry.proportion += proportion;
        } else {
            self.entries.push(MixEntry {
                substance,
                proportion,
            });
        }
    }

    /// Rescale entries to sum to exactly one; clears the mixture when
    /// nothing (or only zero-proportion entries) remains.
    pub(crate) fn renormalize(&mut self) {
        self.entries.retain(|e| !e.proportion.is_zero());
        let mut parts: Vec<Proportion> = self.entries.iter().map(|e| e.proportion).collect();
        if !normalize(&mut parts) {
            self.entries.clear();
            return;
        }
        for (entry, part) in self.entries.iter_mut().zip(parts) {
            entry.proportion = part;
        }
    }

    /// This mixture without the given substance, remaining proportions
    /// renormalized. Removing the last entry yields the empty mixture.
    pub fn without(&self, substance: &SubstanceKey) -> Self {
        let mut result = self.clone();
        result.entries.retain(|e| &e.substance != substance);
        result.renormalize();
        result
    }

    /// Blend `other` into this mixture at the given proportion: existing
    /// entries scale by `1 - proportion`, incoming by `proportion`,
    /// duplicate keys summed.
    pub fn blended(&self, other: &Mixture, proportion: Proportion) -> Self {
        let keep = proportion.complement();
        let mut result = Self::default();
        for entry in &self.entries {
            result.accumulate(entry.substance.clone(), entry.proportion * keep);
        }
        for entry in &other.entries {
            result.accumulate(entry.substance.clone(), entry.proportion * proportion);
        }
        result.renormalize();
        result
    }

    /// Proportion-weighted density (kg/m³) of the referenced substances.
    pub fn density(&self, catalog: &SubstanceCatalog, temperature: f64, pressure: f64) -> f64 {
        self.entries
            .iter()
            .map(|e| e.proportion.scale(catalog.get(&e.substance).density(temperature, pressure)))
            .sum()
    }

    /// Phase of the dominant constituent.
    pub fn phase(&self, catalog: &SubstanceCatalog, temperature: f64, pressure: f64) -> Phase {
        match self.dominant() {
            Some(key) => catalog.get(key).phase(temperature, pressure),
            None => Phase::Solid,
        }
    }

    /// Split constituents into one bucket per requested phase set, plus a
    /// trailing bucket for constituents matching none of them.
    ///
    /// Buckets are independent: a constituent whose phase matches two
    /// requested sets is counted at full proportion in both, so bucket
    /// proportions may sum past one. Each bucket's components are
    /// renormalized to stand alone.
    pub fn separate_by_phase(
        &self,
        catalog: &SubstanceCatalog,
        temperature: f64,
        pressure: f64,
        requested: &[PhaseSet],
    ) -> Vec<PhaseBucket> {
        let phases: Vec<(&MixEntry, Phase)> = self
            .entries
            .iter()
            .map(|e| (e, catalog.get(&e.substance).phase(temperature, pressure)))
            .collect();

        let mut buckets = Vec::with_capacity(requested.len() + 1);
        for &set in requested {
            let matched: Vec<_> = phases
                .iter()
                .filter(|(_, phase)| set.matches(*phase))
                .collect();
            buckets.push(PhaseBucket {
                phases: Some(set),
                proportion: matched.iter().map(|(e, _)| e.proportion).sum(),
                components: Mixture::new(
                    matched
                        .iter()
                        .map(|(e, _)| (e.substance.clone(), e.proportion)),
                ),
            });
        }

        let unmatched: Vec<_> = phases
            .iter()
            .filter(|(_, phase)| !requested.iter().any(|set| set.matches(*phase)))
            .collect();
        buckets.push(PhaseBucket {
            phases: None,
            proportion: unmatched.iter().map(|(e, _)| e.proportion).sum(),
            components: Mixture::new(
                unmatched
                    .iter()
                    .map(|(e, _)| (e.substance.clone(), e.proportion)),
            ),
        });

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genso_substance::{PROPORTION_SCALE, STANDARD_PRESSURE, SubstanceIds};

    fn key(k: &str) -> SubstanceKey {
        SubstanceKey::from(k)
    }

    #[test]
    fn test_new_normalizes_and_merges() {
        let mixture = Mixture::new([
            (key("a"), Proportion::from_f64(0.2)),
            (key("b"), Proportion::from_f64(0.2)),
            (key("a"), Proportion::from_f64(0.2)),
        ]);
        assert_eq!(mixture.len(), 2);
        // 2/3 floors to ...666; the division remainder lands on the
        // largest entry so the total stays exact
        assert_eq!(
            mixture.proportion_of(&key("a")),
            Proportion::from_parts(666_666_667)
        );
        assert_eq!(
            mixture.proportion_of(&key("b")),
            Proportion::from_parts(333_333_333)
        );
        assert_eq!(mixture.total(), Proportion::ONE);
    }

    #[test]
    fn test_zero_sum_is_empty() {
        let mixture = Mixture::new([(key("a"), Proportion::ZERO)]);
        assert!(mixture.is_empty());
        assert_eq!(mixture.total(), Proportion::ZERO);
    }

    #[test]
    fn test_without_renormalizes() {
        let mixture = Mixture::new([
            (key("a"), Proportion::HALF),
            (key("b"), Proportion::from_f64(0.3)),
            (key("c"), Proportion::from_f64(0.2)),
        ]);
        let without_a = mixture.without(&key("a"));
        assert_eq!(without_a.len(), 2);
        assert_eq!(without_a.total(), Proportion::ONE);
        assert_eq!(without_a.proportion_of(&key("b")), Proportion::from_f64(0.6));

        // Removing everything collapses to empty
        let empty = without_a.without(&key("b")).without(&key("c"));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_blended_folds_flat() {
        let left = Mixture::new([(key("a"), Proportion::HALF), (key("b"), Proportion::HALF)]);
        let right = Mixture::new([(key("b"), Proportion::HALF), (key("c"), Proportion::HALF)]);
        let blend = left.blended(&right, Proportion::HALF);

        assert_eq!(blend.len(), 3);
        assert_eq!(blend.proportion_of(&key("a")), Proportion::from_f64(0.25));
        // b appears on both sides: 0.5*0.5 + 0.5*0.5
        assert_eq!(blend.proportion_of(&key("b")), Proportion::HALF);
        assert_eq!(blend.total(), Proportion::ONE);
    }

    #[test]
    fn test_exact_sum_after_thirds() {
        let mixture = Mixture::new([
            (key("a"), Proportion::from_f64(0.1)),
            (key("b"), Proportion::from_f64(0.1)),
            (key("c"), Proportion::from_f64(0.1)),
        ]);
        let sum: u64 = mixture.entries().iter().map(|e| e.proportion.parts()).sum();
        assert_eq!(sum, PROPORTION_SCALE);
    }

    #[test]
    fn test_dominant_first_wins_ties() {
        let mixture = Mixture::new([(key("a"), Proportion::HALF), (key("b"), Proportion::HALF)]);
        assert_eq!(mixture.dominant(), Some(&key("a")));
    }

    #[test]
    fn test_separate_by_phase_buckets() {
        let catalog = SubstanceCatalog::new();
        let mixture = Mixture::new([
            (key(SubstanceIds::WATER), Proportion::HALF),
            (key(SubstanceIds::QUARTZ), Proportion::from_f64(0.3)),
            (key(SubstanceIds::OXYGEN), Proportion::from_f64(0.2)),
        ]);

        let buckets = mixture.separate_by_phase(
            &catalog,
            293.15,
            STANDARD_PRESSURE,
            &[PhaseSet::SOLID, PhaseSet::LIQUID],
        );
        assert_eq!(buckets.len(), 3);

        // Solid bucket: quartz only
        assert_eq!(buckets[0].proportion, Proportion::from_f64(0.3));
        assert_eq!(
            buckets[0].components.proportion_of(&key(SubstanceIds::QUARTZ)),
            Proportion::ONE
        );
        // Liquid bucket: water only
        assert_eq!(buckets[1].proportion, Proportion::HALF);
        // Unmatched bucket: oxygen (gas was not requested)
        assert_eq!(buckets[2].phases, None);
        assert_eq!(buckets[2].proportion, Proportion::from_f64(0.2));
    }

    #[test]
    fn test_separate_by_phase_overlapping_sets_double_count() {
        let catalog = SubstanceCatalog::new();
        let mixture = Mixture::new([(key(SubstanceIds::WATER), Proportion::ONE)]);

        let everything = PhaseSet::all();
        let buckets = mixture.separate_by_phase(
            &catalog,
            293.15,
            STANDARD_PRESSURE,
            &[PhaseSet::LIQUID, everything],
        );

        // Water lands in both requested buckets at full proportion
        assert_eq!(buckets[0].proportion, Proportion::ONE);
        assert_eq!(buckets[1].proportion, Proportion::ONE);
        assert_eq!(buckets[2].proportion, Proportion::ZERO);
        assert!(buckets[2].components.is_empty());
    }
}
