//! Composition classification
//!
//! Bottom-up classifiers over composition trees: water content,
//! hydrocarbon content and ore detection. Aggregates are judged on their
//! flattened constituents; the threshold values are empirical and part of
//! the library's observable contract, so they are not tunable.

use crate::material::Material;
use crate::mixture::Mixture;
use genso_substance::{
    ElementClassifier, Proportion, Substance, SubstanceCatalog, SubstanceIds, SubstanceKey,
};

/// A node whose recursively-summed water share reaches this counts as water.
pub const WATER_THRESHOLD: Proportion = Proportion::from_percent(95);

/// Minimum hydrocarbon share for an aggregate to count as hydrocarbon.
pub const HYDROCARBON_MIN: Proportion = Proportion::from_percent(25);

/// An aggregate's hydrocarbon share must also reach this minus its pure
/// carbon and water shares.
pub const HYDROCARBON_BALANCE: Proportion = Proportion::from_percent(75);

/// Share of qualifying constituents for an aggregate to count as ore.
pub const ORE_THRESHOLD: Proportion = Proportion::from_percent(50);

/// Formula elements that never disqualify an ore (the usual oxide,
/// sulfide and arsenide partners).
const ORE_IGNORED_ELEMENTS: [&str; 4] = ["H", "O", "S", "As"];

/// True for the canonical water substance.
pub fn is_water_substance(substance: &Substance) -> bool {
    substance.key().as_str() == SubstanceIds::WATER
}

/// True when the formula contains exactly one element and it is carbon.
pub fn is_pure_carbon(substance: &Substance) -> bool {
    substance
        .elements
        .as_ref()
        .is_some_and(|elements| elements.is_exactly(&["C"]))
}

/// True when the formula contains exactly hydrogen and carbon.
pub fn is_hydrocarbon_substance(substance: &Substance) -> bool {
    substance
        .elements
        .as_ref()
        .is_some_and(|elements| elements.is_exactly(&["C", "H"]))
}

/// Leaf ore rule: every formula element is either an ignorable partner
/// (H, O, S, As) or a metal outside the alkali and alkaline-earth groups,
/// and at least one such metal is present.
pub fn is_ore_substance(substance: &Substance, elements: &dyn ElementClassifier) -> bool {
    let Some(formula) = substance.elements.as_ref() else {
        return false;
    };
    let mut has_qualifying_metal = false;
    for symbol in formula.iter() {
        if ORE_IGNORED_ELEMENTS.contains(&symbol) {
            continue;
        }
        let qualifies = elements.is_metal(symbol)
            && !elements.is_alkali_metal(symbol)
            && !elements.is_alkaline_earth_metal(symbol);
        if !qualifies {
            return false;
        }
        has_qualifying_metal = true;
    }
    has_qualifying_metal
}

/// Share of the mapping held by the canonical water substance.
pub fn water_fraction(constituents: &Mixture) -> Proportion {
    constituents.proportion_of(&SubstanceKey::from(SubstanceIds::WATER))
}

/// Share of the mapping held by pure carbon substances.
pub fn pure_carbon_fraction(constituents: &Mixture, catalog: &SubstanceCatalog) -> Proportion {
    fraction_matching(constituents, |key| is_pure_carbon(catalog.get(key)))
}

/// Share of the mapping held by hydrocarbon substances.
pub fn hydrocarbon_fraction(constituents: &Mixture, catalog: &SubstanceCatalog) -> Proportion {
    fraction_matching(constituents, |key| is_hydrocarbon_substance(catalog.get(key)))
}

/// Share of the mapping held by substances passing the leaf ore rule.
pub fn ore_fraction(
    constituents: &Mixture,
    catalog: &SubstanceCatalog,
    elements: &dyn ElementClassifier,
) -> Proportion {
    fraction_matching(constituents, |key| {
        is_ore_substance(catalog.get(key), elements)
    })
}

fn fraction_matching(
    constituents: &Mixture,
    predicate: impl Fn(&SubstanceKey) -> bool,
) -> Proportion {
    constituents
        .entries()
        .iter()
        .filter(|entry| predicate(&entry.substance))
        .map(|entry| entry.proportion)
        .sum()
}

/// Does this material count as water?
///
/// A bare water leaf trivially does; anything else qualifies when its
/// recursively-summed water share reaches [`WATER_THRESHOLD`].
pub fn is_water(material: &Material) -> bool {
    water_fraction(&material.homogenize()) >= WATER_THRESHOLD
}

/// Does this material count as a hydrocarbon?
///
/// The flattened hydrocarbon share must reach [`HYDROCARBON_MIN`] and also
/// cover whatever [`HYDROCARBON_BALANCE`] leaves after the pure carbon and
/// water shares are credited. A single hydrocarbon leaf passes trivially
/// (its share is one).
pub fn is_hydrocarbon(material: &Material, catalog: &SubstanceCatalog) -> bool {
    let flat = material.homogenize();
    let hydrocarbon = hydrocarbon_fraction(&flat, catalog);
    if hydrocarbon < HYDROCARBON_MIN {
        return false;
    }
    let credited = pure_carbon_fraction(&flat, catalog) + water_fraction(&flat);
    hydrocarbon >= HYDROCARBON_BALANCE - credited
}

/// Does this material count as ore?
///
/// A single leaf is judged by [`is_ore_substance`]; an aggregate qualifies
/// when its qualifying constituents reach [`ORE_THRESHOLD`] by proportion.
pub fn is_ore(
    material: &Material,
    catalog: &SubstanceCatalog,
    elements: &dyn ElementClassifier,
) -> bool {
    ore_fraction(&material.homogenize(), catalog, elements) >= ORE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::Matter;
    use crate::shape::Shape;
    use genso_substance::BasicElementTable;

    fn key(k: &str) -> SubstanceKey {
        SubstanceKey::from(k)
    }

    fn material_of(mixture: Mixture) -> Material {
        Material::bulk(Matter::from_mixture(mixture), Shape::default(), 1.0)
    }

    #[test]
    fn test_leaf_predicates() {
        let catalog = SubstanceCatalog::new();
        assert!(is_pure_carbon(catalog.get(&key(SubstanceIds::CARBON))));
        assert!(!is_pure_carbon(catalog.get(&key(SubstanceIds::CARBON_DIOXIDE))));

        assert!(is_hydrocarbon_substance(catalog.get(&key(SubstanceIds::METHANE))));
        assert!(is_hydrocarbon_substance(catalog.get(&key(SubstanceIds::OCTANE))));
        // Ethanol carries oxygen: not a hydrocarbon
        assert!(!is_hydrocarbon_substance(catalog.get(&key(SubstanceIds::ETHANOL))));

        assert!(is_water_substance(catalog.get(&key(SubstanceIds::WATER))));
    }

    #[test]
    fn test_ore_leaf_rule() {
        let catalog = SubstanceCatalog::new();
        let table = BasicElementTable;

        // {Fe, O}: oxygen ignored, iron is a qualifying metal
        assert!(is_ore_substance(catalog.get(&key(SubstanceIds::IRON_OXIDE)), &table));
        // {Na, Cl}: sodium is alkali, disqualifying
        assert!(!is_ore_substance(catalog.get(&key(SubstanceIds::HALITE)), &table));
        // {Si, O}: silicon is not a metal, disqualifying
        assert!(!is_ore_substance(catalog.get(&key(SubstanceIds::QUARTZ)), &table));
        // {H, O}: only ignorable elements, no qualifying metal
        assert!(!is_ore_substance(catalog.get(&key(SubstanceIds::WATER)), &table));
        // No formula at all
        assert!(!is_ore_substance(catalog.get(&key(SubstanceIds::NONE)), &table));
    }

    #[test]
    fn test_ore_aggregate_threshold() {
        let catalog = SubstanceCatalog::new();
        let table = BasicElementTable;

        // 60% iron oxide / 40% quartz: threshold met
        let mostly_ore = material_of(Mixture::new([
            (key(SubstanceIds::IRON_OXIDE), Proportion::from_f64(0.6)),
            (key(SubstanceIds::QUARTZ), Proportion::from_f64(0.4)),
        ]));
        assert!(is_ore(&mostly_ore, &catalog, &table));

        // Exactly 50% qualifies: the boundary is inclusive
        let boundary = material_of(Mixture::new([
            (key(SubstanceIds::IRON_OXIDE), Proportion::HALF),
            (key(SubstanceIds::QUARTZ), Proportion::HALF),
        ]));
        assert!(is_ore(&boundary, &catalog, &table));

        // 40% falls short
        let tailings = material_of(Mixture::new([
            (key(SubstanceIds::IRON_OXIDE), Proportion::from_f64(0.4)),
            (key(SubstanceIds::QUARTZ), Proportion::from_f64(0.6)),
        ]));
        assert!(!is_ore(&tailings, &catalog, &table));
    }

    #[test]
    fn test_water_threshold() {
        let pure = material_of(Mixture::of(key(SubstanceIds::WATER)));
        assert!(is_water(&pure));

        let nearly = material_of(Mixture::new([
            (key(SubstanceIds::WATER), Proportion::from_f64(0.96)),
            (key(SubstanceIds::HALITE), Proportion::from_f64(0.04)),
        ]));
        assert!(is_water(&nearly));

        let brine = material_of(Mixture::new([
            (key(SubstanceIds::WATER), Proportion::from_f64(0.9)),
            (key(SubstanceIds::HALITE), Proportion::from_f64(0.1)),
        ]));
        assert!(!is_water(&brine));
    }

    #[test]
    fn test_hydrocarbon_leaf_and_aggregate() {
        let catalog = SubstanceCatalog::new();

        let methane = material_of(Mixture::of(key(SubstanceIds::METHANE)));
        assert!(is_hydrocarbon(&methane, &catalog));

        let water = material_of(Mixture::of(key(SubstanceIds::WATER)));
        assert!(!is_hydrocarbon(&water, &catalog));

        // 30% octane, 30% carbon, 30% water, 10% quartz:
        // 0.30 >= 0.25 and 0.30 >= 0.75 - (0.30 + 0.30)
        let crude = material_of(Mixture::new([
            (key(SubstanceIds::OCTANE), Proportion::from_f64(0.3)),
            (key(SubstanceIds::CARBON), Proportion::from_f64(0.3)),
            (key(SubstanceIds::WATER), Proportion::from_f64(0.3)),
            (key(SubstanceIds::QUARTZ), Proportion::from_f64(0.1)),
        ]));
        assert!(is_hydrocarbon(&crude, &catalog));

        // 30% octane, 70% quartz: share is fine but nothing credits the
        // balance: 0.30 < 0.75 - 0
        let diluted = material_of(Mixture::new([
            (key(SubstanceIds::OCTANE), Proportion::from_f64(0.3)),
            (key(SubstanceIds::QUARTZ), Proportion::from_f64(0.7)),
        ]));
        assert!(!is_hydrocarbon(&diluted, &catalog));
    }

    #[test]
    fn test_classifiers_walk_composites() {
        let catalog = SubstanceCatalog::new();
        let table = BasicElementTable;

        // Two layers, 3:1 by mass: 75% iron oxide overall
        let ore_body = Material::composite(
            vec![
                Material::bulk(key(SubstanceIds::IRON_OXIDE), Shape::default(), 7.5),
                Material::bulk(key(SubstanceIds::QUARTZ), Shape::default(), 2.5),
            ],
            Shape::default(),
        )
        .unwrap();
        assert!(is_ore(&ore_body, &catalog, &table));

        let iceberg = Material::composite(
            vec![
                Material::bulk(key(SubstanceIds::WATER), Shape::default(), 99.0),
                Material::bulk(key(SubstanceIds::QUARTZ), Shape::default(), 1.0),
            ],
            Shape::default(),
        )
        .unwrap();
        assert!(is_water(&iceberg));
    }
}
