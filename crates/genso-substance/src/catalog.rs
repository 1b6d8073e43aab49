//! Substance registry
//!
//! Composition trees never embed substance data; they reference shared
//! catalog entries by key. The catalog ships a built-in library of common
//! substances with real-world constants and accepts user-defined entries on
//! top of it.

use crate::phase::Phase;
use crate::substance::{AntoineCoefficients, Substance, SubstanceKey};
use ahash::AHashMap;

/// Built-in substance keys
pub struct SubstanceIds;

impl SubstanceIds {
    pub const NONE: &'static str = "none";
    pub const WATER: &'static str = "water";

    // Atmospheric gases
    pub const OXYGEN: &'static str = "oxygen";
    pub const NITROGEN: &'static str = "nitrogen";
    pub const CARBON_DIOXIDE: &'static str = "carbon_dioxide";

    // Hydrocarbons and organics
    pub const METHANE: &'static str = "methane";
    pub const OCTANE: &'static str = "octane";
    pub const ETHANOL: &'static str = "ethanol";
    pub const CARBON: &'static str = "carbon";

    // Minerals
    pub const QUARTZ: &'static str = "quartz";
    pub const HALITE: &'static str = "halite";
    pub const CORUNDUM: &'static str = "corundum";
    pub const GLASS: &'static str = "glass";

    // Metals and ores
    pub const IRON: &'static str = "iron";
    pub const IRON_OXIDE: &'static str = "iron_oxide";
    pub const COPPER: &'static str = "copper";
    pub const GOLD: &'static str = "gold";
    pub const URANIUM: &'static str = "uranium";
}

/// Registry of all substances, keyed by identity.
///
/// Lookups for unknown keys fall back to the none sentinel, mirroring how a
/// missing entry behaves everywhere else in the composition algebra.
pub struct SubstanceCatalog {
    substances: AHashMap<SubstanceKey, Substance>,
    none: Substance,
}

impl SubstanceCatalog {
    /// Catalog with the built-in substance library registered.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register_defaults();
        catalog
    }

    /// Catalog containing only the none sentinel.
    pub fn empty() -> Self {
        Self {
            substances: AHashMap::new(),
            none: Substance::none(),
        }
    }

    /// Register a substance, replacing any previous entry under its key.
    pub fn register(&mut self, substance: Substance) {
        log::debug!("[CATALOG] registered substance '{}'", substance.key());
        self.substances.insert(substance.key().clone(), substance);
    }

    /// Get a substance by key, falling back to the none sentinel.
    pub fn get(&self, key: &SubstanceKey) -> &Substance {
        self.substances.get(key).unwrap_or(&self.none)
    }

    /// Get a substance by key, `None` when unregistered.
    pub fn lookup(&self, key: &SubstanceKey) -> Option<&Substance> {
        self.substances.get(key)
    }

    pub fn contains(&self, key: &SubstanceKey) -> bool {
        self.substances.contains_key(key)
    }

    /// Find a substance whose display name or one of its common names
    /// matches (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Substance> {
        self.substances.values().find(|s| {
            s.name().eq_ignore_ascii_case(name)
                || s.common_names.iter().any(|n| n.eq_ignore_ascii_case(name))
        })
    }

    pub fn len(&self) -> usize {
        self.substances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Substance> {
        self.substances.values()
    }

    fn register_defaults(&mut self) {
        self.register(Substance::none());

        // Water: the canonical reference for the water classifier.
        // Antoine coefficients are Kelvin-shifted Stull constants in hPa.
        self.register(
            Substance::new(SubstanceIds::WATER, "water")
                .expect("default name")
                .with_common_names(["dihydrogen monoxide", "ice", "steam"])
                .with_densities(Some(917.0), Some(998.2), None)
                .with_molar_mass(0.018_015)
                .with_hardness(1.5)
                .with_melting_point(273.15)
                .with_antoine(
                    AntoineCoefficients::new(7.6543, 1435.264, -64.848)
                        .with_valid_range(255.9, 373.0),
                )
                .with_elements(["H", "O"]),
        );

        self.register(
            Substance::new(SubstanceIds::OXYGEN, "oxygen")
                .expect("default name")
                .with_densities(None, Some(1141.0), None)
                .with_molar_mass(0.031_999)
                .with_melting_point(54.36)
                .with_antoine(
                    AntoineCoefficients::new(6.9523, 340.024, -4.144).with_valid_range(54.4, 154.3),
                )
                .with_elements(["O"]),
        );

        self.register(
            Substance::new(SubstanceIds::NITROGEN, "nitrogen")
                .expect("default name")
                .with_densities(None, Some(806.6), None)
                .with_molar_mass(0.028_014)
                .with_melting_point(63.15)
                .with_antoine(
                    AntoineCoefficients::new(6.7362, 264.651, -6.788).with_valid_range(63.2, 126.0),
                )
                .with_elements(["N"]),
        );

        self.register(
            Substance::new(SubstanceIds::CARBON_DIOXIDE, "carbon dioxide")
                .expect("default name")
                .with_densities(Some(1562.0), None, None)
                .with_molar_mass(0.044_01)
                .with_greenhouse_potential(1.0)
                .with_melting_point(216.6)
                .with_antoine(
                    AntoineCoefficients::new(9.8123, 1301.679, -3.494).with_valid_range(154.3, 195.9),
                )
                .with_elements(["C", "O"]),
        );

        self.register(
            Substance::new(SubstanceIds::METHANE, "methane")
                .expect("default name")
                .with_common_names(["natural gas"])
                .with_densities(None, Some(422.4), None)
                .with_molar_mass(0.016_043)
                .with_greenhouse_potential(27.9)
                .with_melting_point(90.7)
                .with_antoine(
                    AntoineCoefficients::new(6.9895, 443.028, -0.49).with_valid_range(90.7, 189.9),
                )
                .flammable()
                .with_elements(["C", "H"]),
        );

        self.register(
            Substance::new(SubstanceIds::OCTANE, "octane")
                .expect("default name")
                .with_densities(None, Some(703.0), None)
                .with_molar_mass(0.114_23)
                .with_melting_point(216.3)
                .with_antoine(
                    AntoineCoefficients::new(7.0487, 1355.126, -63.633)
                        .with_valid_range(296.6, 399.7),
                )
                .flammable()
                .with_elements(["C", "H"]),
        );

        self.register(
            Substance::new(SubstanceIds::ETHANOL, "ethanol")
                .expect("default name")
                .with_common_names(["alcohol"])
                .with_densities(None, Some(789.3), None)
                .with_molar_mass(0.046_068)
                .with_melting_point(159.05)
                .with_antoine(
                    AntoineCoefficients::new(8.2468, 1598.673, -46.424)
                        .with_valid_range(292.8, 366.6),
                )
                .flammable()
                .with_elements(["C", "H", "O"]),
        );

        self.register(
            Substance::new(SubstanceIds::CARBON, "carbon")
                .expect("default name")
                .with_common_names(["graphite"])
                .with_densities(Some(2267.0), None, None)
                .with_molar_mass(0.012_011)
                .with_hardness(1.5)
                .with_melting_point(3915.0)
                .flammable()
                .with_elements(["C"]),
        );

        self.register(
            Substance::new(SubstanceIds::QUARTZ, "quartz")
                .expect("default name")
                .with_common_names(["silica"])
                .with_densities(Some(2650.0), Some(2200.0), None)
                .with_molar_mass(0.060_084)
                .with_hardness(7.0)
                .with_youngs_modulus(87.0e9)
                .with_melting_point(1986.0)
                .with_elements(["Si", "O"]),
        );

        self.register(
            Substance::new(SubstanceIds::HALITE, "halite")
                .expect("default name")
                .with_common_names(["rock salt"])
                .with_densities(Some(2170.0), Some(1556.0), None)
                .with_molar_mass(0.058_443)
                .with_hardness(2.5)
                .with_melting_point(1073.8)
                .with_elements(["Na", "Cl"]),
        );

        self.register(
            Substance::new(SubstanceIds::CORUNDUM, "corundum")
                .expect("default name")
                .with_common_names(["ruby", "sapphire"])
                .with_densities(Some(3987.0), None, None)
                .with_molar_mass(0.101_961)
                .with_hardness(9.0)
                .with_youngs_modulus(400.0e9)
                .with_melting_point(2345.0)
                .gemstone()
                .with_elements(["Al", "O"]),
        );

        // Amorphous silica: a standing exotic state, never derived from
        // temperature and pressure.
        self.register(
            Substance::new(SubstanceIds::GLASS, "glass")
                .expect("default name")
                .with_densities(None, None, Some(2500.0))
                .with_molar_mass(0.060_084)
                .with_hardness(5.5)
                .with_fixed_phase(Phase::Glass)
                .with_elements(["Si", "O"]),
        );

        self.register(
            Substance::new(SubstanceIds::IRON, "iron")
                .expect("default name")
                .with_densities(Some(7874.0), Some(6980.0), None)
                .with_molar_mass(0.055_845)
                .with_hardness(4.0)
                .with_youngs_modulus(211.0e9)
                .with_melting_point(1811.0)
                .conductive()
                .metal()
                .with_elements(["Fe"]),
        );

        self.register(
            Substance::new(SubstanceIds::IRON_OXIDE, "iron oxide")
                .expect("default name")
                .with_common_names(["hematite", "rust"])
                .with_densities(Some(5250.0), None, None)
                .with_molar_mass(0.159_688)
                .with_hardness(6.0)
                .with_melting_point(1838.0)
                .with_elements(["Fe", "O"]),
        );

        self.register(
            Substance::new(SubstanceIds::COPPER, "copper")
                .expect("default name")
                .with_densities(Some(8960.0), Some(8020.0), None)
                .with_molar_mass(0.063_546)
                .with_hardness(3.0)
                .with_youngs_modulus(130.0e9)
                .with_melting_point(1357.8)
                .conductive()
                .metal()
                .with_elements(["Cu"]),
        );

        self.register(
            Substance::new(SubstanceIds::GOLD, "gold")
                .expect("default name")
                .with_densities(Some(19_300.0), Some(17_310.0), None)
                .with_molar_mass(0.196_967)
                .with_hardness(2.5)
                .with_youngs_modulus(79.0e9)
                .with_melting_point(1337.3)
                .conductive()
                .metal()
                .with_elements(["Au"]),
        );

        self.register(
            Substance::new(SubstanceIds::URANIUM, "uranium")
                .expect("default name")
                .with_densities(Some(19_050.0), Some(17_300.0), None)
                .with_molar_mass(0.238_029)
                .with_hardness(6.0)
                .with_melting_point(1405.3)
                .conductive()
                .metal()
                .radioactive()
                .with_elements(["U"]),
        );
    }
}

impl Default for SubstanceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substance::STANDARD_PRESSURE;

    #[test]
    fn test_get_falls_back_to_none() {
        let catalog = SubstanceCatalog::new();
        let missing = catalog.get(&SubstanceKey::from("no_such_substance"));
        assert!(missing.is_none());
        assert!(catalog.lookup(&SubstanceKey::from("no_such_substance")).is_none());
    }

    #[test]
    fn test_default_water_phases() {
        let catalog = SubstanceCatalog::new();
        let water = catalog.get(&SubstanceKey::from(SubstanceIds::WATER));

        assert_eq!(water.phase(250.0, STANDARD_PRESSURE), Phase::Solid);
        assert_eq!(water.phase(293.15, STANDARD_PRESSURE), Phase::Liquid);
        assert_eq!(water.phase(400.0, STANDARD_PRESSURE), Phase::Gas);
    }

    #[test]
    fn test_default_water_vapor_pressure_at_room_temperature() {
        let catalog = SubstanceCatalog::new();
        let water = catalog.get(&SubstanceKey::from(SubstanceIds::WATER));

        // ~3.2 kPa at 25°C
        let vp = water.vapor_pressure(298.15).unwrap();
        assert!((3000.0..3400.0).contains(&vp), "vp = {vp}");
    }

    #[test]
    fn test_atmospheric_gases_are_gaseous_at_ambient() {
        let catalog = SubstanceCatalog::new();
        for key in [SubstanceIds::OXYGEN, SubstanceIds::NITROGEN, SubstanceIds::METHANE] {
            let s = catalog.get(&SubstanceKey::from(key));
            assert_eq!(s.phase(293.15, STANDARD_PRESSURE), Phase::Gas, "{key}");
        }
    }

    #[test]
    fn test_glass_reports_fixed_phase() {
        let catalog = SubstanceCatalog::new();
        let glass = catalog.get(&SubstanceKey::from(SubstanceIds::GLASS));
        assert_eq!(glass.phase(293.15, STANDARD_PRESSURE), Phase::Glass);
        assert_eq!(glass.density(293.15, STANDARD_PRESSURE), 2500.0);
    }

    #[test]
    fn test_find_by_name() {
        let catalog = SubstanceCatalog::new();
        assert_eq!(
            catalog.find_by_name("Rock Salt").map(|s| s.key().as_str()),
            Some(SubstanceIds::HALITE)
        );
        assert_eq!(
            catalog.find_by_name("water").map(|s| s.key().as_str()),
            Some(SubstanceIds::WATER)
        );
        assert!(catalog.find_by_name("unobtainium").is_none());
    }

    #[test]
    fn test_register_overwrites() {
        let mut catalog = SubstanceCatalog::new();
        let heavy_water = Substance::new(SubstanceIds::WATER, "heavy water")
            .unwrap()
            .with_molar_mass(0.020_027);
        catalog.register(heavy_water);
        assert_eq!(
            catalog.get(&SubstanceKey::from(SubstanceIds::WATER)).name(),
            "heavy water"
        );
    }
}
