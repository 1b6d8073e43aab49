//! Substance definitions and property derivation
//!
//! A [`Substance`] is an immutable description of chemically homogeneous
//! matter: intrinsic constants plus the phase/vapor-pressure/density
//! derivations over them. Identity lives entirely in the key; two
//! substances with identical constants but different keys are distinct.

use crate::elements::ElementSet;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Ambient reference temperature (K), used when a material reports none.
pub const AMBIENT_TEMPERATURE: f64 = 293.15;

/// Standard atmospheric pressure (Pa).
pub const STANDARD_PRESSURE: f64 = 101_325.0;

/// Universal gas constant (J/(mol·K)).
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Errors raised while constructing substances.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubstanceError {
    #[error("substance name must not be empty")]
    EmptyName,
}

/// Stable identity key for a substance.
///
/// Composition trees reference substances by key only; the substance data
/// itself lives in a shared [`SubstanceCatalog`](crate::SubstanceCatalog).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstanceKey(String);

impl SubstanceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubstanceKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SubstanceKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for SubstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Antoine vapor-pressure coefficients.
///
/// `vapor_pressure` evaluates `10^(a - b/(c + T)) * 100.0`: the equation's
/// native unit is hectopascals, the factor converts to pascals. The
/// coefficients are all-or-nothing; a substance either carries the full
/// triple or none at all, which this struct encodes by existing or not.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntoineCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Lowest temperature (K) the coefficients are valid at. Below it the
    /// substance is certainly not gaseous.
    pub min_temperature: Option<f64>,
    /// Highest temperature (K) the coefficients are valid at. Above it the
    /// substance is certainly gaseous.
    pub max_temperature: Option<f64>,
}

impl AntoineCoefficients {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            min_temperature: None,
            max_temperature: None,
        }
    }

    pub fn with_valid_range(mut self, min: f64, max: f64) -> Self {
        self.min_temperature = Some(min);
        self.max_temperature = Some(max);
        self
    }
}

/// An elementary description of physically and thermally homogeneous matter.
///
/// Constructed once, immutable afterwards; "edits" like [`Substance::rename`]
/// return a new value. Equality and hashing go by key only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Substance {
    key: SubstanceKey,
    name: String,
    /// Alternate display names, most common first.
    pub common_names: Vec<String>,

    /// Density in the solid phase (kg/m³), if known.
    pub solid_density: Option<f64>,
    /// Density in the liquid phase (kg/m³), if known.
    pub liquid_density: Option<f64>,
    /// Density in an exotic fixed phase (kg/m³), if known.
    pub special_density: Option<f64>,

    /// Molar mass (kg/mol).
    pub molar_mass: f64,
    /// Mohs hardness.
    pub hardness: f64,
    /// Young's modulus (Pa).
    pub youngs_modulus: f64,
    /// Greenhouse warming potential relative to CO₂.
    pub greenhouse_potential: f64,

    pub is_conductive: bool,
    pub is_flammable: bool,
    pub is_gemstone: bool,
    pub is_metal: bool,
    pub is_radioactive: bool,

    /// Melting point (K), if known.
    pub melting_point: Option<f64>,
    /// Phase override for states the solid/liquid/gas model cannot express
    /// (plasma, glass). When set, `phase` returns it unconditionally.
    pub fixed_phase: Option<Phase>,
    pub antoine: Option<AntoineCoefficients>,

    /// Element symbols of the formula, parsed by an external collaborator.
    pub elements: Option<ElementSet>,
}

impl Substance {
    /// Key of the distinguished empty substance.
    pub const NONE_KEY: &'static str = "none";

    pub fn new(
        key: impl Into<SubstanceKey>,
        name: impl Into<String>,
    ) -> Result<Self, SubstanceError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SubstanceError::EmptyName);
        }
        Ok(Self {
            key: key.into(),
            name,
            common_names: Vec::new(),
            solid_density: None,
            liquid_density: None,
            special_density: None,
            molar_mass: 0.0,
            hardness: 0.0,
            youngs_modulus: 0.0,
            greenhouse_potential: 0.0,
            is_conductive: false,
            is_flammable: false,
            is_gemstone: false,
            is_metal: false,
            is_radioactive: false,
            melting_point: None,
            fixed_phase: None,
            antoine: None,
            elements: None,
        })
    }

    /// The empty sentinel substance. Compares equal only to itself.
    pub fn none() -> Self {
        Self::new(Self::NONE_KEY, "none").expect("sentinel name is not empty")
    }

    pub fn is_none(&self) -> bool {
        self.key.as_str() == Self::NONE_KEY
    }

    pub fn key(&self) -> &SubstanceKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return a copy carrying a different display name. The identity key is
    /// untouched, so the renamed value still compares equal to the original.
    pub fn rename(&self, name: impl Into<String>) -> Result<Self, SubstanceError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SubstanceError::EmptyName);
        }
        let mut renamed = self.clone();
        renamed.name = name;
        Ok(renamed)
    }

    pub fn with_common_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_densities(
        mut self,
        solid: Option<f64>,
        liquid: Option<f64>,
        special: Option<f64>,
    ) -> Self {
        self.solid_density = solid;
        self.liquid_density = liquid;
        self.special_density = special;
        self
    }

    pub fn with_molar_mass(mut self, molar_mass: f64) -> Self {
        self.molar_mass = molar_mass;
        self
    }

    pub fn with_hardness(mut self, hardness: f64) -> Self {
        self.hardness = hardness;
        self
    }

    pub fn with_youngs_modulus(mut self, youngs_modulus: f64) -> Self {
        self.youngs_modulus = youngs_modulus;
        self
    }

    pub fn with_greenhouse_potential(mut self, potential: f64) -> Self {
        self.greenhouse_potential = potential;
        self
    }

    pub fn with_melting_point(mut self, kelvin: f64) -> Self {
        self.melting_point = Some(kelvin);
        self
    }

    pub fn with_fixed_phase(mut self, phase: Phase) -> Self {
        self.fixed_phase = Some(phase);
        self
    }

    pub fn with_antoine(mut self, antoine: AntoineCoefficients) -> Self {
        self.antoine = Some(antoine);
        self
    }

    pub fn with_elements<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = Some(ElementSet::new(symbols));
        self
    }

    pub fn conductive(mut self) -> Self {
        self.is_conductive = true;
        self
    }

    pub fn flammable(mut self) -> Self {
        self.is_flammable = true;
        self
    }

    pub fn gemstone(mut self) -> Self {
        self.is_gemstone = true;
        self
    }

    pub fn metal(mut self) -> Self {
        self.is_metal = true;
        self
    }

    pub fn radioactive(mut self) -> Self {
        self.is_radioactive = true;
        self
    }

    /// Vapor pressure (Pa) at the given temperature (K).
    ///
    /// Outside the coefficients' declared validity range the answer is
    /// certain without evaluating the equation: `+inf` above the maximum
    /// (certainly gaseous), `-inf` below the minimum (certainly not).
    /// `None` means no coefficients are defined at all.
    pub fn vapor_pressure(&self, temperature: f64) -> Option<f64> {
        let antoine = self.antoine?;
        if let Some(max) = antoine.max_temperature
            && temperature > max
        {
            return Some(f64::INFINITY);
        }
        if let Some(min) = antoine.min_temperature
            && temperature < min
        {
            return Some(f64::NEG_INFINITY);
        }
        Some(10f64.powf(antoine.a - antoine.b / (antoine.c + temperature)) * 100.0)
    }

    /// Phase at the given temperature (K) and pressure (Pa).
    ///
    /// The check order matters: the fixed override wins unconditionally,
    /// then the melting-point test, then the vapor-pressure test. A
    /// substance with no known melting point defaults to solid only after
    /// the vapor-pressure test failed to call it gaseous.
    pub fn phase(&self, temperature: f64, pressure: f64) -> Phase {
        if let Some(fixed) = self.fixed_phase {
            return fixed;
        }
        if let Some(melting_point) = self.melting_point
            && temperature < melting_point
        {
            return Phase::Solid;
        }
        match self.vapor_pressure(temperature) {
            Some(vapor_pressure) if pressure < vapor_pressure => Phase::Gas,
            _ if self.melting_point.is_none() => Phase::Solid,
            _ => Phase::Liquid,
        }
    }

    /// Density (kg/m³) at the given temperature (K) and pressure (Pa).
    ///
    /// Prefers the stored density matching the computed phase; exotic fixed
    /// phases use the special density. With nothing stored the ideal gas
    /// relation `p·M / (R·T)` is the fallback.
    pub fn density(&self, temperature: f64, pressure: f64) -> f64 {
        let stored = match self.phase(temperature, pressure) {
            Phase::Solid => self.solid_density,
            Phase::Liquid => self.liquid_density,
            Phase::Gas => None,
            Phase::Plasma | Phase::Glass => self.special_density,
        };
        stored.unwrap_or_else(|| pressure * self.molar_mass / (GAS_CONSTANT * temperature))
    }
}

impl PartialEq for Substance {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Substance {}

impl Hash for Substance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
