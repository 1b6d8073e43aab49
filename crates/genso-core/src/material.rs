//! Materials: composition plus extrinsic physical state
//!
//! A [`Material`] couples a composition with the state that only exists
//! once matter occupies space: a shape, a mass, an optional density
//! override and an optional temperature. Bulk materials carry a
//! [`Matter`] composition directly; layered materials are
//! [`Composite`](crate::Composite)s whose aggregate state derives from
//! their layers.

use crate::composite::Composite;
use crate::matter::Matter;
use crate::mixture::{Mixture, PhaseBucket};
use crate::shape::Shape;
use genso_substance::{
    AMBIENT_TEMPERATURE, Phase, PhaseSet, Proportion, STANDARD_PRESSURE, SubstanceCatalog,
};
use serde::{Deserialize, Serialize};

/// Homogeneous matter with extrinsic state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulkMaterial {
    pub matter: Matter,
    pub shape: Shape,
    /// Mass (kg), never negative. Absent in a serialized record means zero.
    #[serde(default)]
    pub mass: f64,
    /// Explicit density (kg/m³); when absent density derives from
    /// mass/volume or from the substances' phase-density tables.
    pub density: Option<f64>,
    /// Temperature (K); absent means ambient.
    pub temperature: Option<f64>,
}

impl BulkMaterial {
    pub fn new(matter: impl Into<Matter>, shape: Shape, mass: f64) -> Self {
        Self {
            matter: matter.into(),
            shape,
            mass: mass.max(0.0),
            density: None,
            temperature: None,
        }
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    pub fn with_temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }
}

/// A material: either bulk matter or an ordered stack of layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Bulk(BulkMaterial),
    Composite(Composite),
}

impl Material {
    /// A bulk material from any composition.
    pub fn bulk(matter: impl Into<Matter>, shape: Shape, mass: f64) -> Self {
        Material::Bulk(BulkMaterial::new(matter, shape, mass))
    }

    /// The empty material sentinel: no substance, no mass, no volume.
    pub fn none() -> Self {
        Material::Bulk(BulkMaterial::new(Matter::none(), Shape::default(), 0.0))
    }

    pub fn is_none(&self) -> bool {
        match self {
            Material::Bulk(bulk) => bulk.matter.is_none(),
            Material::Composite(_) => false,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Material::Composite(_))
    }

    pub fn shape(&self) -> &Shape {
        match self {
            Material::Bulk(bulk) => &bulk.shape,
            Material::Composite(composite) => &composite.shape,
        }
    }

    /// Mass (kg). A composite reports its override or the sum of its
    /// layers.
    pub fn mass(&self) -> f64 {
        match self {
            Material::Bulk(bulk) => bulk.mass,
            Material::Composite(composite) => composite.mass(),
        }
    }

    /// Volume (m³). A composite reports the sum of its layer volumes.
    pub fn volume(&self) -> f64 {
        match self {
            Material::Bulk(bulk) => bulk.shape.volume,
            Material::Composite(composite) => composite.volume(),
        }
    }

    /// Temperature (K), if any part of the tree reports one. A composite
    /// derives the mass-weighted average of its reporting layers.
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Material::Bulk(bulk) => bulk.temperature,
            Material::Composite(composite) => composite.temperature(),
        }
    }

    /// Density (kg/m³): the explicit override first, then mass over
    /// volume, then the composition's phase-density tables at this
    /// material's temperature (ambient when unset).
    pub fn density(&self, catalog: &SubstanceCatalog) -> f64 {
        match self {
            Material::Bulk(bulk) => {
                if let Some(density) = bulk.density {
                    return density;
                }
                if bulk.shape.volume > 0.0 {
                    return bulk.mass / bulk.shape.volume;
                }
                let temperature = bulk.temperature.unwrap_or(AMBIENT_TEMPERATURE);
                bulk.matter.density(catalog, temperature, STANDARD_PRESSURE)
            }
            Material::Composite(composite) => composite.density(catalog),
        }
    }

    /// The constituents mapping, flattened to substance leaves. Composite
    /// layers contribute their constituents scaled by mass fraction.
    pub fn constituents(&self) -> Mixture {
        match self {
            Material::Bulk(bulk) => bulk.matter.constituents(),
            Material::Composite(composite) => composite.constituents(),
        }
    }

    /// Flatten the whole tree into leaf-level proportions. Idempotent:
    /// homogenizing an already-flat material returns the same mapping.
    pub fn homogenize(&self) -> Mixture {
        self.constituents()
    }

    /// Phase at this material's own temperature (ambient when unset) and
    /// standard pressure. Aggregates report the dominant constituent.
    pub fn phase(&self, catalog: &SubstanceCatalog) -> Phase {
        let temperature = self.temperature().unwrap_or(AMBIENT_TEMPERATURE);
        self.constituents()
            .phase(catalog, temperature, STANDARD_PRESSURE)
    }

    /// Phase-separate the flattened constituents at the given conditions.
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

    /// Blend another material into this one.
    ///
    /// Follows the combine short-circuits: proportion at or above one
    /// returns `other`, at or below zero returns `self`. Otherwise the
    /// result is a bulk material holding both compositions folded flat,
    /// the summed mass and volume, and the mass-weighted temperature of
    /// whichever sides report one.
    pub fn combine(self, other: Material, proportion: Proportion) -> Material {
        if proportion.is_one() {
            return other;
        }
        if proportion.is_zero() {
            return self;
        }

        let matter = Matter::from_mixture(
            self.constituents()
                .blended(&other.constituents(), proportion),
        );
        let shape = Shape {
            volume: self.volume() + other.volume(),
            position: self.shape().position,
            rotation: self.shape().rotation,
        };
        let temperature = mass_weighted_temperature(
            [
                (self.mass(), self.temperature()),
                (other.mass(), other.temperature()),
            ]
            .into_iter(),
        );

        let mut combined = BulkMaterial::new(matter, shape, self.mass() + other.mass());
        combined.temperature = temperature;
        Material::Bulk(combined)
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::none()
    }
}

/// Mass-weighted mean of the entries that report a temperature; `None`
/// when none of them do or no reporting mass remains.
pub(crate) fn mass_weighted_temperature(
    entries: impl Iterator<Item = (f64, Option<f64>)>,
) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_mass = 0.0;
    for (mass, temperature) in entries {
        if let Some(temperature) = temperature {
            weighted += mass * temperature;
            total_mass += mass;
        }
    }
    (total_mass > 0.0).then(|| weighted / total_mass)
}
