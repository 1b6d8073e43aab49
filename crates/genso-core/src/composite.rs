//! Layered composites and the layer-editing state machine
//!
//! A composite stacks materials into one larger material. Aggregate mass,
//! density and temperature derive from the layers unless explicitly
//! overridden. The layer list is the one piece of mutable state in the
//! algebra; it is only ever touched through the narrow editing API below,
//! and the structure never stands with zero layers (edits collapse a
//! would-be empty composite to the empty-material sentinel and a one-layer
//! composite to its bare layer).

use crate::error::MaterialError;
use crate::material::{Material, mass_weighted_temperature};
use crate::mixture::Mixture;
use crate::shape::Shape;
use genso_substance::{
    AMBIENT_TEMPERATURE, Proportion, STANDARD_PRESSURE, SubstanceCatalog, normalize,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An ordered, non-empty stack of materials acting as one material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    layers: Vec<Material>,
    pub shape: Shape,
    /// Mass override (kg); when absent mass is the sum of the layers.
    pub mass_override: Option<f64>,
    /// Density override (kg/m³); when absent density is total mass over
    /// total layer volume.
    pub density_override: Option<f64>,
    /// Temperature override (K); when absent the mass-weighted mean of
    /// the layers that report one.
    pub temperature_override: Option<f64>,
}

impl Composite {
    /// Build a composite from layers. At least one layer is required.
    pub fn new(layers: Vec<Material>, shape: Shape) -> Result<Self, MaterialError> {
        if layers.is_empty() {
            return Err(MaterialError::EmptyComposite);
        }
        Ok(Self {
            layers,
            shape,
            mass_override: None,
            density_override: None,
            temperature_override: None,
        })
    }

    pub fn layers(&self) -> &[Material] {
        &self.layers
    }

    /// Mass (kg): the override or the sum of the layer masses.
    pub fn mass(&self) -> f64 {
        self.mass_override
            .unwrap_or_else(|| self.layers.iter().map(Material::mass).sum())
    }

    /// Total layer volume (m³).
    pub fn volume(&self) -> f64 {
        self.layers.iter().map(Material::volume).sum()
    }

    /// Density (kg/m³): the override, else total mass over total layer
    /// volume, else the constituents' table densities.
    pub fn density(&self, catalog: &SubstanceCatalog) -> f64 {
        if let Some(density) = self.density_override {
            return density;
        }
        let volume = self.volume();
        if volume > 0.0 {
            return self.mass() / volume;
        }
        let temperature = self.temperature().unwrap_or(AMBIENT_TEMPERATURE);
        self.constituents()
            .density(catalog, temperature, STANDARD_PRESSURE)
    }

    /// Temperature (K): the override, else the mass-weighted mean of the
    /// layers that report one, else `None`.
    pub fn temperature(&self) -> Option<f64> {
        self.temperature_override.or_else(|| {
            mass_weighted_temperature(self.layers.iter().map(|l| (l.mass(), l.temperature())))
        })
    }

    /// The aggregate constituents mapping: each layer's constituents
    /// scaled by its share of the total mass, entries for the same
    /// substance summed across layers.
    ///
    /// A composite whose layers are all massless weights them equally.
    pub fn constituents(&self) -> Mixture {
        let total: f64 = self.layers.iter().map(Material::mass).sum();
        let mut result = Mixture::default();
        for layer in &self.layers {
            let fraction = if total > 0.0 {
                Proportion::from_f64(layer.mass() / total)
            } else {
                Proportion::from_ratio(1, self.layers.len() as u64)
            };
            for entry in layer.constituents().entries() {
                result.accumulate(entry.substance.clone(), entry.proportion * fraction);
            }
        }
        result.renormalize();
        result
    }
}

/// Composite layer editing.
///
/// These are the only operations that mutate in place; everything else in
/// the algebra rebuilds values. They live on [`Material`] because edits
/// can change the node's kind: adding a layer to bulk matter wraps it into
/// a composite, and removals collapse composites back down.
impl Material {
    /// Build a composite material from layers.
    pub fn composite(layers: Vec<Material>, shape: Shape) -> Result<Material, MaterialError> {
        Ok(Material::Composite(Composite::new(layers, shape)?))
    }

    /// Number of layers; a non-composite counts as one implicit layer.
    pub fn layer_count(&self) -> usize {
        match self {
            Material::Composite(composite) => composite.layers.len(),
            Material::Bulk(_) => 1,
        }
    }

    /// Insert a layer holding `proportion` of the total mass.
    ///
    /// Existing layers are scaled down by `1 - proportion` and the new
    /// layer is scaled to `total mass × proportion` before insertion at
    /// `index` (`None` appends). A proportion at or above one replaces
    /// the whole material, at or below zero is a no-op. An index past the
    /// layer count fails without touching the tree.
    pub fn add_layer(
        &mut self,
        material: Material,
        proportion: Proportion,
        index: Option<usize>,
    ) -> Result<(), MaterialError> {
        if proportion.is_one() {
            *self = material;
            return Ok(());
        }
        if proportion.is_zero() {
            return Ok(());
        }

        let len = self.layer_count();
        let insert_at = index.unwrap_or(len);
        if insert_at > len {
            return Err(MaterialError::LayerIndexOutOfRange {
                index: insert_at,
                len,
            });
        }

        let total = self.mass();
        let keep = proportion.complement().to_f64();
        let composite = self.make_composite();
        for layer in &mut composite.layers {
            layer.scale_mass(keep);
        }
        composite
            .layers
            .insert(insert_at, material.with_mass_scaled_to(proportion.scale(total)));
        log::debug!(
            "[LAYER] inserted layer at {} ({} layers, {:.3} kg total)",
            insert_at,
            composite.layers.len(),
            total
        );
        Ok(())
    }

    /// Drop every layer equal to `target`. On a non-composite, a match
    /// leaves the empty-material sentinel.
    pub fn remove_layer(&mut self, target: &Material) {
        self.remove_layers(|layer| layer == target);
    }

    /// Drop every layer matching the predicate, then collapse: zero
    /// remaining layers leave the empty-material sentinel, exactly one
    /// leaves that bare layer.
    pub fn remove_layers(&mut self, predicate: impl Fn(&Material) -> bool) {
        match self {
            Material::Composite(composite) => {
                composite.layers.retain(|layer| !predicate(layer));
            }
            bulk => {
                if predicate(bulk) {
                    *bulk = Material::none();
                }
                return;
            }
        }
        self.collapse();
    }

    /// Replace the layer at `index` with `material` holding `proportion`
    /// of the total mass.
    ///
    /// Every other layer is scaled by `1 - (proportion - old layer's mass
    /// fraction)`. A proportion at or above one replaces the whole
    /// material, at or below zero is a no-op.
    pub fn replace_layer(
        &mut self,
        index: usize,
        material: Material,
        proportion: Proportion,
    ) -> Result<(), MaterialError> {
        if proportion.is_one() {
            *self = material;
            return Ok(());
        }
        if proportion.is_zero() {
            return Ok(());
        }

        let len = self.layer_count();
        if index >= len {
            return Err(MaterialError::LayerIndexOutOfRange { index, len });
        }

        let total = self.mass();
        let composite = self.make_composite();
        let old_fraction = if total > 0.0 {
            composite.layers[index].mass() / total
        } else {
            0.0
        };
        let others_factor = (1.0 - (proportion.to_f64() - old_fraction)).max(0.0);

        composite.layers.remove(index);
        for layer in &mut composite.layers {
            layer.scale_mass(others_factor);
        }
        composite
            .layers
            .insert(index, material.with_mass_scaled_to(proportion.scale(total)));
        log::debug!("[LAYER] replaced layer {} ({:.3} kg total)", index, total);
        self.collapse();
        Ok(())
    }

    /// Carve this material into independently mutable mass fractions.
    ///
    /// Each resulting layer is a full deep clone of the original scaled to
    /// its fraction. One proportion `p` expands to `[p, 1 - p]`; no
    /// proportions default to an even halving; the fractions are
    /// normalized to sum to one.
    pub fn split(&self, proportions: &[Proportion]) -> Material {
        let mut parts: SmallVec<[Proportion; 4]> = SmallVec::from_slice(proportions);
        match parts.len() {
            0 => {
                parts.push(Proportion::HALF);
                parts.push(Proportion::HALF);
            }
            1 => {
                let p = parts[0];
                parts.push(p.complement());
            }
            _ => {}
        }
        if !normalize(&mut parts) {
            // All-zero fractions: fall back to an even split.
            let equal = Proportion::from_ratio(1, parts.len() as u64);
            for part in parts.iter_mut() {
                *part = equal;
            }
            normalize(&mut parts);
        }

        let layers: Vec<Material> = parts
            .iter()
            .map(|part| {
                let mut layer = self.clone();
                layer.scale_mass(part.to_f64());
                layer
            })
            .collect();
        log::debug!("[LAYER] split into {} fractions", layers.len());

        Material::Composite(Composite {
            layers,
            shape: self.shape().clone(),
            mass_override: None,
            density_override: None,
            temperature_override: None,
        })
    }

    /// The innermost layer, or `self` when not a composite.
    pub fn get_core(&self) -> &Material {
        match self {
            Material::Composite(composite) => composite.layers.first().unwrap_or(self),
            _ => self,
        }
    }

    /// The outermost layer, or `self` when not a composite.
    pub fn get_surface(&self) -> &Material {
        match self {
            Material::Composite(composite) => composite.layers.last().unwrap_or(self),
            _ => self,
        }
    }

    /// Scale all masses (and volumes, keeping densities intact) in this
    /// subtree by `factor`.
    pub(crate) fn scale_mass(&mut self, factor: f64) {
        let factor = factor.max(0.0);
        match self {
            Material::Bulk(bulk) => {
                bulk.mass *= factor;
                bulk.shape = bulk.shape.scaled(factor);
            }
            Material::Composite(composite) => {
                if let Some(mass) = composite.mass_override.as_mut() {
                    *mass *= factor;
                }
                composite.shape = composite.shape.scaled(factor);
                for layer in &mut composite.layers {
                    layer.scale_mass(factor);
                }
            }
        }
    }

    /// Rescale this subtree so its total mass lands on `target`.
    pub(crate) fn with_mass_scaled_to(mut self, target: f64) -> Material {
        let current = self.mass();
        if current > 0.0 {
            self.scale_mass(target / current);
        } else {
            match &mut self {
                Material::Bulk(bulk) => bulk.mass = target.max(0.0),
                Material::Composite(composite) => {
                    composite.mass_override = Some(target.max(0.0));
                }
            }
        }
        self
    }

    /// Wrap bulk matter into a single-layer composite so the layer list
    /// exists to edit; already-composite materials pass through.
    fn make_composite(&mut self) -> &mut Composite {
        if let Material::Bulk(_) = self {
            let layer = std::mem::replace(self, Material::none());
            let shape = layer.shape().clone();
            *self = Material::Composite(Composite {
                layers: vec![layer],
                shape,
                mass_override: None,
                density_override: None,
                temperature_override: None,
            });
        }
        match self {
            Material::Composite(composite) => composite,
            Material::Bulk(_) => unreachable!("bulk was wrapped above"),
        }
    }

    /// Enforce the standing-structure rule after removals: composites
    /// never persist with zero or one layers.
    fn collapse(&mut self) {
        let Material::Composite(composite) = self else {
            return;
        };
        match composite.layers.len() {
            0 => {
                log::debug!("[LAYER] composite emptied, collapsing to empty material");
                *self = Material::none();
            }
            1 => {
                log::debug!("[LAYER] single layer left, collapsing composite");
                let layer = composite.layers.pop().expect("one layer present");
                *self = layer;
            }
            _ => {}
        }
    }
}
