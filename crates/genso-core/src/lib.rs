//! Composition algebra over genso substances
//!
//! This crate builds the recursive material model on top of
//! `genso-substance`:
//! - Mixtures: flat weighted substance blends (Mixture, MixEntry)
//! - Bulk compositions (Matter) with combine/remove/homogenize/phase
//!   separation
//! - Materials with extrinsic state (Material, BulkMaterial, Shape)
//! - Layered composites and the in-place layer editing API (Composite)
//! - Classification passes (analysis: water, hydrocarbon, ore)
//!
//! Everything is a pure in-memory tree computation. Catalogs are shared
//! read-only; composites mutate through their layer-editing API and must
//! stay confined to a single owner (or be externally synchronized).

pub mod analysis;
mod composite;
mod error;
mod material;
mod matter;
mod mixture;
mod shape;

pub use composite::Composite;
pub use error::MaterialError;
pub use material::{BulkMaterial, Material};
pub use matter::Matter;
pub use mixture::{MixEntry, Mixture, PhaseBucket};
pub use shape::Shape;

// The substance layer is part of this crate's public vocabulary.
pub use genso_substance as substance;
