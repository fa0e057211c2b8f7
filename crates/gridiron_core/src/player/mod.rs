//! Player ability pipeline
//!
//! - `scale`: raw rating → [0, 1]
//! - `latent_deriver`: raw inputs → five latent groups
//! - `composites`: latent groups → role composites

pub mod composites;
pub mod latent_deriver;
pub mod scale;

pub use composites::Composite;
pub use latent_deriver::{attach_latent, derive_latent};
pub use scale::normalize_raw;
