//! Concrete effects and the trait the effect stack drives them through.

pub mod blur;
pub mod blur_reference;
pub mod color_adjust;

use std::fmt::Debug;

use crate::stitch::{Dialect, EffectPass};

pub use blur::{BlurOptions, BlurParams, GaussianWeights, compute_blur_params, compute_gaussian_weights};
pub use blur_reference::BlurReference;
pub use color_adjust::{Brightness, Contrast, Saturation};

/// A visual transformation contributing shader fragments to one or more passes.
pub trait Effect: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Shader fragments for each render pass the effect needs, in order.
    fn passes(&self, dialect: Dialect) -> Vec<EffectPass>;

    /// Whether a single-pass instance of this effect may share a stitched
    /// pass with its neighbours.
    fn is_stitchable(&self) -> bool {
        true
    }
}
