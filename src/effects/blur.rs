//! Gaussian blur parameter and weight math.
//!
//! The optimized variant merges pairs of adjacent taps into one linearly
//! filtered sample (GPUImage style); the standard weights are what the
//! reference blur samples directly.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct BlurOptions: u32 {
        const LINEAR_FILTERING = 1 << 0;
        const LUMINANCE_THRESHOLD = 1 << 1;
    }
}

/// Upper bound on the number of merged sample offsets a blur shader unrolls.
pub const MAX_OPTIMIZED_OFFSETS: u32 = 6;

/// Largest radius, in texels, a blur pass samples in each direction.
pub const MAX_BLUR_RADIUS: u32 = 256;

/// Taps lighter than `1 / TAP_CUTOFF_RATIO` of the center tap are invisible at 8 bits.
const TAP_CUTOFF_RATIO: f64 = 256.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurParams {
    /// Radius as requested.
    pub true_radius: u32,
    /// Radius trimmed to the taps that still carry visible weight, at most
    /// [`MAX_BLUR_RADIUS`].
    pub radius: u32,
    pub number_of_optimized_offsets: u32,
    /// Offset count for `true_radius`, without the unroll cap.
    pub true_number_of_optimized_offsets: u32,
    pub sigma: f32,
    pub luminance_threshold_enabled: bool,
}

impl BlurParams {
    /// Whether pairs of taps were merged into single filtered samples.
    pub fn linear_filtering(&self) -> bool {
        self.true_number_of_optimized_offsets < self.true_radius
    }
}

pub fn compute_blur_params(radius: u32, options: BlurOptions) -> BlurParams {
    let true_radius = radius;
    let sigma = if true_radius == 0 {
        1.0
    } else {
        (true_radius as f32 / 3.0).max(0.5)
    };

    // w(r) / w(0) = exp(-r^2 / 2 sigma^2) >= 1 / TAP_CUTOFF_RATIO
    let radius = if true_radius == 0 {
        0
    } else {
        let visible = f64::from(sigma) * (2.0 * TAP_CUTOFF_RATIO.ln()).sqrt();
        (visible.floor() as u32)
            .clamp(1, true_radius)
            .min(MAX_BLUR_RADIUS)
    };

    let linear = options.contains(BlurOptions::LINEAR_FILTERING);
    let offsets_for = |r: u32| if linear { r.div_ceil(2) } else { r };

    BlurParams {
        true_radius,
        radius,
        number_of_optimized_offsets: offsets_for(radius).min(MAX_OPTIMIZED_OFFSETS),
        true_number_of_optimized_offsets: offsets_for(true_radius),
        sigma,
        luminance_threshold_enabled: options.contains(BlurOptions::LUMINANCE_THRESHOLD),
    }
}

/// Normalized blur weights for one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianWeights {
    /// Per-texel weights for offsets `0..=radius`; offset `i > 0` is applied on both sides.
    pub standard: Vec<f32>,
    /// Texel offsets of the merged samples, one per optimized offset.
    pub optimized_offsets: Vec<f32>,
    pub optimized_weights: Vec<f32>,
    /// First index into `standard` not covered by the merged samples.
    pub trailing_start: usize,
}

impl GaussianWeights {
    pub fn total(&self) -> f32 {
        let Some((center, rest)) = self.standard.split_first() else {
            return 0.0;
        };
        center + 2.0 * rest.iter().sum::<f32>()
    }

    pub fn optimized_total(&self) -> f32 {
        let center = self.standard.first().copied().unwrap_or(0.0);
        let trailing: f32 = self
            .standard
            .get(self.trailing_start..)
            .map(|w| w.iter().sum())
            .unwrap_or(0.0);
        center + 2.0 * self.optimized_weights.iter().sum::<f32>() + 2.0 * trailing
    }
}

pub fn compute_gaussian_weights(params: &BlurParams) -> GaussianWeights {
    let radius = params.radius as usize;
    let sigma = f64::from(params.sigma);
    let norm = 1.0 / (2.0 * std::f64::consts::PI * sigma * sigma).sqrt();

    let raw: Vec<f64> = (0..=radius)
        .map(|i| {
            let x = i as f64;
            norm * (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum = raw[0] + 2.0 * raw[1..].iter().sum::<f64>();
    let standard_f64: Vec<f64> = raw.iter().map(|w| w / sum).collect();

    let count = params.number_of_optimized_offsets as usize;
    let linear = params.linear_filtering();
    let tap = |i: usize| standard_f64.get(i).copied().unwrap_or(0.0);

    let mut optimized_offsets = Vec::with_capacity(count);
    let mut optimized_weights = Vec::with_capacity(count);
    for i in 0..count {
        if linear {
            let (first, second) = (tap(2 * i + 1), tap(2 * i + 2));
            let weight = first + second;
            let offset = if weight > 0.0 {
                (first * (2 * i + 1) as f64 + second * (2 * i + 2) as f64) / weight
            } else {
                (2 * i + 1) as f64
            };
            optimized_offsets.push(offset as f32);
            optimized_weights.push(weight as f32);
        } else {
            optimized_offsets.push((i + 1) as f32);
            optimized_weights.push(tap(i + 1) as f32);
        }
    }

    let trailing_start = if linear { 2 * count + 1 } else { count + 1 };

    GaussianWeights {
        standard: standard_f64.iter().map(|&w| w as f32).collect(),
        optimized_offsets,
        optimized_weights,
        trailing_start,
    }
}
