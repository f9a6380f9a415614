//! Brute-force separable Gaussian blur.
//!
//! Samples every texel in `[-radius, radius]` with the standard weights. It is
//! slow on purpose: optimized blurs are checked against its output.

use super::{
    Effect,
    blur::{BlurOptions, BlurParams, compute_blur_params, compute_gaussian_weights},
};
use crate::stitch::{
    ArgumentQualifier, Dialect, EffectParameter, EffectPass, Function, FunctionCall,
    FunctionInput, ParameterValue, ShaderArgument, StageShader, text::fmt_float,
};

pub const DEFAULT_BLUR_RADIUS: u32 = 2;

const BLUR_DIRECTION: &str = "u_blurDirection";

#[derive(Clone, Debug, PartialEq)]
pub struct BlurReference {
    pub blur_radius: u32,
    pub options: BlurOptions,
    /// Luma cutoff applied in the first pass when
    /// [`BlurOptions::LUMINANCE_THRESHOLD`] is set.
    pub luminance_threshold: f32,
}

impl Default for BlurReference {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS)
    }
}

impl BlurReference {
    pub fn new(blur_radius: u32) -> Self {
        Self {
            blur_radius,
            options: BlurOptions::empty(),
            luminance_threshold: 0.0,
        }
    }

    pub fn with_linear_filtering(mut self, enabled: bool) -> Self {
        self.options.set(BlurOptions::LINEAR_FILTERING, enabled);
        self
    }

    pub fn with_luminance_threshold(mut self, threshold: Option<f32>) -> Self {
        self.options
            .set(BlurOptions::LUMINANCE_THRESHOLD, threshold.is_some());
        self.luminance_threshold = threshold.unwrap_or(0.0).clamp(0.0, 1.0);
        self
    }

    pub fn blur_params(&self) -> BlurParams {
        compute_blur_params(self.blur_radius, self.options)
    }

    fn pass(&self, dialect: Dialect, params: &BlurParams, direction: [f32; 2], threshold: bool) -> EffectPass {
        let weights = compute_gaussian_weights(params);
        let radius = params.radius as i64;
        let taps: Vec<(f32, f32)> = (-radius..=radius)
            .map(|offset| {
                let weight = weights.standard[offset.unsigned_abs() as usize];
                (offset as f32, weight)
            })
            .collect();
        let threshold = threshold.then_some(self.luminance_threshold);

        let (function, inputs, argument) = match dialect {
            Dialect::Gl => (
                Function::new(
                    "blur",
                    gl_body(&taps, threshold),
                    vec![
                        FunctionInput::new("sampler2D", "previousPass"),
                        FunctionInput::new("vec2", "texCoord"),
                        FunctionInput::new("vec2", "textureSize"),
                        FunctionInput::new("vec2", "blurDirection"),
                    ],
                    "vec4",
                ),
                vec![
                    ("previousPass", "cc_PreviousPassTexture"),
                    ("texCoord", "cc_FragTexCoord1"),
                    ("textureSize", "cc_PreviousPassTextureSize"),
                    ("blurDirection", BLUR_DIRECTION),
                ],
                ShaderArgument::new("vec2", BLUR_DIRECTION, ArgumentQualifier::Buffer),
            ),
            Dialect::Metal => (
                Function::new(
                    "blur",
                    metal_body(&taps, threshold),
                    vec![
                        FunctionInput::new("texture2d<half>", "previousPass"),
                        FunctionInput::new("sampler", "previousPassSampler"),
                        FunctionInput::new("float2", "texCoord"),
                        FunctionInput::new("float2", "blurDirection"),
                    ],
                    "half4",
                ),
                vec![
                    ("previousPass", "cc_PreviousPassTexture"),
                    ("previousPassSampler", "cc_PreviousPassTextureSampler"),
                    ("texCoord", "cc_FragIn.texCoord1"),
                    ("blurDirection", BLUR_DIRECTION),
                ],
                ShaderArgument::new("constant float2&", BLUR_DIRECTION, ArgumentQualifier::Buffer),
            ),
        };

        let call = FunctionCall::new(function.clone(), "blurred", inputs);
        EffectPass::fragment(
            StageShader::single(function, call, Vec::new()).with_arguments(vec![argument]),
            vec![EffectParameter::new(
                BLUR_DIRECTION,
                ParameterValue::Vec2(direction),
            )],
        )
    }
}

const GL_LUMA: &str = "vec3(0.2125, 0.7154, 0.0721)";
const METAL_LUMA: &str = "half3(0.2125, 0.7154, 0.0721)";

fn gl_body(taps: &[(f32, f32)], threshold: Option<f32>) -> String {
    let mut lines = vec![
        "vec2 texelStep = blurDirection / textureSize;".to_string(),
        "vec4 sum = vec4(0.0);".to_string(),
    ];
    if threshold.is_some() {
        lines.push("vec4 s;".to_string());
    }
    for &(offset, weight) in taps {
        let sample = format!(
            "texture2D(previousPass, texCoord + texelStep * {})",
            fmt_float(offset)
        );
        match threshold {
            Some(t) => {
                lines.push(format!("s = {sample};"));
                lines.push(format!(
                    "sum += s * step({}, dot(s.rgb, {GL_LUMA})) * {};",
                    fmt_float(t),
                    fmt_float(weight)
                ));
            }
            None => lines.push(format!("sum += {sample} * {};", fmt_float(weight))),
        }
    }
    lines.push("return sum;".to_string());
    lines.join("\n")
}

fn metal_body(taps: &[(f32, f32)], threshold: Option<f32>) -> String {
    let mut lines = vec![
        "float2 texelStep = blurDirection / float2(previousPass.get_width(), previousPass.get_height());"
            .to_string(),
        "half4 sum = half4(0.0);".to_string(),
    ];
    if threshold.is_some() {
        lines.push("half4 s;".to_string());
    }
    for &(offset, weight) in taps {
        let sample = format!(
            "previousPass.sample(previousPassSampler, texCoord + texelStep * {})",
            fmt_float(offset)
        );
        match threshold {
            Some(t) => {
                lines.push(format!("s = {sample};"));
                lines.push(format!(
                    "sum += s * step(half({}), dot(s.rgb, {METAL_LUMA})) * half({});",
                    fmt_float(t),
                    fmt_float(weight)
                ));
            }
            None => lines.push(format!("sum += {sample} * half({});", fmt_float(weight))),
        }
    }
    lines.push("return sum;".to_string());
    lines.join("\n")
}

impl Effect for BlurReference {
    fn name(&self) -> &str {
        "BlurReference"
    }

    fn passes(&self, dialect: Dialect) -> Vec<EffectPass> {
        if self.blur_radius == 0 {
            return vec![EffectPass::identity()];
        }
        let params = self.blur_params();
        vec![
            self.pass(dialect, &params, [1.0, 0.0], params.luminance_threshold_enabled),
            self.pass(dialect, &params, [0.0, 1.0], false),
        ]
    }

    fn is_stitchable(&self) -> bool {
        self.blur_radius == 0
    }
}
