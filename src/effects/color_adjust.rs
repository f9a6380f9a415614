//! Single-pass color adjustments on premultiplied color.

use super::Effect;
use crate::stitch::{
    ArgumentQualifier, Dialect, EffectParameter, EffectPass, Function, FunctionCall,
    FunctionInput, Initializer, ParameterValue, ShaderArgument, StageShader, Temporary,
};

struct Adjustment<'a> {
    function: &'a str,
    argument: &'a str,
    gl_body: &'a str,
    metal_body: &'a str,
}

fn adjustment_pass(adjustment: &Adjustment<'_>, dialect: Dialect, value: f32) -> EffectPass {
    let (color_ty, argument_ty, body) = match dialect {
        Dialect::Gl => ("vec4", "float", adjustment.gl_body),
        Dialect::Metal => ("half4", "constant float&", adjustment.metal_body),
    };
    let function = Function::new(
        adjustment.function,
        body,
        vec![
            FunctionInput::new(color_ty, "inputValue"),
            FunctionInput::new("float", "amount"),
        ],
        color_ty,
    );
    let call = FunctionCall::new(
        function.clone(),
        "adjusted",
        [("inputValue", "tmp"), ("amount", adjustment.argument)],
    );
    let stage = StageShader::single(
        function,
        call,
        vec![Temporary::new(color_ty, "tmp", Initializer::PreviousPass)],
    )
    .with_arguments(vec![ShaderArgument::new(
        argument_ty,
        adjustment.argument,
        ArgumentQualifier::Buffer,
    )]);
    EffectPass::fragment(
        stage,
        vec![EffectParameter::new(
            adjustment.argument,
            ParameterValue::Float(value),
        )],
    )
}

fn condition(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

const BRIGHTNESS: Adjustment<'static> = Adjustment {
    function: "brightnessEffect",
    argument: "u_brightness",
    gl_body: "return vec4(inputValue.rgb + vec3(amount * inputValue.a), inputValue.a);",
    metal_body: "return half4(inputValue.rgb + half3(half(amount) * inputValue.a), inputValue.a);",
};

const CONTRAST: Adjustment<'static> = Adjustment {
    function: "contrastEffect",
    argument: "u_contrast",
    gl_body: "vec3 mid = vec3(0.5 * inputValue.a);\nreturn vec4((inputValue.rgb - mid) * (amount + 1.0) + mid, inputValue.a);",
    metal_body: "half3 mid = half3(0.5 * inputValue.a);\nreturn half4((inputValue.rgb - mid) * half(amount + 1.0) + mid, inputValue.a);",
};

const SATURATION: Adjustment<'static> = Adjustment {
    function: "saturationEffect",
    argument: "u_saturation",
    gl_body: "float luma = dot(inputValue.rgb, vec3(0.2125, 0.7154, 0.0721));\nreturn vec4(mix(vec3(luma), inputValue.rgb, amount + 1.0), inputValue.a);",
    metal_body: "half luma = dot(inputValue.rgb, half3(0.2125, 0.7154, 0.0721));\nreturn half4(mix(half3(luma), inputValue.rgb, half(amount + 1.0)), inputValue.a);",
};

/// Adds `brightness` (in [-1, 1]) to every color channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Brightness {
    pub brightness: f32,
}

impl Brightness {
    pub fn new(brightness: f32) -> Self {
        Self {
            brightness: condition(brightness),
        }
    }
}

impl Effect for Brightness {
    fn name(&self) -> &str {
        "Brightness"
    }

    fn passes(&self, dialect: Dialect) -> Vec<EffectPass> {
        vec![adjustment_pass(&BRIGHTNESS, dialect, self.brightness)]
    }
}

/// Scales color distance from mid gray by `1 + contrast`.
#[derive(Clone, Debug, PartialEq)]
pub struct Contrast {
    pub contrast: f32,
}

impl Contrast {
    pub fn new(contrast: f32) -> Self {
        Self {
            contrast: condition(contrast),
        }
    }
}

impl Effect for Contrast {
    fn name(&self) -> &str {
        "Contrast"
    }

    fn passes(&self, dialect: Dialect) -> Vec<EffectPass> {
        vec![adjustment_pass(&CONTRAST, dialect, self.contrast)]
    }
}

/// Interpolates between luma gray (-1) and doubled saturation (1).
#[derive(Clone, Debug, PartialEq)]
pub struct Saturation {
    pub saturation: f32,
}

impl Saturation {
    pub fn new(saturation: f32) -> Self {
        Self {
            saturation: condition(saturation),
        }
    }
}

impl Effect for Saturation {
    fn name(&self) -> &str {
        "Saturation"
    }

    fn passes(&self, dialect: Dialect) -> Vec<EffectPass> {
        vec![adjustment_pass(&SATURATION, dialect, self.saturation)]
    }
}
