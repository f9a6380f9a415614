//! The per-effect shader fragments handed to the stitcher.

use super::{
    argument::{ShaderArgument, StructDeclaration},
    function::{Function, FunctionCall},
    temporary::Temporary,
    types::ParameterValue,
};

/// Everything one effect contributes to a single shader stage.
///
/// Names are local to the effect; the stitcher mangles them.
#[derive(Clone, Debug, Default)]
pub struct StageShader {
    pub functions: Vec<Function>,
    pub calls: Vec<FunctionCall>,
    pub temporaries: Vec<Temporary>,
    pub arguments: Vec<ShaderArgument>,
    pub structs: Vec<StructDeclaration>,
}

impl StageShader {
    /// The common single-function shape: one function, one call, its temporaries.
    pub fn single(function: Function, call: FunctionCall, temporaries: Vec<Temporary>) -> Self {
        Self {
            functions: vec![function],
            calls: vec![call],
            temporaries,
            ..Default::default()
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<ShaderArgument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_structs(mut self, structs: Vec<StructDeclaration>) -> Self {
        self.structs = structs;
        self
    }
}

/// Vertex and fragment contributions of one effect pass.
///
/// A missing stage means the effect passes that stage through untouched.
#[derive(Clone, Debug, Default)]
pub struct EffectShader {
    pub vertex: Option<StageShader>,
    pub fragment: Option<StageShader>,
}

/// A named value for one of the pass's arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectParameter {
    /// Local (unmangled) argument name.
    pub name: String,
    pub value: ParameterValue,
}

impl EffectParameter {
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One render pass worth of shader fragments plus the values its arguments take.
#[derive(Clone, Debug, Default)]
pub struct EffectPass {
    pub shader: EffectShader,
    pub parameters: Vec<EffectParameter>,
}

impl EffectPass {
    /// A pass that leaves both stages untouched.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn fragment(stage: StageShader, parameters: Vec<EffectParameter>) -> Self {
        Self {
            shader: EffectShader {
                vertex: None,
                fragment: Some(stage),
            },
            parameters,
        }
    }
}
