//! Merges the shader fragments of an ordered effect list into one program.
//!
//! Each effect's names are mangled with `<prefix><shader index>_`, the chain
//! input of effect `n + 1` is rewired to the output of effect `n`, and the
//! merged stages are handed to a [`ShaderBuilder`] per stage.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use serde::Serialize;

use super::{
    argument::StructDeclaration,
    builder::{ArgumentBinding, ShaderBuilder},
    defaults::default_argument_names,
    effect_shader::{EffectPass, StageShader},
    error::CompositionError,
    function::FunctionCall,
    stack::DEFAULT_MANGLE_PREFIX,
    temporary::Initializer,
    types::{Dialect, ParameterValue, ShaderStage},
};

/// Name prefix applied to every identifier contributed by the effect at
/// global shader index `shader_index`.
pub fn effect_prefix(prefix: &str, shader_index: usize) -> String {
    format!("{prefix}{shader_index}_")
}

/// An effect parameter resolved to the argument name it binds in the stitched shader.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundParameter {
    pub shader_index: usize,
    pub local_name: String,
    /// Argument name as it appears in the rendered source.
    pub name: String,
    pub value: ParameterValue,
}

/// Both rendered stages of one stitched pass and what the renderer needs to bind them.
#[derive(Clone, Debug)]
pub struct StitchedShader {
    pub dialect: Dialect,
    pub vertex: String,
    pub fragment: String,
    pub vertex_bindings: Vec<ArgumentBinding>,
    pub fragment_bindings: Vec<ArgumentBinding>,
    pub structs: Vec<StructDeclaration>,
    pub parameters: Vec<BoundParameter>,
}

impl StitchedShader {
    /// The pass-through program (no effects).
    pub fn pass_through(dialect: Dialect) -> Result<Self, CompositionError> {
        Stitcher::new(dialect, &[], DEFAULT_MANGLE_PREFIX, 0, 0).stitch()
    }
}

/// One stitch invocation over a list of effect passes.
///
/// All counters are supplied by the caller, so independent stitches never
/// share state.
#[derive(Debug)]
pub struct Stitcher<'a> {
    dialect: Dialect,
    passes: &'a [EffectPass],
    prefix: &'a str,
    stitch_list_index: usize,
    shader_start_index: usize,
}

impl<'a> Stitcher<'a> {
    pub fn new(
        dialect: Dialect,
        passes: &'a [EffectPass],
        prefix: &'a str,
        stitch_list_index: usize,
        shader_start_index: usize,
    ) -> Self {
        Self {
            dialect,
            passes,
            prefix,
            stitch_list_index,
            shader_start_index,
        }
    }

    pub fn stitch(&self) -> Result<StitchedShader, CompositionError> {
        debug!(
            "[stitch] list {} dialect={} effects={} first_shader={}",
            self.stitch_list_index,
            self.dialect,
            self.passes.len(),
            self.shader_start_index
        );

        let mut vertex = ShaderBuilder::default_vertex(self.dialect);
        let mut fragment = ShaderBuilder::default_fragment(self.dialect);
        let mut vertex_output: Option<String> = None;
        let mut fragment_output: Option<String> = None;
        let mut parameters = Vec::new();

        let vertex_defaults = default_argument_names(self.dialect, ShaderStage::Vertex);
        let fragment_defaults = default_argument_names(self.dialect, ShaderStage::Fragment);

        for (i, pass) in self.passes.iter().enumerate() {
            let shader_index = self.shader_start_index + i;
            let effect_prefix = effect_prefix(self.prefix, shader_index);

            if let Some(stage) = &pass.shader.vertex {
                let mangled = self
                    .mangle_stage(stage, ShaderStage::Vertex, &effect_prefix, vertex_output.as_deref())
                    .map_err(|e| e.in_effect(i))?;
                if let Some(last) = mangled.calls.last() {
                    vertex_output = Some(last.output_name.clone());
                }
                vertex.append(mangled);
            }
            if let Some(stage) = &pass.shader.fragment {
                let mangled = self
                    .mangle_stage(
                        stage,
                        ShaderStage::Fragment,
                        &effect_prefix,
                        fragment_output.as_deref(),
                    )
                    .map_err(|e| e.in_effect(i))?;
                if let Some(last) = mangled.calls.last() {
                    fragment_output = Some(last.output_name.clone());
                }
                fragment.append(mangled);
            }

            for parameter in &pass.parameters {
                let local = parameter.name.as_str();
                let name = if vertex_defaults.contains(local) || fragment_defaults.contains(local) {
                    local.to_string()
                } else {
                    format!("{effect_prefix}{local}")
                };
                parameters.push(BoundParameter {
                    shader_index,
                    local_name: parameter.name.clone(),
                    name,
                    value: parameter.value,
                });
            }
        }

        let vertex = vertex.build()?;
        let fragment = fragment.build()?;

        let mut structs = fragment.structs;
        let known: HashSet<String> = structs.iter().map(|s| s.name.clone()).collect();
        structs.extend(
            vertex
                .structs
                .into_iter()
                .filter(|s| !known.contains(&s.name)),
        );

        debug!(
            "[stitch] list {} done: vertex_bindings={} fragment_bindings={} parameters={}",
            self.stitch_list_index,
            vertex.bindings.len(),
            fragment.bindings.len(),
            parameters.len()
        );

        Ok(StitchedShader {
            dialect: self.dialect,
            vertex: vertex.source,
            fragment: fragment.source,
            vertex_bindings: vertex.bindings,
            fragment_bindings: fragment.bindings,
            structs,
            parameters,
        })
    }

    /// Rename one effect's stage contribution into the stitched namespace.
    ///
    /// `previous_output` is the mangled output variable of the closest earlier
    /// effect in this list that implemented the same stage.
    fn mangle_stage(
        &self,
        shader: &StageShader,
        stage: ShaderStage,
        effect_prefix: &str,
        previous_output: Option<&str>,
    ) -> Result<StageShader, CompositionError> {
        let mangle = |name: &str| format!("{effect_prefix}{name}");
        let defaults = default_argument_names(self.dialect, stage);
        let chain_input = match stage {
            ShaderStage::Vertex => Initializer::VertexAttributes,
            ShaderStage::Fragment => Initializer::PreviousPass,
        };

        // Local name -> expression it resolves to in the stitched shader.
        let mut resolved: HashMap<&str, String> = HashMap::new();

        let mut temporaries = Vec::with_capacity(shader.temporaries.len());
        for temporary in &shader.temporaries {
            if !temporary.is_valid_for(stage) {
                return Err(CompositionError::InvalidInitializerForStage {
                    temporary: mangle(&temporary.name),
                    initializer: temporary.initializer,
                    stage,
                });
            }
            let is_chain_input = temporary.initializer == chain_input;
            if let (true, Some(previous)) = (is_chain_input, previous_output) {
                resolved.insert(temporary.name.as_str(), previous.to_string());
                continue;
            }
            let initializer = if stage == ShaderStage::Fragment
                && (is_chain_input || self.stitch_list_index > 0)
            {
                temporary.initializer.promote()
            } else {
                temporary.initializer
            };
            let name = mangle(&temporary.name);
            resolved.insert(temporary.name.as_str(), name.clone());
            temporaries.push(temporary.with(name, initializer));
        }

        let arguments = shader
            .arguments
            .iter()
            .map(|argument| {
                if defaults.contains(argument.name.as_str()) {
                    argument.clone()
                } else {
                    let name = mangle(&argument.name);
                    resolved.insert(argument.name.as_str(), name.clone());
                    argument.renamed(name)
                }
            })
            .collect();

        for call in &shader.calls {
            resolved.insert(call.output_name.as_str(), mangle(&call.output_name));
        }

        let functions = shader
            .functions
            .iter()
            .map(|function| function.renamed(mangle(&function.name)))
            .collect();

        let mut calls = Vec::with_capacity(shader.calls.len());
        for call in &shader.calls {
            if !shader.functions.iter().any(|f| f.name == call.function.name) {
                return Err(CompositionError::UndefinedFunction {
                    function: mangle(&call.function.name),
                });
            }
            let inputs = call
                .inputs
                .iter()
                .map(|(formal, actual)| {
                    let actual = resolved
                        .get(actual.as_str())
                        .cloned()
                        .unwrap_or_else(|| actual.clone());
                    (formal.clone(), actual)
                })
                .collect();
            let call = FunctionCall {
                function: call.function.renamed(mangle(&call.function.name)),
                output_name: mangle(&call.output_name),
                inputs,
            };
            call.call_string()?;
            calls.push(call);
        }

        trace!(
            "[stitch] {effect_prefix} {stage}: functions={} calls={} temporaries={} chained={}",
            shader.functions.len(),
            calls.len(),
            temporaries.len(),
            previous_output.is_some()
        );

        Ok(StageShader {
            functions,
            calls,
            temporaries,
            arguments,
            structs: shader.structs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stitch::{
        argument::{ArgumentQualifier, ShaderArgument},
        effect_shader::{EffectParameter, EffectShader},
        error::DeclarationKind,
        function::{Function, FunctionInput},
        temporary::Temporary,
    };

    fn scale_pass(amount_arg: &str) -> EffectPass {
        let f = Function::new(
            "scale",
            "return inputValue * amount;",
            vec![
                FunctionInput::new("vec4", "inputValue"),
                FunctionInput::new("float", "amount"),
            ],
            "vec4",
        );
        let call = FunctionCall::new(
            f.clone(),
            "scaled",
            [("inputValue", "color"), ("amount", amount_arg)],
        );
        let stage = StageShader::single(
            f,
            call,
            vec![Temporary::new("vec4", "color", Initializer::PreviousPass)],
        )
        .with_arguments(vec![ShaderArgument::new(
            "float",
            "u_amount",
            ArgumentQualifier::Buffer,
        )]);
        EffectPass::fragment(
            stage,
            vec![EffectParameter::new("u_amount", ParameterValue::Float(0.5))],
        )
    }

    #[test]
    fn empty_list_is_pass_through() {
        let stitched = Stitcher::new(Dialect::Gl, &[], "x_", 0, 0).stitch().unwrap();
        let defaults = ShaderBuilder::default_fragment(Dialect::Gl).build().unwrap();
        assert_eq!(stitched.fragment, defaults.source);
        assert!(stitched.parameters.is_empty());
    }

    #[test]
    fn single_effect_is_mangled_and_promoted() {
        let passes = [scale_pass("u_amount")];
        let stitched = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 4).stitch().unwrap();
        let src = &stitched.fragment;
        assert!(src.contains("uniform float cc_4_u_amount;"), "{src}");
        assert!(src.contains("vec4 cc_4_scale(vec4 inputValue, float amount)"));
        // First effect has no predecessor: the chain input is promoted.
        assert!(src.contains("vec4 cc_4_color = texture2D(cc_PreviousPassTexture, cc_FragTexCoord1);"));
        assert!(src.contains("vec4 cc_4_scaled = cc_4_scale(cc_4_color, cc_4_u_amount);"));
        assert!(src.contains("gl_FragColor = cc_4_scaled;"));
        assert_eq!(
            stitched.parameters,
            vec![BoundParameter {
                shader_index: 4,
                local_name: "u_amount".to_string(),
                name: "cc_4_u_amount".to_string(),
                value: ParameterValue::Float(0.5),
            }]
        );
    }

    #[test]
    fn second_effect_reads_first_output() {
        let passes = [scale_pass("u_amount"), scale_pass("u_amount")];
        let stitched = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 0).stitch().unwrap();
        let src = &stitched.fragment;
        assert!(src.contains("vec4 cc_1_scaled = cc_1_scale(cc_0_scaled, cc_1_u_amount);"), "{src}");
        assert!(!src.contains("cc_1_color"));
        assert!(src.contains("gl_FragColor = cc_1_scaled;"));
    }

    #[test]
    fn literal_actuals_pass_through_verbatim() {
        let passes = [scale_pass("0.25")];
        let stitched = Stitcher::new(Dialect::Metal, &passes, "cc_", 0, 0).stitch().unwrap();
        assert!(stitched.fragment.contains("cc_0_scale(cc_0_color, 0.25)"));
    }

    #[test]
    fn later_lists_promote_every_fragment_temporary() {
        let f = Function::new(
            "keep",
            "return c;",
            vec![FunctionInput::new("vec4", "c")],
            "vec4",
        );
        let call = FunctionCall::new(f.clone(), "out", [("c", "base")]);
        let stage = StageShader::single(
            f,
            call,
            vec![Temporary::new("vec4", "base", Initializer::FragColor)],
        );
        let passes = [EffectPass::fragment(stage, Vec::new())];

        let first = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 0).stitch().unwrap();
        assert!(first.fragment.contains("vec4 cc_0_base = cc_FragColor;"));
        let later = Stitcher::new(Dialect::Gl, &passes, "cc_", 2, 0).stitch().unwrap();
        assert!(later.fragment.contains("vec4 cc_0_base = vec4(1.0);"));
    }

    #[test]
    fn errors_carry_effect_index() {
        let mut broken = scale_pass("u_amount");
        if let Some(stage) = broken.shader.fragment.as_mut() {
            stage.calls[0].inputs.remove("amount");
        }
        let passes = [scale_pass("u_amount"), broken];
        let err = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 0)
            .stitch()
            .unwrap_err();
        assert_eq!(err.effect_index(), Some(1));
        assert_eq!(
            err.root(),
            &CompositionError::UnboundInput {
                function: "cc_1_scale".to_string(),
                input: "amount".to_string(),
            }
        );
    }

    #[test]
    fn call_to_unlisted_function_fails() {
        let mut pass = scale_pass("u_amount");
        if let Some(stage) = pass.shader.fragment.as_mut() {
            stage.functions.clear();
        }
        let passes = [scale_pass("u_amount"), pass];
        let err = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 0)
            .stitch()
            .unwrap_err();
        assert_eq!(err.effect_index(), Some(1));
        assert_eq!(
            err.root(),
            &CompositionError::UndefinedFunction {
                function: "cc_1_scale".to_string(),
            }
        );
    }

    #[test]
    fn vertex_initializer_in_fragment_is_rejected() {
        let f = Function::new("id", "return p;", vec![FunctionInput::new("vec4", "p")], "vec4");
        let call = FunctionCall::new(f.clone(), "o", [("p", "pos")]);
        let stage = StageShader::single(
            f,
            call,
            vec![Temporary::new("vec4", "pos", Initializer::VertexAttributes)],
        );
        let passes = [EffectPass::fragment(stage, Vec::new())];
        let err = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 0)
            .stitch()
            .unwrap_err();
        assert!(matches!(
            err.root(),
            CompositionError::InvalidInitializerForStage {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn vertex_effects_chain_through_position() {
        let f = Function::new(
            "offset",
            "return p + vec4(0.1, 0.0, 0.0, 0.0);",
            vec![FunctionInput::new("vec4", "p")],
            "vec4",
        );
        let call = FunctionCall::new(f.clone(), "moved", [("p", "pos")]);
        let stage = StageShader::single(
            f,
            call,
            vec![Temporary::new("vec4", "pos", Initializer::VertexAttributes)],
        );
        let pass = EffectPass {
            shader: EffectShader {
                vertex: Some(stage),
                fragment: None,
            },
            parameters: Vec::new(),
        };
        let passes = [pass.clone(), pass];
        let stitched = Stitcher::new(Dialect::Gl, &passes, "cc_", 0, 0).stitch().unwrap();
        assert!(stitched.vertex.contains("vec4 cc_0_pos = cc_Position;"));
        assert!(stitched.vertex.contains("vec4 cc_1_moved = cc_1_offset(cc_0_moved);"));
        assert!(stitched.vertex.contains("gl_Position = cc_1_moved;"));
    }

    #[test]
    fn default_named_arguments_override_defaults_unmangled() {
        let mut pass = scale_pass("cc_PreviousPassTextureSize");
        if let Some(stage) = pass.shader.fragment.as_mut() {
            stage.arguments = vec![ShaderArgument::new(
                "float",
                "cc_PreviousPassTextureSize",
                ArgumentQualifier::Buffer,
            )];
        }
        let stitched = Stitcher::new(Dialect::Gl, &[pass], "cc_", 0, 0).stitch().unwrap();
        assert!(stitched.fragment.contains("uniform float cc_PreviousPassTextureSize;"));
        assert!(!stitched.fragment.contains("uniform vec2 cc_PreviousPassTextureSize;"));
    }

    #[test]
    fn conflicting_struct_between_effects_fails() {
        let mut a = scale_pass("u_amount");
        let mut b = scale_pass("u_amount");
        if let Some(stage) = a.shader.fragment.as_mut() {
            stage.structs = vec![StructDeclaration::new("Tint", "float r;")];
        }
        if let Some(stage) = b.shader.fragment.as_mut() {
            stage.structs = vec![StructDeclaration::new("Tint", "float g;")];
        }
        let err = Stitcher::new(Dialect::Metal, &[a, b], "cc_", 0, 0)
            .stitch()
            .unwrap_err();
        assert_eq!(
            err,
            CompositionError::NameCollision {
                kind: DeclarationKind::Struct,
                name: "Tint".to_string(),
            }
        );
    }
}
