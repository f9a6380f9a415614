//! Shader source assembly.
//!
//! [`ShaderBuilder`] owns the ordered functions, calls, temporaries, arguments
//! and structs of one shader stage and renders them into a complete source
//! string. Everything dialect specific sits behind the `DialectSyntax` trait:
//! - `gl`: GLSL ES 1.0 style output
//! - `metal`: Metal shading language output

pub(crate) mod gl;
pub(crate) mod metal;

use std::collections::HashSet;

use serde::Serialize;

use super::{
    argument::{ArgumentQualifier, SLOT_CLASS_COUNT, ShaderArgument, StructDeclaration},
    defaults::{default_arguments, default_struct_declarations},
    effect_shader::StageShader,
    error::{CompositionError, DeclarationKind},
    function::{Function, FunctionCall},
    temporary::{Initializer, Temporary},
    types::{Dialect, ShaderStage},
};

/// Dialect-specific rendering over the shared IR.
pub(crate) trait DialectSyntax {
    fn initializer_expression(&self, initializer: Initializer) -> &'static str;

    fn argument_declaration(&self, argument: &ShaderArgument, location: u32) -> Option<String>;

    fn render(&self, stage: ShaderStage, parts: &ShaderParts<'_>) -> String;
}

/// Validated, merged pieces of one shader ready for rendering.
pub(crate) struct ShaderParts<'a> {
    pub structs: &'a [StructDeclaration],
    pub argument_declarations: &'a [String],
    pub functions: &'a [Function],
    /// Temporary declarations followed by call statements.
    pub body: &'a [String],
    /// Variable written back to position / color; `None` means pass-through.
    pub output: Option<&'a str>,
}

impl ShaderParts<'_> {
    pub(crate) fn struct_section(&self) -> Option<String> {
        (!self.structs.is_empty()).then(|| {
            self.structs
                .iter()
                .map(StructDeclaration::declaration)
                .collect::<Vec<_>>()
                .join("\n\n")
        })
    }

    pub(crate) fn function_section(&self) -> Option<String> {
        (!self.functions.is_empty()).then(|| {
            self.functions
                .iter()
                .map(Function::definition)
                .collect::<Vec<_>>()
                .join("\n\n")
        })
    }
}

/// A resource binding the renderer has to supply at draw time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArgumentBinding {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub qualifier: ArgumentQualifier,
    /// Slot within the qualifier's slot space; `None` for stage IO.
    pub slot: Option<u32>,
}

/// Rendered source of one stage plus the metadata needed to bind it.
#[derive(Clone, Debug)]
pub struct BuiltShader {
    pub dialect: Dialect,
    pub stage: ShaderStage,
    pub source: String,
    pub bindings: Vec<ArgumentBinding>,
    pub structs: Vec<StructDeclaration>,
}

/// Assembles one shader stage from IR.
#[derive(Clone, Debug)]
pub struct ShaderBuilder {
    pub dialect: Dialect,
    pub stage: ShaderStage,
    pub functions: Vec<Function>,
    pub calls: Vec<FunctionCall>,
    pub temporaries: Vec<Temporary>,
    pub arguments: Vec<ShaderArgument>,
    pub structs: Vec<StructDeclaration>,
}

impl ShaderBuilder {
    /// An empty builder; building it yields the default pass-through shader.
    pub fn new(dialect: Dialect, stage: ShaderStage) -> Self {
        Self {
            dialect,
            stage,
            functions: Vec::new(),
            calls: Vec::new(),
            temporaries: Vec::new(),
            arguments: Vec::new(),
            structs: Vec::new(),
        }
    }

    pub fn default_vertex(dialect: Dialect) -> Self {
        Self::new(dialect, ShaderStage::Vertex)
    }

    pub fn default_fragment(dialect: Dialect) -> Self {
        Self::new(dialect, ShaderStage::Fragment)
    }

    /// Append one effect's (already mangled) stage contribution.
    pub fn append(&mut self, stage: StageShader) {
        self.functions.extend(stage.functions);
        self.calls.extend(stage.calls);
        self.temporaries.extend(stage.temporaries);
        self.arguments.extend(stage.arguments);
        self.structs.extend(stage.structs);
    }

    pub fn build(&self) -> Result<BuiltShader, CompositionError> {
        let structs = merge_by_name(
            default_struct_declarations(self.dialect),
            &self.structs,
            DeclarationKind::Struct,
            |s| s.name.as_str(),
        )?;
        let arguments = merge_by_name(
            default_arguments(self.dialect, self.stage),
            &self.arguments,
            DeclarationKind::Argument,
            |a| a.name.as_str(),
        )?;
        let functions = merge_by_name(&[], &self.functions, DeclarationKind::Function, |f| {
            f.name.as_str()
        })?;

        let bindings = assign_slots(&arguments);
        let argument_declarations: Vec<String> = arguments
            .iter()
            .zip(&bindings)
            .filter_map(|(arg, binding)| {
                arg.declaration_at_location(self.dialect, binding.slot.unwrap_or(0))
            })
            .collect();

        let mut variables: HashSet<&str> = HashSet::new();
        let mut body: Vec<String> = Vec::with_capacity(self.temporaries.len() + self.calls.len());
        for temporary in &self.temporaries {
            if !temporary.is_valid_for(self.stage) {
                return Err(CompositionError::InvalidInitializerForStage {
                    temporary: temporary.name.clone(),
                    initializer: temporary.initializer,
                    stage: self.stage,
                });
            }
            if !variables.insert(temporary.name.as_str()) {
                return Err(CompositionError::NameCollision {
                    kind: DeclarationKind::Variable,
                    name: temporary.name.clone(),
                });
            }
            body.push(temporary.declaration(self.dialect));
        }
        for call in &self.calls {
            if !functions.iter().any(|f| f.name == call.function.name) {
                return Err(CompositionError::UndefinedFunction {
                    function: call.function.name.clone(),
                });
            }
            if !variables.insert(call.output_name.as_str()) {
                return Err(CompositionError::NameCollision {
                    kind: DeclarationKind::Variable,
                    name: call.output_name.clone(),
                });
            }
            body.push(call.statement()?);
        }

        let parts = ShaderParts {
            structs: &structs,
            argument_declarations: &argument_declarations,
            functions: &functions,
            body: &body,
            output: self.calls.last().map(|c| c.output_name.as_str()),
        };
        let source = self.dialect.syntax().render(self.stage, &parts);

        Ok(BuiltShader {
            dialect: self.dialect,
            stage: self.stage,
            source,
            bindings,
            structs,
        })
    }
}

/// Merge `extra` into `defaults` by name.
///
/// The first entry named like a default replaces it in place. Any later entry
/// with a name already present is dropped when identical and rejected otherwise.
fn merge_by_name<T, F>(
    defaults: &[T],
    extra: &[T],
    kind: DeclarationKind,
    name_of: F,
) -> Result<Vec<T>, CompositionError>
where
    T: Clone + PartialEq,
    F: Fn(&T) -> &str,
{
    let mut merged: Vec<T> = defaults.to_vec();
    let mut overridden: HashSet<&str> = HashSet::new();
    for item in extra {
        let name = name_of(item);
        match merged.iter().position(|m| name_of(m) == name) {
            None => merged.push(item.clone()),
            Some(i) => {
                let is_default = defaults.iter().any(|d| name_of(d) == name);
                if is_default && overridden.insert(name) {
                    merged[i] = item.clone();
                } else if merged[i] != *item {
                    return Err(CompositionError::NameCollision {
                        kind,
                        name: name.to_string(),
                    });
                }
            }
        }
    }
    Ok(merged)
}

fn assign_slots(arguments: &[ShaderArgument]) -> Vec<ArgumentBinding> {
    let mut next = [0u32; SLOT_CLASS_COUNT];
    arguments
        .iter()
        .map(|arg| {
            let slot = arg.qualifier.slot_class().map(|class| {
                let slot = next[class];
                next[class] += 1;
                slot
            });
            ArgumentBinding {
                name: arg.name.clone(),
                ty: arg.ty.clone(),
                qualifier: arg.qualifier,
                slot,
            }
        })
        .collect()
}
