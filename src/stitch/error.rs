//! Composition errors raised while stitching and building shader sources.

use std::fmt;

use thiserror::Error;

use super::{temporary::Initializer, types::ShaderStage};

/// What kind of declaration a name collision was detected on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Argument,
    Struct,
    Function,
    /// Temporaries and call outputs share one variable namespace.
    Variable,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclarationKind::Argument => "argument",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Function => "function",
            DeclarationKind::Variable => "variable",
        })
    }
}

/// Structural failure detected before any source text is handed out.
///
/// Composition is deterministic, so none of these are worth retrying.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CompositionError {
    #[error("{kind} `{name}` is declared more than once with conflicting definitions")]
    NameCollision { kind: DeclarationKind, name: String },

    #[error("call to `{function}` has no binding for input `{input}`")]
    UnboundInput { function: String, input: String },

    #[error("call to `{function}`, which is not defined in the shader")]
    UndefinedFunction { function: String },

    #[error(
        "temporary `{temporary}` uses initializer {initializer:?}, which is not available in the {stage} stage"
    )]
    InvalidInitializerForStage {
        temporary: String,
        initializer: Initializer,
        stage: ShaderStage,
    },

    #[error("effect {index}: {source}")]
    InEffect {
        index: usize,
        #[source]
        source: Box<CompositionError>,
    },
}

impl CompositionError {
    /// Attach the index of the effect that produced this error.
    pub fn in_effect(self, index: usize) -> Self {
        CompositionError::InEffect {
            index,
            source: Box::new(self),
        }
    }

    /// The underlying error with any effect context removed.
    pub fn root(&self) -> &CompositionError {
        match self {
            CompositionError::InEffect { source, .. } => source.root(),
            other => other,
        }
    }

    /// Index of the effect this error was attributed to, if any.
    pub fn effect_index(&self) -> Option<usize> {
        match self {
            CompositionError::InEffect { index, .. } => Some(*index),
            _ => None,
        }
    }
}
