//! Effect shader composition.
//!
//! Effects describe their shader contribution as a small IR (functions, calls,
//! temporaries, arguments and structs). The [`Stitcher`] mangles and chains
//! the contributions of an effect list and the [`ShaderBuilder`] renders the
//! merged result as GL or Metal source.

pub mod argument;
pub mod builder;
pub mod defaults;
pub mod effect_shader;
pub mod error;
pub mod function;
pub mod stack;
pub mod stitcher;
pub mod temporary;
pub(crate) mod text;
pub mod types;

pub use argument::{ArgumentQualifier, ShaderArgument, StructDeclaration};
pub use builder::{ArgumentBinding, BuiltShader, ShaderBuilder};
pub use effect_shader::{EffectParameter, EffectPass, EffectShader, StageShader};
pub use error::{CompositionError, DeclarationKind};
pub use function::{Function, FunctionCall, FunctionInput};
pub use stack::{DEFAULT_MANGLE_PREFIX, EffectStack};
pub use stitcher::{BoundParameter, StitchedShader, Stitcher, effect_prefix};
pub use temporary::{Initializer, RESERVE_OFFSET, Temporary};
pub use types::{Dialect, ParameterValue, ShaderStage};
