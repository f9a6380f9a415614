//! Core type definitions shared by the shader IR, the builders and the stitcher.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::builder::{DialectSyntax, gl::GlSyntax, metal::MetalSyntax};

/// Shading-language text target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// GLSL ES 1.0 style source (`attribute` / `varying` / `gl_FragColor`).
    Gl,
    /// Metal shading language source.
    Metal,
}

impl Dialect {
    /// File extension used when writing sources of this dialect to disk.
    pub fn file_extension(self) -> &'static str {
        match self {
            Dialect::Gl => "glsl",
            Dialect::Metal => "metal",
        }
    }

    pub(crate) fn syntax(self) -> &'static dyn DialectSyntax {
        match self {
            Dialect::Gl => &GlSyntax,
            Dialect::Metal => &MetalSyntax,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Gl => "gl",
            Dialect::Metal => "metal",
        })
    }
}

/// Programmable pipeline stage a shader source is generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// CPU-side value an effect supplies for one of its shader arguments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParameterValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

impl ParameterValue {
    /// Raw bytes as they would be uploaded into a uniform/buffer slot.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ParameterValue::Float(v) => bytemuck::bytes_of(v),
            ParameterValue::Vec2(v) => bytemuck::cast_slice(v),
            ParameterValue::Vec4(v) => bytemuck::cast_slice(v),
        }
    }
}
