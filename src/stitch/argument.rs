//! External shader bindings (arguments) and named struct declarations.

use serde::Serialize;

use super::types::Dialect;

/// How an argument is bound by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentQualifier {
    Buffer,
    Texture,
    Sampler,
    StageIn,
    VertexId,
}

impl ArgumentQualifier {
    /// Index of the slot space this qualifier allocates from, if it has one.
    ///
    /// Buffers, textures and samplers are numbered independently.
    pub(crate) fn slot_class(self) -> Option<usize> {
        match self {
            ArgumentQualifier::Buffer => Some(0),
            ArgumentQualifier::Texture => Some(1),
            ArgumentQualifier::Sampler => Some(2),
            ArgumentQualifier::StageIn | ArgumentQualifier::VertexId => None,
        }
    }

    pub fn has_slot(self) -> bool {
        self.slot_class().is_some()
    }
}

pub(crate) const SLOT_CLASS_COUNT: usize = 3;

/// An external binding passed into a shader stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderArgument {
    pub ty: String,
    pub name: String,
    pub qualifier: ArgumentQualifier,
}

impl ShaderArgument {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, qualifier: ArgumentQualifier) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            qualifier,
        }
    }

    /// Declaration text for this argument bound at `location`.
    ///
    /// Returns `None` when the dialect has no declaration for the qualifier
    /// (GL binds samplers through texture units and has built-in stage IO).
    pub fn declaration_at_location(&self, dialect: Dialect, location: u32) -> Option<String> {
        dialect.syntax().argument_declaration(self, location)
    }

    pub(crate) fn renamed(&self, name: String) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }
}

/// A named aggregate type usable as an argument type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StructDeclaration {
    pub name: String,
    /// Member list, one `type name;` per line.
    pub body: String,
}

impl StructDeclaration {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    pub fn declaration(&self) -> String {
        format!(
            "struct {}\n{{\n{}\n}};",
            self.name,
            super::text::indent_source(&self.body, 1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metal_declarations_embed_slot() {
        let buffer = ShaderArgument::new("constant float2&", "u_dir", ArgumentQualifier::Buffer);
        assert_eq!(
            buffer.declaration_at_location(Dialect::Metal, 3).as_deref(),
            Some("constant float2& u_dir [[buffer(3)]]")
        );
        let tex = ShaderArgument::new("texture2d<half>", "t", ArgumentQualifier::Texture);
        assert_eq!(
            tex.declaration_at_location(Dialect::Metal, 1).as_deref(),
            Some("texture2d<half> t [[texture(1)]]")
        );
        let stage_in = ShaderArgument::new("const CCFragData", "cc_FragIn", ArgumentQualifier::StageIn);
        assert_eq!(
            stage_in.declaration_at_location(Dialect::Metal, 7).as_deref(),
            Some("const CCFragData cc_FragIn [[stage_in]]")
        );
    }

    #[test]
    fn gl_declares_only_uniform_backed_arguments() {
        let buffer = ShaderArgument::new("float", "u_amount", ArgumentQualifier::Buffer);
        assert_eq!(
            buffer.declaration_at_location(Dialect::Gl, 0).as_deref(),
            Some("uniform float u_amount;")
        );
        let sampler = ShaderArgument::new("sampler", "s", ArgumentQualifier::Sampler);
        assert_eq!(sampler.declaration_at_location(Dialect::Gl, 0), None);
    }

    #[test]
    fn struct_declaration_text() {
        let s = StructDeclaration::new("Light", "float3 position;\nhalf4 color;");
        assert_eq!(
            s.declaration(),
            "struct Light\n{\n    float3 position;\n    half4 color;\n};"
        );
    }

    #[test]
    fn slot_classes_are_distinct() {
        assert!(ArgumentQualifier::Buffer.has_slot());
        assert!(!ArgumentQualifier::VertexId.has_slot());
        assert_ne!(
            ArgumentQualifier::Texture.slot_class(),
            ArgumentQualifier::Sampler.slot_class()
        );
    }
}
