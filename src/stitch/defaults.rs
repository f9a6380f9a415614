//! Read-only catalogs of the arguments and structs every stitched shader carries.
//!
//! Tables are built once on first access and never mutated afterwards, so they
//! can be shared freely between concurrent stitch invocations.

use std::{collections::HashSet, sync::LazyLock};

use super::{
    argument::{ArgumentQualifier, ShaderArgument, StructDeclaration},
    types::{Dialect, ShaderStage},
};

static GL_FRAGMENT_ARGUMENTS: LazyLock<Vec<ShaderArgument>> = LazyLock::new(|| {
    vec![
        ShaderArgument::new("sampler2D", "cc_PreviousPassTexture", ArgumentQualifier::Texture),
        ShaderArgument::new("sampler2D", "cc_MainTexture", ArgumentQualifier::Texture),
        ShaderArgument::new("vec2", "cc_PreviousPassTextureSize", ArgumentQualifier::Buffer),
    ]
});

static METAL_VERTEX_ARGUMENTS: LazyLock<Vec<ShaderArgument>> = LazyLock::new(|| {
    vec![
        ShaderArgument::new(
            "const device CCVertex*",
            "cc_VertexAttributes",
            ArgumentQualifier::Buffer,
        ),
        ShaderArgument::new("unsigned int", "cc_VertexId", ArgumentQualifier::VertexId),
    ]
});

static METAL_FRAGMENT_ARGUMENTS: LazyLock<Vec<ShaderArgument>> = LazyLock::new(|| {
    vec![
        ShaderArgument::new("const CCFragData", "cc_FragIn", ArgumentQualifier::StageIn),
        ShaderArgument::new(
            "texture2d<half>",
            "cc_PreviousPassTexture",
            ArgumentQualifier::Texture,
        ),
        ShaderArgument::new("sampler", "cc_PreviousPassTextureSampler", ArgumentQualifier::Sampler),
        ShaderArgument::new("texture2d<half>", "cc_MainTexture", ArgumentQualifier::Texture),
        ShaderArgument::new("sampler", "cc_MainTextureSampler", ArgumentQualifier::Sampler),
    ]
});

static METAL_STRUCTS: LazyLock<Vec<StructDeclaration>> = LazyLock::new(|| {
    vec![
        StructDeclaration::new(
            "CCVertex",
            "float4 position;\nfloat2 texCoord1;\nfloat2 texCoord2;\nfloat4 color;",
        ),
        StructDeclaration::new(
            "CCFragData",
            "float4 position [[position]];\nfloat2 texCoord1;\nfloat2 texCoord2;\nhalf4 color;",
        ),
    ]
});

pub fn default_vertex_arguments(dialect: Dialect) -> &'static [ShaderArgument] {
    match dialect {
        Dialect::Gl => &[],
        Dialect::Metal => &METAL_VERTEX_ARGUMENTS,
    }
}

pub fn default_fragment_arguments(dialect: Dialect) -> &'static [ShaderArgument] {
    match dialect {
        Dialect::Gl => &GL_FRAGMENT_ARGUMENTS,
        Dialect::Metal => &METAL_FRAGMENT_ARGUMENTS,
    }
}

pub fn default_arguments(dialect: Dialect, stage: ShaderStage) -> &'static [ShaderArgument] {
    match stage {
        ShaderStage::Vertex => default_vertex_arguments(dialect),
        ShaderStage::Fragment => default_fragment_arguments(dialect),
    }
}

pub fn default_argument_names(dialect: Dialect, stage: ShaderStage) -> HashSet<&'static str> {
    default_arguments(dialect, stage)
        .iter()
        .map(|a| a.name.as_str())
        .collect()
}

pub fn default_struct_declarations(dialect: Dialect) -> &'static [StructDeclaration] {
    match dialect {
        Dialect::Gl => &[],
        Dialect::Metal => &METAL_STRUCTS,
    }
}

pub fn default_struct_names(dialect: Dialect) -> HashSet<&'static str> {
    default_struct_declarations(dialect)
        .iter()
        .map(|s| s.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        for dialect in [Dialect::Gl, Dialect::Metal] {
            for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
                let args = default_arguments(dialect, stage);
                assert_eq!(args.len(), default_argument_names(dialect, stage).len());
            }
            assert_eq!(
                default_struct_declarations(dialect).len(),
                default_struct_names(dialect).len()
            );
        }
    }

    #[test]
    fn both_dialects_expose_the_previous_pass_texture() {
        for dialect in [Dialect::Gl, Dialect::Metal] {
            assert!(
                default_argument_names(dialect, ShaderStage::Fragment)
                    .contains("cc_PreviousPassTexture")
            );
        }
        assert!(default_struct_names(Dialect::Metal).contains("CCFragData"));
        assert!(default_struct_names(Dialect::Gl).is_empty());
    }
}
