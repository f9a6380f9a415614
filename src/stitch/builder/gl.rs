use super::{DialectSyntax, ShaderParts};
use crate::stitch::{
    argument::{ArgumentQualifier, ShaderArgument},
    temporary::Initializer,
    text::indent_source,
    types::ShaderStage,
};

const VERTEX_HEADER: &str = "attribute vec4 cc_Position;
attribute vec2 cc_TexCoord1;
attribute vec2 cc_TexCoord2;
attribute vec4 cc_Color;

varying vec4 cc_FragColor;
varying vec2 cc_FragTexCoord1;
varying vec2 cc_FragTexCoord2;";

const FRAGMENT_HEADER: &str = "#ifdef GL_ES
precision mediump float;
#endif

varying vec4 cc_FragColor;
varying vec2 cc_FragTexCoord1;
varying vec2 cc_FragTexCoord2;";

const PREVIOUS_PASS_SAMPLE: &str = "texture2D(cc_PreviousPassTexture, cc_FragTexCoord1)";
const DEFAULT_POSITION: &str = "cc_Position";
const DEFAULT_FRAG_COLOR: &str = "cc_FragColor * texture2D(cc_MainTexture, cc_FragTexCoord1)";

/// GLSL ES 1.0 rendering.
pub(crate) struct GlSyntax;

impl DialectSyntax for GlSyntax {
    fn initializer_expression(&self, initializer: Initializer) -> &'static str {
        match initializer {
            Initializer::VertexAttributes => "cc_Position",
            Initializer::FragColor => "cc_FragColor",
            Initializer::MainTexture => "texture2D(cc_MainTexture, cc_FragTexCoord1)",
            Initializer::PreviousPass => PREVIOUS_PASS_SAMPLE,
            Initializer::Reserved0 => "vec4(1.0)",
            // Later passes only see the previous pass output.
            Initializer::Reserved1 | Initializer::Reserved2 => PREVIOUS_PASS_SAMPLE,
        }
    }

    fn argument_declaration(&self, argument: &ShaderArgument, _location: u32) -> Option<String> {
        match argument.qualifier {
            ArgumentQualifier::Buffer | ArgumentQualifier::Texture => {
                Some(format!("uniform {} {};", argument.ty, argument.name))
            }
            ArgumentQualifier::Sampler | ArgumentQualifier::StageIn | ArgumentQualifier::VertexId => {
                None
            }
        }
    }

    fn render(&self, stage: ShaderStage, parts: &ShaderParts<'_>) -> String {
        let header = match stage {
            ShaderStage::Vertex => VERTEX_HEADER,
            ShaderStage::Fragment => FRAGMENT_HEADER,
        };
        let mut sections = vec![header.to_string()];
        sections.extend(parts.struct_section());
        if !parts.argument_declarations.is_empty() {
            sections.push(parts.argument_declarations.join("\n"));
        }
        sections.extend(parts.function_section());

        let mut main_lines: Vec<String> = parts.body.to_vec();
        match stage {
            ShaderStage::Vertex => {
                main_lines.push(format!(
                    "gl_Position = {};",
                    parts.output.unwrap_or(DEFAULT_POSITION)
                ));
                main_lines.push("cc_FragColor = clamp(cc_Color, 0.0, 1.0);".to_string());
                main_lines.push("cc_FragTexCoord1 = cc_TexCoord1;".to_string());
                main_lines.push("cc_FragTexCoord2 = cc_TexCoord2;".to_string());
            }
            ShaderStage::Fragment => {
                main_lines.push(format!(
                    "gl_FragColor = {};",
                    parts.output.unwrap_or(DEFAULT_FRAG_COLOR)
                ));
            }
        }
        sections.push(format!(
            "void main()\n{{\n{}\n}}",
            indent_source(&main_lines.join("\n"), 1)
        ));

        let mut source = sections.join("\n\n");
        source.push('\n');
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_parts() -> ShaderParts<'static> {
        ShaderParts {
            structs: &[],
            argument_declarations: &[],
            functions: &[],
            body: &[],
            output: None,
        }
    }

    #[test]
    fn vertex_pass_through_forwards_varyings() {
        let src = GlSyntax.render(ShaderStage::Vertex, &empty_parts());
        assert!(src.starts_with("attribute vec4 cc_Position;"));
        assert!(src.contains("    gl_Position = cc_Position;\n"));
        assert!(src.contains("    cc_FragTexCoord1 = cc_TexCoord1;\n"));
        assert!(src.ends_with("}\n"));
    }

    #[test]
    fn fragment_writes_named_output() {
        let body = vec!["vec4 out = cc_FragColor;".to_string()];
        let parts = ShaderParts {
            body: &body,
            output: Some("out"),
            ..empty_parts()
        };
        let src = GlSyntax.render(ShaderStage::Fragment, &parts);
        assert!(src.contains("precision mediump float;"));
        assert!(src.contains("    vec4 out = cc_FragColor;\n    gl_FragColor = out;"));
    }

    #[test]
    fn promoted_initializers_read_previous_pass() {
        assert_eq!(
            GlSyntax.initializer_expression(Initializer::Reserved2),
            GlSyntax.initializer_expression(Initializer::PreviousPass)
        );
        assert_eq!(
            GlSyntax.initializer_expression(Initializer::Reserved1),
            PREVIOUS_PASS_SAMPLE
        );
    }
}
