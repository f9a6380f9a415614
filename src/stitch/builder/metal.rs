use super::{DialectSyntax, ShaderParts};
use crate::stitch::{
    argument::{ArgumentQualifier, ShaderArgument},
    temporary::Initializer,
    text::indent_source,
    types::ShaderStage,
};

const HEADER: &str = "#include <metal_stdlib>\nusing namespace metal;";

const PREVIOUS_PASS_SAMPLE: &str =
    "cc_PreviousPassTexture.sample(cc_PreviousPassTextureSampler, cc_FragIn.texCoord1)";
const MAIN_TEXTURE_SAMPLE: &str = "cc_MainTexture.sample(cc_MainTextureSampler, cc_FragIn.texCoord1)";
const VERTEX_POSITION: &str = "cc_VertexAttributes[cc_VertexId].position";
const DEFAULT_FRAG_COLOR: &str =
    "cc_FragIn.color * cc_MainTexture.sample(cc_MainTextureSampler, cc_FragIn.texCoord1)";

/// Metal shading language rendering.
pub(crate) struct MetalSyntax;

impl DialectSyntax for MetalSyntax {
    fn initializer_expression(&self, initializer: Initializer) -> &'static str {
        match initializer {
            Initializer::VertexAttributes => VERTEX_POSITION,
            Initializer::FragColor => "cc_FragIn.color",
            Initializer::MainTexture => MAIN_TEXTURE_SAMPLE,
            Initializer::PreviousPass => PREVIOUS_PASS_SAMPLE,
            Initializer::Reserved0 => "half4(1.0)",
            Initializer::Reserved1 | Initializer::Reserved2 => PREVIOUS_PASS_SAMPLE,
        }
    }

    fn argument_declaration(&self, argument: &ShaderArgument, location: u32) -> Option<String> {
        let attribute = match argument.qualifier {
            ArgumentQualifier::Buffer => format!("buffer({location})"),
            ArgumentQualifier::Texture => format!("texture({location})"),
            ArgumentQualifier::Sampler => format!("sampler({location})"),
            ArgumentQualifier::StageIn => "stage_in".to_string(),
            ArgumentQualifier::VertexId => "vertex_id".to_string(),
        };
        Some(format!("{} {} [[{}]]", argument.ty, argument.name, attribute))
    }

    fn render(&self, stage: ShaderStage, parts: &ShaderParts<'_>) -> String {
        let mut sections = vec![HEADER.to_string()];
        sections.extend(parts.struct_section());
        sections.extend(parts.function_section());

        let params = parts.argument_declarations.join(",\n    ");
        let mut main_lines: Vec<String> = parts.body.to_vec();
        let signature = match stage {
            ShaderStage::Vertex => {
                main_lines.push("CCFragData cc_FragOut;".to_string());
                main_lines.push(format!(
                    "cc_FragOut.position = {};",
                    parts.output.unwrap_or(VERTEX_POSITION)
                ));
                main_lines.push(
                    "cc_FragOut.texCoord1 = cc_VertexAttributes[cc_VertexId].texCoord1;".to_string(),
                );
                main_lines.push(
                    "cc_FragOut.texCoord2 = cc_VertexAttributes[cc_VertexId].texCoord2;".to_string(),
                );
                main_lines.push(
                    "cc_FragOut.color = saturate(half4(cc_VertexAttributes[cc_VertexId].color));"
                        .to_string(),
                );
                main_lines.push("return cc_FragOut;".to_string());
                format!("vertex CCFragData ShaderVertexFunction(\n    {params})")
            }
            ShaderStage::Fragment => {
                main_lines.push(format!(
                    "return {};",
                    parts.output.unwrap_or(DEFAULT_FRAG_COLOR)
                ));
                format!("fragment half4 ShaderFragmentFunction(\n    {params})")
            }
        };
        sections.push(format!(
            "{signature}\n{{\n{}\n}}",
            indent_source(&main_lines.join("\n"), 1)
        ));

        let mut source = sections.join("\n\n");
        source.push('\n');
        source
    }
}
