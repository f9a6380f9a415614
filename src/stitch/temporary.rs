//! Temporary variables seeded from a fixed set of initializers.

use super::types::{Dialect, ShaderStage};

/// Distance between a base fragment initializer and its reserved counterpart.
pub const RESERVE_OFFSET: u32 = 8;

/// Semantic source of a temporary's initial value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Initializer {
    /// Vertex position attribute.
    VertexAttributes,
    /// Interpolated vertex color.
    FragColor,
    /// Main texture sampled at the primary texture coordinate.
    MainTexture,
    /// Output of the previous render pass sampled at the primary texture coordinate.
    PreviousPass,
    /// Promoted [`Initializer::FragColor`].
    Reserved0,
    /// Promoted [`Initializer::MainTexture`].
    Reserved1,
    /// Promoted [`Initializer::PreviousPass`].
    Reserved2,
}

impl Initializer {
    /// Stable numeric code; reserved kinds sit `RESERVE_OFFSET` above their base.
    pub fn code(self) -> u32 {
        match self {
            Initializer::VertexAttributes => 0,
            Initializer::FragColor => 1,
            Initializer::MainTexture => 2,
            Initializer::PreviousPass => 3,
            Initializer::Reserved0 => 1 + RESERVE_OFFSET,
            Initializer::Reserved1 => 2 + RESERVE_OFFSET,
            Initializer::Reserved2 => 3 + RESERVE_OFFSET,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        [
            Initializer::VertexAttributes,
            Initializer::FragColor,
            Initializer::MainTexture,
            Initializer::PreviousPass,
            Initializer::Reserved0,
            Initializer::Reserved1,
            Initializer::Reserved2,
        ]
        .into_iter()
        .find(|init| init.code() == code)
    }

    /// Map a base fragment initializer to its reserved counterpart.
    ///
    /// Reserved and vertex initializers map to themselves, so promotion only
    /// ever moves forward.
    pub fn promote(self) -> Self {
        match self {
            Initializer::FragColor => Initializer::Reserved0,
            Initializer::MainTexture => Initializer::Reserved1,
            Initializer::PreviousPass => Initializer::Reserved2,
            other => other,
        }
    }

    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Initializer::Reserved0 | Initializer::Reserved1 | Initializer::Reserved2
        )
    }

    pub fn is_valid_for_vertex_shader(self) -> bool {
        matches!(self, Initializer::VertexAttributes)
    }

    pub fn is_valid_for_fragment_shader(self) -> bool {
        !self.is_valid_for_vertex_shader()
    }

    pub fn is_valid_for(self, stage: ShaderStage) -> bool {
        match stage {
            ShaderStage::Vertex => self.is_valid_for_vertex_shader(),
            ShaderStage::Fragment => self.is_valid_for_fragment_shader(),
        }
    }
}

/// A typed intermediate value declared at the top of a shader's main body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Temporary {
    pub ty: String,
    pub name: String,
    pub initializer: Initializer,
}

impl Temporary {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, initializer: Initializer) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            initializer,
        }
    }

    /// `type name = <initializer expression>;` in the given dialect.
    pub fn declaration(&self, dialect: Dialect) -> String {
        format!(
            "{} {} = {};",
            self.ty,
            self.name,
            dialect.syntax().initializer_expression(self.initializer)
        )
    }

    pub fn is_valid_for_vertex_shader(&self) -> bool {
        self.initializer.is_valid_for_vertex_shader()
    }

    pub fn is_valid_for_fragment_shader(&self) -> bool {
        self.initializer.is_valid_for_fragment_shader()
    }

    pub fn is_valid_for(&self, stage: ShaderStage) -> bool {
        self.initializer.is_valid_for(stage)
    }

    pub(crate) fn with(&self, name: String, initializer: Initializer) -> Self {
        Self {
            ty: self.ty.clone(),
            name,
            initializer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Initializer; 7] = [
        Initializer::VertexAttributes,
        Initializer::FragColor,
        Initializer::MainTexture,
        Initializer::PreviousPass,
        Initializer::Reserved0,
        Initializer::Reserved1,
        Initializer::Reserved2,
    ];

    #[test]
    fn promotion_adds_reserve_offset() {
        for base in [
            Initializer::FragColor,
            Initializer::MainTexture,
            Initializer::PreviousPass,
        ] {
            let promoted = base.promote();
            assert!(promoted.is_reserved());
            assert_eq!(promoted.code(), base.code() + RESERVE_OFFSET);
        }
    }

    #[test]
    fn promotion_never_cycles_back() {
        for init in ALL {
            let once = init.promote();
            let twice = once.promote();
            assert_eq!(once, twice);
            if init.is_valid_for_fragment_shader() && !init.is_reserved() {
                assert_ne!(twice, init);
            }
        }
    }

    #[test]
    fn codes_round_trip() {
        for init in ALL {
            assert_eq!(Initializer::from_code(init.code()), Some(init));
        }
        assert_eq!(Initializer::from_code(RESERVE_OFFSET), None);
    }

    #[test]
    fn stage_legality_is_dialect_independent() {
        for init in ALL {
            let gl = Temporary::new("vec4", "t", init);
            let metal = Temporary::new("half4", "t", init);
            assert_eq!(gl.is_valid_for_vertex_shader(), metal.is_valid_for_vertex_shader());
            assert_eq!(
                gl.is_valid_for_fragment_shader(),
                metal.is_valid_for_fragment_shader()
            );
            assert_ne!(
                init.is_valid_for(ShaderStage::Vertex),
                init.is_valid_for(ShaderStage::Fragment)
            );
        }
    }

    #[test]
    fn declarations_differ_only_in_initializer_syntax() {
        let t = Temporary::new("vec4", "tmp", Initializer::MainTexture);
        assert_eq!(
            t.declaration(Dialect::Gl),
            "vec4 tmp = texture2D(cc_MainTexture, cc_FragTexCoord1);"
        );
        let t = Temporary::new("half4", "tmp", Initializer::FragColor);
        assert_eq!(t.declaration(Dialect::Metal), "half4 tmp = cc_FragIn.color;");
    }

    #[test]
    fn reserved_color_is_neutral() {
        let t = Temporary::new("vec4", "c", Initializer::Reserved0);
        assert_eq!(t.declaration(Dialect::Gl), "vec4 c = vec4(1.0);");
    }
}
