use std::path::PathBuf;

use effect_stitcher::{
    dsl,
    stitch::{Dialect, StitchedShader},
};

fn chain_case(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
        .join("chains")
        .join(name)
}

#[test]
fn basic_chain_splits_around_the_blur() {
    let chain = dsl::load_chain_from_path(chain_case("basic.json")).unwrap();
    assert_eq!(chain.name(), "basic");
    assert_eq!(chain.dialect, Dialect::Gl);

    let shaders = dsl::build_stack(&chain).build(chain.dialect).unwrap();
    // brightness + saturation | blur h | blur v | contrast
    assert_eq!(shaders.len(), 4);

    let names: Vec<Vec<&str>> = shaders
        .iter()
        .map(|s| s.parameters.iter().map(|p| p.name.as_str()).collect())
        .collect();
    assert_eq!(
        names,
        vec![
            vec!["cc_0_u_brightness", "cc_1_u_saturation"],
            vec!["cc_2_u_blurDirection"],
            vec!["cc_3_u_blurDirection"],
            vec!["cc_4_u_contrast"],
        ]
    );

    assert!(shaders[0].fragment.contains("gl_FragColor = cc_1_adjusted;"));
    assert!(shaders[1].fragment.contains("uniform vec2 cc_2_u_blurDirection;"));
    assert!(shaders[1].fragment.contains("cc_2_blur(cc_PreviousPassTexture, cc_FragTexCoord1, cc_PreviousPassTextureSize, cc_2_u_blurDirection)"));
}

#[test]
fn identity_blur_chain_is_pass_through() {
    let chain = dsl::load_chain_from_path(chain_case("identity_blur.json")).unwrap();
    assert_eq!(chain.dialect, Dialect::Metal);
    assert_eq!(chain.mangle_prefix, "cc_");

    let shaders = dsl::build_stack(&chain).build(chain.dialect).unwrap();
    let default = StitchedShader::pass_through(Dialect::Metal).unwrap();
    assert_eq!(shaders.len(), 1);
    assert_eq!(shaders[0].fragment, default.fragment);
    assert!(shaders[0].parameters.is_empty());
}

#[test]
fn missing_chain_file_reports_the_path() {
    let err = dsl::load_chain_from_path(chain_case("does_not_exist.json")).unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.json"));
}
