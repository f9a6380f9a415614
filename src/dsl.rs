use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    effects::{BlurReference, Brightness, Contrast, Effect, Saturation, blur::MAX_BLUR_RADIUS},
    stitch::{DEFAULT_MANGLE_PREFIX, Dialect, EffectStack, text::is_identifier_prefix},
};

/// JSON description of the effect chain attached to one renderable.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChainDSL {
    pub version: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default = "default_dialect")]
    pub dialect: Dialect,
    #[serde(default = "default_mangle_prefix")]
    pub mangle_prefix: String,
    #[serde(default)]
    pub effects: Vec<EffectNode>,
}

fn default_dialect() -> Dialect {
    Dialect::Gl
}

fn default_mangle_prefix() -> String {
    DEFAULT_MANGLE_PREFIX.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Metadata {
    pub name: String,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum EffectNode {
    BlurReference {
        blur_radius: u32,
        #[serde(default)]
        linear_filtering: bool,
        #[serde(default)]
        luminance_threshold: Option<f32>,
    },
    Brightness {
        brightness: f32,
    },
    Contrast {
        contrast: f32,
    },
    Saturation {
        saturation: f32,
    },
}

impl EffectNode {
    pub fn to_effect(&self) -> Box<dyn Effect> {
        match self {
            EffectNode::BlurReference {
                blur_radius,
                linear_filtering,
                luminance_threshold,
            } => Box::new(
                BlurReference::new(*blur_radius)
                    .with_linear_filtering(*linear_filtering)
                    .with_luminance_threshold(*luminance_threshold),
            ),
            EffectNode::Brightness { brightness } => Box::new(Brightness::new(*brightness)),
            EffectNode::Contrast { contrast } => Box::new(Contrast::new(*contrast)),
            EffectNode::Saturation { saturation } => Box::new(Saturation::new(*saturation)),
        }
    }
}

impl ChainDSL {
    /// Name used for output files; falls back to `chain`.
    pub fn name(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.name.as_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("chain")
    }
}

pub fn parse_chain(text: &str) -> Result<ChainDSL> {
    let chain: ChainDSL = serde_json::from_str(text).context("failed to parse chain json")?;
    validate_chain(&chain)?;
    Ok(chain)
}

pub fn load_chain_from_path(path: impl AsRef<std::path::Path>) -> Result<ChainDSL> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read chain json at {}", path.display()))?;
    parse_chain(&text).with_context(|| format!("invalid chain at {}", path.display()))
}

pub fn validate_chain(chain: &ChainDSL) -> Result<()> {
    if chain.version.trim().is_empty() {
        bail!("chain version must not be empty");
    }
    if !is_identifier_prefix(&chain.mangle_prefix) {
        bail!(
            "manglePrefix must be a non-empty identifier prefix, got {:?}",
            chain.mangle_prefix
        );
    }
    if let Some(metadata) = chain.metadata.as_ref() {
        let name = metadata.name.as_str();
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            bail!("metadata.name must be a plain file name, got {name:?}");
        }
    }
    for (i, node) in chain.effects.iter().enumerate() {
        if let EffectNode::BlurReference {
            blur_radius,
            luminance_threshold,
            ..
        } = node
        {
            if *blur_radius > MAX_BLUR_RADIUS {
                bail!("effects[{i}]: blurRadius {blur_radius} exceeds the maximum of {MAX_BLUR_RADIUS}");
            }
            if luminance_threshold.is_some_and(|t| !t.is_finite()) {
                bail!("effects[{i}]: luminanceThreshold must be finite");
            }
        }
    }
    Ok(())
}

/// Effect stack for `chain`, using the chain's mangle prefix.
pub fn build_stack(chain: &ChainDSL) -> EffectStack {
    let effects = chain.effects.iter().map(EffectNode::to_effect).collect();
    EffectStack::new(effects).with_prefix(chain.mangle_prefix.clone())
}
