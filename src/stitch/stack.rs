//! Splits an ordered list of effects into render passes and stitches each one.

use log::{debug, warn};

use super::{
    effect_shader::EffectPass,
    error::CompositionError,
    stitcher::{StitchedShader, Stitcher},
    types::Dialect,
};
use crate::effects::Effect;

pub const DEFAULT_MANGLE_PREFIX: &str = "cc_";

/// The effects attached to one renderable, in application order.
#[derive(Debug)]
pub struct EffectStack {
    effects: Vec<Box<dyn Effect>>,
    prefix: String,
}

impl EffectStack {
    pub fn new(effects: Vec<Box<dyn Effect>>) -> Self {
        Self {
            effects,
            prefix: DEFAULT_MANGLE_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Box<dyn Effect>] {
        &self.effects
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Group effect passes into stitch lists.
    ///
    /// Consecutive single-pass stitchable effects share one list; every pass of
    /// any other effect gets a list of its own.
    pub fn stitch_lists(&self, dialect: Dialect) -> Vec<Vec<EffectPass>> {
        let mut lists: Vec<Vec<EffectPass>> = Vec::new();
        let mut pending: Vec<EffectPass> = Vec::new();

        for effect in &self.effects {
            let passes = effect.passes(dialect);
            if passes.is_empty() {
                warn!("[stack] effect {} produced no passes; skipping", effect.name());
                continue;
            }
            if passes.len() == 1 && effect.is_stitchable() {
                pending.extend(passes);
                continue;
            }
            if !pending.is_empty() {
                lists.push(std::mem::take(&mut pending));
            }
            lists.extend(passes.into_iter().map(|pass| vec![pass]));
        }
        if !pending.is_empty() {
            lists.push(pending);
        }
        lists
    }

    /// Stitch every render pass of the stack, in order.
    ///
    /// An empty stack (or one whose effects produce nothing) yields a single
    /// pass-through pass.
    pub fn build(&self, dialect: Dialect) -> Result<Vec<StitchedShader>, CompositionError> {
        let lists = self.stitch_lists(dialect);
        debug!(
            "[stack] {} effects -> {} passes ({dialect})",
            self.effects.len(),
            lists.len().max(1)
        );
        if lists.is_empty() {
            return Ok(vec![Stitcher::new(dialect, &[], &self.prefix, 0, 0).stitch()?]);
        }

        let mut shader_start_index = 0;
        let mut shaders = Vec::with_capacity(lists.len());
        for (stitch_list_index, list) in lists.iter().enumerate() {
            let stitcher = Stitcher::new(
                dialect,
                list,
                &self.prefix,
                stitch_list_index,
                shader_start_index,
            );
            shaders.push(stitcher.stitch()?);
            shader_start_index += list.len();
        }
        Ok(shaders)
    }
}
