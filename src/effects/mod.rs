//! Slide effects: map phase-local progress to sprite transform updates.
//!
//! An [`Effect`] is built once per slide phase through the [`registry`] and evaluated for every
//! frame of that phase. Evaluation is pure: the same progress always yields the same
//! [`TransformDelta`].

pub mod kenburns;
pub mod params;
pub mod registry;
pub mod transition;

pub use kenburns::KenBurns;
pub use params::{EffectParams, ParamValue};
pub use registry::{EffectConstructor, EffectRegistry, EffectRegistryBuilder};
pub use transition::Transition;

use crate::animation::ease::Ease;
use crate::foundation::core::Vec2;
use crate::foundation::math::clamp01;
use crate::mask::MaskSpec;
use crate::scene::model::Phase;
use crate::stage::sprite::Sprite;

/// Canvas facts an effect may depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectContext {
    pub width: f64,
    pub height: f64,
}

impl EffectContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Wipe mask to rasterize for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskRequest {
    pub spec: MaskSpec,
    pub progress: f64,
}

/// Sprite fields to overwrite for one frame. `None` keeps the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformDelta {
    pub offset: Option<Vec2>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub mask: Option<MaskRequest>,
}

impl TransformDelta {
    pub fn apply_to(&self, sprite: &mut Sprite) {
        if let Some(v) = self.offset {
            sprite.offset = v;
        }
        if let Some(v) = self.scale {
            sprite.scale = v;
        }
        if let Some(v) = self.rotation {
            sprite.rotation = v;
        }
        if let Some(v) = self.opacity {
            sprite.opacity = clamp01(v);
        }
    }
}

/// Whether eased progress runs forward (entering) or backward (leaving).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Forward,
    Reverse,
}

impl Playback {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::In | Phase::Hold => Self::Forward,
            Phase::Out => Self::Reverse,
        }
    }
}

/// Effect variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    Static,
    Transition(Transition),
    KenBurns(KenBurns),
}

/// A resolved effect for one slide phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub ease: Ease,
    pub playback: Playback,
}

impl Effect {
    pub fn stationary() -> Self {
        Self {
            kind: EffectKind::Static,
            ease: Ease::Linear,
            playback: Playback::Forward,
        }
    }

    /// Eased progress for a transition; leaving phases run it backwards.
    fn transition_progress(&self, p: f64) -> f64 {
        let e = self.ease.apply(p);
        match self.playback {
            Playback::Forward => e,
            Playback::Reverse => 1.0 - e,
        }
    }

    pub fn evaluate(&self, progress: f64, ctx: &EffectContext) -> TransformDelta {
        match &self.kind {
            EffectKind::Static => TransformDelta::default(),
            EffectKind::Transition(t) => t.evaluate(self.transition_progress(progress), ctx),
            // Pan/zoom always moves forward in time.
            EffectKind::KenBurns(kb) => kb.evaluate(self.ease.apply(progress), ctx),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/effect.rs"]
mod tests;
