use crate::animation::ease::Ease;
use crate::effects::kenburns::KenBurns;
use crate::effects::params::EffectParams;
use crate::effects::transition::{self, Transition};
use crate::effects::{Effect, EffectKind, Playback};
use crate::foundation::core::Direction;
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::mask::Shape;
use crate::scene::model::{EffectSpec, Phase};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Builds an [`Effect`] for a phase from its parameters.
pub type EffectConstructor = fn(Phase, &EffectParams) -> SlidewaveResult<Effect>;

/// Immutable name-to-constructor table.
#[derive(Clone, Debug)]
pub struct EffectRegistry {
    entries: HashMap<String, EffectConstructor>,
}

impl EffectRegistry {
    /// Process-wide registry holding the built-in effects.
    pub fn global() -> &'static EffectRegistry {
        static GLOBAL: OnceLock<EffectRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| EffectRegistryBuilder::with_builtins().build())
    }

    pub fn builder() -> EffectRegistryBuilder {
        EffectRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<EffectConstructor> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Sorted effect names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `spec` for `phase`. Unknown names and bad parameters are validation errors.
    pub fn resolve(&self, phase: Phase, spec: &EffectSpec) -> SlidewaveResult<Effect> {
        let ctor = self.get(&spec.effect).ok_or_else(|| {
            SlidewaveError::validation(format!("unknown effect '{}'", spec.effect))
        })?;
        ctor(phase, &spec.params).map_err(|e| match e {
            SlidewaveError::Validation(msg) => {
                SlidewaveError::validation(format!("effect '{}': {msg}", spec.effect))
            }
            other => other,
        })
    }
}

/// Collects constructors before the registry is frozen.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistryBuilder {
    entries: HashMap<String, EffectConstructor>,
}

impl EffectRegistryBuilder {
    pub fn with_builtins() -> Self {
        let mut b = Self::default();
        for (name, ctor) in builtins() {
            b.entries.insert(name.to_owned(), ctor);
        }
        b
    }

    /// Add `name`; fails if it is already registered.
    pub fn register(
        mut self,
        name: impl Into<String>,
        ctor: EffectConstructor,
    ) -> SlidewaveResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SlidewaveError::validation("effect name must be non-empty"));
        }
        if self.entries.contains_key(&name) {
            return Err(SlidewaveError::validation(format!(
                "effect '{name}' is already registered"
            )));
        }
        self.entries.insert(name, ctor);
        Ok(self)
    }

    pub fn build(self) -> EffectRegistry {
        EffectRegistry {
            entries: self.entries,
        }
    }
}

fn builtins() -> [(&'static str, EffectConstructor); 23] {
    [
        ("none", stationary),
        ("static", stationary),
        ("fade", |ph, p| transition_effect(ph, p, transition::fade(p)?)),
        ("rotate", |ph, p| transition_effect(ph, p, transition::rotate(p)?)),
        ("slide", |ph, p| transition_effect(ph, p, transition::slide(p)?)),
        ("zoom", |ph, p| transition_effect(ph, p, transition::zoom(p)?)),
        ("wipe_circle", |ph, p| {
            let t = transition::wipe(p, &[], |_| Ok(Shape::Circle))?;
            transition_effect(ph, p, t)
        }),
        ("wipe_diamond", |ph, p| {
            let t = transition::wipe(p, &[], |_| Ok(Shape::Diamond))?;
            transition_effect(ph, p, t)
        }),
        ("wipe_rect", |ph, p| {
            let t = transition::wipe(p, &["direction"], transition::rect_shape)?;
            transition_effect(ph, p, t)
        }),
        ("wipe_triangle", |ph, p| {
            let t = transition::wipe(p, &[], |_| Ok(Shape::Triangle))?;
            transition_effect(ph, p, t)
        }),
        ("wipe_star", |ph, p| {
            let t = transition::wipe(p, &["inner_ratio"], transition::star_shape)?;
            transition_effect(ph, p, t)
        }),
        ("wipe_heart", |ph, p| {
            let t = transition::wipe(p, &[], |_| Ok(Shape::Heart))?;
            transition_effect(ph, p, t)
        }),
        ("wipe_cross", |ph, p| {
            let t = transition::wipe(p, &["arm_ratio"], transition::cross_shape)?;
            transition_effect(ph, p, t)
        }),
        ("blinds", |ph, p| {
            let t = transition::wipe(p, &["count", "orientation"], transition::blinds_shape)?;
            transition_effect(ph, p, t)
        }),
        ("pan_top", |ph, p| ken_burns(ph, p, Direction::Top)),
        ("pan_bottom", |ph, p| ken_burns(ph, p, Direction::Bottom)),
        ("pan_left", |ph, p| ken_burns(ph, p, Direction::Left)),
        ("pan_right", |ph, p| ken_burns(ph, p, Direction::Right)),
        ("pan_top_left", |ph, p| ken_burns(ph, p, Direction::TopLeft)),
        ("pan_top_right", |ph, p| ken_burns(ph, p, Direction::TopRight)),
        ("pan_bottom_left", |ph, p| ken_burns(ph, p, Direction::BottomLeft)),
        ("pan_bottom_right", |ph, p| ken_burns(ph, p, Direction::BottomRight)),
        ("zoom_center", |ph, p| ken_burns(ph, p, Direction::Center)),
    ]
}

fn stationary(_phase: Phase, params: &EffectParams) -> SlidewaveResult<Effect> {
    params.ensure_only(&[])?;
    Ok(Effect::stationary())
}

/// Entering transitions decelerate and leaving ones accelerate unless `easing` says otherwise.
fn transition_effect(
    phase: Phase,
    params: &EffectParams,
    transition: Transition,
) -> SlidewaveResult<Effect> {
    let default = match phase {
        Phase::In => Ease::EaseOut,
        Phase::Hold => Ease::Linear,
        Phase::Out => Ease::EaseIn,
    };
    Ok(Effect {
        kind: EffectKind::Transition(transition),
        ease: params.parse_or("easing", default)?,
        playback: Playback::for_phase(phase),
    })
}

fn ken_burns(phase: Phase, params: &EffectParams, direction: Direction) -> SlidewaveResult<Effect> {
    Ok(Effect {
        kind: EffectKind::KenBurns(KenBurns::from_params(direction, params)?),
        ease: params.parse_or("easing", Ease::Linear)?,
        playback: Playback::for_phase(phase),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
