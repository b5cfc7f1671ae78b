use crate::effects::params::EffectParams;
use crate::foundation::core::{Fps, Rgb8, Size};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use std::fmt;
use std::path::Path;

/// The three consecutive stages of a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    In,
    Hold,
    Out,
}

impl Phase {
    pub const ALL: [Self; 3] = [Self::In, Self::Hold, Self::Out];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Hold => "hold",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect assignment for one phase of a slide.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectSpec {
    /// Phase length; 0 skips the phase.
    pub duration_ms: u64,
    /// Registry key, e.g. `fade` or `pan_top_left`.
    pub effect: String,
    #[serde(default, skip_serializing_if = "EffectParams::is_empty")]
    pub params: EffectParams,
}

impl EffectSpec {
    pub fn new(duration_ms: u64, effect: impl Into<String>) -> Self {
        Self {
            duration_ms,
            effect: effect.into(),
            params: EffectParams::default(),
        }
    }

    pub fn with_params(mut self, params: EffectParams) -> Self {
        self.params = params;
        self
    }
}

/// One image with its entrance, hold and exit effects.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slide {
    /// Identifier resolved by the image source (a path for filesystem sources).
    pub image: String,
    #[serde(rename = "in")]
    pub effect_in: EffectSpec,
    #[serde(rename = "hold")]
    pub effect_hold: EffectSpec,
    #[serde(rename = "out")]
    pub effect_out: EffectSpec,
}

impl Slide {
    pub fn effect(&self, phase: Phase) -> &EffectSpec {
        match phase {
            Phase::In => &self.effect_in,
            Phase::Hold => &self.effect_hold,
            Phase::Out => &self.effect_out,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        Phase::ALL
            .iter()
            .map(|&p| self.effect(p).duration_ms)
            .sum()
    }
}

/// A complete slideshow: output raster, frame rate, background and ordered slides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Show {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    #[serde(default)]
    pub background: Rgb8,
    pub slides: Vec<Slide>,
}

impl Show {
    pub fn from_json(json: &str) -> SlidewaveResult<Self> {
        let show: Self = serde_json::from_str(json)
            .map_err(|e| SlidewaveError::serde(format!("invalid show json: {e}")))?;
        show.validate()?;
        Ok(show)
    }

    pub fn from_path(path: &Path) -> SlidewaveResult<Self> {
        use anyhow::Context as _;
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read show '{}'", path.display()))?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> SlidewaveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlidewaveError::serde(e.to_string()))
    }

    pub fn size(&self) -> SlidewaveResult<Size> {
        Size::new(self.width, self.height)
    }

    pub fn duration_ms(&self) -> u64 {
        self.slides.iter().map(Slide::duration_ms).sum()
    }

    /// Structural checks; effect names and parameters are resolved by the render session.
    pub fn validate(&self) -> SlidewaveResult<()> {
        self.size()?;
        self.fps.validate()?;
        if self.slides.is_empty() {
            return Err(SlidewaveError::validation(
                "show must contain at least one slide",
            ));
        }
        for (i, slide) in self.slides.iter().enumerate() {
            if slide.image.trim().is_empty() {
                return Err(SlidewaveError::validation(format!(
                    "slide {i}: image must be non-empty"
                )));
            }
            for phase in Phase::ALL {
                if slide.effect(phase).effect.trim().is_empty() {
                    return Err(SlidewaveError::validation(format!(
                        "slide {i} ({phase}): effect name must be non-empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
