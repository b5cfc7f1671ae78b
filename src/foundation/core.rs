use crate::foundation::error::{SlidewaveError, SlidewaveResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Absolute 0-based frame index in show timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SlidewaveResult<Self> {
        if den == 0 {
            return Err(SlidewaveError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlidewaveError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frame rate (`num/1`).
    pub fn integer(fps: u32) -> SlidewaveResult<Self> {
        Self::new(fps, 1)
    }

    pub fn validate(self) -> SlidewaveResult<()> {
        Self::new(self.num, self.den).map(|_| ())
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Frame count covering `duration_ms`, rounded to nearest (`round(ms * fps / 1000)`).
    pub fn frames_for_ms_round(self, duration_ms: u64) -> u64 {
        ((duration_ms as f64) * self.as_f64() / 1000.0).round().max(0.0) as u64
    }

    /// Frame count covering `duration_ms`, rounded up.
    pub fn frames_for_ms_ceil(self, duration_ms: u64) -> u64 {
        // Integer math so exact multiples never round up through float error.
        let num = u128::from(duration_ms) * u128::from(self.num);
        let den = 1000u128 * u128::from(self.den);
        num.div_ceil(den) as u64
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }
}

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a validated, non-empty size.
    pub fn new(width: u32, height: u32) -> SlidewaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlidewaveError::validation(format!(
                "size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Straight 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    pub const BLACK: Self = Self([0, 0, 0]);

    /// Normalized `[0, 1]` channels.
    pub fn to_f32(self) -> [f32; 3] {
        self.0.map(|c| f32::from(c) / 255.0)
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Compass direction in image space (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub const ALL: [Self; 9] = [
        Self::Center,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
        }
    }

    /// Integer step `(sx, sy)` with each component in `{-1, 0, 1}`.
    pub fn step(self) -> (i8, i8) {
        match self {
            Self::Center => (0, 0),
            Self::Top => (0, -1),
            Self::Bottom => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::TopLeft => (-1, -1),
            Self::TopRight => (1, -1),
            Self::BottomLeft => (-1, 1),
            Self::BottomRight => (1, 1),
        }
    }

    /// Unit vector; diagonals are scaled by `1/sqrt(2)`, `Center` is zero.
    pub fn unit(self) -> Vec2 {
        let (sx, sy) = self.step();
        let v = Vec2::new(f64::from(sx), f64::from(sy));
        if sx != 0 && sy != 0 {
            v * std::f64::consts::FRAC_1_SQRT_2
        } else {
            v
        }
    }

    pub fn is_cardinal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom | Self::Left | Self::Right)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = SlidewaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == norm)
            .ok_or_else(|| SlidewaveError::validation(format!("unknown direction '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
