use crate::error::{ReelforgeError, ReelforgeResult};

/// Frames per second, the fixed time quantum for all frame-integer math.
///
/// Short-form compositions run at whole-frame rates (30 by default), so this
/// is an integer newtype rather than a rational.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Fps(pub u32);

impl Fps {
    pub const DEFAULT: Fps = Fps(30);

    pub fn new(fps: u32) -> ReelforgeResult<Self> {
        if fps == 0 {
            return Err(ReelforgeError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    pub fn frame_duration_secs(self) -> f64 {
        1.0 / self.as_f64()
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Whole milliseconds at the start of `frames`. Exact for integer fps.
    pub fn frames_to_ms(self, frames: u64) -> u64 {
        frames.saturating_mul(1000) / u64::from(self.0)
    }

    /// Rounds up so a track never loses its tail frame.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * self.as_f64()).ceil() as u64
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> ReelforgeResult<Self> {
        if start.0 > end.0 {
            return Err(ReelforgeError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Output aspect of a composition. Each orientation maps to a fixed canvas;
/// the mapping is a pure lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn dimensions(self) -> Canvas {
        match self {
            Orientation::Vertical => Canvas {
                width: 1080,
                height: 1920,
            },
            Orientation::Horizontal => Canvas {
                width: 1920,
                height: 1080,
            },
        }
    }

    /// Key of the matching orientation override block in a config file.
    pub fn config_key(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}
