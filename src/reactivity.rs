//! Audio-reactive visual parameters for the current frame's spectral window.
//!
//! Both functions are pure and total: they hold no state between frames and
//! degrade to deterministic minimum outputs on empty or out-of-range input
//! instead of erroring. Magnitudes are expected pre-normalized to `[0, 1]`
//! by the upstream spectral-analysis collaborator.

/// Number of low-frequency bands averaged into the bass scalar.
pub const BASS_BANDS: usize = 32;

const DB_FLOOR: f64 = -60.0;
const DB_CEIL: f64 = -10.0;
const MAG_EPSILON: f64 = 0.001;

/// Scalar in `[0, 1]` summarizing low-frequency energy, used to drive
/// reactive scale/glow effects.
pub fn bass_intensity(band_magnitudes: &[f64]) -> f64 {
    let n = band_magnitudes.len().min(BASS_BANDS);
    if n == 0 {
        return 0.0;
    }

    let sum: f64 = band_magnitudes[..n]
        .iter()
        .map(|&m| if m.is_finite() { m.clamp(0.0, 1.0) } else { 0.0 })
        .sum();
    (sum / n as f64).clamp(0.0, 1.0)
}

/// Pixel range bar heights are scaled into. The minimum is a visible nub so
/// silence never renders a fully collapsed bar.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarScale {
    pub min_px: f64,
    pub max_px: f64,
}

impl Default for BarScale {
    fn default() -> Self {
        Self {
            min_px: 6.0,
            max_px: 240.0,
        }
    }
}

/// Mirrored, log-scaled bar heights for a symmetric spectrum visualization.
///
/// Takes the first `num_bars / 2` magnitudes (missing bands read as
/// silence), mirrors them as reversed-half + half, maps each through
/// `20*log10` with a -60..-10 dB window, and scales into `scale`'s pixel
/// range. Always returns exactly `num_bars` values.
pub fn frequency_bars(band_magnitudes: &[f64], num_bars: usize, scale: BarScale) -> Vec<f64> {
    if num_bars == 0 {
        return Vec::new();
    }

    let half: Vec<f64> = (0..num_bars.div_ceil(2))
        .map(|i| band_magnitudes.get(i).copied().unwrap_or(0.0))
        .collect();

    let mut bars: Vec<f64> = half
        .iter()
        .rev()
        .chain(half.iter())
        .map(|&m| bar_height(m, scale))
        .collect();
    bars.truncate(num_bars);
    bars
}

fn bar_height(magnitude: f64, scale: BarScale) -> f64 {
    let magnitude = if magnitude.is_finite() {
        magnitude.max(0.0)
    } else {
        0.0
    };

    let db = 20.0 * magnitude.max(MAG_EPSILON).log10();
    let norm = ((db - DB_FLOOR) / (DB_CEIL - DB_FLOOR)).clamp(0.0, 1.0);
    let span = (scale.max_px - scale.min_px).max(0.0);
    scale.min_px + norm * span
}
