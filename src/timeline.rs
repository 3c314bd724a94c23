use crate::core::{FrameIndex, FrameRange, Fps};

/// Slide length synthesized per image when a composition has no usable
/// audio tracks.
pub const FALLBACK_SECS_PER_IMAGE: f64 = 5.0;

/// One audio source with its measured raw duration. Probing the duration is
/// an external concern; a failed probe arrives here as `0.0`.
#[derive(Clone, Debug)]
pub struct MeasuredTrack {
    pub source_path: String,
    pub duration_seconds: f64,
}

/// A track placed on the composition timeline. `start_frame` of track *i*
/// is the sum of `duration_frames` of tracks `0..i-1`; tracks sit
/// back-to-back with zero gap and zero overlap.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub source_path: String,
    pub duration_seconds: f64,
    pub start_frame: u64,
    pub duration_frames: u64,
}

impl Track {
    /// Zero-length tracks keep their timeline position (so prefix sums stay
    /// intact) but are excluded from playback scheduling.
    pub fn is_scheduled(&self) -> bool {
        self.duration_frames > 0
    }

    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start_frame),
            end: FrameIndex(self.start_frame.saturating_add(self.duration_frames)),
        }
    }
}

/// The frame-accurate layout of a composition's audio tracks.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TrackSchedule {
    pub tracks: Vec<Track>,
    pub duration: FrameIndex,
}

impl TrackSchedule {
    pub fn scheduled(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.is_scheduled())
    }
}

/// Lays out tracks back-to-back and computes the total composition length.
///
/// Each raw duration converts to whole frames via `ceil(seconds * fps)`.
/// With zero usable tracks the duration is synthesized from the image count
/// so a composition always has a positive frame count.
pub fn schedule_tracks(
    measured: &[MeasuredTrack],
    fps: Fps,
    fallback_image_count: usize,
) -> TrackSchedule {
    let mut tracks = Vec::with_capacity(measured.len());
    let mut cursor = 0u64;

    for m in measured {
        let secs = if m.duration_seconds.is_finite() {
            m.duration_seconds.max(0.0)
        } else {
            0.0
        };
        let frames = fps.secs_to_frames_ceil(secs);
        tracks.push(Track {
            source_path: m.source_path.clone(),
            duration_seconds: secs,
            start_frame: cursor,
            duration_frames: frames,
        });
        cursor = cursor.saturating_add(frames);
    }

    let duration = if cursor > 0 {
        cursor
    } else {
        let synthesized =
            fps.secs_to_frames_ceil(fallback_image_count as f64 * FALLBACK_SECS_PER_IMAGE);
        tracing::debug!(
            fallback_image_count,
            frames = synthesized,
            "no usable audio tracks, synthesizing duration from image count"
        );
        synthesized.max(1)
    };

    TrackSchedule {
        tracks,
        duration: FrameIndex(duration),
    }
}
