use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::{
    captions,
    config::{ProjectDefaults, merge_props},
    core::{Fps, Orientation},
    error::{ReelforgeError, ReelforgeResult},
    sections::sections_from_tracks,
    shuffle::seeded_shuffle,
    timeline::{MeasuredTrack, schedule_tracks},
};

/// Measures the raw duration of an audio source in seconds.
///
/// Lookups for all tracks of a composition run concurrently, so
/// implementations must be `Sync`. A failed lookup degrades that single
/// track to zero length; it never aborts the composition.
pub trait DurationProbe: Sync {
    fn measure_seconds(&self, source: &Path) -> ReelforgeResult<f64>;
}

/// `DurationProbe` backed by the system `ffprobe` binary.
pub struct FfprobeDurationProbe;

impl DurationProbe for FfprobeDurationProbe {
    fn measure_seconds(&self, source: &Path) -> ReelforgeResult<f64> {
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            format: Option<ProbeFormat>,
        }

        let out = std::process::Command::new("ffprobe")
            .args(["-v", "error", "-print_format", "json", "-show_format"])
            .arg(source)
            .output()
            .map_err(|e| ReelforgeError::probe(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(ReelforgeError::probe(format!(
                "ffprobe failed for '{}': {}",
                source.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| ReelforgeError::probe(format!("ffprobe json parse failed: {e}")))?;
        parsed
            .format
            .and_then(|f| f.duration)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| {
                ReelforgeError::probe(format!(
                    "ffprobe reported no duration for '{}'",
                    source.display()
                ))
            })
    }
}

/// Everything needed to compute one composition's render parameters. The
/// asset lists arrive pre-enumerated and ordered (directory listing is an
/// external concern); `content_dir` doubles as the shuffle seed.
#[derive(Clone, Debug)]
pub struct MetadataRequest {
    pub content_dir: String,
    pub orientation: Orientation,
    pub fps: Fps,
    pub images: Vec<String>,
    pub audio_tracks: Vec<PathBuf>,
    pub transcript: Option<Value>,
    pub override_config: Option<Value>,
    pub defaults: ProjectDefaults,
}

/// The contract handed to the renderer: dimensions, fps, total frames and
/// the fully merged props (config, shuffled images, scheduled tracks,
/// captions, sections).
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionMetadata {
    pub fps: Fps,
    pub width: u32,
    pub height: u32,
    pub duration_in_frames: u64,
    pub props: Map<String, Value>,
}

pub struct MetadataCalculator;

impl MetadataCalculator {
    /// Computes final render parameters for a composition.
    ///
    /// Infallible by design: config, caption and probe problems all degrade
    /// locally (defaults / empty list / zero-length track) so a partially
    /// configured project still renders something.
    #[tracing::instrument(skip_all, fields(content_dir = %request.content_dir))]
    pub fn compute(request: &MetadataRequest, probe: &dyn DurationProbe) -> CompositionMetadata {
        let canvas = request.orientation.dimensions();
        let mut props = merge_props(
            &request.defaults.to_prop_map(),
            request.override_config.as_ref(),
            request.orientation,
        );

        // Scatter/gather: probe every track concurrently, wait for all of
        // them, then lay out offsets. No partial results are used.
        let probed: Vec<(MeasuredTrack, bool)> = request
            .audio_tracks
            .par_iter()
            .map(|path| {
                let source_path = path.display().to_string();
                match probe.measure_seconds(path) {
                    Ok(secs) => (
                        MeasuredTrack {
                            source_path,
                            duration_seconds: secs,
                        },
                        false,
                    ),
                    Err(err) => {
                        tracing::warn!(
                            source = %path.display(),
                            %err,
                            "duration probe failed, scheduling track as zero-length"
                        );
                        (
                            MeasuredTrack {
                                source_path,
                                duration_seconds: 0.0,
                            },
                            true,
                        )
                    }
                }
            })
            .collect();

        let degraded: Vec<String> = probed
            .iter()
            .filter(|(_, failed)| *failed)
            .map(|(t, _)| t.source_path.clone())
            .collect();
        let measured: Vec<MeasuredTrack> = probed.into_iter().map(|(t, _)| t).collect();

        let schedule = schedule_tracks(&measured, request.fps, request.images.len());
        let captions = request
            .transcript
            .as_ref()
            .map(captions::normalize)
            .unwrap_or_default();
        let images = seeded_shuffle(&request.images, &request.content_dir);
        let sections = sections_from_tracks(&schedule.tracks, request.fps);

        props.insert(
            "images".to_string(),
            Value::Array(images.into_iter().map(Value::String).collect()),
        );
        props.insert("tracks".to_string(), to_json_or_empty(&schedule.tracks));
        props.insert("captions".to_string(), to_json_or_empty(&captions));
        props.insert("sections".to_string(), to_json_or_empty(&sections));
        props.insert(
            "degradedTracks".to_string(),
            Value::Array(degraded.into_iter().map(Value::String).collect()),
        );

        CompositionMetadata {
            fps: request.fps,
            width: canvas.width,
            height: canvas.height,
            duration_in_frames: schedule.duration.0,
            props,
        }
    }
}

/// Serialization of these in-crate models cannot fail; degrade to an empty
/// array rather than aborting if it ever does.
fn to_json_or_empty<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::Array(Vec::new()))
}
