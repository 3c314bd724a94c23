use std::path::Path;

use crate::core::Fps;
use crate::timeline::Track;

/// An ordered marker used to highlight the active label at a playhead time,
/// e.g. the currently playing title in a playlist composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub start_ms: u64,
}

/// Index of the last section whose start is at or before the playhead, or
/// None before the first marker.
pub fn active_section(sections: &[Section], playhead_ms: u64) -> Option<usize> {
    sections.iter().rposition(|s| s.start_ms <= playhead_ms)
}

/// Derives section markers from scheduled tracks: one marker per playable
/// track, titled by file stem.
pub fn sections_from_tracks(tracks: &[Track], fps: Fps) -> Vec<Section> {
    tracks
        .iter()
        .filter(|t| t.is_scheduled())
        .map(|t| Section {
            title: track_title(&t.source_path),
            start_ms: fps.frames_to_ms(t.start_frame),
        })
        .collect()
}

fn track_title(source_path: &str) -> String {
    Path::new(source_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.to_string())
}
