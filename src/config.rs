use serde_json::{Map, Value};

use crate::core::Orientation;

/// Project-default prop bag. Every composition starts from these values;
/// a per-video override file layers on top via [`merge_props`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDefaults {
    pub fps: u32,
    /// Slide length used when a composition has no usable audio tracks.
    pub secs_per_image: f64,
    pub ken_burns: bool,
    pub show_captions: bool,
    pub caption_font_px: u32,
    pub bar_count: u32,
    pub bar_min_px: f64,
    pub bar_max_px: f64,
    pub accent_color: String,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            fps: 30,
            secs_per_image: 5.0,
            ken_burns: true,
            show_captions: true,
            caption_font_px: 64,
            bar_count: 64,
            bar_min_px: 6.0,
            bar_max_px: 240.0,
            accent_color: "#ffffff".to_string(),
        }
    }
}

impl ProjectDefaults {
    pub fn to_prop_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Merges the default prop bag with an optional, already-parsed override
/// object. Precedence is explicit and layered low to high:
///
/// 1. `defaults`
/// 2. shared override fields (everything except the orientation blocks)
/// 3. the `vertical` / `horizontal` block matching the active orientation
///
/// A missing or non-object override falls back to defaults only; a malformed
/// config file must never be fatal.
pub fn merge_props(
    defaults: &Map<String, Value>,
    override_cfg: Option<&Value>,
    orientation: Orientation,
) -> Map<String, Value> {
    let mut merged = defaults.clone();

    let Some(Value::Object(over)) = override_cfg else {
        return merged;
    };

    for (key, value) in over {
        if key == "vertical" || key == "horizontal" {
            continue;
        }
        merge_field(&mut merged, key, value);
    }

    if let Some(Value::Object(block)) = over.get(orientation.config_key()) {
        for (key, value) in block {
            merge_field(&mut merged, key, value);
        }
    }

    merged
}

/// Objects merge per field recursively; every other value replaces.
fn merge_field(dst: &mut Map<String, Value>, key: &str, value: &Value) {
    match (dst.get_mut(key), value) {
        (Some(Value::Object(existing)), Value::Object(incoming)) => {
            for (k, v) in incoming {
                merge_field(existing, k, v);
            }
        }
        _ => {
            dst.insert(key.to_string(), value.clone());
        }
    }
}
