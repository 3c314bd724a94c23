use serde_json::Value;

/// A single timed text span with millisecond start/end.
///
/// Invariants held by every caption produced here: `text` is non-empty,
/// `end_ms >= start_ms + 1`, and canonical lists are sorted ascending by
/// `(start_ms, end_ms)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub timestamp_ms: u64,
    pub confidence: Option<f64>,
}

/// The three transcript shapes accepted upstream, detected by structural
/// inspection. Anything else is `Unrecognized` and normalizes to an empty
/// list.
#[derive(Debug)]
enum TranscriptShape<'a> {
    /// A flat list of caption-like objects carrying `text`/`startMs`/`endMs`.
    Flat(&'a [Value]),
    /// `{ "captions": [...] }` wrapping the flat shape.
    Wrapped(&'a [Value]),
    /// `{ "segments": [...] }` with `text`/`start`/`end` in seconds and an
    /// optional word-level `words` array, also in seconds.
    Segments(&'a [Value]),
    Unrecognized,
}

fn detect_shape(input: &Value) -> TranscriptShape<'_> {
    match input {
        Value::Array(entries) => TranscriptShape::Flat(entries),
        Value::Object(obj) => {
            if let Some(Value::Array(entries)) = obj.get("captions") {
                TranscriptShape::Wrapped(entries)
            } else if let Some(Value::Array(segments)) = obj.get("segments") {
                TranscriptShape::Segments(segments)
            } else {
                TranscriptShape::Unrecognized
            }
        }
        _ => TranscriptShape::Unrecognized,
    }
}

/// Converts any accepted transcript shape into a canonical, time-sorted
/// caption list. Entries that cannot be parsed are dropped silently (partial
/// transcripts are expected); an unrecognized input yields an empty list.
/// Never errors.
pub fn normalize(input: &Value) -> Vec<Caption> {
    let mut captions = match detect_shape(input) {
        TranscriptShape::Flat(entries) | TranscriptShape::Wrapped(entries) => {
            entries.iter().filter_map(caption_from_entry).collect()
        }
        TranscriptShape::Segments(segments) => {
            segments.iter().flat_map(captions_from_segment).collect()
        }
        TranscriptShape::Unrecognized => Vec::new(),
    };

    captions.sort_by_key(|c| (c.start_ms, c.end_ms));
    captions
}

/// One caption from a millisecond-based flat entry.
fn caption_from_entry(entry: &Value) -> Option<Caption> {
    let obj = entry.as_object()?;
    let text = obj.get("text")?.as_str()?;
    if text.trim().is_empty() {
        return None;
    }

    let start_ms = parse_finite(obj.get("startMs"))?;
    let end_ms = parse_finite(obj.get("endMs"))?;
    let (start_ms, end_ms) = clamp_span(start_ms, end_ms);

    let timestamp_ms = parse_finite(obj.get("timestampMs"))
        .map(to_ms)
        .unwrap_or_else(|| midpoint(start_ms, end_ms));

    Some(Caption {
        text: text.to_string(),
        start_ms,
        end_ms,
        timestamp_ms,
        confidence: parse_finite(obj.get("confidence")),
    })
}

/// Captions from one seconds-based segment. Word-level entries win over the
/// segment fallback: a non-empty `words` array replaces the segment entry
/// entirely.
fn captions_from_segment(segment: &Value) -> Vec<Caption> {
    let Some(obj) = segment.as_object() else {
        return Vec::new();
    };

    if let Some(Value::Array(words)) = obj.get("words")
        && !words.is_empty()
    {
        return words.iter().filter_map(caption_from_word).collect();
    }

    let Some(text) = obj.get("text").and_then(Value::as_str) else {
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }
    let Some(start_s) = parse_finite(obj.get("start")) else {
        return Vec::new();
    };
    let Some(end_s) = parse_finite(obj.get("end")) else {
        return Vec::new();
    };

    let (start_ms, end_ms) = clamp_span(start_s * 1000.0, end_s * 1000.0);
    vec![Caption {
        text: text.to_string(),
        start_ms,
        end_ms,
        timestamp_ms: midpoint(start_ms, end_ms),
        confidence: None,
    }]
}

fn caption_from_word(word: &Value) -> Option<Caption> {
    let obj = word.as_object()?;
    let text = obj.get("word")?.as_str()?;
    if text.trim().is_empty() {
        return None;
    }

    let start_s = parse_finite(obj.get("start"))?;
    let end_s = parse_finite(obj.get("end"))?;
    let (start_ms, end_ms) = clamp_span(start_s * 1000.0, end_s * 1000.0);

    Some(Caption {
        text: text.to_string(),
        start_ms,
        end_ms,
        timestamp_ms: midpoint(start_ms, end_ms),
        confidence: parse_finite(obj.get("probability")),
    })
}

/// Accepts JSON numbers and numeric strings; anything non-finite is None.
fn parse_finite(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn to_ms(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

/// Clamps a raw millisecond span to the caption invariants: start >= 0 and
/// end >= start + 1, so zero/negative-duration captions cannot occur.
fn clamp_span(start: f64, end: f64) -> (u64, u64) {
    let start_ms = to_ms(start);
    let end_ms = to_ms(end).max(start_ms + 1);
    (start_ms, end_ms)
}

fn midpoint(start_ms: u64, end_ms: u64) -> u64 {
    start_ms + (end_ms - start_ms) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segment_without_words_becomes_one_caption() {
        let input = json!({ "segments": [{ "text": "Hi", "start": 0, "end": 1 }] });
        let captions = normalize(&input);
        assert_eq!(
            captions,
            vec![Caption {
                text: "Hi".to_string(),
                start_ms: 0,
                end_ms: 1000,
                timestamp_ms: 500,
                confidence: None,
            }]
        );
    }

    #[test]
    fn words_replace_the_segment_entry() {
        let input = json!({ "segments": [{
            "text": "Hi there",
            "start": 0,
            "end": 1,
            "words": [
                { "word": "Hi", "start": 0, "end": 0.4, "probability": 0.9 },
                { "word": "there", "start": 0.4, "end": 1, "probability": 0.8 }
            ]
        }] });

        let captions = normalize(&input);
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].text, "Hi");
        assert_eq!(captions[0].end_ms, 400);
        assert_eq!(captions[0].confidence, Some(0.9));
        assert_eq!(captions[1].text, "there");
        assert_eq!(captions[1].start_ms, 400);
    }

    #[test]
    fn flat_and_wrapped_shapes_parse_identically() {
        let entries = json!([
            { "text": "b", "startMs": 500, "endMs": 900 },
            { "text": "a", "startMs": 0, "endMs": 400 }
        ]);
        let wrapped = json!({ "captions": entries.clone() });

        let flat = normalize(&entries);
        assert_eq!(flat, normalize(&wrapped));
        assert_eq!(flat[0].text, "a");
        assert_eq!(flat[1].text, "b");
    }

    #[test]
    fn empty_text_entries_are_dropped_but_rest_survives() {
        let input = json!([
            { "text": "keep", "startMs": 100, "endMs": 200 },
            { "text": "   ", "startMs": 200, "endMs": 300 },
            { "text": "also", "startMs": 0, "endMs": 50 }
        ]);
        let captions = normalize(&input);
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].text, "also");
        assert_eq!(captions[1].text, "keep");
    }

    #[test]
    fn unparseable_times_drop_only_that_entry() {
        let input = json!([
            { "text": "bad", "startMs": "oops", "endMs": 100 },
            { "text": "good", "startMs": "250", "endMs": "750.0" }
        ]);
        let captions = normalize(&input);
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].start_ms, 250);
        assert_eq!(captions[0].end_ms, 750);
    }

    #[test]
    fn end_is_clamped_past_start() {
        let input = json!([{ "text": "x", "startMs": 500, "endMs": 500 }]);
        let captions = normalize(&input);
        assert_eq!(captions[0].end_ms, 501);

        let inverted = json!([{ "text": "x", "startMs": 500, "endMs": 100 }]);
        let captions = normalize(&inverted);
        assert_eq!(captions[0].start_ms, 500);
        assert_eq!(captions[0].end_ms, 501);
    }

    #[test]
    fn negative_times_clamp_to_zero() {
        let input = json!({ "segments": [{ "text": "x", "start": -2.0, "end": -1.0 }] });
        let captions = normalize(&input);
        assert_eq!(captions[0].start_ms, 0);
        assert_eq!(captions[0].end_ms, 1);
    }

    #[test]
    fn supplied_timestamp_is_kept() {
        let input = json!([{ "text": "x", "startMs": 0, "endMs": 100, "timestampMs": 80 }]);
        assert_eq!(normalize(&input)[0].timestamp_ms, 80);
    }

    #[test]
    fn output_is_sorted_by_start_then_end() {
        let input = json!({ "segments": [
            { "text": "late", "start": 2.0, "end": 3.0 },
            { "text": "long", "start": 1.0, "end": 4.0 },
            { "text": "short", "start": 1.0, "end": 1.5 }
        ] });
        let captions = normalize(&input);
        let keys: Vec<_> = captions.iter().map(|c| (c.start_ms, c.end_ms)).collect();
        assert_eq!(keys, vec![(1000, 1500), (1000, 4000), (2000, 3000)]);
    }

    #[test]
    fn unrecognized_shapes_yield_empty() {
        assert!(normalize(&json!(null)).is_empty());
        assert!(normalize(&json!(42)).is_empty());
        assert!(normalize(&json!({ "transcript": [] })).is_empty());
    }

    #[test]
    fn normalize_is_idempotent_over_its_own_output() {
        let input = json!({ "segments": [{
            "text": "Hi there",
            "start": 0,
            "end": 1,
            "words": [
                { "word": "Hi", "start": 0, "end": 0.4, "probability": 0.9 },
                { "word": "there", "start": 0.4, "end": 1, "probability": 0.8 }
            ]
        }] });

        let once = normalize(&input);
        let reencoded = serde_json::to_value(&once).unwrap();
        let twice = normalize(&reencoded);
        assert_eq!(once, twice);
    }
}
