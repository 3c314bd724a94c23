use std::path::PathBuf;
use std::process::Command;

#[test]
fn cli_captions_normalizes_a_transcript() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let transcript_path = dir.join("transcript.json");
    std::fs::write(
        &transcript_path,
        include_str!("data/segments_words.json"),
    )
    .unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_reelforge")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target").join("debug").join("reelforge"));

    let out = Command::new(exe)
        .args(["captions", "--in"])
        .arg(&transcript_path)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let captions: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(captions.len(), 6);
    assert_eq!(captions[0].get("text").unwrap().as_str(), Some("Welcome"));

    let starts: Vec<u64> = captions
        .iter()
        .map(|c| c.get("startMs").unwrap().as_u64().unwrap())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}
