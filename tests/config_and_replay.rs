//! Integration tests for config files and transcript replay.

use reply_throttle::{
    read_transcript, BotConfig, ConfigError, DamerauLevenshtein, Delivery, ReplayClock,
    ReplayOutcome, Replayer, TranscriptError,
};
use std::fs;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

const CONFIG: &str = r#"
suppressor:
  expiry_secs: 60
  similarity_threshold: 0.5
gate:
  admins: ["owner"]
  checked_groups: ["lobby"]
"#;

const TRANSCRIPT: &str = r#"{"at_secs": 0, "source": {"type": "group", "group_id": "lobby", "user_id": "u1"}, "text": "貓 光炮 1", "reply": "10分鐘"}
{"at_secs": 5, "source": {"type": "group", "group_id": "lobby", "user_id": "u2"}, "text": "貓 光炮1", "reply": "10分鐘"}
{"at_secs": 30, "source": {"type": "group", "group_id": "lobby", "user_id": "u3"}, "text": "貓 光炮  1", "reply": "10分鐘"}
{"at_secs": 61, "source": {"type": "group", "group_id": "lobby", "user_id": "u2"}, "text": "貓 光炮1", "reply": "10分鐘"}
{"at_secs": 70, "source": {"type": "user", "user_id": "owner"}, "text": "解鎖"}
{"at_secs": 71, "source": {"type": "group", "group_id": "lobby", "user_id": "u2"}, "text": "貓 光炮1", "reply": "10分鐘"}
"#;

#[test]
fn test_replay_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    let transcript_path = dir.path().join("transcript.jsonl");
    fs::write(&config_path, CONFIG).unwrap();
    fs::write(&transcript_path, TRANSCRIPT).unwrap();

    let config = BotConfig::load(&config_path).unwrap();
    assert_eq!(config.suppressor.expiry, Duration::from_secs(60));

    let file = fs::File::open(&transcript_path).unwrap();
    let lines = read_transcript(BufReader::new(file)).unwrap();
    assert_eq!(lines.len(), 6);

    let clock = Arc::new(ReplayClock::new());
    let gate = config
        .build_gate(clock.clone(), Arc::new(DamerauLevenshtein))
        .unwrap();
    let replayer = Replayer::new(gate, clock.clone());

    let deliveries: Vec<_> = lines
        .iter()
        .map(|line| match replayer.step(line) {
            ReplayOutcome::Reply { delivery, .. } => Some(delivery),
            _ => None,
        })
        .collect();

    assert_eq!(
        deliveries,
        vec![
            Some(Delivery::Deliver),
            Some(Delivery::Suppressed),
            Some(Delivery::Suppressed),
            // A new window started at 61s
            Some(Delivery::Deliver),
            None,
            // Unlocked at 70s
            Some(Delivery::Deliver),
        ]
    );
    assert_eq!(clock.offset(), Duration::from_secs(71));

    let snapshot = replayer.gate().suppressor().metrics().snapshot();
    assert_eq!(snapshot.total_checked(), 5);
    assert_eq!(snapshot.replies_allowed, 3);
    assert_eq!(snapshot.replies_suppressed, 2);
    assert_eq!(snapshot.windows_expired, 1);
    assert_eq!(snapshot.unlocks, 1);
}

#[test]
fn test_bad_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "suppressor:\n  similarity_threshold: [1, 2]\n").unwrap();

    assert!(matches!(BotConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_bad_transcript_line() {
    let text = format!("{TRANSCRIPT}{{\"at_secs\": 80}}\n");
    let err = read_transcript(text.as_bytes()).unwrap_err();

    assert!(matches!(err, TranscriptError::Malformed { line: 7, .. }));
    assert_eq!(err.to_string(), "malformed transcript line 7");
}
