//! Integration tests for progress-reporting fetches.
//!
//! Most tests replay scripted chunks through `MemoryTransport`; the last ones
//! go through `LocalTransport` against temporary files.

use std::io::Write;

use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::tempdir;
use worldsun_data::streaming::{
    fetch_with_progress, FetchRequest, LocalTransport, MemoryTransport, StreamingError,
    StreamingResult,
};

fn run<T: serde::de::DeserializeOwned>(transport: &MemoryTransport) -> (StreamingResult<T>, Vec<u32>) {
    let mut progress = Vec::new();
    let result = fetch_with_progress(
        transport,
        &FetchRequest::get("https://api.example.com/api/industry-data"),
        |p| progress.push(p),
    );
    (result, progress)
}

/// A JSON document that is exactly 100 bytes long.
fn hundred_byte_payload() -> Vec<u8> {
    let body = format!(r#"{{"pad":"{}"}}"#, "x".repeat(90));
    assert_eq!(body.len(), 100);
    body.into_bytes()
}

#[test]
fn normal_transfer_reports_40_70_100() {
    let payload = hundred_byte_payload();
    let transport = MemoryTransport::split(&payload, &[40, 30, 30]).with_content_length("100");

    let (result, progress) = run::<Value>(&transport);

    // The last chunk reaches 100 itself; completion then reports 100 again.
    assert_eq!(progress, vec![40, 70, 100, 100]);
    assert_eq!(result.expect("fetch"), json!({ "pad": "x".repeat(90) }));
}

#[test]
fn unknown_length_reports_single_100() {
    let transport = MemoryTransport::new([r#"{"o"#, r#"k":tr"#, "ue}"]);

    let (result, progress) = run::<Value>(&transport);

    assert_eq!(progress, vec![100]);
    assert_eq!(result.expect("fetch"), json!({ "ok": true }));
}

#[test]
fn mid_stream_failure_propagates_without_final_progress() {
    let payload = hundred_byte_payload();
    let transport = MemoryTransport::split(&payload, &[40, 30, 30])
        .with_exact_length()
        .fail_after(1, "connection reset by peer");

    let (result, progress) = run::<Value>(&transport);

    let err = result.expect_err("should fail");
    match &err {
        StreamingError::Io(io) => assert_eq!(io.to_string(), "connection reset by peer"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_stream_failure());
    assert_eq!(progress, vec![40]);
    assert!(!progress.contains(&100));
}

#[test]
fn malformed_payload_is_parse_failure() {
    let transport = MemoryTransport::split(b"not json", &[3]).with_exact_length();

    let (result, progress) = run::<Value>(&transport);

    let err = result.expect_err("should fail");
    assert!(err.is_parse_failure());
    assert!(matches!(err, StreamingError::Parse { .. }));
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn empty_body_with_zero_length_is_parse_failure() {
    let transport = MemoryTransport::new(Vec::<Vec<u8>>::new()).with_content_length("0");

    let (result, progress) = run::<Value>(&transport);

    assert!(matches!(result, Err(StreamingError::Parse { .. })));
    assert_eq!(progress, vec![100]);
}

#[test]
fn missing_body_is_stream_unavailable() {
    let transport = MemoryTransport::new(["{}"]).without_body();

    let (result, progress) = run::<Value>(&transport);

    assert!(matches!(result, Err(StreamingError::StreamUnavailable)));
    assert!(progress.is_empty());
}

#[test]
fn known_length_progress_is_monotonic_and_bounded() {
    let payload = serde_json::to_vec(&json!({
        "rows": (0..50).map(|i| json!({ "id": i, "label": format!("row-{i}") })).collect::<Vec<_>>()
    }))
    .expect("encode");
    let sizes: Vec<usize> = [1, 7, 13, 64, 3, 250, 2].iter().cycle().take(40).copied().collect();
    let transport = MemoryTransport::split(&payload, &sizes).with_exact_length();

    let (result, progress) = run::<Value>(&transport);

    result.expect("fetch");
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|&p| p <= 100));
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn over_delivery_is_not_clamped() {
    // Server declares fewer bytes than it sends.
    let transport = MemoryTransport::new(["[1,2,", "3,4]"]).with_content_length("5");

    let (result, progress) = run::<Vec<u32>>(&transport);

    assert_eq!(result.expect("fetch"), vec![1, 2, 3, 4]);
    assert_eq!(progress, vec![100, 180, 100]);
}

#[test]
fn chunk_granularity_does_not_change_result() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Report {
        title: String,
        tags: Vec<String>,
        score: f64,
    }

    let original = json!({ "title": "Quarterly outlook ✓", "tags": ["macro", "rates"], "score": 8.5 });
    let bytes = serde_json::to_vec(&original).expect("encode");
    let expected = Report {
        title: "Quarterly outlook ✓".into(),
        tags: vec!["macro".into(), "rates".into()],
        score: 8.5,
    };

    let one_byte = MemoryTransport::split(&bytes, &vec![1; bytes.len()]).with_exact_length();
    let whole = MemoryTransport::new([bytes.clone()]).with_exact_length();
    let uneven = MemoryTransport::split(&bytes, &[5, 17, 2]);

    for transport in [one_byte, whole, uneven] {
        let (result, _) = run::<Report>(&transport);
        assert_eq!(result.expect("fetch"), expected);
    }
}

#[test]
fn repeated_calls_are_independent() {
    let transport = MemoryTransport::split(&hundred_byte_payload(), &[25, 25, 25]).with_exact_length();

    let (first, first_progress) = run::<Value>(&transport);
    let (second, second_progress) = run::<Value>(&transport);

    assert_eq!(first.expect("first"), second.expect("second"));
    assert_eq!(first_progress, second_progress);
    assert_eq!(first_progress, vec![25, 50, 75, 100, 100]);
}

#[test]
fn local_transport_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("industry.json");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&hundred_byte_payload()).unwrap();
    }

    let transport = LocalTransport::open(&path).expect("open").with_chunk_size(50);
    let mut progress = Vec::new();
    let value: Value = fetch_with_progress(&transport, &FetchRequest::get("file://ignored"), |p| {
        progress.push(p);
    })
    .expect("fetch");

    assert_eq!(value["pad"].as_str().map(str::len), Some(90));
    assert_eq!(progress, vec![50, 100, 100]);
}

#[test]
fn local_transport_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, b"{\"unterminated\": ").unwrap();

    let transport = LocalTransport::open(&path).expect("open");
    let result: StreamingResult<Value> =
        fetch_with_progress(&transport, &FetchRequest::get("file://ignored"), |_| {});

    assert!(result.expect_err("should fail").is_parse_failure());
}
