//! Bridge backend tests against a real (temporary) filesystem mailbox.

use std::path::PathBuf;
use std::time::Duration;

use vibecheck_analysis::{AnalysisBackend, AnalysisError, BridgeBackend};

fn dirs(root: &tempfile::TempDir) -> (PathBuf, PathBuf) {
    (root.path().join("requests"), root.path().join("responses"))
}

/// Simulated out-of-band worker: waits for a request slot to appear, then
/// writes `body` as the response for that request id.
fn spawn_worker(request_dir: PathBuf, response_dir: PathBuf, body: String) {
    tokio::spawn(async move {
        let request_id = loop {
            if let Ok(mut entries) = tokio::fs::read_dir(&request_dir).await {
                if let Ok(Some(entry)) = entries.next_entry().await {
                    break entry.file_name().to_string_lossy().into_owned();
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        };
        tokio::fs::create_dir_all(&response_dir).await.ok();
        tokio::fs::write(response_dir.join(format!("{request_id}.json")), body)
            .await
            .expect("worker should write the response");
    });
}

#[tokio::test]
async fn response_file_resolves_the_request() {
    let root = tempfile::tempdir().expect("tempdir");
    let (req, resp) = dirs(&root);
    let bridge = BridgeBackend::new(req.clone(), resp.clone(), 10, 1);

    spawn_worker(
        req.clone(),
        resp,
        serde_json::json!({
            "vibe_type": "Cozy Homebody",
            "vibe_emoji": "🏠",
            "description": "soft blankets energy",
            "traits": ["calm", "warm"],
            "energy": "Chill Vibes"
        })
        .to_string(),
    );

    let report = bridge
        .analyze(&[0xFF, 0xD8, 0xFF, 0xE0], "en", false)
        .await
        .expect("analysis should resolve");

    assert_eq!(report.vibe_type, "Cozy Homebody");
    assert_eq!(report.traits, vec!["calm".to_string(), "warm".to_string()]);

    // The request slot carries the full mailbox contract.
    let mut entries = tokio::fs::read_dir(&req).await.expect("request dir");
    let slot = entries
        .next_entry()
        .await
        .expect("read entry")
        .expect("one slot");
    let slot_path = slot.path();
    let image = tokio::fs::read(slot_path.join("image.jpg"))
        .await
        .expect("image file");
    assert_eq!(image, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    let prompt = tokio::fs::read_to_string(slot_path.join("prompt.txt"))
        .await
        .expect("prompt file");
    assert!(prompt.contains("JSON"));
    let metadata: serde_json::Value = serde_json::from_slice(
        &tokio::fs::read(slot_path.join("metadata.json"))
            .await
            .expect("metadata file"),
    )
    .expect("metadata json");
    assert_eq!(metadata["language"], "en");
    assert_eq!(metadata["roast_mode"], false);
    assert_eq!(metadata["status"], "pending");
    assert_eq!(
        metadata["request_id"].as_str().map(str::len),
        Some(8),
        "request ids are short"
    );
}

#[tokio::test]
async fn partially_written_response_is_not_consumed() {
    let root = tempfile::tempdir().expect("tempdir");
    let (req, resp) = dirs(&root);
    let bridge = BridgeBackend::new(req.clone(), resp.clone(), 10, 1);

    // Worker writes garbage first, then replaces it with valid JSON.
    let request_dir = req.clone();
    let response_dir = resp.clone();
    tokio::spawn(async move {
        let request_id = loop {
            if let Ok(mut entries) = tokio::fs::read_dir(&request_dir).await {
                if let Ok(Some(entry)) = entries.next_entry().await {
                    break entry.file_name().to_string_lossy().into_owned();
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        };
        tokio::fs::create_dir_all(&response_dir).await.ok();
        let path = response_dir.join(format!("{request_id}.json"));
        tokio::fs::write(&path, r#"{"vibe_type": "Half"#)
            .await
            .expect("partial write");
        tokio::time::sleep(Duration::from_millis(1_200)).await;
        tokio::fs::write(&path, r#"{"vibe_type":"Whole"}"#)
            .await
            .expect("full write");
    });

    let report = bridge
        .analyze(&[1, 2, 3], "en", true)
        .await
        .expect("analysis should eventually resolve");
    assert_eq!(report.vibe_type, "Whole");
}

#[tokio::test]
async fn missing_response_times_out() {
    let root = tempfile::tempdir().expect("tempdir");
    let (req, resp) = dirs(&root);
    let bridge = BridgeBackend::new(req, resp, 1, 1);

    let result = bridge.analyze(&[1, 2, 3], "en", true).await;
    assert!(
        matches!(result, Err(AnalysisError::Timeout { timeout_secs: 1 })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn bridge_has_no_deep_capability() {
    let root = tempfile::tempdir().expect("tempdir");
    let (req, resp) = dirs(&root);
    let backend = AnalysisBackend::Bridge(BridgeBackend::new(req, resp, 1, 1));

    let images = vec![vec![0u8; 4]; 3];
    let input = vibecheck_analysis::DeepInput {
        images: &images,
        captions: &[],
        like_counts: &[],
        comment_counts: &[],
        follower_count: Some(100),
        bio: None,
    };
    let result = backend.analyze_deep(&input, "en", true).await;
    assert!(
        matches!(
            result,
            Err(AnalysisError::Unsupported {
                backend: "bridge",
                ..
            })
        ),
        "expected Unsupported, got: {result:?}"
    );
}
