use avd_toolkit::errors::ToolkitError;
use avd_toolkit::parse_output::{check_keyword_thresholds, exceeding, KeywordCounter};
use tempfile::tempdir;
use tokio::fs;
use tracing::debug;

const TEST_OUTPUT: &str = "Error: link down on Ethernet1\nerror error\nall good\nFAIL once\n";

#[test]
fn test_counter_is_case_insensitive_and_counts_lines_once() {
    let counter = KeywordCounter::from_list("error,FAIL").unwrap();

    let hits = counter.count(TEST_OUTPUT);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].keyword, "error");
    assert_eq!(
        hits[0].lines,
        vec!["Error: link down on Ethernet1".to_string(), "error error".to_string()]
    );
    assert_eq!(hits[1].keyword, "fail");
    assert_eq!(hits[1].count(), 1);
    debug!("Test passed for keyword counting.");
}

#[test]
fn test_counter_merges_duplicate_keywords() {
    let counter = KeywordCounter::from_list("error, ERROR ,error").unwrap();

    let hits = counter.count(TEST_OUTPUT);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].count(), 2);
    debug!("Test passed for duplicate keywords.");
}

#[test]
fn test_counter_treats_keywords_literally() {
    let counter = KeywordCounter::from_list("a.b").unwrap();

    let hits = counter.count("a.b\naxb\n");

    assert_eq!(hits[0].lines, vec!["a.b".to_string()]);
    debug!("Test passed for literal keywords.");
}

#[test]
fn test_counter_requires_a_keyword() {
    let result = KeywordCounter::from_list(" , ");

    assert!(matches!(result, Err(ToolkitError::ConfigError(_))));
    debug!("Test passed for empty keyword list.");
}

#[test]
fn test_exceeding_uses_strict_threshold() {
    let counter = KeywordCounter::from_list("error,fail").unwrap();
    let hits = counter.count(TEST_OUTPUT);

    let over: Vec<&str> = exceeding(&hits, 1)
        .iter()
        .map(|hit| hit.keyword.as_str())
        .collect();

    assert_eq!(over, vec!["error"]);
    assert!(exceeding(&hits, 2).is_empty());
    debug!("Test passed for threshold comparison.");
}

#[tokio::test]
async fn test_check_thresholds_fails_when_exceeded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("show-logging.txt");
    fs::write(&path, TEST_OUTPUT).await.unwrap();
    let counter = KeywordCounter::from_list("error,fail").unwrap();

    let result = check_keyword_thresholds(&path, &counter, 1).await;

    match result {
        Err(ToolkitError::ThresholdExceeded(message)) => {
            assert!(message.contains("error"), "Unexpected message: {}", message);
            assert!(!message.contains("fail"), "Unexpected message: {}", message);
        }
        other => panic!("Expected ThresholdExceeded, got {:?}", other),
    }
    debug!("Test passed for exceeded threshold.");
}

#[tokio::test]
async fn test_check_thresholds_passes_within_limit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("show-logging.txt");
    fs::write(&path, TEST_OUTPUT).await.unwrap();
    let counter = KeywordCounter::from_list("error,fail").unwrap();

    let hits = check_keyword_thresholds(&path, &counter, 2)
        .await
        .unwrap_or_else(|e| panic!("Threshold check failed: {:?}", e));

    assert_eq!(hits.iter().map(|h| h.count()).sum::<usize>(), 3);
    debug!("Test passed for threshold within limit.");
}

#[tokio::test]
async fn test_check_thresholds_missing_file() {
    let dir = tempdir().unwrap();
    let counter = KeywordCounter::from_list("error").unwrap();

    let result = check_keyword_thresholds(&dir.path().join("nope.txt"), &counter, 0).await;

    assert!(matches!(result, Err(ToolkitError::FileReadError(_, _))));
    debug!("Test passed for missing file.");
}
