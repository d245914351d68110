use avd_block_processor::UnclosedBlockPolicy;
use avd_toolkit::clean::{
    clean_configs, BasicConfigCleaner, CleanProfile, ConfigCleaner, ConfigCleanerConfig,
};
use avd_toolkit::errors::ToolkitError;
use tempfile::tempdir;
use tokio::fs;
use tracing::debug;
use tracing_test::traced_test;

const LEAF_CONFIG: &str = "hostname leaf1\n!\naaa authorization exec default local\n!\ninterface Ethernet1\n   mtu 9214\n!\nend\n";
const LEAF_CLEANED: &str = "hostname leaf1\n!\ninterface Ethernet1\n   mtu 1500\n!\nend\n";

#[tokio::test]
async fn test_clean_single_file_to_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("leaf1.cfg");
    let output = dir.path().join("lab").join("leaf1.cfg");
    fs::write(&input, LEAF_CONFIG).await.unwrap();

    let summary = clean_configs(ConfigCleanerConfig::default(), &input, Some(output.as_path()))
        .await
        .unwrap_or_else(|e| panic!("Failed to clean config: {:?}", e));

    let content = fs::read_to_string(&output).await.unwrap();
    assert_eq!(content, LEAF_CLEANED);
    assert_eq!(summary.files_cleaned, 1);
    assert_eq!(summary.blocks_updated, 2);
    assert_eq!(summary.blocks_removed, 1);

    let original = fs::read_to_string(&input).await.unwrap();
    assert_eq!(original, LEAF_CONFIG, "Input file should not be modified");
    debug!("Test passed for cleaning a single file.");
}

#[tokio::test]
async fn test_clean_single_file_into_existing_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("leaf1.cfg");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&output_dir).await.unwrap();
    fs::write(&input, LEAF_CONFIG).await.unwrap();

    clean_configs(ConfigCleanerConfig::default(), &input, Some(output_dir.as_path()))
        .await
        .unwrap();

    let content = fs::read_to_string(output_dir.join("leaf1.cfg")).await.unwrap();
    assert_eq!(content, LEAF_CLEANED);
    debug!("Test passed for cleaning into a directory.");
}

#[tokio::test]
async fn test_clean_directory_mirrors_layout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("intended").join("configs");
    let output = dir.path().join("lab");
    fs::create_dir_all(input.join("pod1")).await.unwrap();
    fs::write(input.join("leaf1.cfg"), LEAF_CONFIG).await.unwrap();
    fs::write(input.join("pod1").join("leaf2.cfg"), LEAF_CONFIG.replace("leaf1", "leaf2"))
        .await
        .unwrap();
    fs::write(input.join("README.md"), "not a config").await.unwrap();

    let summary = clean_configs(ConfigCleanerConfig::default(), &input, Some(output.as_path()))
        .await
        .unwrap();

    assert_eq!(summary.files_cleaned, 2);
    assert_eq!(summary.files_skipped, 0);
    assert_eq!(
        fs::read_to_string(output.join("leaf1.cfg")).await.unwrap(),
        LEAF_CLEANED
    );
    assert_eq!(
        fs::read_to_string(output.join("pod1").join("leaf2.cfg"))
            .await
            .unwrap(),
        LEAF_CLEANED.replace("leaf1", "leaf2")
    );
    assert!(!output.join("README.md").exists());
    debug!("Test passed for cleaning a directory.");
}

#[tokio::test]
async fn test_clean_directory_skips_unreadable_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("configs");
    let output = dir.path().join("lab");
    fs::create_dir_all(&input).await.unwrap();
    fs::write(input.join("good.cfg"), LEAF_CONFIG).await.unwrap();
    fs::write(input.join("bad.cfg"), [0xff_u8, 0xfe, 0xfd]).await.unwrap();

    let summary = clean_configs(ConfigCleanerConfig::default(), &input, Some(output.as_path()))
        .await
        .unwrap();

    assert_eq!(summary.files_cleaned, 1);
    assert_eq!(summary.files_skipped, 1);
    assert!(output.join("good.cfg").exists());
    assert!(!output.join("bad.cfg").exists());
    debug!("Test passed for skipping unreadable files.");
}

#[tokio::test]
async fn test_clean_missing_input_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.cfg");

    let result = clean_configs(ConfigCleanerConfig::default(), &input, None).await;

    match result {
        Err(ToolkitError::FileReadError(path, _)) => assert!(path.contains("missing.cfg")),
        other => panic!("Expected FileReadError, got {:?}", other),
    }
    debug!("Test passed for missing input.");
}

#[tokio::test]
async fn test_clean_glob_without_matches_fails() {
    let dir = tempdir().unwrap();
    let pattern = dir.path().join("intended").join("*.cfg");

    let result = clean_configs(ConfigCleanerConfig::default(), &pattern, None).await;

    assert!(
        matches!(result, Err(ToolkitError::ConfigError(_))),
        "Expected a configuration error, got {:?}",
        result
    );
    debug!("Test passed for glob without matches.");
}

#[tokio::test]
async fn test_clean_glob_mirrors_layout_below_wildcard() {
    let dir = tempdir().unwrap();
    let intended = dir.path().join("intended");
    let output = dir.path().join("lab");
    fs::create_dir_all(intended.join("pod1")).await.unwrap();
    fs::create_dir_all(intended.join("pod2")).await.unwrap();
    fs::write(intended.join("pod1").join("leaf.cfg"), "hostname pod1-leaf\n")
        .await
        .unwrap();
    fs::write(intended.join("pod2").join("leaf.cfg"), "hostname pod2-leaf\n")
        .await
        .unwrap();

    let pattern = intended.join("*").join("*.cfg");
    let summary = clean_configs(ConfigCleanerConfig::default(), &pattern, Some(output.as_path()))
        .await
        .unwrap_or_else(|e| panic!("Failed to clean glob: {:?}", e));

    assert_eq!(summary.files_cleaned, 2);
    assert_eq!(
        fs::read_to_string(output.join("pod1").join("leaf.cfg"))
            .await
            .unwrap(),
        "hostname pod1-leaf\n"
    );
    assert_eq!(
        fs::read_to_string(output.join("pod2").join("leaf.cfg"))
            .await
            .unwrap(),
        "hostname pod2-leaf\n"
    );
    assert!(!output.join("leaf.cfg").exists());
    debug!("Test passed for glob layout mirroring.");
}

#[tokio::test]
async fn test_clean_flushes_unclosed_block_when_configured() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("truncated.cfg");
    let output = dir.path().join("truncated-lab.cfg");
    fs::write(&input, "hostname leaf1\n!\naaa root secret x\n")
        .await
        .unwrap();

    let cleaner = BasicConfigCleaner::new(ConfigCleanerConfig {
        profile: CleanProfile::default(),
        unclosed_policy: UnclosedBlockPolicy::Flush,
        show_diff: false,
    });
    cleaner.clean(&input, Some(output.as_path())).await.unwrap();

    let content = fs::read_to_string(&output).await.unwrap();
    assert_eq!(content, "hostname leaf1\n!\naaa root secret x\n");
    debug!("Test passed for flushing unclosed blocks.");
}

#[tokio::test]
#[traced_test]
async fn test_clean_logs_diff_when_requested() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("leaf1.cfg");
    let output = dir.path().join("leaf1-lab.cfg");
    fs::write(&input, LEAF_CONFIG).await.unwrap();

    let config = ConfigCleanerConfig {
        show_diff: true,
        ..ConfigCleanerConfig::default()
    };
    clean_configs(config, &input, Some(output.as_path())).await.unwrap();

    assert!(logs_contain("Diff for file"));
    assert!(logs_contain("Cleaned"));
}
