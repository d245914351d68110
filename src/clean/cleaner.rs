use crate::clean::catalog::{build_rules, CleanProfile};
use crate::errors::ToolkitError;
use crate::utils::{
    collect_files, glob_base, is_glob, print_diff, read_file_content, write_file_content,
};
use async_trait::async_trait;
use avd_block_processor::{BlockProcessor, ProcessOutcome, UnclosedBlockPolicy};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub const CONFIG_EXTENSION: &str = "cfg";

#[derive(Debug, Clone, Default)]
pub struct ConfigCleanerConfig {
    pub profile: CleanProfile,
    pub unclosed_policy: UnclosedBlockPolicy,
    pub show_diff: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub files_cleaned: usize,
    pub files_skipped: usize,
    pub blocks_updated: usize,
    pub blocks_removed: usize,
}

#[async_trait]
pub trait ConfigCleaner {
    /// Cleans `input` (a `.cfg` file, a directory or a glob) and writes the
    /// result to `output`, or to stdout when no output is given.
    async fn clean(&self, input: &Path, output: Option<&Path>)
        -> Result<CleanSummary, ToolkitError>;
}

pub struct BasicConfigCleaner {
    config: ConfigCleanerConfig,
    processor: BlockProcessor,
}

impl BasicConfigCleaner {
    pub fn new(config: ConfigCleanerConfig) -> Self {
        let processor = BlockProcessor::new(build_rules(&config.profile))
            .with_unclosed_policy(config.unclosed_policy);
        BasicConfigCleaner { config, processor }
    }

    pub fn clean_text(&self, text: &str) -> ProcessOutcome {
        self.processor.run(text)
    }

    async fn clean_file(
        &self,
        source: &Path,
        destination: Option<&Path>,
        summary: &mut CleanSummary,
    ) -> Result<(), ToolkitError> {
        debug!("Cleaning configuration: {}", source.display());
        let original = read_file_content(source).await?;
        let outcome = self.clean_text(&original);

        if outcome.unclosed_lines > 0 {
            warn!(
                "{} ends inside an open block ({} lines)",
                source.display(),
                outcome.unclosed_lines
            );
        }
        if self.config.show_diff {
            print_diff(&source.display().to_string(), &original, &outcome.text);
        }

        match destination {
            Some(path) => {
                write_file_content(path, &outcome.text).await?;
                info!("Cleaned {} -> {}", source.display(), path.display());
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(outcome.text.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        summary.files_cleaned += 1;
        summary.blocks_updated += outcome.blocks_updated;
        summary.blocks_removed += outcome.blocks_removed;
        Ok(())
    }
}

#[async_trait]
impl ConfigCleaner for BasicConfigCleaner {
    async fn clean(
        &self,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<CleanSummary, ToolkitError> {
        let mut summary = CleanSummary::default();

        if input.is_file() {
            let destination = output.map(|path| {
                if path.is_dir() {
                    path.join(input.file_name().unwrap_or_default())
                } else {
                    path.to_path_buf()
                }
            });
            self.clean_file(input, destination.as_deref(), &mut summary)
                .await?;
            return Ok(summary);
        }

        if !input.exists() && !is_glob(input) {
            return Err(ToolkitError::FileReadError(
                input.display().to_string(),
                "No such file or directory".to_string(),
            ));
        }

        let files = collect_files(input, CONFIG_EXTENSION)?;
        if files.is_empty() {
            return Err(ToolkitError::ConfigError(format!(
                "No .{} files found in {}",
                CONFIG_EXTENSION,
                input.display()
            )));
        }

        let base = if input.is_dir() {
            input.to_path_buf()
        } else {
            glob_base(input)
        };
        for file in files {
            let destination = output.map(|dir| dir.join(relative_name(&base, &file)));
            if let Err(e) = self
                .clean_file(&file, destination.as_deref(), &mut summary)
                .await
            {
                warn!("Skipping {}: {}", file.display(), e);
                summary.files_skipped += 1;
            }
        }

        info!(
            "Cleaned {} files ({} skipped): {} blocks updated, {} removed",
            summary.files_cleaned,
            summary.files_skipped,
            summary.blocks_updated,
            summary.blocks_removed
        );
        Ok(summary)
    }
}

fn relative_name(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.file_name().map(PathBuf::from).unwrap_or_default())
}

pub async fn clean_configs(
    config: ConfigCleanerConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<CleanSummary, ToolkitError> {
    let cleaner = BasicConfigCleaner::new(config);
    cleaner.clean(input, output).await
}
