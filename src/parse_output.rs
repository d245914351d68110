use crate::errors::ToolkitError;
use crate::utils::read_file_content;
use regex::{Regex, RegexBuilder};
use std::path::Path;
use tracing::{debug, info};

/// Lines of a file that mention one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHits {
    pub keyword: String,
    pub lines: Vec<String>,
}

impl KeywordHits {
    pub fn count(&self) -> usize {
        self.lines.len()
    }
}

/// Case-insensitive keyword counter. A line counts once per keyword no
/// matter how many times the keyword appears in it.
#[derive(Debug)]
pub struct KeywordCounter {
    keywords: Vec<(String, Regex)>,
}

impl KeywordCounter {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, ToolkitError> {
        let mut compiled: Vec<(String, Regex)> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() || compiled.iter().any(|(k, _)| *k == keyword) {
                continue;
            }
            let re = RegexBuilder::new(&regex::escape(&keyword))
                .case_insensitive(true)
                .build()?;
            compiled.push((keyword, re));
        }

        if compiled.is_empty() {
            return Err(ToolkitError::ConfigError(
                "At least one keyword is required".to_string(),
            ));
        }
        debug!(
            "Counting keywords: {:?}",
            compiled.iter().map(|(k, _)| k).collect::<Vec<_>>()
        );
        Ok(KeywordCounter { keywords: compiled })
    }

    /// Parses a comma separated keyword list such as `error,fail`.
    pub fn from_list(list: &str) -> Result<Self, ToolkitError> {
        let keywords: Vec<&str> = list.split(',').collect();
        Self::new(&keywords)
    }

    /// Returns hits for every keyword, in the order the keywords were given.
    pub fn count(&self, content: &str) -> Vec<KeywordHits> {
        let mut hits: Vec<KeywordHits> = self
            .keywords
            .iter()
            .map(|(keyword, _)| KeywordHits {
                keyword: keyword.clone(),
                lines: Vec::new(),
            })
            .collect();

        for line in content.lines() {
            for ((_, re), hit) in self.keywords.iter().zip(hits.iter_mut()) {
                if re.is_match(line) {
                    hit.lines.push(line.to_string());
                }
            }
        }
        hits
    }
}

pub fn exceeding(hits: &[KeywordHits], threshold: usize) -> Vec<&KeywordHits> {
    hits.iter().filter(|hit| hit.count() > threshold).collect()
}

/// Counts keywords in `path` and fails if any of them shows up on more than
/// `threshold` lines. The offending lines are logged.
pub async fn check_keyword_thresholds(
    path: &Path,
    counter: &KeywordCounter,
    threshold: usize,
) -> Result<Vec<KeywordHits>, ToolkitError> {
    let content = read_file_content(path).await?;
    let hits = counter.count(&content);

    let mut over_keywords = Vec::new();
    for hit in exceeding(&hits, threshold) {
        info!(
            "Keyword '{}' appears {} times, exceeding the threshold of {}. Matching lines:\n{}\n",
            hit.keyword,
            hit.count(),
            threshold,
            hit.lines.join("\n")
        );
        over_keywords.push(hit.keyword.clone());
    }

    if !over_keywords.is_empty() {
        return Err(ToolkitError::ThresholdExceeded(format!(
            "{} in {}",
            over_keywords.join(", "),
            path.display()
        )));
    }

    info!("No keyword exceeded the threshold of {} in {}", threshold, path.display());
    Ok(hits)
}
