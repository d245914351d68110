use crate::matcher::BLOCK_DELIMITER;

/// Turns a captured block into the lines written in its place.
/// An empty result removes the block from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockUpdater {
    Replace(ReplaceUpdater),
    Rewrite(RewriteUpdater),
}

/// Collapses the whole block into a fixed payload followed by the delimiter.
/// With an empty payload the block is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceUpdater {
    replacement: String,
}

/// Replaces every block line containing `keyword` with `canonical_line`,
/// leaving the other lines and the terminator untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteUpdater {
    keyword: String,
    canonical_line: String,
}

impl BlockUpdater {
    pub fn replace(replacement: impl Into<String>) -> Self {
        BlockUpdater::Replace(ReplaceUpdater::new(replacement))
    }

    pub fn replace_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        BlockUpdater::Replace(ReplaceUpdater::from_lines(lines))
    }

    pub fn remove() -> Self {
        BlockUpdater::Replace(ReplaceUpdater::default())
    }

    pub fn rewrite(keyword: impl Into<String>, canonical_line: impl Into<String>) -> Self {
        BlockUpdater::Rewrite(RewriteUpdater::new(keyword, canonical_line))
    }

    pub fn update_block(&self, block: &[&str]) -> Vec<String> {
        match self {
            BlockUpdater::Replace(u) => u.update_block(block),
            BlockUpdater::Rewrite(u) => u.update_block(block),
        }
    }

    /// True when this updater drops whatever block it receives.
    pub fn removes(&self) -> bool {
        matches!(self, BlockUpdater::Replace(u) if u.replacement.is_empty())
    }
}

impl ReplaceUpdater {
    pub fn new(replacement: impl Into<String>) -> Self {
        ReplaceUpdater {
            replacement: replacement.into(),
        }
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let replacement = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        ReplaceUpdater { replacement }
    }

    pub fn update_block(&self, _block: &[&str]) -> Vec<String> {
        if self.replacement.is_empty() {
            return Vec::new();
        }
        vec![self.replacement.clone(), BLOCK_DELIMITER.to_string()]
    }
}

impl RewriteUpdater {
    pub fn new(keyword: impl Into<String>, canonical_line: impl Into<String>) -> Self {
        RewriteUpdater {
            keyword: keyword.into(),
            canonical_line: canonical_line.into(),
        }
    }

    pub fn update_block(&self, block: &[&str]) -> Vec<String> {
        block
            .iter()
            .map(|line| {
                if line.trim().contains(self.keyword.as_str()) {
                    self.canonical_line.clone()
                } else {
                    line.to_string()
                }
            })
            .collect()
    }
}
