use tracing::trace;

/// Section separator that closes a block in EOS configurations.
pub const BLOCK_DELIMITER: &str = "!";

/// Detects where a block starts and where it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockMatcher {
    Prefix(PrefixMatcher),
    Nested(NestedMatcher),
}

/// Starts a block on any line whose trimmed content begins with `keyword`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    keyword: String,
}

/// Starts a block on a line containing `keyword`, but only while the parent
/// matcher has an open block (e.g. `mtu` inside `interface`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedMatcher {
    parent: Box<BlockMatcher>,
    keyword: String,
}

/// Mutable matching state for one processing run.
///
/// Matchers themselves are immutable; whatever they need to remember between
/// lines lives here. The processor builds a fresh state per run so nothing
/// carries over from one configuration to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    in_parent_block: bool,
    parent: Option<Box<MatchState>>,
}

impl MatchState {
    pub fn in_parent_block(&self) -> bool {
        self.in_parent_block
    }
}

impl BlockMatcher {
    pub fn prefix(keyword: impl Into<String>) -> Self {
        BlockMatcher::Prefix(PrefixMatcher::new(keyword))
    }

    pub fn nested(parent: BlockMatcher, keyword: impl Into<String>) -> Self {
        BlockMatcher::Nested(NestedMatcher::new(parent, keyword))
    }

    pub fn keyword(&self) -> &str {
        match self {
            BlockMatcher::Prefix(m) => &m.keyword,
            BlockMatcher::Nested(m) => &m.keyword,
        }
    }

    /// Reports whether `line` opens a block. May update `state`.
    pub fn matches(&self, line: &str, state: &mut MatchState) -> bool {
        match self {
            BlockMatcher::Prefix(m) => m.matches(line),
            BlockMatcher::Nested(m) => m.matches(line, state),
        }
    }

    /// Reports whether `line` closes a block opened by this matcher.
    pub fn is_end(&self, line: &str) -> bool {
        match self {
            BlockMatcher::Prefix(m) => m.is_end(line),
            BlockMatcher::Nested(m) => m.is_end(line),
        }
    }
}

impl PrefixMatcher {
    pub fn new(keyword: impl Into<String>) -> Self {
        PrefixMatcher {
            keyword: keyword.into(),
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        line.trim().starts_with(self.keyword.as_str())
    }

    pub fn is_end(&self, line: &str) -> bool {
        line.trim() == BLOCK_DELIMITER
    }
}

impl NestedMatcher {
    pub fn new(parent: BlockMatcher, keyword: impl Into<String>) -> Self {
        NestedMatcher {
            parent: Box::new(parent),
            keyword: keyword.into(),
        }
    }

    /// The parent's own start line never matches. Once inside the parent,
    /// the first line containing the keyword matches; the parent's end line
    /// leaves the parent scope.
    ///
    /// Only lines scanned outside an open block reach this method, so an end
    /// line swallowed by the nested block itself does not reset the scope.
    pub fn matches(&self, line: &str, state: &mut MatchState) -> bool {
        let parent_state = state.parent.get_or_insert_with(Box::default);
        if self.parent.matches(line, parent_state) {
            trace!("Entering parent block for nested keyword '{}'", self.keyword);
            state.in_parent_block = true;
            return false;
        }

        if state.in_parent_block && line.trim().contains(self.keyword.as_str()) {
            return true;
        }

        if state.in_parent_block && self.parent.is_end(line) {
            trace!("Leaving parent block for nested keyword '{}'", self.keyword);
            state.in_parent_block = false;
        }

        false
    }

    pub fn is_end(&self, line: &str) -> bool {
        self.parent.is_end(line)
    }
}
