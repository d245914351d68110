pub mod matcher;
pub mod processor;
pub mod updater;

pub use matcher::{BlockMatcher, MatchState, NestedMatcher, PrefixMatcher, BLOCK_DELIMITER};
pub use processor::{process, BlockProcessor, BlockRule, ProcessOutcome, UnclosedBlockPolicy};
pub use updater::{BlockUpdater, ReplaceUpdater, RewriteUpdater};
