use crate::matcher::{BlockMatcher, MatchState};
use crate::updater::BlockUpdater;
use tracing::{debug, instrument, trace, warn};

/// What happens to a block that is still open when the input runs out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnclosedBlockPolicy {
    /// Discard the buffered lines.
    #[default]
    Drop,
    /// Write the buffered lines out unchanged.
    Flush,
}

/// A matcher and the updater applied to the blocks it finds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    pub matcher: BlockMatcher,
    pub updater: BlockUpdater,
}

impl BlockRule {
    pub fn new(matcher: BlockMatcher, updater: BlockUpdater) -> Self {
        BlockRule { matcher, updater }
    }
}

/// Result of a single processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub text: String,
    /// Blocks that reached their end line and went through an updater.
    pub blocks_updated: usize,
    /// Of those, blocks whose updater produced no lines.
    pub blocks_removed: usize,
    /// Lines of a block left open at end of input.
    pub unclosed_lines: usize,
}

#[derive(Debug)]
struct OpenBlock<'a> {
    rule: usize,
    lines: Vec<&'a str>,
}

/// Single-pass block rewriter.
///
/// Lines outside any block are copied through. When a line satisfies a
/// rule's matcher (rules are tried in order, first match wins) the processor
/// buffers lines until that same matcher reports the end of the block, then
/// writes whatever the rule's updater returns.
#[derive(Debug, Clone, Default)]
pub struct BlockProcessor {
    rules: Vec<BlockRule>,
    unclosed_policy: UnclosedBlockPolicy,
}

impl BlockProcessor {
    pub fn new(rules: Vec<BlockRule>) -> Self {
        debug!("Creating BlockProcessor with {} rules", rules.len());
        BlockProcessor {
            rules,
            unclosed_policy: UnclosedBlockPolicy::default(),
        }
    }

    pub fn with_unclosed_policy(mut self, policy: UnclosedBlockPolicy) -> Self {
        self.unclosed_policy = policy;
        self
    }

    pub fn unclosed_policy(&self) -> UnclosedBlockPolicy {
        self.unclosed_policy
    }

    pub fn process(&self, config: &str) -> String {
        self.run(config).text
    }

    #[instrument(level = "trace", skip(self, config))]
    pub fn run(&self, config: &str) -> ProcessOutcome {
        let mut states = vec![MatchState::default(); self.rules.len()];
        let mut outcome = ProcessOutcome {
            text: String::with_capacity(config.len()),
            ..ProcessOutcome::default()
        };
        let mut open: Option<OpenBlock<'_>> = None;

        for (number, line) in config.lines().enumerate() {
            if let Some(block) = open.as_mut() {
                block.lines.push(line);
                let rule = &self.rules[block.rule];
                if rule.matcher.is_end(line) {
                    let updated = rule.updater.update_block(&block.lines);
                    trace!(
                        "Block '{}' closed at line {}: {} lines in, {} lines out",
                        rule.matcher.keyword(),
                        number + 1,
                        block.lines.len(),
                        updated.len()
                    );
                    outcome.blocks_updated += 1;
                    if updated.is_empty() {
                        outcome.blocks_removed += 1;
                    }
                    for updated_line in &updated {
                        push_line(&mut outcome.text, updated_line);
                    }
                    open = None;
                }
                continue;
            }

            match self.find_rule(line, &mut states) {
                Some(rule) => {
                    trace!(
                        "Block '{}' opened at line {}",
                        self.rules[rule].matcher.keyword(),
                        number + 1
                    );
                    open = Some(OpenBlock {
                        rule,
                        lines: vec![line],
                    });
                }
                None => push_line(&mut outcome.text, line),
            }
        }

        if let Some(block) = open {
            outcome.unclosed_lines = block.lines.len();
            let keyword = self.rules[block.rule].matcher.keyword();
            match self.unclosed_policy {
                UnclosedBlockPolicy::Drop => {
                    warn!(
                        "Block '{}' was never closed; dropping {} trailing lines",
                        keyword,
                        block.lines.len()
                    );
                }
                UnclosedBlockPolicy::Flush => {
                    warn!(
                        "Block '{}' was never closed; keeping {} trailing lines unchanged",
                        keyword,
                        block.lines.len()
                    );
                    for line in block.lines {
                        push_line(&mut outcome.text, line);
                    }
                }
            }
        }

        debug!(
            "Processed configuration: {} blocks updated, {} removed",
            outcome.blocks_updated, outcome.blocks_removed
        );
        outcome
    }

    fn find_rule(&self, line: &str, states: &mut [MatchState]) -> Option<usize> {
        self.rules
            .iter()
            .zip(states.iter_mut())
            .position(|(rule, state)| rule.matcher.matches(line, state))
    }
}

/// Runs `rules` over `config` once, dropping any block left open.
pub fn process(config: &str, rules: Vec<BlockRule>) -> String {
    BlockProcessor::new(rules).process(config)
}

fn push_line(text: &mut String, line: &str) {
    text.push_str(line);
    text.push('\n');
}
