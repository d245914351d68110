use avd_block_processor::{BlockMatcher, BlockRule, BlockUpdater};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_USERNAMES: &[&str] = &[
    "username arista privilege 15 role network-admin nopassword",
    "username cvpadmin privilege 15 role network-admin nopassword",
    "username ec2-user shell /bin/bash nopassword",
];

pub const DEFAULT_REMOVED_BLOCKS: &[&str] = &["monitor", "aaa", "snmp-server", "queue-monitor"];

pub const DEFAULT_MTU: u32 = 1500;

const TERMINATTR_EXCLUDES: &str = "-smashexcludes=ale,flexCounter,hardware,kni,pulse,strata \
-ingestexclude=/Sysdb/cell/1/agent,/Sysdb/cell/2/agent";

/// Streaming agent settings written into the lab `daemon TerminAttr` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminAttrSettings {
    pub cvaddr: String,
    pub cvauth: String,
    pub cvvrf: String,
    pub extra_flags: Vec<String>,
}

impl Default for TerminAttrSettings {
    fn default() -> Self {
        TerminAttrSettings {
            cvaddr: "192.168.0.5:9910".to_string(),
            cvauth: "token,/tmp/token".to_string(),
            cvvrf: "default".to_string(),
            extra_flags: vec!["-cvcompression=gzip".to_string(), "-taillogs".to_string()],
        }
    }
}

impl TerminAttrSettings {
    /// Renders the daemon block without its closing delimiter.
    pub fn render(&self) -> Vec<String> {
        let mut exec = format!(
            "   exec /usr/bin/TerminAttr -cvaddr={} -cvauth={} -cvvrf={} {}",
            self.cvaddr, self.cvauth, self.cvvrf, TERMINATTR_EXCLUDES
        );
        for flag in &self.extra_flags {
            exec.push(' ');
            exec.push_str(flag);
        }
        vec![
            "daemon TerminAttr".to_string(),
            exec,
            "   no shutdown".to_string(),
        ]
    }
}

/// Everything `act-clean` changes in a production configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanProfile {
    pub usernames: Vec<String>,
    pub terminattr: TerminAttrSettings,
    pub mtu: u32,
    pub remove: Vec<String>,
}

impl Default for CleanProfile {
    fn default() -> Self {
        CleanProfile {
            usernames: DEFAULT_USERNAMES.iter().map(|s| s.to_string()).collect(),
            terminattr: TerminAttrSettings::default(),
            mtu: DEFAULT_MTU,
            remove: DEFAULT_REMOVED_BLOCKS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CleanProfile {
    pub fn mtu_line(&self) -> String {
        format!("   mtu {}", self.mtu)
    }
}

/// Builds the ordered rule list for a profile. Order matters: the interface
/// MTU rule must see every line outside a block to track interface scope.
pub fn build_rules(profile: &CleanProfile) -> Vec<BlockRule> {
    let mut rules = vec![
        BlockRule::new(
            BlockMatcher::nested(BlockMatcher::prefix("interface"), "mtu"),
            BlockUpdater::rewrite("mtu", profile.mtu_line()),
        ),
        BlockRule::new(
            BlockMatcher::prefix("username"),
            BlockUpdater::replace_lines(&profile.usernames),
        ),
        BlockRule::new(
            BlockMatcher::prefix("daemon TerminAttr"),
            BlockUpdater::replace_lines(&profile.terminattr.render()),
        ),
    ];

    for keyword in profile.remove.iter().filter(|k| !k.trim().is_empty()) {
        rules.push(BlockRule::new(
            BlockMatcher::prefix(keyword.trim()),
            BlockUpdater::remove(),
        ));
    }

    debug!("Built {} clean rules", rules.len());
    rules
}
