use crate::errors::ToolkitError;
use crate::utils::{collect_files, read_file_content, write_file_content};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const INTERFACE_FILE_EXTENSION: &str = "csv";
pub const HOST_FILE_EXTENSION: &str = "yml";
pub const DEFAULT_INTERFACE_RANGE: &str = "Ethernet10-20";
pub const UNUSED_DESCRIPTION: &str = "unused";

const INTERFACE_RANGE_PATTERN: &str = r"([a-zA-Z/]+)(\d+)-(\d+)";
const CSV_DELIMITER: char = ',';

/// One entry of `custom_structured_configuration_ethernet_interfaces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub shutdown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u32>,
}

impl HostInterface {
    /// An administratively down interface marked as unused.
    pub fn unused(name: impl Into<String>) -> Self {
        HostInterface {
            name: name.into(),
            description: UNUSED_DESCRIPTION.to_string(),
            shutdown: true,
            vlan: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInterfaceFile {
    pub custom_structured_configuration_ethernet_interfaces: Vec<HostInterface>,
}

/// A contiguous run of interfaces such as `Ethernet10-20`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRange {
    pub base: String,
    pub lower: u32,
    pub higher: u32,
}

impl InterfaceRange {
    pub fn parse(range: &str) -> Result<Self, ToolkitError> {
        let re = Regex::new(INTERFACE_RANGE_PATTERN)?;
        let caps = re.captures(range).ok_or_else(|| {
            ToolkitError::ConfigError(format!(
                "Invalid interface range '{}', expected a form like {}",
                range, DEFAULT_INTERFACE_RANGE
            ))
        })?;

        let bound = |index: usize, label: &str| -> Result<u32, ToolkitError> {
            caps[index].parse().map_err(|e| {
                ToolkitError::ConfigError(format!("Invalid {} bound in '{}': {}", label, range, e))
            })
        };
        let lower = bound(2, "lower")?;
        let higher = bound(3, "higher")?;
        if lower > higher {
            return Err(ToolkitError::ConfigError(format!(
                "Interface range '{}' ends before it starts",
                range
            )));
        }

        Ok(InterfaceRange {
            base: caps[1].to_string(),
            lower,
            higher,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        (self.lower..=self.higher).map(move |n| format!("{}{}", self.base, n))
    }

    pub fn default_interfaces(&self) -> Vec<HostInterface> {
        self.names().map(HostInterface::unused).collect()
    }
}

/// Parses a host interface CSV (`interface,description,shutdown` with a
/// header row). Only `false` in the third column brings an interface up.
pub fn parse_interface_csv(content: &str) -> Result<Vec<HostInterface>, ToolkitError> {
    let mut interfaces = Vec::new();

    for (number, line) in content
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
    {
        let fields = parse_csv_line(line, CSV_DELIMITER);
        if fields.len() < 3 {
            return Err(ToolkitError::CsvError(format!(
                "line {} has {} fields, expected interface,description,shutdown",
                number + 1,
                fields.len()
            )));
        }
        interfaces.push(HostInterface {
            name: fields[0].clone(),
            description: fields[1].clone(),
            shutdown: !fields[2].eq_ignore_ascii_case("false"),
            vlan: None,
        });
    }

    Ok(interfaces)
}

/// Splits one CSV line, honouring double-quoted fields and `""` escapes.
fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());

    fields
}

/// Interfaces from the CSV come first, in file order (a repeated name keeps
/// its last row); range defaults not mentioned in the CSV follow in order.
pub fn merge_interfaces(
    configured: Vec<HostInterface>,
    defaults: Vec<HostInterface>,
) -> Vec<HostInterface> {
    let mut merged: Vec<HostInterface> = Vec::with_capacity(configured.len() + defaults.len());

    for interface in configured {
        match merged.iter_mut().find(|i| i.name == interface.name) {
            Some(existing) => *existing = interface,
            None => merged.push(interface),
        }
    }
    for interface in defaults {
        if !merged.iter().any(|i| i.name == interface.name) {
            merged.push(interface);
        }
    }

    merged
}

pub fn render_host_file(interfaces: Vec<HostInterface>) -> Result<String, ToolkitError> {
    let file = HostInterfaceFile {
        custom_structured_configuration_ethernet_interfaces: interfaces,
    };
    Ok(serde_yaml::to_string(&file)?)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInterfacesSummary {
    pub files_written: Vec<PathBuf>,
    pub files_skipped: usize,
}

async fn write_host_file(csv: &Path, defaults: &[HostInterface]) -> Result<PathBuf, ToolkitError> {
    let content = read_file_content(csv).await?;
    let configured = parse_interface_csv(&content).map_err(|e| match e {
        ToolkitError::CsvError(message) => {
            ToolkitError::CsvError(format!("{}: {}", csv.display(), message))
        }
        other => other,
    })?;
    debug!("{}: {} configured interfaces", csv.display(), configured.len());

    let merged = merge_interfaces(configured, defaults.to_vec());
    let destination = csv.with_extension(HOST_FILE_EXTENSION);
    write_file_content(&destination, &render_host_file(merged)?).await?;
    Ok(destination)
}

/// Writes a `.yml` host file next to every `.csv` under `folder`, filling the
/// interface `range` with unused defaults.
pub async fn generate_host_interfaces(
    folder: &Path,
    range: &str,
) -> Result<HostInterfacesSummary, ToolkitError> {
    let range = InterfaceRange::parse(range)?;
    let defaults = range.default_interfaces();
    debug!(
        "Default interfaces {}{}-{}: {}",
        range.base,
        range.lower,
        range.higher,
        defaults.len()
    );

    let files = collect_files(folder, INTERFACE_FILE_EXTENSION)?;
    if files.is_empty() {
        return Err(ToolkitError::ConfigError(format!(
            "No .{} files found in {}",
            INTERFACE_FILE_EXTENSION,
            folder.display()
        )));
    }

    let mut summary = HostInterfacesSummary::default();
    for file in files {
        match write_host_file(&file, &defaults).await {
            Ok(destination) => {
                info!("Wrote {}", destination.display());
                summary.files_written.push(destination);
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                summary.files_skipped += 1;
            }
        }
    }

    Ok(summary)
}
