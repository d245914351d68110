use avd_block_processor::UnclosedBlockPolicy;
use avd_toolkit::clean::{clean_configs, ConfigCleanerConfig};
use avd_toolkit::config::ToolkitConfig;
use avd_toolkit::errors::ToolkitError;
use avd_toolkit::host_interfaces::{generate_host_interfaces, DEFAULT_INTERFACE_RANGE};
use avd_toolkit::inventory::update_inventory_file;
use avd_toolkit::logger::initialize_logger;
use avd_toolkit::parse_output::{check_keyword_thresholds, KeywordCounter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about = "Collection of utilities to use with AVD", long_about = None)]
struct CliArgs {
    /// YAML config file (default: ./.avd-toolkit.yaml, then ~/.avd-toolkit.yaml)
    #[arg(long, global = true, env = "AVD_TOOLKIT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,
    #[command(subcommand)]
    cmd: SubCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum SubCommands {
    /// Cleans a production AVD configuration so it can run on ACT virtual devices
    ActClean(ActCleanArgs),
    /// Updates an Ansible AVD inventory with ACT management addresses
    ActInventory(ActInventoryArgs),
    /// Turns per-host interface CSV files into AVD structured-configuration YAML
    HostInterfaces(HostInterfacesArgs),
    /// Fails when keywords appear in a file more often than allowed
    ParseOutput(ParseOutputArgs),
}

#[derive(Parser, Debug, Clone)]
struct ActCleanArgs {
    #[arg(short = 'i', long, help = "Configuration file, directory of .cfg files, or glob")]
    input: PathBuf,
    #[arg(short = 'o', long, help = "Output file or directory (default: stdout)")]
    output: Option<PathBuf>,
    #[arg(long, help = "Keep a block left open at end of input instead of dropping it")]
    flush_unclosed: bool,
    #[arg(long, help = "Log a diff of every cleaned file")]
    diff: bool,
    #[arg(long, env = "AVD_TOOLKIT_CVADDR", help = "TerminAttr -cvaddr value")]
    cvaddr: Option<String>,
    #[arg(long, env = "AVD_TOOLKIT_CVVRF", help = "TerminAttr -cvvrf value")]
    cvvrf: Option<String>,
    #[arg(long, help = "MTU written on every interface that sets one")]
    mtu: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
struct ActInventoryArgs {
    #[arg(short = 'a', long, default_value = "act-topology.yml")]
    act: PathBuf,
    #[arg(short = 'o', long, default_value = "inventory.yml")]
    original: PathBuf,
    #[arg(short = 'O', long, default_value = "updated-inventory.yml")]
    output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct HostInterfacesArgs {
    #[arg(short = 'f', long, help = "Folder searched recursively for .csv files")]
    folder: PathBuf,
    #[arg(short = 'r', long, default_value = DEFAULT_INTERFACE_RANGE, help = "Interfaces created as unused defaults")]
    range: String,
}

#[derive(Parser, Debug, Clone)]
struct ParseOutputArgs {
    #[arg(short = 'f', long)]
    file: PathBuf,
    #[arg(short = 'k', long, help = "Comma separated keywords, matched case-insensitively")]
    keyword: String,
    #[arg(short = 'c', long, default_value_t = 0, help = "Allowed number of matching lines")]
    count: usize,
}

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse();
    initialize_logger(cli_args.verbose);

    if let Err(e) = run(cli_args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli_args: CliArgs) -> Result<(), ToolkitError> {
    match cli_args.cmd {
        SubCommands::ActClean(args) => {
            let toolkit_config = ToolkitConfig::load(cli_args.config.as_deref()).await?;
            let mut profile = toolkit_config.clean;
            if let Some(cvaddr) = args.cvaddr {
                profile.terminattr.cvaddr = cvaddr;
            }
            if let Some(cvvrf) = args.cvvrf {
                profile.terminattr.cvvrf = cvvrf;
            }
            if let Some(mtu) = args.mtu {
                profile.mtu = mtu;
            }

            let cleaner_config = ConfigCleanerConfig {
                profile,
                unclosed_policy: if args.flush_unclosed {
                    UnclosedBlockPolicy::Flush
                } else {
                    UnclosedBlockPolicy::Drop
                },
                show_diff: args.diff,
            };
            clean_configs(cleaner_config, &args.input, args.output.as_deref()).await?;
        }
        SubCommands::ActInventory(args) => {
            let update = update_inventory_file(&args.original, &args.act, &args.output).await?;
            info!(
                "{} hosts readdressed, {} serial numbers removed",
                update.hosts_updated, update.serials_removed
            );
        }
        SubCommands::HostInterfaces(args) => {
            let summary = generate_host_interfaces(&args.folder, &args.range).await?;
            info!(
                "{} host files written, {} skipped",
                summary.files_written.len(),
                summary.files_skipped
            );
        }
        SubCommands::ParseOutput(args) => {
            let counter = KeywordCounter::from_list(&args.keyword)?;
            check_keyword_thresholds(&args.file, &counter, args.count).await?;
        }
    }
    Ok(())
}
