use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use grand_exchanger::cli::fetch::{DateRange, parse_datetime};
use grand_exchanger::cli::info::InfoCommand;
use grand_exchanger::cli::{Target, ui};
use grand_exchanger::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display categories and items
    #[command(subcommand)]
    Info(InfoCommands),
    /// Output measurements for current prices
    #[command(subcommand)]
    Poll(TargetCommands),
    /// Output measurements for historical daily prices
    Fetch {
        /// Start of the interval (default: 1000 days ago)
        #[arg(short, long, value_parser = parse_datetime)]
        start: Option<DateTime<Utc>>,
        /// End of the interval, exclusive (default: now)
        #[arg(short = 'f', long = "final", value_parser = parse_datetime)]
        end: Option<DateTime<Utc>>,
        /// A specific day, instead of an interval
        #[arg(short, long, value_parser = parse_datetime)]
        date: Option<DateTime<Utc>>,
        #[command(subcommand)]
        target: TargetCommands,
    },
}

#[derive(Subcommand)]
enum InfoCommands {
    /// List all categories
    Ls {
        /// Skip counting the items of every category
        #[arg(long)]
        without_counts: bool,
    },
    /// Display information about an item
    Item { id: i64 },
    /// Display information about the items of a category
    Category { id: i64 },
}

#[derive(Subcommand)]
enum TargetCommands {
    /// A single item
    Item { id: i64 },
    /// Every item in a category
    Category { id: i64 },
    /// Every item in every category
    All,
}

impl From<InfoCommands> for InfoCommand {
    fn from(cmd: InfoCommands) -> InfoCommand {
        match cmd {
            InfoCommands::Ls { without_counts } => InfoCommand::ListCategories {
                with_counts: !without_counts,
            },
            InfoCommands::Item { id } => InfoCommand::Item(id),
            InfoCommands::Category { id } => InfoCommand::Category(id),
        }
    }
}

impl From<TargetCommands> for Target {
    fn from(cmd: TargetCommands) -> Target {
        match cmd {
            TargetCommands::Item { id } => Target::Item(id),
            TargetCommands::Category { id } => Target::Category(id),
            TargetCommands::All => Target::All,
        }
    }
}

async fn dispatch(command: Commands, config_path: Option<&str>) -> Result<()> {
    let app_command = match command {
        Commands::Setup => return grand_exchanger::cli::setup::setup(),
        Commands::Info(cmd) => grand_exchanger::AppCommand::Info(cmd.into()),
        Commands::Poll(target) => grand_exchanger::AppCommand::Poll(target.into()),
        Commands::Fetch {
            start,
            end,
            date,
            target,
        } => {
            let range = DateRange::from_bounds(start, end, date, Utc::now())?;
            grand_exchanger::AppCommand::Fetch(range, target.into())
        }
    };
    grand_exchanger::run_command(app_command, config_path).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(cmd) => dispatch(cmd, cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
        eprintln!("{}", ui::style_text(&format!("{e:#}"), ui::StyleType::Error));
        std::process::exit(1);
    }
    result
}
