use crate::report::{run_mortgage_analysis, run_property_listing, AnalyzeArgs, ListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use property_mortgage::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Property Mortgage Service",
    about = "Serve and exercise the property mortgage backend from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run affordability checks without the HTTP layer
    Mortgage {
        #[command(subcommand)]
        command: MortgageCommand,
    },
    /// Inspect the property listing catalog
    Properties {
        #[command(subcommand)]
        command: PropertiesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum MortgageCommand {
    /// Print the affordability breakdown and approval checks for one application
    Analyze(AnalyzeArgs),
}

#[derive(Subcommand, Debug)]
enum PropertiesCommand {
    /// Print listings, optionally restricted to a bounding box
    List(ListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Mortgage {
            command: MortgageCommand::Analyze(args),
        } => run_mortgage_analysis(args).await,
        Command::Properties {
            command: PropertiesCommand::List(args),
        } => run_property_listing(args),
    }
}
