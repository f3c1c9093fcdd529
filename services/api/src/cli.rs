use crate::scan::{run_organ_catalog, run_scan, ScanArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rezzonix::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "RezzoniX Analyzer",
    about = "Run the RezzoniX organ balance analyzer service or score scans from the command line",
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
    /// Score a balance scan without persisting it
    Scan(ScanArgs),
    /// List the organs that can be selected for a scan
    Organs,
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
        Command::Scan(args) => run_scan(args),
        Command::Organs => run_organ_catalog(),
    }
}
