use crate::demo::{run_demo, run_schema, DemoArgs, SchemaArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_pages::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Pages",
    about = "Serve and demonstrate the co-branded landing page wizards",
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
    /// Inspect wizard definitions
    Wizard {
        #[command(subcommand)]
        command: WizardCommand,
    },
    /// Walk sample wizards end to end and print the published output
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum WizardCommand {
    /// Print the step table for one wizard
    Schema(SchemaArgs),
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
        Command::Wizard {
            command: WizardCommand::Schema(args),
        } => run_schema(args),
        Command::Demo(args) => run_demo(args),
    }
}
