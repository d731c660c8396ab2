use crate::demo::{run_demo, run_evaluate, run_rules, DemoArgs, EvaluateArgs, RulesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use buyers_tool::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scratch & Dent Buyer's Tool",
    about = "Evaluate scratch-and-dent appliance deals and serve the decision compiler over HTTP",
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
    /// Compile a buyer input file and print the recommendation with its trace
    Evaluate(EvaluateArgs),
    /// List the rule registry, thresholds, and version triple
    Rules(RulesArgs),
    /// Run the built-in sample deals through the compiler
    Demo(DemoArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Rules(args) => run_rules(args),
        Command::Demo(args) => run_demo(args),
    }
}
