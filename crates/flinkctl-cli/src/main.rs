//! flinkctl - deploy and update Apache Flink jobs from the command line.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flinkctl")]
#[command(about = "Deploy, update and terminate Apache Flink jobs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the jobs known to the job manager
    List,

    /// Upload a job JAR to the job manager and start it
    Deploy(commands::deploy::DeployArgs),

    /// Update a running job: savepoint, cancel, redeploy from the savepoint
    Update(commands::update::UpdateArgs),

    /// Terminate a running job
    Terminate(commands::terminate::TerminateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), anyhow::Error> = match cli.command {
        Commands::List => commands::list::run().await,
        Commands::Deploy(args) => commands::deploy::run(args).await,
        Commands::Update(args) => commands::update::run(args).await,
        Commands::Terminate(args) => commands::terminate::run(args).await,
    };

    if let Err(error) = result {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
