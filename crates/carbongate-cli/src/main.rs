use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "carbongate",
    about = "carbongate — carbon budget gate for training jobs",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a job's emissions and run the gate check.
    ///
    /// Reads the job from a TOML spec, estimates emissions through the
    /// physics pipeline, and prints the gate decision. Exits non-zero
    /// when the gate blocks.
    Check {
        /// Path to the job spec (see `carbongate init`)
        #[arg(short, long)]
        spec: String,
        /// Path to carbongate.toml (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Skip the live data source and use static fallbacks only
        #[arg(long)]
        offline: bool,
    },
    /// Scaffold a starter job spec
    Init {
        /// Where to write the spec
        #[arg(short, long, default_value = "job.toml")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carbongate=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            spec,
            config,
            format,
            offline,
        } => commands::check::check(&spec, config.as_deref(), &format, offline).await,
        Commands::Init { path } => commands::init::init(&path),
    }
}
