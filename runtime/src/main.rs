use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toploader_runtime::cli::{settings_cmd, simulate};
use toploader_runtime::Settings;

#[derive(Parser)]
#[command(name = "toploader", version, about = "Navigation progress bar, driven headless")]
struct Cli {
    /// Settings file (default: ~/.toploader/settings.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Suppress human-readable output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay clicks on a headless page and print every bar frame
    Simulate {
        /// Clicked hrefs, in order
        #[arg(required = true)]
        clicks: Vec<String>,

        /// Location the page starts at
        #[arg(long, default_value = "https://example.com/")]
        from: String,

        /// Simulated page load per navigation, in milliseconds
        #[arg(long, default_value_t = 800)]
        load_ms: u64,

        /// Mirror the bar in the terminal while the session runs
        #[arg(long)]
        live: bool,
    },
    /// Show the effective settings
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var("TOPLOADER_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("TOPLOADER_QUIET", "1");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("toploader_runtime=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Simulate {
            clicks,
            from,
            load_ms,
            live,
        } => {
            let args = simulate::SimulateArgs {
                from,
                clicks,
                load_ms,
                live,
            };
            simulate::run(settings, args).await
        }
        Command::Settings => {
            let source = cli
                .config
                .or_else(|| Some(Settings::default_path()).filter(|p| p.exists()));
            settings_cmd::run(&settings, source.as_deref())
        }
    }
}
