use clap::{Parser, Subcommand};
use koin_graph::{Analyzer, Config, Reporter};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "koin-graph")]
#[command(about = "Extracts the Koin dependency graph from a Kotlin source tree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source tree for Koin modules
    Scan {
        /// Directory to scan (overrides the configured target directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Log every file and component as it is processed
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the config file (defaults to ~/.koin-graph.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum OutputFormat {
    Summary,
    Json,
    Markdown,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            config,
            format,
            verbose,
        } => {
            init_tracing(verbose)?;
            scan_project(path, config, format)?;
        }
        Commands::Config { output } => {
            init_tracing(false)?;
            generate_config(output)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "koin_graph=debug" } else { "koin_graph=warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

fn scan_project(
    target_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let mut config = match config_path {
        Some(config_path) => Config::from_file(&config_path)?,
        None => Config::load()?,
    };

    if let Some(target_path) = target_path {
        config.target_directory = target_path;
    }

    let analyzer = Analyzer::new(config)?;
    let analysis = analyzer.analyze_project();
    let duration = start_time.elapsed();

    let reporter = Reporter::new();
    match format {
        OutputFormat::Summary => {
            analysis.print_summary();
            println!("\n✅ Scan completed in {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let report = reporter.generate_report(&analysis, duration.as_millis());
            println!("{}", reporter.to_json(&report)?);
        }
        OutputFormat::Markdown => {
            let report = reporter.generate_report(&analysis, duration.as_millis());
            println!("{}", reporter.to_markdown(&report));
        }
    }

    Ok(())
}

fn generate_config(output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = match output_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    println!("📝 Generating configuration file: {}", config_path.display());

    std::fs::write(&config_path, Config::create_documented_config())?;

    println!("✅ Configuration file created successfully!");
    println!("💡 Edit ignore_patterns and file_extensions to match your project layout.");

    Ok(())
}
