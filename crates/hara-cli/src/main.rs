use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use hara_cli::{Config, commands};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hara")]
#[command(author, version)]
#[command(
    about = "Summarise HTTP Archive (HAR) files into page and request performance statistics",
    long_about = "hara reads HAR captures and reports request counts, timing percentiles, \
                  transfer sizes and notable outliers per resource type, as JSON or CSV."
)]
struct Cli {
    /// Input files, alias of --input ("-" for stdin)
    #[arg(value_name = "INPUT")]
    paths: Vec<PathBuf>,

    /// Input files, "-" for stdin (repeatable)
    #[arg(short, long, value_name = "INPUT")]
    input: Vec<PathBuf>,

    /// Input folder, every *.har file in it is summarised
    #[arg(short, long, value_name = "FOLDER")]
    folder: Option<PathBuf>,

    /// Output file or folder, "-" for stdout (repeatable, defaults next to the input)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Vec<PathBuf>,

    /// Output data in CSV format
    #[arg(short, long)]
    csv: bool,

    /// Descend into sub-folders when processing a folder
    #[arg(short, long)]
    recursive: bool,

    /// Skip HAR files whose name matches this regex (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Only output error messages, not regular status messages
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        return commands::completion::execute(shell, &mut Cli::command(), &mut std::io::stdout());
    }

    let inputs = if cli.input.is_empty() {
        cli.paths
    } else {
        cli.input
    };

    let config = Config::new(
        inputs,
        cli.output,
        cli.folder,
        cli.csv,
        cli.recursive,
        cli.quiet,
        &cli.exclude,
    )?;

    // Nothing to read: show usage instead of waiting on a terminal
    if config.shows_help(std::io::stdin().is_terminal()) {
        Cli::command().print_help()?;
        return Ok(());
    }

    commands::summarize::execute(&config)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("hara=debug,hara_cli=debug,hara_core=debug")
    } else {
        EnvFilter::new("hara=info,hara_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
