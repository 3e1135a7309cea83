use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "squash-imports",
    version,
    about = "Remove blank lines inside the import block of Go source files",
    long_about = None
)]
struct Cli {
    #[arg(required = true, help = "Go source files or directories to process")]
    paths: Vec<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Verbose logging")]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    for path in &cli.paths {
        squash_imports::process_path(path)?;
    }

    Ok(())
}
