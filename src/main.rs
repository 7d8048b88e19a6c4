use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use md2adf::Config;

#[derive(Parser)]
#[command(name = "md2adf")]
#[command(about = "Convert Markdown files to Atlassian Document Format (ADF) JSON")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output JSON file (defaults to standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, default_value = "md2adf.toml")]
    config: PathBuf,

    /// Write JSON without indentation
    #[arg(long)]
    compact: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };
    if cli.compact {
        config.output.pretty = false;
    }

    // Read input file
    let markdown = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    // Render into memory first so a failure leaves no partial file
    let mut json = Vec::new();
    if let Err(e) = md2adf::render(&mut json, &markdown, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match cli.output {
        Some(output) => {
            if let Err(e) = fs::write(&output, &json) {
                eprintln!("Error writing {}: {}", output.display(), e);
                std::process::exit(1);
            }
            println!("Created {}", output.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(&json).and_then(|()| writeln!(stdout)) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
