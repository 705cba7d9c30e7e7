use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bl_core::parser::tokenizer::{classify, tokenize};

/// BL — robot-control language CLI
///
/// Check, print, format, and fingerprint BL programs.
#[derive(Parser)]
#[command(name = "bl", version, about, long_about = None)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log parser activity to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a BL program parses
    Check {
        /// Path to .bl file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a program and print it in canonical form
    Parse {
        /// Path to .bl file
        file: PathBuf,
        /// Print the syntax tree as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Parse a file of bare statements (no PROGRAM wrapper)
    Statement {
        /// Path to statements file
        file: PathBuf,
        /// Print the syntax tree as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Format a program to canonical style
    Fmt {
        /// Path to .bl file
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },

    /// Compute the SHA-256 of a program's canonical form
    Hash {
        /// Path to .bl file
        file: PathBuf,
    },

    /// List the classified tokens of a file
    Tokens {
        /// Path to .bl file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let exit_code = match cli.command {
        Commands::Check { file, json } => cmd_check(&file, json, cli.quiet),
        Commands::Parse { file, json } => cmd_parse(&file, json),
        Commands::Statement { file, json } => cmd_statement(&file, json),
        Commands::Fmt { file, write } => cmd_fmt(&file, write, cli.quiet),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Tokens { file } => cmd_tokens(&file),
        Commands::Version => {
            println!("bl {}", env!("CARGO_PKG_VERSION"));
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "bl_core=debug,bl=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Helpers ───────────────────────────────────────────────

/// Read a source file; I/O failures map to exit code 2
fn read_source(path: &Path) -> Result<String, i32> {
    debug!(file = %path.display(), "reading source");
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!("{} cannot read {}: {}", "error:".red().bold(), path.display(), e);
        2
    })
}

/// Report a fatal parse error; parse failures map to exit code 1
fn report(path: &Path, err: &bl_core::Error) -> i32 {
    eprintln!("{} {}: {}", "error:".red().bold(), path.display(), err);
    1
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("{} serialization failed: {}", "error:".red().bold(), e);
            2
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_check(path: &Path, json: bool, quiet: bool) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match bl_core::parse(&source) {
        Ok(program) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": true,
                    "program": program.name(),
                    "instructions": program.context().keys().collect::<Vec<_>>(),
                }))
            } else {
                if !quiet {
                    println!(
                        "{} {} is valid (program {}, {} instructions)",
                        "✓".green().bold(),
                        path.display(),
                        program.name(),
                        program.context().len()
                    );
                }
                0
            }
        }
        Err(err) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": false,
                    "error": err.to_json(),
                }));
            }
            report(path, &err)
        }
    }
}

fn cmd_parse(path: &Path, json: bool) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match bl_core::parse(&source) {
        Ok(program) if json => print_json(&program),
        Ok(program) => {
            print!("{}", program);
            0
        }
        Err(err) => report(path, &err),
    }
}

fn cmd_statement(path: &Path, json: bool) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match bl_core::parse_statements(&source) {
        Ok(block) if json => print_json(&block),
        Ok(block) => {
            print!("{}", block);
            0
        }
        Err(err) => report(path, &err),
    }
}

fn cmd_fmt(path: &Path, write: bool, quiet: bool) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let program = match bl_core::parse(&source) {
        Ok(p) => p,
        Err(err) => return report(path, &err),
    };
    let formatted = bl_core::print_program(&program);

    if !write {
        print!("{}", formatted);
        return 0;
    }

    if let Err(e) = std::fs::write(path, &formatted) {
        eprintln!("{} cannot write {}: {}", "error:".red().bold(), path.display(), e);
        return 2;
    }
    info!(file = %path.display(), "formatted in place");
    if !quiet {
        println!("{} formatted {}", "✓".green().bold(), path.display());
    }
    0
}

fn cmd_hash(path: &Path) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match bl_core::parse(&source) {
        Ok(program) => {
            println!("{}", bl_core::program_hash(&program));
            0
        }
        Err(err) => report(path, &err),
    }
}

fn cmd_tokens(path: &Path) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    for token in tokenize(&source).iter() {
        let position = token
            .span
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}", position, classify(&token.text), token.text);
    }
    0
}
