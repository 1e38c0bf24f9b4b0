//! Cellgraph - typed cells with lookups, driven by line commands

mod commands;
mod config;
mod error;
mod logger;

use anyhow::Context;
use log::LevelFilter;
use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

use commands::Session;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCRIPT]                  File with one command per line (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMD>       Run a command (can be repeated)");
    eprintln!("  --config <path>           Load settings from TOML file");
    eprintln!("  --pretty                  Pretty-print JSON output");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  create <name>:<type> ...  Create a sheet (types: string, int, double, boolean)");
    eprintln!("  set <sheet> <col> <row> <value>");
    eprintln!("  get <sheet>               Print evaluated values");
    eprintln!("  forward <sheet>           Print forward dependencies");
    eprintln!("  reverse <sheet>           Print reverse dependencies");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut script_path: Option<PathBuf> = None;
    let mut inline_commands: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;
    let mut pretty = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                inline_commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "--pretty" => pretty = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if script_path.is_none() {
                    script_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let (config, warnings) = config::load_config(config_file.as_ref());
    logger::init(config.level_filter().unwrap_or(LevelFilter::Warn));
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let session = Session::new(pretty || config.pretty);
    let lines = match read_lines(script_path.as_ref(), inline_commands) {
        Ok(lines) => lines,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for line in &lines {
        match session.run_line(line) {
            Some(Ok(output)) => println!("{}", output),
            Some(Err(output)) => {
                failed = true;
                println!("{}", output);
            }
            None => {}
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Inline commands win over a script file; with neither, read stdin.
fn read_lines(script: Option<&PathBuf>, inline: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inline.is_empty() {
        return Ok(inline);
    }
    if let Some(path) = script {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        return Ok(content.lines().map(str::to_string).collect());
    }
    io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read commands from stdin")
}
