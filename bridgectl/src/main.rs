//! # Bridge Control
//!
//! Main entry point for `bridgectl`.

use bridgectl::{resolve_config, run_command, BridgeCommand, ConfigOverrides};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

struct CliArgs {
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
    command: Vec<String>,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("bridgectl");

    let cli = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let command = BridgeCommand::parse(&cli.command).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let config = resolve_config(cli.config_path.as_deref(), &cli.overrides).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });

    match run_command(&command, &config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        config_path: None,
        overrides: ConfigOverrides::default(),
        command: Vec::new(),
    };
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                cli.config_path = Some(PathBuf::from(&args[i]));
            }
            "--int64" => {
                cli.overrides.int64 = true;
            }
            "--max-depth" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-depth".to_string());
                }
                cli.overrides.max_depth = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid max-depth value: {}", args[i]))?,
                );
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            // Everything from the first positional on belongs to the command,
            // so host text like "-1" is not taken for a flag.
            _ => {
                cli.command = args[i..].to_vec();
                break;
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <COMMAND>", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  encode <JSON>            Print the host literal for a JSON value");
    eprintln!("  decode <KIND> <TEXT>     Decode host text and print it as JSON");
    eprintln!("                           KIND: any, null, bool, int, float, str,");
    eprintln!("                           enum, enumset, list, dict, object");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      JSON config file");
    eprintln!("  --int64                  Accept 64-bit integers (default: 32-bit)");
    eprintln!("  --max-depth <N>          Maximum container nesting");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} encode '{{\"name\": \"Cube\", \"size\": [1, 2]}}'", program);
    eprintln!("  {} --int64 decode int 4294967296", program);
}
