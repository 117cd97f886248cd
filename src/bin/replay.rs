// Replay tool for debug logs written with `debug.enabled = true`
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]

use std::env;
use std::process;

use greedy_snake::config::Config;
use greedy_snake::replay::ReplayEngine;
use greedy_snake::types::Direction;

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

struct Options {
    log_file: String,
    config_path: String,
    verbose: bool,
    mode: Mode,
}

fn print_usage() {
    eprintln!("Battlesnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay every logged turn (default)");
    eprintln!("  --turns <T1,T2,...>     Replay only these turns");
    eprintln!("  --validate <T:M,...>    Check logged moves, e.g. 5:up,10:left|right");
    eprintln!("  --verbose               Log each replayed turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:move'", pair))?;

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;
            let moves = moves
                .split('|')
                .map(str::parse)
                .collect::<Result<Vec<Direction>, String>>()?;

            Ok((turn, moves))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let log_file = args.first().ok_or("Missing log file")?.clone();
    let mut options = Options {
        log_file,
        config_path: "Snake.toml".to_string(),
        verbose: false,
        mode: Mode::All,
    };

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} requires an argument", flag))
        };

        match arg.as_str() {
            "--all" => options.mode = Mode::All,
            "--turns" => options.mode = Mode::Turns(parse_turns(&value("--turns")?)?),
            "--validate" => {
                options.mode = Mode::Validate(parse_expected_moves(&value("--validate")?)?)
            }
            "--config" => options.config_path = value("--config")?,
            "--verbose" => options.verbose = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    Ok(options)
}

fn run(options: Options) -> Result<(), String> {
    let config = Config::from_file(&options.config_path).unwrap_or_else(|e| {
        eprintln!("Warning: {} ({}), using defaults", e, options.config_path);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, options.verbose);
    let entries = engine.load_log_file(&options.log_file)?;
    if entries.is_empty() {
        return Err(format!("Log file '{}' is empty", options.log_file));
    }

    match options.mode {
        Mode::All => {
            println!("Replaying all {} turns...", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            println!("Replaying {} turn(s)...", turns.len());
            let results = engine.replay_turns(&entries, &turns)?;
            engine.print_report(&results);
        }
        Mode::Validate(expected) => {
            engine.validate_expected_moves(&entries, &expected)?;
            println!("All {} expected move(s) validated", expected.len());
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.is_empty() { 1 } else { 0 });
    }

    let result = parse_args(&args).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
