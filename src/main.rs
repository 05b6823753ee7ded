mod debug_report;

use std::io::{self, IsTerminal, Read};

use tracing_subscriber::EnvFilter;
use vyakarana::{Context, Options, classify_verbose_with, default_registry, family};

const LOG_ENV: &str = "VYAKARANA_LOG";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let registry = default_registry();
    if config.list {
        debug_report::print_chains(registry, config.color);
        return;
    }

    let families: Vec<&str> = if config.all { family::ALL.to_vec() } else { vec![config.family.as_str()] };
    let opts = Options::default();
    for name in families {
        let res = classify_verbose_with(registry, name, &config.input, &config.context, &opts);
        debug_report::print_run(&res, config.color);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

struct CliConfig {
    input: String,
    family: String,
    all: bool,
    list: bool,
    context: Context,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut family_name = family::PRAGRHYA.to_string();
    let mut all = false;
    let mut list = false;
    let mut context = Context::new();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("vyakarana {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--all" => all = true,
            "--list" => list = true,
            "--family" | "-f" => {
                family_name = args.next().ok_or_else(|| "error: --family expects a value".to_string())?;
            }
            "--ctx" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --ctx expects key=value".to_string())?;
                context = with_assignment(context, &value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--family=") => {
                family_name = arg.trim_start_matches("--family=").to_string();
            }
            _ if arg.starts_with("--ctx=") => {
                context = with_assignment(context, arg.trim_start_matches("--ctx="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    if family_name.trim().is_empty() {
        return Err("error: --family must not be empty".to_string());
    }

    let input = match input {
        Some(value) => value,
        None if list => String::new(),
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() && !list {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input: input.trim().to_string(), family: family_name, all, list, context, color })
}

fn with_assignment(context: Context, raw: &str) -> Result<Context, String> {
    let (key, value) = Context::parse_assignment(raw)
        .ok_or_else(|| format!("error: invalid --ctx '{raw}' (expected key=value)"))?;
    Ok(context.with(key, value))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "vyakarana {version}

Classify Sanskrit word-forms with Pāṇinian rule chains.

Usage:
  vyakarana [OPTIONS] [--] <word...>

Options:
  -f, --family <name>        Rule family to evaluate. Default: {default_family}
                             Built-in: {families}
  --all                      Evaluate every built-in family.
  -c, --ctx <key=value>      Add a context entry; repeatable.
                             Values: true/false, integers, a,b,c lists, text.
  --list                     Print the registered rule chains and exit.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Input may be IAST or Devanagari. With no word arguments, stdin is read.

Environment:
  {log_env}              Log filter (e.g. debug, vyakarana=trace). Default: warn

Exit codes:
  0  Success.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_family = family::PRAGRHYA,
        families = family::ALL.join(", "),
        log_env = LOG_ENV,
    )
}
