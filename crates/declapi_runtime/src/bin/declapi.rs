//! declapi CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use declapi_foundation::Payload;
use declapi_language::compile;
use declapi_runtime::serialize::{load_from_file, save_to_file};
use declapi_runtime::{EchoTransport, LoaderConfig, MemoryStorage, Runtime};
use declapi_source::read_units;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Default, PartialEq, Eq)]
enum Command {
    #[default]
    Help,
    Check,
    Compile,
    Resolve,
}

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    command: Command,
    root: Option<PathBuf>,
    extensions: Vec<String>,
    out: Option<PathBuf>,
    cache: Option<PathBuf>,
    positional: Vec<String>,
    verbose: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn value_of(args: &[String], i: usize, flag: &str) -> Result<String, Box<dyn std::error::Error>> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value").into())
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.command = Command::Help,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbose = true,
            "--root" => {
                i += 1;
                config.root = Some(PathBuf::from(value_of(args, i, "--root")?));
            }
            "--ext" => {
                i += 1;
                config.extensions.push(value_of(args, i, "--ext")?);
            }
            "--out" => {
                i += 1;
                config.out = Some(PathBuf::from(value_of(args, i, "--out")?));
            }
            "--cache" => {
                i += 1;
                config.cache = Some(PathBuf::from(value_of(args, i, "--cache")?));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            "check" if config.command == Command::Help => config.command = Command::Check,
            "compile" if config.command == Command::Help => config.command = Command::Compile,
            "resolve" if config.command == Command::Help => config.command = Command::Resolve,
            other => config.positional.push(other.to_string()),
        }
        i += 1;
    }

    Ok(config)
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::INFO } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn loader_config(config: &CliConfig) -> LoaderConfig {
    let mut loader = LoaderConfig::from_env();
    if let Some(root) = &config.root {
        loader = loader.with_source_root(root);
    }
    if !config.extensions.is_empty() {
        loader = loader.with_extensions(config.extensions.iter().cloned());
    }
    loader
}

fn run(args: Vec<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let config = parse_args(&args)?;

    if config.show_version {
        println!("declapi {}", env!("CARGO_PKG_VERSION"));
        return Ok(true);
    }

    init_logging(config.verbose);

    match config.command {
        Command::Help => {
            print_help();
            Ok(true)
        }
        Command::Check => check(&loader_config(&config)),
        Command::Compile => {
            let out = config.out.as_ref().ok_or("compile requires --out FILE")?;
            let runtime = Runtime::setup(EchoTransport, MemoryStorage::new(), loader_config(&config))?;
            let cache = runtime.cache()?;
            save_to_file(&cache, out)?;
            println!("compiled {} declarations into {}", cache.len(), out.display());
            Ok(true)
        }
        Command::Resolve => resolve(&config),
    }
}

/// Validates every declaration and reports all of them.
fn check(loader: &LoaderConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let mut failures = 0usize;
    let mut total = 0usize;

    for unit in read_units(&loader.source_root, &loader.extensions)? {
        for extracted in &unit.declarations {
            total += 1;
            let result = compile(&extracted.declaration, &extracted.request_fields);
            match result.error_message() {
                None => println!("\x1b[32m✓\x1b[0m {}", extracted.declaration),
                Some(message) => {
                    failures += 1;
                    println!(
                        "\x1b[31m✗\x1b[0m {}:{} {}\n    {message}",
                        unit.path.display(),
                        extracted.line,
                        extracted.declaration
                    );
                }
            }
        }
    }

    println!();
    println!("{total} declarations, {failures} failed");
    Ok(failures == 0)
}

/// Resolves one declaration from a saved cache and prints the request.
fn resolve(config: &CliConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let cache_path = config.cache.as_ref().ok_or("resolve requires --cache FILE")?;
    let declaration = config
        .positional
        .first()
        .ok_or("resolve requires a declaration")?;
    let payload: Payload = match config.positional.get(1) {
        Some(json) => serde_json::from_str(json)?,
        None => Payload::new(),
    };

    let runtime = Runtime::builder()
        .transport(EchoTransport)
        .storage(MemoryStorage::new())
        .cache(load_from_file(cache_path)?)
        .build()?;
    let descriptor = runtime.describe(declaration, &payload)?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(true)
}

fn print_help() {
    println!(
        r#"declapi {}
Validate and resolve REST and local-storage declarations

USAGE:
    declapi check [OPTIONS]
    declapi compile --out FILE [OPTIONS]
    declapi resolve --cache FILE <DECLARATION> [PAYLOAD_JSON]

OPTIONS:
    --root DIR       Declaration source root (default: data/api)
    --ext EXT        Scanned file extension, repeatable (default: ts)
    --out FILE       Where compile writes the fact cache (.json or MessagePack)
    --cache FILE     Fact cache read by resolve
    -v, --verbose    Log progress to stderr
    -h, --help       Print help information
    -V, --version    Print version information

ENVIRONMENT:
    DECLAPI_SOURCE_ROOT    Overrides the default source root
    DECLAPI_EXTENSIONS     Comma-separated scanned extensions
    RUST_LOG               Log filter, e.g. declapi_runtime=debug

EXAMPLES:
    declapi check --root data/api
    declapi compile --out facts.json
    declapi resolve --cache facts.json '(Rest/get /users/:id selfMappings)' '{{"id": 1}}'"#,
        env!("CARGO_PKG_VERSION")
    );
}
