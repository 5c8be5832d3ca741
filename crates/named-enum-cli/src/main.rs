use std::{env, fs, process::ExitCode};

use named_enum::{LogTracer, NamedEnum, NoopTracer, Registry, StdPrint};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: named-enum <definitions.json> [--enum NAME] [--trace]";

fn main() -> ExitCode {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if options.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("named_enum=trace")))
            .with_writer(std::io::stderr)
            .init();
    }

    let source = match read_file(&options.path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let registry = if options.trace {
        Registry::from_json_traced(&source, LogTracer)
    } else {
        Registry::from_json_traced(&source, NoopTracer)
    };
    let registry = match registry {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let classes: Vec<&NamedEnum> = match &options.only {
        Some(name) => match registry.get(name) {
            Some(class) => vec![class],
            None => {
                eprintln!("error: no enum named '{name}' in {}", options.path);
                return ExitCode::FAILURE;
            }
        },
        None => registry.iter().collect(),
    };

    for class in classes {
        if let Err(err) = class.describe_to(&mut StdPrint) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Parsed command line.
struct Options {
    path: String,
    only: Option<String>,
    trace: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut path = None;
        let mut only = None;
        let mut trace = false;
        while let Some(arg) = args.next() {
            if arg == "--trace" {
                trace = true;
            } else if arg == "--enum" {
                only = Some(args.next().ok_or("--enum requires a name")?);
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{arg}'"));
            } else if path.is_none() {
                path = Some(arg);
            } else {
                return Err(format!("unexpected argument '{arg}'"));
            }
        }
        let path = path.ok_or("missing definitions file")?;
        Ok(Self { path, only, trace })
    }
}

fn read_file(file_path: &str) -> Result<String, String> {
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{file_path} is not a file"));
            }
        }
        Err(err) => {
            return Err(format!("reading {file_path}: {err}"));
        }
    }
    fs::read_to_string(file_path).map_err(|err| format!("reading {file_path}: {err}"))
}
