//! copywith CLI entry point.

use copywith_runtime::{Expansion, ExpansionConfig, ExpansionSession, Repl, logging};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    show_help: bool,
    show_version: bool,
    list_macros: bool,
    write_in_place: bool,
    out_dir: Option<PathBuf>,
    strict: bool,
    keep_annotations: bool,
    indent: Option<usize>,
    tabs: bool,
    verbose: bool,
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

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-w" | "--write" => config.write_in_place = true,
            "-v" | "--verbose" => config.verbose = true,
            "--strict" => config.strict = true,
            "--keep-annotations" => config.keep_annotations = true,
            "--tabs" => config.tabs = true,
            "--list-macros" => config.list_macros = true,
            "-o" | "--out-dir" => {
                i += 1;
                if i >= args.len() {
                    return Err("--out-dir requires a value".into());
                }
                config.out_dir = Some(PathBuf::from(&args[i]));
            }
            "--indent" => {
                i += 1;
                if i >= args.len() {
                    return Err("--indent requires a value".into());
                }
                config.indent = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("invalid --indent value: {}", args[i]))?,
                );
            }
            "-" => config.files.push(PathBuf::from("-")),
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    if config.write_in_place && config.out_dir.is_some() {
        return Err("--write and --out-dir cannot be combined".into());
    }

    Ok(config)
}

fn expansion_config(config: &CliConfig) -> ExpansionConfig {
    let mut expansion = ExpansionConfig::default()
        .with_strict_inference(config.strict)
        .with_keep_annotations(config.keep_annotations)
        .with_tabs(config.tabs);
    if let Some(width) = config.indent {
        expansion = expansion.with_indent_width(width);
    }
    expansion
}

/// Returns `Ok(false)` if any file produced diagnostics.
fn run(args: Vec<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(true);
    }

    if config.show_version {
        println!("copywith {}", env!("CARGO_PKG_VERSION"));
        return Ok(true);
    }

    logging::init(config.verbose);
    let session = ExpansionSession::with_config(expansion_config(&config));

    if config.list_macros {
        for name in session.registry().macro_names() {
            println!("@{name}");
        }
        return Ok(true);
    }

    if config.files.is_empty() {
        let mut repl = Repl::new()?.with_session(session);
        repl.run()?;
        return Ok(true);
    }

    let mut clean = true;
    for file in &config.files {
        let expansion = expand(&session, file)?;
        let label = if file.as_os_str() == "-" {
            "<stdin>".to_string()
        } else {
            file.display().to_string()
        };
        for diagnostic in &expansion.diagnostics {
            eprintln!("{label}:{diagnostic}");
        }
        clean &= expansion.is_clean();
        emit(&config, file, &expansion)?;
    }

    Ok(clean)
}

fn expand(session: &ExpansionSession, file: &Path) -> Result<Expansion, Box<dyn std::error::Error>> {
    let result = if file.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        session.expand_source(&source)
    } else {
        session.expand_file(file)
    };
    result.map_err(|error| {
        let message = match &error.context {
            Some(context) => format!("{error} {context}"),
            None => error.to_string(),
        };
        message.into()
    })
}

/// Writes the expanded source to its destination.
fn emit(config: &CliConfig, file: &Path, expansion: &Expansion) -> Result<(), Box<dyn std::error::Error>> {
    let is_stdin = file.as_os_str() == "-";
    if config.write_in_place && !is_stdin {
        fs::write(file, &expansion.source)?;
    } else if let Some(dir) = &config.out_dir {
        fs::create_dir_all(dir)?;
        let name = if is_stdin {
            PathBuf::from("stdin.swift")
        } else {
            PathBuf::from(file.file_name().ok_or("input path has no file name")?)
        };
        fs::write(dir.join(name), &expansion.source)?;
    } else {
        print!("{}", expansion.source);
    }
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mcopywith\x1b[0m - Expand @CopyWith, @MutableCopy, @MutatedCopy and @Mutating in Swift source

\x1b[1mUSAGE:\x1b[0m
    copywith [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Swift files to expand (`-` reads stdin); none starts the REPL

\x1b[1mOPTIONS:\x1b[0m
    -h, --help           Print help information
    -V, --version        Print version information
    -w, --write          Rewrite files in place
    -o, --out-dir DIR    Write expanded files into DIR
    --strict             Fail on properties whose type cannot be inferred
    --keep-annotations   Leave the attributes in the output
    --indent N           Indent generated code with N spaces
    --tabs               Indent generated code with tabs
    --list-macros        List the supported attributes
    -v, --verbose        Log expansion details to stderr

\x1b[1mEXAMPLES:\x1b[0m
    copywith Model.swift             Print the expanded file
    copywith -w Sources/*.swift      Expand files in place
    copywith -o Generated A.swift    Write Generated/A.swift
    cat A.swift | copywith -         Expand stdin

\x1b[1mREPL COMMANDS:\x1b[0m
    :help                Show commands
    :macros              List attributes
    :strict [on|off]     Show or set strict inference
    :quit                Exit REPL
    Ctrl+D               Exit REPL
    Ctrl+C               Cancel current input

Exits with status 1 if any declaration could not be expanded."
    );
}
