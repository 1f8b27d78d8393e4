//! OWL to OpenAPI CLI
//!
//! Command-line interface for compiling ontologies and checking compiler
//! configurations.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owl_openapi::{
    compile_ontology, lint_config, load_config, load_ontology, load_ontology_auto,
    render_markdown, resolve_class_operations, validate_examples, Config, EnglishInflector, Ontology,
    Severity, ValidateError,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "owl-openapi")]
#[command(about = "Compile OWL ontologies into OpenAPI schemas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile ontology classes into schemas and operations
    Compile {
        /// Ontology source: file path or URL (http:// or https://)
        ontology: String,

        /// Compiler configuration file (defaults apply if omitted)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Also write markdown documentation tables to this file
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Validate annotation examples against the generated schemas
        #[arg(long)]
        check_examples: bool,
    },

    /// Show the operations and paths resolved for one class
    Operations {
        /// Class IRI or local name
        #[arg(long)]
        class: String,

        /// Compiler configuration file (defaults apply if omitted)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Lint a compiler configuration
    Lint {
        /// Compiler configuration file
        #[arg(long, short)]
        config: PathBuf,

        /// Ontology file to check class names against
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compile {
            ontology,
            config,
            output,
            pretty,
            markdown,
            check_examples,
        } => run_compile(CompileArgs {
            ontology,
            config,
            output,
            pretty,
            markdown,
            check_examples,
        }),

        Commands::Operations {
            class,
            config,
            pretty,
        } => run_operations(&class, config.as_deref(), pretty),

        Commands::Lint {
            config,
            ontology,
            format,
            strict,
        } => run_lint(&config, ontology.as_deref(), &format, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_config(path: Option<&Path>) -> Result<Config, u8> {
    match path {
        Some(path) => load_config(path).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        }),
        None => Ok(Config::default()),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), u8> {
    std::fs::write(path, content).map_err(|e| {
        eprintln!("Error writing to {}: {}", path.display(), e);
        3u8
    })
}

struct CompileArgs {
    ontology: String,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
    markdown: Option<PathBuf>,
    check_examples: bool,
}

fn run_compile(args: CompileArgs) -> Result<(), u8> {
    let config = read_config(args.config.as_deref())?;
    let ontology = load_ontology_auto(&args.ontology).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let output = compile_ontology(&ontology, &config).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if args.check_examples {
        match validate_examples(&output.schemas) {
            Ok(()) => {}
            Err(ValidateError::Invalid { errors }) => {
                eprintln!("Example validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
                return Err(1);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(e.exit_code() as u8);
            }
        }
    }

    if let Some(path) = &args.markdown {
        let annotations = config.annotations.clone().unwrap_or_default();
        write_file(path, &render_markdown(&output.markdown, &annotations))?;
    }

    let json_output = to_json(&output, args.pretty)?;
    match args.output {
        Some(path) => write_file(&path, &json_output)?,
        None => println!("{}", json_output),
    }

    Ok(())
}

fn run_operations(class: &str, config: Option<&Path>, pretty: bool) -> Result<(), u8> {
    let config = read_config(config)?;
    let operations = resolve_class_operations(class, &config, &EnglishInflector).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", to_json(&operations, pretty)?);
    Ok(())
}

fn run_lint(config_path: &Path, ontology: Option<&Path>, format: &str, strict: bool) -> Result<(), u8> {
    let config = read_config(Some(config_path))?;
    let ontology = match ontology {
        Some(path) => Some(load_ontology(path).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?),
        None => None,
    };

    let result = lint_config(
        &config,
        ontology.as_ref().map(|o| o as &dyn Ontology),
    );

    if format == "json" {
        println!("{}", to_json(&result, true)?);
    } else {
        println!("Linting {} ...\n", config_path.display());

        for diag in &result.diagnostics {
            let (color, label) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            println!(
                "  {}{}[{}]\x1b[0m: {} - {}",
                color, label, diag.code, diag.path, diag.message
            );
        }

        println!();
        if result.passes(strict) {
            println!(
                "\x1b[32m✓ configuration passed ({} warnings)\x1b[0m",
                result.warnings
            );
        } else {
            println!(
                "\x1b[31m✗ configuration failed ({} errors, {} warnings)\x1b[0m",
                result.errors, result.warnings
            );
        }
    }

    if result.passes(strict) {
        Ok(())
    } else {
        Err(1)
    }
}
