//! IDL Schema CLI
//!
//! Command-line interface for inspecting, composing, and linting schema
//! dependency metadata.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use idl_schema::{
    coerce_literal, compose_group, compose_only_one, compose_requires, extract_groups,
    extract_only_one, extract_requires, filter_by_type, lint, load_schema, DeclaredType,
    LintResult, Literal, SchemaView, Severity,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idl-schema")]
#[command(about = "Inspect, compose and lint inter-parameter dependency metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the valid dependencies and property groups of a schema as JSON
    Inspect {
        /// Schema file
        schema: PathBuf,

        /// Give every ungrouped property a group of its own
        #[arg(long)]
        singletons: bool,

        /// Keep only OnlyOne sets and groups whose members all have this type
        #[arg(long = "type", value_parser = parse_declared_type)]
        type_filter: Option<DeclaredType>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the canonical text of an expression
    Compose {
        #[command(subcommand)]
        expression: ComposeCommand,
    },

    /// Lint schema files for dropped expressions and group conflicts
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// One line per diagnostic plus a summary
    Text,
    /// The full lint result as JSON
    Json,
}

#[derive(Subcommand)]
enum ComposeCommand {
    /// IF <prerequisite>[==<value>] THEN <dependant>[==<value>];
    Requires {
        prerequisite: String,
        dependant: String,

        /// Value the prerequisite must have
        #[arg(long)]
        prerequisite_value: Option<String>,

        /// Value the dependant must have
        #[arg(long)]
        dependant_value: Option<String>,
    },

    /// OnlyOne(<key>, <key>, ...);
    OnlyOne {
        #[arg(num_args = 2.., required = true)]
        keys: Vec<String>,
    },

    /// Group(<key>, ...);
    Group {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect {
            schema,
            singletons,
            type_filter,
            output,
            pretty,
        } => run_inspect(&schema, singletons, type_filter, output, pretty),

        Commands::Compose { expression } => run_compose(expression),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn parse_declared_type(s: &str) -> Result<DeclaredType, String> {
    DeclaredType::parse(s).ok_or_else(|| {
        format!("unknown type '{s}', expected boolean, string, integer, number, object or array")
    })
}

fn run_inspect(
    schema_path: &Path,
    singletons: bool,
    type_filter: Option<DeclaredType>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let schema = load_schema(schema_path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let view = SchemaView::new(&schema).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;

    let requires = extract_requires(&view);
    let only_one = extract_only_one(&view);
    let groups = extract_groups(&view, singletons);

    let report = match type_filter {
        Some(declared_type) => serde_json::json!({
            "requires": requires,
            "only_one": filter_by_type(&view, &only_one, declared_type),
            "groups": filter_by_type(&view, &groups, declared_type),
        }),
        None => serde_json::json!({
            "requires": requires,
            "only_one": only_one,
            "groups": groups,
        }),
    };

    let json_output = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_compose(expression: ComposeCommand) -> Result<(), u8> {
    let text = match expression {
        ComposeCommand::Requires {
            prerequisite,
            dependant,
            prerequisite_value,
            dependant_value,
        } => compose_requires(
            &prerequisite,
            &dependant,
            prerequisite_value.as_deref().map(infer_literal).as_ref(),
            dependant_value.as_deref().map(infer_literal).as_ref(),
        ),
        ComposeCommand::OnlyOne { keys } => compose_only_one(&keys),
        ComposeCommand::Group { keys } => compose_group(&keys),
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", text);
    Ok(())
}

/// Type a command-line value without a schema: boolean, then number, else string.
fn infer_literal(token: &str) -> Literal {
    [DeclaredType::Boolean, DeclaredType::Number]
        .into_iter()
        .find_map(|declared_type| coerce_literal(token, Some(declared_type)))
        .unwrap_or_else(|| Literal::from(token))
}

fn run_lint(path: &Path, format: ReportFormat, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);

    match format {
        ReportFormat::Json => {
            let json_output = serde_json::to_string_pretty(&result).map_err(|e| {
                eprintln!("Error serializing output: {}", e);
                2u8
            })?;
            println!("{}", json_output);
        }
        ReportFormat::Text => print_lint_report(&result, quiet),
    }

    // `failed` already counts warnings in strict mode.
    if result.failed == 0 {
        Ok(())
    } else {
        Err(1)
    }
}

/// `<file>#<pointer>: <severity>[<code>] <message>` per diagnostic, then a summary.
///
/// Quiet mode drops clean files and warnings.
fn print_lint_report(result: &LintResult, quiet: bool) {
    for file_result in &result.results {
        let file = file_result.file.display();
        if file_result.diagnostics.is_empty() && !quiet {
            println!("{}: ok", file);
        }

        for diag in &file_result.diagnostics {
            if quiet && diag.severity == Severity::Warning {
                continue;
            }
            println!(
                "{}#{}: {}[{}] {}",
                file, diag.path, diag.severity, diag.code, diag.message
            );
        }
    }

    println!(
        "{} files checked: {} passed, {} failed ({} errors, {} warnings)",
        result.files_checked, result.passed, result.failed, result.errors, result.warnings
    );
}
