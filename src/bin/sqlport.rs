//! sqlport: SQL dialect conversion CLI
//!
//! # Usage
//!
//! ```bash
//! # Convert one statement
//! sqlport "SELECT NVL(a, 0) FROM t FETCH FIRST 5 ROWS ONLY" --from tibero --to mysql
//!
//! # Convert a script, JSON output
//! sqlport --file schema.sql --from oracle --to postgresql --format json
//!
//! # Map a single column type
//! sqlport map-type "NUMBER(10,2)" --from oracle --to mysql
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlport::parser::parse_data_type;
use sqlport::prelude::*;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlport")]
#[command(version)]
#[command(about = "Convert SQL between Tibero, Oracle, MySQL and PostgreSQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlport 'SELECT SYSDATE FROM dual' --from tibero --to postgresql
    sqlport --file export.sql --from mysql --to oracle --format json
    echo 'SELECT IFNULL(a, 0) FROM t LIMIT 5, 10' | sqlport --from mysql --to pg")]
struct Cli {
    /// SQL to convert; reads --file or stdin when omitted
    sql: Option<String>,

    /// Source dialect
    #[arg(short, long, value_parser = parse_dialect, env = "SQLPORT_FROM")]
    from: Option<DialectType>,

    /// Target dialect
    #[arg(short, long, value_parser = parse_dialect, env = "SQLPORT_TO")]
    to: Option<DialectType>,

    /// Read SQL from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Configuration file (default: <config dir>/sqlport/config.toml)
    #[arg(long, env = "SQLPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Hide INFO advisories
    #[arg(long)]
    no_info: bool,

    /// Show applied rules and debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported dialects
    Dialects,
    /// Map a column type between dialects
    MapType {
        /// Type such as NUMBER(10,2) or VARCHAR2
        type_name: String,

        #[arg(long, value_parser = parse_dialect)]
        from: DialectType,

        #[arg(long, value_parser = parse_dialect)]
        to: DialectType,
    },
}

fn parse_dialect(s: &str) -> Result<DialectType, String> {
    s.parse::<DialectType>().map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Some(Commands::Dialects) => {
            show_dialects();
            Ok(())
        }
        Some(Commands::MapType {
            type_name,
            from,
            to,
        }) => map_type(type_name, *from, *to),
        None => run(&cli),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sqlport=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(sql) = &cli.sql {
        return Ok(sql.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading SQL from stdin")?;
    Ok(buf)
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let source = cli
        .from
        .or(config.defaults.source)
        .context("no source dialect: pass --from or set [defaults] source in the config file")?;
    let target = cli
        .to
        .or(config.defaults.target)
        .context("no target dialect: pass --to or set [defaults] target in the config file")?;

    let mut options = config.options.clone();
    if cli.no_info {
        options.include_info = false;
    }

    let input = read_input(cli)?;
    let results = Orchestrator::global().convert_script(&input, source, target, &options)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => print_results(&results, cli.verbose),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARN ".yellow().bold(),
        Severity::Info => "INFO ".blue(),
    }
}

fn print_results(results: &[ConversionResult], verbose: bool) {
    let script = results.len() > 1;
    for (i, result) in results.iter().enumerate() {
        println!("{}", result.converted_sql);
        if script {
            println!(";");
        }

        if result.warnings.is_empty() && !verbose {
            continue;
        }
        if script {
            eprintln!("{}", format!("-- statement {}", i + 1).dimmed());
        }
        for w in &result.warnings {
            eprintln!(
                "  {} {} {}",
                severity_label(w.severity),
                w.kind.to_string().dimmed(),
                w.message
            );
            if let Some(s) = &w.suggestion {
                eprintln!("        {} {}", "→".dimmed(), s.green());
            }
        }
        if verbose {
            for rule in &result.applied_rules {
                eprintln!("  {} {}", "rule ".cyan(), rule);
            }
        }
    }
}

fn map_type(type_name: &str, from: DialectType, to: DialectType) -> Result<()> {
    let data_type = parse_data_type(type_name)?;
    let converter = Orchestrator::global()
        .converter(from)
        .with_context(|| format!("no converter for {}", from))?;
    let mapped = converter.map_data_type(&data_type, to);
    println!("{}", mapped);
    if mapped == data_type && from != to {
        eprintln!("{}", "(no mapping for this type; passed through)".dimmed());
    }
    Ok(())
}

fn show_dialects() {
    println!("{}", "Supported dialects".cyan().bold());
    println!();
    println!(
        "{:12} {:7} {:34} {}",
        "Dialect".white().bold(),
        "Quote".white().bold(),
        "Pagination".white().bold(),
        "Native functions".white().bold()
    );
    println!("{}", "─".repeat(72).dimmed());

    for dialect in DialectType::ALL {
        let pagination = match dialect.pagination() {
            sqlport::dialect::PaginationIdiom::Limit => "LIMIT n OFFSET m",
            sqlport::dialect::PaginationIdiom::FetchFirst => "OFFSET m ROWS FETCH FIRST n ROWS ONLY",
        };
        println!(
            "{:12} {:7} {:34} {}",
            dialect.to_string().yellow(),
            dialect.quote_char().to_string().cyan(),
            pagination.white(),
            dialect.supported_functions().len().to_string().dimmed()
        );
    }
}
