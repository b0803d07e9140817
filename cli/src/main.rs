use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use graphexpect::canonicalization::are_isomorphic;
use graphexpect::document::parse;
use graphexpect::{rewrite_scope_query, DocumentFormat, ResultProjection, SuiteDefinition};
use log::{info, LevelFilter};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the base log level (use -v / -q to adjust relative to this level)
    #[arg(
        long,
        value_enum,
        default_value_t = LogLevel::Info,
        global = true,
        help = "error | warn | info | debug | trace"
    )]
    log_level: LogLevel,

    /// Increase logging verbosity (can be used multiple times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (can be used multiple times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(base: LogLevel, verbose: u8, quiet: u8) {
    let levels = [
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base_idx = levels
        .iter()
        .position(|lvl| *lvl == base.to_filter())
        .unwrap_or(2) as i8;
    let adjusted =
        (base_idx + verbose as i8 - quiet as i8).clamp(0, (levels.len() - 1) as i8) as usize;

    env_logger::Builder::from_default_env()
        .format_target(false)
        .filter_level(levels[adjusted])
        .init();
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Turtle,
    NTriples,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Turtle => DocumentFormat::Turtle,
            OutputFormat::NTriples => DocumentFormat::NTriples,
        }
    }
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Path to the JSON suite definition
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Document format to emit
    #[arg(long, value_enum, default_value_t = OutputFormat::Turtle)]
    format: OutputFormat,

    /// Write the document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the triple count header before the document
    #[arg(long)]
    summary: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Path to the JSON suite definition
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Previously compiled document to compare against
    #[arg(short, long, value_name = "FILE")]
    document: PathBuf,

    /// Format of the compiled document
    #[arg(long, value_enum, default_value_t = OutputFormat::Turtle)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct RewriteArgs {
    /// Selection query ending in a single RETURN clause
    #[arg(long)]
    query: String,

    /// Also print the result projection used when the store has no graph config
    #[arg(long)]
    without_graph_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a suite definition into a SHACL document
    Compile(CompileArgs),
    /// Check that a compiled document still matches its suite definition
    Check(CheckArgs),
    /// Rewrite a selection query into a subset-validation scope
    Rewrite(RewriteArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.verbose, cli.quiet);

    match cli.command {
        Commands::Compile(args) => {
            let suite = SuiteDefinition::from_path(&args.file)?.into_suite()?;
            let mut text = suite.serialize(args.format.into())?;
            if args.summary {
                text = format!(
                    "# Expectations in this Suite include {} triples:\n{}",
                    suite.len(),
                    text
                );
            }
            match args.output {
                Some(path) => {
                    fs::write(&path, text).map_err(|e| {
                        format!("Failed to write document to {}: {}", path.display(), e)
                    })?;
                    info!(
                        "Wrote {} triples from {} shapes to {}",
                        suite.len(),
                        suite.shapes().len(),
                        path.display()
                    );
                }
                None => print!("{}", text),
            }
        }
        Commands::Check(args) => {
            let suite = SuiteDefinition::from_path(&args.file)?.into_suite()?;
            let text = fs::read_to_string(&args.document).map_err(|e| {
                format!("Failed to read document {}: {}", args.document.display(), e)
            })?;
            let deployed = parse(&text, args.format.into())?;
            if !are_isomorphic(&deployed, suite.graph()) {
                return Err(format!(
                    "{} does not match {} ({} vs {} triples)",
                    args.document.display(),
                    args.file.display(),
                    deployed.len(),
                    suite.len()
                )
                .into());
            }
            println!("{} matches {}", args.document.display(), args.file.display());
        }
        Commands::Rewrite(args) => {
            let scope = rewrite_scope_query(&args.query)?;
            println!("{}", scope);
            if args.without_graph_config {
                println!("{}", ResultProjection::ResolveInternalId.cypher());
            }
        }
    }

    Ok(())
}
