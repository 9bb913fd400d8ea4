mod commands;
mod error;
mod input;
mod logging;
mod output;
mod settings;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use commands::DocumentKind;
use error::CliError;
use logging::init_logging;
use settings::load_settings;

#[derive(Parser, Debug)]
#[command(name = "dbdesign", version, about = "Relational schema and ER model design toolkit")]
struct Cli {
    /// Settings file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "dbdesign.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer an ER model from a schema snapshot.
    Extract(TransformArgs),
    /// Build tables from an ER model.
    Synthesize(SynthesizeArgs),
    /// Render CREATE TABLE statements for a schema snapshot.
    Ddl(TransformArgs),
    /// Find candidate keys from functional dependencies.
    Keys(KeysArgs),
    /// Rewrite a MySQL dump into SQLite syntax.
    Rewrite(TransformArgs),
    /// Load a SQL dump into an in-memory database and optionally query it.
    Load(LoadArgs),
    /// Print the JSON Schema of an input document.
    JsonSchema(JsonSchemaArgs),
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Input file.
    input: PathBuf,
    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SynthesizeArgs {
    /// ER model JSON file.
    input: PathBuf,
    /// Emit DDL instead of a schema snapshot.
    #[arg(long, default_value_t = false, conflicts_with = "report")]
    ddl: bool,
    /// Include the synthesis report next to the schema.
    #[arg(long, default_value_t = false)]
    report: bool,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct KeysArgs {
    /// Comma-separated attribute universe.
    #[arg(long, value_delimiter = ',', required = true)]
    attributes: Vec<String>,
    /// File with one dependency per line (`A,B -> C`).
    dependencies: PathBuf,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// SQL dump to load.
    input: PathBuf,
    /// Statement to run after loading.
    #[arg(long)]
    query: Option<String>,
    /// Load the file as-is, skipping the MySQL rewrite.
    #[arg(long, default_value_t = false)]
    no_rewrite: bool,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct JsonSchemaArgs {
    #[arg(value_enum)]
    document: DocumentKind,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    init_logging(&settings.logging)?;

    tracing::debug!(event = "settings_loaded", path = %cli.config.display());

    match cli.command {
        Command::Extract(args) => commands::run_extract(&args.input, args.out.as_deref()),
        Command::Synthesize(args) => commands::run_synthesize(
            &args.input,
            args.ddl,
            args.report,
            args.out.as_deref(),
        ),
        Command::Ddl(args) => commands::run_ddl(&args.input, args.out.as_deref()),
        Command::Keys(args) => {
            commands::run_keys(&args.attributes, &args.dependencies, args.out.as_deref())
        }
        Command::Rewrite(args) => commands::run_rewrite(&args.input, args.out.as_deref()),
        Command::Load(args) => {
            if args.no_rewrite {
                settings.load.rewrite_mysql = false;
            }
            commands::run_load(&args.input, args.query, &settings.load, args.out.as_deref()).await
        }
        Command::JsonSchema(args) => commands::run_json_schema(args.document, args.out.as_deref()),
    }
}
