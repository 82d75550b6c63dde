use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cutlist_model::{Catalog, MaterialTypeId, Settings, Thresholds};
use cutlist_pipeline::{inspect, process, PipelineError, RunInfo};
use cutlist_xlsx::{extract_images, load_grid};

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "cutlist",
    about = "Classify, validate and regroup furniture cut-list workbooks by material type."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report unknown materials and validation remarks without writing output.
    Inspect(InspectArgs),
    /// Run the full pipeline: per-type workbooks, summary and archive.
    Process(ProcessArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// Source order-sheet workbook.
    file: PathBuf,

    /// Material catalog (JSON).
    #[arg(long)]
    catalog: PathBuf,

    /// Named numeric settings overriding the built-in defaults (JSON).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args)]
struct ProcessArgs {
    /// Source order-sheet workbook.
    file: PathBuf,

    /// Material catalog (JSON). Assignments are written back here before the
    /// run snapshots the registry.
    #[arg(long)]
    catalog: PathBuf,

    /// Named numeric settings overriding the built-in defaults (JSON).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Client display name for banners, file names and the summary.
    #[arg(long)]
    client: String,

    /// Project name.
    #[arg(long)]
    project: String,

    /// Author recorded in the run summary.
    #[arg(long, default_value = "Unknown")]
    author: String,

    /// Assign a previously unknown material to a type (repeatable).
    ///
    /// Format: `<material>=<type name>[:grain]`.
    #[arg(long = "assign")]
    assignments: Vec<String>,

    /// Output directory; the run writes `<out>/<token>/` and `<out>/<token>.zip`.
    #[arg(long, default_value = "exports")]
    out: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Inspect(args) => run_inspect(args),
        Command::Process(args) => run_process(args),
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    require_source(&args.file)?;
    let catalog = load_catalog(&args.catalog)?;
    let thresholds = load_thresholds(args.settings.as_deref())?;
    let loaded = load_grid(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    let inspection = inspect(&loaded.grid, &catalog, &thresholds);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
        OutputFormat::Text => {
            if inspection.unknown_materials.is_empty() {
                println!("No unknown materials.");
            } else {
                println!("Unknown materials:");
                for name in &inspection.unknown_materials {
                    println!("  {name}");
                }
            }
            print_remarks(&inspection.remarks);
        }
    }
    Ok(())
}

fn run_process(args: ProcessArgs) -> Result<()> {
    require_source(&args.file)?;
    let mut catalog = load_catalog(&args.catalog)?;
    if !args.assignments.is_empty() {
        for raw in &args.assignments {
            let (name, type_name, has_grain) = parse_assignment(raw)?;
            let type_id = resolve_type(&catalog, type_name)?;
            catalog.upsert_assignment(name, type_id, has_grain);
        }
        // Assignments must be persisted before the registry snapshot.
        catalog
            .save(&args.catalog)
            .with_context(|| format!("writing {}", args.catalog.display()))?;
    }

    let thresholds = load_thresholds(args.settings.as_deref())?;
    let loaded = load_grid(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let images = extract_images(&args.file)
        .with_context(|| format!("extracting images from {}", args.file.display()))?;

    let source_file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let info = RunInfo {
        token: RunInfo::new_token(),
        client_name: args.client,
        project_name: args.project,
        source_file_name,
        author: args.author,
    };

    let output = process(&loaded.grid, &images, &catalog, &thresholds, &info, &args.out)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("Archive: {}", output.archive_path.display());
            println!("Files:");
            for file_ref in &output.file_refs {
                println!("  {} ({})", file_ref.name, file_ref.path.display());
            }
            print_remarks(&output.remarks);
        }
    }
    Ok(())
}

fn print_remarks(remarks: &[String]) {
    if remarks.is_empty() {
        println!("No remarks.");
    } else {
        println!("Remarks:");
        for remark in remarks {
            println!("  - {remark}");
        }
    }
}

fn require_source(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingSource(path.to_path_buf()).into())
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("reading catalog {}", path.display()))
}

fn load_thresholds(settings: Option<&Path>) -> Result<Thresholds> {
    let settings = match settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("reading settings {}", path.display()))?,
        None => Settings::new(),
    };
    Ok(Thresholds::from_settings(&settings))
}

/// Parse `<material>=<type name>[:grain]`.
fn parse_assignment(raw: &str) -> Result<(&str, &str, bool)> {
    let Some((name, rest)) = raw.split_once('=') else {
        bail!("invalid --assign '{raw}' (expected format: <material>=<type name>[:grain])");
    };
    let name = name.trim();
    let (type_name, has_grain) = match rest.rsplit_once(':') {
        Some((type_name, "grain")) => (type_name.trim(), true),
        _ => (rest.trim(), false),
    };
    if name.is_empty() || type_name.is_empty() {
        bail!("invalid --assign '{raw}' (empty material or type name)");
    }
    Ok((name, type_name, has_grain))
}

fn resolve_type(catalog: &Catalog, type_name: &str) -> Result<MaterialTypeId> {
    match catalog.type_by_name(type_name) {
        Some(material_type) => Ok(material_type.id),
        None => {
            let known: Vec<&str> = catalog.types.iter().map(|t| t.name.as_str()).collect();
            bail!(
                "unknown material type '{type_name}' (known types: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            );
        }
    }
}
