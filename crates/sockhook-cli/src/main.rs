use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use sockhook_core::SocketHookRecord;
use sockhook_core::config::{self, CONFIG_FILE_NAME, OutputFormat, SockhookConfig};
use sockhook_core::parse::{self, manifest::RouteManifest};
use sockhook_core::transform::convert_manifest;

#[derive(Parser)]
#[command(
    name = "sockhook",
    about = "Translate RPC route descriptors into socket hook records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a route manifest into socket hook records
    Convert {
        /// Path to the route manifest (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        format: Option<FormatArg>,
    },

    /// Validate a route manifest
    Validate {
        /// Path to the route manifest
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new sockhook configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
        } => cmd_convert(input, output, format),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "sockhook", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SockhookConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_manifest(path: &Path) -> Result<RouteManifest> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let manifest = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("invalid route manifest {}", path.display()))?;
    log::info!(
        "loaded {} classes, {} models from {}",
        manifest.classes.len(),
        manifest.models.len(),
        path.display()
    );
    Ok(manifest)
}

fn render(records: &[SocketHookRecord], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml_ng::to_string(records)?,
    };
    Ok(rendered)
}

fn cmd_convert(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<FormatArg>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.or_else(|| cfg.output.as_ref().map(PathBuf::from));
    let format = format.map(OutputFormat::from).unwrap_or(cfg.format);

    let manifest = load_manifest(&input)?;
    let records = convert_manifest(&manifest, &cfg.convert_options())
        .with_context(|| format!("failed to convert {}", input.display()))?;
    let rendered = render(&records, format)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} hook records to {}", records.len(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let manifest = load_manifest(&input)?;

    eprintln!("Valid route manifest: {}", input.display());
    eprintln!("  Models: {}", manifest.models.len());
    eprintln!("  Classes: {}", manifest.classes.len());
    eprintln!("  Routes: {}", manifest.route_count());

    // Also validate that every route converts
    let cfg = try_load_config()?.unwrap_or_default();
    let records = convert_manifest(&manifest, &cfg.convert_options())?;
    let parameters: usize = records.iter().map(|r| r.accepts.len()).sum();
    eprintln!("  Hook records: {}", records.len());
    eprintln!("  Parameters: {}", parameters);

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
