//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use datacat_core::{CatalogAssembler, CatalogResult};
use datacat_registry::SnapshotRegistry;
use datacat_render::HandlebarsRenderer;
use datacat_shared::{
    CatalogConfig, FailurePolicy, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// datacat — generate catalog documentation for a dataset registry.
#[derive(Parser)]
#[command(
    name = "datacat",
    version,
    about = "Render a dataset registry snapshot into catalog documentation.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the catalog from a registry snapshot.
    Generate {
        /// Path to the registry snapshot (JSON).
        #[arg(long)]
        registry: PathBuf,

        /// Directory holding `dataset.hbs` and `catalog_overview.hbs`.
        #[arg(long, default_value = "templates")]
        templates: PathBuf,

        /// Output directory for the rendered catalog.
        #[arg(short, long, default_value = "catalog")]
        out: PathBuf,

        /// Dataset names to exclude, in addition to the config file's.
        #[arg(long)]
        exclude: Vec<String>,

        /// Override the outer discovery worker limit.
        #[arg(long)]
        discovery_workers: Option<usize>,

        /// Override the inner render worker limit.
        #[arg(long)]
        render_workers: Option<usize>,

        /// What to do when one dataset fails: abort or skip.
        #[arg(long, value_enum)]
        failure_policy: Option<PolicyArg>,

        /// Config file path (defaults to ~/.datacat/datacat.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// CLI-facing failure policy values.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum PolicyArg {
    Abort,
    Skip,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Abort => FailurePolicy::Abort,
            PolicyArg::Skip => FailurePolicy::Skip,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "datacat=info",
        1 => "datacat=debug",
        _ => "datacat=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command routing
// ---------------------------------------------------------------------------

/// Route a parsed CLI invocation.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            registry,
            templates,
            out,
            exclude,
            discovery_workers,
            render_workers,
            failure_policy,
            config,
        } => {
            let app_config = match config {
                Some(path) => load_config_from(&path)?,
                None => load_config()?,
            };

            let mut catalog_config = CatalogConfig::from(&app_config);
            catalog_config.exclude.extend(exclude);
            if let Some(limit) = discovery_workers {
                catalog_config.discovery_workers = limit;
            }
            if let Some(limit) = render_workers {
                catalog_config.render_workers = limit;
            }
            if let Some(policy) = failure_policy {
                catalog_config.failure_policy = policy.into();
            }

            generate(&registry, &templates, &out, catalog_config).await
        }

        Command::Config { action } => match action {
            ConfigAction::Init => {
                let path = init_config()?;
                println!("Created config file at {}", path.display());
                Ok(())
            }
            ConfigAction::Show => {
                let config = load_config()?;
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

/// Run the pipeline and write the catalog to disk.
async fn generate(
    registry_path: &Path,
    templates_dir: &Path,
    out_dir: &Path,
    config: CatalogConfig,
) -> Result<()> {
    let registry = SnapshotRegistry::from_path(registry_path)
        .wrap_err_with(|| format!("loading registry snapshot {}", registry_path.display()))?;
    let renderer = HandlebarsRenderer::from_dir(templates_dir)
        .wrap_err_with(|| format!("loading templates from {}", templates_dir.display()))?;

    info!(
        datasets = registry.len(),
        out = %out_dir.display(),
        "generating catalog"
    );

    let assembler = CatalogAssembler::new(Arc::new(registry), Arc::new(renderer), config);
    let result = assembler.generate().await?;

    write_catalog(out_dir, &result)?;

    let document_count: usize = result.sections.values().map(Vec::len).sum();
    println!(
        "Wrote {} documents in {} sections to {}",
        document_count,
        result.sections.len(),
        out_dir.display()
    );
    for (name, error) in &result.skipped {
        println!("Skipped {name}: {error}");
    }

    Ok(())
}

/// Write `overview.md` plus one `<section>/<name>.md` per document.
fn write_catalog(out_dir: &Path, result: &CatalogResult) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .wrap_err_with(|| format!("creating {}", out_dir.display()))?;

    std::fs::write(out_dir.join("overview.md"), &result.overview)
        .wrap_err("writing overview.md")?;

    for (label, documents) in &result.sections {
        let section_dir = out_dir.join(label.to_lowercase());
        std::fs::create_dir_all(&section_dir)
            .wrap_err_with(|| format!("creating {}", section_dir.display()))?;

        for document in documents {
            let path = section_dir.join(format!("{}.md", document.name));
            std::fs::write(&path, &document.text)
                .wrap_err_with(|| format!("writing {}", path.display()))?;
        }
    }

    Ok(())
}
