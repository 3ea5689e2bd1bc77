use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbthelper_core::{Config, Direction, LayerMap, LineageSource, SourceConfig};
use dbthelper_dbt::ManifestLineage;
use dbthelper_engine::{to_dot, Lineage, Scope};
use dbthelper_sql::SqlProject;

/// dbthelper - developer utilities for dbt projects
#[derive(Parser)]
#[command(name = "dbthelper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dbthelper.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Where model dependencies are read from
    #[arg(long, global = true, value_enum)]
    source: Option<SourceArg>,

    /// Path to dbt manifest.json (relative to the current directory)
    #[arg(short = 'f', long, global = true)]
    manifest: Option<PathBuf>,

    /// Directory scanned for .sql models (relative to the current directory)
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show everything a model depends on, layer by layer
    ShowUpstream {
        /// Model name (short name or unique_id)
        model: String,

        /// Print the layers as JSON instead of a diagram
        #[arg(long)]
        json: bool,
    },

    /// Show everything that depends on a model, layer by layer
    ShowDownstream {
        /// Model name (short name or unique_id)
        model: String,

        /// Print the layers as JSON instead of a diagram
        #[arg(long)]
        json: bool,
    },

    /// Export lineage as a Graphviz DOT graph
    Graph {
        /// Focal model (whole project if omitted)
        model: Option<String>,

        /// Which side of the focal model to include
        #[arg(short, long, value_enum, default_value = "both")]
        direction: ScopeArg,

        /// Write DOT to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Manifest,
    Sql,
}

impl From<SourceArg> for SourceConfig {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Manifest => Self::Manifest,
            SourceArg::Sql => Self::Sql,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    Upstream,
    Downstream,
    Both,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Upstream => Self::Upstream,
            ScopeArg::Downstream => Self::Downstream,
            ScopeArg::Both => Self::Both,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref(), cli.verbose)?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    apply_overrides(&mut config, &cli, &cwd);

    if cli.verbose {
        eprintln!("{} source: {:?}", "Using".cyan(), config.source);
    }

    match cli.command {
        Commands::ShowUpstream { model, json } => {
            show_dependencies(&config, &model, Direction::Upstream, json).map(|_| ())
        }
        Commands::ShowDownstream { model, json } => {
            show_dependencies(&config, &model, Direction::Downstream, json).map(|_| ())
        }
        Commands::Graph {
            model,
            direction,
            output,
        } => graph_command(&config, model.as_deref(), direction.into(), output.as_deref()),
    }
}

/// Log to stderr; RUST_LOG wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Explicit config path, else ./dbthelper.toml, else defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(config_path) = path {
        return Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()));
    }

    let default_path = Path::new("dbthelper.toml");
    if default_path.exists() {
        return Ok(Config::from_file(default_path)?);
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

/// Apply command-line flags on top of the loaded config
///
/// Paths given on the command line are relative to `cwd`, not to the
/// config file's directory.
fn apply_overrides(config: &mut Config, cli: &Cli, cwd: &Path) {
    if let Some(source) = cli.source {
        config.source = source.into();
    }
    if let Some(manifest) = &cli.manifest {
        config.manifest_path = cwd.join(manifest);
    }
    if let Some(models_dir) = &cli.models_dir {
        config.models_dir = cwd.join(models_dir);
    }
}

/// Build the configured lineage source
fn load_source(config: &Config) -> Result<Box<dyn LineageSource>> {
    match config.source {
        SourceConfig::Manifest => {
            let manifest_path = config.resolved_manifest_path();
            if !manifest_path.exists() {
                return Err(anyhow::anyhow!(
                    "Manifest not found at {}. Run 'dbt compile' or 'dbt build' first.",
                    manifest_path.display()
                ));
            }
            tracing::info!(path = %manifest_path.display(), "loading manifest");
            Ok(Box::new(ManifestLineage::from_file(&manifest_path)?))
        }
        SourceConfig::Sql => {
            let models_dir = config.resolved_models_dir();
            tracing::info!(dir = %models_dir.display(), "scanning SQL models");
            let project = SqlProject::scan(&models_dir)?;
            if project.is_empty() {
                eprintln!(
                    "{} No SQL models found in {}",
                    "Warning:".yellow(),
                    models_dir.display()
                );
            }
            Ok(Box::new(project))
        }
    }
}

fn warn_unknown_model(model: &str) {
    eprintln!(
        "{}",
        format!(
            "Warning: The model argument {} does not match any models found in this project",
            model
        )
        .yellow()
    );
}

/// show-upstream / show-downstream
///
/// Returns the layer map (keyed by node key) so callers can inspect it; an
/// unknown model yields an empty map.
fn show_dependencies(config: &Config, model: &str, direction: Direction, json: bool) -> Result<LayerMap> {
    let source = load_source(config)?;
    let lineage = Lineage::from_source(source.as_ref());

    let Some(key) = source.resolve_model(model) else {
        warn_unknown_model(model);
        if json {
            println!("{{}}");
        }
        return Ok(LayerMap::new());
    };

    tracing::debug!(model, key = %key, %direction, "showing dependencies");

    let layers = lineage.layers(&key, direction);

    if json {
        let labeled = lineage.labeled_layers(&layers);
        println!("{}", serde_json::to_string_pretty(&labeled)?);
    } else {
        print!("{}", lineage.render(&layers, direction, config.render_width));
    }

    Ok(layers)
}

/// graph - DOT export
fn graph_command(config: &Config, model: Option<&str>, scope: Scope, output: Option<&Path>) -> Result<()> {
    let source = load_source(config)?;
    let lineage = Lineage::from_source(source.as_ref());

    let focal = match model {
        Some(model) => match source.resolve_model(model) {
            Some(key) => Some(key),
            None => {
                warn_unknown_model(model);
                return Ok(());
            }
        },
        None => None,
    };

    let graph = lineage.subgraph(focal.as_deref(), scope);
    let dot = to_dot(&graph);

    match output {
        Some(path) => {
            std::fs::write(path, dot)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} nodes, {} edges to {}",
                "Wrote".green(),
                graph.node_count(),
                graph.edge_count(),
                path.display()
            );
        }
        None => print!("{}", dot),
    }

    Ok(())
}
