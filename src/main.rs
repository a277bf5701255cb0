use clap::{Parser, Subcommand};
use md_pages::config::{self, PagesConfig};
use md_pages::discover::{DirectoryProbe, DocumentDiscovery, FsDiscovery, ProbeDiscovery};
use md_pages::{generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "md-pages")]
#[command(about = "Generate routable page components from markdown documents")]
#[command(long_about = "\
Generate routable page components from markdown documents

Every document in the source directory becomes one page artifact. Settings
come from a YAML frontmatter block, from comment directives, or from the
filename (comment directives win over frontmatter).

Document dialects:

  ---                               <!-- md-pages -->
  title: Getting Started            <!-- @page \"/guide/start\" -->
  route: /guide/start               <!-- title: Getting Started -->
  layout: DocsLayout                <!-- layout: DocsLayout -->
  showTitle: false                  <!-- showTitle: false -->
  description: First steps          <!-- description: First steps -->
  tags: [intro, setup]              <!-- tags: intro, setup -->
  ---

Filename defaults:
  Route:       getting-started.md → /getting-started (index.md → /)
  Title:       getting-started.md → \"Getting Started\"
  Artifact:    getting-started.md → GettingStarted.razor

Run 'md-pages gen-config' to generate a documented md-pages.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./md-pages.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content directory (overrides source_dir)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory for page artifacts (overrides output_dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one page artifact per document
    Generate,
    /// List discovered documents and their filename-derived routes
    Routes {
        /// Check the configured candidate names instead of listing the directory
        #[arg(long)]
        probe: bool,
        /// Print the route map as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse every document and report its settings without writing anything
    Check,
    /// Print a stock md-pages.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Generate => {
            let config = load_config(&cli)?;
            init_thread_pool(&config.processing);
            let report = generate::generate(&config)?;
            output::print_generate_report(&report);
        }
        Command::Routes { probe, json } => {
            let config = load_config(&cli)?;
            let routes = if probe {
                let mut discovery = ProbeDiscovery::new(
                    DirectoryProbe::new(&config.source_dir),
                    &config.source_dir,
                    &config.output_dir,
                )
                .with_candidates(config.probe.candidates.iter().cloned());
                if let Some(prefix) = config.route_prefix() {
                    discovery = discovery.with_base_route(prefix);
                }
                discovery.discover_with_routes_async().await?
            } else {
                FsDiscovery::from_config(&config)
                    .discover_with_routes_async()
                    .await?
            };
            if json {
                println!("{}", output::format_routes_json(&routes)?);
            } else {
                output::print_routes(&routes);
            }
        }
        Command::Check => {
            let config = load_config(&cli)?;
            let report = generate::check(&config)?;
            output::print_check_report(&report);
            let invalid = report.invalid().count();
            if invalid > 0 {
                return Err(format!("{invalid} document(s) have invalid frontmatter").into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config file values, then command-line overrides.
fn load_config(cli: &Cli) -> Result<PagesConfig, config::ConfigError> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins; otherwise `--quiet` → warn, `--verbose` → debug, else info.
///
/// Logs go to stderr so `routes --json` output stays machine-readable.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
