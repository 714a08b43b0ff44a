use clap::{Parser, Subcommand};
use folio::config::{self, FolioConfig};
use folio::http::{self, AppState};
use folio::output;
use folio::query::{self, ContentIndex};
use folio::scan;
use folio::store::DirStore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

/// Shared flag for commands that can print API-shaped JSON.
#[derive(clap::Args, Clone)]
struct JsonArgs {
    /// Print the JSON the API would return instead of a summary
    #[arg(long)]
    json: bool,
}

fn version_string() -> &'static str {
    if env!("FOLIO_RELEASE_BUILD") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("FOLIO_GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup
        hash => &*Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Projects API for a Markdown portfolio")]
#[command(long_about = "\
Projects API for a Markdown portfolio

Each project is one Markdown file with a YAML header:

  content/projects/
  ├── receipt-ocr.md       # ---
  │                        # id: receipt-ocr          (required, also the slug)
  │                        # title: Receipt OCR       (required)
  │                        # date: 2024-05-20
  │                        # techStack: [Python, PyTorch]
  │                        # featured: true
  │                        # ---
  │                        # Body text...
  └── old-idea.md          # <!-- whole file commented out = hidden -->

Files missing `id` or `title`, with a broken header, or containing a hidden
marker phrase are skipped. Run 'folio check' to see which and why.

Run 'folio gen-config' to generate a documented folio.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory (overrides `content_dir` from the config)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Config file (default: ./folio.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List projects, newest first
    List {
        /// Only featured projects
        #[arg(long)]
        featured: bool,
        #[command(flatten)]
        out: JsonArgs,
    },
    /// Show one project
    Show {
        slug: String,
        #[command(flatten)]
        out: JsonArgs,
    },
    /// Projects most similar to one project
    Related {
        slug: String,
        /// How many to return (0 or absent uses the configured default)
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        out: JsonArgs,
    },
    /// Previous (newer) and next (older) projects
    Nav {
        slug: String,
        #[command(flatten)]
        out: JsonArgs,
    },
    /// Validate the content directory and list skipped files
    Check,
    /// Serve the projects API over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let resolve = || setup(cli.config.as_deref(), cli.source.as_deref());

    match &cli.command {
        Command::List { featured, out } => {
            let (config, store) = resolve()?;
            let index = load_index(&store, &config)?;
            let projects = if *featured {
                index.list_featured()
            } else {
                index.list_all()
            };
            emit(&projects, out.json, || output::format_project_list(&projects))?;
        }
        Command::Show { slug, out } => {
            let (config, store) = resolve()?;
            let index = load_index(&store, &config)?;
            let project = index.find_by_slug(slug).ok_or_else(|| not_found(slug))?;
            emit(project, out.json, || output::format_project(project))?;
        }
        Command::Related { slug, limit, out } => {
            let (config, store) = resolve()?;
            let index = load_index(&store, &config)?;
            let limit = query::effective_limit(*limit, config.related.default_limit);
            let related = index.related(slug, limit).ok_or_else(|| not_found(slug))?;
            emit(&related, out.json, || output::format_project_list(&related))?;
        }
        Command::Nav { slug, out } => {
            let (config, store) = resolve()?;
            let index = load_index(&store, &config)?;
            let nav = index.navigation(slug).ok_or_else(|| not_found(slug))?;
            emit(&nav, out.json, || output::format_navigation(&nav))?;
        }
        Command::Check => {
            let (config, store) = resolve()?;
            println!("==> Checking {}", store.root().display());
            let report = scan::scan(&store, &config.content)?;
            output::print_lines(&output::format_scan_report(&report));
            let invalid = report
                .rejected
                .iter()
                .filter(|r| !r.reason.is_hidden())
                .count();
            if invalid > 0 {
                return Err(format!("{invalid} project file(s) could not be loaded").into());
            }
            println!("==> Content is valid");
        }
        Command::Serve { host, port } => {
            let (mut config, store) = resolve()?;
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(http::serve(AppState::new(config, store)))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default: this crate at `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve config and the content store.
///
/// An explicit `--config` must exist; otherwise `./folio.toml` is optional.
/// `--source` overrides `content_dir`.
fn setup(
    config_path: Option<&Path>,
    source: Option<&Path>,
) -> Result<(FolioConfig, DirStore), config::ConfigError> {
    let mut config = match config_path {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(Path::new("."))?,
    };
    if let Some(source) = source {
        config.content_dir = source.to_string_lossy().to_string();
    }
    let store = DirStore::new(&config.content_dir);
    Ok((config, store))
}

fn load_index(
    store: &DirStore,
    config: &FolioConfig,
) -> Result<ContentIndex, Box<dyn std::error::Error>> {
    let default_date = config.content.parsed_default_date()?;
    let report = scan::scan(store, &config.content)?;
    Ok(ContentIndex::new(report.records, default_date))
}

fn not_found(slug: &str) -> Box<dyn std::error::Error> {
    format!("project not found: {slug}").into()
}

/// Print `value` as pretty JSON, or the human-readable lines.
fn emit<T, F>(value: &T, json: bool, lines: F) -> Result<(), serde_json::Error>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> Vec<String>,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        output::print_lines(&lines());
    }
    Ok(())
}
