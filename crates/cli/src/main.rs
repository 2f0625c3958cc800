use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use textmatch_core::articles::FsArticleRepository;
use textmatch_core::builder;
use textmatch_core::checker::{Checker, RepositoryBinding};
use textmatch_core::config;
use textmatch_core::config::AppConfig;
use tracing::info;

mod output;
mod session;

#[derive(Parser)]
#[command(name = "textmatch", about = "Fingerprint-based text reuse checker")]
struct Cli {
    /// Config file providing defaults for the flags below.
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one fingerprint index per content analyzer from article folders
    Build {
        /// Article folders, separated by comma
        #[arg(short = 'r', long, value_delimiter = ',')]
        articles: Vec<String>,
        /// Glob patterns excluded from the article walk
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Content analyzer names, separated by comma
        #[arg(short = 'a', long, value_delimiter = ',')]
        analyzers: Vec<String>,
        /// Index path, each content analyzer will create an index under this path
        #[arg(short = 'i', long)]
        index_path: Option<String>,
    },
    /// Check stdin paragraphs against built indexes, one paragraph per line
    Check {
        /// Content analyzer names, separated by comma
        #[arg(short = 'a', long, value_delimiter = ',')]
        analyzers: Vec<String>,
        /// Index path holding one index file per analyzer
        #[arg(short = 'i', long)]
        index_path: Option<String>,
        /// Emit one JSON object per paragraph instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            articles,
            exclude,
            analyzers,
            index_path,
        } => run_build(cfg, articles, exclude, analyzers, index_path).await,
        Commands::Check {
            analyzers,
            index_path,
            json,
        } => run_check(cfg, analyzers, index_path, json).await,
    }
}

async fn run_build(
    cfg: AppConfig,
    articles: Vec<String>,
    exclude: Vec<String>,
    analyzers: Vec<String>,
    index_path: Option<String>,
) -> Result<()> {
    let roots = if articles.is_empty() {
        cfg.articles.include.clone()
    } else {
        articles
    };
    if roots.is_empty() {
        bail!("no article folders given (use --articles or a config file)");
    }
    let excludes = if exclude.is_empty() {
        cfg.articles.exclude.clone()
    } else {
        exclude
    };
    let kinds = parse_analyzers(resolve_analyzers(&cfg, analyzers)?)?;
    let index_root = resolve_index_path(&cfg, index_path)?;

    let roots = roots.into_iter().map(PathBuf::from).collect();
    let repository = FsArticleRepository::new(roots, excludes);
    let summary = builder::build_indexes(&repository, &kinds, &index_root).await?;
    info!(
        "Indexed {} checkpoints from {} articles across {} strategies.",
        summary.checkpoints,
        summary.articles,
        summary.buckets.len()
    );
    Ok(())
}

async fn run_check(
    cfg: AppConfig,
    analyzers: Vec<String>,
    index_path: Option<String>,
    json: bool,
) -> Result<()> {
    let names = resolve_analyzers(&cfg, analyzers)?;
    let index_root = resolve_index_path(&cfg, index_path)?;

    let bindings = RepositoryBinding::bind_all(&index_root, &names)?;
    let checker = Checker::open(&bindings)?;
    let loaded: Vec<String> = checker.strategies().map(|kind| kind.to_string()).collect();
    info!("Loaded fingerprint repositories: {}.", loaded.join(", "));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let served = session::run(&checker, stdin.lock(), &mut stdout, json).await?;
    info!("Session ended after {served} paragraph(s).");
    Ok(())
}

fn resolve_analyzers(cfg: &AppConfig, flag: Vec<String>) -> Result<Vec<String>> {
    let names = if flag.is_empty() {
        cfg.analyzers.clone()
    } else {
        flag
    };
    if names.is_empty() {
        bail!("no content analyzers given (use --analyzers or a config file)");
    }
    Ok(names)
}

fn resolve_index_path(cfg: &AppConfig, flag: Option<String>) -> Result<PathBuf> {
    flag.or_else(|| cfg.index.path.clone())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("no index path given (use --index-path or a config file)"))
}

fn parse_analyzers(
    names: Vec<String>,
) -> Result<Vec<textmatch_core::analyzer::ContentAnalyzerKind>> {
    names
        .iter()
        .map(|name| name.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .collect()
}
