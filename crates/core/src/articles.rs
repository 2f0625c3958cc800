//! Article discovery and loading for offline index building.
//!
//! Query-time checking never touches this; the checker only sees the
//! persisted indexes.

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task;
use tracing::warn;
use walkdir::WalkDir;

/// One reference document: an identifier and its paragraphs.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: String,
    pub paragraphs: Vec<String>,
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn articles(&self) -> anyhow::Result<Vec<Article>>;
}

/// Loads every readable file under the configured roots as one article.
/// Paragraphs are blank-line separated.
pub struct FsArticleRepository {
    roots: Vec<PathBuf>,
    excludes: Vec<String>,
}

impl FsArticleRepository {
    pub fn new(roots: Vec<PathBuf>, excludes: Vec<String>) -> Self {
        Self { roots, excludes }
    }
}

#[async_trait]
impl ArticleRepository for FsArticleRepository {
    async fn articles(&self) -> anyhow::Result<Vec<Article>> {
        let (tx, mut rx) = mpsc::channel(100);
        let exclude_set = build_globset(&self.excludes)?;
        let roots = self.roots.clone();

        // Walker task
        let walker_handle = task::spawn_blocking(move || {
            for root in roots {
                for entry in WalkDir::new(root)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(|e| should_descend(e.path(), &exclude_set))
                {
                    let entry = match entry {
                        Ok(e) => e,
                        Err(_) => continue,
                    };

                    let path = entry.path();
                    if path.is_dir() || is_excluded(path, &exclude_set) || is_hidden(path) {
                        continue;
                    }

                    let article = match read_article(path) {
                        Ok(a) => a,
                        Err(err) => {
                            warn!(path = %path.display(), %err, "skipping unreadable article");
                            continue;
                        }
                    };

                    if tx.blocking_send(article).is_err() {
                        // Receiver dropped, stop walking.
                        break;
                    }
                }
            }
        });

        let mut articles = Vec::new();
        while let Some(article) = rx.recv().await {
            articles.push(article);
        }

        walker_handle.await?;
        Ok(articles)
    }
}

fn read_article(path: &Path) -> anyhow::Result<Article> {
    let text = fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("article")
        .to_string();
    Ok(Article {
        id,
        paragraphs: split_paragraphs(&text),
    })
}

/// Blank-line separated paragraphs, trimmed, empties dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn should_descend(path: &Path, excludes: &GlobSet) -> bool {
    !is_excluded(path, excludes) && !is_hidden(path)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, excludes: &GlobSet) -> bool {
    excludes.is_match(path)
}
