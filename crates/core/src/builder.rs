//! Write path: builds and persists one fingerprint index per strategy.

use crate::analyzer::ContentAnalyzerKind;
use crate::articles::{Article, ArticleRepository};
use crate::fingerprint::build_fingerprints;
use anyhow::Context;
use index::{IndexError, IndexSnapshot, SourceLocation};
use std::path::Path;
use tracing::info;

/// Accumulates fingerprint -> location mappings for one strategy.
pub struct RepositoryBuilder {
    kind: ContentAnalyzerKind,
    snapshot: IndexSnapshot,
    checkpoints: usize,
}

impl RepositoryBuilder {
    pub fn new(kind: ContentAnalyzerKind) -> Self {
        Self {
            kind,
            snapshot: IndexSnapshot::new(kind.name()),
            checkpoints: 0,
        }
    }

    /// Analyzes and fingerprints every paragraph of `article`, appending a
    /// location to each fingerprint's bucket. Repeated fingerprints, within
    /// one article or across articles, accumulate in arrival order; nothing
    /// is overwritten. Returns the number of checkpoints indexed.
    pub fn add_article(&mut self, article: &Article) -> usize {
        let mut added = 0;
        for (paragraph_idx, paragraph) in article.paragraphs.iter().enumerate() {
            let checkpoints = self.kind.analyze(paragraph);
            let fingerprints = build_fingerprints(&checkpoints);
            for (checkpoint_idx, (fingerprint, checkpoint)) in
                fingerprints.iter().zip(&checkpoints).enumerate()
            {
                self.snapshot
                    .entries
                    .entry(fingerprint.0)
                    .or_default()
                    .push(SourceLocation {
                        article: article.id.clone(),
                        paragraph: paragraph_idx,
                        checkpoint: checkpoint_idx,
                        text: Some(checkpoint.clone()),
                    });
                added += 1;
            }
        }
        self.checkpoints += added;
        added
    }

    /// Number of distinct fingerprints accumulated so far.
    pub fn buckets(&self) -> usize {
        self.snapshot.entries.len()
    }

    /// Persists the accumulated index, atomically replacing any prior
    /// snapshot at `path`.
    pub fn persist(&self, path: &Path) -> Result<(), IndexError> {
        index::save(path, &self.snapshot)
    }
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub articles: usize,
    pub checkpoints: usize,
    pub buckets: Vec<(ContentAnalyzerKind, usize)>,
}

/// Offline build pass: loads the corpus once, then builds and persists one
/// index file per strategy under `index_root` (file name = strategy name).
pub async fn build_indexes(
    articles: &dyn ArticleRepository,
    kinds: &[ContentAnalyzerKind],
    index_root: &Path,
) -> anyhow::Result<BuildSummary> {
    std::fs::create_dir_all(index_root)
        .with_context(|| format!("create index root {}", index_root.display()))?;

    info!("Loading articles...");
    let corpus = articles.articles().await.context("load articles")?;
    info!("Loaded {} articles.", corpus.len());

    let mut summary = BuildSummary {
        articles: corpus.len(),
        ..BuildSummary::default()
    };

    for kind in kinds {
        info!("Building {kind} index...");
        let mut builder = RepositoryBuilder::new(*kind);
        for article in &corpus {
            summary.checkpoints += builder.add_article(article);
        }
        let path = index_root.join(kind.name());
        builder
            .persist(&path)
            .with_context(|| format!("persist {kind} index to {}", path.display()))?;
        info!(
            "Built {kind} index: {} fingerprints -> {}",
            builder.buckets(),
            path.display()
        );
        summary.buckets.push((*kind, builder.buckets()));
    }

    Ok(summary)
}
