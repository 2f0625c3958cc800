//! Query orchestrator: one repository per strategy, checked in parallel.

use crate::analyzer::ContentAnalyzerKind;
use crate::error::CheckerError;
use crate::fingerprint::build_fingerprints;
use crate::repository::FingerprintRepository;
use index::SourceLocation;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One strategy bound to its persisted index file. Binding order defines
/// result positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryBinding {
    pub kind: ContentAnalyzerKind,
    pub index_file: PathBuf,
}

impl RepositoryBinding {
    /// Binds each named strategy to `<index_root>/<name>`. Every index file
    /// must already exist and not be a directory; anything else is a
    /// configuration error raised before a Checker exists.
    pub fn bind_all(
        index_root: &Path,
        names: &[String],
    ) -> Result<Vec<RepositoryBinding>, CheckerError> {
        if names.is_empty() {
            return Err(CheckerError::Configuration(
                "no content analyzers configured".to_string(),
            ));
        }
        if !index_root.is_dir() {
            return Err(CheckerError::Configuration(format!(
                "index path {} is not a directory",
                index_root.display()
            )));
        }
        let mut bindings: Vec<RepositoryBinding> = Vec::with_capacity(names.len());
        for name in names {
            let kind: ContentAnalyzerKind =
                name.parse().map_err(CheckerError::Configuration)?;
            if bindings.iter().any(|binding| binding.kind == kind) {
                return Err(CheckerError::Configuration(format!(
                    "content analyzer {kind} bound more than once"
                )));
            }
            let index_file = index_root.join(kind.name());
            if !index_file.is_file() {
                return Err(CheckerError::Configuration(format!(
                    "index file {} is missing or not a regular file",
                    index_file.display()
                )));
            }
            bindings.push(RepositoryBinding { kind, index_file });
        }
        Ok(bindings)
    }
}

/// Matches found by one strategy, in fingerprint-generation order.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyMatches {
    pub kind: ContentAnalyzerKind,
    pub matches: Vec<SourceLocation>,
}

/// Holds one loaded repository per binding, in binding order. Immutable
/// after construction; answers any number of concurrent checks.
#[derive(Debug)]
pub struct Checker {
    repositories: Vec<(ContentAnalyzerKind, Arc<FingerprintRepository>)>,
}

impl Checker {
    /// Loads every binding's repository. Loads are staged and only
    /// committed once all succeed; any failure fails construction as a
    /// whole and drops whatever was already staged.
    pub fn open(bindings: &[RepositoryBinding]) -> Result<Checker, CheckerError> {
        let mut staged = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let repository = FingerprintRepository::load(&binding.index_file)?;
            if repository.is_empty() {
                warn!(strategy = %binding.kind, "index holds no fingerprints");
            }
            debug!(
                strategy = %binding.kind,
                buckets = repository.len(),
                "staged repository"
            );
            staged.push((binding.kind, Arc::new(repository)));
        }
        Ok(Checker {
            repositories: staged,
        })
    }

    pub fn strategies(&self) -> impl Iterator<Item = ContentAnalyzerKind> + '_ {
        self.repositories.iter().map(|(kind, _)| *kind)
    }

    /// Checks `paragraph` against every registered strategy concurrently.
    ///
    /// The result always has one entry per binding, at the binding's
    /// position. Within one strategy, matches follow fingerprint order and
    /// are not deduplicated. An empty paragraph is valid and yields empty
    /// match lists. Repeated calls against unchanged repositories return
    /// identical results.
    pub async fn check(&self, paragraph: &str) -> Result<Vec<StrategyMatches>, CheckerError> {
        let handles: Vec<(ContentAnalyzerKind, JoinHandle<Vec<SourceLocation>>)> = self
            .repositories
            .iter()
            .map(|(kind, repository)| {
                let kind = *kind;
                let repository = Arc::clone(repository);
                let paragraph = paragraph.to_string();
                let handle =
                    tokio::spawn(
                        async move { check_one_strategy(kind, &repository, &paragraph) },
                    );
                (kind, handle)
            })
            .collect();

        // Fan-in: each handle owns exactly one result slot, filled in
        // binding order.
        let mut results = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            let matches = handle.await.map_err(|err| CheckerError::Strategy {
                kind,
                message: err.to_string(),
            })?;
            results.push(StrategyMatches { kind, matches });
        }
        Ok(results)
    }
}

/// analyze -> fingerprint -> lookup for a single strategy, appending every
/// hit in fingerprint order.
fn check_one_strategy(
    kind: ContentAnalyzerKind,
    repository: &FingerprintRepository,
    paragraph: &str,
) -> Vec<SourceLocation> {
    let checkpoints = kind.analyze(paragraph);
    let fingerprints = build_fingerprints(&checkpoints);
    let mut matches = Vec::new();
    for fingerprint in fingerprints {
        matches.extend_from_slice(repository.lookup(fingerprint));
    }
    debug!(
        strategy = %kind,
        checkpoints = checkpoints.len(),
        matches = matches.len(),
        "strategy check complete"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::Article;
    use crate::builder::RepositoryBuilder;
    use std::fs;

    fn build_index(dir: &Path, kind: ContentAnalyzerKind, docs: &[(&str, &str)]) {
        let mut builder = RepositoryBuilder::new(kind);
        for (id, text) in docs {
            builder.add_article(&Article {
                id: id.to_string(),
                paragraphs: vec![text.to_string()],
            });
        }
        builder.persist(&dir.join(kind.name())).unwrap();
    }

    #[tokio::test]
    async fn check_returns_one_slot_per_binding_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let docs = [("doc", "Some reference sentence.")];
        build_index(temp.path(), ContentAnalyzerKind::Simple, &docs);
        build_index(temp.path(), ContentAnalyzerKind::BagOfWords, &docs);

        let bindings = RepositoryBinding::bind_all(
            temp.path(),
            &["bag_of_words".to_string(), "simple".to_string()],
        )
        .unwrap();
        let checker = Checker::open(&bindings).unwrap();

        let results = checker.check("Unrelated query.").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, ContentAnalyzerKind::BagOfWords);
        assert_eq!(results[1].kind, ContentAnalyzerKind::Simple);

        let strategies: Vec<_> = checker.strategies().collect();
        assert_eq!(
            strategies,
            vec![ContentAnalyzerKind::BagOfWords, ContentAnalyzerKind::Simple]
        );
    }

    #[test]
    fn bind_all_rejects_a_strategy_bound_twice() {
        let temp = tempfile::tempdir().unwrap();
        build_index(
            temp.path(),
            ContentAnalyzerKind::Simple,
            &[("doc", "Indexed sentence.")],
        );
        let err = RepositoryBinding::bind_all(
            temp.path(),
            &["simple".to_string(), "simple".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, CheckerError::Configuration(_)));
    }

    #[test]
    fn open_error_is_debug_printable() {
        let temp = tempfile::tempdir().unwrap();
        let result = Checker::open(&[RepositoryBinding {
            kind: ContentAnalyzerKind::Simple,
            index_file: temp.path().join("absent"),
        }]);
        // Result-level helpers like unwrap_err need Checker to be Debug.
        let err = result.unwrap_err();
        assert!(format!("{err:?}").contains("Index"));
    }

    #[tokio::test]
    async fn empty_paragraph_is_valid_and_matches_nothing() {
        let temp = tempfile::tempdir().unwrap();
        build_index(
            temp.path(),
            ContentAnalyzerKind::Simple,
            &[("doc", "Indexed sentence.")],
        );
        let bindings =
            RepositoryBinding::bind_all(temp.path(), &["simple".to_string()]).unwrap();
        let checker = Checker::open(&bindings).unwrap();

        let results = checker.check("").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].matches.is_empty());
    }

    #[tokio::test]
    async fn check_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        build_index(
            temp.path(),
            ContentAnalyzerKind::Simple,
            &[("doc", "A stable reference sentence.")],
        );
        let bindings =
            RepositoryBinding::bind_all(temp.path(), &["simple".to_string()]).unwrap();
        let checker = Checker::open(&bindings).unwrap();

        let first = checker.check("A stable reference sentence.").await.unwrap();
        let second = checker.check("A stable reference sentence.").await.unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].matches, second[0].matches);
        assert!(!first[0].matches.is_empty());
    }

    #[test]
    fn open_fails_when_any_index_is_missing() {
        let temp = tempfile::tempdir().unwrap();
        build_index(
            temp.path(),
            ContentAnalyzerKind::Simple,
            &[("doc", "Indexed sentence.")],
        );
        // bag_of_words index was never built.
        let bindings = vec![
            RepositoryBinding {
                kind: ContentAnalyzerKind::Simple,
                index_file: temp.path().join("simple"),
            },
            RepositoryBinding {
                kind: ContentAnalyzerKind::BagOfWords,
                index_file: temp.path().join("bag_of_words"),
            },
        ];
        let err = Checker::open(&bindings).unwrap_err();
        assert!(matches!(err, CheckerError::Index(_)));
    }

    #[test]
    fn bind_all_rejects_unknown_names_and_bad_paths() {
        let temp = tempfile::tempdir().unwrap();
        let err =
            RepositoryBinding::bind_all(temp.path(), &["no_such_analyzer".to_string()])
                .unwrap_err();
        assert!(matches!(err, CheckerError::Configuration(_)));

        let err = RepositoryBinding::bind_all(
            &temp.path().join("missing_root"),
            &["simple".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, CheckerError::Configuration(_)));

        fs::create_dir_all(temp.path().join("simple")).unwrap();
        let err = RepositoryBinding::bind_all(temp.path(), &["simple".to_string()])
            .unwrap_err();
        assert!(matches!(err, CheckerError::Configuration(_)));
    }
}
