//! Grounding providers
//!
//! A grounding provider supplies factual reference text (pricing ranges,
//! latency baselines, known architecture patterns) that the prompt builder
//! injects into the reference-context section. Providers are consulted only
//! when the request enables RAG. A failure is never fatal: the evaluator logs
//! it and falls back to the no-reference-context prompt.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::{ClosedSet, RagSource};

/// Grounding text could not be produced
#[derive(Debug, Error)]
pub enum GroundingError {
    /// The backing store could not be reached or read
    #[error("grounding source unavailable: {0}")]
    Unavailable(String),

    /// A reference document could not be loaded
    #[error("failed to read grounding document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of grounding text for a prompt.
#[async_trait]
pub trait GroundingProvider: Send + Sync {
    /// Retrieve reference text for the requested sources.
    ///
    /// An empty `sources` slice means no category filter. `Ok(None)` means
    /// nothing relevant is available.
    async fn retrieve(&self, sources: &[RagSource]) -> Result<Option<String>, GroundingError>;
}

/// Provider that never has reference text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGrounding;

#[async_trait]
impl GroundingProvider for NoGrounding {
    async fn retrieve(&self, _sources: &[RagSource]) -> Result<Option<String>, GroundingError> {
        Ok(None)
    }
}

/// Provider backed by one reference document per source, held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticGroundingProvider {
    documents: BTreeMap<RagSource, String>,
}

impl StaticGroundingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the document for a source, replacing any previous one.
    pub fn with_document(mut self, source: RagSource, text: impl Into<String>) -> Self {
        self.documents.insert(source, text.into());
        self
    }

    /// Load documents from files, one path per source.
    pub fn from_files<'a, I>(paths: I) -> Result<Self, GroundingError>
    where
        I: IntoIterator<Item = (RagSource, &'a Path)>,
    {
        let mut provider = Self::new();
        for (source, path) in paths {
            let text = std::fs::read_to_string(path).map_err(|source_err| GroundingError::Io {
                path: path.to_path_buf(),
                source: source_err,
            })?;
            debug!(source = source.as_str(), path = %path.display(), bytes = text.len(), "loaded grounding document");
            provider.documents.insert(source, text);
        }
        Ok(provider)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Sources with a registered document.
    pub fn sources(&self) -> impl Iterator<Item = RagSource> + '_ {
        self.documents.keys().copied()
    }

    fn render(&self, sources: &[RagSource]) -> Option<String> {
        let mut selected: Vec<RagSource> = if sources.is_empty() {
            self.documents.keys().copied().collect()
        } else {
            sources.to_vec()
        };
        // Request order is kept; a repeated source contributes its document once.
        let mut seen = Vec::with_capacity(selected.len());
        selected.retain(|s| {
            if seen.contains(s) {
                false
            } else {
                seen.push(*s);
                true
            }
        });

        let blocks: Vec<String> = selected
            .iter()
            .filter_map(|source| {
                let text = self.documents.get(source)?.trim();
                (!text.is_empty()).then(|| format!("[{}]\n{}", source.as_str(), text))
            })
            .collect();

        (!blocks.is_empty()).then(|| blocks.join("\n\n"))
    }
}

#[async_trait]
impl GroundingProvider for StaticGroundingProvider {
    async fn retrieve(&self, sources: &[RagSource]) -> Result<Option<String>, GroundingError> {
        Ok(self.render(sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn provider() -> StaticGroundingProvider {
        StaticGroundingProvider::new()
            .with_document(RagSource::CloudPricing, "Managed Postgres: low hundreds USD/month for small instances")
            .with_document(RagSource::LatencyBaselines, "Same-AZ round trip: ~0.5ms\n")
    }

    #[tokio::test]
    async fn test_no_grounding_returns_nothing() {
        assert_eq!(NoGrounding.retrieve(&[RagSource::CloudPricing]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_filtered_retrieval_follows_request_order() {
        let text = provider()
            .retrieve(&[RagSource::LatencyBaselines, RagSource::CloudPricing])
            .await
            .unwrap()
            .unwrap();

        assert!(text.starts_with("[latency_baselines]\nSame-AZ round trip: ~0.5ms\n\n[cloud_pricing]"));
    }

    #[tokio::test]
    async fn test_empty_sources_means_unfiltered() {
        let text = provider().retrieve(&[]).await.unwrap().unwrap();
        assert!(text.contains("[cloud_pricing]"));
        assert!(text.contains("[latency_baselines]"));
    }

    #[tokio::test]
    async fn test_unknown_source_yields_none() {
        let result = provider()
            .retrieve(&[RagSource::ArchitecturePatterns])
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_repeated_source_rendered_once() {
        let text = provider()
            .retrieve(&[RagSource::CloudPricing, RagSource::CloudPricing])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(text.matches("[cloud_pricing]").count(), 1);
    }

    #[test]
    fn test_from_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CQRS splits read and write models").unwrap();

        let provider =
            StaticGroundingProvider::from_files([(RagSource::ArchitecturePatterns, file.path())]).unwrap();
        assert_eq!(provider.sources().collect::<Vec<_>>(), vec![RagSource::ArchitecturePatterns]);
    }

    #[test]
    fn test_from_files_missing_path() {
        let err = StaticGroundingProvider::from_files([(
            RagSource::CloudPricing,
            Path::new("/nonexistent/archlens/pricing.md"),
        )])
        .unwrap_err();
        assert!(matches!(err, GroundingError::Io { .. }));
    }
}
