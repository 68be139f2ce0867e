//! In-memory content source.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::ContentSource;
use crate::error::FetchError;

/// Documents held in memory, with a log of every requested path.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, u16>>,
    requests: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    /// Make a path fail with the given status instead of not-found.
    pub fn with_failure(self, path: impl Into<String>, status: u16) -> Self {
        self.failures.lock().insert(path.into(), status);
        self
    }

    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) {
        self.documents.lock().insert(path.into(), body.into());
    }

    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.requests.lock().push(path.to_string());

        if let Some(status) = self.failures.lock().get(path) {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: *status,
            });
        }

        self.documents
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("memory ({} documents)", self.documents.lock().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_and_record() {
        let source = MemorySource::new()
            .with_document("fiction/a.json", "{}")
            .with_failure("fiction/b.json", 500);

        assert_eq!(source.fetch("fiction/a.json").await.unwrap(), "{}");
        assert!(matches!(
            source.fetch("fiction/b.json").await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            source.fetch("fiction/c.json").await,
            Err(FetchError::NotFound { .. })
        ));

        assert_eq!(
            source.requests(),
            vec!["fiction/a.json", "fiction/b.json", "fiction/c.json"]
        );
    }
}
