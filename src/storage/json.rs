use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Period;

use super::LogbookStore;

/// Period history kept as a pretty-printed JSON array.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "logbook.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LogbookStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Period>> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to check {}", self.path.display()))?
        {
            tracing::debug!(path = %self.path.display(), "no logbook file yet");
            return Ok(Vec::new());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let periods: Vec<Period> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid logbook file {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), periods = periods.len(), "loaded logbook");
        Ok(periods)
    }

    async fn save(&self, periods: &[Period]) -> Result<()> {
        let json = serde_json::to_string_pretty(periods).context("Failed to encode logbook")?;

        // Atomic replace: write a sibling file, then rename over the target.
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(err).with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        tracing::debug!(path = %self.path.display(), periods = periods.len(), "saved logbook");
        Ok(())
    }
}
