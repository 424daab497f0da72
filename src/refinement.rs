//! # Edit History & Refinement Module
//!
//! This module learns nothing; it remembers. Every time the user edits a
//! generated draft before sending it, the line diff is appended to a
//! persistent log. When the next email is drafted, the most recent diffs are
//! folded into the prompt as a style signal for the language model.
//!
//! ## Key Components
//!
//! - `EditLogStore`: JSON file persistence for `EditRecord`s
//! - `unified_diff`: line-based unified diff between two drafts
//! - `RefinementEngine`: loads history, records edits, builds the prompt addendum
//! - `PromptFragment`: the text block injected into generation prompts

mod diff;
mod error;
mod storage;

pub use diff::unified_diff;
pub use error::EditLogError;
pub use storage::{EditLog, EditLogStore, EditRecord, StorageConfig};

use std::fmt;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::crawler::CompanyInfo;

/// Heading placed before the crawled company information
pub const COMPANY_CONTEXT_HEADER: &str = "Here is some information on the company:";

const HISTORY_INSTRUCTIONS: &str = "The user has edited earlier drafts before sending them. \
Below are unified diffs from those drafts (lines starting with '-') to the versions the user \
preferred (lines starting with '+'), oldest first. Infer the user's preferences for tone, \
structure, length, and vocabulary from these edits and apply them to the new email.";

/// Configuration for the refinement engine
#[derive(Debug, Clone)]
pub struct RefinementConfig {
    /// How many of the most recent edits are shown to the model
    pub history_limit: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self { history_limit: 10 }
    }
}

/// Text block injected into a generation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFragment(String);

impl PromptFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PromptFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Frame company information with the recent edit history.
///
/// With an empty log the fragment holds only the company information.
pub fn refinement_addendum(log: &EditLog, company_info: &CompanyInfo, limit: usize) -> PromptFragment {
    let company_section = format!("{}\n{}", COMPANY_CONTEXT_HEADER, company_info);

    let recent = log.recent(limit);
    if recent.is_empty() {
        return PromptFragment(company_section);
    }

    let diffs = recent
        .iter()
        .enumerate()
        .map(|(i, record)| format!("Edit {}:\n{}", i + 1, record.diff.trim_end()))
        .collect::<Vec<_>>()
        .join("\n\n");

    PromptFragment(format!(
        "{}\n\n{}\n\n{}",
        HISTORY_INSTRUCTIONS, diffs, company_section
    ))
}

/// Records user edits and turns them into prompt context
#[derive(Debug, Clone, Default)]
pub struct RefinementEngine {
    store: EditLogStore,
    config: RefinementConfig,
}

impl RefinementEngine {
    pub fn new(store: EditLogStore, config: RefinementConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &EditLogStore {
        &self.store
    }

    /// Load the persisted edit log; never fails
    pub async fn load_history(&self) -> EditLog {
        self.store.load().await
    }

    /// Record an edit if it changed anything.
    ///
    /// Returns the appended record, or `None` when `edited` matches `original`.
    #[instrument(skip_all)]
    pub async fn append_edit(
        &self,
        original: &str,
        edited: &str,
    ) -> Result<Option<EditRecord>, EditLogError> {
        let diff = unified_diff(original, edited);
        if diff.is_empty() {
            debug!("Draft unchanged, nothing to record");
            return Ok(None);
        }

        let record = EditRecord {
            original: original.to_string(),
            edited: edited.to_string(),
            diff,
            recorded_at: Some(Utc::now()),
        };
        self.store.append(record.clone()).await?;
        info!("Recorded edit to {}", self.store.path().display());
        Ok(Some(record))
    }

    /// Build the prompt addendum from the current log
    pub async fn build_refinement_addendum(&self, company_info: &CompanyInfo) -> PromptFragment {
        let log = self.load_history().await;
        debug!("Building addendum from {} historical edits", log.len());
        refinement_addendum(&log, company_info, self.config.history_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffy::{apply, Patch};
    use tempfile::tempdir;

    fn engine(dir: &std::path::Path, history_limit: usize) -> RefinementEngine {
        RefinementEngine::new(
            EditLogStore::with_config(StorageConfig {
                path: dir.join("edit_history.json"),
            }),
            RefinementConfig { history_limit },
        )
    }

    #[tokio::test]
    async fn test_unchanged_edit_is_not_recorded() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path(), 10);

        let result = engine.append_edit("Hi Ana,\n", "Hi Ana,\n").await.unwrap();

        assert!(result.is_none());
        assert!(engine.load_history().await.is_empty());
        assert!(!engine.store().path().exists());
    }

    #[tokio::test]
    async fn test_changed_edit_appends_one_replayable_record() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path(), 10);
        let original = "Subject: Hi\n\nHi Ana,\nWe are a fund.\nBest,\nWilliam\n";
        let edited = "Subject: A longer, hookier hello\n\nHi Ana,\nBest,\nWilliam\n";

        engine.append_edit(original, edited).await.unwrap();

        let log = engine.load_history().await;
        assert_eq!(log.len(), 1);
        let record = &log.records()[0];
        assert_eq!(record.original, original);
        assert_eq!(record.edited, edited);
        let patch = Patch::from_str(&record.diff).unwrap();
        assert_eq!(apply(original, &patch).unwrap(), edited);
    }

    #[tokio::test]
    async fn test_empty_log_addendum_is_company_info_only() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path(), 10);
        let info = CompanyInfo::new("Acme builds robots.");

        let fragment = engine.build_refinement_addendum(&info).await;

        assert_eq!(
            fragment.as_str(),
            "Here is some information on the company:\nAcme builds robots."
        );
        assert!(!fragment.as_str().contains("diff"));
    }

    #[tokio::test]
    async fn test_addendum_includes_recent_diffs_oldest_first() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path(), 2);
        for n in 0..3 {
            engine
                .append_edit(&format!("line {}\n", n), &format!("changed {}\n", n))
                .await
                .unwrap();
        }

        let fragment = engine
            .build_refinement_addendum(&CompanyInfo::new("Acme"))
            .await
            .into_string();

        assert!(fragment.starts_with(HISTORY_INSTRUCTIONS));
        assert!(!fragment.contains("+changed 0"));
        let first = fragment.find("+changed 1").unwrap();
        let second = fragment.find("+changed 2").unwrap();
        assert!(first < second);
        assert!(fragment.contains("Edit 1:") && fragment.contains("Edit 2:"));
        assert!(!fragment.contains("Edit 3:"));
        assert!(fragment.ends_with("Here is some information on the company:\nAcme"));
    }
}
