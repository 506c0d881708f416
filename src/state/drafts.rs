/// Upload drafts
///
/// A draft is the client-only representation of one selected file
/// between "picked" and "uploaded": metadata fields, the source path,
/// and a terminal per-draft status. Drafts live only in memory and
/// are never persisted.
///
/// Uploads run strictly sequentially in selection order: the screen
/// asks for `next_pending()` only after the previous draft settled,
/// so request N+1 is never issued before request N finishes. Failed
/// drafts stay in the list for retry or removal; successful ones are
/// removed as they complete. A batch is never atomic: partial
/// success is a normal, surfaced outcome.

use std::path::PathBuf;

/// Default metadata applied to newly added drafts, and reappliable to
/// every draft at once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalDefaults {
    pub category_id: Option<i64>,
    pub work_id: Option<i64>,
    pub is_featured: bool,
}

/// Terminal per-draft upload status
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DraftStatus {
    /// Waiting for its turn (or not part of a run yet)
    #[default]
    Pending,
    /// Its request is in flight
    Uploading,
    /// Its request failed; kept in the list for retry
    Failed(String),
}

/// One photo pending upload
#[derive(Debug, Clone)]
pub struct Draft {
    /// Transient client-side id; never leaves the process
    pub local_id: u64,
    /// Source file on disk
    pub path: PathBuf,
    pub file_name: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub work_id: Option<i64>,
    pub is_featured: bool,
    pub status: DraftStatus,
}

/// The draft list, in the order the user selected the files
#[derive(Debug, Clone, Default)]
pub struct DraftBatch {
    drafts: Vec<Draft>,
    next_id: u64,
}

impl DraftBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file as a draft. The title defaults to the file stem
    /// and the global defaults are applied, both editable afterwards.
    /// Returns the new draft's local id.
    pub fn add_file(&mut self, path: PathBuf, defaults: &GlobalDefaults) -> u64 {
        self.next_id += 1;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("photo-{}", self.next_id));
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());

        self.drafts.push(Draft {
            local_id: self.next_id,
            path,
            file_name,
            title,
            description: String::new(),
            category_id: defaults.category_id,
            work_id: defaults.work_id,
            is_featured: defaults.is_featured,
            status: DraftStatus::Pending,
        });
        self.next_id
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Draft> {
        self.drafts.iter()
    }

    pub fn get(&self, local_id: u64) -> Option<&Draft> {
        self.drafts.iter().find(|draft| draft.local_id == local_id)
    }

    pub fn get_mut(&mut self, local_id: u64) -> Option<&mut Draft> {
        self.drafts
            .iter_mut()
            .find(|draft| draft.local_id == local_id)
    }

    /// Remove one draft (the per-card X button).
    pub fn remove(&mut self, local_id: u64) {
        self.drafts.retain(|draft| draft.local_id != local_id);
    }

    /// Drop everything ("clear all").
    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    /// Every draft has a non-blank title (upload is disabled until
    /// this holds).
    pub fn all_titled(&self) -> bool {
        self.drafts.iter().all(|draft| !draft.title.trim().is_empty())
    }

    /// Reapply the global defaults to every draft.
    pub fn apply_defaults(&mut self, defaults: &GlobalDefaults) {
        for draft in &mut self.drafts {
            draft.category_id = defaults.category_id;
            draft.work_id = defaults.work_id;
            draft.is_featured = defaults.is_featured;
        }
    }

    /// Start a run: everything (including previously failed drafts)
    /// becomes pending again.
    pub fn reset_for_run(&mut self) {
        for draft in &mut self.drafts {
            draft.status = DraftStatus::Pending;
        }
    }

    /// The next draft to upload, in selection order. Only called
    /// after the previous draft settled, which is what makes the run
    /// sequential.
    pub fn next_pending(&self) -> Option<u64> {
        self.drafts
            .iter()
            .find(|draft| draft.status == DraftStatus::Pending)
            .map(|draft| draft.local_id)
    }

    pub fn mark_uploading(&mut self, local_id: u64) {
        if let Some(draft) = self.get_mut(local_id) {
            draft.status = DraftStatus::Uploading;
        }
    }

    pub fn mark_failed(&mut self, local_id: u64, message: String) {
        if let Some(draft) = self.get_mut(local_id) {
            draft.status = DraftStatus::Failed(message);
        }
    }

    /// Remove a draft that uploaded successfully.
    pub fn complete(&mut self, local_id: u64) {
        self.remove(local_id);
    }
}

/// Operation-level summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded(usize),
    Partial { succeeded: usize, failed: usize },
    AllFailed(usize),
}

impl BatchOutcome {
    /// Tri-state summary from the run counters; None when nothing ran.
    pub fn from_counts(succeeded: usize, failed: usize) -> Option<Self> {
        match (succeeded, failed) {
            (0, 0) => None,
            (n, 0) => Some(BatchOutcome::AllSucceeded(n)),
            (0, n) => Some(BatchOutcome::AllFailed(n)),
            (ok, bad) => Some(BatchOutcome::Partial {
                succeeded: ok,
                failed: bad,
            }),
        }
    }

    /// User-facing summary line.
    pub fn message(&self) -> String {
        match self {
            BatchOutcome::AllSucceeded(n) => format!("{} photos uploaded.", n),
            BatchOutcome::Partial { succeeded, failed } => {
                format!("{} photos uploaded, {} failed.", succeeded, failed)
            }
            BatchOutcome::AllFailed(n) => format!("All {} uploads failed.", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_with(names: &[&str], defaults: &GlobalDefaults) -> DraftBatch {
        let mut batch = DraftBatch::new();
        for name in names {
            batch.add_file(PathBuf::from(format!("/photos/{}", name)), defaults);
        }
        batch
    }

    #[test]
    fn test_add_file_derives_title_and_applies_defaults() {
        let defaults = GlobalDefaults {
            category_id: Some(2),
            work_id: None,
            is_featured: true,
        };
        let mut batch = DraftBatch::new();
        let id = batch.add_file(PathBuf::from("/photos/DSC_0001.jpg"), &defaults);

        let draft = batch.get(id).unwrap();
        assert_eq!(draft.title, "DSC_0001");
        assert_eq!(draft.file_name, "DSC_0001.jpg");
        assert_eq!(draft.category_id, Some(2));
        assert!(draft.is_featured);
    }

    #[test]
    fn test_sequential_run_with_middle_failure() {
        // Three drafts; the second fails. Afterwards the failed draft
        // is the only one left, with its error, and the summary is
        // "2 succeeded, 1 failed".
        let defaults = GlobalDefaults::default();
        let mut batch = batch_with(&["a.jpg", "b.jpg", "c.jpg"], &defaults);
        batch.reset_for_run();

        let mut succeeded = 0;
        let mut failed = 0;

        // Draft 1: only one request in flight at a time
        let first = batch.next_pending().unwrap();
        batch.mark_uploading(first);
        assert_eq!(batch.next_pending(), Some(2), "queue order is selection order");
        batch.complete(first);
        succeeded += 1;

        // Draft 2 fails
        let second = batch.next_pending().unwrap();
        batch.mark_uploading(second);
        batch.mark_failed(second, "HTTP 500".to_string());
        failed += 1;

        // Draft 3
        let third = batch.next_pending().unwrap();
        assert_eq!(third, 3);
        batch.mark_uploading(third);
        batch.complete(third);
        succeeded += 1;

        assert_eq!(batch.next_pending(), None);
        assert_eq!(batch.len(), 1);
        let leftover = batch.iter().next().unwrap();
        assert_eq!(leftover.file_name, "b.jpg");
        assert_eq!(leftover.status, DraftStatus::Failed("HTTP 500".to_string()));

        assert_eq!(
            BatchOutcome::from_counts(succeeded, failed),
            Some(BatchOutcome::Partial {
                succeeded: 2,
                failed: 1
            })
        );
    }

    #[test]
    fn test_outcome_tri_state() {
        assert_eq!(BatchOutcome::from_counts(0, 0), None);
        assert_eq!(
            BatchOutcome::from_counts(3, 0),
            Some(BatchOutcome::AllSucceeded(3))
        );
        assert_eq!(
            BatchOutcome::from_counts(0, 2),
            Some(BatchOutcome::AllFailed(2))
        );
    }

    #[test]
    fn test_failed_drafts_retry_on_next_run() {
        let defaults = GlobalDefaults::default();
        let mut batch = batch_with(&["a.jpg"], &defaults);
        batch.reset_for_run();

        let id = batch.next_pending().unwrap();
        batch.mark_uploading(id);
        batch.mark_failed(id, "HTTP 502".to_string());
        assert_eq!(batch.next_pending(), None);

        // A new run picks the failed draft up again
        batch.reset_for_run();
        assert_eq!(batch.next_pending(), Some(id));
    }

    #[test]
    fn test_apply_defaults_overrides_every_draft() {
        let mut batch = batch_with(&["a.jpg", "b.jpg"], &GlobalDefaults::default());
        let defaults = GlobalDefaults {
            category_id: Some(1),
            work_id: Some(4),
            is_featured: false,
        };
        batch.apply_defaults(&defaults);
        assert!(batch.iter().all(|d| d.work_id == Some(4)));
    }

    #[test]
    fn test_all_titled_gate() {
        let mut batch = batch_with(&["a.jpg"], &GlobalDefaults::default());
        assert!(batch.all_titled());

        let id = batch.iter().next().unwrap().local_id;
        batch.get_mut(id).unwrap().title = "   ".to_string();
        assert!(!batch.all_titled());
    }
}
