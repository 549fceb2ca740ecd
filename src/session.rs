use crate::core::photo::PhotoGroup;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// Review state for one analyzed batch.
///
/// Delete flags are keyed by upload name. Two uploads sharing a name
/// would share a flag; batches are expected to carry unique names.
///
/// Flag lifecycle: the ranker seeds a flag once per name, toggle events
/// from the review surface flip it, and every stats refresh reads it.
/// Flags live until `finalize` or until the session is dropped.
#[derive(Debug, Default)]
pub struct ReviewSession {
    flags: HashMap<String, bool>,
}

/// Aggregate over the currently delete-flagged photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CullStats {
    pub deleted_count: usize,
    pub deleted_bytes: u64,
}

impl CullStats {
    pub fn deleted_megabytes(&self) -> f64 {
        self.deleted_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Outcome of closing out a review. Reporting only: nothing on disk is
/// touched, and the caller decides what (if anything) to do with the
/// flagged names.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeReport {
    pub timestamp: String,
    pub deleted_count: usize,
    pub deleted_bytes: u64,
    pub deleted_names: Vec<String>,
}

impl FinalizeReport {
    pub fn deleted_megabytes(&self) -> f64 {
        self.deleted_bytes as f64 / (1024.0 * 1024.0)
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a default flag for `name` unless one already exists.
    /// Defaults never overwrite a choice already made this session.
    pub fn init_flag(&mut self, name: &str, deleted: bool) {
        self.flags.entry(name.to_string()).or_insert(deleted);
    }

    /// Flip the flag for `name`; toggle events from the review surface
    /// land here. Returns the new state, or `None` for an unknown name.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let flag = self.flags.get_mut(name)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Current flag for `name`. Photos never flagged count as kept.
    pub fn is_deleted(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    /// Totals over every member of a multi-member group currently
    /// flagged for deletion. Recomputed from the flags on every call;
    /// nothing is cached.
    pub fn stats(&self, groups: &[PhotoGroup]) -> CullStats {
        let mut stats = CullStats {
            deleted_count: 0,
            deleted_bytes: 0,
        };
        for group in groups.iter().filter(|g| g.is_reviewable()) {
            for photo in &group.members {
                if self.is_deleted(&photo.name) {
                    stats.deleted_count += 1;
                    stats.deleted_bytes += photo.byte_size;
                }
            }
        }
        stats
    }

    /// Close out the review: report the aggregate and the flagged names,
    /// then clear the flags. No file is deleted here or anywhere else in
    /// this crate; wiring the report to real removal is the embedding
    /// application's call.
    pub fn finalize(&mut self, groups: &[PhotoGroup]) -> FinalizeReport {
        let stats = self.stats(groups);

        let mut deleted_names = Vec::new();
        for group in groups.iter().filter(|g| g.is_reviewable()) {
            for photo in &group.members {
                if self.is_deleted(&photo.name) {
                    deleted_names.push(photo.name.clone());
                }
            }
        }

        self.flags.clear();

        FinalizeReport {
            timestamp: Utc::now().to_rfc3339(),
            deleted_count: stats.deleted_count,
            deleted_bytes: stats.deleted_bytes,
            deleted_names,
        }
    }
}
