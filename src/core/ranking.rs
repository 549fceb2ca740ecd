use crate::core::photo::PhotoGroup;
use crate::session::ReviewSession;

/// Orders each group's members by desirability and seeds the default
/// keep/delete recommendation.
///
/// Larger files sort first (file size is the proxy for retained quality:
/// less compression, often more resolution), with sharpness breaking
/// ties. The sort is stable, so fully tied photos keep their batch order.
pub struct RankingService;

impl RankingService {
    pub fn new() -> Self {
        Self
    }

    /// Sort `group` best-first.
    pub fn rank(&self, group: &mut PhotoGroup) {
        group.members.sort_by(|a, b| {
            b.byte_size
                .cmp(&a.byte_size)
                .then_with(|| b.sharpness.total_cmp(&a.sharpness))
        });
    }

    /// Record the default recommendation: keep the first member, delete
    /// the rest. A name that already carries a flag keeps it, so user
    /// choices survive re-analysis within a session. Singleton groups
    /// are left alone.
    pub fn assign_defaults(&self, group: &PhotoGroup, session: &mut ReviewSession) {
        if !group.is_reviewable() {
            return;
        }
        for (i, photo) in group.members.iter().enumerate() {
            session.init_flag(&photo.name, i != 0);
        }
    }
}

impl Default for RankingService {
    fn default() -> Self {
        Self::new()
    }
}
