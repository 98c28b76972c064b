//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Maximum milestones a single contract may hold.
pub const DEFAULT_MAX_MILESTONES: usize = 3;

/// Policy for expiring unreviewed submissions against the deadline.
///
/// The engine itself never performs a timeout-driven transition: an
/// unreviewed submission stays `PendingReview` until the client acts. The
/// policy is carried on the config so that an external sweep process can
/// read one authoritative setting instead of inventing its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewExpiryPolicy {
    /// Submissions never expire (reference behavior).
    #[default]
    Never,
    /// A sweep process may treat reviews older than this many days as stale.
    AfterDays(u32),
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum milestones per contract.
    pub max_milestones_per_contract: usize,
    /// Expiry policy for unreviewed submissions (engine-inert, see
    /// [`ReviewExpiryPolicy`]).
    pub review_expiry: ReviewExpiryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_milestones_per_contract: DEFAULT_MAX_MILESTONES,
            review_expiry: ReviewExpiryPolicy::Never,
        }
    }
}
