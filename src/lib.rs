pub mod core;
pub mod session;

pub use crate::core::analyzer::{AnalysisOutcome, AnalyzerService, PhotoUpload};
pub use crate::core::decode::{DecodeError, DecodeService};
pub use crate::core::duplicate::DuplicateGrouper;
pub use crate::core::fingerprint::{Fingerprint, FingerprintService};
pub use crate::core::photo::{PhotoGroup, PhotoRecord};
pub use crate::core::ranking::RankingService;
pub use crate::core::scoring::ScoringService;
pub use crate::session::{CullStats, FinalizeReport, ReviewSession};

/// Maximum Hamming distance between two fingerprints for photos to land
/// in the same group. Higher values merge photos that are less alike:
/// 3-4 demands near-identical shots, 5-6 tolerates small movement between
/// frames, 7+ starts mixing different compositions.
pub const SIMILARITY_THRESHOLD: u32 = 5;

/// Sharpness scores below this can be called badly blurred in listings.
/// Display guidance only: grouping and ranking never consult it, and
/// relative comparison within a group always beats the absolute value.
pub const BLUR_THRESHOLD: f64 = 100.0;
