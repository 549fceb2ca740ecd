use rayon::prelude::*;

use crate::core::decode::{DecodeError, DecodeService};
use crate::core::duplicate::DuplicateGrouper;
use crate::core::fingerprint::FingerprintService;
use crate::core::photo::{PhotoGroup, PhotoRecord};
use crate::core::ranking::RankingService;
use crate::core::scoring::ScoringService;
use crate::session::ReviewSession;

/// One file handed over by the upload side.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Result of analyzing a batch: the grouped photos plus the files that
/// failed to decode and were skipped.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// All groups in seed order. Together they hold every photo that
    /// decoded, singletons included.
    pub groups: Vec<PhotoGroup>,
    pub skipped: Vec<(String, DecodeError)>,
}

impl AnalysisOutcome {
    /// Groups with something to decide, in seed order.
    pub fn reviewable(&self) -> impl Iterator<Item = &PhotoGroup> {
        self.groups.iter().filter(|g| g.is_reviewable())
    }
}

/// Runs a whole batch through decode, fingerprinting, scoring, grouping
/// and ranking. One blocking call per batch; re-running recomputes
/// everything from the uploads and reuses nothing.
pub struct AnalyzerService {
    decoder: DecodeService,
    fingerprints: FingerprintService,
    scoring: ScoringService,
    grouper: DuplicateGrouper,
    ranker: RankingService,
}

impl AnalyzerService {
    pub fn new() -> Self {
        Self {
            decoder: DecodeService::new(),
            fingerprints: FingerprintService::new(),
            scoring: ScoringService::new(),
            grouper: DuplicateGrouper::new(),
            ranker: RankingService::new(),
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.grouper = self.grouper.with_threshold(threshold);
        self
    }

    /// Analyze `uploads` and seed default flags into `session`.
    ///
    /// Files that fail to decode are skipped and reported; the rest of
    /// the batch still goes through. Upload order is preserved end to
    /// end, which keeps grouping deterministic for a given batch.
    pub fn analyze(
        &self,
        uploads: Vec<PhotoUpload>,
        session: &mut ReviewSession,
    ) -> AnalysisOutcome {
        let (records, skipped) = self.extract(uploads);
        log::info!(
            "extracted {} photo(s), skipped {}",
            records.len(),
            skipped.len()
        );

        let mut groups = self.grouper.group(records);
        for group in &mut groups {
            self.ranker.rank(group);
            self.ranker.assign_defaults(group, session);
        }
        log::info!(
            "{} group(s), {} under review",
            groups.len(),
            groups.iter().filter(|g| g.is_reviewable()).count()
        );

        AnalysisOutcome { groups, skipped }
    }

    /// Per-photo phase: decode, fingerprint, score. Photos are
    /// independent here, so the batch fans out across cores.
    fn extract(
        &self,
        uploads: Vec<PhotoUpload>,
    ) -> (Vec<PhotoRecord>, Vec<(String, DecodeError)>) {
        let results: Vec<Result<PhotoRecord, (String, DecodeError)>> = uploads
            .into_par_iter()
            .map(|upload| self.extract_one(upload))
            .collect();

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err((name, err)) => {
                    log::warn!("skipping {}: {}", name, err);
                    skipped.push((name, err));
                }
            }
        }
        (records, skipped)
    }

    fn extract_one(&self, upload: PhotoUpload) -> Result<PhotoRecord, (String, DecodeError)> {
        let PhotoUpload { name, bytes } = upload;
        let byte_size = bytes.len() as u64;

        let pixels = match self.decoder.decode(&bytes) {
            Ok(pixels) => pixels,
            Err(err) => return Err((name, err)),
        };
        let preview = match self.decoder.preview(&pixels) {
            Ok(preview) => preview,
            Err(err) => return Err((name, err)),
        };

        let fingerprint = self.fingerprints.fingerprint(&pixels);
        let sharpness = self.scoring.score(&pixels);

        Ok(PhotoRecord {
            name,
            byte_size,
            fingerprint,
            sharpness,
            pixels,
            preview,
        })
    }
}

impl Default for AnalyzerService {
    fn default() -> Self {
        Self::new()
    }
}
