use crate::core::fingerprint::Fingerprint;
use image::DynamicImage;

/// One decoded photo of the batch under review.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    /// Upload file name. Expected unique within a batch; it doubles as
    /// the key for the review flags.
    pub name: String,
    /// Size of the original file in bytes.
    pub byte_size: u64,
    pub fingerprint: Fingerprint,
    /// Laplacian-variance sharpness. Relative signal only.
    pub sharpness: f64,
    /// Owned decoded pixels, kept for the duration of the session.
    pub pixels: DynamicImage,
    /// Small JPEG preview for the rendering side.
    pub preview: Vec<u8>,
}

impl PhotoRecord {
    pub fn megabytes(&self) -> f64 {
        self.byte_size as f64 / (1024.0 * 1024.0)
    }
}

/// Photos judged near-duplicates of a common seed.
#[derive(Debug, Clone)]
pub struct PhotoGroup {
    /// Seed fingerprint in base64. A label only, never compared against.
    pub label: String,
    /// Members, best keep candidate first once ranked.
    pub members: Vec<PhotoRecord>,
}

impl PhotoGroup {
    /// Singleton groups have nothing to decide and stay out of review.
    pub fn is_reviewable(&self) -> bool {
        self.members.len() > 1
    }
}
