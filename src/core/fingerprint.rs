use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};

/// Fixed-length perceptual signature of a photo's visual content.
///
/// Visually similar photos (resized, recompressed, slightly noisy copies)
/// produce signatures a few bits apart; real content or composition
/// changes move many bits at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(ImageHash);

impl Fingerprint {
    /// Hamming distance in bits. Symmetric, and zero between equal
    /// signatures.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        self.0.dist(&other.0)
    }

    /// Base64 form of the signature, usable as a stable label.
    pub fn to_base64(&self) -> String {
        self.0.to_base64()
    }

    /// Rebuild a fingerprint from raw signature bytes, or `None` when the
    /// bytes do not form a valid signature.
    pub fn from_bytes(bytes: &[u8]) -> Option<Fingerprint> {
        ImageHash::from_bytes(bytes).ok().map(Fingerprint)
    }
}

/// Computes DCT perceptual hashes for decoded photos.
pub struct FingerprintService {
    hasher: Hasher,
}

impl FingerprintService {
    pub fn new() -> Self {
        // 8x8 DCT hash: 64 bits, stable under resizing and recompression.
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }

    pub fn fingerprint(&self, pixels: &DynamicImage) -> Fingerprint {
        Fingerprint(self.hasher.hash_image(pixels))
    }
}

impl Default for FingerprintService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn gradient(size: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(size, size, |x, _| {
            let v = (x * 255 / size) as u8;
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn checkerboard(size: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(size, size, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([255u8, 255, 255])
            } else {
                Rgb([0u8, 0, 0])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_distance_zero_for_same_image() {
        let service = FingerprintService::new();
        let a = service.fingerprint(&gradient(64));
        let b = service.fingerprint(&gradient(64));
        assert_eq!(a, b);
        assert_eq!(a.distance(&b), 0);
    }

    #[test]
    fn test_distance_symmetry() {
        let service = FingerprintService::new();
        let a = service.fingerprint(&gradient(64));
        let b = service.fingerprint(&checkerboard(64));
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn test_different_content_moves_bits() {
        let service = FingerprintService::new();
        let a = service.fingerprint(&gradient(64));
        let b = service.fingerprint(&checkerboard(64));
        assert!(a.distance(&b) > 0);
    }

    #[test]
    fn test_from_bytes_distance() {
        let a = Fingerprint::from_bytes(&[0u8; 8]).unwrap();
        let b = Fingerprint::from_bytes(&[0b0000_0001, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(a.distance(&a), 0);
        assert_eq!(a.distance(&b), 1);
        assert_eq!(b.distance(&a), 1);
    }

    #[test]
    fn test_base64_label_is_stable() {
        let a = Fingerprint::from_bytes(&[7u8; 8]).unwrap();
        let label = a.to_base64();
        assert!(!label.is_empty());
        assert_eq!(label, a.to_base64());
    }
}
