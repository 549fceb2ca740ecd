use image::{DynamicImage, GrayImage};

/// Scores photo sharpness as the variance of a Laplacian edge response.
///
/// The score has no absolute calibration. It only means something when
/// comparing shots of the same scene, so it must never be thresholded on
/// its own to reject a photo.
pub struct ScoringService;

impl ScoringService {
    pub fn new() -> Self {
        Self
    }

    /// Sharpness of a decoded photo. Higher means more high-frequency
    /// detail, which reads as better focus.
    pub fn score(&self, pixels: &DynamicImage) -> f64 {
        let gray = pixels.to_luma8();
        Self::laplacian_variance(&gray)
    }

    /// Variance of the 3x3 Laplacian over the interior pixels.
    fn laplacian_variance(gray: &GrayImage) -> f64 {
        let (width, height) = gray.dimensions();
        if width < 3 || height < 3 {
            return 0.0;
        }

        // [ 0  1  0 ]
        // [ 1 -4  1 ]
        // [ 0  1  0 ]
        let mut responses = Vec::with_capacity(((width - 2) * (height - 2)) as usize);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let center = gray.get_pixel(x, y)[0] as i32;
                let top = gray.get_pixel(x, y - 1)[0] as i32;
                let bottom = gray.get_pixel(x, y + 1)[0] as i32;
                let left = gray.get_pixel(x - 1, y)[0] as i32;
                let right = gray.get_pixel(x + 1, y)[0] as i32;
                responses.push((top + bottom + left + right - 4 * center) as f64);
            }
        }

        let mean = responses.iter().sum::<f64>() / responses.len() as f64;
        responses.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / responses.len() as f64
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new()
    }
}
