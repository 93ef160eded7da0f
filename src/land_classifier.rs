/// Land / ocean classification against the reference world image
///
/// The image is an interleaved RGBA8 buffer, row-major from the top-left
/// corner. In the dark earth asset landmass is painted near-black, so a pixel
/// counts as land when its red, green and blue channels are all below the
/// threshold.

use crate::constants::{LAND_THRESHOLD, RGBA_CHANNELS};
use crate::equirectangular::{ImageDimensions, PixelCoordinate};
use crate::error::{GlobeError, GlobeResult};

/// Normalized pixel colour, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl PixelColor {
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            red: rgba[0] as f64 / 255.0,
            green: rgba[1] as f64 / 255.0,
            blue: rgba[2] as f64 / 255.0,
            alpha: rgba[3] as f64 / 255.0,
        }
    }

    pub fn is_land(&self, threshold: f64) -> bool {
        self.red < threshold && self.green < threshold && self.blue < threshold
    }
}

/// Classifies reference-image pixels as land or ocean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandClassifier {
    threshold: f64,
}

impl Default for LandClassifier {
    fn default() -> Self {
        Self {
            threshold: LAND_THRESHOLD,
        }
    }
}

impl LandClassifier {
    pub fn new(threshold: f64) -> GlobeResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(GlobeError::invalid_argument(format!(
                "land threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Read the colour at `pixel` from an RGBA8 buffer `image_width` pixels wide
    ///
    /// The image height is the number of complete rows in the buffer. Pixels
    /// past either edge fail with `OutOfBounds`.
    pub fn classify(pixel: PixelCoordinate, buffer: &[u8], image_width: u32) -> GlobeResult<PixelColor> {
        if image_width == 0 {
            return Err(GlobeError::invalid_argument("image width must be non-zero"));
        }
        let row_bytes = image_width as usize * RGBA_CHANNELS;
        let image_height = (buffer.len() / row_bytes) as u32;

        if pixel.u >= image_width || pixel.v >= image_height {
            return Err(GlobeError::OutOfBounds {
                u: pixel.u as i64,
                v: pixel.v as i64,
                width: image_width,
                height: image_height,
            });
        }

        let offset = (image_width as usize * pixel.v as usize + pixel.u as usize) * RGBA_CHANNELS;
        let rgba: [u8; 4] = buffer
            .get(offset..offset + RGBA_CHANNELS)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(GlobeError::OutOfBounds {
                u: pixel.u as i64,
                v: pixel.v as i64,
                width: image_width,
                height: image_height,
            })?;

        Ok(PixelColor::from_rgba8(rgba))
    }

    pub fn is_land(&self, pixel: PixelCoordinate, buffer: &[u8], image_width: u32) -> GlobeResult<bool> {
        Ok(Self::classify(pixel, buffer, image_width)?.is_land(self.threshold))
    }
}

/// An RGBA8 world image resident in memory
#[derive(Debug, Clone, PartialEq)]
pub struct WorldImage {
    pixels: Vec<u8>,
    dims: ImageDimensions,
}

impl WorldImage {
    /// Wrap decoded RGBA8 bytes; the length must be exactly `width * height * 4`
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> GlobeResult<Self> {
        let dims = ImageDimensions::new(width, height)?;
        let expected = dims.pixel_count() * RGBA_CHANNELS;
        if pixels.len() != expected {
            return Err(GlobeError::invalid_argument(format!(
                "{}x{} RGBA image needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self { pixels, dims })
    }

    /// Build an image by evaluating `color_at(u, v)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut color_at: F) -> GlobeResult<Self>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let dims = ImageDimensions::new(width, height)?;
        let mut pixels = Vec::with_capacity(dims.pixel_count() * RGBA_CHANNELS);
        for v in 0..height {
            for u in 0..width {
                pixels.extend_from_slice(&color_at(u, v));
            }
        }
        Ok(Self { pixels, dims })
    }

    pub fn dimensions(&self) -> ImageDimensions {
        self.dims
    }

    pub fn bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn color_at(&self, pixel: PixelCoordinate) -> GlobeResult<PixelColor> {
        LandClassifier::classify(pixel, &self.pixels, self.dims.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn checker_image() -> WorldImage {
        // black (land) on even columns, white (ocean) on odd ones
        WorldImage::from_fn(8, 4, |u, _| if u % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] })
            .unwrap()
    }

    #[test]
    fn test_classify_reads_interleaved_channels() {
        let mut bytes = vec![0u8; 2 * 2 * 4];
        // pixel (1, 1) -> offset ((2 * 1) + 1) * 4 = 12
        bytes[12..16].copy_from_slice(&[255, 51, 0, 128]);

        let color = LandClassifier::classify(PixelCoordinate::new(1, 1), &bytes, 2).unwrap();
        assert_eq!(color.red, 1.0);
        assert_abs_diff_eq!(color.green, 0.2, epsilon = 1e-12);
        assert_eq!(color.blue, 0.0);
        assert_abs_diff_eq!(color.alpha, 128.0 / 255.0, epsilon = 1e-12);
    }

    #[test]
    fn test_classify_bounds() {
        let image = checker_image();
        let dims = image.dimensions();

        let past_right = LandClassifier::classify(PixelCoordinate::new(dims.width, 0), image.bytes(), dims.width);
        assert!(matches!(past_right, Err(GlobeError::OutOfBounds { u: 8, v: 0, .. })));

        let past_bottom = LandClassifier::classify(PixelCoordinate::new(0, dims.height), image.bytes(), dims.width);
        assert!(matches!(past_bottom, Err(GlobeError::OutOfBounds { .. })));

        let corner = LandClassifier::classify(
            PixelCoordinate::new(dims.width - 1, dims.height - 1),
            image.bytes(),
            dims.width,
        );
        assert!(corner.is_ok());
    }

    #[test]
    fn test_classify_ignores_trailing_partial_row() {
        // 2 full rows of a 2 wide image plus 3 stray bytes
        let bytes = vec![0u8; 2 * 2 * 4 + 3];
        assert!(LandClassifier::classify(PixelCoordinate::new(1, 1), &bytes, 2).is_ok());
        assert!(LandClassifier::classify(PixelCoordinate::new(0, 2), &bytes, 2).is_err());
    }

    #[test]
    fn test_zero_width_is_invalid() {
        let result = LandClassifier::classify(PixelCoordinate::new(0, 0), &[0, 0, 0, 0], 0);
        assert!(matches!(result, Err(GlobeError::InvalidArgument { .. })));
    }

    #[test]
    fn test_is_land_threshold() {
        let image = checker_image();
        let classifier = LandClassifier::default();
        assert!(classifier.is_land(PixelCoordinate::new(0, 0), image.bytes(), 8).unwrap());
        assert!(!classifier.is_land(PixelCoordinate::new(1, 0), image.bytes(), 8).unwrap());

        // 7/255 ≈ 0.027 is still land, 8/255 ≈ 0.031 is not
        assert!(PixelColor::from_rgba8([7, 7, 7, 255]).is_land(LAND_THRESHOLD));
        assert!(!PixelColor::from_rgba8([7, 8, 7, 255]).is_land(LAND_THRESHOLD));
    }

    #[test]
    fn test_world_image_validates_length() {
        assert!(WorldImage::from_rgba(vec![0; 15], 2, 2).is_err());
        assert!(WorldImage::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(LandClassifier::new(1.5).is_err());
    }
}
