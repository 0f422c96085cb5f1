//! Aspect-ratio classification.
//!
//! A width/height pair maps to one of three orientation classes. The ratio
//! is truncated to two decimal places and compared for exact equality with
//! the truncated reference ratios 9/16 and 16/9. There is no tolerance
//! band: ratios that differ from the references in the third decimal land
//! in `Other`.

use reelvault_core::models::AspectClass;

use crate::error::ProcessingError;
use crate::traits::Dimensions;

/// Truncate (not round) a ratio to two decimal places.
fn truncate_ratio(ratio: f64) -> f64 {
    (ratio * 100.0).trunc() / 100.0
}

/// Classify a width/height pair. Pure and deterministic; fails only on a
/// zero height.
pub fn classify_aspect(width: u32, height: u32) -> Result<AspectClass, ProcessingError> {
    if height == 0 {
        return Err(ProcessingError::InvalidGeometry { width, height });
    }

    let portrait_ratio = truncate_ratio(9.0 / 16.0);
    let landscape_ratio = truncate_ratio(16.0 / 9.0);
    let ratio = truncate_ratio(width as f64 / height as f64);

    if ratio == portrait_ratio {
        Ok(AspectClass::Portrait)
    } else if ratio == landscape_ratio {
        Ok(AspectClass::Landscape)
    } else {
        Ok(AspectClass::Other)
    }
}

/// Convenience over probed dimensions.
pub fn classify_dimensions(dims: Dimensions) -> Result<AspectClass, ProcessingError> {
    classify_aspect(dims.width, dims.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_by_nine_is_landscape() {
        assert_eq!(classify_aspect(1920, 1080).unwrap(), AspectClass::Landscape);
        assert_eq!(classify_aspect(1280, 720).unwrap(), AspectClass::Landscape);
        assert_eq!(classify_aspect(3840, 2160).unwrap(), AspectClass::Landscape);
    }

    #[test]
    fn nine_by_sixteen_is_portrait() {
        assert_eq!(classify_aspect(720, 1280).unwrap(), AspectClass::Portrait);
        // 1080/1920 = 0.5625 truncates to 0.56, same as the truncated 9/16
        assert_eq!(classify_aspect(1080, 1920).unwrap(), AspectClass::Portrait);
    }

    #[test]
    fn off_ratio_geometry_is_other() {
        assert_eq!(classify_aspect(800, 800).unwrap(), AspectClass::Other);
        // 4:3 truncates to 1.33, not an exact match for either reference
        assert_eq!(classify_aspect(640, 480).unwrap(), AspectClass::Other);
        // close to 9/16 but differs at the second decimal after truncation
        assert_eq!(classify_aspect(570, 1000).unwrap(), AspectClass::Other);
    }

    #[test]
    fn zero_height_is_invalid_geometry() {
        for width in [0, 1, 1920, u32::MAX] {
            assert!(matches!(
                classify_aspect(width, 0),
                Err(ProcessingError::InvalidGeometry { height: 0, .. })
            ));
        }
    }

    #[test]
    fn truncates_rather_than_rounds() {
        // 1.779 would round to 1.78 but truncates to 1.77, matching 16/9
        assert_eq!(classify_aspect(1779, 1000).unwrap(), AspectClass::Landscape);
        // 1.776 truncates to 1.77 as well
        assert_eq!(classify_aspect(1776, 1000).unwrap(), AspectClass::Landscape);
    }
}
