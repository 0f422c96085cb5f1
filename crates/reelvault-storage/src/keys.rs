//! Shared key generation for storage backends.
//!
//! Key format: `{classification}/{uuid}.{ext}` for video,
//! `{uuid}.{ext}` for thumbnails. The random component makes collisions
//! negligible; a key is allocated fresh for every upload and never reused.

use reelvault_core::models::AspectClass;
use uuid::Uuid;

/// File extension derived from a MIME type's subtype
/// (`video/mp4` -> `mp4`).
fn extension_for(content_type: &str) -> &str {
    content_type.split('/').nth(1).unwrap_or("bin")
}

/// Generate a storage key for a classified video upload.
pub fn video_key(classification: AspectClass, content_type: &str) -> String {
    format!(
        "{}/{}.{}",
        classification,
        Uuid::new_v4(),
        extension_for(content_type)
    )
}

/// Generate a storage key for a thumbnail upload.
pub fn thumbnail_key(content_type: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension_for(content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_keys_are_partitioned_by_classification() {
        let key = video_key(AspectClass::Landscape, "video/mp4");
        let (prefix, rest) = key.split_once('/').unwrap();
        assert_eq!(prefix, "landscape");
        assert!(rest.ends_with(".mp4"));

        let portrait = video_key(AspectClass::Portrait, "video/mp4");
        assert!(portrait.starts_with("portrait/"));
    }

    #[test]
    fn thumbnail_keys_have_no_partition_prefix() {
        let key = thumbnail_key("image/png");
        assert!(!key.contains('/'));
        assert!(key.ends_with(".png"));

        assert!(thumbnail_key("image/jpg").ends_with(".jpg"));
    }

    #[test]
    fn every_key_is_fresh() {
        let a = video_key(AspectClass::Other, "video/mp4");
        let b = video_key(AspectClass::Other, "video/mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn key_random_component_parses_as_uuid() {
        let key = thumbnail_key("image/png");
        let stem = key.strip_suffix(".png").unwrap();
        assert!(Uuid::parse_str(stem).is_ok());
    }
}
