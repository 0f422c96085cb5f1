use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of media an asset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

/// Coarse aspect-ratio bucket assigned at ingestion time.
///
/// Derived once from the probed width/height of the first video stream and
/// persisted with the asset; never recomputed on read. The lowercase form is
/// also the partition prefix of video storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Portrait,
    Landscape,
    Other,
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AspectClass::Portrait => write!(f, "portrait"),
            AspectClass::Landscape => write!(f, "landscape"),
            AspectClass::Other => write!(f, "other"),
        }
    }
}

/// One uploadable media slot of a video record.
///
/// Created when the parent video record is created; mutated only by the
/// ingestion service after a fully successful store operation. `stored_ref`
/// holds the encoded object reference and is replaced, never appended, on
/// re-upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: MediaKind,
    /// Encoded (bucket, key) pair; None until the first successful upload.
    pub stored_ref: Option<String>,
    /// None until the first successful probe; images never get one.
    pub classification: Option<AspectClass>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaAsset {
    pub fn new(id: Uuid, owner_id: Uuid, kind: MediaKind) -> Self {
        let now = Utc::now();
        MediaAsset {
            id,
            owner_id,
            kind,
            stored_ref: None,
            classification: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-facing view of an asset. The URL is presigned per request and
/// never persisted, so this type is built on the read path rather than
/// serialized from the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAssetResponse {
    pub id: Uuid,
    pub kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<AspectClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl MediaAssetResponse {
    /// Pair a record with the signed URL derived from its stored reference
    /// (None when nothing has been uploaded yet).
    pub fn from_asset(asset: &MediaAsset, url: Option<String>) -> Self {
        MediaAssetResponse {
            id: asset.id,
            kind: asset.kind,
            classification: asset.classification,
            url,
            updated_at: asset.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_class_display_matches_serde_form() {
        for (class, expected) in [
            (AspectClass::Portrait, "portrait"),
            (AspectClass::Landscape, "landscape"),
            (AspectClass::Other, "other"),
        ] {
            assert_eq!(class.to_string(), expected);
            assert_eq!(
                serde_json::to_string(&class).unwrap(),
                format!("\"{}\"", expected)
            );
        }
    }

    #[test]
    fn new_asset_has_no_reference_or_classification() {
        let asset = MediaAsset::new(Uuid::new_v4(), Uuid::new_v4(), MediaKind::Video);
        assert!(asset.stored_ref.is_none());
        assert!(asset.classification.is_none());
    }
}
