//! Resource Metadata Resolution
//!
//! The message store has two attachment storage generations in the wild:
//! the legacy one, identified by a resolvable location on local storage,
//! and the versioned one, identified by an opaque reference that a
//! resolution service turns into concrete metadata.
//!
//! Resolution maps a [`ResourceStream`] plus domain metadata onto the
//! typed [`StickerMetadata`] variant downstream writers consume. The two
//! terminal input states map to possibly-different outputs:
//!
//! - `Legacy` with no resolvable location yields **no metadata** - the
//!   media is simply gone, which is not an error and not a default.
//! - `Legacy` with a location yields the legacy variant.
//! - `Versioned` always delegates to the encryption-aware constructor; a
//!   reference the service cannot resolve propagates as
//!   [`ResolutionError`].
//!
//! Resolution is pure and read-only. It never mutates the resource handle
//! or backing storage.

use std::path::PathBuf;

use framevault_core::StickerPackId;

use crate::error::ResolutionError;

/// Opaque handle to versioned attachment content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentRef(pub u64);

/// What the resolution service returns for a versioned reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub encryption_key: [u8; 32],
    pub plaintext_length: u64,
    pub mime_type: String,
}

/// External collaborator: resolves opaque references to concrete metadata.
/// Failures propagate as this crate's own.
pub trait ResourceResolver {
    fn resolve(&self, reference: AttachmentRef) -> Result<ResolvedAttachment, ResolutionError>;
}

/// An attachment handle as the owning message subsystem stores it.
/// Read-only to the backup core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStream {
    Legacy { media_url: Option<PathBuf> },
    Versioned { reference: AttachmentRef },
}

/// Domain metadata accompanying a sticker resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerInfo {
    pub pack_id: StickerPackId,
    pub sticker_index: u32,
    pub emoji: Option<String>,
}

/// Sticker metadata, ready for rendering or re-export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StickerMetadata {
    Legacy(LegacyStickerMetadata),
    Encrypted(EncryptedStickerMetadata),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyStickerMetadata {
    pub media_url: PathBuf,
    pub mime_type: String,
    pub caption: Option<String>,
    pub info: StickerInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedStickerMetadata {
    pub encryption_key: [u8; 32],
    pub plaintext_length: u64,
    pub mime_type: String,
    pub caption: Option<String>,
    pub info: StickerInfo,
}

/// Resolve a sticker resource to its typed metadata variant.
pub fn resolve_sticker_metadata(
    stream: &ResourceStream,
    info: &StickerInfo,
    mime_type: &str,
    caption: Option<&str>,
    resolver: &dyn ResourceResolver,
) -> Result<Option<StickerMetadata>, ResolutionError> {
    match stream {
        ResourceStream::Legacy { media_url: None } => Ok(None),
        ResourceStream::Legacy {
            media_url: Some(url),
        } => Ok(Some(StickerMetadata::Legacy(LegacyStickerMetadata {
            media_url: url.clone(),
            mime_type: mime_type.to_string(),
            caption: caption.map(str::to_string),
            info: info.clone(),
        }))),
        ResourceStream::Versioned { reference } => {
            let resolved = resolver.resolve(*reference)?;
            Ok(Some(StickerMetadata::Encrypted(EncryptedStickerMetadata {
                encryption_key: resolved.encryption_key,
                plaintext_length: resolved.plaintext_length,
                mime_type: resolved.mime_type,
                caption: caption.map(str::to_string),
                info: info.clone(),
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory resolver fake: a map behind the service interface.
    #[derive(Default)]
    struct MapResolver {
        entries: HashMap<AttachmentRef, ResolvedAttachment>,
    }

    impl ResourceResolver for MapResolver {
        fn resolve(
            &self,
            reference: AttachmentRef,
        ) -> Result<ResolvedAttachment, ResolutionError> {
            self.entries
                .get(&reference)
                .cloned()
                .ok_or(ResolutionError::UnresolvableReference(reference))
        }
    }

    fn sample_info() -> StickerInfo {
        StickerInfo {
            pack_id: StickerPackId([3u8; 16]),
            sticker_index: 5,
            emoji: Some("🦀".to_string()),
        }
    }

    #[test]
    fn test_legacy_without_url_yields_no_metadata() {
        let stream = ResourceStream::Legacy { media_url: None };
        let result = resolve_sticker_metadata(
            &stream,
            &sample_info(),
            "image/webp",
            None,
            &MapResolver::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_legacy_with_url_yields_legacy_variant() {
        let stream = ResourceStream::Legacy {
            media_url: Some(PathBuf::from("/media/stickers/5.webp")),
        };
        let result = resolve_sticker_metadata(
            &stream,
            &sample_info(),
            "image/webp",
            Some("caption"),
            &MapResolver::default(),
        )
        .unwrap()
        .unwrap();

        match result {
            StickerMetadata::Legacy(meta) => {
                assert_eq!(meta.media_url, PathBuf::from("/media/stickers/5.webp"));
                assert_eq!(meta.caption.as_deref(), Some("caption"));
            }
            StickerMetadata::Encrypted(_) => panic!("legacy input must not take the encrypted path"),
        }
    }

    #[test]
    fn test_versioned_always_takes_encrypted_path() {
        let mut resolver = MapResolver::default();
        resolver.entries.insert(
            AttachmentRef(77),
            ResolvedAttachment {
                encryption_key: [0xAA; 32],
                plaintext_length: 2048,
                mime_type: "image/webp".to_string(),
            },
        );

        let stream = ResourceStream::Versioned {
            reference: AttachmentRef(77),
        };
        let result =
            resolve_sticker_metadata(&stream, &sample_info(), "image/webp", None, &resolver)
                .unwrap()
                .unwrap();

        match result {
            StickerMetadata::Encrypted(meta) => {
                assert_eq!(meta.encryption_key, [0xAA; 32]);
                assert_eq!(meta.plaintext_length, 2048);
            }
            StickerMetadata::Legacy(_) => panic!("versioned input must not take the legacy path"),
        }
    }

    #[test]
    fn test_unresolvable_reference_propagates() {
        let stream = ResourceStream::Versioned {
            reference: AttachmentRef(404),
        };
        let err = resolve_sticker_metadata(
            &stream,
            &sample_info(),
            "image/webp",
            None,
            &MapResolver::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UnresolvableReference(AttachmentRef(404))
        ));
    }

    #[test]
    fn test_resolution_does_not_mutate_the_stream() {
        let stream = ResourceStream::Legacy {
            media_url: Some(PathBuf::from("/media/a.webp")),
        };
        let before = stream.clone();
        let _ = resolve_sticker_metadata(
            &stream,
            &sample_info(),
            "image/webp",
            None,
            &MapResolver::default(),
        );
        assert_eq!(stream, before);
    }
}
