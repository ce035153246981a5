//! Attachment Data Sources
//!
//! An [`AttachmentDataSource`] wraps the raw bytes of one attachment
//! together with the metadata an archiver needs (MIME type, caption,
//! rendering flag). It is created per attachment at ingestion time,
//! consumed once by the archiver, and discarded; the underlying store is
//! what persists.
//!
//! The load-bearing invariant: `data_length()` and `source_filename()` are
//! always derived from the wrapped source. There is no way to set them
//! independently, so the declared payload size can never diverge from the
//! actual one.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use framevault_core::{AttachmentInfo, RenderingFlag};

/// Where the attachment bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Memory {
        data: Bytes,
        filename: Option<String>,
    },
    File {
        path: PathBuf,
        length: u64,
    },
}

impl DataSource {
    /// A file-backed source. Length is read from the filesystem now, so it
    /// reflects the file as it exists at ingestion.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let length = std::fs::metadata(&path)?.len();
        Ok(Self::File { path, length })
    }

    pub fn len(&self) -> u64 {
        match self {
            DataSource::Memory { data, .. } => data.len() as u64,
            DataSource::File { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            DataSource::Memory { filename, .. } => filename.as_deref(),
            DataSource::File { path, .. } => path.file_name().and_then(|n| n.to_str()),
        }
    }
}

/// One attachment as handed to an archiver: metadata plus the wrapped raw
/// source. Fields are private so length and filename stay derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDataSource {
    mime_type: String,
    caption: Option<String>,
    rendering_flag: RenderingFlag,
    source: DataSource,
}

impl AttachmentDataSource {
    pub fn new(
        mime_type: impl Into<String>,
        caption: Option<String>,
        rendering_flag: RenderingFlag,
        source: DataSource,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            caption,
            rendering_flag,
            source,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn rendering_flag(&self) -> RenderingFlag {
        self.rendering_flag
    }

    /// Derived from the wrapped source, never settable.
    pub fn data_length(&self) -> u64 {
        self.source.len()
    }

    /// Derived from the wrapped source, never settable.
    pub fn source_filename(&self) -> Option<&str> {
        self.source.filename()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// The wire-level attachment metadata an archiver embeds in a frame.
    pub fn to_info(&self) -> AttachmentInfo {
        AttachmentInfo {
            mime_type: self.mime_type.clone(),
            plaintext_length: self.data_length(),
            caption: self.caption.clone(),
            rendering_flag: self.rendering_flag,
            filename: self.source_filename().map(str::to_string),
        }
    }
}
