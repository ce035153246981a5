//! FrameVault Stream Layer
//!
//! This crate moves snapshot bytes between a source and a sink through an
//! ordered chain of byte transforms, without ever holding a whole payload in
//! memory.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐
//! │   Archiver   │
//! └──────┬───────┘
//!        │ frame bytes (arbitrary chunks)
//!        ▼
//! ┌────────────────────┐
//! │ TransformPipeline  │
//! │  stage 1: lz4      │
//! │  stage 2: aes-gcm  │
//! │  stage 3: padding  │
//! └──────┬─────────────┘
//!        │ transformed chunks
//!        ▼
//! ┌──────────────┐
//! │  StreamSink  │  file / memory / network
//! └──────────────┘
//! ```
//!
//! Decoding reverses the flow: a [`StreamSource`] feeds chunks through the
//! mirrored stage order back into frame bytes.
//!
//! ## Main Components
//!
//! ### StreamSink / StreamSource
//! Minimal capability traits for chunked byte transfer ([`streamable`]).
//! A write either transfers the whole chunk or fails with
//! [`IoError::PartialTransfer`] - silent short writes are a reportable
//! defect, not a success. In-memory implementations stand in for real
//! storage in tests.
//!
//! ### TransformPipeline
//! Ordered, stateful byte-transform stages ([`transform`]). Chunking never
//! changes output: any split of a payload produces byte-identical results.
//! A stage failure poisons the pipeline; nothing is emitted afterward for
//! that stream.
//!
//! ### Stages
//! - [`stages::Lz4Compress`] / [`stages::Lz4Decompress`]: block compression
//! - [`stages::AesGcmEncrypt`] / [`stages::AesGcmDecrypt`]: chunked AEAD
//! - [`stages::BucketPad`] / [`stages::BucketUnpad`]: size-bucket padding
//!
//! ## Concurrency
//!
//! Everything here is synchronous and single-threaded per stream. One
//! pipeline instance serves exactly one logical stream; independent streams
//! use independent instances on separate workers.

pub mod error;
pub mod stages;
pub mod streamable;
pub mod transform;

pub use error::{IoError, StreamError, TransformError, TransformErrorKind};
pub use streamable::{
    read_to_end, FileSink, FileSource, MemorySink, MemorySource, StreamSink, StreamSource,
};
pub use transform::{PipelineSink, StreamTransform, TransformPipeline};
