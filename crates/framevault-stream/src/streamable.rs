//! Streamable I/O Abstraction
//!
//! Minimal capability traits for chunked byte transfer, decoupled from any
//! concrete transport. The pipeline and archivers only ever see these
//! traits, so files, sockets, and in-memory buffers are interchangeable and
//! tests never touch real storage.
//!
//! ## The Contract
//!
//! - [`StreamSink::write`] transfers the whole chunk or fails with
//!   [`IoError::PartialTransfer`]. A short write that goes unreported is a
//!   defect in the implementation, not a success.
//! - [`StreamSink::finish`] finalizes the sink; any write afterward fails
//!   with [`IoError::Closed`].
//! - [`StreamSource::read`] fills as much of the buffer as the stream has
//!   left. `Ok(0)` means end of stream. A mid-stream short read that cannot
//!   be completed is `PartialTransfer`.
//!
//! Concrete implementations may block (disk, network); callers treat that
//! as an opaque call with a deterministic success/failure outcome.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bytes::{Buf, Bytes, BytesMut};
use tracing::debug;

use crate::error::IoError;

/// Write side of a chunked byte stream.
pub trait StreamSink {
    /// Write the entire chunk, or fail.
    fn write(&mut self, chunk: &[u8]) -> Result<(), IoError>;

    /// Finalize the sink. Writes after this fail with `Closed`.
    fn finish(&mut self) -> Result<(), IoError>;
}

/// Read side of a chunked byte stream.
pub trait StreamSource {
    /// Fill `buf` with as many bytes as the stream has left.
    /// Returns the number of bytes read; `Ok(0)` means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError>;
}

/// In-memory sink. The test fake for real storage, and the buffer target
/// when a caller wants the transformed bytes in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: BytesMut,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the sink and take the accumulated bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl StreamSink for MemorySink {
    fn write(&mut self, chunk: &[u8]) -> Result<(), IoError> {
        if self.closed {
            return Err(IoError::Closed);
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), IoError> {
        self.closed = true;
        Ok(())
    }
}

/// In-memory source over a shared byte buffer.
#[derive(Debug)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }
}

impl StreamSource for MemorySource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.advance(n);
        Ok(n)
    }
}

/// File-backed sink using std::fs. Blocking by design; the core treats the
/// blocking call as opaque.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    closed: bool,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "opened file sink");
        Ok(Self {
            file,
            closed: false,
        })
    }
}

impl StreamSink for FileSink {
    fn write(&mut self, chunk: &[u8]) -> Result<(), IoError> {
        if self.closed {
            return Err(IoError::Closed);
        }
        // write_all retries short writes; WriteZero is the one case where
        // the kernel refused to take more bytes.
        self.file.write_all(chunk).map_err(|e| {
            if e.kind() == std::io::ErrorKind::WriteZero {
                IoError::PartialTransfer {
                    expected: chunk.len(),
                    actual: 0,
                }
            } else {
                IoError::Io(e)
            }
        })
    }

    fn finish(&mut self) -> Result<(), IoError> {
        if self.closed {
            return Err(IoError::Closed);
        }
        self.file.flush()?;
        self.closed = true;
        debug!("file sink finished");
        Ok(())
    }
}

/// File-backed source using std::fs.
#[derive(Debug)]
pub struct FileSource {
    file: File,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened file source");
        Ok(Self { file })
    }
}

impl StreamSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.file.read(&mut buf[filled..])?;
            if n == 0 {
                break; // end of stream
            }
            filled += n;
        }
        Ok(filled)
    }
}

/// Drain a source to the end through fixed-size chunks.
pub fn read_to_end(source: &mut dyn StreamSource) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 64 * 1024];
    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_accumulates_writes() {
        let mut sink = MemorySink::new();
        sink.write(b"hello ").unwrap();
        sink.write(b"world").unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.as_slice(), b"hello world");
    }

    #[test]
    fn test_memory_sink_rejects_write_after_finish() {
        let mut sink = MemorySink::new();
        sink.write(b"data").unwrap();
        sink.finish().unwrap();
        assert!(matches!(sink.write(b"more"), Err(IoError::Closed)));
    }

    #[test]
    fn test_memory_source_reads_in_chunks() {
        let mut source = MemorySource::new(Bytes::from_static(b"abcdefgh"));
        let mut buf = [0u8; 3];
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"def");
        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"gh");
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_to_end_drains_source() {
        let data: Vec<u8> = (0..200_000).map(|i| (i % 251) as u8).collect();
        let mut source = MemorySource::new(Bytes::from(data.clone()));
        assert_eq!(read_to_end(&mut source).unwrap(), data);
    }

    #[test]
    fn test_file_sink_and_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.bin");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write(b"first chunk|").unwrap();
        sink.write(b"second chunk").unwrap();
        sink.finish().unwrap();
        assert!(matches!(sink.write(b"late"), Err(IoError::Closed)));

        let mut source = FileSource::open(&path).unwrap();
        let bytes = read_to_end(&mut source).unwrap();
        assert_eq!(bytes, b"first chunk|second chunk");
    }
}
