//! Stream Transform Pipeline
//!
//! An ordered chain of byte-transform stages applied while data streams
//! between a source and a sink. Each stage owns private state that persists
//! across chunk boundaries (partial compression blocks, cipher counters),
//! so callers can feed arbitrarily sized chunks and the output is always
//! byte-identical to a single-shot whole-buffer transform.
//!
//! ## Ordering
//!
//! Stages run in the order given for encode. Decode uses the exact mirror:
//! if encode is `[compress, encrypt]`, decode is `[decrypt, decompress]`.
//!
//! ## Finalization
//!
//! [`TransformPipeline::finalize`] flushes each stage's buffered state in
//! order: stage `i`'s trailing bytes are pushed through stages `i+1..`
//! before those stages are finalized themselves.
//!
//! ## Failure
//!
//! A stage that detects corrupt input fails the whole pipeline with a typed
//! error naming the stage. The pipeline is poisoned afterward: no further
//! output is emitted for that stream, and every later call reports the
//! original stage.
//!
//! ## Concurrency
//!
//! One pipeline instance processes exactly one logical stream. Independent
//! streams use independent instances; stages are never shared.

use std::borrow::Cow;

use tracing::debug;

use crate::error::{StreamError, TransformError};
use crate::streamable::StreamSink;

/// One unit of byte transformation, composed into a pipeline.
pub trait StreamTransform {
    /// Stage name used in error reporting and logs.
    fn name(&self) -> &'static str;

    /// Transform one chunk. May buffer internally and emit nothing.
    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError>;

    /// Flush buffered state and emit any trailing bytes. Called exactly
    /// once, after the last chunk.
    fn finalize(&mut self) -> Result<Vec<u8>, TransformError>;
}

/// Ordered stage chain. See the module docs for the contract.
pub struct TransformPipeline {
    stages: Vec<Box<dyn StreamTransform + Send>>,
    failed_stage: Option<&'static str>,
    finalized: bool,
}

impl TransformPipeline {
    pub fn new(stages: Vec<Box<dyn StreamTransform + Send>>) -> Self {
        Self {
            stages,
            failed_stage: None,
            finalized: false,
        }
    }

    /// A pipeline with no stages: bytes pass through untouched.
    pub fn identity() -> Self {
        Self::new(Vec::new())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn check_usable(&self) -> Result<(), TransformError> {
        if let Some(stage) = self.failed_stage {
            return Err(TransformError::poisoned(stage));
        }
        if self.finalized {
            return Err(TransformError::poisoned("pipeline"));
        }
        Ok(())
    }

    /// Run one chunk through every stage in order.
    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.check_usable()?;

        let mut data = Cow::Borrowed(chunk);
        for stage in &mut self.stages {
            match stage.process(&data) {
                Ok(out) => data = Cow::Owned(out),
                Err(err) => {
                    self.failed_stage = Some(err.stage);
                    return Err(err);
                }
            }
        }
        Ok(data.into_owned())
    }

    /// Flush every stage. Stage `i`'s trailing bytes flow through stages
    /// `i+1..` before those are flushed in turn.
    pub fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        self.check_usable()?;

        let mut out = Vec::new();
        for i in 0..self.stages.len() {
            let mut trailing = match self.stages[i].finalize() {
                Ok(bytes) => bytes,
                Err(err) => {
                    self.failed_stage = Some(err.stage);
                    return Err(err);
                }
            };
            for j in (i + 1)..self.stages.len() {
                trailing = match self.stages[j].process(&trailing) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        self.failed_stage = Some(err.stage);
                        return Err(err);
                    }
                };
            }
            out.extend_from_slice(&trailing);
        }
        self.finalized = true;
        Ok(out)
    }
}

/// Adapter that drives a pipeline into a [`StreamSink`], so callers write
/// plaintext chunks and the sink receives transformed bytes.
pub struct PipelineSink<S: StreamSink> {
    pipeline: TransformPipeline,
    sink: S,
    bytes_in: u64,
    bytes_out: u64,
}

impl<S: StreamSink> PipelineSink<S> {
    pub fn new(pipeline: TransformPipeline, sink: S) -> Self {
        Self {
            pipeline,
            sink,
            bytes_in: 0,
            bytes_out: 0,
        }
    }

    pub fn write(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        let out = self.pipeline.process(chunk)?;
        self.bytes_in += chunk.len() as u64;
        if !out.is_empty() {
            self.sink.write(&out)?;
            self.bytes_out += out.len() as u64;
        }
        Ok(())
    }

    /// Flush the pipeline, finish the sink, and hand the sink back.
    pub fn finish(mut self) -> Result<S, StreamError> {
        let trailing = self.pipeline.finalize()?;
        if !trailing.is_empty() {
            self.sink.write(&trailing)?;
            self.bytes_out += trailing.len() as u64;
        }
        self.sink.finish()?;
        debug!(
            bytes_in = self.bytes_in,
            bytes_out = self.bytes_out,
            "pipeline sink finished"
        );
        Ok(self.sink)
    }

    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }
}

/// Run a whole payload through a pipeline in one call. Test helper and
/// convenience for callers that already hold the payload in memory.
pub fn transform_all(
    pipeline: &mut TransformPipeline,
    payload: &[u8],
) -> Result<Vec<u8>, TransformError> {
    let mut out = pipeline.process(payload)?;
    out.extend(pipeline.finalize()?);
    Ok(out)
}
