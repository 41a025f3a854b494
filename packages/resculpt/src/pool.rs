//! Process-wide transformer pool.
//!
//! A transformation needs a position buffer, a path stack, a key buffer and
//! an output buffer; pooling the whole transformer keeps those allocations
//! out of the per-request path. The free list is a lock-free bounded queue:
//! `acquire` pops or builds, `release` clears the matcher reference and
//! pushes back, and overflow simply drops the instance.

use std::io::Write;
use std::sync::Arc;

use crossbeam_queue::ArrayQueue;
use once_cell::sync::Lazy;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::matcher::PathMatcher;
use crate::transform::Transformer;

/// Upper bound on idle pooled transformers.
const POOL_CAPACITY: usize = 64;

static POOL: Lazy<ArrayQueue<Box<Transformer>>> = Lazy::new(|| ArrayQueue::new(POOL_CAPACITY));

pub(crate) fn acquire(matcher: Arc<PathMatcher>, config: &EngineConfig) -> PooledTransformer {
    let mut transformer = POOL
        .pop()
        .unwrap_or_else(|| Box::new(Transformer::with_config(config)));
    transformer.attach(matcher);
    PooledTransformer {
        inner: Some(transformer),
    }
}

/// A transformer checked out of the pool, driving one transformation.
///
/// Feed consecutive chunks of a single payload, then call
/// [`finish`](Self::finish); dropping the handle returns the instance (and
/// its buffers) to the pool. Chunks from different payloads must never be
/// mixed on one checkout.
pub struct PooledTransformer {
    inner: Option<Box<Transformer>>,
}

impl PooledTransformer {
    /// Process the next chunk of the payload, writing rewritten bytes to
    /// `writer`. Returns the number of bytes written for this chunk.
    ///
    /// # Errors
    ///
    /// [`crate::EngineError::Write`] when the sink fails; the transformation
    /// is then lost and the checkout should be dropped.
    pub fn feed<W: Write>(&mut self, chunk: &[u8], writer: &mut W) -> Result<usize> {
        match self.inner.as_mut() {
            Some(transformer) => transformer.feed(chunk, writer),
            None => Ok(0),
        }
    }

    /// Signal end of payload: resolves any in-flight substitution and
    /// flushes remaining output.
    ///
    /// # Errors
    ///
    /// [`crate::EngineError::Write`] when the sink fails.
    pub fn finish<W: Write>(&mut self, writer: &mut W) -> Result<usize> {
        match self.inner.as_mut() {
            Some(transformer) => transformer.finish(writer),
            None => Ok(0),
        }
    }
}

impl Drop for PooledTransformer {
    fn drop(&mut self) {
        if let Some(mut transformer) = self.inner.take() {
            transformer.detach();
            // pool full: let the instance drop
            let _ = POOL.push(transformer);
        }
    }
}
