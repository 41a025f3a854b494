//! Engine entry points.
//!
//! [`Engine`] owns a compiled matcher and hands out pooled transformers.
//! Two ways in:
//!
//! - [`Engine::transform`] converts a whole payload, reading bounded chunks
//!   from any `Read` and writing rewritten bytes to any `Write`;
//! - [`Engine::acquire`] checks a transformer out of the pool for framed
//!   use, where the caller owns the chunking.
//!
//! Rule admission happens at construction: empty paths are dropped with a
//! warning, grammar errors fail construction (callers are expected to fall
//! back to identity passthrough). A rule-less engine streams input to output
//! unchanged.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::matcher::PathMatcher;
use crate::pool::{self, PooledTransformer};
use crate::rules::{PathRule, Rule};
use crate::stats::{EngineStats, StatsSnapshot};

/// A compiled rule set plus the machinery to apply it to byte streams.
///
/// Building is the expensive step (path parsing, trie construction, failure
/// links); a built engine is immutable and cheap to share behind an `Arc`
/// across any number of concurrent transformations.
pub struct Engine {
    matcher: Arc<PathMatcher>,
    config: EngineConfig,
    stats: Arc<EngineStats>,
}

impl Engine {
    /// Build an engine from path rules with default configuration.
    ///
    /// # Errors
    ///
    /// [`EngineError::Path`] when a rule path fails the grammar.
    pub fn new(rules: Vec<PathRule>) -> Result<Self> {
        Self::with_config(rules, EngineConfig::default())
    }

    /// Build an engine with explicit buffer/chunk configuration.
    ///
    /// # Errors
    ///
    /// [`EngineError::Path`] when a rule path fails the grammar.
    pub fn with_config(rules: Vec<PathRule>, config: EngineConfig) -> Result<Self> {
        let admitted: Vec<PathRule> = rules
            .into_iter()
            .filter(|rule| {
                if rule.path.is_empty() {
                    tracing::warn!("dropping rule with empty path");
                    return false;
                }
                true
            })
            .collect();
        let matcher = PathMatcher::build(admitted)?;
        tracing::debug!(rules = matcher.rule_count(), "engine built");
        Ok(Self {
            matcher: Arc::new(matcher),
            config: config.sanitized(),
            stats: Arc::new(EngineStats::new()),
        })
    }

    /// Build an engine from legacy `{key, action, value}` rules, each
    /// treated as a single-segment path. Invalid records (empty key) are
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`EngineError::Path`] when a surviving key fails the grammar.
    pub fn from_legacy(rules: Vec<Rule>) -> Result<Self> {
        let path_rules = rules
            .into_iter()
            .filter(Rule::is_valid)
            .map(PathRule::from)
            .collect();
        Self::new(path_rules)
    }

    /// Whether any rule was admitted. Rule-less engines copy input through
    /// unchanged.
    #[must_use]
    pub fn has_rules(&self) -> bool {
        self.matcher.has_rules()
    }

    /// The compiled matcher, shareable across transformations.
    #[must_use]
    pub fn matcher(&self) -> &Arc<PathMatcher> {
        &self.matcher
    }

    /// Counters accumulated over this engine's lifetime.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Check a transformer out of the pool for framed use. The caller feeds
    /// chunks of exactly one payload and then calls `finish`; dropping the
    /// checkout returns the instance to the pool.
    #[must_use]
    pub fn acquire(&self) -> PooledTransformer {
        pool::acquire(Arc::clone(&self.matcher), &self.config)
    }

    /// Rewrite a whole payload: read `input` in bounded chunks (default
    /// 512 KiB), stream rewritten bytes into `output`.
    ///
    /// Output already written is not rolled back on failure; streaming
    /// callers treat a failed transformation as a lost response.
    ///
    /// # Errors
    ///
    /// [`EngineError::Read`] when the source fails, [`EngineError::Write`]
    /// when the sink fails.
    pub fn transform<R: Read, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        if !self.has_rules() {
            return self.copy_through(&mut input, &mut output);
        }

        let mut transformer = self.acquire();
        let mut buf = vec![0u8; self.config.chunk_size];
        let mut bytes_in = 0u64;
        let mut bytes_out = 0u64;
        loop {
            let read = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(EngineError::Read(err)),
            };
            let written = transformer.feed(&buf[..read], &mut output).map_err(|err| {
                self.stats.record_write_error();
                err
            })?;
            self.stats.record_chunk(read, written);
            bytes_in += read as u64;
            bytes_out += written as u64;
        }
        let tail = transformer.finish(&mut output).map_err(|err| {
            self.stats.record_write_error();
            err
        })?;
        self.stats.record_tail(tail);
        self.stats.record_transform();
        bytes_out += tail as u64;
        tracing::debug!(
            rules = self.matcher.rule_count(),
            bytes_in,
            bytes_out,
            "transform complete"
        );
        Ok(())
    }

    /// Identity fast path for rule-less engines.
    fn copy_through<R: Read, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        let mut buf = vec![0u8; self.config.chunk_size];
        loop {
            let read = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(EngineError::Read(err)),
            };
            output.write_all(&buf[..read]).map_err(|err| {
                self.stats.record_write_error();
                EngineError::Write(err)
            })?;
            self.stats.record_chunk(read, read);
        }
        self.stats.record_transform();
        Ok(())
    }
}
