//! # resculpt
//!
//! Streaming JSON rewrite engine for in-flight HTTP bodies. Applies
//! declarative path rules (`remove`, `set`, `add`) to JSON byte streams
//! without ever materialising the parsed document, so multi-megabyte
//! payloads (base64 image responses, long completions) rewrite at
//! memory-copy speed.
//!
//! ## Design
//!
//! - **Structural scanning**: a vectorised scanner locates the seven JSON
//!   structural bytes (`" { } [ ] : ,`); the transformer only inspects those
//!   positions and copies everything in between untouched.
//! - **Compiled rule matching**: rule paths compile into a segment trie with
//!   Aho-Corasick failure links, so one matcher step per key or array index
//!   reports every applicable rule.
//! - **In-stream rewriting**: removed values are skipped, replaced values are
//!   substituted after the skip, added fields are injected just before the
//!   closing brace of their target object. Chunk boundaries are arbitrary.
//! - **Pooled state**: transformer instances and their buffers are reused
//!   through a process-wide lock-free pool.
//!
//! The engine is not a validator: malformed input passes through on a best
//! effort basis and may produce malformed output.
//!
//! ## Usage
//!
//! ```no_run
//! use resculpt::{Engine, PathRule};
//!
//! let rules = vec![PathRule::remove("candidates.[*].content.parts.[*].thoughtSignature")];
//! let engine = Engine::new(rules)?;
//!
//! let input = std::io::Cursor::new(br#"{"candidates":[]}"#.to_vec());
//! let mut output = Vec::new();
//! engine.transform(input, &mut output)?;
//! # Ok::<(), resculpt::EngineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod engine;
mod error;
mod matcher;
mod pool;
mod rules;
mod stats;
mod transform;

pub mod gate;
pub mod path;
#[allow(unsafe_code)]
pub mod scanner;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, PathError, Result};
pub use matcher::PathMatcher;
pub use pool::PooledTransformer;
pub use rules::{Action, PathRule, Rule};
pub use stats::StatsSnapshot;
