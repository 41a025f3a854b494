//! The stateful byte-level rewrite engine.
//!
//! [`Transformer`] consumes input in arbitrary chunks, drives the structural
//! scanner, maintains the path stack and per-key/per-value sub-state, and
//! emits the rewritten stream incrementally. Everything here is single-owner
//! state: one transformer serves one transformation at a time and is
//! recycled through the pool between payloads.

pub(crate) mod encode;
mod transformer;
mod unescape;

pub(crate) use transformer::Transformer;
