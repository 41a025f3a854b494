//! Engine configuration.
//!
//! Sizing knobs for the transformer's pooled buffers and the whole-payload
//! read loop. Defaults are tuned for proxied LLM responses: large enough to
//! stream a multi-megabyte body in a handful of chunks, small enough that a
//! pooled transformer is cheap to keep around.

/// Default read-chunk size for [`crate::Engine::transform`] (512 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 512 * 1024;

/// Default capacity of the structural-position buffer. Sized for roughly one
/// structural character per four payload bytes at the default chunk size;
/// denser chunks are handled by rescanning, not by reallocation.
pub const DEFAULT_POSITIONS_CAPACITY: usize = 128 * 1024;

/// Default pre-allocated nesting depth of the path stack.
pub const DEFAULT_PATH_STACK_CAPACITY: usize = 32;

/// Default capacity of the key accumulation buffer.
pub const DEFAULT_KEY_BUFFER_CAPACITY: usize = 256;

/// Default capacity of the per-chunk output buffer.
pub const DEFAULT_OUTPUT_CAPACITY: usize = 4096;

/// Buffer and chunking configuration for an [`crate::Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Read-chunk size used by the whole-payload API.
    pub chunk_size: usize,
    /// Capacity of the structural-position buffer, in positions.
    pub positions_capacity: usize,
    /// Initial path-stack capacity, in frames.
    pub path_stack_capacity: usize,
    /// Initial key-buffer capacity, in bytes.
    pub key_buffer_capacity: usize,
    /// Initial output-buffer capacity, in bytes.
    pub output_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            positions_capacity: DEFAULT_POSITIONS_CAPACITY,
            path_stack_capacity: DEFAULT_PATH_STACK_CAPACITY,
            key_buffer_capacity: DEFAULT_KEY_BUFFER_CAPACITY,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default sizing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the read-chunk size used by the whole-payload API.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Clamp every capacity to a workable minimum. The scanner needs at
    /// least one position slot to make progress.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.chunk_size = self.chunk_size.max(1);
        self.positions_capacity = self.positions_capacity.max(64);
        self.path_stack_capacity = self.path_stack_capacity.max(4);
        self.key_buffer_capacity = self.key_buffer_capacity.max(16);
        self.output_capacity = self.output_capacity.max(64);
        self
    }
}
