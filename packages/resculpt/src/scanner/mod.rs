//! Structural-character scanner.
//!
//! Finds the ascending byte offsets of the seven JSON structural characters
//! (`" { } [ ] : ,`), the only bytes whose position can change the parse
//! state machine. The transformer walks those positions and copies the
//! content between them at memory speed, which is what lets it skim over
//! string bodies, numbers, and whitespace without inspecting them.
//!
//! On x86_64 with AVX2 the scan processes 32-byte blocks with byte-parallel
//! comparisons; everywhere else (and for sub-block remainders) a scalar loop
//! over a 256-entry lookup table is used.
//!
//! The scanner is context-free on purpose: a `"` inside a string literal is
//! reported like any other. String context is resolved by the transformer,
//! which tracks `in_string` across positions.

#[cfg(target_arch = "x86_64")]
mod avx2;

const fn structural_table() -> [bool; 256] {
    let mut table = [false; 256];
    table[b'"' as usize] = true;
    table[b'{' as usize] = true;
    table[b'}' as usize] = true;
    table[b'[' as usize] = true;
    table[b']' as usize] = true;
    table[b':' as usize] = true;
    table[b',' as usize] = true;
    table
}

/// Lookup table for the scalar path: `true` at the seven structural bytes.
const STRUCTURAL: [bool; 256] = structural_table();

/// Scan `data` for structural characters, writing their ascending offsets
/// into `positions`.
///
/// Returns the number of positions written, clamped by the capacity of
/// `positions`; exhaustion truncates silently and callers resume scanning
/// past the last reported position.
#[must_use]
pub fn scan(data: &[u8], positions: &mut [u32]) -> usize {
    if data.is_empty() || positions.is_empty() {
        return 0;
    }
    #[cfg(target_arch = "x86_64")]
    {
        if data.len() >= avx2::BLOCK && is_x86_feature_detected!("avx2") {
            // Safety: AVX2 support was just verified at runtime.
            return unsafe { avx2::scan(data, positions) };
        }
    }
    scan_scalar(data, 0, positions)
}

/// Scalar fallback: one table lookup per byte. `base` offsets the reported
/// positions, so the vector path can delegate its sub-block remainder.
pub(crate) fn scan_scalar(data: &[u8], base: u32, positions: &mut [u32]) -> usize {
    let mut count = 0usize;
    for (i, &byte) in data.iter().enumerate() {
        if STRUCTURAL[byte as usize] {
            if count == positions.len() {
                break;
            }
            positions[count] = base + i as u32;
            count += 1;
        }
    }
    count
}
