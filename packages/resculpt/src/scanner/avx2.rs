//! AVX2 kernel for the structural scan.
//!
//! Each 32-byte block is compared against all seven structural bytes with
//! byte-broadcast equality, the seven result masks are folded with OR, and
//! the combined mask collapses to 32 bits via `movemask`. Set bits convert
//! to offsets by repeatedly taking the lowest set bit and clearing it.

#![allow(unsafe_code)]

use core::arch::x86_64::{
    __m256i, _mm256_cmpeq_epi8, _mm256_loadu_si256, _mm256_movemask_epi8, _mm256_or_si256,
    _mm256_set1_epi8,
};

/// Bytes handled per vector iteration.
pub(crate) const BLOCK: usize = 32;

/// Vectorised structural scan. Delegates the sub-block tail to the scalar
/// loop so the two paths report identical positions.
///
/// # Safety
///
/// The caller must have verified AVX2 support at runtime.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn scan(data: &[u8], positions: &mut [u32]) -> usize {
    let cap = positions.len();
    let mut count = 0usize;

    let quote = _mm256_set1_epi8(b'"' as i8);
    let obj_open = _mm256_set1_epi8(b'{' as i8);
    let obj_close = _mm256_set1_epi8(b'}' as i8);
    let arr_open = _mm256_set1_epi8(b'[' as i8);
    let arr_close = _mm256_set1_epi8(b']' as i8);
    let colon = _mm256_set1_epi8(b':' as i8);
    let comma = _mm256_set1_epi8(b',' as i8);

    let mut i = 0usize;
    while i + BLOCK <= data.len() {
        let block = _mm256_loadu_si256(data.as_ptr().add(i).cast::<__m256i>());

        let mut hits = _mm256_cmpeq_epi8(block, quote);
        hits = _mm256_or_si256(hits, _mm256_cmpeq_epi8(block, obj_open));
        hits = _mm256_or_si256(hits, _mm256_cmpeq_epi8(block, obj_close));
        hits = _mm256_or_si256(hits, _mm256_cmpeq_epi8(block, arr_open));
        hits = _mm256_or_si256(hits, _mm256_cmpeq_epi8(block, arr_close));
        hits = _mm256_or_si256(hits, _mm256_cmpeq_epi8(block, colon));
        hits = _mm256_or_si256(hits, _mm256_cmpeq_epi8(block, comma));

        let mut mask = _mm256_movemask_epi8(hits) as u32;
        while mask != 0 {
            if count == cap {
                return count;
            }
            let bit = mask.trailing_zeros() as usize;
            positions[count] = (i + bit) as u32;
            count += 1;
            mask &= mask - 1;
        }
        i += BLOCK;
    }

    if i < data.len() && count < cap {
        count += super::scan_scalar(&data[i..], i as u32, &mut positions[count..]);
    }
    count
}
