//! The per-pixel value this codec operates on: a 3- or 4-tuple of u8 channels.

use smallvec::SmallVec;

/// R, G, B, and an optional A, in that order. Never spills to the heap:
/// a pixel is always 3 or 4 bytes.
pub type Pixel = SmallVec<[u8; 4]>;

pub fn pixel3(r: u8, g: u8, b: u8) -> Pixel {
    smallvec::smallvec![r, g, b]
}

pub fn pixel4(r: u8, g: u8, b: u8, a: u8) -> Pixel {
    smallvec::smallvec![r, g, b, a]
}

/// Per-channel wrapping subtraction, `(a - b) mod 256`, used by the predictive filters.
pub fn wrapping_sub(a: &Pixel, b: &Pixel) -> Pixel {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| x.wrapping_sub(y)).collect()
}

/// Per-channel wrapping addition, the inverse of `wrapping_sub`.
pub fn wrapping_add(a: &Pixel, b: &Pixel) -> Pixel {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| x.wrapping_add(y)).collect()
}

/// Treats the channel bytes as a big-endian integer; used to break ties when
/// truncating the frequency map to its 256 most frequent entries.
pub fn ordering_key(pixel: &Pixel) -> u32 {
    pixel.iter().fold(0_u32, |acc, &byte| (acc << 8) | byte as u32)
}
