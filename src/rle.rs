//! Greedy maximal-run-length pass over a flat, filtered pixel sequence.

use std::collections::HashMap;

use crate::block::{Block, MAX_RUN};
use crate::pixel::Pixel;

pub type FrequencyMap = HashMap<Pixel, u32>;

/// Scans `pixels` left to right, emitting a `Block::Single` for any pixel
/// that doesn't repeat and a `Block::Run` for a maximal run (bounded at
/// `MAX_RUN`), and a frequency map counting one occurrence per emitted
/// block (not per pixel).
pub fn encode(pixels: &[Pixel]) -> (Vec<Block>, FrequencyMap) {
    let mut blocks = Vec::new();
    let mut frequencies = FrequencyMap::new();

    let mut i = 0;
    while i < pixels.len() {
        let value = &pixels[i];

        let mut run_end = i + 1;
        while run_end < pixels.len() && run_end - i < MAX_RUN && pixels[run_end] == *value {
            run_end += 1;
        }

        let run = run_end - i;

        *frequencies.entry(value.clone()).or_insert(0) += 1;

        if run == 1 {
            blocks.push(Block::Single(value.clone()));
        } else {
            blocks.push(Block::Run(value.clone(), run));
        }

        i = run_end;
    }

    (blocks, frequencies)
}

/// Expands a block stream back into the flat pixel sequence it was built
/// from, ignoring any Huffman substitution (the caller resolves codes back
/// to plain values before calling this, see `decode.rs`).
pub fn decode(blocks: &[(Pixel, usize)]) -> Vec<Pixel> {
    let mut pixels = Vec::new();

    for (value, run) in blocks {
        for _ in 0 .. *run {
            pixels.push(value.clone());
        }
    }

    pixels
}
