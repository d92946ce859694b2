//! Filter competition (picks the smallest payload) and the top-level encode
//! entry points, split between a file-path entry point and a bytes-in-memory
//! one.

use std::path::{Path, PathBuf};

use crate::block::Block;
use crate::error::{Error, Result};
use crate::filter::{self, Filter};
use crate::header::{self, Header};
use crate::huffman::{self, Tree};
use crate::io::BitWriter;
use crate::pixel::Pixel;
use crate::raster::{drop_alpha, Raster};
use crate::rle;

/// One filter's fully assembled payload: the serialized Huffman tree (if
/// any) followed by the block stream, plus the blocks and tree so the
/// winner can be re-emitted without recomputing anything.
struct Candidate {
    filter: Filter,
    tree: Tree,
    blocks: Vec<Block>,
    payload_bits: usize,
}

fn run_filter(pixels: &[Pixel], width: usize, height: usize, filter: Filter) -> Candidate {
    let filtered = filter::apply(filter, pixels, width, height);
    let (mut blocks, frequencies) = rle::encode(&filtered);
    let tree = huffman::build(&frequencies);
    substitute_huffman_blocks(&mut blocks, &tree);

    let payload_bits = measure_payload_bits(&tree, &blocks);

    Candidate { filter, tree, blocks, payload_bits }
}

/// Replaces any block whose plain value has a Huffman code with its
/// Huffman-coded equivalent. A block with no matching
/// code is left untouched.
fn substitute_huffman_blocks(blocks: &mut [Block], tree: &Tree) {
    if tree.is_empty() {
        return;
    }

    let codes = tree.codes();

    for block in blocks.iter_mut() {
        let substituted = match block {
            Block::Single(value) => codes.get(value).map(|code| Block::SingleHuffman(code.clone())),
            Block::Run(value, run) => codes.get(value).map(|code| Block::RunHuffman(code.clone(), *run)),
            Block::SingleHuffman(_) | Block::RunHuffman(_, _) => None,
        };

        if let Some(substituted) = substituted {
            *block = substituted;
        }
    }
}

fn measure_payload_bits(tree: &Tree, blocks: &[Block]) -> usize {
    let mut writer = BitWriter::new();
    tree.serialize_framed(&mut writer);

    for block in blocks {
        block.write_bits(&mut writer);
    }

    writer.len_bits()
}

/// Runs the three filters and keeps the smallest payload, ties broken
/// toward the lower filter id.
fn choose_best_filter(pixels: &[Pixel], width: usize, height: usize) -> Candidate {
    let mut candidates = Filter::ALL.iter()
        .map(|&filter| run_filter(pixels, width, height, filter));

    let mut best = candidates.next().expect("Filter::ALL is non-empty");
    for candidate in candidates {
        if candidate.payload_bits < best.payload_bits {
            best = candidate;
        }
    }

    best
}

/// Encodes a raster to the NYA bitstream, in memory.
pub fn encode_raster(raster: &Raster) -> Result<Vec<u8>> {
    let alpha_encoded = raster.has_transparency();

    let pixels: Vec<Pixel> = if alpha_encoded {
        raster.pixels().to_vec()
    } else {
        drop_alpha(raster.pixels())
    };

    let best = choose_best_filter(&pixels, raster.width, raster.height);

    let header = Header {
        width: u16::try_from(raster.width).map_err(|_| Error::dimensions("width does not fit in u16"))?,
        height: u16::try_from(raster.height).map_err(|_| Error::dimensions("height does not fit in u16"))?,
        alpha_encoded,
        filter: best.filter,
    };

    let mut writer = BitWriter::new();
    header.write(&mut writer);
    best.tree.serialize_framed(&mut writer);

    for block in &best.blocks {
        block.write_bits(&mut writer);
    }

    header::write_footer(&mut writer);
    Ok(writer.finish())
}

/// Encodes an image file to `<output_dir>/<basename>.nya`, loading the
/// source raster via the external `image` decoding collaborator.
pub fn encode_file(image_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let raster = Raster::load(image_path)?;
    let bytes = encode_raster(&raster)?;

    let stem = image_path.file_stem()
        .ok_or_else(|| Error::invalid("input path has no file name"))?;

    let output_path = output_dir.join(stem).with_extension("nya");
    std::fs::write(&output_path, bytes)?;

    Ok(output_path)
}
