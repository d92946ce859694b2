//! Inverts `encode.rs`: header parse, tree rebuild, block expansion, filter
//! inversion, raster reconstruction. Run in the opposite order of encoding.

use std::path::Path;

use crate::block;
use crate::error::{Error, Result};
use crate::filter;
use crate::header::{Header, SENTINEL};
use crate::huffman::Tree;
use crate::io::BitReader;
use crate::pixel::Pixel;
use crate::raster::Raster;
use crate::rle;

/// Decodes a complete NYA bitstream back into a raster.
pub fn decode_bytes(bytes: &[u8]) -> Result<Raster> {
    let mut reader = BitReader::new(bytes);

    let header = Header::read(&mut reader)?;
    let channels = header.channels();
    let pixel_count = header.width as usize * header.height as usize;

    let tree = Tree::deserialize_framed(&mut reader, channels)?;

    let mut pairs: Vec<(Pixel, usize)> = Vec::new();
    let mut decoded = 0;

    while decoded < pixel_count {
        let block = block::read_block(&mut reader, channels, |reader| decode_value(reader, &tree))?;

        let value = block.value()
            .ok_or_else(|| Error::invariant("decoded block carries no value"))?
            .clone();
        let run = block.run_length();
        decoded += run;
        pairs.push((value, run));
    }

    read_sentinel(&mut reader)?;

    let filtered = rle::decode(&pairs);
    let pixels = filter::invert(header.filter, &filtered, header.width as usize, header.height as usize);

    let pixels = if header.alpha_encoded {
        pixels
    } else {
        pixels.iter().map(|p| crate::pixel::pixel4(p[0], p[1], p[2], 255)).collect()
    };

    Raster::new(header.width as usize, header.height as usize, pixels)
}

/// Walks the Huffman tree bit by bit to resolve a code to its pixel value,
/// failing if a Huffman-tagged block shows up with no tree to decode it
/// against.
fn decode_value(reader: &mut BitReader, tree: &Tree) -> Result<Pixel> {
    if tree.is_empty() {
        return Err(Error::invalid("huffman-coded block with no tree present"));
    }

    tree.decode_one(reader)
}

fn read_sentinel(reader: &mut BitReader) -> Result<()> {
    reader.align_to_byte();
    let tail = reader.read_bytes(4)?;

    if tail != SENTINEL {
        return Err(Error::invalid("missing end sentinel"));
    }

    Ok(())
}

/// Decodes a `.nya` file from disk.
pub fn decode_file(nya_path: &Path) -> Result<Raster> {
    let bytes = std::fs::read(nya_path)?;
    decode_bytes(&bytes)
}
