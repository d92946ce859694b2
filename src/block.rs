//! Tagged blocks: the smallest self-describing unit of the payload.

use crate::error::{Error, Result};
use crate::io::{BitReader, BitWriter};
use crate::pixel::Pixel;

pub const MIN_RUN: usize = 2;
pub const MAX_RUN: usize = 257;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Single(Pixel),
    Run(Pixel, usize),
    SingleHuffman(Vec<u8>),     // code bits, MSB order as pushed
    RunHuffman(Vec<u8>, usize), // code bits, run length
}

impl Block {
    /// The pixel value this block carries, for frequency accounting and for
    /// deciding whether a Huffman code applies -- `None` once a block has
    /// already been substituted (it no longer carries a plain value).
    pub fn value(&self) -> Option<&Pixel> {
        match self {
            Block::Single(value) | Block::Run(value, _) => Some(value),
            Block::SingleHuffman(_) | Block::RunHuffman(_, _) => None,
        }
    }

    pub fn run_length(&self) -> usize {
        match self {
            Block::Run(_, run) | Block::RunHuffman(_, run) => *run,
            Block::Single(_) | Block::SingleHuffman(_) => 1,
        }
    }

    pub fn write_bits(&self, writer: &mut BitWriter) {
        match self {
            Block::Single(value) => {
                writer.write_bits(0b00, 2);
                writer.write_bytes(value);
            }

            Block::Run(value, run) => {
                writer.write_bits(0b01, 2);
                writer.write_bytes(value);
                write_run_length(writer, *run);
            }

            Block::SingleHuffman(code) => {
                writer.write_bits(0b10, 2);
                write_code(writer, code);
            }

            Block::RunHuffman(code, run) => {
                writer.write_bits(0b11, 2);
                write_code(writer, code);
                write_run_length(writer, *run);
            }
        }
    }
}

fn write_code(writer: &mut BitWriter, code: &[u8]) {
    for &bit in code {
        writer.write_bit(bit);
    }
}

/// Encodes `run` (in `MIN_RUN..=MAX_RUN`) as a 3-bit length `L = bit_length(run - 1) - 1`
/// followed by `L + 1` bits of `run - 1`, both MSB-first.
fn write_run_length(writer: &mut BitWriter, run: usize) {
    debug_assert!((MIN_RUN ..= MAX_RUN).contains(&run), "run length out of bounds: {}", run);

    let a = (run - 1) as u32; // in 1..=256
    let bits = 32 - a.leading_zeros(); // bit_length(a), in 1..=9
    let length = bits - 1; // L, in 0..=8

    writer.write_bits(length as u64, 3);
    writer.write_bits(a as u64, bits as u8);
}

fn read_run_length(reader: &mut BitReader) -> Result<usize> {
    let length = reader.read_bits(3)? as u32;
    let a = reader.read_bits((length + 1) as u8)? as usize;

    let run = a + 1;
    if !(MIN_RUN ..= MAX_RUN).contains(&run) {
        return Err(Error::invalid(format!("decoded run length out of bounds: {}", run)));
    }

    Ok(run)
}

/// Reads one block's tag and body, given the channel count (for plain
/// pixel values) and a resolver for Huffman-tagged blocks (since a code's
/// length is only known by walking the tree bit by bit). A Huffman-tagged
/// block is normalized straight to `Single`/`Run` carrying its resolved
/// value -- by the time a block is read back, the code bits themselves are
/// spent and only the value they named still matters.
pub fn read_block(
    reader: &mut BitReader,
    channels: usize,
    mut decode_value: impl FnMut(&mut BitReader) -> Result<Pixel>,
) -> Result<Block> {
    let tag = reader.read_bits(2)?;

    match tag {
        0b00 => {
            let bytes = reader.read_bytes(channels)?;
            Ok(Block::Single(Pixel::from_slice(&bytes)))
        }

        0b01 => {
            let bytes = reader.read_bytes(channels)?;
            let run = read_run_length(reader)?;
            Ok(Block::Run(Pixel::from_slice(&bytes), run))
        }

        0b10 => {
            let value = decode_value(reader)?;
            Ok(Block::Single(value))
        }

        0b11 => {
            let value = decode_value(reader)?;
            let run = read_run_length(reader)?;
            Ok(Block::Run(value, run))
        }

        _ => unreachable!("2-bit tag"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pixel::pixel3;

    #[test]
    fn run_length_round_trips_boundaries() {
        for run in [MIN_RUN, 3, 100, 256, MAX_RUN] {
            let mut writer = BitWriter::new();
            write_run_length(&mut writer, run);
            let bytes = writer.finish();
            let mut reader = BitReader::new(&bytes);
            assert_eq!(read_run_length(&mut reader).unwrap(), run);
        }
    }

    #[test]
    fn run_of_257_uses_max_length_field() {
        let mut writer = BitWriter::new();
        write_run_length(&mut writer, 257);
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);

        assert_eq!(reader.read_bits(3).unwrap(), 0b111); // L = 8
        assert_eq!(reader.read_bits(9).unwrap(), 256);   // a = run - 1
    }

    #[test]
    fn single_block_round_trips() {
        let block = Block::Single(pixel3(1, 2, 3));
        let mut writer = BitWriter::new();
        block.write_bits(&mut writer);
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let decoded = read_block(&mut reader, 3, |_| unreachable!()).unwrap();
        assert_eq!(decoded, block);
    }
}
