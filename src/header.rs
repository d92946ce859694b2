//! The fixed 72-bit preamble and the trailing pad + sentinel framing.

use bit_field::BitField;

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::io::{BitReader, BitWriter, Data};

pub const MAGIC: [u8; 4] = *b"NYA!";
pub const SENTINEL: [u8; 4] = [0x00, 0x00, b':', b'3'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub alpha_encoded: bool,
    pub filter: Filter,
}

impl Header {
    pub fn channels(&self) -> usize {
        if self.alpha_encoded { 4 } else { 3 }
    }

    /// Writes the 72-bit header: 32-bit magic, two 16-bit little-endian
    /// dimensions, then a flag byte packing 5 reserved zero bits, the alpha
    /// flag, and the 2-bit filter id.
    pub fn write(&self, writer: &mut BitWriter) {
        writer.write_bytes(&MAGIC);

        let mut width_bytes = Vec::new();
        self.width.write(&mut width_bytes).expect("writing to a Vec never fails");
        writer.write_bytes(&width_bytes);

        let mut height_bytes = Vec::new();
        self.height.write(&mut height_bytes).expect("writing to a Vec never fails");
        writer.write_bytes(&height_bytes);

        let mut flags: u8 = 0;
        flags.set_bit(2, self.alpha_encoded);
        flags.set_bits(0 .. 2, self.filter.id());
        writer.write_byte(flags);
    }

    pub fn read(reader: &mut BitReader) -> Result<Self> {
        let magic = reader.read_bytes(4)?;
        if magic != MAGIC {
            return Err(Error::invalid("missing NYA! magic bytes"));
        }

        let width_bytes = reader.read_bytes(2)?;
        let width = u16::read(&mut width_bytes.as_slice())?;

        let height_bytes = reader.read_bytes(2)?;
        let height = u16::read(&mut height_bytes.as_slice())?;

        let flags: u8 = reader.read_byte()?;
        let alpha_encoded = flags.get_bit(2);
        let filter_id = flags.get_bits(0 .. 2);

        let filter = Filter::from_id(filter_id)
            .ok_or_else(|| Error::invalid("reserved filter id 3"))?;

        Ok(Header { width, height, alpha_encoded, filter })
    }
}

/// Zero-pads `writer` to a byte boundary, always emitting at least a whole
/// zero byte (see DESIGN.md's resolution of the padding open question),
/// then appends the 4-byte end sentinel.
pub fn write_footer(writer: &mut BitWriter) {
    let pad = 8 - (writer.len_bits() % 8);
    writer.write_bits(0, pad as u8);
    writer.write_bytes(&SENTINEL);
}
