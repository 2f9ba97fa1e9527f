use crate::boxes::FourCC;
use bitreader::BitReader;
use byteorder::{BigEndian, ByteOrder};

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("unexpected end of data at {offset:#x}: wanted {wanted} bytes, {left} left")]
    Eof { offset: u64, wanted: u64, left: u64 },
    #[error("declared size {declared} exceeds the {left} bytes left at {offset:#x}")]
    Overflow { offset: u64, declared: u64, left: u64 },
    #[error("bit-level read: {0}")]
    Bits(#[from] bitreader::BitReaderError),
}

pub type Result<T> = std::result::Result<T, ReadError>;

/// Cursor over a byte region. A region is a slice plus the absolute file
/// offset of its first byte, so every error and hexdump can name real file
/// positions. Parsers derive child regions with [`Reader::sub`] to guarantee
/// they never read past their box's payload.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8], base: u64) -> Self {
        Reader { data, pos: 0, base }
    }

    /// Absolute file offset of the cursor.
    pub fn offset(&self) -> u64 { self.base + self.pos as u64 }
    pub fn remaining(&self) -> u64 { (self.data.len() - self.pos) as u64 }
    pub fn at_end(&self) -> bool { self.pos == self.data.len() }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n as u64 {
            return Err(ReadError::Eof { offset: self.offset(), wanted: n as u64, left: self.remaining() });
        }
        let s = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    /// Consume and return everything up to the region end.
    pub fn rest(&mut self) -> &'a [u8] {
        let s = &self.data[self.pos..];
        self.pos = self.data.len();
        s
    }

    /// The unconsumed tail, without consuming it.
    pub fn peek_rest(&self) -> &'a [u8] { &self.data[self.pos..] }

    /// Child region of `len` bytes starting at the cursor; the parent cursor
    /// advances past it.
    pub fn sub(&mut self, len: u64) -> Result<Reader<'a>> {
        if len > self.remaining() {
            return Err(ReadError::Overflow { offset: self.offset(), declared: len, left: self.remaining() });
        }
        let base = self.offset();
        let s = self.bytes(len as usize)?;
        Ok(Reader::new(s, base))
    }

    /// Bit-granular window over the next `n` bytes. Sub-byte fields only
    /// exist inside such an explicitly delimited window, so byte-aligned
    /// reads on the `Reader` itself can never start mid-byte.
    pub fn bits(&mut self, n: usize) -> Result<BitReader<'a>> {
        Ok(BitReader::new(self.bytes(n)?))
    }

    pub fn u8(&mut self) -> Result<u8> { Ok(self.bytes(1)?[0]) }
    pub fn u16(&mut self) -> Result<u16> { Ok(BigEndian::read_u16(self.bytes(2)?)) }
    pub fn u24(&mut self) -> Result<u32> { Ok(BigEndian::read_u24(self.bytes(3)?)) }
    pub fn u32(&mut self) -> Result<u32> { Ok(BigEndian::read_u32(self.bytes(4)?)) }
    pub fn u64(&mut self) -> Result<u64> { Ok(BigEndian::read_u64(self.bytes(8)?)) }
    pub fn i16(&mut self) -> Result<i16> { Ok(BigEndian::read_i16(self.bytes(2)?)) }
    pub fn i32(&mut self) -> Result<i32> { Ok(BigEndian::read_i32(self.bytes(4)?)) }
    pub fn i64(&mut self) -> Result<i64> { Ok(BigEndian::read_i64(self.bytes(8)?)) }

    /// Big-endian unsigned integer of 0..=8 bytes (0 reads nothing and
    /// yields 0, matching the "field absent" convention of `iloc`).
    pub fn uint(&mut self, nbytes: usize) -> Result<u64> {
        debug_assert!(nbytes <= 8);
        let mut v = 0u64;
        for &b in self.bytes(nbytes)? {
            v = (v << 8) | b as u64;
        }
        Ok(v)
    }

    /// 32- or 64-bit unsigned field selected by a full-box version.
    pub fn uint_v(&mut self, version: u8) -> Result<u64> {
        if version == 0 { Ok(self.u32()? as u64) } else { self.u64() }
    }

    /// 32- or 64-bit signed field selected by a full-box version.
    pub fn int_v(&mut self, version: u8) -> Result<i64> {
        if version == 0 { Ok(self.i32()? as i64) } else { self.i64() }
    }

    pub fn fourcc(&mut self) -> Result<FourCC> {
        let b = self.bytes(4)?;
        Ok(FourCC([b[0], b[1], b[2], b[3]]))
    }

    /// Unsigned 16.16 fixed point.
    pub fn fixed16(&mut self) -> Result<f64> {
        Ok(self.u32()? as f64 / 65536.0)
    }

    /// Signed 16.16 fixed point.
    pub fn sfixed16(&mut self) -> Result<f64> {
        Ok(self.i32()? as f64 / 65536.0)
    }

    /// Signed 8.8 fixed point (volume fields).
    pub fn s8_8(&mut self) -> Result<f64> {
        Ok(self.i16()? as f64 / 256.0)
    }

    /// 16 bytes rendered in canonical 8-4-4-4-12 form.
    pub fn uuid(&mut self) -> Result<String> {
        let b = self.bytes(16)?;
        let hex: Vec<String> = b.iter().map(|x| format!("{x:02x}")).collect();
        Ok(format!(
            "{}-{}-{}-{}-{}",
            hex[0..4].concat(), hex[4..6].concat(), hex[6..8].concat(),
            hex[8..10].concat(), hex[10..16].concat()
        ))
    }

    /// Length-prefixed (1 byte) string occupying a fixed-size field of
    /// `total` bytes. Returns the string and the padding after it.
    pub fn pascal(&mut self, total: u64) -> Result<(&'a [u8], &'a [u8])> {
        let mut field = self.sub(total)?;
        let len = field.u8()? as usize;
        let s = field.bytes(len)?;
        Ok((s, field.rest()))
    }

    /// Bytes up to and including a NUL terminator; the terminator is not part
    /// of the returned slice. Missing terminator is an EOF.
    pub fn cstring(&mut self) -> Result<&'a [u8]> {
        match self.peek_rest().iter().position(|&b| b == 0) {
            Some(n) => {
                let s = &self.data[self.pos..self.pos + n];
                self.pos += n + 1;
                Ok(s)
            }
            None => Err(ReadError::Eof {
                offset: self.offset(),
                wanted: self.remaining() + 1,
                left: self.remaining(),
            }),
        }
    }
}
