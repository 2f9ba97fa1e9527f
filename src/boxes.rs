use std::fmt::{self, Write};

/// A four-character box type code. Non-printable bytes render as `.` so a
/// corrupt type never garbles the output.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            f.write_char(if matches!(b, 0x20..=0x7e) { b as char } else { '.' })?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// One decoded box header. `size` is always resolved: a wire size of 0
/// ("to end of enclosing region") is replaced with the actual span.
#[derive(Debug, Clone)]
pub struct BoxHeader {
    pub size: u64,          // total size including header
    pub typ: FourCC,        // 4CC, or b"uuid"
    pub uuid: Option<[u8; 16]>,
    pub header_size: u64,   // 8, 16, 24, or 32
    pub start: u64,         // file offset of header start
}

impl BoxHeader {
    pub fn payload_start(&self) -> u64 { self.start + self.header_size }
    pub fn payload_end(&self) -> u64 { self.start + self.size }
    pub fn payload_len(&self) -> u64 { self.size - self.header_size }
}

/// Registry key: a box parser may be registered for a plain four-CC, for a
/// four-CC only when it appears under a specific parent (`url `/`urn ` inside
/// `dref`), or for a `uuid` extended type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoxKey {
    FourCC(FourCC),
    Qualified(FourCC, FourCC),
    Uuid([u8; 16]),
}
