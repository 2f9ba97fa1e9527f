use mp4dissect::reader::{ReadError, Reader};

#[test]
fn byte_aligned_integers() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
    let mut r = Reader::new(&data, 0x100);
    assert_eq!(r.u16().unwrap(), 0x0102);
    assert_eq!(r.u24().unwrap(), 0x030405);
    assert_eq!(r.offset(), 0x105);
    assert_eq!(r.u8().unwrap(), 0x06);
    assert_eq!(r.u16().unwrap(), 0x0708);
    assert!(r.at_end());
    assert!(matches!(r.u8(), Err(ReadError::Eof { .. })));
}

#[test]
fn variable_width_uint() {
    let data = [0xab, 0xcd, 0xef];
    let mut r = Reader::new(&data, 0);
    assert_eq!(r.uint(3).unwrap(), 0xabcdef);
    let mut r = Reader::new(&data, 0);
    assert_eq!(r.uint(0).unwrap(), 0);
    assert_eq!(r.uint(1).unwrap(), 0xab);
}

#[test]
fn fixed_point_values() {
    let fixed16_bytes = 0x00480000u32.to_be_bytes();
    let mut r = Reader::new(&fixed16_bytes, 0);
    assert_eq!(r.fixed16().unwrap(), 72.0);
    let sfixed16_bytes = (-0x10000i32).to_be_bytes();
    let mut r = Reader::new(&sfixed16_bytes, 0);
    assert_eq!(r.sfixed16().unwrap(), -1.0);
    let s8_8_bytes = 0x0180u16.to_be_bytes();
    let mut r = Reader::new(&s8_8_bytes, 0);
    assert_eq!(r.s8_8().unwrap(), 1.5);
}

#[test]
fn bit_windows_are_byte_delimited() {
    let data = [0b1010_0110, 0b1100_0000, 0xff];
    let mut r = Reader::new(&data, 0);
    let mut br = r.bits(2).unwrap();
    assert_eq!(br.read_u8(1).unwrap(), 1);
    assert_eq!(br.read_u8(3).unwrap(), 0b010);
    assert_eq!(br.read_u8(4).unwrap(), 0b0110);
    assert_eq!(br.read_u8(2).unwrap(), 0b11);
    // the outer cursor advanced past the whole window
    assert_eq!(r.u8().unwrap(), 0xff);
}

#[test]
fn cstring_requires_terminator() {
    let mut r = Reader::new(b"abc\0rest", 0);
    assert_eq!(r.cstring().unwrap(), b"abc");
    assert_eq!(r.remaining(), 4);

    let mut r = Reader::new(b"no nul here", 0);
    assert!(matches!(r.cstring(), Err(ReadError::Eof { .. })));
}

#[test]
fn sub_regions_enforce_their_bounds() {
    let data = [1, 2, 3, 4, 5, 6];
    let mut r = Reader::new(&data, 0x10);
    let mut child = r.sub(4).unwrap();
    assert_eq!(child.offset(), 0x10);
    assert_eq!(child.u32().unwrap(), 0x01020304);
    assert!(child.at_end());
    assert!(matches!(child.u8(), Err(ReadError::Eof { .. })));
    // the parent cursor sits right after the child region
    assert_eq!(r.u16().unwrap(), 0x0506);
    assert!(matches!(r.sub(1), Err(ReadError::Overflow { .. })));
}

#[test]
fn pascal_strings_live_in_fixed_fields() {
    let mut data = vec![3u8];
    data.extend_from_slice(b"abc");
    data.extend_from_slice(&[0, 0]); // padding
    data.push(0xff); // next field
    let mut r = Reader::new(&data, 0);
    let (s, pad) = r.pascal(6).unwrap();
    assert_eq!(s, b"abc");
    assert_eq!(pad, &[0u8, 0]);
    assert_eq!(r.u8().unwrap(), 0xff);

    // a length byte that overruns the field is an error
    let mut r = Reader::new(&[9u8, b'x'], 0);
    assert!(r.pascal(2).is_err());
}

#[test]
fn uuid_renders_canonically() {
    let bytes = [
        0xed, 0xef, 0x8b, 0xa9, 0x79, 0xd6, 0x4a, 0xce,
        0xa3, 0xc8, 0x27, 0xdc, 0xd5, 0x1d, 0x21, 0xed,
    ];
    let mut r = Reader::new(&bytes, 0);
    assert_eq!(r.uuid().unwrap(), "edef8ba9-79d6-4ace-a3c8-27dcd51d21ed");
}
