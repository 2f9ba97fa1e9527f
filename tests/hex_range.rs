use mp4dissect::{dissect, Emitter, Options};

fn render(data: &[u8]) -> String {
    let mut buf = Vec::new();
    {
        let mut em = Emitter::new(&mut buf, Options::default());
        dissect(data, &mut em).expect("dissect failed");
    }
    String::from_utf8(buf).expect("output not utf-8")
}

fn boxed(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

#[test]
fn unknown_box_dumps_payload_and_parsing_continues() {
    let mut file = boxed(b"zzzz", &[0xde; 16]);
    file.extend_from_slice(&boxed(b"mfhd", &[0, 0, 0, 0, 0, 0, 0, 9]));

    let out = render(&file);
    assert!(out.contains("[zzzz] @ 0x0, 0x8 .. 0x18 (16)"), "got:\n{out}");
    assert!(out.contains("de de de de"));
    // the sibling after the unknown box still renders
    assert!(out.contains("[mfhd] MovieFragmentHeader"));
    assert!(out.contains("sequence_number = 9"));
}

#[test]
fn truncated_final_box_is_an_error_not_a_panic() {
    let mut file = boxed(b"mfhd", &[0, 0, 0, 0, 0, 0, 0, 1]);
    // declares 100 bytes but only the header follows
    file.extend_from_slice(&100u32.to_be_bytes());
    file.extend_from_slice(b"moov");

    let out = render(&file);
    assert!(out.contains("sequence_number = 1"));
    assert!(out.contains("ERROR:"), "got:\n{out}");
}

#[test]
fn malformed_box_payload_does_not_suppress_siblings() {
    // an mfhd with a truncated payload (2 bytes instead of 8)...
    let mut file = boxed(b"mfhd", &[0, 0]);
    // ...followed by a well-formed one
    file.extend_from_slice(&boxed(b"mfhd", &[0, 0, 0, 0, 0, 0, 0, 5]));

    let out = render(&file);
    assert!(out.contains("ERROR:"), "got:\n{out}");
    assert!(out.contains("sequence_number = 5"));
}

#[test]
fn trailing_bytes_are_flagged_and_dumped() {
    // mfhd payload with 3 extra bytes after sequence_number
    let out = render(&boxed(b"mfhd", &[0, 0, 0, 0, 0, 0, 0, 2, 0xca, 0xfe, 0xff]));
    assert!(out.contains("sequence_number = 2"));
    assert!(out.contains("WARNING: 3 trailing bytes"), "got:\n{out}");
    assert!(out.contains("ca fe ff"));
}

#[test]
fn unknown_uuid_extended_type_is_dumped() {
    let mut v = Vec::new();
    v.extend_from_slice(&(8u32 + 16 + 4).to_be_bytes());
    v.extend_from_slice(b"uuid");
    v.extend_from_slice(&[0x55; 16]);
    v.extend_from_slice(&[0xab; 4]);

    let out = render(&v);
    assert!(out.contains("[uuid 55555555-5555-5555-5555-555555555555]"), "got:\n{out}");
    assert!(out.contains("ab ab ab ab"));
}

#[test]
fn empty_input_is_fatal() {
    let mut buf = Vec::new();
    let mut em = Emitter::new(&mut buf, Options::default());
    assert!(dissect(&[], &mut em).is_err());
}

#[test]
fn first_box_header_failure_is_fatal() {
    let mut buf = Vec::new();
    let mut em = Emitter::new(&mut buf, Options::default());
    // declared size smaller than the header itself
    let mut v = Vec::new();
    v.extend_from_slice(&4u32.to_be_bytes());
    v.extend_from_slice(b"ftyp");
    assert!(dissect(&v, &mut em).is_err());
}

#[test]
fn hexdump_lines_truncate_at_max_rows() {
    let data = boxed(b"zzzz", &[0x77; 16 * 10]);
    let mut buf = Vec::new();
    {
        let opts = Options { max_rows: Some(2), ..Options::default() };
        let mut em = Emitter::new(&mut buf, opts);
        dissect(&data, &mut em).expect("dissect failed");
    }
    let out = String::from_utf8(buf).unwrap();
    let dump_lines = out.lines().filter(|l| l.contains("77 77 77 77")).count();
    assert_eq!(dump_lines, 2, "got:\n{out}");
    assert!(out.lines().any(|l| l.trim() == "..."));
}
