use mp4dissect::{dissect, Emitter, Options};

fn render_with(data: &[u8], opts: Options) -> String {
    let mut buf = Vec::new();
    {
        let mut em = Emitter::new(&mut buf, opts);
        dissect(data, &mut em).expect("dissect failed");
    }
    String::from_utf8(buf).expect("output not utf-8")
}

fn render(data: &[u8]) -> String {
    render_with(data, Options::default())
}

fn boxed(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

fn cmaf_ftyp() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"iso6");
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(b"cmfc");
    boxed(b"ftyp", &payload)
}

#[test]
fn cmaf_init_segment_header_line() {
    let out = render(&cmaf_ftyp());
    assert!(out.contains("[ftyp] FileType @ 0x0, 0x8 .. 0x14 (12)"), "got:\n{out}");
    assert!(out.contains("major_brand = 'iso6'"));
    assert!(out.contains("minor_version = 00000000"));
    assert!(out.contains("- compatible: 'cmfc'"));
}

#[test]
fn largesize_selects_64_bit_length() {
    // size32 == 1 -> 64-bit largesize follows the type
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(b"ftyp");
    v.extend_from_slice(&28u64.to_be_bytes());
    v.extend_from_slice(b"isom");
    v.extend_from_slice(&512u32.to_be_bytes());
    v.extend_from_slice(b"isom");
    assert_eq!(v.len(), 28);

    let out = render(&v);
    assert!(out.contains("[ftyp] FileType @ 0x0, 0x10 .. 0x1c (12)"), "got:\n{out}");
    assert!(out.contains("major_brand = 'isom'"));
}

#[test]
fn size_zero_runs_to_end_of_region() {
    let mut v = cmaf_ftyp();
    v.extend_from_slice(&0u32.to_be_bytes());
    v.extend_from_slice(b"free");
    v.extend_from_slice(&[0u8; 24]);

    let out = render(&v);
    assert!(out.contains("[free] FreeSpace @ 0x14, 0x1c .. 0x34 (24)"), "got:\n{out}");
    assert!(out.contains("(24 empty bytes)"));
}

#[test]
fn offsets_and_lengths_can_be_suppressed() {
    let opts = Options {
        show_offsets: false,
        show_lengths: false,
        ..Options::default()
    };
    let out = render_with(&cmaf_ftyp(), opts);
    assert!(out.lines().any(|l| l == "[ftyp] FileType"), "got:\n{out}");
}

#[test]
fn output_is_deterministic() {
    let data = cmaf_ftyp();
    assert_eq!(render(&data), render(&data));
}

#[test]
fn indent_option_scales_nesting() {
    let narrow = render_with(&cmaf_ftyp(), Options { indent: 2, ..Options::default() });
    let wide = render_with(&cmaf_ftyp(), Options { indent: 8, ..Options::default() });
    assert!(narrow.contains("\n  major_brand"), "got:\n{narrow}");
    assert!(wide.contains("\n        major_brand"), "got:\n{wide}");
}

#[test]
fn header_reader_reports_fields() {
    let data = cmaf_ftyp();
    let mut r = mp4dissect::reader::Reader::new(&data, 0);
    let hdr = mp4dissect::read_box_header(&mut r).expect("read_box_header failed");
    assert_eq!(hdr.start, 0);
    assert_eq!(hdr.size, 20);
    assert_eq!(hdr.header_size, 8);
    assert_eq!(hdr.typ, mp4dissect::FourCC(*b"ftyp"));
    assert_eq!(hdr.payload_start(), 8);
    assert_eq!(hdr.payload_end(), 20);
}
