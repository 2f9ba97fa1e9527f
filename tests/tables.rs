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

fn full_box(version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut v = vec![version];
    v.extend_from_slice(&flags.to_be_bytes()[1..]);
    v.extend_from_slice(payload);
    v
}

fn boxed(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

fn stts_with_entries(entries: &[(u32, u32)]) -> Vec<u8> {
    let mut payload = (entries.len() as u32).to_be_bytes().to_vec();
    for (count, delta) in entries {
        payload.extend_from_slice(&count.to_be_bytes());
        payload.extend_from_slice(&delta.to_be_bytes());
    }
    boxed(b"stts", &full_box(0, 0, &payload))
}

#[test]
fn stts_rows_truncate_with_summary() {
    let data = stts_with_entries(&[(10, 100); 5]);
    let opts = Options { max_rows: Some(3), ..Options::default() };
    let out = render_with(&data, opts);

    assert!(out.contains("[entry   0]"), "got:\n{out}");
    assert!(out.contains("[entry   2]"));
    assert!(!out.contains("[entry   3]"));
    assert!(out.lines().any(|l| l.trim() == "..."));
    // running totals cover all entries, including the elided ones
    assert!(out.contains("[samples =     50, time =   5000]"), "got:\n{out}");
}

#[test]
fn stts_running_totals_in_rows() {
    let data = stts_with_entries(&[(2, 512), (1, 256)]);
    let out = render(&data);
    assert!(out.contains("[entry   0] [sample =      1, time =      0] sample_count =     2, sample_delta =   512"), "got:\n{out}");
    assert!(out.contains("[entry   1] [sample =      3, time =   1024] sample_count =     1, sample_delta =   256"));
    assert!(out.contains("[samples =      3, time =   1280]"));
}

#[test]
fn empty_stts_emits_zero_summary() {
    let data = stts_with_entries(&[]);
    let out = render(&data);
    assert!(out.contains("entry_count = 0"));
    assert!(out.contains("[samples =      0, time =      0]"), "got:\n{out}");
}

#[test]
fn stsz_per_sample_sizes() {
    let mut payload = 0u32.to_be_bytes().to_vec(); // sample_size = 0 -> table
    payload.extend_from_slice(&3u32.to_be_bytes());
    for size in [1000u32, 2000, 3000] {
        payload.extend_from_slice(&size.to_be_bytes());
    }
    let out = render(&boxed(b"stsz", &full_box(0, 0, &payload)));
    assert!(out.contains("sample_count = 3"));
    assert!(out.contains("[sample      1] sample_size =  1000"), "got:\n{out}");
    assert!(out.contains("[sample      3] sample_size =  3000"));
}

#[test]
fn stsz_constant_size_has_no_table() {
    let mut payload = 1024u32.to_be_bytes().to_vec();
    payload.extend_from_slice(&99u32.to_be_bytes());
    let out = render(&boxed(b"stsz", &full_box(0, 0, &payload)));
    assert!(out.contains("sample_size = 1024"));
    assert!(out.contains("sample_count = 99"));
    assert!(!out.contains("[sample "));
}

#[test]
fn stco_offsets_render_in_hex() {
    let mut payload = 2u32.to_be_bytes().to_vec();
    payload.extend_from_slice(&0x40u32.to_be_bytes());
    payload.extend_from_slice(&0x1000u32.to_be_bytes());
    let out = render(&boxed(b"stco", &full_box(0, 0, &payload)));
    assert!(out.contains("[chunk     1] offset = 0x000040"), "got:\n{out}");
    assert!(out.contains("[chunk     2] offset = 0x001000"));
}

#[test]
fn stz2_unpacks_4_bit_sizes() {
    let mut payload = vec![0, 0, 0, 4]; // reserved + field_size
    payload.extend_from_slice(&3u32.to_be_bytes());
    payload.push(0x5a); // samples 5 and 10
    payload.push(0x70); // sample 7, pad nibble
    let out = render(&boxed(b"stz2", &full_box(0, 0, &payload)));
    assert!(out.contains("field_size = 4"));
    assert!(out.contains("[sample      1] entry_size =     5"), "got:\n{out}");
    assert!(out.contains("[sample      2] entry_size =    10"));
    assert!(out.contains("[sample      3] entry_size =     7"));
}

#[test]
fn elst_rows() {
    let mut payload = 1u32.to_be_bytes().to_vec();
    payload.extend_from_slice(&1000u32.to_be_bytes()); // segment_duration
    payload.extend_from_slice(&(-1i32).to_be_bytes()); // media_time
    payload.extend_from_slice(&0x00010000u32.to_be_bytes()); // media_rate 1.0
    let out = render(&boxed(b"elst", &full_box(0, 0, &payload)));
    assert!(out.contains("version = 0"));
    assert!(out.contains("[edit segment   0] duration =   1000, media_time =     -1, media_rate = 1"), "got:\n{out}");
}

#[test]
fn mdhd_language_and_duration_seconds() {
    let mut payload = Vec::new();
    payload.extend_from_slice(&0u32.to_be_bytes()); // creation_time
    payload.extend_from_slice(&0u32.to_be_bytes()); // modification_time
    payload.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    payload.extend_from_slice(&5000u32.to_be_bytes()); // duration
    // 'und' packed as three 5-bit letters
    let code: u16 = ((21 << 10) | (14 << 5) | 4) as u16;
    payload.extend_from_slice(&code.to_be_bytes());
    payload.extend_from_slice(&0u16.to_be_bytes()); // pre_defined
    let out = render(&boxed(b"mdhd", &full_box(0, 0, &payload)));
    assert!(out.contains("timescale = 1000"));
    assert!(out.contains("duration = 5000 (5.000 s)"), "got:\n{out}");
    assert!(out.contains("language = und (Undetermined)"));
}

#[test]
fn sbgp_summary_row() {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"roll");
    payload.extend_from_slice(&2u32.to_be_bytes()); // entry_count
    for (count, index) in [(5u32, 1u32), (3, 0)] {
        payload.extend_from_slice(&count.to_be_bytes());
        payload.extend_from_slice(&index.to_be_bytes());
    }
    let out = render(&boxed(b"sbgp", &full_box(0, 0, &payload)));
    assert!(out.contains("grouping_type = 'roll'"));
    assert!(out.contains("[samples =      8]"), "got:\n{out}");
}
