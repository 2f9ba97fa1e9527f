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

const WIDEVINE: [u8; 16] = [
    0xed, 0xef, 0x8b, 0xa9, 0x79, 0xd6, 0x4a, 0xce,
    0xa3, 0xc8, 0x27, 0xdc, 0xd5, 0x1d, 0x21, 0xed,
];
const PLAYREADY: [u8; 16] = [
    0x9a, 0x04, 0xf0, 0x79, 0x98, 0x40, 0x42, 0x86,
    0xab, 0x92, 0xe6, 0x5b, 0xe0, 0x88, 0x5f, 0x95,
];

fn pssh_v0(system_id: &[u8; 16], data: &[u8]) -> Vec<u8> {
    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(system_id);
    payload.extend_from_slice(&(data.len() as u32).to_be_bytes());
    payload.extend_from_slice(data);
    boxed(b"pssh", &payload)
}

#[test]
fn pssh_system_ids_are_annotated() {
    let out = render(&pssh_v0(&WIDEVINE, &[0xaa, 0xbb]));
    assert!(out.contains("SystemID = edef8ba9-79d6-4ace-a3c8-27dcd51d21ed (Widevine Content Protection)"), "got:\n{out}");
    assert!(out.contains("Data ="));
    assert!(out.contains("aa bb"));

    let out = render(&pssh_v0(&PLAYREADY, &[]));
    assert!(out.contains("SystemID = 9a04f079-9840-4286-ab92-e65be0885f95 (Microsoft PlayReady)"), "got:\n{out}");
}

#[test]
fn pssh_v1_lists_kids() {
    let mut payload = vec![1, 0, 0, 0];
    payload.extend_from_slice(&WIDEVINE);
    payload.extend_from_slice(&1u32.to_be_bytes()); // KID_count
    payload.extend_from_slice(&[0x11; 16]);
    payload.extend_from_slice(&0u32.to_be_bytes()); // empty Data
    let out = render(&boxed(b"pssh", &payload));
    assert!(out.contains("version = 1"));
    assert!(out.contains("- KID: 11111111111111111111111111111111"), "got:\n{out}");
}

fn tenc_v0(iv_size: u8) -> Vec<u8> {
    let mut payload = vec![0, 0, 0, 0];
    payload.push(0); // reserved
    payload.push(0); // reserved (version 0)
    payload.push(1); // default_isProtected
    payload.push(iv_size);
    payload.extend_from_slice(&[0x22; 16]); // default_KID
    boxed(b"tenc", &payload)
}

fn senc_with_one_iv() -> Vec<u8> {
    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&1u32.to_be_bytes()); // sample_count
    payload.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]); // IV
    boxed(b"senc", &payload)
}

#[test]
fn tenc_supplies_senc_iv_size() {
    let mut file = tenc_v0(8);
    file.extend_from_slice(&senc_with_one_iv());
    let out = render(&file);
    assert!(out.contains("default_Per_Sample_IV_Size = 8"));
    assert!(out.contains("default_KID = 22222222222222222222222222222222"));
    assert!(out.contains("[sample    1] iv = 0102030405060708"), "got:\n{out}");
}

#[test]
fn senc_iv_size_can_come_from_the_cli_override() {
    let opts = Options { senc_per_sample_iv: Some(8), ..Options::default() };
    let out = render_with(&senc_with_one_iv(), opts);
    assert!(out.contains("[sample    1] iv = 0102030405060708"), "got:\n{out}");
}

#[test]
fn senc_without_iv_size_falls_back_to_hexdump() {
    let out = render(&senc_with_one_iv());
    assert!(out.contains("WARNING:"), "got:\n{out}");
    assert!(!out.contains("[sample    1]"));
    // the payload is still shown as bytes
    assert!(out.contains("01 02 03 04"));
}

#[test]
fn senc_subsample_records_follow_flag_bit() {
    let mut payload = vec![0, 0, 0, 2]; // flags & 0x2: subsample data present
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&[9, 9, 9, 9, 9, 9, 9, 9]);
    payload.extend_from_slice(&1u16.to_be_bytes()); // subsample_count
    payload.extend_from_slice(&16u16.to_be_bytes()); // BytesOfClearData
    payload.extend_from_slice(&4080u32.to_be_bytes()); // BytesOfProtectedData

    let mut file = tenc_v0(8);
    file.extend_from_slice(&boxed(b"senc", &payload));
    let out = render(&file);
    assert!(out.contains("subsamples = [(16, 4080)]"), "got:\n{out}");
}

#[test]
fn piff_uuid_box_dispatches_to_senc_grammar() {
    let piff_senc_uuid = [
        0xa2, 0x39, 0x4f, 0x52, 0x5a, 0x9b, 0x4f, 0x14,
        0xa2, 0x44, 0x6c, 0x42, 0x7c, 0x64, 0x8d, 0xf4,
    ];
    let mut body = vec![0, 0, 0, 0];
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    let mut v = Vec::new();
    v.extend_from_slice(&(8 + 16 + body.len() as u32).to_be_bytes());
    v.extend_from_slice(b"uuid");
    v.extend_from_slice(&piff_senc_uuid);
    v.extend_from_slice(&body);

    let opts = Options { senc_per_sample_iv: Some(8), ..Options::default() };
    let out = render_with(&v, opts);
    assert!(out.contains("[uuid a2394f52-5a9b-4f14-a244-6c427c648df4] PIFF SampleEncryption"), "got:\n{out}");
    assert!(out.contains("[sample    1] iv = 0102030405060708"));
}

#[test]
fn schm_and_frma_fields() {
    let mut schm = vec![0, 0, 0, 0];
    schm.extend_from_slice(b"cenc");
    schm.extend_from_slice(&0x10000u32.to_be_bytes());
    let mut sinf = boxed(b"schm", &schm);
    sinf.extend_from_slice(&boxed(b"frma", b"avc1"));
    let out = render(&boxed(b"sinf", &sinf));
    assert!(out.contains("scheme_type = 'cenc'"));
    assert!(out.contains("scheme_version = 0x10000"));
    assert!(out.contains("data_format = 'avc1'"), "got:\n{out}");
}
