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

fn descriptor(tag: u8, body: &[u8]) -> Vec<u8> {
    assert!(body.len() < 128);
    let mut v = vec![tag, body.len() as u8];
    v.extend_from_slice(body);
    v
}

fn mp3_esds() -> Vec<u8> {
    // DecoderConfig: objectTypeIndication 0x6B (MP3), streamType 5 (audio),
    // upStream 0, reserved 1
    let mut dcd = vec![0x6b, (5 << 2) | 1];
    dcd.extend_from_slice(&[0, 0, 0]); // bufferSizeDB
    dcd.extend_from_slice(&128_000u32.to_be_bytes()); // maxBitrate
    dcd.extend_from_slice(&128_000u32.to_be_bytes()); // avgBitrate

    let mut es = Vec::new();
    es.extend_from_slice(&1u16.to_be_bytes()); // ES_ID
    es.push(0); // no optional fields, streamPriority 0
    es.extend_from_slice(&descriptor(0x04, &dcd));
    es.extend_from_slice(&descriptor(0x06, &[0x02])); // SLConfig, predefined 2

    let mut payload = vec![0, 0, 0, 0]; // version / flags
    payload.extend_from_slice(&descriptor(0x03, &es));
    boxed(b"esds", &payload)
}

#[test]
fn esds_descriptor_chain() {
    let out = render(&mp3_esds());
    assert!(out.contains("[3] ES_Descriptor"), "got:\n{out}");
    assert!(out.contains("[4] DecoderConfigDescriptor"));
    assert!(out.contains("[6] SLConfigDescriptor"));
    assert!(out.contains("ES_ID = 1"));
    assert!(out.contains("objectTypeIndication = 107 (MPEG-1 Audio (usually MP3))"));
    assert!(out.contains("streamType = 5 (AudioStream)"));
    assert!(out.contains("maxBitrate = 128000"));
    assert!(out.contains("predefined = 2 (Reserved for use in MP4 files)"));
}

#[test]
fn descriptor_nesting_is_indented() {
    let out = render(&mp3_esds());
    let es_indent = out.lines().find(|l| l.contains("[3]")).map(|l| l.len() - l.trim_start().len());
    let dcd_indent = out.lines().find(|l| l.contains("[4]")).map(|l| l.len() - l.trim_start().len());
    assert!(es_indent.expect("no [3] line") < dcd_indent.expect("no [4] line"));
}

#[test]
fn overlong_size_encoding_is_noted() {
    // size 3 encoded on two bytes: 0x80 0x03
    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&[0x06, 0x80, 0x03, 0x02, 0x00, 0x00]);
    let out = render(&boxed(b"esds", &payload));
    assert!(out.contains("[6] SLConfigDescriptor (2 length bytes)"), "got:\n{out}");
}

#[test]
fn extended_sl_config_emits_base_fields_then_children() {
    // predefined = 0 selects the full slice-header grammar; a plain
    // SLConfigDescriptor child follows the base fields
    let mut ext = vec![0x00, 0x04]; // flags byte: useTimeStampsFlag only
    ext.extend_from_slice(&90000u32.to_be_bytes()); // timeStampResolution
    ext.extend_from_slice(&0u32.to_be_bytes()); // OCRResolution
    ext.extend_from_slice(&[32, 0, 0, 32]); // timeStampLength .. instantBitrateLength
    ext.extend_from_slice(&[0x00, 0x03]); // length fields + reserved bits
    ext.extend_from_slice(&descriptor(0x06, &[0x01]));

    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&descriptor(0x64, &ext));
    let out = render(&boxed(b"esds", &payload));

    assert!(out.contains("[100] ExtendedSLConfigDescriptor"), "got:\n{out}");
    assert!(out.contains("useTimeStampsFlag = True"));
    assert!(out.contains("timeStampResolution = 90000"));
    assert!(out.contains("timeStampLength = 32"));
    assert!(out.contains("[6] SLConfigDescriptor"));
    assert!(out.contains("predefined = 1 (null SL packet header)"));
}

#[test]
fn unknown_descriptor_tag_is_labeled_and_dumped() {
    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&descriptor(0x41, &[0xde, 0xad])); // KeyWordDescriptor, no handler
    let out = render(&boxed(b"esds", &payload));
    assert!(out.contains("[65] KeyWordDescriptor"), "got:\n{out}");
    assert!(out.contains("de ad"));
}

#[test]
fn decoder_specific_info_is_hexdumped() {
    let mut dcd = vec![0x40, (5 << 2) | 1];
    dcd.extend_from_slice(&[0, 0, 0]);
    dcd.extend_from_slice(&0u32.to_be_bytes());
    dcd.extend_from_slice(&0u32.to_be_bytes());
    dcd.extend_from_slice(&descriptor(0x05, &[0x12, 0x10])); // AudioSpecificConfig blob

    let mut es = Vec::new();
    es.extend_from_slice(&2u16.to_be_bytes());
    es.push(0);
    es.extend_from_slice(&descriptor(0x04, &dcd));

    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&descriptor(0x03, &es));
    let out = render(&boxed(b"esds", &payload));

    assert!(out.contains("objectTypeIndication = 64 (AAC)"), "got:\n{out}");
    assert!(out.contains("[5] DecoderSpecificInfo"));
    assert!(out.contains("12 10"));
}
