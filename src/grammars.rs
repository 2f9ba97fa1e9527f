//! Per-box field grammars. Each function dissects the payload of one box
//! type: it reads fields from the payload [`Reader`] and emits them, leaving
//! the reader exactly at the payload end. The driver flags anything left
//! over and turns errors into a hexdump of the unconsumed tail.

use crate::boxes::{BoxHeader, FourCC};
use crate::descriptors;
use crate::emit::{quote, py_bool, Emitter};
use crate::known_boxes;
use crate::parser::{self, Context};
use crate::reader::Reader;
use anyhow::{ensure, Result};

// ---------- shared helpers ----------

/// Read and check the version + flags prefix of a full box. The version is
/// emitted when the grammar admits more than one, the flags when any flag
/// bit is legal (elided while equal to `default_flags`).
fn full_box(
    r: &mut Reader,
    em: &mut Emitter,
    max_version: u8,
    max_flags: u32,
    default_flags: u32,
) -> Result<(u8, u32)> {
    let version = r.u8()?;
    let flags = r.u24()?;
    ensure!(version <= max_version, "invalid version: {version}");
    ensure!(flags & !max_flags == 0, "invalid flags: {flags:06x}");
    if max_version > 0 {
        em.field("version", version);
    }
    if max_flags != 0 {
        em.field_default("flags", format!("{flags:06x}"), format!("{default_flags:06x}"));
    }
    Ok((version, flags))
}

fn hex_str(b: &[u8]) -> String {
    b.iter().map(|x| format!("{x:02x}")).collect()
}

fn dump_rest(r: &mut Reader, em: &mut Emitter) {
    let base = r.offset();
    em.hexdump(r.rest(), base);
}

/// `value (meaning)` when descriptions are on, else just the value.
fn described(em: &Emitter, value: impl std::fmt::Display, desc: &str) -> String {
    if em.opts.show_descriptions {
        format!("{value} ({desc})")
    } else {
        value.to_string()
    }
}

/// Timestamps count seconds since 1904-01-01T00:00:00Z.
fn format_time(t: u64) -> Option<String> {
    let unix = (t as i64).checked_sub(2_082_844_800)?;
    chrono::DateTime::from_timestamp(unix, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn in_seconds(timescale: Option<u32>, v: u64) -> Option<String> {
    let ts = timescale.filter(|&t| t > 0)?;
    Some(format!("{:.3} s", v as f64 / ts as f64))
}

fn all_ones(wsize: u8) -> u64 {
    if wsize == 0 { u64::MAX } else { u64::MAX >> (64 - 8 * wsize as u32) }
}

fn matrix(r: &mut Reader, em: &mut Emitter) -> Result<()> {
    let mut m = [0f64; 9];
    for v in &mut m {
        *v = r.sfixed16()?;
    }
    let default = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 16384.0];
    if em.opts.show_defaults || m != default {
        let text: Vec<String> = m.iter().map(|v| format!("{v}")).collect();
        em.field("matrix", format!("[{}]", text.join(", ")));
    }
    Ok(())
}

/// Unpack a 16-bit language field (1 pad bit + three 5-bit letters).
fn decode_language(code: u16) -> Result<String> {
    ensure!(code >> 15 == 0, "invalid language pad bit");
    let mut s = String::with_capacity(3);
    for shift in [10, 5, 0] {
        let c = ((code >> shift) & 0x1f) as u8;
        ensure!((1..=26).contains(&c), "invalid language code: {code:#06x}");
        s.push((b'a' + c - 1) as char);
    }
    Ok(s)
}

fn language(r: &mut Reader, em: &mut Emitter) -> Result<()> {
    let code = r.u16()?;
    let lang = if code == 0 { "und".to_string() } else { decode_language(code)? };
    let desc = known_boxes::language_name(&lang).map(String::from);
    em.field_desc("language", lang, desc);
    Ok(())
}

/// The 32-bit `sample_flags` word used by `trex`/`tfhd`/`trun`, rendered as
/// a nested block of its subfields.
fn sample_flags(r: &mut Reader, em: &mut Emitter, name: &str) -> Result<()> {
    em.open_group(name);
    let res = (|| -> Result<()> {
        let mut br = r.bits(4)?;
        let reserved = br.read_u8(4)?;
        ensure!(reserved == 0, "invalid reserved: {reserved}");
        for field in ["is_leading", "sample_depends_on", "sample_is_depended_on", "sample_has_redundancy"] {
            let v = br.read_u8(2)?;
            em.field_default_desc(field, v, 0, Some(known_boxes::sdtp_value(v).into()));
        }
        em.field_default("sample_padding_value", br.read_u8(3)?, 0);
        let non_sync = br.read_bool()?;
        em.field_default("sample_is_non_sync_sample", py_bool(non_sync), py_bool(false));
        em.field_default("sample_degradation_priority", br.read_u16(16)?, 0);
        Ok(())
    })();
    em.close_group();
    res
}

// ---------- containers ----------

pub fn container(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    parser::parse_boxes(r, em, ctx, None)?;
    Ok(())
}

/// `trak` opens a context frame: the handler type and timescale its `hdlr`
/// and `mdhd` set must not leak into sibling tracks. The `tenc` IV size does
/// flow out, so a `moov`-scoped `tenc` still reaches a `moof`-scoped `senc`.
pub fn trak(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let mut inner = ctx.clone();
    let res = parser::parse_boxes(r, em, &mut inner, None);
    ctx.iv_size = inner.iv_size;
    res?;
    Ok(())
}

pub fn meta(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let mut inner = ctx.clone();
    let res = parser::parse_boxes(r, em, &mut inner, None);
    ctx.iv_size = inner.iv_size;
    res?;
    Ok(())
}

// ---------- header boxes ----------

pub fn free(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let base = r.offset();
    let data = r.rest();
    if data.iter().any(|&b| b != 0) {
        em.hexdump(data, base);
    } else {
        em.line(&format!("({} empty bytes)", data.len()));
    }
    Ok(())
}

pub fn ftyp(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    em.field("major_brand", quote(&r.fourcc()?.0));
    em.field("minor_version", format!("{:08x}", r.u32()?));
    while !r.at_end() {
        let brand = r.fourcc()?;
        em.line(&format!("- compatible: {}", quote(&brand.0)));
    }
    Ok(())
}

pub fn mfhd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    em.field("sequence_number", r.u32()?);
    Ok(())
}

pub fn mvhd(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let wsize: u8 = if version == 1 { 8 } else { 4 };

    let creation = r.uint_v(version)?;
    em.field_default_desc("creation_time", creation, 0, format_time(creation));
    let modification = r.uint_v(version)?;
    em.field_default_desc("modification_time", modification, 0, format_time(modification));
    let timescale = r.u32()?;
    em.field("timescale", timescale);
    ctx.timescale = Some(timescale);
    let duration = r.uint_v(version)?;
    em.field_default_desc("duration", duration, all_ones(wsize), in_seconds(Some(timescale), duration));
    em.field_default("rate", r.sfixed16()?, 1.0);
    em.field_default("volume", r.s8_8()?, 1.0);
    ensure!(r.u16()? == 0, "invalid reserved_1");
    ensure!(r.u32()? == 0, "invalid reserved_2");
    ensure!(r.u32()? == 0, "invalid reserved_3");

    matrix(r, em)?;

    let pre_defined = r.bytes(6 * 4)?;
    ensure!(pre_defined.iter().all(|&b| b == 0), "invalid pre_defined");
    em.field_default("next_track_ID", r.u32()?, u32::MAX);
    Ok(())
}

pub fn tkhd(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0xf, 0)?;
    let wsize: u8 = if version == 1 { 8 } else { 4 };

    let creation = r.uint_v(version)?;
    em.field_default_desc("creation_time", creation, 0, format_time(creation));
    let modification = r.uint_v(version)?;
    em.field_default_desc("modification_time", modification, 0, format_time(modification));
    em.field("track_ID", r.u32()?);
    ensure!(r.u32()? == 0, "invalid reserved_1");
    let duration = r.uint_v(version)?;
    em.field_default_desc("duration", duration, all_ones(wsize), in_seconds(ctx.timescale, duration));
    ensure!(r.u32()? == 0, "invalid reserved_2");
    ensure!(r.u32()? == 0, "invalid reserved_3");
    em.field_default("layer", r.i16()?, 0);
    em.field_default("alternate_group", r.i16()?, 0);
    em.field_default("volume", r.s8_8()?, 1.0);
    ensure!(r.u16()? == 0, "invalid reserved_4");
    matrix(r, em)?;
    let (w, h) = (r.fixed16()?, r.fixed16()?);
    em.field_default("size", format!("{w} x {h}"), "0 x 0".to_string());
    Ok(())
}

pub fn mdhd(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let wsize: u8 = if version == 1 { 8 } else { 4 };

    let creation = r.uint_v(version)?;
    em.field_default_desc("creation_time", creation, 0, format_time(creation));
    let modification = r.uint_v(version)?;
    em.field_default_desc("modification_time", modification, 0, format_time(modification));
    let timescale = r.u32()?;
    em.field("timescale", timescale);
    ctx.timescale = Some(timescale);
    let duration = r.uint_v(version)?;
    em.field_default_desc("duration", duration, all_ones(wsize), in_seconds(Some(timescale), duration));
    language(r, em)?;
    ensure!(r.u16()? == 0, "invalid pre_defined_1");
    Ok(())
}

pub fn mehd(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let duration = r.uint_v(version)?;
    em.field_desc("fragment_duration", duration, in_seconds(ctx.timescale, duration));
    Ok(())
}

pub fn hdlr(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let pre_defined = r.u32()?;
    ensure!(pre_defined == 0, "invalid pre_defined: {pre_defined}");
    let handler = r.fourcc()?;
    let reserved = r.bytes(4 * 3)?;
    ensure!(reserved.iter().all(|&b| b == 0), "invalid reserved");
    let name = r.rest();
    em.field_desc(
        "handler_type",
        quote(&handler.0),
        known_boxes::handler_name(&handler).map(String::from),
    );
    em.field("name", quote(name));
    ctx.handler = Some(handler);
    Ok(())
}

pub fn smhd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    em.field_default("balance", r.i16()?, 0);
    ensure!(r.u16()? == 0, "invalid reserved");
    Ok(())
}

pub fn vmhd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (_, flags) = full_box(r, em, 0, 1, 1)?;
    ensure!(flags == 1, "invalid flags: {flags}");
    em.field_default("graphicsmode", r.u16()?, 0);
    let opcolor = (r.u16()?, r.u16()?, r.u16()?);
    em.field_default(
        "opcolor",
        format!("({}, {}, {})", opcolor.0, opcolor.1, opcolor.2),
        "(0, 0, 0)".to_string(),
    );
    Ok(())
}

pub fn hmhd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    em.field("maxPDUsize", r.u16()?);
    em.field("avgPDUsize", r.u16()?);
    em.field("maxbitrate", r.u32()?);
    em.field("avgbitrate", r.u32()?);
    ensure!(r.u32()? == 0, "invalid reserved");
    Ok(())
}

pub fn nmhd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    Ok(())
}

pub fn elng(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    em.field("extended_language", quote(r.cstring()?));
    Ok(())
}

pub fn cprt(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    language(r, em)?;
    em.field("notice", quote(r.rest()));
    Ok(())
}

pub fn id32(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    language(r, em)?;
    em.line("ID3v2 data =");
    dump_rest(r, em);
    Ok(())
}

pub fn xml_box(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    dump_rest(r, em);
    Ok(())
}

// ---------- data references ----------

pub fn dref(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    let n = parser::parse_boxes(r, em, ctx, Some(FourCC(*b"dref")))?;
    if n as u32 != entry_count {
        em.warn(&format!("entry_count ({entry_count}) not matching the {n} entries present"));
    }
    Ok(())
}

pub fn url_entry(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 1, 0)?;
    if r.at_end() {
        return Ok(());
    }
    em.field("location", quote(r.cstring()?));
    Ok(())
}

pub fn urn_entry(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 1, 0)?;
    if r.at_end() {
        return Ok(());
    }
    em.field("location", quote(r.cstring()?));
    if r.at_end() {
        return Ok(());
    }
    em.field("name", quote(r.cstring()?));
    Ok(())
}

// ---------- sample descriptions ----------

pub fn stsd(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 255, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    let n = parser::parse_boxes_each(r, em, ctx, |hdr, pr, em, ctx| {
        sample_entry(hdr, pr, em, ctx, version)
    })?;
    if n as u32 != entry_count {
        em.warn(&format!("entry_count ({entry_count}) not matching the {n} entries present"));
    }
    Ok(())
}

fn sample_entry(
    hdr: &BoxHeader,
    r: &mut Reader,
    em: &mut Emitter,
    ctx: &mut Context,
    version: u8,
) -> Result<()> {
    let reserved = r.bytes(6)?;
    ensure!(reserved.iter().all(|&b| b == 0), "invalid reserved: {reserved:02x?}");
    em.field("data_reference_index", r.u16()?);

    match ctx.handler {
        Some(h) if h.0 == *b"vide" => video_sample_entry(r, em, ctx, version),
        Some(h) if h.0 == *b"soun" => audio_sample_entry(r, em, ctx, version),
        Some(h) if matches!(&h.0, b"meta" | b"text" | b"subt") => {
            text_sample_entry(hdr, r, em, ctx, version)
        }
        _ => {
            dump_rest(r, em);
            Ok(())
        }
    }
}

fn video_sample_entry(r: &mut Reader, em: &mut Emitter, ctx: &mut Context, version: u8) -> Result<()> {
    ensure!(version == 0, "invalid version");

    let reserved = r.bytes(16)?;
    ensure!(reserved.iter().all(|&b| b == 0), "invalid reserved / pre-defined data");

    let (w, h) = (r.u16()?, r.u16()?);
    em.field("size", format!("{w} x {h}"));
    let (hres, vres) = (r.fixed16()?, r.fixed16()?);
    em.field_default("resolution", format!("{hres} x {vres}"), "72 x 72".to_string());
    ensure!(r.u32()? == 0, "invalid reserved_2");
    em.field_default("frame_count", r.u16()?, 1);

    // compressorname is a Pascal string padded out to 32 bytes
    let (name, pad) = r.pascal(32)?;
    em.field("compressorname", quote(name));
    ensure!(pad.iter().all(|&b| b == 0), "invalid compressorname padding");

    em.field_default("depth", r.u16()?, 24);
    ensure!(r.i16()? == -1, "invalid pre_defined_3");

    parser::parse_boxes(r, em, ctx, None)?;
    Ok(())
}

fn audio_sample_entry(r: &mut Reader, em: &mut Emitter, ctx: &mut Context, version: u8) -> Result<()> {
    ensure!(version <= 1, "invalid version");

    if version == 0 {
        ensure!(r.u16()? == 0, "invalid reserved_1_2");
    } else {
        let entry_version = r.u16()?;
        ensure!(entry_version == 1, "invalid entry_version: {entry_version}");
    }
    let reserved = r.bytes(6)?;
    ensure!(reserved.iter().all(|&b| b == 0), "invalid reserved_1");

    let channelcount = r.u16()?;
    if version == 0 {
        em.field_default("channelcount", channelcount, 2);
    } else {
        em.field("channelcount", channelcount);
    }
    em.field_default("samplesize", r.u16()?, 16);
    ensure!(r.u16()? == 0, "invalid pre_defined_1");
    ensure!(r.u16()? == 0, "invalid reserved_2");
    let samplerate = r.fixed16()?;
    if version == 0 {
        em.field("samplerate", samplerate);
    } else {
        em.field_default("samplerate", samplerate, 1.0);
        // QuickTime sound description v1 extension block
        em.field("samples_per_packet", r.u32()?);
        em.field("bytes_per_packet", r.u32()?);
        em.field("bytes_per_frame", r.u32()?);
        em.field("bytes_per_sample", r.u32()?);
    }

    parser::parse_boxes(r, em, ctx, None)?;
    Ok(())
}

fn text_sample_entry(
    hdr: &BoxHeader,
    r: &mut Reader,
    em: &mut Emitter,
    ctx: &mut Context,
    version: u8,
) -> Result<()> {
    ensure!(version == 0, "invalid version");

    let fields: &[&str] = match &hdr.typ.0 {
        b"metx" => &["content_encoding", "namespace", "schema_location"],
        b"mett" => &["content_encoding", "mime_format"],
        b"urim" => &[],
        b"stxt" => &["content_encoding", "mime_format"],
        b"sbtt" => &["content_encoding", "mime_format"],
        b"stpp" => &["namespace", "schema_location", "auxiliary_mime_types"],
        _ => &[],
    };
    for name in fields {
        em.field(name, quote(r.cstring()?));
    }

    parser::parse_boxes(r, em, ctx, None)?;
    Ok(())
}

// ---------- codec configuration ----------

pub fn btrt(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    em.field("bufferSizeDB", r.u32()?);
    em.field("maxBitrate", r.u32()?);
    em.field("avgBitrate", r.u32()?);
    Ok(())
}

pub fn pasp(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    em.field("pixel aspect ratio", format!("{}/{}", r.u32()?, r.u32()?));
    Ok(())
}

pub fn clap(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    for name in ["cleanApertureWidth", "cleanApertureHeight", "horizOff", "vertOff"] {
        em.field(name, format!("{}/{}", r.u32()?, r.u32()?));
    }
    Ok(())
}

pub fn colr(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let colour_type = r.fourcc()?;
    em.field_desc(
        "colour_type",
        quote(&colour_type.0),
        known_boxes::colour_type_name(&colour_type).map(String::from),
    );
    if colour_type.0 == *b"nclx" {
        em.field("colour_primaries", r.u16()?);
        em.field("transfer_characteristics", r.u16()?);
        em.field("matrix_coefficients", r.u16()?);
        let mut br = r.bits(1)?;
        em.field("full_range_flag", py_bool(br.read_bool()?));
        let reserved = br.read_u8(7)?;
        ensure!(reserved == 0, "invalid reserved: {reserved}");
    } else {
        let name = if matches!(&colour_type.0, b"rICC" | b"prof") { "ICC_profile" } else { "data" };
        em.line(&format!("{name} ="));
        dump_rest(r, em);
    }
    Ok(())
}

pub fn avcc(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let configuration_version = r.u8()?;
    ensure!(configuration_version == 1, "invalid configuration version: {configuration_version}");
    em.field("profile / compat / level", hex_str(r.bytes(3)?));
    let mut br = r.bits(1)?;
    let reserved = br.read_u8(6)?;
    ensure!(reserved == 0x3f, "invalid reserved_1: {reserved}");
    em.field("lengthSizeMinusOne", br.read_u8(2)?);

    let mut br = r.bits(1)?;
    let reserved = br.read_u8(3)?;
    ensure!(reserved == 0x7, "invalid reserved_2: {reserved}");
    let num_sps = br.read_u8(5)?;
    for _ in 0..num_sps {
        let n = r.u16()? as usize;
        em.line(&format!("- SPS: {}", hex_str(r.bytes(n)?)));
    }
    let num_pps = r.u8()?;
    for _ in 0..num_pps {
        let n = r.u16()? as usize;
        em.line(&format!("- PPS: {}", hex_str(r.bytes(n)?)));
    }

    // profile extension block, present for high profiles
    if !r.at_end() {
        let mut br = r.bits(1)?;
        br.read_u8(6)?;
        em.field("chroma_format", br.read_u8(2)?);
        let mut br = r.bits(1)?;
        br.read_u8(5)?;
        em.field("bit_depth_luma_minus8", br.read_u8(3)?);
        let mut br = r.bits(1)?;
        br.read_u8(5)?;
        em.field("bit_depth_chroma_minus8", br.read_u8(3)?);
        let num_ext = r.u8()?;
        for _ in 0..num_ext {
            let n = r.u16()? as usize;
            em.line(&format!("- SPS ext: {}", hex_str(r.bytes(n)?)));
        }
    }
    Ok(())
}

pub fn svcc(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let configuration_version = r.u8()?;
    ensure!(configuration_version == 1, "invalid configuration version: {configuration_version}");
    em.field("profile / compat / level", hex_str(r.bytes(3)?));
    let mut br = r.bits(1)?;
    em.field("complete_representation", py_bool(br.read_bool()?));
    let reserved = br.read_u8(5)?;
    ensure!(reserved == 0x1f, "invalid reserved_1: {reserved}");
    em.field("lengthSizeMinusOne", br.read_u8(2)?);

    let mut br = r.bits(1)?;
    let reserved = br.read_u8(1)?;
    ensure!(reserved == 0, "invalid reserved_2: {reserved}");
    let num_sps = br.read_u8(7)?;
    for _ in 0..num_sps {
        let n = r.u16()? as usize;
        em.line(&format!("- SPS: {}", hex_str(r.bytes(n)?)));
    }
    let num_pps = r.u8()?;
    for _ in 0..num_pps {
        let n = r.u16()? as usize;
        em.line(&format!("- PPS: {}", hex_str(r.bytes(n)?)));
    }
    Ok(())
}

pub fn hvcc(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let configuration_version = r.u8()?;
    ensure!(configuration_version == 1, "invalid configuration version: {configuration_version}");

    let mut br = r.bits(1)?;
    em.field("general_profile_space", br.read_u8(2)?);
    em.field("general_tier_flag", br.read_u8(1)?);
    em.field("general_profile_idc", format!("{:02x}", br.read_u8(5)?));
    em.field("general_profile_compatibility_flags", hex_str(r.bytes(4)?));
    em.field("general_constraint_indicator_flags", hex_str(r.bytes(6)?));
    em.field("general_level_idc", hex_str(r.bytes(1)?));

    let mut br = r.bits(2)?;
    ensure!(br.read_u8(4)? == 0xf, "invalid reserved");
    em.field("min_spatial_segmentation_idc", br.read_u16(12)?);
    let mut br = r.bits(1)?;
    ensure!(br.read_u8(6)? == 0x3f, "invalid reserved");
    em.field("parallelismType", br.read_u8(2)?);
    let mut br = r.bits(1)?;
    ensure!(br.read_u8(6)? == 0x3f, "invalid reserved");
    em.field("chromaFormat", br.read_u8(2)?);
    let mut br = r.bits(1)?;
    ensure!(br.read_u8(5)? == 0x1f, "invalid reserved");
    em.field("bitDepthLumaMinus8", br.read_u8(3)?);
    let mut br = r.bits(1)?;
    ensure!(br.read_u8(5)? == 0x1f, "invalid reserved");
    em.field("bitDepthChromaMinus8", br.read_u8(3)?);

    em.field("avgFrameRate", r.u16()?);
    let mut br = r.bits(1)?;
    em.field("constantFrameRate", br.read_u8(2)?);
    em.field("numTemporalLayers", br.read_u8(3)?);
    em.field("temporalIdNested", py_bool(br.read_bool()?));
    em.field("lengthSizeMinusOne", br.read_u8(2)?);

    let num_arrays = r.u8()?;
    for i in 0..num_arrays {
        em.line(&format!("- array {i}:"));
        let mut br = r.bits(1)?;
        let completeness = br.read_bool()?;
        em.line(&format!("    array_completeness = {}", py_bool(completeness)));
        ensure!(br.read_u8(1)? == 0, "invalid reserved");
        em.line(&format!("    NAL_unit_type = {}", br.read_u8(6)?));
        let num_nalus = r.u16()?;
        for n in 0..num_nalus {
            em.line(&format!("    - NALU {n}"));
            let len = r.u16()? as usize;
            let base = r.offset();
            em.hexdump(r.bytes(len)?, base);
        }
    }
    Ok(())
}

pub fn av1c(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let mut br = r.bits(4)?;
    ensure!(br.read_bool()?, "invalid marker");
    let version = br.read_u8(7)?;
    ensure!(version == 1, "invalid configuration version: {version}");
    em.field("seq_profile", br.read_u8(3)?);
    em.field("seq_level_idx_0", br.read_u8(5)?);
    em.field("seq_tier_0", br.read_u8(1)?);
    em.field("high_bitdepth", py_bool(br.read_bool()?));
    em.field("twelve_bit", py_bool(br.read_bool()?));
    em.field("monochrome", py_bool(br.read_bool()?));
    em.field("chroma_subsampling_x", br.read_u8(1)?);
    em.field("chroma_subsampling_y", br.read_u8(1)?);
    em.field("chroma_sample_position", br.read_u8(2)?);
    ensure!(br.read_u8(3)? == 0, "invalid reserved");
    if br.read_bool()? {
        em.field("initial_presentation_delay_minus_one", br.read_u8(4)?);
    } else {
        ensure!(br.read_u8(4)? == 0, "invalid reserved");
    }
    em.line("configOBUs =");
    dump_rest(r, em);
    Ok(())
}

pub fn av1f(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    em.field("fwd_distance", r.u8()?);
    Ok(())
}

pub fn dops(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let version = r.u8()?;
    ensure!(version == 0, "invalid Version: {version}");
    let channels = r.u8()?;
    em.field("OutputChannelCount", channels);
    em.field("PreSkip", r.u16()?);
    em.field("InputSampleRate", r.u32()?);
    em.field("OutputGain", r.s8_8()?);
    let family = r.u8()?;
    em.field("ChannelMappingFamily", family);
    if family != 0 {
        em.field("StreamCount", r.u8()?);
        em.field("CoupledCount", r.u8()?);
        let mapping: Vec<String> = r.bytes(channels as usize)?.iter().map(|b| b.to_string()).collect();
        em.field("ChannelMapping", format!("[{}]", mapping.join(", ")));
    }
    Ok(())
}

pub fn esds(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    descriptors::parse_descriptor(r, em, ctx)
}

pub fn m4ds(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    descriptors::parse_descriptors(r, em, ctx)
}

// ---------- edit / sample tables ----------

pub fn elst(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let segment_duration = r.uint_v(version)?;
        let media_time = r.int_v(version)?;
        let media_rate = r.sfixed16()?;
        em.row(i as u64, &format!(
            "[edit segment {i:3}] duration = {segment_duration:6}, media_time = {media_time:6}, media_rate = {media_rate}"
        ));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn stts(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    let (mut sample, mut time) = (1u64, 0u64);
    for i in 0..entry_count {
        let sample_count = r.u32()?;
        let sample_delta = r.u32()?;
        em.row(i as u64, &format!(
            "[entry {i:3}] [sample = {sample:6}, time = {time:6}] sample_count = {sample_count:5}, sample_delta = {sample_delta:5}"
        ));
        sample += sample_count as u64;
        time += sample_count as u64 * sample_delta as u64;
    }
    em.end_rows(entry_count as u64);
    em.summary(&format!("[samples = {:6}, time = {:6}]", sample - 1, time));
    Ok(())
}

pub fn ctts(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    let mut sample = 1u64;
    for i in 0..entry_count {
        let sample_count = r.u32()?;
        let sample_offset = if version == 0 { r.u32()? as i64 } else { r.i32()? as i64 };
        em.row(i as u64, &format!(
            "[entry {i:3}] [sample = {sample:6}] sample_count = {sample_count:5}, sample_offset = {sample_offset:5}"
        ));
        sample += sample_count as u64;
    }
    em.end_rows(entry_count as u64);
    em.summary(&format!("[samples = {:6}]", sample - 1));
    Ok(())
}

pub fn stsc(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    let mut sample = 1u64;
    let mut last: Option<(u32, u32)> = None;
    for i in 0..entry_count {
        let first_chunk = r.u32()?;
        let samples_per_chunk = r.u32()?;
        let sample_description_index = r.u32()?;
        if let Some((last_chunk, last_spc)) = last {
            ensure!(first_chunk > last_chunk, "non-increasing first_chunk: {first_chunk}");
            sample += last_spc as u64 * (first_chunk - last_chunk) as u64;
        }
        em.row(i as u64, &format!(
            "[entry {i:3}] [sample = {sample:6}] first_chunk = {first_chunk:5}, samples_per_chunk = {samples_per_chunk:4}, sample_description_index = {sample_description_index}"
        ));
        last = Some((first_chunk, samples_per_chunk));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn stsz(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let sample_size = r.u32()?;
    em.field_default("sample_size", sample_size, 0);
    let sample_count = r.u32()?;
    em.field("sample_count", sample_count);
    if sample_size == 0 {
        for i in 0..sample_count {
            let size = r.u32()?;
            em.row(i as u64, &format!("[sample {:6}] sample_size = {size:5}", i + 1));
        }
        em.end_rows(sample_count as u64);
    }
    Ok(())
}

pub fn stz2(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let reserved = r.u24()?;
    ensure!(reserved == 0, "invalid reserved: {reserved}");
    let field_size = r.u8()?;
    ensure!(matches!(field_size, 4 | 8 | 16), "invalid field_size: {field_size}");
    em.field("field_size", field_size);
    let sample_count = r.u32()?;
    em.field("sample_count", sample_count);
    match field_size {
        4 => {
            let mut i = 0u64;
            while i < sample_count as u64 {
                let b = r.u8()?;
                for half in [b >> 4, b & 0xf] {
                    if i >= sample_count as u64 {
                        break;
                    }
                    em.row(i, &format!("[sample {:6}] entry_size = {half:5}", i + 1));
                    i += 1;
                }
            }
        }
        8 => {
            for i in 0..sample_count {
                let size = r.u8()?;
                em.row(i as u64, &format!("[sample {:6}] entry_size = {size:5}", i + 1));
            }
        }
        _ => {
            for i in 0..sample_count {
                let size = r.u16()?;
                em.row(i as u64, &format!("[sample {:6}] entry_size = {size:5}", i + 1));
            }
        }
    }
    em.end_rows(sample_count as u64);
    Ok(())
}

pub fn stco(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let chunk_offset = r.u32()?;
        em.row(i as u64, &format!("[chunk {:5}] offset = {chunk_offset:#08x}", i + 1));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn co64(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let chunk_offset = r.u64()?;
        em.row(i as u64, &format!("[chunk {:5}] offset = {chunk_offset:#016x}", i + 1));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn stss(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let sample_number = r.u32()?;
        em.row(i as u64, &format!("[sync sample {i:5}] sample_number = {sample_number:6}"));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn stsh(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let shadowed = r.u32()?;
        let sync = r.u32()?;
        em.row(i as u64, &format!(
            "[entry {i:3}] shadowed_sample_number = {shadowed:6}, sync_sample_number = {sync:6}"
        ));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn stdp(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let total = r.remaining() / 2;
    let mut i = 0u64;
    while !r.at_end() {
        let priority = r.u16()?;
        em.row(i, &format!("[sample {:6}] priority = {priority:5}", i + 1));
        i += 1;
    }
    em.end_rows(total);
    Ok(())
}

pub fn sdtp(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let total = r.remaining();
    let mut i = 0u64;
    while !r.at_end() {
        let b = r.u8()?;
        let fields = [
            ("is_leading", b >> 6),
            ("sample_depends_on", (b >> 4) & 3),
            ("sample_is_depended_on", (b >> 2) & 3),
            ("sample_has_redundancy", b & 3),
        ];
        let text: Vec<String> = fields
            .iter()
            .map(|(n, v)| format!("{n} = {}", described(em, v, known_boxes::sdtp_value(*v))))
            .collect();
        em.row(i, &format!("[sample {:5}] {}", i + 1, text.join(", ")));
        i += 1;
    }
    em.end_rows(total);
    Ok(())
}

pub fn padb(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let sample_count = r.u32()?;
    em.field("sample_count", sample_count);
    let mut i = 0u64;
    while i < sample_count as u64 {
        let b = r.u8()?;
        for nibble in [b >> 4, b & 0xf] {
            if i >= sample_count as u64 {
                break;
            }
            ensure!(nibble >> 3 == 0, "invalid reserved bit");
            em.row(i, &format!("[sample {:5}] pad = {}", i + 1, nibble & 0x7));
            i += 1;
        }
    }
    em.end_rows(sample_count as u64);
    Ok(())
}

pub fn subs(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let sample_delta = r.u32()?;
        let subsample_count = r.u16()?;
        let mut parts = Vec::new();
        for _ in 0..subsample_count {
            let size = if version == 1 { r.u32()? } else { r.u16()? as u32 };
            let priority = r.u8()?;
            let discardable = r.u8()?;
            let _codec_specific = r.u32()?;
            parts.push(format!("(size = {size}, priority = {priority}, discardable = {discardable})"));
        }
        em.row(i as u64, &format!(
            "[entry {:4}] sample_delta = {sample_delta:6}, subsamples = [{}]",
            i + 1,
            parts.join(", ")
        ));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn cslg(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    em.field("compositionToDTSShift", r.int_v(version)?);
    em.field("leastDecodeToDisplayDelta", r.int_v(version)?);
    em.field("greatestDecodeToDisplayDelta", r.int_v(version)?);
    em.field("compositionStartTime", r.int_v(version)?);
    em.field("compositionEndTime", r.int_v(version)?);
    Ok(())
}

pub fn sbgp(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    em.field("grouping_type", quote(&r.fourcc()?.0));
    if version == 1 {
        em.field("grouping_type_parameter", r.u32()?);
    }
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    let mut sample = 1u64;
    for i in 0..entry_count {
        let sample_count = r.u32()?;
        let group_description_index = r.u32()?;
        em.row(i as u64, &format!(
            "[entry {:5}] [sample = {sample:6}] sample_count = {sample_count:5}, group_description_index = {group_description_index:5}",
            i + 1
        ));
        sample += sample_count as u64;
    }
    em.end_rows(entry_count as u64);
    em.summary(&format!("[samples = {:6}]", sample - 1));
    Ok(())
}

pub fn sgpd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 2, 0, 0)?;
    em.field("grouping_type", quote(&r.fourcc()?.0));
    let mut default_length = 0;
    if version == 1 {
        default_length = r.u32()?;
        em.field("default_length", default_length);
    } else if version >= 2 {
        em.field("default_sample_description_index", r.u32()?);
    }
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        if version != 1 {
            em.warn("sample group entry parsing is only implemented for version 1");
            dump_rest(r, em);
            break;
        }
        em.line(&format!("- entry {}:", i + 1));
        let mut description_length = default_length;
        if description_length == 0 {
            description_length = r.u32()?;
            em.line(&format!("  description_length = {description_length}"));
        }
        let base = r.offset();
        em.hexdump(r.bytes(description_length as usize)?, base);
    }
    Ok(())
}

// ---------- segment indexes ----------

pub fn sidx(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    em.field("reference_ID", r.u32()?);
    em.field("timescale", r.u32()?);
    em.field("earliest_presentation_time", r.uint_v(version)?);
    em.field("first_offset", r.uint_v(version)?);
    ensure!(r.u16()? == 0, "invalid reserved_1");
    let reference_count = r.u16()?;
    em.field("reference_count", reference_count);
    for i in 0..reference_count {
        let mut br = r.bits(4)?;
        let reference_type = br.read_u8(1)?;
        let referenced_size = br.read_u32(31)?;
        let subsegment_duration = r.u32()?;
        let mut br = r.bits(4)?;
        let starts_with_sap = br.read_u8(1)?;
        let sap_type = br.read_u8(3)?;
        let sap_delta_time = br.read_u32(28)?;
        em.row(i as u64, &format!(
            "[reference {i:3}] type = {reference_type}, size = {referenced_size}, duration = {subsegment_duration}, starts_with_SAP = {starts_with_sap}, SAP_type = {sap_type}, SAP_delta_time = {sap_delta_time}"
        ));
    }
    em.end_rows(reference_count as u64);
    Ok(())
}

pub fn ssix(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    let subsegment_count = r.u32()?;
    em.field("subsegment_count", subsegment_count);
    for i in 0..subsegment_count {
        let range_count = r.u32()?;
        let mut ranges = Vec::new();
        for _ in 0..range_count {
            let level = r.u8()?;
            let range_size = r.u24()?;
            ranges.push(format!("(level = {level}, size = {range_size})"));
        }
        em.row(i as u64, &format!("[subsegment {i:3}] ranges = [{}]", ranges.join(", ")));
    }
    em.end_rows(subsegment_count as u64);
    Ok(())
}

// ---------- movie fragments ----------

pub fn trex(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    em.field("track_ID", r.u32()?);
    em.field("default_sample_description_index", r.u32()?);
    em.field("default_sample_duration", r.u32()?);
    em.field("default_sample_size", r.u32()?);
    sample_flags(r, em, "default_sample_flags")
}

pub fn tfhd(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (_, flags) = full_box(r, em, 0, 0x3003b, 0)?;
    em.field("track_ID", r.u32()?);
    if flags & 0x10000 != 0 {
        em.line("duration-is-empty flag set");
    }
    if flags & 0x20000 != 0 {
        em.line("default-base-is-moof flag set");
    }
    if flags & 0x1 != 0 {
        em.field("base_data_offset", r.u64()?);
    }
    if flags & 0x2 != 0 {
        em.field("sample_description_index", r.u32()?);
    }
    if flags & 0x8 != 0 {
        em.field("default_sample_duration", r.u32()?);
    }
    if flags & 0x10 != 0 {
        em.field("default_sample_size", r.u32()?);
    }
    if flags & 0x20 != 0 {
        sample_flags(r, em, "default_sample_flags")?;
    }
    Ok(())
}

pub fn tfdt(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let time = r.uint_v(version)?;
    em.field_desc("baseMediaDecodeTime", time, in_seconds(ctx.timescale, time));
    Ok(())
}

pub fn trun(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, flags) = full_box(r, em, 1, 0xf05, 0)?;
    let sample_count = r.u32()?;
    em.field("sample_count", sample_count);
    if flags & (1 << 0) != 0 {
        em.field("data_offset", format!("{:#x}", r.i32()?));
    }
    if flags & (1 << 2) != 0 {
        sample_flags(r, em, "first_sample_flags")?;
    }

    let mut s_offset = 0u64;
    let mut s_time = 0u64;
    for s_idx in 0..sample_count {
        let mut parts = Vec::new();
        if flags & (1 << 8) != 0 {
            let sample_duration = r.u32()?;
            parts.push(format!("time={s_time:7} + {sample_duration:5}"));
            s_time += sample_duration as u64;
        }
        if flags & (1 << 9) != 0 {
            let sample_size = r.u32()?;
            parts.push(format!("offset={s_offset:#9x} + {sample_size:5}"));
            s_offset += sample_size as u64;
        }
        if flags & (1 << 10) != 0 {
            parts.push(format!("flags={:08x}", r.u32()?));
        }
        if flags & (1 << 11) != 0 {
            let cto = if version == 0 { r.u32()? as i64 } else { r.i32()? as i64 };
            parts.push(format!("{cto}"));
        }
        em.row(s_idx as u64, &format!("[sample {s_idx:4}] {}", parts.join(", ")));
    }
    em.end_rows(sample_count as u64);
    Ok(())
}

pub fn mfro(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    full_box(r, em, 0, 0, 0)?;
    em.field("size", r.u32()?);
    Ok(())
}

pub fn tfra(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    em.field("track_ID", r.u32()?);
    let mut br = r.bits(4)?;
    let reserved = br.read_u32(26)?;
    ensure!(reserved == 0, "invalid reserved: {reserved}");
    let len_traf = br.read_u8(2)? as usize + 1;
    let len_trun = br.read_u8(2)? as usize + 1;
    let len_sample = br.read_u8(2)? as usize + 1;
    let number_of_entry = r.u32()?;
    em.field("number_of_entry", number_of_entry);
    for i in 0..number_of_entry {
        let time = r.uint_v(version)?;
        let moof_offset = r.uint_v(version)?;
        let traf_number = r.uint(len_traf)?;
        let trun_number = r.uint(len_trun)?;
        let sample_number = r.uint(len_sample)?;
        em.row(i as u64, &format!(
            "[entry {i:4}] time = {time:8}, moof_offset = {moof_offset:#10x}, traf = {traf_number}, trun = {trun_number}, sample = {sample_number}"
        ));
    }
    em.end_rows(number_of_entry as u64);
    Ok(())
}

// ---------- sample auxiliary info / DRM ----------

pub fn saiz(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (_, flags) = full_box(r, em, 0, 1, 0)?;
    if flags & 1 != 0 {
        em.field("aux_info_type", quote(&r.fourcc()?.0));
        em.field("aux_info_type_parameter", format!("{:#x}", r.u32()?));
    }
    let default_sample_info_size = r.u8()?;
    em.field("default_sample_info_size", default_sample_info_size);
    let sample_count = r.u32()?;
    em.field("sample_count", sample_count);
    if default_sample_info_size == 0 {
        for i in 0..sample_count {
            let size = r.u8()?;
            em.row(i as u64, &format!("[sample {:6}] sample_info_size = {size:5}", i + 1));
        }
        em.end_rows(sample_count as u64);
    }
    Ok(())
}

pub fn saio(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, flags) = full_box(r, em, 1, 1, 0)?;
    if flags & 1 != 0 {
        em.field("aux_info_type", quote(&r.fourcc()?.0));
        em.field("aux_info_type_parameter", format!("{:#x}", r.u32()?));
    }
    let entry_count = r.u32()?;
    em.field("entry_count", entry_count);
    for i in 0..entry_count {
        let offset = r.uint_v(version)?;
        em.row(i as u64, &format!("[entry {:6}] offset = {offset:#08x}", i + 1));
    }
    em.end_rows(entry_count as u64);
    Ok(())
}

pub fn senc(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (_, flags) = full_box(r, em, 0, 0x3, 0)?;
    let Some(iv_size) = ctx.iv_size else {
        em.warn("Per_Sample_IV_Size not known (no tenc in scope; pass --senc-per-sample-iv)");
        dump_rest(r, em);
        return Ok(());
    };
    let sample_count = r.u32()?;
    em.field("sample_count", sample_count);
    for i in 0..sample_count {
        let iv = hex_str(r.bytes(iv_size as usize)?);
        let mut text = format!("[sample {:4}] iv = {iv}", i + 1);
        if flags & 0x2 != 0 {
            let subsample_count = r.u16()?;
            let mut parts = Vec::new();
            for _ in 0..subsample_count {
                let clear = r.u16()?;
                let protected = r.u32()?;
                parts.push(format!("({clear}, {protected})"));
            }
            text.push_str(&format!(", subsamples = [{}]", parts.join(", ")));
        }
        em.row(i as u64, &text);
    }
    em.end_rows(sample_count as u64);
    Ok(())
}

pub fn tenc(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    ensure!(r.u8()? == 0, "invalid reserved_1");
    if version > 0 {
        let mut br = r.bits(1)?;
        em.field("default_crypt_byte_block", br.read_u8(4)?);
        em.field("default_skip_byte_block", br.read_u8(4)?);
    } else {
        ensure!(r.u8()? == 0, "invalid reserved_2");
    }
    let is_protected = r.u8()?;
    em.field("default_isProtected", is_protected);
    let iv_size = r.u8()?;
    em.field("default_Per_Sample_IV_Size", iv_size);
    ctx.iv_size = Some(iv_size);
    em.field("default_KID", hex_str(r.bytes(16)?));
    if is_protected == 1 && iv_size == 0 {
        let n = r.u8()? as usize;
        em.field("default_constant_IV", hex_str(r.bytes(n)?));
    }
    Ok(())
}

pub fn schm(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (_, flags) = full_box(r, em, 0, 1, 0)?;
    em.field("scheme_type", quote(&r.fourcc()?.0));
    em.field("scheme_version", format!("{:#x}", r.u32()?));
    if flags & 1 != 0 {
        em.field("scheme_uri", quote(r.cstring()?));
    }
    Ok(())
}

pub fn frma(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    em.field("data_format", quote(&r.fourcc()?.0));
    Ok(())
}

pub fn pssh(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let system_id = r.uuid()?;
    let desc = known_boxes::protection_system(&system_id).map(String::from);
    em.field_desc("SystemID", system_id, desc);
    if version > 0 {
        let kid_count = r.u32()?;
        for _ in 0..kid_count {
            em.line(&format!("- KID: {}", hex_str(r.bytes(16)?)));
        }
    }
    let data_size = r.u32()? as usize;
    em.line("Data =");
    let base = r.offset();
    em.hexdump(r.bytes(data_size)?, base);
    Ok(())
}

// ---------- HEIF item boxes ----------

pub fn iloc(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 2, 0, 0)?;
    let mut br = r.bits(2)?;
    let offset_size = br.read_u8(4)? as usize;
    let length_size = br.read_u8(4)? as usize;
    let base_offset_size = br.read_u8(4)? as usize;
    let index_size = if version >= 1 { br.read_u8(4)? as usize } else { br.read_u8(4)?; 0 };
    for s in [offset_size, length_size, base_offset_size, index_size] {
        ensure!(matches!(s, 0 | 4 | 8), "invalid field size: {s}");
    }
    em.field("offset_size", offset_size);
    em.field("length_size", length_size);
    em.field("base_offset_size", base_offset_size);
    if version >= 1 {
        em.field("index_size", index_size);
    }
    let item_count = if version < 2 { r.u16()? as u32 } else { r.u32()? };
    em.field("item_count", item_count);
    for i in 0..item_count {
        let item_id = if version < 2 { r.u16()? as u32 } else { r.u32()? };
        let construction_method = if version >= 1 {
            let mut br = r.bits(2)?;
            let reserved = br.read_u16(12)?;
            ensure!(reserved == 0, "invalid reserved: {reserved}");
            br.read_u8(4)?
        } else {
            0
        };
        let data_reference_index = r.u16()?;
        let base_offset = r.uint(base_offset_size)?;
        let extent_count = r.u16()?;
        let mut extents = Vec::new();
        for _ in 0..extent_count {
            if version >= 1 && index_size > 0 {
                let _extent_index = r.uint(index_size)?;
            }
            let extent_offset = r.uint(offset_size)?;
            let extent_length = r.uint(length_size)?;
            extents.push(format!("({extent_offset:#x}, {extent_length})"));
        }
        em.row(i as u64, &format!(
            "[item {item_id:3}] construction_method = {construction_method}, data_reference_index = {data_reference_index}, base_offset = {base_offset:#x}, extents = [{}]",
            extents.join(", ")
        ));
    }
    em.end_rows(item_count as u64);
    Ok(())
}

pub fn iinf(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let entry_count = if version == 0 { r.u16()? as u32 } else { r.u32()? };
    em.field("entry_count", entry_count);
    let n = parser::parse_boxes(r, em, ctx, Some(FourCC(*b"iinf")))?;
    if n as u32 != entry_count {
        em.warn(&format!("entry_count ({entry_count}) not matching the {n} entries present"));
    }
    Ok(())
}

pub fn infe(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 3, 1, 0)?;
    if version <= 1 {
        em.field("item_ID", r.u16()?);
        em.field("item_protection_index", r.u16()?);
        em.field("item_name", quote(r.cstring()?));
        if !r.at_end() {
            em.field("content_type", quote(r.cstring()?));
        }
        if !r.at_end() {
            em.field("content_encoding", quote(r.cstring()?));
        }
    } else {
        let item_id = if version == 2 { r.u16()? as u32 } else { r.u32()? };
        em.field("item_ID", item_id);
        em.field("item_protection_index", r.u16()?);
        let item_type = r.fourcc()?;
        em.field("item_type", quote(&item_type.0));
        em.field("item_name", quote(r.cstring()?));
        match &item_type.0 {
            b"mime" => {
                em.field("content_type", quote(r.cstring()?));
                if !r.at_end() {
                    em.field("content_encoding", quote(r.cstring()?));
                }
            }
            b"uri " => {
                em.field("item_uri_type", quote(r.cstring()?));
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn pitm(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    let item_id = if version == 0 { r.u16()? as u32 } else { r.u32()? };
    em.field("item_ID", item_id);
    Ok(())
}

pub fn iref(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let (version, _) = full_box(r, em, 1, 0, 0)?;
    parser::parse_boxes_each(r, em, ctx, |_hdr, pr, em, _ctx| {
        let from_item_id = if version == 0 { pr.u16()? as u32 } else { pr.u32()? };
        em.field("from_item_ID", from_item_id);
        let reference_count = pr.u16()?;
        let mut ids = Vec::new();
        for _ in 0..reference_count {
            let id = if version == 0 { pr.u16()? as u32 } else { pr.u32()? };
            ids.push(id.to_string());
        }
        em.field("to_item_IDs", format!("[{}]", ids.join(", ")));
        Ok(())
    })?;
    Ok(())
}

// ---------- QTFF metadata ----------

pub fn ilst(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    parser::parse_boxes_each(r, em, ctx, |_hdr, pr, em, ctx| {
        parser::parse_boxes(pr, em, ctx, None).map(|_| ())
    })?;
    Ok(())
}

pub fn data(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let type_indicator_byte = r.u8()?;
    em.field_default_desc(
        "type_indicator_byte",
        type_indicator_byte,
        0,
        (type_indicator_byte == 0).then(|| "well known type".to_string()),
    );
    let type_indicator = r.u24()?;
    em.field_default_desc(
        "type_indicator_type",
        type_indicator,
        1,
        known_boxes::qtff_type(type_indicator).map(String::from),
    );

    let country = r.bytes(2)?;
    let country_text = if country[0] != 0 { quote(country) } else { country[1].to_string() };
    em.field_default("country_indicator", country_text, "0".to_string());
    let lang = r.bytes(2)?;
    let code = u16::from_be_bytes([lang[0], lang[1]]);
    let lang_text = if lang[0] != 0 {
        decode_language(code).unwrap_or_else(|_| quote(lang))
    } else {
        lang[1].to_string()
    };
    em.field_default("language_indicator", lang_text, "0".to_string());

    match (type_indicator_byte, type_indicator) {
        (0, 1) => em.field("value", quote(r.rest())),
        (0, 21) => {
            let n = r.remaining() as usize;
            ensure!(matches!(n, 1 | 2 | 4 | 8), "invalid integer size: {n}");
            let raw = r.uint(n)?;
            let shift = 64 - 8 * n as u32;
            em.field("value", ((raw << shift) as i64) >> shift);
        }
        (0, 22) => {
            let n = r.remaining() as usize;
            ensure!(matches!(n, 1 | 2 | 4 | 8), "invalid integer size: {n}");
            em.field("value", r.uint(n)?);
        }
        _ => {
            em.line("value =");
            dump_rest(r, em);
        }
    }
    Ok(())
}

/// Payloads we know to be opaque blobs (`xml `-adjacent vendor data, `idat`):
/// header plus hexdump, same as the unknown-type fallback but registered so
/// the box still gets its human name.
pub fn opaque(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    dump_rest(r, em);
    Ok(())
}
