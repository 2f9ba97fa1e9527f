//! MPEG-4 part 1 descriptors (ISO/IEC 14496-1), as found inside
//! `esds` / `iods` / `m4ds`. They aren't ISOBMFF structures strictly
//! speaking, but they're part of MPEG-4 and not widely known, so we make an
//! exception and dissect them instead of dumping.

use crate::emit::{quote, py_bool, Emitter};
use crate::known_boxes;
use crate::parser::Context;
use crate::reader::Reader;
use anyhow::{bail, ensure, Result};

/// Class name for a tag in the "default" descriptor namespace.
fn tag_name(tag: u8) -> Option<&'static str> {
    Some(match tag {
        0x01 => "ObjectDescriptor",
        0x02 => "InitialObjectDescriptor",
        0x03 => "ES_Descriptor",
        0x04 => "DecoderConfigDescriptor",
        0x05 => "DecoderSpecificInfo",
        0x06 => "SLConfigDescriptor",
        0x07 => "ContentIdentificationDescriptor",
        0x08 => "SupplementaryContentIdentificationDescriptor",
        0x09 => "IPI_DescrPointer",
        0x0a => "IPMP_DescriptorPointer",
        0x0b => "IPMP_Descriptor",
        0x0c => "QoS_Descriptor",
        0x0d => "RegistrationDescriptor",
        0x0e => "ES_ID_Inc",
        0x0f => "ES_ID_Ref",
        0x10 => "MP4InitialObjectDescriptor",
        0x11 => "MP4ObjectDescriptor",
        0x13 => "ExtensionProfileLevelDescriptor",
        0x14 => "ProfileLevelIndicationIndexDescriptor",
        0x40 => "ContentClassificationDescriptor",
        0x41 => "KeyWordDescriptor",
        0x42 => "RatingDescriptor",
        0x43 => "LanguageDescriptor",
        0x44 => "ShortTextualDescriptor",
        0x45 => "ExpandedTextualDescriptor",
        0x46 => "ContentCreatorNameDescriptor",
        0x47 => "ContentCreationDateDescriptor",
        0x48 => "OCICreatorNameDescriptor",
        0x49 => "OCICreationDateDescriptor",
        0x4a => "SmpteCameraPositionDescriptor",
        0x4b => "SegmentDescriptor",
        0x4c => "MediaTimeDescriptor",
        0x60 => "IPMP_ToolListDescriptor",
        0x61 => "IPMP_Tool",
        0x62 => "M4MuxTimingDescriptor",
        0x63 => "M4MuxCodeTableDescriptor",
        0x64 => "ExtendedSLConfigDescriptor",
        0x65 => "M4MuxBufferSizeDescriptor",
        0x66 => "M4MuxIdentDescriptor",
        0x67 => "DependencyPointer",
        0x68 => "MarkerDescriptor",
        0x69 => "M4MuxChannelDescriptor",
        _ => return None,
    })
}

/// Unregistered tags still get a label: the class range they fall in, or the
/// reserved / user-private split of the tag space.
fn tag_label(tag: u8) -> String {
    if let Some(name) = tag_name(tag) {
        return name.to_string();
    }
    if (0x40..0x60).contains(&tag) {
        "OCI_Descriptor".to_string()
    } else if (0x6a..0xff).contains(&tag) {
        "ExtensionDescriptor".to_string()
    } else if tag < 0xc0 {
        "reserved for ISO use".to_string()
    } else {
        "user private".to_string()
    }
}

pub fn parse_descriptors(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    while !r.at_end() {
        parse_descriptor(r, em, ctx)?;
    }
    Ok(())
}

/// Descriptor framing is centralized here: 1-byte tag, then a BER-style
/// size (7 bits per byte, high bit = continuation, at most 4 bytes).
pub fn parse_descriptor(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let tag = r.u8()?;
    ensure!(tag != 0x00 && tag != 0xff, "forbidden tag number: {tag}");

    let mut size: u64 = 0;
    let mut n_size_bytes = 0u32;
    loop {
        let b = r.u8()?;
        n_size_bytes += 1;
        ensure!(n_size_bytes <= 4, "descriptor size field too long");
        size = (size << 7) | (b & 0x7f) as u64;
        if b & 0x80 == 0 {
            break;
        }
    }
    // note over-long encodings: the size would have fit in fewer bytes
    let bit_length = 64 - size.leading_zeros();
    let note = (n_size_bytes > 1 && bit_length <= (n_size_bytes - 1) * 7)
        .then(|| format!("{n_size_bytes} length bytes"));

    let mut body = r.sub(size)?;
    em.open_desc(tag, &tag_label(tag), note);
    let result = dispatch(tag, &mut body, em, ctx);
    match result {
        Ok(()) => {
            // leftover payload (e.g. descriptor extensions) is dumped as-is
            let base = body.offset();
            em.hexdump(body.rest(), base);
        }
        Err(e) => {
            em.error(&format!("{e:#}"));
            let base = body.offset();
            em.hexdump(body.rest(), base);
        }
    }
    em.close_desc();
    Ok(())
}

fn dispatch(tag: u8, r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    match tag {
        0x02 | 0x10 => initial_object_descriptor(r, em, ctx),
        0x03 => es_descriptor(r, em, ctx),
        0x04 => decoder_config_descriptor(r, em, ctx),
        0x06 => sl_config_descriptor(r, em, ctx),
        0x0e => {
            em.field("Track_ID", r.u32()?);
            Ok(())
        }
        0x0f => {
            em.field("ref_index", r.u16()?);
            Ok(())
        }
        // ExtendedSLConfigDescriptor extends SLConfigDescriptor: its base
        // fields come first, then child descriptors
        0x64 => {
            sl_config_descriptor(r, em, ctx)?;
            parse_descriptors(r, em, ctx)
        }
        _ => Ok(()), // unknown or opaque (incl. 0x05 DecoderSpecificInfo): hexdumped by the caller
    }
}

fn es_descriptor(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    em.field("ES_ID", r.u16()?);
    let mut br = r.bits(1)?;
    let stream_dependence = br.read_bool()?;
    let url_flag = br.read_bool()?;
    let ocr_stream = br.read_bool()?;
    em.field("streamPriority", br.read_u8(5)?);
    if stream_dependence {
        em.field("dependsOn_ES_ID", r.u16()?);
    }
    if url_flag {
        let n = r.u8()? as usize;
        em.field("URL", quote(r.bytes(n)?));
    }
    if ocr_stream {
        em.field("OCR_ES_ID", r.u16()?);
    }
    parse_descriptors(r, em, ctx)
}

fn describe_object_type(oti: u8) -> Option<String> {
    if oti == 0xff {
        return Some("no object type specified".to_string());
    }
    if let Some((name, withdrawn)) = known_boxes::object_type(oti) {
        let mut d = name.to_string();
        if withdrawn {
            d.push_str(" (withdrawn, unused, do not use)");
        }
        return Some(d);
    }
    Some(if oti < 0xc0 { "reserved for ISO use" } else { "user private" }.to_string())
}

fn describe_stream_type(sti: u8) -> Option<String> {
    if let Some(name) = known_boxes::stream_type(sti) {
        return Some(name.to_string());
    }
    Some(if sti < 0x20 { "reserved for ISO use" } else { "user private" }.to_string())
}

fn decoder_config_descriptor(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let oti = r.u8()?;
    ensure!(oti != 0x00, "forbidden object type");
    em.field_desc("objectTypeIndication", oti, describe_object_type(oti));
    let mut br = r.bits(4)?;
    let stream_type = br.read_u8(6)?;
    ensure!(stream_type != 0x00, "forbidden stream type");
    em.field_desc("streamType", stream_type, describe_stream_type(stream_type));
    em.field("upStream", py_bool(br.read_bool()?));
    let reserved = br.read_u8(1)?;
    ensure!(reserved == 1, "invalid reserved: {reserved}");
    em.field("bufferSizeDB", br.read_u32(24)?);
    em.field("maxBitrate", r.u32()?);
    em.field("avgBitrate", r.u32()?);
    parse_descriptors(r, em, ctx)
}

fn describe_sl_predefined(predefined: u8) -> String {
    match predefined {
        0x00 => "Custom".to_string(),
        0x01 => "null SL packet header".to_string(),
        0x02 => "Reserved for use in MP4 files".to_string(),
        _ => "Reserved for ISO use".to_string(),
    }
}

fn sl_config_descriptor(r: &mut Reader, em: &mut Emitter, _ctx: &mut Context) -> Result<()> {
    let predefined = r.u8()?;
    em.field_desc("predefined", predefined, Some(describe_sl_predefined(predefined)));
    if predefined != 0 {
        return Ok(());
    }

    let mut br = r.bits(1)?;
    em.field("useAccessUnitStartFlag", py_bool(br.read_bool()?));
    em.field("useAccessUnitEndFlag", py_bool(br.read_bool()?));
    em.field("useRandomAccessPointFlag", py_bool(br.read_bool()?));
    em.field("hasRandomAccessUnitsOnlyFlag", py_bool(br.read_bool()?));
    em.field("usePaddingFlag", py_bool(br.read_bool()?));
    let use_time_stamps = br.read_bool()?;
    em.field("useTimeStampsFlag", py_bool(use_time_stamps));
    em.field("useIdleFlag", py_bool(br.read_bool()?));
    let duration_flag = br.read_bool()?;
    em.field("durationFlag", py_bool(duration_flag));
    em.field("timeStampResolution", r.u32()?);
    em.field("OCRResolution", r.u32()?);
    let time_stamp_length = r.u8()?;
    ensure!(time_stamp_length <= 64, "invalid timeStampLength: {time_stamp_length}");
    em.field("timeStampLength", time_stamp_length);
    let ocr_length = r.u8()?;
    ensure!(ocr_length <= 64, "invalid OCRLength: {ocr_length}");
    em.field("OCRLength", ocr_length);
    let au_length = r.u8()?;
    ensure!(au_length <= 32, "invalid AU_Length: {au_length}");
    em.field("AU_Length", au_length);
    em.field("instantBitrateLength", r.u8()?);
    let mut br = r.bits(2)?;
    em.field("degradationPriorityLength", br.read_u8(4)?);
    let au_seq_num_length = br.read_u8(5)?;
    ensure!(au_seq_num_length <= 16, "invalid AU_seqNumLength: {au_seq_num_length}");
    em.field("AU_seqNumLength", au_seq_num_length);
    let packet_seq_num_length = br.read_u8(5)?;
    ensure!(packet_seq_num_length <= 16, "invalid packetSeqNumLength: {packet_seq_num_length}");
    em.field("packetSeqNumLength", packet_seq_num_length);
    let reserved = br.read_u8(2)?;
    ensure!(reserved == 0b11, "invalid reserved: {reserved}");
    if duration_flag {
        em.field("timeScale", r.u32()?);
        em.field("accessUnitDuration", r.u16()?);
        em.field("compositionUnitDuration", r.u16()?);
    }
    if !use_time_stamps {
        bail!("start time stamps not supported (useTimeStampsFlag = 0)");
    }
    Ok(())
}

fn initial_object_descriptor(r: &mut Reader, em: &mut Emitter, ctx: &mut Context) -> Result<()> {
    let mut br = r.bits(2)?;
    em.field("ObjectDescriptorID", br.read_u16(10)?);
    let url_flag = br.read_bool()?;
    em.field("includeInlineProfileLevelFlag", py_bool(br.read_bool()?));
    let reserved = br.read_u8(4)?;
    ensure!(reserved == 0xf, "invalid reserved: {reserved}");
    if url_flag {
        let n = r.u8()? as usize;
        em.field("URLstring", quote(r.bytes(n)?));
    } else {
        em.field("ODProfileLevelIndication", r.u8()?);
        em.field("sceneProfileLevelIndication", r.u8()?);
        em.field("audioProfileLevelIndication", r.u8()?);
        em.field("visualProfileLevelIndication", r.u8()?);
        em.field("graphicsProfileLevelIndication", r.u8()?);
    }
    parse_descriptors(r, em, ctx)
}
