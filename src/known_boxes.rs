//! Static data scraped from the specs: box display names, handler kinds,
//! language codes, protection system IDs, MPEG-4 object / stream types and
//! QTFF well-known value types.

use crate::boxes::FourCC;

/// Human-readable name for a box type, shown next to the four-CC in the
/// header line. Unlisted types render with no name.
pub fn box_name(cc: &FourCC) -> Option<&'static str> {
    Some(match &cc.0 {
        // ISO/IEC 14496-12
        b"ftyp" => "FileType",
        b"styp" => "SegmentType",
        b"mdat" => "MediaData",
        b"free" => "FreeSpace",
        b"skip" => "FreeSpace",
        b"moov" => "Movie",
        b"mvhd" => "MovieHeader",
        b"trak" => "Track",
        b"tkhd" => "TrackHeader",
        b"tref" => "TrackReference",
        b"mdia" => "Media",
        b"mdhd" => "MediaHeader",
        b"hdlr" => "Handler",
        b"minf" => "MediaInformation",
        b"vmhd" => "VideoMediaHeader",
        b"smhd" => "SoundMediaHeader",
        b"hmhd" => "HintMediaHeader",
        b"nmhd" => "NullMediaHeader",
        b"sthd" => "SubtitleMediaHeader",
        b"elng" => "ExtendedLanguage",
        b"stbl" => "SampleTable",
        b"stsd" => "SampleDescription",
        b"stts" => "TimeToSample",
        b"ctts" => "CompositionOffset",
        b"cslg" => "CompositionToDecode",
        b"stss" => "SyncSample",
        b"stsh" => "ShadowSyncSample",
        b"sdtp" => "SampleDependencyType",
        b"stdp" => "DegradationPriority",
        b"stsc" => "SampleToChunk",
        b"stsz" => "SampleSize",
        b"stz2" => "CompactSampleSize",
        b"stco" => "ChunkOffset",
        b"co64" => "ChunkLargeOffset",
        b"padb" => "PaddingBits",
        b"subs" => "SubSampleInformation",
        b"sbgp" => "SampleToGroup",
        b"sgpd" => "SampleGroupDescription",
        b"saiz" => "SampleAuxiliaryInformationSizes",
        b"saio" => "SampleAuxiliaryInformationOffsets",
        b"edts" => "Edit",
        b"elst" => "EditList",
        b"dinf" => "DataInformation",
        b"dref" => "DataReference",
        b"url " => "DataEntryUrl",
        b"urn " => "DataEntryUrn",
        b"udta" => "UserData",
        b"cprt" => "Copyright",
        b"mvex" => "MovieExtends",
        b"mehd" => "MovieExtendsHeader",
        b"trex" => "TrackExtends",
        b"moof" => "MovieFragment",
        b"mfhd" => "MovieFragmentHeader",
        b"traf" => "TrackFragment",
        b"tfhd" => "TrackFragmentHeader",
        b"tfdt" => "TrackFragmentBaseMediaDecodeTime",
        b"trun" => "TrackRun",
        b"mfra" => "MovieFragmentRandomAccess",
        b"tfra" => "TrackFragmentRandomAccess",
        b"mfro" => "MovieFragmentRandomAccessOffset",
        b"sidx" => "SegmentIndex",
        b"ssix" => "SubsegmentIndex",
        b"prft" => "ProducerReferenceTime",
        b"meta" => "Meta",
        b"xml " => "XML",
        b"bxml" => "BinaryXML",
        b"iloc" => "ItemLocation",
        b"pitm" => "PrimaryItem",
        b"ipro" => "ItemProtection",
        b"iinf" => "ItemInfo",
        b"infe" => "ItemInfoEntry",
        b"iref" => "ItemReference",
        b"idat" => "ItemData",
        b"iprp" => "ItemProperties",
        b"ipco" => "ItemPropertyContainer",
        b"meco" => "AdditionalMetadataContainer",
        b"mere" => "MetaboxRelation",
        b"sinf" => "ProtectionSchemeInfo",
        b"rinf" => "RestrictedSchemeInfo",
        b"frma" => "OriginalFormat",
        b"schm" => "SchemeType",
        b"schi" => "SchemeInformation",
        b"strk" => "SubTrack",
        b"stri" => "SubTrackInformation",
        b"strd" => "SubTrackDefinition",
        b"btrt" => "BitRate",
        b"pasp" => "PixelAspectRatio",
        b"clap" => "CleanAperture",
        b"colr" => "ColourInformation",
        b"hnti" => "MovieHintInformation",
        // ISO/IEC 14496-14
        b"iods" => "ObjectDescriptor",
        b"esds" => "ESDescriptor",
        b"mp4v" => "MP4VisualSampleEntry",
        b"mp4a" => "MP4AudioSampleEntry",
        b"mp4s" => "MpegSampleEntry",
        b"m4ds" => "MPEG4ExtensionDescriptors",
        // ISO/IEC 14496-15
        b"avcC" => "AVCConfiguration",
        b"avc1" | b"avc3" => "AVCSampleEntry",
        b"avc2" | b"avc4" => "AVC2SampleEntry",
        b"svcC" => "SVCConfiguration",
        b"hvcC" => "HEVCConfiguration",
        b"hvc1" | b"hev1" => "HEVCSampleEntry",
        // ISO/IEC 23001-7 (common encryption)
        b"senc" => "SampleEncryption",
        b"pssh" => "ProtectionSystemSpecificHeader",
        b"tenc" => "TrackEncryption",
        b"encv" => "EncryptedVideoSampleEntry",
        b"enca" => "EncryptedAudioSampleEntry",
        // Opus / AV1 bindings
        b"Opus" => "OpusSampleEntry",
        b"dOps" => "OpusSpecific",
        b"av01" => "AV1SampleEntry",
        b"av1C" => "AV1CodecConfiguration",
        b"av1f" => "AV1ForwardKeyFrame",
        // Text / metadata sample entries
        b"metx" => "XMLMetaDataSampleEntry",
        b"mett" => "TextMetaDataSampleEntry",
        b"urim" => "URIMetaSampleEntry",
        b"stxt" => "SimpleTextSampleEntry",
        b"stpp" => "XMLSubtitleSampleEntry",
        b"sbtt" => "TextSubtitleSampleEntry",
        // QTFF
        b"wave" => "DecompressionParam",
        b"ilst" => "MetadataItemList",
        b"data" => "Value",
        b"\xa9nam" => "Name",
        b"\xa9ART" => "Artist",
        b"\xa9alb" => "Album",
        b"\xa9day" => "Year",
        b"\xa9too" => "EncodingTool",
        b"\xa9cmt" => "Comment",
        b"\xa9gen" => "Genre",
        b"\xa9wrt" => "Composer",
        b"trkn" => "TrackNumber",
        b"covr" => "CoverArt",
        b"cpil" => "Compilation",
        // ad-hoc
        b"ID32" => "ID3v2",
        _ => return None,
    })
}

/// Names of registered `uuid` extended types.
pub fn uuid_name(uuid: &[u8; 16]) -> Option<&'static str> {
    match uuid {
        &PIFF_SENC => Some("PIFF SampleEncryption"),
        &PIFF_TENC => Some("PIFF TrackEncryption"),
        _ => None,
    }
}

/// PIFF 1.1 SampleEncryption, a2394f52-5a9b-4f14-a244-6c427c648df4.
pub const PIFF_SENC: [u8; 16] = [
    0xa2, 0x39, 0x4f, 0x52, 0x5a, 0x9b, 0x4f, 0x14,
    0xa2, 0x44, 0x6c, 0x42, 0x7c, 0x64, 0x8d, 0xf4,
];
/// PIFF 1.1 TrackEncryption, 8974dbce-7be7-4c51-84f9-7148f9882554.
pub const PIFF_TENC: [u8; 16] = [
    0x89, 0x74, 0xdb, 0xce, 0x7b, 0xe7, 0x4c, 0x51,
    0x84, 0xf9, 0x71, 0x48, 0xf9, 0x88, 0x25, 0x54,
];

pub fn handler_name(cc: &FourCC) -> Option<&'static str> {
    Some(match &cc.0 {
        b"vide" => "Video track",
        b"soun" => "Audio track",
        b"hint" => "Hint track",
        b"meta" => "Timed metadata track",
        b"text" => "Text track",
        b"subt" => "Subtitle track",
        b"auxv" => "Auxiliary video track",
        b"mdir" => "Apple metadata",
        b"mdta" => "Metadata tags",
        _ => return None,
    })
}

/// ISO 639-2/T names for the codes commonly seen in `mdhd` / `data` boxes.
pub fn language_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "und" => "Undetermined",
        "mul" => "Multiple languages",
        "zxx" => "No linguistic content",
        "ara" => "Arabic",
        "bul" => "Bulgarian",
        "cat" => "Catalan",
        "ces" => "Czech",
        "dan" => "Danish",
        "deu" => "German",
        "ell" => "Greek",
        "eng" => "English",
        "est" => "Estonian",
        "eus" => "Basque",
        "fas" => "Persian",
        "fin" => "Finnish",
        "fil" => "Filipino",
        "fra" => "French",
        "heb" => "Hebrew",
        "hin" => "Hindi",
        "hrv" => "Croatian",
        "hun" => "Hungarian",
        "ind" => "Indonesian",
        "ita" => "Italian",
        "jpn" => "Japanese",
        "kor" => "Korean",
        "lav" => "Latvian",
        "lit" => "Lithuanian",
        "msa" => "Malay",
        "nld" => "Dutch",
        "nor" => "Norwegian",
        "pol" => "Polish",
        "por" => "Portuguese",
        "ron" => "Romanian",
        "rus" => "Russian",
        "slk" => "Slovak",
        "slv" => "Slovenian",
        "spa" => "Spanish",
        "srp" => "Serbian",
        "swe" => "Swedish",
        "tha" => "Thai",
        "tur" => "Turkish",
        "ukr" => "Ukrainian",
        "vie" => "Vietnamese",
        "zho" => "Chinese",
        _ => return None,
    })
}

/// DASH-IF registered protection system identifiers, for `pssh` SystemIDs.
pub fn protection_system(uuid: &str) -> Option<&'static str> {
    Some(match uuid {
        "edef8ba9-79d6-4ace-a3c8-27dcd51d21ed" => "Widevine Content Protection",
        "9a04f079-9840-4286-ab92-e65be0885f95" => "Microsoft PlayReady",
        "94ce86fb-07ff-4f43-adb8-93d2fa968ca2" => "Apple FairPlay",
        "f239e769-efa3-4850-9c16-a903c6932efb" => "Adobe Primetime DRM version 4",
        "3ea8778f-7742-4bf9-b18b-e834b2acbd47" => "Clear Key AES-128",
        "be58615b-19c4-4684-88b3-c8c57e99e957" => "Clear Key SAMPLE-AES",
        "e2719d58-a985-b3c9-781a-b030af78d30e" => "Clear Key DASH-IF",
        "1077efec-c0b2-4d02-ace3-3c1e52e2fb4b" => "W3C Common PSSH box",
        "5e629af5-38da-4063-8977-97ffbd9902d4" => "Marlin Adaptive Streaming Simple Profile V1.0",
        "adb41c24-2dbf-4a6d-958b-4457c0d27b95" => "Nagra MediaAccess PRM 3.0",
        "9a27dd82-fde2-4725-8cbc-4234aa06ec09" => "Verimatrix VCAS",
        "80a6be7e-1448-4c37-9e70-d5aebe04c8d2" => "Irdeto Content Protection",
        "a68129d3-575b-4f1a-9cba-3223846cf7c3" => "Synamedia/Cisco/NDS VideoGuard DRM",
        "35bf197b-530e-42d7-8b65-1b4bf415070f" => "DivX DRM Series 5",
        "6dd8b3c3-45f4-4a68-bf3a-64168d01a4a6" => "ABV DRM (MoDRM)",
        _ => return None,
    })
}

/// MP4RA `objectTypeIndication` registry (short names where assigned).
/// Returns `(name, withdrawn)`.
pub fn object_type(oti: u8) -> Option<(&'static str, bool)> {
    Some(match oti {
        0x01 | 0x02 => ("Systems ISO/IEC 14496-1", false),
        0x03 => ("Interaction Stream", false),
        0x04 => ("Extended BIFS", false),
        0x05 => ("AFX Stream", false),
        0x06 => ("Font Data Stream", false),
        0x08 => ("Text Stream", false),
        0x20 => ("MPEG-4 Video", false),
        0x21 => ("H.264 / AVC", false),
        0x22 => ("H.264 / AVC (PPS / SPS)", false),
        0x23 => ("H.265 / HEVC", false),
        0x40 => ("AAC", false),
        0x60 => ("MPEG-2 Video (Simple Profile)", false),
        0x61 => ("MPEG-2 Video (Main Profile)", false),
        0x62 => ("MPEG-2 Video (SNR Profile)", false),
        0x63 => ("MPEG-2 Video (Spatial Profile)", false),
        0x64 => ("MPEG-2 Video (High Profile)", false),
        0x65 => ("MPEG-2 Video (422 Profile)", false),
        0x66 => ("MPEG-2 AAC", false),
        0x67 => ("MPEG-2 AAC-LC", false),
        0x68 => ("MPEG-2 AAC-SSR", false),
        0x69 => ("MPEG-2 BC Audio", false),
        0x6A => ("MPEG-1 Video", false),
        0x6B => ("MPEG-1 Audio (usually MP3)", false),
        0x6C => ("JPEG", false),
        0x6D => ("PNG", false),
        0x6E => ("JPEG 2000", false),
        0xA3 => ("SMPTE VC-1 Video", false),
        0xA4 => ("Dirac Video Coder", false),
        0xA5 => ("AC-3", true),
        0xA6 => ("Enhanced AC-3", true),
        0xA9 => ("Core Substream", false),
        0xAD => ("Opus", false),
        0xAE => ("AC-4", true),
        0xB1 => ("VP9", false),
        _ => return None,
    })
}

/// ISO/IEC 14496-1 `streamType` values.
pub fn stream_type(sti: u8) -> Option<&'static str> {
    Some(match sti {
        0x01 => "ObjectDescriptorStream",
        0x02 => "ClockReferenceStream",
        0x03 => "SceneDescriptionStream",
        0x04 => "VisualStream",
        0x05 => "AudioStream",
        0x06 => "MPEG7Stream",
        0x07 => "IPMPStream",
        0x08 => "ObjectContentInfoStream",
        0x09 => "MPEGJStream",
        0x0A => "Interaction Stream",
        0x0B => "IPMPToolStream",
        0x0C => "FontDataStream",
        0x0D => "StreamingText",
        _ => return None,
    })
}

/// QTFF metadata well-known value types (the `data` box type indicator).
pub fn qtff_type(t: u32) -> Option<&'static str> {
    Some(match t {
        0 => "reserved (binary)",
        1 => "UTF-8",
        2 => "UTF-16",
        4 => "UTF-8 sort",
        13 => "JPEG",
        14 => "PNG",
        21 => "BE signed integer",
        22 => "BE unsigned integer",
        23 => "BE float32",
        24 => "BE float64",
        27 => "BMP",
        28 => "QuickTime metadata atom",
        _ => return None,
    })
}

/// Shared value space of `sdtp` fields and the fragment `sample_flags`.
pub fn sdtp_value(v: u8) -> &'static str {
    match v {
        0 => "unknown",
        1 => "yes",
        2 => "no",
        _ => "reserved",
    }
}

pub fn colour_type_name(cc: &FourCC) -> Option<&'static str> {
    Some(match &cc.0 {
        b"nclx" => "on-screen colours",
        b"rICC" => "restricted ICC profile",
        b"prof" => "unrestricted ICC profile",
        _ => return None,
    })
}
