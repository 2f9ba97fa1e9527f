//! Registry of box parsers. Dispatch over the grammar family is a table
//! keyed by four-CC (optionally qualified by the parent type for boxes whose
//! grammar depends on context), plus a secondary table for `uuid` extended
//! types. The set is closed and registered once at startup.

use crate::boxes::{BoxKey, FourCC};
use crate::emit::Emitter;
use crate::grammars;
use crate::known_boxes::{PIFF_SENC, PIFF_TENC};
use crate::parser::Context;
use crate::reader::Reader;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A box parser dissects one payload: reads fields, emits them, recurses
/// into children where the grammar nests.
pub type BoxParseFn = fn(&mut Reader<'_>, &mut Emitter<'_>, &mut Context) -> anyhow::Result<()>;

pub struct Registry {
    map: HashMap<BoxKey, BoxParseFn>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { map: HashMap::new() }
    }

    pub fn with(mut self, typ: &[u8; 4], f: BoxParseFn) -> Self {
        self.map.insert(BoxKey::FourCC(FourCC(*typ)), f);
        self
    }

    /// Register a parser that only applies under a specific parent box.
    pub fn with_under(mut self, parent: &[u8; 4], typ: &[u8; 4], f: BoxParseFn) -> Self {
        self.map.insert(BoxKey::Qualified(FourCC(*parent), FourCC(*typ)), f);
        self
    }

    pub fn with_uuid(mut self, uuid: [u8; 16], f: BoxParseFn) -> Self {
        self.map.insert(BoxKey::Uuid(uuid), f);
        self
    }

    /// Two-level lookup: the parent-qualified key first, then the plain one.
    pub fn lookup(&self, parent: Option<FourCC>, typ: FourCC) -> Option<BoxParseFn> {
        if let Some(p) = parent {
            if let Some(f) = self.map.get(&BoxKey::Qualified(p, typ)) {
                return Some(*f);
            }
        }
        self.map.get(&BoxKey::FourCC(typ)).copied()
    }

    pub fn lookup_uuid(&self, uuid: &[u8; 16]) -> Option<BoxParseFn> {
        self.map.get(&BoxKey::Uuid(*uuid)).copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry used by the driver, built once on first use.
pub fn global() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(default_registry)
}

pub fn default_registry() -> Registry {
    Registry::new()
        // plain containers
        .with(b"moov", grammars::container)
        .with(b"mdia", grammars::container)
        .with(b"minf", grammars::container)
        .with(b"stbl", grammars::container)
        .with(b"dinf", grammars::container)
        .with(b"edts", grammars::container)
        .with(b"udta", grammars::container)
        .with(b"mvex", grammars::container)
        .with(b"moof", grammars::container)
        .with(b"traf", grammars::container)
        .with(b"mfra", grammars::container)
        .with(b"sinf", grammars::container)
        .with(b"schi", grammars::container)
        .with(b"ipro", grammars::container)
        .with(b"iprp", grammars::container)
        .with(b"ipco", grammars::container)
        .with(b"rinf", grammars::container)
        .with(b"meco", grammars::container)
        .with(b"strk", grammars::container)
        .with(b"strd", grammars::container)
        .with(b"tref", grammars::container)
        .with(b"wave", grammars::container)
        .with(b"hnti", grammars::container)
        // containers that open a context frame
        .with(b"trak", grammars::trak)
        .with(b"meta", grammars::meta)
        // header boxes
        .with(b"ftyp", grammars::ftyp)
        .with(b"styp", grammars::ftyp)
        .with(b"free", grammars::free)
        .with(b"skip", grammars::free)
        .with(b"mvhd", grammars::mvhd)
        .with(b"tkhd", grammars::tkhd)
        .with(b"mdhd", grammars::mdhd)
        .with(b"mehd", grammars::mehd)
        .with(b"mfhd", grammars::mfhd)
        .with(b"hdlr", grammars::hdlr)
        .with(b"smhd", grammars::smhd)
        .with(b"vmhd", grammars::vmhd)
        .with(b"hmhd", grammars::hmhd)
        .with(b"nmhd", grammars::nmhd)
        .with(b"elng", grammars::elng)
        .with(b"cprt", grammars::cprt)
        .with(b"ID32", grammars::id32)
        .with(b"xml ", grammars::xml_box)
        .with(b"bxml", grammars::xml_box)
        .with(b"idat", grammars::opaque)
        // data references
        .with(b"dref", grammars::dref)
        .with_under(b"dref", b"url ", grammars::url_entry)
        .with_under(b"dref", b"urn ", grammars::urn_entry)
        // sample descriptions and codec configuration
        .with(b"stsd", grammars::stsd)
        .with(b"btrt", grammars::btrt)
        .with(b"pasp", grammars::pasp)
        .with(b"clap", grammars::clap)
        .with(b"colr", grammars::colr)
        .with(b"avcC", grammars::avcc)
        .with(b"svcC", grammars::svcc)
        .with(b"hvcC", grammars::hvcc)
        .with(b"av1C", grammars::av1c)
        .with(b"av1f", grammars::av1f)
        .with(b"dOps", grammars::dops)
        .with(b"esds", grammars::esds)
        .with(b"iods", grammars::esds)
        .with(b"m4ds", grammars::m4ds)
        // edit lists and sample tables
        .with(b"elst", grammars::elst)
        .with(b"stts", grammars::stts)
        .with(b"ctts", grammars::ctts)
        .with(b"stsc", grammars::stsc)
        .with(b"stsz", grammars::stsz)
        .with(b"stz2", grammars::stz2)
        .with(b"stco", grammars::stco)
        .with(b"co64", grammars::co64)
        .with(b"stss", grammars::stss)
        .with(b"stsh", grammars::stsh)
        .with(b"stdp", grammars::stdp)
        .with(b"sdtp", grammars::sdtp)
        .with(b"padb", grammars::padb)
        .with(b"subs", grammars::subs)
        .with(b"cslg", grammars::cslg)
        .with(b"sbgp", grammars::sbgp)
        .with(b"sgpd", grammars::sgpd)
        // segment indexes
        .with(b"sidx", grammars::sidx)
        .with(b"ssix", grammars::ssix)
        // movie fragments
        .with(b"trex", grammars::trex)
        .with(b"tfhd", grammars::tfhd)
        .with(b"tfdt", grammars::tfdt)
        .with(b"trun", grammars::trun)
        .with(b"mfro", grammars::mfro)
        .with(b"tfra", grammars::tfra)
        // sample auxiliary info and DRM
        .with(b"saiz", grammars::saiz)
        .with(b"saio", grammars::saio)
        .with(b"senc", grammars::senc)
        .with(b"tenc", grammars::tenc)
        .with(b"schm", grammars::schm)
        .with(b"frma", grammars::frma)
        .with(b"pssh", grammars::pssh)
        // HEIF item boxes
        .with(b"iloc", grammars::iloc)
        .with(b"iinf", grammars::iinf)
        .with(b"infe", grammars::infe)
        .with(b"pitm", grammars::pitm)
        .with(b"iref", grammars::iref)
        // QTFF metadata
        .with(b"ilst", grammars::ilst)
        .with(b"data", grammars::data)
        // vendor uuid boxes (PIFF carries senc/tenc equivalents)
        .with_uuid(PIFF_SENC, grammars::senc)
        .with_uuid(PIFF_TENC, grammars::tenc)
}
