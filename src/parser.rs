//! Dissector driver: box-header framing, the recursive descent over box
//! sequences, and the per-box error boundary that keeps one malformed box
//! from taking down the rest of the tree.

use crate::boxes::{BoxHeader, FourCC};
use crate::emit::{Emitter, Options};
use crate::known_boxes;
use crate::reader::{ReadError, Reader};
use crate::registry;
use anyhow::Context as _;

/// Cross-box state, threaded through parser calls as explicit frames instead
/// of globals. `trak`/`meta` clone a frame for their subtree; only the
/// `tenc` IV size is copied back out (a `moov`-scoped `tenc` must still be
/// visible to a `moof`-scoped `senc`).
#[derive(Debug, Clone)]
pub struct Context {
    /// Handler type of the enclosing track, set by `hdlr`. Selects the
    /// sample-entry grammar used inside `stsd`.
    pub handler: Option<FourCC>,
    /// Media/movie timescale, set by `mvhd`/`mdhd`. Annotates durations.
    pub timescale: Option<u32>,
    /// `tenc.default_Per_Sample_IV_Size`, or the `--senc-per-sample-iv`
    /// override when no `tenc` has been seen.
    pub iv_size: Option<u8>,
}

impl Context {
    pub fn new(opts: &Options) -> Self {
        Context {
            handler: None,
            timescale: None,
            iv_size: opts.senc_per_sample_iv,
        }
    }
}

/// Read one box header: 32-bit size + type, 64-bit `largesize` when the
/// 32-bit size is 1, "to end of enclosing region" when it is 0, and the
/// 16-byte extended type for `uuid` boxes. The declared size is validated
/// against the enclosing region.
pub fn read_box_header(r: &mut Reader) -> Result<BoxHeader, ReadError> {
    let start = r.offset();
    let size32 = r.u32()?;
    let typ = r.fourcc()?;
    let mut header_size: u64 = 8;
    let mut size = size32 as u64;

    if size32 == 1 {
        size = r.u64()?;
        header_size += 8;
    }

    let mut uuid = None;
    if typ.0 == *b"uuid" {
        let b = r.bytes(16)?;
        let mut u = [0u8; 16];
        u.copy_from_slice(b);
        uuid = Some(u);
        header_size += 16;
    }

    if size32 == 0 {
        size = header_size + r.remaining();
    }
    if size < header_size {
        return Err(ReadError::Overflow { offset: start, declared: size, left: r.remaining() });
    }
    if size - header_size > r.remaining() {
        return Err(ReadError::Overflow {
            offset: start,
            declared: size,
            left: header_size + r.remaining(),
        });
    }

    Ok(BoxHeader { size, typ, uuid, header_size, start })
}

/// Parse the box sequence filling `r`, dispatching each box through the
/// registry (`parent` enables parent-qualified lookups). Returns the number
/// of boxes seen.
pub fn parse_boxes(
    r: &mut Reader,
    em: &mut Emitter,
    ctx: &mut Context,
    parent: Option<FourCC>,
) -> anyhow::Result<usize> {
    parse_boxes_each(r, em, ctx, |hdr, pr, em, ctx| dispatch(hdr, pr, em, ctx, parent))
}

/// Like [`parse_boxes`], but with a caller-supplied contents function for
/// each child — the hook `stsd` (sample entries), `ilst` (metadata items)
/// and `iref` (typed reference runs) use to override the grammar of their
/// children.
pub fn parse_boxes_each<F>(
    r: &mut Reader,
    em: &mut Emitter,
    ctx: &mut Context,
    mut contents: F,
) -> anyhow::Result<usize>
where
    F: FnMut(&BoxHeader, &mut Reader, &mut Emitter, &mut Context) -> anyhow::Result<()>,
{
    let mut count = 0;
    while !r.at_end() {
        if r.remaining() < 8 {
            em.warn(&format!("{} trailing bytes", r.remaining()));
            let base = r.offset();
            em.hexdump(r.rest(), base);
            break;
        }
        let hdr = match read_box_header(r) {
            Ok(h) => h,
            Err(e) => {
                em.error(&format!("cannot read box header: {e}"));
                let base = r.offset();
                em.hexdump(r.rest(), base);
                break;
            }
        };
        let mut payload = match r.sub(hdr.payload_len()) {
            Ok(p) => p,
            Err(e) => {
                em.error(&format!("'{}' at {:#x}: {e}", hdr.typ, hdr.start));
                let base = r.offset();
                em.hexdump(r.rest(), base);
                break;
            }
        };

        let name = match &hdr.uuid {
            Some(u) => known_boxes::uuid_name(u),
            None => known_boxes::box_name(&hdr.typ),
        };
        em.open_box(&hdr, name);
        match contents(&hdr, &mut payload, em, ctx) {
            Ok(()) => {
                if !payload.at_end() {
                    em.warn(&format!("{} trailing bytes", payload.remaining()));
                    let base = payload.offset();
                    em.hexdump(payload.rest(), base);
                }
            }
            Err(e) => {
                em.error(&format!("'{}' at {:#x}: {e:#}", hdr.typ, hdr.start));
                let base = payload.offset();
                em.hexdump(payload.rest(), base);
            }
        }
        em.close_box();
        count += 1;
    }
    Ok(count)
}

fn dispatch(
    hdr: &BoxHeader,
    r: &mut Reader,
    em: &mut Emitter,
    ctx: &mut Context,
    parent: Option<FourCC>,
) -> anyhow::Result<()> {
    let reg = registry::global();
    if let Some(u) = &hdr.uuid {
        if let Some(f) = reg.lookup_uuid(u) {
            return f(r, em, ctx);
        }
    } else if let Some(f) = reg.lookup(parent, hdr.typ) {
        return f(r, em, ctx);
    }
    // unknown box: not an error, just show the bytes
    let base = r.offset();
    em.hexdump(r.rest(), base);
    Ok(())
}

/// Top-level entry point: dissect a whole file image. Only a failure to
/// read the very first box header is fatal; anything after that degrades to
/// per-box errors in the output.
pub fn dissect(data: &[u8], em: &mut Emitter) -> anyhow::Result<()> {
    {
        let mut probe = Reader::new(data, 0);
        read_box_header(&mut probe).context("cannot read first box header")?;
    }
    let mut ctx = Context::new(&em.opts);
    let mut r = Reader::new(data, 0);
    parse_boxes(&mut r, em, &mut ctx, None)?;
    Ok(())
}
