use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4dissect::{dissect, Emitter, Options};
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Portable ISOBMFF dissector / parser for your terminal")]
struct Args {
    /// Input file to parse
    path: PathBuf,

    /// Colorize the output (default: only if stdout is a terminal)
    #[arg(short = 'C', long = "color", action = ArgAction::SetTrue, overrides_with = "no_color")]
    color: bool,
    #[arg(long = "no-color", action = ArgAction::SetTrue, overrides_with = "color", hide = true)]
    no_color: bool,

    /// Maximum amount of lines to show in tables / lists / hexdumps (0 = unlimited)
    #[arg(short = 'r', long = "rows", default_value_t = 7, value_name = "N")]
    rows: u64,

    /// Show file offsets of boxes / blobs
    #[arg(long = "offsets", action = ArgAction::SetTrue, overrides_with = "no_offsets")]
    offsets: bool,
    #[arg(long = "no-offsets", action = ArgAction::SetTrue, overrides_with = "offsets", hide = true)]
    no_offsets: bool,

    /// Show byte sizes of boxes / blobs
    #[arg(long = "lengths", action = ArgAction::SetTrue, overrides_with = "no_lengths")]
    lengths: bool,
    #[arg(long = "no-lengths", action = ArgAction::SetTrue, overrides_with = "lengths", hide = true)]
    no_lengths: bool,

    /// Show meanings of numerical field values
    #[arg(long = "descriptions", action = ArgAction::SetTrue, overrides_with = "no_descriptions")]
    descriptions: bool,
    #[arg(long = "no-descriptions", action = ArgAction::SetTrue, overrides_with = "descriptions", hide = true)]
    no_descriptions: bool,

    /// Show all fields, even those set to their default value
    #[arg(long = "defaults", action = ArgAction::SetTrue, overrides_with = "no_defaults")]
    defaults: bool,
    #[arg(long = "no-defaults", action = ArgAction::SetTrue, overrides_with = "defaults", hide = true)]
    no_defaults: bool,

    /// Amount of spaces to indent each level by
    #[arg(long, default_value_t = 4, value_name = "N")]
    indent: usize,

    /// Bytes per line in hexdumps
    #[arg(long = "bytes-per-line", default_value_t = 16, value_name = "N")]
    bytes_per_line: usize,

    /// Value of Per_Sample_IV_Size when parsing senc boxes without a tenc in
    /// scope
    #[arg(long = "senc-per-sample-iv", value_name = "N")]
    senc_per_sample_iv: Option<u8>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let color = if args.color {
        true
    } else if args.no_color {
        false
    } else {
        std::io::stdout().is_terminal()
    };
    colored::control::set_override(color);

    let opts = Options {
        color,
        show_offsets: !args.no_offsets,
        show_lengths: !args.no_lengths,
        show_descriptions: !args.no_descriptions,
        show_defaults: args.defaults,
        indent: args.indent,
        bytes_per_line: args.bytes_per_line,
        max_rows: if args.rows == 0 { None } else { Some(args.rows) },
        senc_per_sample_iv: args.senc_per_sample_iv,
    };

    let file = File::open(&args.path)
        .with_context(|| format!("cannot open {}", args.path.display()))?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }
        .with_context(|| format!("cannot map {}", args.path.display()))?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    {
        let mut em = Emitter::new(&mut out, opts);
        dissect(&mmap, &mut em)?;
    }
    out.flush()?;
    Ok(())
}
