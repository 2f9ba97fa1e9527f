use crate::boxes::BoxHeader;
use colored::Colorize;
use std::fmt;
use std::io::Write;

/// Output formatting options. The CLI maps its flags onto this one-to-one.
#[derive(Debug, Clone)]
pub struct Options {
    pub color: bool,
    pub show_offsets: bool,
    pub show_lengths: bool,
    pub show_descriptions: bool,
    pub show_defaults: bool,
    pub indent: usize,
    pub bytes_per_line: usize,
    /// Maximum rows for tables and hexdumps; `None` = unlimited.
    pub max_rows: Option<u64>,
    pub senc_per_sample_iv: Option<u8>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            color: false,
            show_offsets: true,
            show_lengths: true,
            show_descriptions: true,
            show_defaults: false,
            indent: 4,
            bytes_per_line: 16,
            max_rows: Some(7),
            senc_per_sample_iv: None,
        }
    }
}

/// Quote a byte string the way field values are rendered: single quotes,
/// printable ASCII kept, everything else as `\xHH` escapes.
pub fn quote(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() + 2);
    s.push('\'');
    for &b in bytes {
        match b {
            b'\\' => s.push_str("\\\\"),
            b'\'' => s.push_str("\\'"),
            0x20..=0x7e => s.push(b as char),
            _ => s.push_str(&format!("\\x{b:02x}")),
        }
    }
    s.push('\'');
    s
}

pub fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Stateful sink for the dissection output: indentation, coloring, default
/// elision, row truncation and hexdumps all live here so the grammars stay
/// declarative.
pub struct Emitter<'w> {
    out: &'w mut dyn Write,
    pub opts: Options,
    depth: usize,
}

impl<'w> Emitter<'w> {
    pub fn new(out: &'w mut dyn Write, opts: Options) -> Self {
        Emitter { out, opts, depth: 0 }
    }

    pub fn depth(&self) -> usize { self.depth }

    fn paint(&self, s: String, f: fn(&str) -> colored::ColoredString) -> String {
        if self.opts.color { f(&s).to_string() } else { s }
    }
    fn bold(&self, s: String) -> String { self.paint(s, |x| x.bold()) }
    fn meta(&self, s: String) -> String { self.paint(s, |x| x.blue()) }
    fn dim(&self, s: String) -> String { self.paint(s, |x| x.dimmed()) }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}{}", " ".repeat(self.depth * self.opts.indent), text);
    }

    // ---------- fields ----------

    pub fn field<V: fmt::Display>(&mut self, name: &str, value: V) {
        self.field_desc(name, value, None);
    }

    pub fn field_desc<V: fmt::Display>(&mut self, name: &str, value: V, desc: Option<String>) {
        let mut text = format!("{name} = {value}");
        if self.opts.show_descriptions {
            if let Some(d) = desc {
                text.push(' ');
                text.push_str(&self.dim(format!("({d})")));
            }
        }
        self.line(&text);
    }

    /// A field whose grammar declares a default value: elided while equal to
    /// it, unless `show_defaults` is on.
    pub fn field_default<V: fmt::Display + PartialEq>(&mut self, name: &str, value: V, default: V) {
        self.field_default_desc(name, value, default, None);
    }

    pub fn field_default_desc<V: fmt::Display + PartialEq>(
        &mut self,
        name: &str,
        value: V,
        default: V,
        desc: Option<String>,
    ) {
        if !self.opts.show_defaults && value == default {
            return;
        }
        self.field_desc(name, value, desc);
    }

    // ---------- scopes ----------

    /// Box header line: `[type] HumanName @ hdr, payload_start .. payload_end (len)`.
    pub fn open_box(&mut self, hdr: &BoxHeader, name: Option<&str>) {
        let typ = match &hdr.uuid {
            Some(u) => {
                let hex: Vec<String> = u.iter().map(|b| format!("{b:02x}")).collect();
                format!(
                    "uuid {}-{}-{}-{}-{}",
                    hex[0..4].concat(), hex[4..6].concat(), hex[6..8].concat(),
                    hex[8..10].concat(), hex[10..16].concat()
                )
            }
            None => hdr.typ.to_string(),
        };
        let mut text = self.bold(format!("[{typ}]"));
        if let Some(n) = name {
            text.push(' ');
            text.push_str(n);
        }
        if self.opts.show_offsets {
            text.push_str(&self.meta(format!(
                " @ {:#x}, {:#x} .. {:#x}",
                hdr.start, hdr.payload_start(), hdr.payload_end()
            )));
        }
        if self.opts.show_lengths {
            text.push_str(&self.meta(format!(" ({})", hdr.payload_len())));
        }
        self.line(&text);
        self.depth += 1;
    }

    pub fn close_box(&mut self) {
        self.depth -= 1;
    }

    /// Named block of nested fields, e.g. `default_sample_flags =`.
    pub fn open_group(&mut self, name: &str) {
        self.line(&format!("{name} ="));
        self.depth += 1;
    }

    pub fn close_group(&mut self) {
        self.depth -= 1;
    }

    /// Descriptor header line: `[tag] ClassName` plus an optional note about
    /// over-long BER length encodings.
    pub fn open_desc(&mut self, tag: u8, label: &str, note: Option<String>) {
        let mut text = self.bold(format!("[{tag}]"));
        if self.opts.show_descriptions {
            text.push(' ');
            text.push_str(label);
        }
        if let Some(n) = note {
            text.push(' ');
            text.push_str(&self.meta(format!("({n})")));
        }
        self.line(&text);
        self.depth += 1;
    }

    pub fn close_desc(&mut self) {
        self.depth -= 1;
    }

    // ---------- tables ----------

    /// Emit one table row, subject to the `max_rows` policy. Rows are pushed
    /// one at a time so tables never have to be accumulated in memory.
    pub fn row(&mut self, idx: u64, text: &str) {
        if self.opts.max_rows.map_or(true, |m| idx < m) {
            self.line(text);
        }
    }

    /// Terminate a row sequence of `total` rows, printing the elision marker
    /// when rows were dropped.
    pub fn end_rows(&mut self, total: u64) {
        if self.opts.max_rows.is_some_and(|m| total > m) {
            self.line("...");
        }
    }

    /// Aggregate-summary row (always printed), e.g. `[samples = N, time = T]`.
    pub fn summary(&mut self, text: &str) {
        self.line(text);
    }

    // ---------- diagnostics ----------

    pub fn warn(&mut self, msg: &str) {
        let text = format!(
            "{} {}",
            self.paint("WARNING:".into(), |x| x.yellow().bold()),
            self.paint(msg.into(), |x| x.yellow())
        );
        self.line(&text);
    }

    pub fn error(&mut self, msg: &str) {
        let text = format!(
            "{} {}",
            self.paint("ERROR:".into(), |x| x.red().bold()),
            self.paint(msg.into(), |x| x.red())
        );
        self.line(&text);
    }

    // ---------- hexdump ----------

    fn hex_byte(&self, b: u8) -> String {
        let s = format!("{b:02x}");
        match b {
            0 => self.paint(s, |x| x.green().dimmed()),
            0x20..=0x7e => self.paint(s, |x| x.yellow()),
            _ => self.paint(s, |x| x.green()),
        }
    }

    fn ascii_byte(&self, b: u8) -> String {
        match b {
            0 => self.paint(".".into(), |x| x.green().dimmed()),
            0x20..=0x7e => self.paint((b as char).to_string(), |x| x.yellow()),
            _ => self.paint(".".into(), |x| x.green()),
        }
    }

    /// Canonical address + hex + ASCII dump, 16 bytes per line by default,
    /// truncated by `max_rows`. `base` is the absolute file offset of
    /// `data[0]`.
    pub fn hexdump(&mut self, data: &[u8], base: u64) {
        if data.is_empty() {
            return;
        }
        let bpl = self.opts.bytes_per_line.max(1);
        for (i, chunk) in data.chunks(bpl).enumerate() {
            if self.opts.max_rows.is_some_and(|m| i as u64 >= m) {
                self.line("...");
                return;
            }
            let mut hex = String::new();
            for j in 0..bpl {
                if j > 0 {
                    hex.push(' ');
                    if j % 4 == 0 {
                        hex.push(' ');
                    }
                }
                match chunk.get(j) {
                    Some(&b) => hex.push_str(&self.hex_byte(b)),
                    None => hex.push_str("  "),
                }
            }
            let ascii: String = chunk.iter().map(|&b| self.ascii_byte(b)).collect();
            let addr = self.meta(format!("{:08x}", base + (i * bpl) as u64));
            self.line(&format!("{addr}  {hex}   {ascii}"));
        }
    }
}
