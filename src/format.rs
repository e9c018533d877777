//! Rendering of `§` formatting codes in server output.
//!
//! Servers colour their replies with a section sign followed by a single
//! code character. Colours `0`-`f` map onto the 16 ANSI foreground colours;
//! other codes (bold, reset, ...) are dropped.

use crate::driver::OutputSink;
use std::io::{self, Write};

/// Starts a formatting code.
pub const MARKER: char = '§';

const RESET: &str = "\x1b[0m";

fn ansi_color(code: char) -> Option<&'static str> {
    let escape = match code {
        '0' => "\x1b[30m",
        '1' => "\x1b[34m",
        '2' => "\x1b[32m",
        '3' => "\x1b[36m",
        '4' => "\x1b[31m",
        '5' => "\x1b[35m",
        '6' => "\x1b[33m",
        '7' => "\x1b[37m",
        '8' => "\x1b[90m",
        '9' => "\x1b[94m",
        'a' => "\x1b[92m",
        'b' => "\x1b[96m",
        'c' => "\x1b[91m",
        'd' => "\x1b[95m",
        'e' => "\x1b[93m",
        'f' => "\x1b[97m",
        _ => return None,
    };

    Some(escape)
}

/// Render `text` for a terminal, with colours if `colored` is set.
///
/// Leading and trailing newlines are trimmed. Without colours the codes
/// are simply stripped.
pub fn render(text: &str, colored: bool) -> String {
    let text = text.trim_matches('\n');

    let mut parts = text.split(MARKER);
    let mut out = String::with_capacity(text.len());

    // text before the first marker has no code
    if let Some(head) = parts.next() {
        out.push_str(head);
    }

    for part in parts {
        let mut chars = part.chars();
        let Some(code) = chars.next() else {
            continue;
        };

        match ansi_color(code) {
            Some(escape) if colored => {
                out.push_str(escape);
                out.push_str(chars.as_str());
                out.push_str(RESET);
            }
            _ => out.push_str(chars.as_str()),
        }
    }

    out
}

/// [`OutputSink`] writing rendered replies and a `> ` prompt to a writer.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
    colored: bool,
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Write to `out`, rendering colours if `colored` is set.
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> OutputSink for ConsoleSink<W> {
    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", render(text, self.colored))
    }
}
