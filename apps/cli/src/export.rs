//! Flat-file serialization of a finished deck.
//!
//! Writes tab-separated rows importable by Anki-style tools, with optional
//! HTML escaping and LaTeX delimiter conversion. Formatting only; every
//! decision about inclusion and order was already made by the merge engine.

use std::io::Write;

use anyhow::Result;
use cardsmith_core::Deck;
use regex::Regex;

pub struct ExportOptions {
    pub deck_name: Option<String>,
    pub include_header: bool,
    pub escape_html: bool,
    pub convert_latex: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            deck_name: None,
            include_header: true,
            escape_html: true,
            convert_latex: true,
        }
    }
}

/// Write the deck as tab-separated values: Front, Back, Tags, Type.
pub fn write_deck<W: Write>(out: W, deck: &Deck, options: &ExportOptions) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(out);

    if options.include_header {
        if let Some(name) = &options.deck_name {
            writer.write_record([format!("#deck:{}", name)])?;
        }
        writer.write_record(["Front", "Back", "Tags", "Type"])?;
    }

    for card in deck.cards() {
        writer.write_record([
            format_field(&card.front, options),
            format_field(&card.back, options),
            card.tags.iter().cloned().collect::<Vec<_>>().join(" "),
            card.card_type.as_str().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn format_field(text: &str, options: &ExportOptions) -> String {
    let mut text = text.to_string();
    if options.escape_html {
        text = escape_html(&text);
    }
    if options.convert_latex {
        text = convert_latex(&text);
    }
    text
}

/// Escape HTML characters, preserving the `<br>` separators the normalizer
/// inserted for line breaks.
fn escape_html(text: &str) -> String {
    text.split("<br>")
        .map(escape_segment)
        .collect::<Vec<_>>()
        .join("<br>")
}

fn escape_segment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert `$$...$$` to `\[...\]` and `$...$` to `\(...\)` for MathJax.
fn convert_latex(text: &str) -> String {
    let display = Regex::new(r"\$\$([^$]+)\$\$").unwrap();
    let inline = Regex::new(r"\$([^$]+)\$").unwrap();
    let text = display.replace_all(text, r"\[$1\]");
    inline.replace_all(&text, r"\($1\)").into_owned()
}
