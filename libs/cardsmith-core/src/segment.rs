//! Structural segmentation of raw text into content blocks.
//!
//! Boundary rules, in priority order: heading lines, fenced code regions,
//! contiguous list-marker runs, row-delimited tables, and blank-line-separated
//! text runs. Hints are purely syntactic; no classifier runs here.
//!
//! Block spans cover the input exactly. Blank lines between blocks are kept
//! inside the span of the block they follow (leading blanks go to the first
//! block), so concatenating `raw_text` over all blocks reconstructs the input.

use crate::error::{PipelineError, Result};
use crate::types::{ContentBlock, StructuralHint};

/// Split raw text into content blocks.
///
/// Empty or whitespace-only input is a single terminal error, not a
/// per-block condition.
pub fn segment(text: &str) -> Result<Vec<ContentBlock>> {
    if text.trim().is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    Ok(Segmenter::new(text).collect())
}

/// Lazy block iterator over raw text. Restartable by constructing a new
/// instance over the same input.
pub struct Segmenter<'a> {
    text: &'a str,
    /// (byte offset, raw line including any newline)
    lines: Vec<(usize, &'a str)>,
    idx: usize,
    span_start: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for raw in text.split_inclusive('\n') {
            lines.push((offset, raw));
            offset += raw.len();
        }
        Self {
            text,
            lines,
            idx: 0,
            span_start: 0,
        }
    }

    fn content(&self, idx: usize) -> &'a str {
        let raw = self.lines[idx].1;
        raw.strip_suffix('\n')
            .map(|r| r.strip_suffix('\r').unwrap_or(r))
            .unwrap_or(raw)
    }

    fn is_blank(&self, idx: usize) -> bool {
        self.content(idx).trim().is_empty()
    }

    fn peek_is_table_row(&self, idx: usize) -> bool {
        idx < self.lines.len() && is_table_row(self.content(idx).trim())
    }

    /// Consume the content lines of one block starting at `self.idx`
    /// (which points at a non-blank line) and return its hint.
    fn scan_block(&mut self) -> StructuralHint {
        let trimmed = self.content(self.idx).trim();

        if is_heading(trimmed) {
            self.idx += 1;
            return StructuralHint::Heading;
        }

        if let Some(fence) = fence_marker(trimmed) {
            self.idx += 1;
            self.consume_fence(fence);
            self.absorb_trailing_caption();
            return StructuralHint::CodeFence;
        }

        if let Some(kind) = list_marker(trimmed) {
            self.consume_list();
            return kind.hint();
        }

        if is_table_row(trimmed) && self.peek_is_table_row(self.idx + 1) {
            while self.idx < self.lines.len() && is_table_row(self.content(self.idx).trim()) {
                self.idx += 1;
            }
            return StructuralHint::Table;
        }

        // Plain text. A lone line sitting directly on top of a list run or a
        // fence is absorbed as that block's title/caption line, so the
        // classifiers can see it without reaching across blocks.
        let next = self.idx + 1;
        if next < self.lines.len() {
            let next_trim = self.content(next).trim();
            if let Some(kind) = list_marker(next_trim) {
                self.idx += 1;
                self.consume_list();
                return kind.hint();
            }
            if let Some(fence) = fence_marker(next_trim) {
                self.idx += 2;
                self.consume_fence(fence);
                return StructuralHint::CodeFence;
            }
        }

        // Paragraph run: contiguous non-blank lines that do not open another
        // block type.
        self.idx += 1;
        while self.idx < self.lines.len() {
            let cur = self.content(self.idx).trim();
            if cur.is_empty()
                || is_heading(cur)
                || fence_marker(cur).is_some()
                || list_marker(cur).is_some()
                || (is_table_row(cur) && self.peek_is_table_row(self.idx + 1))
            {
                break;
            }
            self.idx += 1;
        }
        StructuralHint::Paragraph
    }

    /// Consume lines up to and including the closing fence (or EOF).
    /// Internal blank lines never split the block.
    fn consume_fence(&mut self, fence: &str) {
        while self.idx < self.lines.len() {
            let closes = self.content(self.idx).trim().starts_with(fence);
            self.idx += 1;
            if closes {
                break;
            }
        }
    }

    /// One plain line directly after a closing fence becomes the caption
    /// when the fence had none in front of it.
    fn absorb_trailing_caption(&mut self) {
        if self.idx >= self.lines.len() {
            return;
        }
        let cur = self.content(self.idx).trim();
        if cur.is_empty()
            || is_heading(cur)
            || fence_marker(cur).is_some()
            || list_marker(cur).is_some()
            || (is_table_row(cur) && self.peek_is_table_row(self.idx + 1))
        {
            return;
        }
        self.idx += 1;
    }

    /// Maximal run of contiguous list-marker lines.
    fn consume_list(&mut self) {
        while self.idx < self.lines.len() && list_marker(self.content(self.idx).trim()).is_some() {
            self.idx += 1;
        }
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = ContentBlock;

    fn next(&mut self) -> Option<ContentBlock> {
        let start = self.span_start;
        while self.idx < self.lines.len() && self.is_blank(self.idx) {
            self.idx += 1;
        }
        if self.idx >= self.lines.len() {
            return None;
        }

        let hint = self.scan_block();

        // Blank lines after the block stay inside its span, so coverage
        // remains exact even at EOF.
        while self.idx < self.lines.len() && self.is_blank(self.idx) {
            self.idx += 1;
        }
        let end = if self.idx < self.lines.len() {
            self.lines[self.idx].0
        } else {
            self.text.len()
        };
        self.span_start = end;

        Some(ContentBlock {
            raw_text: self.text[start..end].to_string(),
            start_offset: start,
            end_offset: end,
            hint,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn hint(self) -> StructuralHint {
        match self {
            Self::Bullet => StructuralHint::BulletList,
            Self::Numbered => StructuralHint::NumberedList,
        }
    }
}

/// ATX heading: 1-6 `#` followed by a space.
fn is_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=6).contains(&hashes) && line.as_bytes().get(hashes) == Some(&b' ')
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

fn list_marker(line: &str) -> Option<ListKind> {
    let mut chars = line.chars();
    match chars.next() {
        Some('-') | Some('*') | Some('+') | Some('•') => {
            if chars.next() == Some(' ') {
                Some(ListKind::Bullet)
            } else {
                None
            }
        }
        Some(c) if c.is_ascii_digit() => {
            let bytes = line.as_bytes();
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits + 1 < bytes.len()
                && (bytes[digits] == b'.' || bytes[digits] == b')')
                && bytes[digits + 1] == b' '
            {
                Some(ListKind::Numbered)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn is_table_row(line: &str) -> bool {
    line.contains('|') && fence_marker(line).is_none()
}
