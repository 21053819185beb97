//! Table pattern: pipe-delimited rows, one card per data row keyed by the
//! header column.

use crate::classify::PatternClassifier;
use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard, StructuralHint};

pub struct TableClassifier;

impl TableClassifier {
    fn rows(block: &ContentBlock) -> Vec<Vec<String>> {
        block
            .content_lines()
            .filter(|line| line.contains('|'))
            .map(split_cells)
            .filter(|cells| !cells.is_empty())
            .collect()
    }
}

impl PatternClassifier for TableClassifier {
    fn pattern(&self) -> CardType {
        CardType::Table
    }

    fn score(&self, block: &ContentBlock) -> ClassificationScore {
        if block.hint != StructuralHint::Table {
            return ClassificationScore::none(CardType::Table);
        }
        let rows = Self::rows(block);
        if rows.len() < 2 {
            return ClassificationScore::none(CardType::Table);
        }
        if rows.get(1).map_or(false, |row| is_delimiter_row(row)) {
            ClassificationScore::new(CardType::Table, 0.9, &["header row"])
        } else {
            ClassificationScore::new(CardType::Table, 0.5, &["no delimiter row"])
        }
    }

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard> {
        if block.hint != StructuralHint::Table {
            return Vec::new();
        }
        let rows = Self::rows(block);
        if rows.len() < 2 {
            return Vec::new();
        }

        // First row is the header either way; the delimiter row, when
        // present, only raises confidence.
        let header = &rows[0];
        let mut cards = Vec::new();
        for (idx, row) in rows[1..].iter().enumerate() {
            if is_delimiter_row(row) || row.len() < 2 {
                continue;
            }
            let mut back = row[1].clone();
            for col in 2..row.len().min(header.len()) {
                back.push_str(&format!("\n{}: {}", header[col], row[col]));
            }
            let mut card = DraftCard::new(
                CardType::Table,
                block,
                format!("{}: {}", header[0], row[0]),
                back,
            );
            card.extra.insert("row".to_string(), (idx + 1).to_string());
            if header.len() > 1 {
                card.extra.insert("column".to_string(), header[1].clone());
            }
            cards.push(card);
        }
        cards
    }
}

/// Split a pipe row into trimmed cells, dropping the empty edge cells that
/// leading/trailing pipes produce.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first() == Some(&"") {
        cells.remove(0);
    }
    if cells.last() == Some(&"") {
        cells.pop();
    }
    cells.into_iter().map(str::to_string).collect()
}

/// A markdown alignment row: every cell made of `-` and `:` only.
fn is_delimiter_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':'))
}
