//! Definition pattern: `Term: definition` lines, `Term - definition` lines,
//! and colon-terminated openers followed by body text.

use regex::Regex;

use crate::classify::PatternClassifier;
use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard, StructuralHint};

pub struct DefinitionClassifier {
    colon: Regex,
    dash: Regex,
}

impl DefinitionClassifier {
    pub fn new() -> Self {
        Self {
            colon: Regex::new(r"^\*{0,2}([A-Za-z][^:*]{2,50}?)\*{0,2}:\s+(\S.*)$").unwrap(),
            dash: Regex::new(r"^([A-Za-z][^-]{2,50}?)\s+-\s+(\S.*)$").unwrap(),
        }
    }

    fn eligible(&self, block: &ContentBlock) -> bool {
        matches!(
            block.hint,
            StructuralHint::Paragraph | StructuralHint::Unknown
        )
    }

    /// Exact key-value matches, one per line, in line order.
    fn pairs(&self, block: &ContentBlock) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for line in block.content_lines() {
            if let Some(caps) = self.colon.captures(line).or_else(|| self.dash.captures(line)) {
                pairs.push((caps[1].trim().to_string(), caps[2].trim().to_string()));
            }
        }
        pairs
    }

    /// First line ends with `:` and the rest of the block supplies the body.
    fn heading_style(&self, block: &ContentBlock) -> Option<(String, String)> {
        let lines: Vec<&str> = block.content_lines().collect();
        let first = lines.first()?;
        if lines.len() < 2 || !first.ends_with(':') || first.len() > 80 {
            return None;
        }
        let term = first.trim_end_matches(':').trim();
        if term.is_empty() || term.contains(':') {
            return None;
        }
        Some((term.to_string(), lines[1..].join("\n")))
    }
}

impl Default for DefinitionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternClassifier for DefinitionClassifier {
    fn pattern(&self) -> CardType {
        CardType::Definition
    }

    fn score(&self, block: &ContentBlock) -> ClassificationScore {
        if !self.eligible(block) {
            return ClassificationScore::none(CardType::Definition);
        }
        if !self.pairs(block).is_empty() {
            return ClassificationScore::new(CardType::Definition, 1.0, &["key-value syntax"]);
        }
        if self.heading_style(block).is_some() {
            return ClassificationScore::new(
                CardType::Definition,
                0.6,
                &["colon-terminated opener"],
            );
        }
        ClassificationScore::none(CardType::Definition)
    }

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard> {
        if !self.eligible(block) {
            return Vec::new();
        }

        let pairs = self.pairs(block);

        // A structured fact ("Term: X" plus "Definition: Y") is one concept,
        // not one card per line.
        let term = structured_field(&pairs, &["term", "name", "concept"]);
        let meaning = structured_field(&pairs, &["definition", "meaning", "description"]);
        if let (Some(term), Some(meaning)) = (term, meaning) {
            let mut card = DraftCard::new(
                CardType::Definition,
                block,
                format!("What is {}?", term),
                meaning.clone(),
            );
            card.extra.insert("term".to_string(), term.to_string());
            let reverse = DraftCard::new(
                CardType::Definition,
                block,
                format!("What term means: {}", meaning),
                term.clone(),
            );
            return vec![card, reverse];
        }

        if !pairs.is_empty() {
            let mut cards = Vec::new();
            for (term, meaning) in &pairs {
                cards.push(DraftCard::new(
                    CardType::Definition,
                    block,
                    format!("Define: {}", term),
                    meaning.clone(),
                ));
                cards.push(DraftCard::new(
                    CardType::Definition,
                    block,
                    format!("What term means: {}", meaning),
                    term.clone(),
                ));
            }
            return cards;
        }

        match self.heading_style(block) {
            Some((term, body)) => vec![DraftCard::new(
                CardType::Definition,
                block,
                format!("Define: {}", term),
                body,
            )],
            None => Vec::new(),
        }
    }
}

fn structured_field<'a>(pairs: &'a [(String, String)], keys: &[&str]) -> Option<&'a String> {
    pairs
        .iter()
        .find(|(k, _)| keys.iter().any(|key| k.eq_ignore_ascii_case(key)))
        .map(|(_, v)| v)
}
