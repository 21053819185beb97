//! List pattern: bullet or numbered runs, with an optional collective title
//! supplied by the block's first line.

use regex::Regex;

use crate::classify::PatternClassifier;
use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard, StructuralHint};

/// Lists longer than this also get one ordinal card per item.
const ITEM_CARD_THRESHOLD: usize = 3;

pub struct ListClassifier {
    marker: Regex,
}

impl ListClassifier {
    pub fn new() -> Self {
        Self {
            marker: Regex::new(r"^(?:[-*+•]|\d+[.)])\s+").unwrap(),
        }
    }

    fn eligible(&self, block: &ContentBlock) -> bool {
        matches!(
            block.hint,
            StructuralHint::BulletList | StructuralHint::NumberedList
        )
    }

    /// Split the block into its optional title line and its items.
    fn parse(&self, block: &ContentBlock) -> (Option<String>, Vec<String>) {
        let mut title = None;
        let mut items = Vec::new();
        for (idx, line) in block.content_lines().enumerate() {
            if self.marker.is_match(line) {
                items.push(self.marker.replace(line, "").trim().to_string());
            } else if idx == 0 {
                title = Some(line.trim_end_matches(':').trim().to_string());
            }
        }
        (title, items)
    }
}

impl Default for ListClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternClassifier for ListClassifier {
    fn pattern(&self) -> CardType {
        CardType::List
    }

    fn score(&self, block: &ContentBlock) -> ClassificationScore {
        if !self.eligible(block) {
            return ClassificationScore::none(CardType::List);
        }
        let (title, items) = self.parse(block);
        if items.is_empty() {
            return ClassificationScore::none(CardType::List);
        }
        match title {
            Some(_) => ClassificationScore::new(CardType::List, 0.8, &["titled list"]),
            None => ClassificationScore::new(CardType::List, 0.4, &["untitled list"]),
        }
    }

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard> {
        if !self.eligible(block) {
            return Vec::new();
        }
        let (title, items) = self.parse(block);
        if items.is_empty() {
            return Vec::new();
        }
        let title = title.unwrap_or_else(|| "Untitled list".to_string());
        let count = items.len();

        let mut cards = Vec::new();
        let mut collective = DraftCard::new(
            CardType::List,
            block,
            format!("List the {} items: {}", count, title),
            items
                .iter()
                .map(|item| format!("• {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        collective
            .extra
            .insert("count".to_string(), count.to_string());
        cards.push(collective);

        if count > ITEM_CARD_THRESHOLD {
            for (idx, item) in items.iter().enumerate() {
                let position = idx + 1;
                let mut card = DraftCard::new(
                    CardType::List,
                    block,
                    format!("Item {} of {}: {}", position, count, title),
                    item.clone(),
                );
                card.extra
                    .insert("position".to_string(), position.to_string());
                card.extra.insert("count".to_string(), count.to_string());
                cards.push(card);
            }
        }

        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(text: &str, hint: StructuralHint) -> ContentBlock {
        ContentBlock {
            raw_text: text.to_string(),
            start_offset: 0,
            end_offset: text.len(),
            hint,
        }
    }

    #[test]
    fn titled_list_scores_higher() {
        let classifier = ListClassifier::new();
        let titled = block("Noble gases:\n- helium\n- neon", StructuralHint::BulletList);
        let untitled = block("- helium\n- neon", StructuralHint::BulletList);
        assert_eq!(classifier.score(&titled).confidence, 0.8);
        assert_eq!(classifier.score(&untitled).confidence, 0.4);
    }

    #[test]
    fn wrong_hint_is_no_match() {
        let classifier = ListClassifier::new();
        let b = block("- item", StructuralHint::Paragraph);
        assert_eq!(classifier.score(&b).confidence, 0.0);
    }

    #[test]
    fn collective_card_joins_items() {
        let classifier = ListClassifier::new();
        let cards = classifier.emit(&block(
            "Primary colors:\n- red\n- green\n- blue",
            StructuralHint::BulletList,
        ));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "List the 3 items: Primary colors");
        assert_eq!(cards[0].back, "• red\n• green\n• blue");
        assert_eq!(cards[0].extra["count"], "3");
    }

    #[test]
    fn long_list_adds_ordinal_cards() {
        let classifier = ListClassifier::new();
        let cards = classifier.emit(&block(
            "Inner planets:\n1. Mercury\n2. Venus\n3. Earth\n4. Mars",
            StructuralHint::NumberedList,
        ));
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[1].front, "Item 1 of 4: Inner planets");
        assert_eq!(cards[1].back, "Mercury");
        assert_eq!(cards[4].extra["position"], "4");
    }

    #[test]
    fn untitled_list_uses_placeholder() {
        let classifier = ListClassifier::new();
        let cards = classifier.emit(&block("- a\n- b", StructuralHint::BulletList));
        assert_eq!(cards[0].front, "List the 2 items: Untitled list");
    }
}
