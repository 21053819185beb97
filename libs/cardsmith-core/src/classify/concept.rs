//! Concept pattern: paragraph-fallback for prose that emphasizes terms
//! (bold, quoted, or multi-word capitalized), one "Explain" card per term.

use regex::Regex;

use crate::classify::PatternClassifier;
use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard, StructuralHint};

/// Optional lookup collaborator for related terms (a wordnet-style source).
/// Injected explicitly; the classifier works without one.
pub trait TermLookup: Send + Sync {
    fn related_terms(&self, term: &str) -> Vec<String>;
}

pub struct ConceptClassifier {
    bold: Regex,
    quoted: Regex,
    capitalized: Regex,
    lookup: Option<Box<dyn TermLookup>>,
}

impl ConceptClassifier {
    pub fn new() -> Self {
        Self {
            bold: Regex::new(r"\*\*([^*]+)\*\*").unwrap(),
            quoted: Regex::new(r#""([^"]+)""#).unwrap(),
            capitalized: Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").unwrap(),
            lookup: None,
        }
    }

    pub fn with_lookup(lookup: Box<dyn TermLookup>) -> Self {
        Self {
            lookup: Some(lookup),
            ..Self::new()
        }
    }

    fn eligible(&self, block: &ContentBlock) -> bool {
        matches!(
            block.hint,
            StructuralHint::Paragraph | StructuralHint::Unknown
        )
    }

    /// Emphasized terms in discovery order, first occurrence wins.
    fn concepts(&self, text: &str) -> Vec<String> {
        let mut seen = Vec::new();
        let bold = self.bold.captures_iter(text).map(|c| c[1].to_string());
        let quoted = self.quoted.captures_iter(text).map(|c| c[1].to_string());
        let capitalized = self
            .capitalized
            .find_iter(text)
            .map(|m| m.as_str().to_string());
        for term in bold.chain(quoted).chain(capitalized) {
            let term = term.trim().to_string();
            if !term.is_empty() && !seen.contains(&term) {
                seen.push(term);
            }
        }
        seen
    }
}

impl Default for ConceptClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternClassifier for ConceptClassifier {
    fn pattern(&self) -> CardType {
        CardType::Concept
    }

    fn score(&self, block: &ContentBlock) -> ClassificationScore {
        if !self.eligible(block) {
            return ClassificationScore::none(CardType::Concept);
        }
        if self.concepts(block.text()).is_empty() {
            ClassificationScore::none(CardType::Concept)
        } else {
            ClassificationScore::new(CardType::Concept, 0.5, &["emphasized terms"])
        }
    }

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard> {
        if !self.eligible(block) {
            return Vec::new();
        }
        let text = block.text().to_string();
        let mut cards = Vec::new();
        for concept in self.concepts(&text) {
            let mut card = DraftCard::new(
                CardType::Concept,
                block,
                format!("Explain: {}", concept),
                text.clone(),
            );
            if let Some(lookup) = &self.lookup {
                for related in lookup.related_terms(&concept) {
                    card.tags.insert(related);
                }
            }
            cards.push(card);
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(text: &str) -> ContentBlock {
        ContentBlock {
            raw_text: text.to_string(),
            start_offset: 0,
            end_offset: text.len(),
            hint: StructuralHint::Paragraph,
        }
    }

    #[test]
    fn bold_terms_score() {
        let classifier = ConceptClassifier::new();
        let score = classifier.score(&block("The **endoplasmic reticulum** makes proteins."));
        assert_eq!(score.confidence, 0.5);
    }

    #[test]
    fn plain_prose_is_no_match() {
        let classifier = ConceptClassifier::new();
        let score = classifier.score(&block("nothing emphasized in this sentence."));
        assert_eq!(score.confidence, 0.0);
    }

    #[test]
    fn one_card_per_term_in_discovery_order() {
        let classifier = ConceptClassifier::new();
        let cards = classifier.emit(&block(
            "The **mitochondrion** produces energy; \"ATP\" stores it.",
        ));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "Explain: mitochondrion");
        assert_eq!(cards[1].front, "Explain: ATP");
    }

    #[test]
    fn capitalized_multiword_terms_found() {
        let classifier = ConceptClassifier::new();
        let cards = classifier.emit(&block("Watch out for the Krebs Cycle in metabolism."));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "Explain: Krebs Cycle");
    }

    #[test]
    fn lookup_terms_become_tags() {
        struct Fixed;
        impl TermLookup for Fixed {
            fn related_terms(&self, _term: &str) -> Vec<String> {
                vec!["biology".to_string()]
            }
        }
        let classifier = ConceptClassifier::with_lookup(Box::new(Fixed));
        let cards = classifier.emit(&block("The **ribosome** builds proteins."));
        assert!(cards[0].tags.contains("biology"));
    }
}
