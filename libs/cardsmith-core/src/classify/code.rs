//! Annotated-code pattern: a fenced snippet paired with a caption line
//! directly before or after the fence.

use crate::classify::PatternClassifier;
use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard, StructuralHint};

/// Snippets longer than this only get the "what does it do" direction;
/// asking someone to write out a page of code is not a useful card.
const MAX_WRITE_LINES: usize = 15;

pub struct AnnotatedCodeClassifier;

struct Snippet {
    caption: Option<String>,
    language: Option<String>,
    code: String,
}

impl AnnotatedCodeClassifier {
    fn parse(block: &ContentBlock) -> Option<Snippet> {
        let lines: Vec<&str> = block.text().lines().collect();
        let open = lines
            .iter()
            .position(|line| is_fence(line.trim()))?;
        let close = lines[open + 1..]
            .iter()
            .position(|line| is_fence(line.trim()))
            .map(|rel| open + 1 + rel);

        let caption = if open > 0 {
            non_blank(&lines[..open])
        } else {
            close.and_then(|c| non_blank(&lines[c + 1..]))
        };

        let language = {
            let token = lines[open].trim().trim_start_matches(['`', '~']).trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        };

        let body_end = close.unwrap_or(lines.len());
        let code = lines[open + 1..body_end].join("\n");
        Some(Snippet {
            caption,
            language,
            code,
        })
    }
}

impl PatternClassifier for AnnotatedCodeClassifier {
    fn pattern(&self) -> CardType {
        CardType::AnnotatedCode
    }

    fn score(&self, block: &ContentBlock) -> ClassificationScore {
        if block.hint != StructuralHint::CodeFence {
            return ClassificationScore::none(CardType::AnnotatedCode);
        }
        match Self::parse(block) {
            Some(snippet) if snippet.caption.is_some() => {
                ClassificationScore::new(CardType::AnnotatedCode, 0.7, &["captioned fence"])
            }
            Some(_) => ClassificationScore::new(CardType::AnnotatedCode, 0.2, &["bare fence"]),
            None => ClassificationScore::none(CardType::AnnotatedCode),
        }
    }

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard> {
        if block.hint != StructuralHint::CodeFence {
            return Vec::new();
        }
        let snippet = match Self::parse(block) {
            Some(s) => s,
            None => return Vec::new(),
        };
        let caption = match snippet.caption {
            Some(c) => c.trim_end_matches(':').trim().to_string(),
            // Matched but nothing card-worthy.
            None => return Vec::new(),
        };
        if snippet.code.trim().is_empty() {
            return Vec::new();
        }

        let lang = snippet.language.clone().unwrap_or_default();
        let lang_label = if lang.is_empty() {
            "code".to_string()
        } else {
            format!("{} code", lang)
        };

        let mut cards = Vec::new();
        if snippet.code.lines().count() <= MAX_WRITE_LINES {
            let mut write = DraftCard::new(
                CardType::AnnotatedCode,
                block,
                format!("Write {} for: {}", lang_label, caption),
                snippet.code.clone(),
            );
            if let Some(language) = &snippet.language {
                write.extra.insert("language".to_string(), language.clone());
            }
            cards.push(write);
        }

        let mut explain = DraftCard::new(
            CardType::AnnotatedCode,
            block,
            format!("What does this {} do?\n{}", lang_label, snippet.code),
            caption,
        );
        if let Some(language) = &snippet.language {
            explain
                .extra
                .insert("language".to_string(), language.clone());
        }
        cards.push(explain);
        cards
    }
}

fn is_fence(line: &str) -> bool {
    line.starts_with("```") || line.starts_with("~~~")
}

fn non_blank(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fence(text: &str) -> ContentBlock {
        ContentBlock {
            raw_text: text.to_string(),
            start_offset: 0,
            end_offset: text.len(),
            hint: StructuralHint::CodeFence,
        }
    }

    #[test]
    fn caption_scores_above_threshold() {
        let b = fence("Reverse a vec in place:\n```rust\nv.reverse();\n```");
        assert_eq!(AnnotatedCodeClassifier.score(&b).confidence, 0.7);
    }

    #[test]
    fn bare_fence_scores_below_threshold() {
        let b = fence("```rust\nv.reverse();\n```");
        assert_eq!(AnnotatedCodeClassifier.score(&b).confidence, 0.2);
    }

    #[test]
    fn trailing_caption_counts() {
        let b = fence("```py\nxs.sort()\n```\nSorts the list in place.");
        assert_eq!(AnnotatedCodeClassifier.score(&b).confidence, 0.7);
    }

    #[test]
    fn emits_write_and_explain_cards() {
        let b = fence("Reverse a vec in place:\n```rust\nv.reverse();\n```");
        let cards = AnnotatedCodeClassifier.emit(&b);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "Write rust code for: Reverse a vec in place");
        assert_eq!(cards[0].back, "v.reverse();");
        assert_eq!(cards[0].extra["language"], "rust");
        assert!(cards[1].front.starts_with("What does this rust code do?"));
        assert_eq!(cards[1].back, "Reverse a vec in place");
    }

    #[test]
    fn long_snippet_skips_write_direction() {
        let code: String = (0..20).map(|i| format!("line{}();\n", i)).collect();
        let b = fence(&format!("Setup routine:\n```\n{}```", code));
        let cards = AnnotatedCodeClassifier.emit(&b);
        assert_eq!(cards.len(), 1);
        assert!(cards[0].front.starts_with("What does this code do?"));
    }

    #[test]
    fn captionless_fence_emits_nothing() {
        let b = fence("```\nx = 1\n```");
        assert!(AnnotatedCodeClassifier.emit(&b).is_empty());
    }
}
