//! Q&A pattern: explicit `Q:`/`Question:` markers answered by
//! `A:`/`Answer:` markers. A block may hold several pairs; answer text may
//! span multiple lines.

use crate::classify::PatternClassifier;
use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard};

const QUESTION_MARKERS: &[&str] = &["Q:", "Question:"];
const ANSWER_MARKERS: &[&str] = &["A:", "Answer:"];

pub struct QaClassifier;

impl PatternClassifier for QaClassifier {
    fn pattern(&self) -> CardType {
        CardType::QuestionAnswer
    }

    fn score(&self, block: &ContentBlock) -> ClassificationScore {
        let mut question_seen = false;
        for line in block.content_lines() {
            if strip_marker(line, QUESTION_MARKERS).is_some() {
                question_seen = true;
            } else if question_seen && strip_marker(line, ANSWER_MARKERS).is_some() {
                return ClassificationScore::new(
                    CardType::QuestionAnswer,
                    1.0,
                    &["question and answer markers in order"],
                );
            }
        }
        ClassificationScore::none(CardType::QuestionAnswer)
    }

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard> {
        let mut cards = Vec::new();
        let mut builder = PairBuilder::new();

        for line in block.content_lines() {
            if let Some(rest) = strip_marker(line, QUESTION_MARKERS) {
                builder.flush_into(block, &mut cards);
                builder.start_question(rest);
            } else if let Some(rest) = strip_marker(line, ANSWER_MARKERS) {
                builder.start_answer(rest);
            } else {
                builder.push_text(line);
            }
        }
        builder.flush_into(block, &mut cards);
        cards
    }
}

/// Case-insensitive prefix match returning the text after the marker.
fn strip_marker<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    for marker in markers {
        match line.get(..marker.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(marker) => {
                return Some(line[marker.len()..].trim());
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Question,
    Answer,
}

/// Accumulates one question/answer pair line by line, in the style of a
/// card builder: continuation lines join the field currently being filled.
struct PairBuilder {
    question: Vec<String>,
    answer: Vec<String>,
    current: Option<Field>,
}

impl PairBuilder {
    fn new() -> Self {
        Self {
            question: Vec::new(),
            answer: Vec::new(),
            current: None,
        }
    }

    fn start_question(&mut self, text: &str) {
        self.current = Some(Field::Question);
        if !text.is_empty() {
            self.question.push(text.to_string());
        }
    }

    fn start_answer(&mut self, text: &str) {
        self.current = Some(Field::Answer);
        if !text.is_empty() {
            self.answer.push(text.to_string());
        }
    }

    fn push_text(&mut self, line: &str) {
        match self.current {
            Some(Field::Question) => self.question.push(line.to_string()),
            Some(Field::Answer) => self.answer.push(line.to_string()),
            None => {}
        }
    }

    fn flush_into(&mut self, block: &ContentBlock, cards: &mut Vec<DraftCard>) {
        if !self.question.is_empty() && !self.answer.is_empty() {
            cards.push(DraftCard::new(
                CardType::QuestionAnswer,
                block,
                self.question.join("\n"),
                self.answer.join("\n"),
            ));
        }
        self.question.clear();
        self.answer.clear();
        self.current = None;
    }
}
