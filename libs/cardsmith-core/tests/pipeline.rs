//! End-to-end properties of the segment → classify → normalize → merge
//! pipeline.

use cardsmith_core::{
    merge, run_pipeline, segment, Card, CardType, ClassifierRegistry, MergeOptions,
    PipelineOptions,
};

const NOTES: &str = "\
# Cell biology

Osmosis: diffusion of water across a membrane

Q: What organelle produces ATP?
A: The mitochondrion.

Phases of mitosis:
- prophase
- metaphase
- anaphase
- telophase

| Element | Symbol |
|---|---|
| Gold | Au |
| Iron | Fe |

Reverse a vec in place:
```rust
v.reverse();
```
";

fn run(text: &str) -> Vec<Card> {
    let registry = ClassifierRegistry::with_builtins();
    run_pipeline(text, &registry, &PipelineOptions::default())
        .unwrap()
        .cards
}

#[test]
fn segmentation_covers_input_exactly() {
    let blocks = segment(NOTES).unwrap();
    let rebuilt: String = blocks.iter().map(|b| b.raw_text.as_str()).collect();
    assert_eq!(rebuilt, NOTES);

    let mut cursor = 0;
    for block in &blocks {
        assert_eq!(block.start_offset, cursor, "gap or overlap at {}", cursor);
        assert!(block.end_offset > block.start_offset);
        cursor = block.end_offset;
    }
    assert_eq!(cursor, NOTES.len());
}

#[test]
fn pipeline_is_deterministic() {
    let registry = ClassifierRegistry::with_builtins();
    let options = PipelineOptions::default();
    let merge_options = MergeOptions {
        dedupe: true,
        sort: cardsmith_core::SortOrder::Random,
        random_seed: Some(7),
        ..Default::default()
    };

    let deck_a = merge(
        vec![run_pipeline(NOTES, &registry, &options).unwrap().cards],
        &merge_options,
    )
    .unwrap();
    let deck_b = merge(
        vec![run_pipeline(NOTES, &registry, &options).unwrap().cards],
        &merge_options,
    )
    .unwrap();

    let render = |deck: &cardsmith_core::Deck| {
        deck.cards()
            .iter()
            .map(|c| format!("{}\t{}\t{}", c.front, c.back, c.fingerprint))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(render(&deck_a), render(&deck_b));
}

#[test]
fn every_pattern_claims_its_block() {
    let registry = ClassifierRegistry::with_builtins();
    let report = run_pipeline(NOTES, &registry, &PipelineOptions::default()).unwrap();

    for pattern in [
        CardType::Definition,
        CardType::QuestionAnswer,
        CardType::List,
        CardType::Table,
        CardType::AnnotatedCode,
    ] {
        assert!(
            report.blocks_by_pattern.contains_key(&pattern),
            "{} block not classified",
            pattern.as_str()
        );
    }
}

#[test]
fn definition_scenario_builds_concept_card() {
    let cards = run("Term: CPU\nDefinition: Central Processing Unit");
    assert_eq!(cards[0].front, "What is CPU?");
    assert!(cards[0].back.contains("Central Processing Unit"));
    assert_eq!(cards[0].card_type, CardType::Definition);
}

#[test]
fn captionless_fence_yields_zero_cards() {
    let registry = ClassifierRegistry::with_builtins();
    let report = run_pipeline(
        "```py\nx = 1\n```",
        &registry,
        &PipelineOptions::default(),
    )
    .unwrap();
    assert_eq!(report.unclassified, 1);
    assert!(report.cards.is_empty());
}

#[test]
fn fingerprints_collide_across_case_and_whitespace() {
    let a = run("Q: What  is DNA?\nA: Deoxyribonucleic acid");
    let b = run("q: what is dna?\nA:   deoxyribonucleic ACID");
    assert_eq!(a[0].fingerprint, b[0].fingerprint);
}

#[test]
fn merging_overlapping_decks_keeps_first_occurrences() {
    let shared_one = "Q: One?\nA: First.";
    let shared_two = "Q: Two?\nA: Second.";
    let seq_a = run(&format!(
        "{}\n\n{}\n\nQ: A3?\nA: x\n\nQ: A4?\nA: y\n\nQ: A5?\nA: z",
        shared_one, shared_two
    ));
    let seq_b = run(&format!(
        "Q: B1?\nA: x\n\nQ: B2?\nA: y\n\n{}\n\n{}\n\nQ: B5?\nA: z",
        shared_one, shared_two
    ));
    assert_eq!(seq_a.len(), 5);
    assert_eq!(seq_b.len(), 5);

    let options = MergeOptions {
        dedupe: true,
        ..Default::default()
    };
    let deck = merge(vec![seq_a, seq_b], &options).unwrap();
    assert_eq!(deck.len(), 8);

    // All of sequence one first, then the non-duplicate members of
    // sequence two.
    let fronts: Vec<&str> = deck.cards().iter().map(|c| c.front.as_str()).collect();
    assert_eq!(
        fronts,
        vec!["One?", "Two?", "A3?", "A4?", "A5?", "B1?", "B2?", "B5?"]
    );
}

#[test]
fn priority_tags_preserve_tier_order() {
    let registry = ClassifierRegistry::with_builtins();
    let make = |tag: &str, text: &str| {
        let options = PipelineOptions {
            source_tags: [tag.to_string()].into(),
            ..Default::default()
        };
        run_pipeline(text, &registry, &options).unwrap().cards
    };

    let cards: Vec<Card> = [
        make("x", "Q: A?\nA: 1."),
        make("p", "Q: B?\nA: 2."),
        make("x", "Q: C?\nA: 3."),
        make("p", "Q: D?\nA: 4."),
    ]
    .into_iter()
    .flatten()
    .collect();

    let options = MergeOptions {
        priority_tags: Some(["p".to_string()].into()),
        ..Default::default()
    };
    let deck = merge(vec![cards], &options).unwrap();
    let fronts: Vec<&str> = deck.cards().iter().map(|c| c.front.as_str()).collect();
    assert_eq!(fronts, vec!["B?", "D?", "A?", "C?"]);
}
