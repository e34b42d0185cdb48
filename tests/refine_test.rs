//! Integration tests for the refinement pipeline.

use deckmd::assemble::{assemble_document, AssembleOptions, HeadingStyle, Locale};
use deckmd::render::refine::{
    collapse_repeated_rules, collapse_version_runs, find_footer_candidates,
    remove_trailing_footers,
};
use deckmd::model::{Element, SlideDeck, SlideRecord, SourceDocument};
use deckmd::render::{MarkdownRefiner, RefineOptions, RefinePass};
use deckmd::OcrCapability;

const DECK: &str = "## 🖼 Slide 1: - 1 -

- Welcome
-
- .

---

---

## 🖼 Slide 2: Roadmap

- Q1 launch
- Confidential

[[TABLE]]
| Item | Price |
| --- | --- |
| - | - |
[[/TABLE]]

Confidential

## 🖼 Slide 3: History

- V0.1
- V0.2
- V0.3
- V0.4
- V1.0

Confidential

## 🖼 Slide 4: Team

- Alice
- Bob

Confidential



";

#[test]
fn test_refine_deck() {
    let refined = MarkdownRefiner::default().refine(DECK);

    assert!(refined.starts_with("## Slide 1\n\n- Welcome\n\n---\n\n## Roadmap"));
    assert!(refined.contains("- 버전: V0.1 ~ V1.0"));
    // mid-section footer survives, trailing ones are gone
    assert!(refined.contains("- Q1 launch\n- Confidential"));
    assert_eq!(refined.matches("Confidential").count(), 1);
    assert!(refined.ends_with("- Alice\n- Bob"));
    assert!(!refined.contains("\n\n\n"));
}

#[test]
fn test_refine_is_idempotent() {
    let refiner = MarkdownRefiner::default();
    let once = refiner.refine(DECK);
    let twice = refiner.refine(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_footer_above_unit_rule_needs_second_refine() {
    let deck = SlideDeck {
        slides: ["Intro", "Plan", "Wrap"]
            .iter()
            .map(|text| {
                SlideRecord::new(vec![
                    Element::text([*text]).at(0.0, 0.0),
                    Element::text(["ACME Confidential"]).at(100.0, 0.0),
                ])
            })
            .collect(),
    };
    let options = AssembleOptions::default()
        .with_heading_style(HeadingStyle::Plain)
        .with_locale(Locale::English);
    let markdown = assemble_document(
        &SourceDocument::Slides(deck),
        &OcrCapability::disabled(),
        &options,
    );
    let refiner = MarkdownRefiner::default();

    let once = refiner.refine(&markdown);
    assert!(!once.contains("---"));
    assert_eq!(once.matches("- ACME Confidential").count(), 3);

    let twice = refiner.refine(&once);
    assert_eq!(
        twice,
        "## Slide 1\n\n- Intro\n\n## Slide 2\n\n- Plan\n\n## Slide 3\n\n- Wrap"
    );
    assert_eq!(refiner.refine(&twice), twice);
}

#[test]
fn test_block_interiors_are_untouched() {
    let refined = MarkdownRefiner::default().refine(DECK);
    assert!(refined.contains("[[TABLE]]\n| Item | Price |\n| --- | --- |\n| - | - |\n[[/TABLE]]"));

    let text = "[[DIAGRAM]]\n-\n---\n\n---\n\n\n\n- V0.1\n- V0.2\n- V0.3\n- V0.4\n- V0.5\n[[/DIAGRAM]]";
    assert_eq!(MarkdownRefiner::default().refine(text), text);
}

#[test]
fn test_unmatched_delimiter_gets_no_protection() {
    let text = "[[TABLE]]\n-\nrow";
    assert_eq!(MarkdownRefiner::default().refine(text), "[[TABLE]]\nrow");
}

#[test]
fn test_footer_locality() {
    let text = "## A\nintro\nPage footer\n\n## B\nPage footer\nmore\n\n## C\ntext\nPage footer\n\n## D\nend\nPage footer";
    let candidates = find_footer_candidates(text, 3);
    assert!(candidates.contains("Page footer"));

    let cleaned = remove_trailing_footers(text, &candidates);
    assert_eq!(
        cleaned,
        "## A\nintro\n\n## B\nPage footer\nmore\n\n## C\ntext\n\n## D\nend"
    );
}

#[test]
fn test_footer_below_threshold_is_kept() {
    let text = "## A\nx\nfooter\n\n## B\ny\nfooter";
    let candidates = find_footer_candidates(text, 3);
    assert!(candidates.is_empty());
    assert_eq!(remove_trailing_footers(text, &candidates), text);
}

#[test]
fn test_leading_headerless_span_is_its_own_section() {
    let text = "cover\nFOOT\n## A\nbody\nFOOT\n## B\nFOOT";
    let candidates = find_footer_candidates(text, 3);
    assert_eq!(remove_trailing_footers(text, &candidates), "cover\n\n## A\nbody\n\n## B");
}

#[test]
fn test_version_collapse_boundary() {
    let four = "- V1.0\n- V1.1\n- V1.2\n- V1.3";
    assert_eq!(collapse_version_runs(four, 5), four);

    let five = "- V1.0\n- V1.1\n- V1.2\n- V1.3\n- V2.0";
    assert_eq!(collapse_version_runs(five, 5), "- 버전: V1.0 ~ V2.0");

    // threshold is configurable
    assert_eq!(collapse_version_runs(four, 4), "- 버전: V1.0 ~ V1.3");
}

#[test]
fn test_rule_collapse_reaches_fixed_point() {
    let text = "---\n\n---\n\n---\n\n---\n\n---";
    let collapsed = collapse_repeated_rules(text);
    assert_eq!(collapsed, "---");
    assert_eq!(collapse_repeated_rules(&collapsed), collapsed);
}

#[test]
fn test_disable_single_pass() {
    let options = RefineOptions::default().with_pass(RefinePass::VersionRuns, false);
    let refiner = MarkdownRefiner::new(options);
    let text = "- V0.1\n- V0.2\n- V0.3\n- V0.4\n- V0.5";
    assert_eq!(refiner.refine(text), text);
    assert!(!refiner.options().is_enabled(RefinePass::VersionRuns));
}

#[test]
fn test_custom_thresholds() {
    let options = RefineOptions::default()
        .with_footer_min_occurrences(2)
        .with_max_consecutive_newlines(1);
    let refiner = MarkdownRefiner::new(options);
    let text = "## A\nbody\nfoot\n\n## B\nmore\nfoot";
    assert_eq!(refiner.refine(text), "## A\nbody\n## B\nmore");
}
