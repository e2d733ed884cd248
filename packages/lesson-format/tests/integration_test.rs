//! End-to-end tests for scan, load and save against real files.
//!
//! Uses the fixtures in `tests/fixtures/` plus documents built in memory and
//! written to scratch directories.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use lesson_format::progress::NoProgress;
use lesson_format::{
    ContentItem, CountSnapshot, Document, LessonSession, Outcome, Page, ProgressTick, Section,
    TestItem, TextItem, TickCounter,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A document exercising every content kind and the awkward payloads.
fn rich_document() -> Document {
    let mut doc = Document::new();
    doc.materials.push_section(
        Section::new("Markup <&> \"quotes\"")
            .with_page(
                Page::new()
                    .with_item(TextItem::new("  leading and trailing  "))
                    .with_item(TextItem::new("line one\nline two"))
                    .with_item(TextItem::new("")),
            )
            .with_page(Page::new()),
    );
    doc.materials.push_section(Section::new(""));
    doc.materials.push_section(
        Section::new("tab\there\nnewline\r").with_page(
            Page::new().with_item(TextItem::new("]]> and \r\n line ends\t")),
        ),
    );
    doc.tests.push_section(
        Section::new("Quiz").with_page(
            Page::new()
                .with_item(
                    TestItem::new("Is 1 < 2 && 3 > 2?")
                        .with_answer("yes")
                        .with_answer("no")
                        .with_answer(""),
                )
                .with_item(TestItem::new(""))
                .with_item(TextItem::new("Between tests")),
        ),
    );
    doc
}

#[test]
fn test_round_trip_preserves_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rich.lesson");
    let session = LessonSession::new();
    let doc = rich_document();

    let outcome = session.save(&doc, &path, &mut NoProgress).unwrap();
    assert_eq!(outcome, Outcome::Successful);

    let loaded = session.load(&path, &mut NoProgress).unwrap();
    assert_eq!(loaded.outcome, Outcome::Successful);
    assert_eq!(loaded.document, Some(doc));
}

#[test]
fn test_round_trip_is_stable_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.lesson");
    let second = dir.path().join("second.lesson");
    let session = LessonSession::new();

    session.save(&rich_document(), &first, &mut NoProgress).unwrap();
    let loaded = session.load(&first, &mut NoProgress).unwrap();
    session
        .save(&loaded.document.unwrap(), &second, &mut NoProgress)
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_scenario_counts() {
    let session = LessonSession::new();
    let snapshot = session.scan(&fixture("scenario.lesson")).unwrap().unwrap();

    assert_eq!(
        snapshot,
        CountSnapshot {
            material: vec![vec![2], vec![0]],
            test: vec![vec![0], vec![0], vec![1]],
        }
    );
}

#[test]
fn test_scenario_load_ticks() {
    let session = LessonSession::new();
    let mut ticks = Vec::new();
    let loaded = session
        .load(&fixture("scenario.lesson"), &mut |tick: ProgressTick| ticks.push(tick))
        .unwrap();

    assert_eq!(loaded.outcome, Outcome::Successful);
    let content = ticks.iter().filter(|t| **t == ProgressTick::Content).count();
    assert_eq!(content, 3);
    assert_eq!(
        ticks.iter().filter(|t| **t == ProgressTick::Section).count(),
        5
    );
    assert_eq!(ticks.first(), Some(&ProgressTick::Tab));

    let doc = loaded.document.unwrap();
    let ContentItem::Test(test) = &doc.tests.sections[2].pages[0].items[0] else {
        panic!("expected a test item");
    };
    assert_eq!(
        test.answers[0].id.to_string(),
        "2f1c7a52-8c1e-4f5e-9b7a-3d6f0e4a9b11"
    );
    assert_eq!(
        doc.materials.sections[0].pages[0].items[1],
        ContentItem::Text(TextItem::new("Chlorophyll absorbs red & blue light."))
    );
}

#[test]
fn test_scan_matches_load() {
    let session = LessonSession::new();
    for name in ["scenario.lesson", "lenient.lesson"] {
        let path = fixture(name);
        let snapshot = session.scan(&path).unwrap().unwrap();
        let loaded = session.load(&path, &mut NoProgress).unwrap();

        assert_eq!(CountSnapshot::of(&loaded.document.unwrap()), snapshot, "{name}");
    }
}

#[test]
fn test_load_ticks_match_scanned_totals() {
    let session = LessonSession::new();
    let path = fixture("scenario.lesson");
    let snapshot = session.scan(&path).unwrap().unwrap();

    let mut counter = TickCounter::new();
    session.load(&path, &mut counter).unwrap();

    assert_eq!(counter.contents, snapshot.total_items());
    assert_eq!(counter.total(), snapshot.total_ticks());
}

#[test]
fn test_save_and_load_tick_streams_match() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticks.lesson");
    let session = LessonSession::new();
    let doc = rich_document();

    let mut saved = Vec::new();
    session
        .save(&doc, &path, &mut |tick: ProgressTick| saved.push(tick))
        .unwrap();
    let mut loaded = Vec::new();
    session
        .load(&path, &mut |tick: ProgressTick| loaded.push(tick))
        .unwrap();

    assert_eq!(saved, loaded);
    assert_eq!(
        saved.iter().filter(|t| **t == ProgressTick::Content).count(),
        doc.item_count()
    );
}

#[test]
fn test_lenient_validation_keeps_earlier_sections() {
    let session = LessonSession::new();
    let loaded = session
        .load(&fixture("lenient.lesson"), &mut NoProgress)
        .unwrap();

    assert_eq!(loaded.outcome, Outcome::Successful);
    let doc = loaded.document.unwrap();
    let titles: Vec<_> = doc
        .materials
        .sections
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(doc.tests.sections.len(), 1);
    assert_eq!(doc.tests.item_count(), 1);
}

#[test]
fn test_lenient_scan_counts() {
    let session = LessonSession::new();
    let snapshot = session.scan(&fixture("lenient.lesson")).unwrap().unwrap();
    assert_eq!(snapshot.material, vec![vec![1], vec![1, 0]]);
    assert_eq!(snapshot.test, vec![vec![1]]);
}

#[test]
fn test_missing_materials_is_error() {
    let session = LessonSession::new();
    let path = fixture("missing_materials.lesson");

    let loaded = session.load(&path, &mut NoProgress).unwrap();
    assert_eq!(loaded.outcome, Outcome::Error);
    assert!(loaded.document.is_none());
    assert!(session.scan(&path).unwrap().is_none());
}

#[test]
fn test_truncated_file_is_error() {
    let session = LessonSession::new();
    let path = fixture("truncated.lesson");

    let loaded = session.load(&path, &mut NoProgress).unwrap();
    assert_eq!(loaded.outcome, Outcome::Error);
    assert!(loaded.document.is_none());
    assert!(session.scan(&path).unwrap().is_none());
}

#[test]
fn test_missing_file_is_error() {
    let session = LessonSession::new();
    let loaded = session
        .load(&fixture("does-not-exist.lesson"), &mut NoProgress)
        .unwrap();
    assert_eq!(loaded.outcome, Outcome::Error);
}

#[test]
fn test_cancel_during_load() {
    let session = LessonSession::new();
    let handle = session.cancel_handle();
    let mut seen = 0;

    let loaded = session
        .load(&fixture("scenario.lesson"), &mut |tick: ProgressTick| {
            seen += 1;
            if tick == ProgressTick::Section {
                handle.cancel();
            }
        })
        .unwrap();

    assert_eq!(loaded.outcome, Outcome::Cancelled);
    assert!(loaded.document.is_none());
    // Tab, then the first Section; the next check stops the walk.
    assert_eq!(seen, 2);
}

#[test]
fn test_host_abort_during_save_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aborted.lesson");
    let session = LessonSession::new();
    let handle = session.cancel_handle();

    let outcome = session
        .save(&rich_document(), &path, &mut |tick: ProgressTick| {
            if tick == ProgressTick::Page {
                handle.abort();
            }
        })
        .unwrap();

    assert_eq!(outcome, Outcome::Error);
}

#[test]
fn test_cancel_during_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cancelled.lesson");
    let session = LessonSession::new();
    let handle = session.cancel_handle();

    let outcome = session
        .save(&rich_document(), &path, &mut |tick: ProgressTick| {
            if tick == ProgressTick::Content {
                handle.cancel();
            }
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Cancelled);

    // The next operation starts from a clean token.
    let outcome = session.save(&rich_document(), &path, &mut NoProgress).unwrap();
    assert_eq!(outcome, Outcome::Successful);
}

#[test]
fn test_invalid_path_is_argument_error() {
    let session = LessonSession::new();
    assert!(session.load(Path::new(""), &mut NoProgress).is_err());
    assert!(session
        .save(&Document::new(), Path::new(""), &mut NoProgress)
        .is_err());
}

#[test]
fn test_written_file_is_well_formed_xml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dom.lesson");
    let session = LessonSession::new();
    let doc = rich_document();
    session.save(&doc, &path, &mut NoProgress).unwrap();

    let xml = std::fs::read_to_string(&path).unwrap();
    let dom = roxmltree::Document::parse(&xml).unwrap();
    let root = dom.root_element();
    assert_eq!(root.tag_name().name(), "Lesson");
    assert_eq!(root.attribute("Version"), Some("1.0"));

    let tabs: Vec<_> = root
        .children()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name())
        .collect();
    assert_eq!(tabs, vec!["Materials", "Tests"]);

    let first_section = dom
        .descendants()
        .find(|n| n.has_tag_name("Section"))
        .unwrap();
    assert_eq!(
        first_section.attribute("Title"),
        Some("Markup <&> \"quotes\"")
    );

    let answers: Vec<_> = dom
        .descendants()
        .filter(|n| n.has_tag_name("Answer"))
        .map(|n| n.attribute("Id").unwrap().to_string())
        .collect();
    let ContentItem::Test(test) = &doc.tests.sections[0].pages[0].items[0] else {
        panic!("expected a test item");
    };
    let expected: Vec<_> = test.answers.iter().map(|a| a.id.to_string()).collect();
    assert_eq!(answers, expected);

    let text = dom
        .descendants()
        .find(|n| n.has_tag_name("TextItem"))
        .and_then(|n| n.text())
        .unwrap();
    assert_eq!(text, "  leading and trailing  ");

    let whitespace_section = dom
        .descendants()
        .filter(|n| n.has_tag_name("Section"))
        .nth(2)
        .unwrap();
    assert_eq!(
        whitespace_section.attribute("Title"),
        Some("tab\there\nnewline\r")
    );
    let line_ends = whitespace_section
        .descendants()
        .find(|n| n.has_tag_name("TextItem"))
        .and_then(|n| n.text())
        .unwrap();
    assert_eq!(line_ends, "]]> and \r\n line ends\t");
}

#[test]
fn test_save_rejects_non_xml_characters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("control.lesson");
    let session = LessonSession::new();

    let mut doc = Document::new();
    doc.materials.push_section(
        Section::new("ok").with_page(Page::new().with_item(TextItem::new("bell \u{1} ctrl"))),
    );
    let outcome = session.save(&doc, &path, &mut NoProgress).unwrap();
    assert_eq!(outcome, Outcome::Error);

    let mut doc = Document::new();
    doc.tests.push_section(Section::new("null \u{0} title"));
    let outcome = session.save(&doc, &path, &mut NoProgress).unwrap();
    assert_eq!(outcome, Outcome::Error);
}

#[test]
fn test_text_after_root_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trailing.lesson");
    std::fs::write(
        &path,
        "<?xml version=\"1.0\"?>\n<Lesson><Materials/><Tests/></Lesson>\ngarbage\n",
    )
    .unwrap();
    let session = LessonSession::new();

    let loaded = session.load(&path, &mut NoProgress).unwrap();
    assert_eq!(loaded.outcome, Outcome::Error);
    assert!(loaded.document.is_none());
    assert!(session.scan(&path).unwrap().is_none());
}
