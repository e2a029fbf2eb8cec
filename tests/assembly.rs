use std::fs;
use std::path::Path;

use docx_helper::builder::DocumentBuilder;
use docx_helper::documents::{self, announcement, reference};
use docx_helper::elements;
use docx_helper::model::{Block, HeadingLevel, Outline, TableLayout};
use docx_helper::render::Operation;
use docx_helper::style::{Style, StyleName, StyleRegistry};
use docx_helper::Error;

fn sample_outline() -> Outline {
    Outline::from_blocks([
        elements::heading(HeadingLevel::One, "Title"),
        elements::table(["A", "B"], [["1", "2"]], TableLayout::new()).expect("valid table"),
        Block::page_break(),
        elements::heading(HeadingLevel::One, "Next"),
    ])
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn outline_is_assembled_in_order_across_pages() {
    let mut assembler = DocumentBuilder::new().build_recorder().expect("standard styles");
    assembler.push_outline(sample_outline()).expect("assemble");
    let sink = assembler.into_sink();

    assert_eq!(sink.page_breaks(), 1);
    let pages = sink.pages();
    assert_eq!(pages.len(), 2);

    let Operation::Paragraph(title) = &pages[0][0] else {
        panic!("first page should open with the title");
    };
    assert_eq!(title.text(), "Title");
    let Operation::Table(table) = &pages[0][1] else {
        panic!("table should follow the title");
    };
    assert_eq!(table.header.len(), 2);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].len(), 2);

    let Operation::Paragraph(next) = &pages[1][0] else {
        panic!("second page should open with a heading");
    };
    assert_eq!(next.text(), "Next");
}

#[test]
fn missing_image_leaves_no_trace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = elements::image_safe(dir.path().join("absent.png"), 6.5).expect("not fatal");
    assert!(missing.is_none());

    let record = |image: Option<Block>| {
        let mut assembler = DocumentBuilder::new().build_recorder().expect("standard styles");
        let mut blocks = vec![elements::text("Before")];
        blocks.extend(image);
        blocks.push(elements::text("After"));
        assembler
            .push_outline(Outline::from_blocks(blocks))
            .expect("assemble");
        assembler.into_sink()
    };

    assert_eq!(record(missing), record(None));
}

#[test]
fn truncated_photo_fails_before_reaching_the_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("photo.jpg");
    image::ImageBuffer::from_pixel(64, 64, image::Rgb([90u8, 120, 200]))
        .save(&path)
        .expect("write fixture");
    let bytes = fs::read(&path).expect("read fixture");
    fs::write(&path, &bytes[..bytes.len() / 2]).expect("truncate fixture");

    let err = elements::image_safe(&path, 4.0).unwrap_err();
    assert!(matches!(err, Error::Image { .. }));
}

#[test]
fn photo_is_embedded_in_a_saved_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("photo.jpg");
    image::ImageBuffer::from_pixel(64, 32, image::Rgb([90u8, 120, 200]))
        .save(&path)
        .expect("write fixture");

    let photo = elements::image_safe(&path, 4.0)
        .expect("decodes")
        .expect("present");
    let mut assembler = DocumentBuilder::new().build().expect("standard styles");
    assembler.push_block(photo).expect("assemble");
    let saved = assembler
        .save(dir.path().join("photo.docx"))
        .expect("save");
    assert!(saved.bytes > 0);
}

#[test]
fn shape_mismatch_prevents_any_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("report.docx");
    fs::write(&target, b"previous").expect("seed target");

    let result = (|| -> docx_helper::Result<()> {
        let table = elements::table(["A", "B"], [vec!["1", "2"], vec!["3"]], TableLayout::new())?;
        let mut assembler = DocumentBuilder::new().build()?;
        assembler.push_block(table)?;
        assembler.save(&target)?;
        Ok(())
    })();

    match result {
        Err(Error::ShapeMismatch {
            row,
            expected,
            found,
        }) => assert_eq!((row, expected, found), (1, 2, 1)),
        other => panic!("expected a shape mismatch, got {other:?}"),
    }
    assert_eq!(fs::read(&target).expect("target kept"), b"previous");
}

#[test]
fn incomplete_registry_is_rejected() {
    let styles = StyleRegistry::new()
        .with_style(StyleName::Body, Style::new("Calibri", 11.0))
        .with_style(StyleName::Heading1, Style::new("Calibri", 16.0))
        .with_style(StyleName::Heading2, Style::new("Calibri", 13.0))
        .with_style(StyleName::Heading3, Style::new("Calibri", 12.0));
    let err = DocumentBuilder::new()
        .with_styles(styles)
        .build()
        .err()
        .expect("code style is missing");
    assert!(matches!(err, Error::UnknownStyle(StyleName::Code)));
}

#[test]
fn saved_document_is_a_complete_package() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("nested").join("sample.docx");

    let mut assembler = DocumentBuilder::new().build().expect("standard styles");
    assembler.push_outline(sample_outline()).expect("assemble");
    let saved = assembler.save(&target).expect("save");

    let bytes = fs::read(&target).expect("read back");
    assert_eq!(saved.path, target);
    assert_eq!(saved.bytes, bytes.len() as u64);
    assert!(bytes.starts_with(b"PK"));
    assert!(leftover_temp_files(target.parent().expect("parent")).is_empty());
}

#[test]
fn failed_save_leaves_the_target_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("occupied.docx");
    fs::create_dir(&target).expect("block the target with a directory");

    let mut assembler = DocumentBuilder::new().build().expect("standard styles");
    assembler
        .push_block(elements::text("content"))
        .expect("assemble");
    let err = assembler.save(&target).unwrap_err();

    assert!(matches!(err, Error::OutputWrite { .. }));
    assert!(target.is_dir());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn both_documents_build_without_diagrams() {
    let dir = tempfile::tempdir().expect("tempdir");
    let saved = documents::run_all(dir.path()).expect("run all");
    assert_eq!(saved.len(), 2);

    let flyer = dir.path().join(announcement::OUTPUT_FILE);
    let docs = dir
        .path()
        .join(reference::DOCS_DIR)
        .join(reference::OUTPUT_FILE);
    assert_eq!(saved[0].path, flyer);
    assert_eq!(saved[1].path, docs);
    for document in &saved {
        let bytes = fs::read(&document.path).expect("read back");
        assert!(bytes.starts_with(b"PK"));
    }
}
