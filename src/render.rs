//! The contract between the assembler and the output container.
//!
//! A [`DocumentSink`] only ever receives fully resolved primitives: every run
//! carries its concrete font, size and color, every paragraph its concrete
//! alignment and spacing. Implementations therefore never consult the style
//! registry themselves.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};

use crate::model::HorizontalAlignment;
use crate::richtext::ResolvedRun;
use crate::style::{Rgb, StyleName};

/// Paragraph level formatting after style resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphFormat {
    /// Style the paragraph was resolved from, attached so word processors can recognise headings.
    pub style: StyleName,
    /// Horizontal alignment.
    pub alignment: HorizontalAlignment,
    /// Space before the paragraph in points.
    pub space_before_pt: f32,
    /// Space after the paragraph in points.
    pub space_after_pt: f32,
    /// Whether the paragraph is a bulleted list entry.
    pub bullet: bool,
}

/// A paragraph ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedParagraph {
    /// Paragraph formatting.
    pub format: ParagraphFormat,
    /// Runs in left-to-right order.
    pub runs: Vec<ResolvedRun>,
}

impl RenderedParagraph {
    /// Returns the concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A table ready to be written. Each cell holds exactly one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedTable {
    /// Header row cells.
    pub header: Vec<ResolvedRun>,
    /// Data rows, each as long as the header.
    pub rows: Vec<Vec<ResolvedRun>>,
    /// Column widths in twentieths of a point.
    pub column_widths_twips: Vec<u32>,
    /// Table alignment on the page.
    pub alignment: HorizontalAlignment,
    /// Header row background.
    pub header_fill: Option<Rgb>,
}

/// A picture ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPicture {
    /// PNG-encoded image bytes.
    pub bytes: Vec<u8>,
    /// Pixel dimensions as `(width, height)`.
    pub pixel_size: (u32, u32),
    /// Rendered width in English Metric Units.
    pub width_emu: u32,
    /// Rendered height in English Metric Units.
    pub height_emu: u32,
    /// Alignment of the paragraph holding the picture.
    pub alignment: HorizontalAlignment,
}

/// Output container receiving the assembled content, in order.
pub trait DocumentSink {
    /// Appends a paragraph.
    fn add_paragraph(&mut self, paragraph: RenderedParagraph);

    /// Appends a table.
    fn add_table(&mut self, table: RenderedTable);

    /// Appends a picture in its own paragraph.
    fn add_picture(&mut self, picture: RenderedPicture);

    /// Appends a hard page break.
    fn add_page_break(&mut self);

    /// Serializes the accumulated content into `file`.
    ///
    /// Packaging failures are reported as [`io::ErrorKind::Other`].
    fn write_to(self, file: &mut File) -> io::Result<()>;
}

/// One operation received by a [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// A paragraph was added.
    Paragraph(RenderedParagraph),
    /// A table was added.
    Table(RenderedTable),
    /// A picture was added.
    Picture(RenderedPicture),
    /// A page break was added.
    PageBreak,
}

/// Sink that keeps every operation in memory.
///
/// Saving a recorder writes a line-per-operation outline, which is handy for
/// reviewing an outline without opening a word processor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recorder {
    operations: Vec<Operation>,
}

impl Recorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the number of recorded page breaks.
    pub fn page_breaks(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::PageBreak))
            .count()
    }

    /// Splits the operations at every page break.
    pub fn pages(&self) -> Vec<&[Operation]> {
        self.operations
            .split(|op| matches!(op, Operation::PageBreak))
            .collect()
    }

    /// Returns a plain text outline of the recorded operations.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for op in &self.operations {
            // Writing into a String cannot fail.
            let _ = match op {
                Operation::Paragraph(paragraph) if paragraph.format.bullet => {
                    writeln!(out, "* {}", paragraph.text())
                }
                Operation::Paragraph(paragraph) => writeln!(
                    out,
                    "[{}] {}",
                    paragraph.format.style.display_name(),
                    paragraph.text()
                ),
                Operation::Table(table) => writeln!(
                    out,
                    "<table {}x{}>",
                    table.header.len(),
                    table.rows.len() + 1
                ),
                Operation::Picture(picture) => writeln!(
                    out,
                    "<picture {}x{} emu>",
                    picture.width_emu, picture.height_emu
                ),
                Operation::PageBreak => writeln!(out, "----"),
            };
        }
        out
    }
}

impl DocumentSink for Recorder {
    fn add_paragraph(&mut self, paragraph: RenderedParagraph) {
        self.operations.push(Operation::Paragraph(paragraph));
    }

    fn add_table(&mut self, table: RenderedTable) {
        self.operations.push(Operation::Table(table));
    }

    fn add_picture(&mut self, picture: RenderedPicture) {
        self.operations.push(Operation::Picture(picture));
    }

    fn add_page_break(&mut self) {
        self.operations.push(Operation::PageBreak);
    }

    fn write_to(self, file: &mut File) -> io::Result<()> {
        file.write_all(self.outline().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(style: StyleName, text: &str, bullet: bool) -> RenderedParagraph {
        RenderedParagraph {
            format: ParagraphFormat {
                style,
                alignment: HorizontalAlignment::Left,
                space_before_pt: 0.0,
                space_after_pt: 0.0,
                bullet,
            },
            runs: vec![ResolvedRun {
                text: text.to_string(),
                font_family: "Calibri".to_string(),
                size_pt: 11.0,
                color: Rgb::BLACK,
                bold: false,
                italic: false,
            }],
        }
    }

    #[test]
    fn recorder_outline_lists_operations_in_order() {
        let mut recorder = Recorder::new();
        recorder.add_paragraph(paragraph(StyleName::Heading1, "Intro", false));
        recorder.add_paragraph(paragraph(StyleName::Body, "point", true));
        recorder.add_page_break();
        recorder.add_paragraph(paragraph(StyleName::Body, "Next", false));

        assert_eq!(recorder.page_breaks(), 1);
        assert_eq!(recorder.pages().len(), 2);
        assert_eq!(
            recorder.outline(),
            "[Heading 1] Intro\n* point\n----\n[Normal] Next\n"
        );
    }
}
