//! Sequential assembly of blocks into a sink, and the single atomic save.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::PageSetup;
use crate::docx::DocxSink;
use crate::error::{Error, Result};
use crate::model::{
    Block, BulletItem, CodeBlock, HeadingBlock, ImageBlock, Outline, Paragraph, Section, Table,
};
use crate::render::{
    DocumentSink, ParagraphFormat, RenderedParagraph, RenderedPicture, RenderedTable,
};
use crate::richtext::{resolve_runs, Run};
use crate::style::{Style, StyleName, StyleRegistry};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Smallest gap kept between body text and table header text, in points.
const HEADER_SIZE_STEP_PT: f32 = 1.0;

/// Lifecycle of an assembler. Saving consumes the assembler, so there is no
/// observable saved state on the assembler itself; see [`SavedDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblyState {
    /// Nothing has been emitted yet.
    Empty,
    /// At least one block or page break has been emitted.
    Building,
    /// A push failed. The content is incomplete and can no longer be extended or saved.
    Failed,
}

/// Outcome of a successful [`DocumentAssembler::save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedDocument {
    /// Path the document was written to.
    pub path: PathBuf,
    /// Size of the written file in bytes.
    pub bytes: u64,
}

/// Appends blocks to a sink in order, resolving styles as each block is emitted.
///
/// The assembler never reorders or revisits content. Once a push fails the
/// assembler moves to [`AssemblyState::Failed`]; later pushes and [`save`] then
/// return [`Error::AssemblyFailed`] instead of extending or writing a partial
/// document.
///
/// [`save`]: DocumentAssembler::save
#[derive(Debug)]
pub struct DocumentAssembler<S: DocumentSink = DocxSink> {
    styles: StyleRegistry,
    setup: PageSetup,
    sink: S,
    state: AssemblyState,
    sections: usize,
    page_breaks: usize,
}

impl<S: DocumentSink> DocumentAssembler<S> {
    pub(crate) fn new(styles: StyleRegistry, setup: PageSetup, sink: S) -> Self {
        Self {
            styles,
            setup,
            sink,
            state: AssemblyState::Empty,
            sections: 0,
            page_breaks: 0,
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Returns the style registry used for resolution.
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Returns the page geometry.
    pub fn page_setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Returns the number of sections pushed so far.
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Returns the number of page breaks emitted so far.
    pub fn page_breaks(&self) -> usize {
        self.page_breaks
    }

    /// Emits every section of `outline` in order.
    pub fn push_outline(&mut self, outline: Outline) -> Result<()> {
        outline
            .into_iter()
            .try_for_each(|section| self.push_section(section))
    }

    /// Emits the blocks of `section`, followed by a page break when the section asks for one.
    pub fn push_section(&mut self, section: Section) -> Result<()> {
        self.ensure_usable()?;
        self.sections += 1;
        log::debug!(
            "Assembling section {} ({})",
            self.sections,
            section.title().unwrap_or("untitled")
        );
        let page_break_after = section.page_break_after();
        for block in section.into_blocks() {
            self.push_block(block)?;
        }
        if page_break_after {
            self.emit_page_break();
            self.state = AssemblyState::Building;
        }
        Ok(())
    }

    /// Emits a single block.
    pub fn push_block(&mut self, block: Block) -> Result<()> {
        self.ensure_usable()?;
        let emitted = match block {
            Block::Heading(heading) => self.emit_heading(&heading),
            Block::Paragraph(paragraph) => self.emit_paragraph(&paragraph),
            Block::Bullet(item) => self.emit_bullet(&item),
            Block::Table(table) => self.emit_table(&table),
            Block::Code(code) => self.emit_code(&code),
            Block::Image(image) => {
                self.emit_image(image);
                Ok(())
            }
            Block::PageBreak => {
                self.emit_page_break();
                Ok(())
            }
        };
        self.state = match emitted {
            Ok(()) => AssemblyState::Building,
            Err(_) => AssemblyState::Failed,
        };
        emitted
    }

    /// Stops assembling and hands back the sink, for previews and inspection.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Writes the assembled document to `path`.
    ///
    /// The content is serialized into a temporary file next to `path` and then
    /// renamed over it, so `path` either keeps its previous contents or holds
    /// the complete new document. Missing parent directories are created.
    pub fn save(self, path: impl AsRef<Path>) -> Result<SavedDocument> {
        self.ensure_usable()?;
        let path = path.as_ref().to_path_buf();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|err| Error::output_write(&path, err))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".docx-helper-")
            .suffix(".tmp")
            .tempfile_in(&parent)
            .map_err(|err| Error::output_write(&path, err))?;
        self.sink
            .write_to(temp.as_file_mut())
            .map_err(|err| Error::output_write(&path, err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| Error::output_write(&path, err))?;
        temp.persist(&path)
            .map_err(|err| Error::output_write(&path, err.error))?;

        let bytes = fs::metadata(&path)
            .map_err(|err| Error::output_write(&path, err))?
            .len();
        log::info!("Saved {} ({} bytes)", path.display(), bytes);
        Ok(SavedDocument { path, bytes })
    }

    fn ensure_usable(&self) -> Result<()> {
        match self.state {
            AssemblyState::Failed => Err(Error::AssemblyFailed),
            _ => Ok(()),
        }
    }

    fn emit_heading(&mut self, heading: &HeadingBlock) -> Result<()> {
        let name = StyleName::heading(heading.level());
        let style = self.styles.resolve(name)?;
        let mut format = format_for(name, style);
        if let Some(alignment) = heading.alignment() {
            format.alignment = alignment;
        }
        let paragraph = RenderedParagraph {
            format,
            runs: resolve_runs(heading.runs(), style),
        };
        self.sink.add_paragraph(paragraph);
        Ok(())
    }

    fn emit_paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        let style = self.styles.resolve(StyleName::Body)?;
        let mut format = format_for(StyleName::Body, style);
        if let Some(alignment) = paragraph.alignment() {
            format.alignment = alignment;
        }
        if let Some(before) = paragraph.space_before_pt() {
            format.space_before_pt = before;
        }
        if let Some(after) = paragraph.space_after_pt() {
            format.space_after_pt = after;
        }
        let rendered = RenderedParagraph {
            format,
            runs: resolve_runs(paragraph.runs(), style),
        };
        self.sink.add_paragraph(rendered);
        Ok(())
    }

    fn emit_bullet(&mut self, item: &BulletItem) -> Result<()> {
        let style = self.styles.resolve(StyleName::Body)?;
        let mut format = format_for(StyleName::Body, style);
        format.bullet = true;
        let rendered = RenderedParagraph {
            format,
            runs: resolve_runs(item.runs(), style),
        };
        self.sink.add_paragraph(rendered);
        Ok(())
    }

    fn emit_table(&mut self, table: &Table) -> Result<()> {
        let body = self.styles.resolve(StyleName::Body)?;
        let layout = table.layout();
        let cell_size = layout.font_size_pt();
        let header_size = cell_size.min(header_ceiling_pt(body.size_pt()));

        let header = table
            .headers()
            .iter()
            .map(|text| Run::new(text.as_str()).bold().sized(header_size).resolve(body))
            .collect();
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(column, text)| {
                        let run = Run::new(text.as_str()).sized(cell_size);
                        let run = if layout.emphasized_column() == Some(column) {
                            run.bold()
                        } else {
                            run
                        };
                        run.resolve(body)
                    })
                    .collect()
            })
            .collect();

        self.sink.add_table(RenderedTable {
            header,
            rows,
            column_widths_twips: layout
                .widths()
                .distribute(table.column_count(), self.setup.text_width_twips()),
            alignment: layout.alignment(),
            header_fill: layout.header_fill(),
        });
        Ok(())
    }

    fn emit_code(&mut self, code: &CodeBlock) -> Result<()> {
        let style = self.styles.resolve(StyleName::Code)?;
        for line in code.lines() {
            let mut format = format_for(StyleName::Code, style);
            format.space_before_pt = 0.0;
            format.space_after_pt = 0.0;
            self.sink.add_paragraph(RenderedParagraph {
                format,
                runs: vec![Run::new(line.as_str()).resolve(style)],
            });
        }
        Ok(())
    }

    fn emit_image(&mut self, image: ImageBlock) {
        let width_emu = inches_to_emu(image.width_in());
        let height_emu = inches_to_emu(image.height_in());
        let alignment = image.alignment();
        let pixel_size = image.pixel_size();
        self.sink.add_picture(RenderedPicture {
            bytes: image.into_bytes(),
            pixel_size,
            width_emu,
            height_emu,
            alignment,
        });
    }

    fn emit_page_break(&mut self) {
        self.page_breaks += 1;
        self.sink.add_page_break();
    }
}

fn format_for(name: StyleName, style: &Style) -> ParagraphFormat {
    ParagraphFormat {
        style: name,
        alignment: style.alignment(),
        space_before_pt: style.space_before_pt(),
        space_after_pt: style.space_after_pt(),
        bullet: false,
    }
}

/// Largest header size for a body size: one point smaller, or half the body
/// size when that would not stay positive.
fn header_ceiling_pt(body_pt: f32) -> f32 {
    let stepped = body_pt - HEADER_SIZE_STEP_PT;
    if stepped > 0.0 {
        stepped
    } else {
        body_pt / 2.0
    }
}

fn inches_to_emu(inches: f64) -> u32 {
    (inches * EMU_PER_INCH).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::elements;
    use crate::model::{HeadingLevel, HorizontalAlignment, TableLayout};
    use crate::render::{Operation, Recorder};
    use crate::style::Rgb;

    fn recorder() -> DocumentAssembler<Recorder> {
        DocumentBuilder::new().build_recorder().expect("standard styles")
    }

    fn paragraphs(recorder: &Recorder) -> Vec<&RenderedParagraph> {
        recorder
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Paragraph(paragraph) => Some(paragraph),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn state_moves_from_empty_to_building() {
        let mut assembler = recorder();
        assert_eq!(assembler.state(), AssemblyState::Empty);
        assembler
            .push_block(elements::text("hello"))
            .expect("push");
        assert_eq!(assembler.state(), AssemblyState::Building);
    }

    #[test]
    fn body_runs_inherit_the_body_style() {
        let mut assembler = recorder();
        assembler
            .push_block(elements::bullet_item("safe", Some("Label: ")))
            .expect("push");
        let sink = assembler.into_sink();
        let paragraph = paragraphs(&sink)[0].clone();
        assert!(paragraph.format.bullet);
        assert_eq!(paragraph.runs[0].text, "Label: ");
        assert!(paragraph.runs[0].bold);
        assert_eq!(paragraph.runs[1].text, "safe");
        assert!(!paragraph.runs[1].bold);
        assert_eq!(paragraph.runs[1].font_family, "Calibri");
        assert_eq!(paragraph.runs[1].size_pt, 11.0);
    }

    #[test]
    fn heading_alignment_override_is_applied() {
        let mut assembler = recorder();
        let title = crate::model::HeadingBlock::new(HeadingLevel::One, "Title")
            .with_run(Run::new("Title").sized(28.0).colored(Rgb::new(0x1A, 0x47, 0x8A)))
            .with_alignment(HorizontalAlignment::Center);
        assembler.push_block(Block::Heading(title)).expect("push");
        let sink = assembler.into_sink();
        let heading = paragraphs(&sink)[0].clone();
        assert_eq!(heading.format.style, StyleName::Heading1);
        assert_eq!(heading.format.alignment, HorizontalAlignment::Center);
        assert!(heading.runs[0].bold);
        assert_eq!(heading.runs[0].size_pt, 28.0);
    }

    #[test]
    fn table_header_is_bold_and_smaller_than_body() {
        let mut assembler = recorder();
        let layout = TableLayout::new()
            .with_font_size(14.0)
            .with_emphasized_column(1);
        assembler
            .push_block(
                elements::table(["Icon", "Provider"], [vec!["*", "Gemini"]], layout)
                    .expect("valid table"),
            )
            .expect("push");
        let sink = assembler.into_sink();
        let Operation::Table(table) = &sink.operations()[0] else {
            panic!("expected a table");
        };
        assert!(table.header.iter().all(|cell| cell.bold));
        assert!(table.header.iter().all(|cell| cell.size_pt == 10.0));
        assert!(!table.rows[0][0].bold);
        assert!(table.rows[0][1].bold);
        assert_eq!(table.rows[0][1].size_pt, 14.0);
        assert_eq!(table.column_widths_twips, vec![4680, 4680]);
    }

    #[test]
    fn header_stays_positive_for_tiny_body_text() {
        let styles = StyleRegistry::standard()
            .with_style(StyleName::Body, Style::new("Calibri", 1.0));
        let mut assembler = DocumentBuilder::new()
            .with_styles(styles)
            .build_recorder()
            .expect("complete registry");
        assembler
            .push_block(elements::table(["A"], [["1"]], TableLayout::new()).expect("valid table"))
            .expect("push");
        let sink = assembler.into_sink();
        let Operation::Table(table) = &sink.operations()[0] else {
            panic!("expected a table");
        };
        assert_eq!(table.header[0].size_pt, 0.5);
    }

    #[test]
    fn failed_push_blocks_further_use() {
        let styles = StyleRegistry::new().with_style(StyleName::Body, Style::new("Calibri", 11.0));
        let mut assembler =
            DocumentAssembler::new(styles, DocumentBuilder::new().page_setup(), Recorder::new());
        assembler
            .push_block(elements::text("kept"))
            .expect("body is registered");

        let err = assembler
            .push_block(elements::code_block("npm start"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownStyle(StyleName::Code)));
        assert_eq!(assembler.state(), AssemblyState::Failed);

        let err = assembler.push_block(elements::text("late")).unwrap_err();
        assert!(matches!(err, Error::AssemblyFailed));

        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("partial.docx");
        let err = assembler.save(&target).unwrap_err();
        assert!(matches!(err, Error::AssemblyFailed));
        assert!(!target.exists());
    }

    #[test]
    fn code_lines_are_tightly_spaced_code_paragraphs() {
        let mut assembler = recorder();
        assembler
            .push_block(elements::code_block("\nnpm install\n\n  npm start\n"))
            .expect("push");
        let sink = assembler.into_sink();
        let lines = paragraphs(&sink);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].text(), "  npm start");
        for line in lines {
            assert_eq!(line.format.style, StyleName::Code);
            assert_eq!(line.format.space_before_pt, 0.0);
            assert_eq!(line.format.space_after_pt, 0.0);
            assert_eq!(line.runs[0].font_family, "Consolas");
        }
    }

    #[test]
    fn section_page_break_is_emitted_once() {
        let mut assembler = recorder();
        let section = Section::builder()
            .push_block(elements::heading(HeadingLevel::One, "Intro"))
            .page_break_after(true)
            .build();
        assembler.push_section(section).expect("push");
        assert_eq!(assembler.sections(), 1);
        assert_eq!(assembler.page_breaks(), 1);
        assert_eq!(assembler.into_sink().page_breaks(), 1);
    }

    #[test]
    fn image_size_is_converted_to_emu() {
        let mut assembler = recorder();
        let image = ImageBlock::new("diagram.png", vec![1, 2, 3], (300, 150), 2.0);
        assembler.push_block(Block::Image(image)).expect("push");
        let sink = assembler.into_sink();
        let Operation::Picture(picture) = &sink.operations()[0] else {
            panic!("expected a picture");
        };
        assert_eq!(picture.width_emu, 1_828_800);
        assert_eq!(picture.height_emu, 914_400);
        assert_eq!(picture.alignment, HorizontalAlignment::Center);
        assert_eq!(picture.bytes, vec![1, 2, 3]);
        assert_eq!(picture.pixel_size, (300, 150));
    }
}
