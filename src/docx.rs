//! [`DocumentSink`] implementation that writes Office Open XML packages via `docx-rs`.

use std::fs::File;
use std::io;

use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    LineSpacing, NumberFormat, Numbering, NumberingId, PageMargin, Paragraph, Pic, Run, RunFonts,
    Shading, SpecialIndentType, Start, Style, StyleType, Table, TableAlignmentType, TableCell,
    TableLayoutType, TableRow, WidthType,
};

use crate::builder::{points_to_twips, PageSetup};
use crate::model::HorizontalAlignment;
use crate::render::{DocumentSink, RenderedParagraph, RenderedPicture, RenderedTable};
use crate::richtext::ResolvedRun;
use crate::style::{StyleName, StyleRegistry};

const BULLET_NUMBERING_ID: usize = 1;
const BULLET_INDENT_TWIPS: i32 = 720;
const BULLET_HANGING_TWIPS: i32 = 360;

enum Item {
    Paragraph(Paragraph),
    Table(Table),
}

/// Sink accumulating `docx-rs` elements. The package is only built when written.
pub struct DocxSink {
    setup: PageSetup,
    styles: Vec<Style>,
    default_font: String,
    default_size_pt: f32,
    items: Vec<Item>,
}

impl DocxSink {
    /// Creates a sink for the given registry and page geometry.
    ///
    /// Headings and code are registered as named paragraph styles so they show
    /// up in the navigation pane; body text becomes the document defaults.
    pub fn new(registry: &StyleRegistry, setup: &PageSetup) -> Self {
        let mut default_font = crate::style::DEFAULT_FONT_FAMILY.to_string();
        let mut default_size_pt = 11.0;
        let mut styles = Vec::new();
        for (name, style) in registry.iter() {
            if name == StyleName::Body {
                default_font = style.font_family().to_string();
                default_size_pt = style.size_pt();
                continue;
            }
            let mut docx_style = Style::new(name.style_id(), StyleType::Paragraph)
                .name(name.display_name())
                .size(half_points(style.size_pt()))
                .color(style.color().hex());
            if style.is_bold() {
                docx_style = docx_style.bold();
            }
            if style.is_italic() {
                docx_style = docx_style.italic();
            }
            styles.push(docx_style);
        }
        Self {
            setup: *setup,
            styles,
            default_font,
            default_size_pt,
            items: Vec::new(),
        }
    }

    fn into_docx(self) -> Docx {
        let margins = self.setup.margins;
        let mut docx = Docx::new()
            .page_size(self.setup.size.width_twips, self.setup.size.height_twips)
            .page_margin(
                PageMargin::new()
                    .top(margins.top as _)
                    .right(margins.right as _)
                    .bottom(margins.bottom as _)
                    .left(margins.left as _),
            )
            .default_fonts(fonts(&self.default_font))
            .default_size(half_points(self.default_size_pt))
            .add_abstract_numbering(
                AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
                    Level::new(
                        0,
                        Start::new(1),
                        NumberFormat::new("bullet"),
                        LevelText::new("\u{2022}"),
                        LevelJc::new("left"),
                    )
                    .indent(
                        Some(BULLET_INDENT_TWIPS),
                        Some(SpecialIndentType::Hanging(BULLET_HANGING_TWIPS)),
                        None,
                        None,
                    ),
                ),
            )
            .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID));

        for style in self.styles {
            docx = docx.add_style(style);
        }
        for item in self.items {
            docx = match item {
                Item::Paragraph(paragraph) => docx.add_paragraph(paragraph),
                Item::Table(table) => docx.add_table(table),
            };
        }
        docx
    }
}

impl DocumentSink for DocxSink {
    fn add_paragraph(&mut self, rendered: RenderedParagraph) {
        let format = &rendered.format;
        let mut paragraph = Paragraph::new()
            .align(alignment(format.alignment))
            .line_spacing(
                LineSpacing::new()
                    .before(points_to_twips(format.space_before_pt) as _)
                    .after(points_to_twips(format.space_after_pt) as _),
            );
        if format.style != StyleName::Body {
            paragraph = paragraph.style(format.style.style_id());
        }
        if format.bullet {
            paragraph = paragraph.numbering(
                NumberingId::new(BULLET_NUMBERING_ID),
                IndentLevel::new(0),
            );
        }
        for run in &rendered.runs {
            paragraph = paragraph.add_run(run_for(run));
        }
        self.items.push(Item::Paragraph(paragraph));
    }

    fn add_table(&mut self, rendered: RenderedTable) {
        let widths = rendered.column_widths_twips;
        let cell = |run: &ResolvedRun, column: usize| {
            TableCell::new()
                .add_paragraph(
                    Paragraph::new()
                        .line_spacing(LineSpacing::new().before(0).after(0))
                        .add_run(run_for(run)),
                )
                .width(widths.get(column).copied().unwrap_or(0) as usize, WidthType::Dxa)
        };

        let mut header = Vec::with_capacity(rendered.header.len());
        for (column, run) in rendered.header.iter().enumerate() {
            let mut header_cell = cell(run, column);
            if let Some(fill) = rendered.header_fill {
                header_cell = header_cell.shading(Shading::new().fill(fill.hex()));
            }
            header.push(header_cell);
        }

        let mut rows = vec![TableRow::new(header)];
        for row in &rendered.rows {
            rows.push(TableRow::new(
                row.iter()
                    .enumerate()
                    .map(|(column, run)| cell(run, column))
                    .collect(),
            ));
        }

        let table = Table::new(rows)
            .set_grid(widths.iter().map(|width| *width as usize).collect())
            .layout(TableLayoutType::Fixed)
            .align(match rendered.alignment {
                HorizontalAlignment::Center => TableAlignmentType::Center,
                HorizontalAlignment::Right => TableAlignmentType::Right,
                HorizontalAlignment::Left | HorizontalAlignment::Justified => {
                    TableAlignmentType::Left
                }
            });
        self.items.push(Item::Table(table));
    }

    fn add_picture(&mut self, picture: RenderedPicture) {
        let (width_px, height_px) = picture.pixel_size;
        let pic = Pic::new_with_dimensions(picture.bytes, width_px, height_px)
            .size(picture.width_emu, picture.height_emu);
        let paragraph = Paragraph::new()
            .align(alignment(picture.alignment))
            .add_run(Run::new().add_image(pic));
        self.items.push(Item::Paragraph(paragraph));
    }

    fn add_page_break(&mut self) {
        self.items.push(Item::Paragraph(
            Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
        ));
    }

    fn write_to(self, file: &mut File) -> io::Result<()> {
        self.into_docx()
            .build()
            .pack(file)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))
    }
}

fn run_for(resolved: &ResolvedRun) -> Run {
    let mut run = Run::new()
        .add_text(resolved.text.as_str())
        .fonts(fonts(&resolved.font_family))
        .size(half_points(resolved.size_pt))
        .color(resolved.color.hex());
    if resolved.bold {
        run = run.bold();
    }
    if resolved.italic {
        run = run.italic();
    }
    run
}

fn fonts(family: &str) -> RunFonts {
    RunFonts::new()
        .ascii(family)
        .hi_ansi(family)
        .east_asia(family)
        .cs(family)
}

fn alignment(alignment: HorizontalAlignment) -> AlignmentType {
    match alignment {
        HorizontalAlignment::Left => AlignmentType::Left,
        HorizontalAlignment::Center => AlignmentType::Center,
        HorizontalAlignment::Right => AlignmentType::Right,
        HorizontalAlignment::Justified => AlignmentType::Both,
    }
}

/// Font sizes are stored in half points.
fn half_points(size_pt: f32) -> usize {
    (size_pt * 2.0).round().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::elements;
    use crate::model::{HeadingLevel, TableLayout};
    use crate::style::Rgb;

    use image::{ImageBuffer, Rgb as Pixel};
    use std::io::{Read, Seek, SeekFrom};

    #[test]
    fn half_points_round_to_the_nearest_value() {
        assert_eq!(half_points(11.0), 22);
        assert_eq!(half_points(10.5), 21);
        assert_eq!(half_points(9.0), 18);
        assert_eq!(half_points(0.1), 1);
    }

    #[test]
    fn packs_a_zip_container() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image_path = dir.path().join("diagram.png");
        ImageBuffer::from_pixel(16, 8, Pixel([26u8, 71, 138]))
            .save(&image_path)
            .expect("write fixture");

        let mut assembler = DocumentBuilder::new().build().expect("standard styles");
        assembler
            .push_block(elements::heading(HeadingLevel::One, "Overview"))
            .expect("heading");
        assembler
            .push_block(elements::bullet_item("first", Some("Note: ")))
            .expect("bullet");
        let layout = TableLayout::new().with_header_fill(Rgb::new(0xE8, 0xF0, 0xFE));
        assembler
            .push_block(elements::table(["A", "B"], [vec!["1", "2"]], layout).expect("table"))
            .expect("table");
        let image = elements::image_safe(&image_path, 2.0)
            .expect("loads")
            .expect("present");
        assembler.push_block(image).expect("image");

        let mut file = tempfile::tempfile().expect("tempfile");
        assembler
            .into_sink()
            .write_to(&mut file)
            .expect("pack");
        file.seek(SeekFrom::Start(0)).expect("rewind");
        let mut magic = [0u8; 2];
        file.read_exact(&mut magic).expect("read");
        assert_eq!(&magic, b"PK");
    }
}
