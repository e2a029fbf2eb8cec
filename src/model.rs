//! Data structures describing the logical content of a document.
//!
//! The types in this module are plain values: they know nothing about the
//! word-processor container they are eventually written to. Styles are
//! referenced by [`StyleName`](crate::style::StyleName) and only resolved when
//! the [`DocumentAssembler`](crate::assembler::DocumentAssembler) emits a block.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::richtext::Run;
use crate::style::Rgb;

/// Horizontal alignment for paragraphs, tables and pictures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Fully justified paragraphs.
    Justified,
}

/// Heading depth. Only three levels are styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    /// Top level (chapter) heading.
    One,
    /// Second level heading.
    Two,
    /// Third level heading.
    Three,
}

impl HeadingLevel {
    /// Converts a 1-based level number into a heading level.
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// Returns the 1-based level number.
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Rich text paragraph carrying runs together with optional paragraph overrides.
///
/// Unset alignment and spacing fall back to the body style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    runs: Vec<Run>,
    alignment: Option<HorizontalAlignment>,
    space_before_pt: Option<f32>,
    space_after_pt: Option<f32>,
}

impl Paragraph {
    /// Creates a paragraph from the provided runs.
    pub fn new(runs: impl Into<Vec<Run>>) -> Self {
        Self {
            runs: runs.into(),
            ..Self::default()
        }
    }

    /// Returns the runs that make up the paragraph.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Returns the concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    /// Returns the alignment override.
    pub fn alignment(&self) -> Option<HorizontalAlignment> {
        self.alignment
    }

    /// Returns the space-before override in points.
    pub fn space_before_pt(&self) -> Option<f32> {
        self.space_before_pt
    }

    /// Returns the space-after override in points.
    pub fn space_after_pt(&self) -> Option<f32> {
        self.space_after_pt
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: impl Into<Option<HorizontalAlignment>>) -> Self {
        self.alignment = alignment.into();
        self
    }

    /// Sets the space before the paragraph and returns the updated paragraph.
    pub fn with_space_before(mut self, space_pt: impl Into<Option<f32>>) -> Self {
        self.space_before_pt = space_pt.into();
        self
    }

    /// Sets the space after the paragraph and returns the updated paragraph.
    pub fn with_space_after(mut self, space_pt: impl Into<Option<f32>>) -> Self {
        self.space_after_pt = space_pt.into();
        self
    }
}

/// A heading of a given level. The runs inherit the heading style of that level.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingBlock {
    level: HeadingLevel,
    runs: Vec<Run>,
    alignment: Option<HorizontalAlignment>,
}

impl HeadingBlock {
    /// Creates a heading with a single unstyled run.
    pub fn new(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            runs: vec![Run::new(text)],
            alignment: None,
        }
    }

    /// Returns the heading level.
    pub fn level(&self) -> HeadingLevel {
        self.level
    }

    /// Returns the heading runs.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Returns the concatenated heading text.
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    /// Returns the alignment override.
    pub fn alignment(&self) -> Option<HorizontalAlignment> {
        self.alignment
    }

    /// Replaces the heading runs with a single, possibly restyled, run.
    pub fn with_run(mut self, run: Run) -> Self {
        self.runs = vec![run];
        self
    }

    /// Sets the alignment and returns the updated heading.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// A single bulleted list entry.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletItem {
    runs: Vec<Run>,
}

impl BulletItem {
    /// Creates a bullet item from its runs.
    pub fn new(runs: impl Into<Vec<Run>>) -> Self {
        Self { runs: runs.into() }
    }

    /// Returns the runs of the item.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }
}

/// Column width policy for a table.
///
/// Widths are always proportional to the usable text width of the page; they
/// never depend on cell contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColumnWidths {
    /// Every column receives the same share.
    #[default]
    Even,
    /// Column `i` receives `ratios[i] / sum(ratios)` of the width.
    Ratio(Vec<u32>),
}

impl ColumnWidths {
    /// Creates a ratio policy, e.g. `[4, 16, 45]` for a narrow icon column.
    pub fn ratio(ratios: impl Into<Vec<u32>>) -> Self {
        Self::Ratio(ratios.into())
    }

    fn validate(&self, columns: usize) -> Result<()> {
        match self {
            Self::Even => Ok(()),
            Self::Ratio(ratios) if ratios.len() != columns => Err(Error::ColumnWidthMismatch {
                expected: columns,
                found: ratios.len(),
            }),
            Self::Ratio(_) => Ok(()),
        }
    }

    /// Splits `total` (in any unit) across `columns` columns.
    ///
    /// Rounding remainders go to the last column so the widths always add up to `total`.
    pub fn distribute(&self, columns: usize, total: u32) -> Vec<u32> {
        if columns == 0 {
            return Vec::new();
        }
        let ratios: Vec<u64> = match self {
            Self::Ratio(ratios) if ratios.len() == columns && ratios.iter().any(|r| *r > 0) => {
                ratios.iter().map(|r| u64::from(*r)).collect()
            }
            _ => vec![1; columns],
        };
        let sum: u64 = ratios.iter().sum();
        let mut widths: Vec<u32> = ratios
            .iter()
            .map(|ratio| (u64::from(total) * ratio / sum) as u32)
            .collect();
        let assigned: u32 = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += total - assigned;
        }
        widths
    }
}

/// Per-table layout policy.
#[derive(Clone, Debug, PartialEq)]
pub struct TableLayout {
    widths: ColumnWidths,
    font_size_pt: f32,
    alignment: HorizontalAlignment,
    header_fill: Option<Rgb>,
    emphasized_column: Option<usize>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            widths: ColumnWidths::Even,
            font_size_pt: 9.0,
            alignment: HorizontalAlignment::Left,
            header_fill: None,
            emphasized_column: None,
        }
    }
}

impl TableLayout {
    /// Creates the default layout: even columns, 9pt cells, left aligned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the column width policy.
    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Returns the cell font size in points.
    pub fn font_size_pt(&self) -> f32 {
        self.font_size_pt
    }

    /// Returns the table alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the header row background, if any.
    pub fn header_fill(&self) -> Option<Rgb> {
        self.header_fill
    }

    /// Returns the zero-based column whose data cells are bold, if any.
    pub fn emphasized_column(&self) -> Option<usize> {
        self.emphasized_column
    }

    /// Sets the column width policy.
    pub fn with_widths(mut self, widths: ColumnWidths) -> Self {
        self.widths = widths;
        self
    }

    /// Sets the cell font size in points.
    pub fn with_font_size(mut self, size_pt: f32) -> Self {
        self.font_size_pt = size_pt;
        self
    }

    /// Sets the table alignment.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the header row background.
    pub fn with_header_fill(mut self, fill: impl Into<Option<Rgb>>) -> Self {
        self.header_fill = fill.into();
        self
    }

    /// Renders the data cells of `column` in bold.
    pub fn with_emphasized_column(mut self, column: usize) -> Self {
        self.emphasized_column = Some(column);
        self
    }
}

/// A table with one header row and any number of data rows of equal width.
///
/// Tables can only be created through [`Table::new`], which rejects rows whose
/// length differs from the header.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    layout: TableLayout,
}

impl Table {
    /// Validates the shape of the table and creates it.
    pub fn new<H, R, C>(headers: H, rows: R, layout: TableLayout) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if headers.is_empty() {
            return Err(Error::EmptyTable);
        }
        layout.widths.validate(headers.len())?;

        let mut collected = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            let row: Vec<String> = row.into_iter().map(Into::into).collect();
            if row.len() != headers.len() {
                return Err(Error::ShapeMismatch {
                    row: index,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            collected.push(row);
        }

        Ok(Self {
            headers,
            rows: collected,
            layout,
        })
    }

    /// Returns the header cells.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns the layout policy.
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }
}

/// Fixed-width text rendered one paragraph per line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    lines: Vec<String>,
}

impl CodeBlock {
    /// Builds a code block from raw multi-line text.
    ///
    /// Leading and trailing whitespace-only lines are dropped; every remaining
    /// line is kept verbatim, including indentation and inner blank lines.
    pub fn from_source(raw: &str) -> Self {
        let lines: Vec<&str> = raw.lines().collect();
        let start = lines
            .iter()
            .position(|line| !line.trim().is_empty())
            .unwrap_or(lines.len());
        let end = lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(start, |index| index + 1);
        Self {
            lines: lines[start..end].iter().map(|line| (*line).to_owned()).collect(),
        }
    }

    /// Returns the lines of the block.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// An image that was found on disk, together with its pixel dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    path: PathBuf,
    bytes: Vec<u8>,
    pixel_size: (u32, u32),
    width_in: f64,
    alignment: HorizontalAlignment,
}

impl ImageBlock {
    /// Creates a centered image block from already loaded bytes.
    pub fn new(
        path: impl Into<PathBuf>,
        bytes: Vec<u8>,
        pixel_size: (u32, u32),
        width_in: f64,
    ) -> Self {
        Self {
            path: path.into(),
            bytes,
            pixel_size,
            width_in,
            alignment: HorizontalAlignment::Center,
        }
    }

    /// Returns the path the image was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the PNG-encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the block and returns the encoded image bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the pixel dimensions as `(width, height)`.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }

    /// Returns the rendered width in inches.
    pub fn width_in(&self) -> f64 {
        self.width_in
    }

    /// Returns the rendered height in inches, keeping the aspect ratio.
    pub fn height_in(&self) -> f64 {
        let (width, height) = self.pixel_size;
        if width == 0 {
            return 0.0;
        }
        self.width_in * f64::from(height) / f64::from(width)
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Sets the alignment and returns the updated image block.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Individual content blocks that make up sections.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Section or subsection heading.
    Heading(HeadingBlock),
    /// Styled paragraph content.
    Paragraph(Paragraph),
    /// Bulleted list entry.
    Bullet(BulletItem),
    /// Header row plus data rows.
    Table(Table),
    /// Fixed-width code lines.
    Code(CodeBlock),
    /// Embedded picture.
    Image(ImageBlock),
    /// Explicit page break request.
    PageBreak,
}

impl Block {
    /// Convenience helper for building a paragraph block.
    pub fn paragraph(runs: impl Into<Vec<Run>>) -> Self {
        Self::Paragraph(Paragraph::new(runs))
    }

    /// Convenience helper for building a heading block.
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading(HeadingBlock::new(level, text))
    }

    /// Convenience helper that yields an explicit page break block.
    pub fn page_break() -> Self {
        Self::PageBreak
    }
}

/// Logical representation of a document section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Section {
    title: Option<String>,
    blocks: Vec<Block>,
    page_break_after: bool,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for a section.
    pub fn builder() -> SectionBuilder {
        SectionBuilder::default()
    }

    /// Returns the label used when logging the section, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the blocks contained in the section.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns whether a hard page break follows the section.
    pub fn page_break_after(&self) -> bool {
        self.page_break_after
    }

    /// Consumes the section and returns its blocks.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Extends the section with additional blocks and returns the updated instance.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Requests a page break after the section.
    pub fn with_page_break_after(mut self, page_break_after: bool) -> Self {
        self.page_break_after = page_break_after;
        self
    }
}

/// Builder for [`Section`] values.
///
/// A trailing [`Block::PageBreak`] pushed by hand is folded into the
/// `page_break_after` flag so a section never ends with two breaks.
#[derive(Clone, Debug, Default)]
pub struct SectionBuilder {
    title: Option<String>,
    blocks: Vec<Block>,
    page_break_after: bool,
}

impl SectionBuilder {
    /// Sets the label used when logging the section.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pushes an additional block into the section.
    pub fn push_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Pushes a block that may have been omitted, such as an optional image.
    pub fn push_optional(mut self, block: Option<Block>) -> Self {
        self.blocks.extend(block);
        self
    }

    /// Extends the builder with multiple blocks.
    pub fn extend_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Marks the section to be followed by a hard page break.
    pub fn page_break_after(mut self, page_break_after: bool) -> Self {
        self.page_break_after = page_break_after;
        self
    }

    /// Builds the final section.
    pub fn build(mut self) -> Section {
        while matches!(self.blocks.last(), Some(Block::PageBreak)) {
            self.blocks.pop();
            self.page_break_after = true;
        }

        Section {
            title: self.title,
            blocks: self.blocks,
            page_break_after: self.page_break_after,
        }
    }
}

/// The ordered list of sections making up a whole document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    sections: Vec<Section>,
}

impl Outline {
    /// Creates an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section and returns the updated outline.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Returns the sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Splits a flat block list into sections at every [`Block::PageBreak`].
    pub fn from_blocks<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        let mut sections = Vec::new();
        let mut current = Section::new();
        for block in blocks {
            match block {
                Block::PageBreak => {
                    sections.push(std::mem::take(&mut current).with_page_break_after(true));
                }
                other => current.blocks.push(other),
            }
        }
        if !current.blocks.is_empty() {
            sections.push(current);
        }
        Self { sections }
    }
}

impl FromIterator<Section> for Outline {
    fn from_iter<T: IntoIterator<Item = Section>>(iter: T) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Outline {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_folds_trailing_page_break() {
        let section = Section::builder()
            .push_block(Block::paragraph(Vec::new()))
            .push_block(Block::PageBreak)
            .build();

        assert!(section.page_break_after());
        assert_eq!(section.blocks().len(), 1);
    }

    #[test]
    fn builder_skips_omitted_blocks() {
        let section = Section::builder()
            .push_optional(None)
            .push_optional(Some(Block::heading(HeadingLevel::Two, "Kept")))
            .build();
        assert_eq!(section.blocks().len(), 1);
        assert!(!section.page_break_after());
    }

    #[test]
    fn table_rejects_mismatched_rows() {
        let err = Table::new(["A", "B"], [vec!["1", "2"], vec!["3"]], TableLayout::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn table_rejects_mismatched_ratio_count() {
        let layout = TableLayout::new().with_widths(ColumnWidths::ratio([1, 2, 3]));
        let err = Table::new(["A", "B"], Vec::<Vec<String>>::new(), layout).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnWidthMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn table_needs_a_header() {
        let err = Table::new(Vec::<String>::new(), Vec::<Vec<String>>::new(), TableLayout::new())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }

    #[test]
    fn ratio_widths_are_proportional_and_exact() {
        let widths = ColumnWidths::ratio([4, 16, 45]).distribute(3, 9360);
        assert_eq!(widths.iter().sum::<u32>(), 9360);
        assert_eq!(widths[0], 576);
        assert_eq!(widths[1], 2304);

        let even = ColumnWidths::Even.distribute(4, 9361);
        assert_eq!(even, vec![2340, 2340, 2340, 2341]);
    }

    #[test]
    fn code_block_trims_only_outer_blank_lines() {
        let block = CodeBlock::from_source("\n   \n    let x = 1;\n\n  // done  \n\n");
        assert_eq!(block.lines(), ["    let x = 1;", "", "  // done  "]);
        assert!(CodeBlock::from_source("\n \n").lines().is_empty());
    }

    #[test]
    fn image_height_follows_aspect_ratio() {
        let image = ImageBlock::new("diagram.png", Vec::new(), (200, 100), 6.5);
        assert_eq!(image.height_in(), 3.25);
        assert_eq!(image.alignment(), HorizontalAlignment::Center);
    }

    #[test]
    fn outline_splits_on_page_breaks() {
        let outline = Outline::from_blocks([
            Block::heading(HeadingLevel::One, "Title"),
            Block::PageBreak,
            Block::heading(HeadingLevel::One, "Next"),
        ]);
        assert_eq!(outline.sections().len(), 2);
        assert!(outline.sections()[0].page_break_after());
        assert!(!outline.sections()[1].page_break_after());
    }

    #[test]
    fn heading_level_numbers() {
        assert_eq!(HeadingLevel::from_number(2), Some(HeadingLevel::Two));
        assert_eq!(HeadingLevel::from_number(4), None);
        assert_eq!(HeadingLevel::Three.number(), 3);
    }
}
