//! Content builders: one stateless constructor per content shape.
//!
//! The builders only produce [`Block`] values. Styling is looked up later by the
//! assembler, so any attribute a builder leaves unset inherits the registered
//! style for that block kind.

use std::io::{self, Cursor};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{
    Block, BulletItem, CodeBlock, HeadingBlock, HeadingLevel, HorizontalAlignment, ImageBlock,
    Paragraph, Table, TableLayout,
};
use crate::richtext::Run;
use crate::style::Rgb;

/// Builds a paragraph from `runs` with optional alignment and space-after overrides.
pub fn paragraph(
    runs: impl Into<Vec<Run>>,
    alignment: Option<HorizontalAlignment>,
    space_after_pt: Option<f32>,
) -> Block {
    Block::Paragraph(
        Paragraph::new(runs)
            .with_alignment(alignment)
            .with_space_after(space_after_pt),
    )
}

/// Builds a body paragraph holding a single unstyled run.
pub fn text(text: impl Into<String>) -> Block {
    Block::paragraph(vec![Run::new(text)])
}

/// Builds an empty paragraph used as vertical space.
pub fn blank() -> Block {
    Block::paragraph(Vec::new())
}

/// Builds a heading of the given level.
pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Block {
    Block::Heading(HeadingBlock::new(level, text))
}

/// Builds a bulleted list entry, optionally led by a bold prefix run.
///
/// The prefix keeps its own run so callers can highlight a name while the
/// description stays in body style.
pub fn bullet_item(text: impl Into<String>, bold_prefix: Option<&str>) -> Block {
    let mut runs = Vec::with_capacity(2);
    if let Some(prefix) = bold_prefix {
        runs.push(Run::new(prefix).bold());
    }
    runs.push(Run::new(text));
    Block::Bullet(BulletItem::new(runs))
}

/// Builds a bulleted list entry from arbitrary runs.
pub fn bullet_runs(runs: impl Into<Vec<Run>>) -> Block {
    Block::Bullet(BulletItem::new(runs))
}

/// Builds a paragraph with a bold `label: ` lead-in followed by `text`.
pub fn labelled(label: &str, text: impl Into<String>) -> Block {
    Block::paragraph(vec![Run::new(format!("{label}: ")).bold(), Run::new(text)])
}

/// Builds a numbered step whose `N.  ` marker is bold and rendered in `accent`.
pub fn numbered_step(number: usize, text: impl Into<String>, accent: Rgb, size_pt: f32) -> Block {
    Block::paragraph(vec![
        Run::new(format!("{number}.  "))
            .bold()
            .colored(accent)
            .sized(size_pt),
        Run::new(text).sized(size_pt),
    ])
}

/// Builds a table, failing with [`Error::ShapeMismatch`] if any row length differs from the header.
pub fn table<H, R, C>(headers: H, rows: R, layout: TableLayout) -> Result<Block>
where
    H: IntoIterator,
    H::Item: Into<String>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    Table::new(headers, rows, layout).map(Block::Table)
}

/// Builds a fixed-width code block, one tightly spaced paragraph per line.
pub fn code_block(raw: &str) -> Block {
    Block::Code(CodeBlock::from_source(raw))
}

/// Loads the image at `path` if it exists.
///
/// A missing file yields `Ok(None)` so batch builds keep going while diagrams
/// are still being rendered. A file that exists but cannot be read or fully
/// decoded is an [`Error::Image`]. The block always carries PNG bytes.
pub fn image_safe(path: impl AsRef<Path>, width_in: f64) -> Result<Option<Block>> {
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("Skipping missing image {}", path.display());
            return Ok(None);
        }
        Err(err) => {
            return Err(Error::Image {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(err),
            })
        }
    };

    let (png, pixel_size) = decode_to_png(&bytes).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(Block::Image(ImageBlock::new(
        path, png, pixel_size, width_in,
    ))))
}

fn decode_to_png(bytes: &[u8]) -> image::ImageResult<(Vec<u8>, (u32, u32))> {
    let decoded = image::load_from_memory(bytes)?;
    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, image::ImageFormat::Png)?;
    Ok((png.into_inner(), (decoded.width(), decoded.height())))
}
