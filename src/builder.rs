//! Document construction helpers: page geometry and the builder that checks
//! a style registry before any content can reach an output sink.

use crate::assembler::DocumentAssembler;
use crate::docx::DocxSink;
use crate::error::Result;
use crate::render::{DocumentSink, Recorder};
use crate::style::StyleRegistry;

/// Twentieths of a point per inch.
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Converts inches to twentieths of a point.
pub fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH).round().max(0.0) as u32
}

/// Converts points to twentieths of a point.
pub fn points_to_twips(points: f32) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

/// Paper size expressed in twentieths of a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSize {
    /// Page width.
    pub width_twips: u32,
    /// Page height.
    pub height_twips: u32,
}

impl PageSize {
    /// US Letter, 8.5 x 11 inches.
    pub const LETTER: PageSize = PageSize::new(12240, 15840);

    /// ISO A4, 210 x 297 millimetres.
    pub const A4: PageSize = PageSize::new(11906, 16838);

    /// Creates a page size from its dimensions in twentieths of a point.
    pub const fn new(width_twips: u32, height_twips: u32) -> Self {
        Self {
            width_twips,
            height_twips,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Page margins expressed in twentieths of a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Margins {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin.
    pub bottom: u32,
    /// Left margin.
    pub left: u32,
}

impl Margins {
    /// Creates margins from inch values in CSS order (top, right, bottom, left).
    pub fn inches(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: inches_to_twips(top),
            right: inches_to_twips(right),
            bottom: inches_to_twips(bottom),
            left: inches_to_twips(left),
        }
    }

    /// Creates identical margins on every side, in inches.
    pub fn uniform(inches: f64) -> Self {
        Self::inches(inches, inches, inches, inches)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Resolved page geometry shared by the assembler and the sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageSetup {
    /// Paper size.
    pub size: PageSize,
    /// Page margins.
    pub margins: Margins,
}

impl PageSetup {
    /// Width available to text between the left and right margins.
    pub fn text_width_twips(&self) -> u32 {
        self.size
            .width_twips
            .saturating_sub(self.margins.left.saturating_add(self.margins.right))
    }
}

/// Builder for [`DocumentAssembler`] instances pre-configured with the crate defaults.
#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
    paper_size: Option<PageSize>,
    margins: Option<Margins>,
    styles: Option<StyleRegistry>,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for the document.
    pub fn with_paper_size(mut self, paper_size: PageSize) -> Self {
        self.paper_size = Some(paper_size);
        self
    }

    /// Sets the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }

    /// Sets the style registry. Defaults to [`StyleRegistry::standard`].
    pub fn with_styles(mut self, styles: StyleRegistry) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Returns the page geometry the builder will use.
    pub fn page_setup(&self) -> PageSetup {
        PageSetup {
            size: self.paper_size.unwrap_or_default(),
            margins: self.margins.unwrap_or_default(),
        }
    }

    /// Builds an assembler that writes a DOCX package.
    pub fn build(self) -> Result<DocumentAssembler<DocxSink>> {
        self.build_with(DocxSink::new)
    }

    /// Builds an assembler that records operations in memory.
    pub fn build_recorder(self) -> Result<DocumentAssembler<Recorder>> {
        self.build_with(|_, _| Recorder::new())
    }

    /// Builds an assembler around a custom sink.
    ///
    /// Fails with [`crate::Error::UnknownStyle`] before the sink is created when
    /// the registry does not define every style.
    pub fn build_with<S, F>(self, sink: F) -> Result<DocumentAssembler<S>>
    where
        S: DocumentSink,
        F: FnOnce(&StyleRegistry, &PageSetup) -> S,
    {
        let setup = self.page_setup();
        let styles = self.styles.unwrap_or_else(StyleRegistry::standard);
        styles.ensure_complete()?;
        let sink = sink(&styles, &setup);
        Ok(DocumentAssembler::new(styles, setup, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::style::{Style, StyleName};

    #[test]
    fn letter_with_inch_margins_leaves_six_and_a_half_inches() {
        let setup = DocumentBuilder::new()
            .with_margins(Margins::inches(0.8, 1.0, 0.8, 1.0))
            .page_setup();
        assert_eq!(setup.size, PageSize::LETTER);
        assert_eq!(setup.margins.top, 1152);
        assert_eq!(setup.text_width_twips(), inches_to_twips(6.5));
    }

    #[test]
    fn oversized_margins_leave_no_text_width() {
        let setup = DocumentBuilder::new()
            .with_margins(Margins {
                top: 0,
                right: u32::MAX,
                bottom: 0,
                left: u32::MAX,
            })
            .page_setup();
        assert_eq!(setup.text_width_twips(), 0);
    }

    #[test]
    fn incomplete_registry_is_rejected_before_building() {
        let styles =
            StyleRegistry::new().with_style(StyleName::Body, Style::new("Calibri", 11.0));
        let err = DocumentBuilder::new()
            .with_styles(styles)
            .build_recorder()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownStyle(StyleName::Heading1)));
    }

    #[test]
    fn unit_conversions_round() {
        assert_eq!(points_to_twips(6.0), 120);
        assert_eq!(points_to_twips(10.5), 210);
        assert_eq!(inches_to_twips(0.4), 576);
    }
}
