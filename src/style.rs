//! Named text and paragraph styles shared by every block of a document.
//!
//! Styles are looked up through the closed [`StyleName`] enumeration, so a
//! lookup can only fail because a name was never *registered*, never because it
//! was misspelled. Resolution happens eagerly while blocks are emitted; callers
//! register every style before handing the registry to a
//! [`crate::builder::DocumentBuilder`].

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{HeadingLevel, HorizontalAlignment};

/// Font family used for body text and headings by [`StyleRegistry::standard`].
pub const DEFAULT_FONT_FAMILY: &str = "Calibri";

/// Fixed-width font family used for code by [`StyleRegistry::standard`].
pub const DEFAULT_CODE_FONT_FAMILY: &str = "Consolas";

/// An RGB color triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a six digit hexadecimal color such as `1A478A` (a leading `#` is accepted).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Returns the uppercase hexadecimal representation without a leading `#`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The closed set of styles the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleName {
    /// Normal body text.
    Body,
    /// First level heading.
    Heading1,
    /// Second level heading.
    Heading2,
    /// Third level heading.
    Heading3,
    /// Fixed-width code lines.
    Code,
}

impl StyleName {
    /// Every style name, in registration order.
    pub const ALL: [StyleName; 5] = [
        StyleName::Body,
        StyleName::Heading1,
        StyleName::Heading2,
        StyleName::Heading3,
        StyleName::Code,
    ];

    /// Returns the heading style for `level`.
    pub fn heading(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::One => StyleName::Heading1,
            HeadingLevel::Two => StyleName::Heading2,
            HeadingLevel::Three => StyleName::Heading3,
        }
    }

    /// Identifier used for the style inside the word-processor package.
    pub fn style_id(self) -> &'static str {
        match self {
            StyleName::Body => "Normal",
            StyleName::Heading1 => "Heading1",
            StyleName::Heading2 => "Heading2",
            StyleName::Heading3 => "Heading3",
            StyleName::Code => "Code",
        }
    }

    /// Human readable style name as shown by word processors.
    pub fn display_name(self) -> &'static str {
        match self {
            StyleName::Body => "Normal",
            StyleName::Heading1 => "Heading 1",
            StyleName::Heading2 => "Heading 2",
            StyleName::Heading3 => "Heading 3",
            StyleName::Code => "Code",
        }
    }
}

/// An immutable bundle of font, color and spacing attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    font_family: String,
    size_pt: f32,
    color: Rgb,
    bold: bool,
    italic: bool,
    alignment: HorizontalAlignment,
    space_before_pt: f32,
    space_after_pt: f32,
}

impl Style {
    /// Creates a left aligned, unspaced style using the given font family and size.
    pub fn new(font_family: impl Into<String>, size_pt: f32) -> Self {
        Self {
            font_family: font_family.into(),
            size_pt,
            color: Rgb::BLACK,
            bold: false,
            italic: false,
            alignment: HorizontalAlignment::Left,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
        }
    }

    /// Returns the font family name.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Returns the font size in points.
    pub fn size_pt(&self) -> f32 {
        self.size_pt
    }

    /// Returns the text color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Returns whether text is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether text is italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the paragraph alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the space before paragraphs in points.
    pub fn space_before_pt(&self) -> f32 {
        self.space_before_pt
    }

    /// Returns the space after paragraphs in points.
    pub fn space_after_pt(&self) -> f32 {
        self.space_after_pt
    }

    /// Sets the color and returns the updated style.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Sets the bold flag and returns the updated style.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated style.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the alignment and returns the updated style.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the space before and after paragraphs, in points.
    pub fn with_spacing(mut self, before_pt: f32, after_pt: f32) -> Self {
        self.space_before_pt = before_pt;
        self.space_after_pt = after_pt;
        self
    }
}

/// Registry mapping every [`StyleName`] to its [`Style`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRegistry {
    styles: BTreeMap<StyleName, Style>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete registry with Calibri body text, bold headings and a Consolas code style.
    pub fn standard() -> Self {
        let heading = |size_pt| {
            Style::new(DEFAULT_FONT_FAMILY, size_pt)
                .with_bold(true)
                .with_spacing(12.0, 4.0)
        };
        Self::new()
            .with_style(
                StyleName::Body,
                Style::new(DEFAULT_FONT_FAMILY, 11.0).with_spacing(0.0, 8.0),
            )
            .with_style(StyleName::Heading1, heading(16.0))
            .with_style(StyleName::Heading2, heading(13.0))
            .with_style(StyleName::Heading3, heading(12.0))
            .with_style(
                StyleName::Code,
                Style::new(DEFAULT_CODE_FONT_FAMILY, 9.0).with_spacing(2.0, 2.0),
            )
    }

    /// Registers `style` under `name`, replacing any previous definition.
    pub fn define(&mut self, name: StyleName, style: Style) {
        if self.styles.insert(name, style).is_some() {
            log::debug!("Style '{}' redefined", name.display_name());
        }
    }

    /// Registers `style` under `name` and returns the updated registry.
    pub fn with_style(mut self, name: StyleName, style: Style) -> Self {
        self.define(name, style);
        self
    }

    /// Returns the style registered under `name`.
    pub fn resolve(&self, name: StyleName) -> Result<&Style> {
        self.styles.get(&name).ok_or(Error::UnknownStyle(name))
    }

    /// Checks that every [`StyleName`] resolves.
    pub fn ensure_complete(&self) -> Result<()> {
        StyleName::ALL
            .iter()
            .try_for_each(|name| self.resolve(*name).map(|_| ()))
    }

    /// Iterates over the registered styles in [`StyleName`] order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleName, &Style)> {
        self.styles.iter().map(|(name, style)| (*name, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_rgb() {
        let color = Rgb::from_hex("#1a478A").expect("valid hex");
        assert_eq!(color, Rgb::new(0x1A, 0x47, 0x8A));
        assert_eq!(color.hex(), "1A478A");
        assert_eq!(Rgb::from_hex("12FG34"), None);
        assert_eq!(Rgb::from_hex("123"), None);
    }

    #[test]
    fn resolving_an_unregistered_style_fails() {
        let registry = StyleRegistry::new().with_style(StyleName::Body, Style::new("Calibri", 11.0));
        assert!(registry.resolve(StyleName::Body).is_ok());
        let err = registry.resolve(StyleName::Code).unwrap_err();
        assert!(matches!(err, Error::UnknownStyle(StyleName::Code)));
    }

    #[test]
    fn last_definition_wins() {
        let mut registry = StyleRegistry::new();
        registry.define(StyleName::Body, Style::new("Calibri", 11.0));
        registry.define(StyleName::Body, Style::new("Georgia", 12.0));
        let body = registry.resolve(StyleName::Body).expect("body");
        assert_eq!(body.font_family(), "Georgia");
        assert_eq!(body.size_pt(), 12.0);
    }

    #[test]
    fn completeness_reports_the_first_missing_style() {
        let registry = StyleRegistry::standard();
        assert!(registry.ensure_complete().is_ok());

        let partial = StyleRegistry::new()
            .with_style(StyleName::Body, Style::new("Calibri", 11.0))
            .with_style(StyleName::Heading1, Style::new("Calibri", 16.0));
        let err = partial.ensure_complete().unwrap_err();
        assert!(matches!(err, Error::UnknownStyle(StyleName::Heading2)));
    }

    #[test]
    fn heading_levels_map_to_heading_styles() {
        assert_eq!(StyleName::heading(HeadingLevel::One), StyleName::Heading1);
        assert_eq!(StyleName::heading(HeadingLevel::Three).style_id(), "Heading3");
    }
}
