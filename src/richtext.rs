//! Utilities for working with styled runs of text.
//!
//! A [`Run`] is a contiguous span of text inside a paragraph. Every character
//! attribute is an optional override: whatever a run leaves unset is inherited
//! from the style of the paragraph that contains it when the document is
//! emitted, so the same run can be reused under body text, a heading or a
//! table cell.

use crate::style::{Rgb, Style};

/// A slice of text together with optional character-level overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    text: String,
    bold: Option<bool>,
    italic: Option<bool>,
    size_pt: Option<f32>,
    color: Option<Rgb>,
    font_family: Option<String>,
}

impl Run {
    /// Creates a new run with the provided text and no overrides.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this run.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the bold override, if any.
    pub fn bold_override(&self) -> Option<bool> {
        self.bold
    }

    /// Returns the italic override, if any.
    pub fn italic_override(&self) -> Option<bool> {
        self.italic
    }

    /// Returns the font size override in points, if any.
    pub fn size_override(&self) -> Option<f32> {
        self.size_pt
    }

    /// Returns the color override, if any.
    pub fn color_override(&self) -> Option<Rgb> {
        self.color
    }

    /// Returns the font family override, if any.
    pub fn font_override(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    /// Returns whether the run has no character overrides at all.
    pub fn is_plain(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.size_pt.is_none()
            && self.color.is_none()
            && self.font_family.is_none()
    }

    /// Sets the bold override and returns the updated run.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Sets the italic override and returns the updated run.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Sets the color override and returns the updated run.
    pub fn with_color(mut self, color: Option<Rgb>) -> Self {
        self.color = color;
        self
    }

    /// Convenience shorthand that marks the run as bold.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Convenience shorthand that marks the run as italic.
    pub fn italic(self) -> Self {
        self.with_italic(true)
    }

    /// Convenience shorthand that assigns a color to the run.
    pub fn colored(self, color: Rgb) -> Self {
        self.with_color(Some(color))
    }

    /// Overrides the font size (in points) and returns the updated run.
    pub fn sized(mut self, size_pt: f32) -> Self {
        self.size_pt = Some(size_pt);
        self
    }

    /// Overrides the font family and returns the updated run.
    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Fills every unset attribute from `style`.
    pub fn resolve(&self, style: &Style) -> ResolvedRun {
        ResolvedRun {
            text: self.text.clone(),
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| style.font_family().to_owned()),
            size_pt: self.size_pt.unwrap_or(style.size_pt()),
            color: self.color.unwrap_or(style.color()),
            bold: self.bold.unwrap_or(style.is_bold()),
            italic: self.italic.unwrap_or(style.is_italic()),
        }
    }
}

impl From<&str> for Run {
    fn from(text: &str) -> Self {
        Run::new(text)
    }
}

impl From<String> for Run {
    fn from(text: String) -> Self {
        Run::new(text)
    }
}

/// A run whose character attributes are all concrete.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRun {
    /// Text of the run.
    pub text: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub size_pt: f32,
    /// Text color.
    pub color: Rgb,
    /// Whether the run is bold.
    pub bold: bool,
    /// Whether the run is italic.
    pub italic: bool,
}

/// Resolves a sequence of runs against the same style.
pub fn resolve_runs<'a, I>(runs: I, style: &Style) -> Vec<ResolvedRun>
where
    I: IntoIterator<Item = &'a Run>,
{
    runs.into_iter().map(|run| run.resolve(style)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_attributes_inherit_from_the_style() {
        let style = Style::new("Calibri", 11.0)
            .with_color(Rgb::new(0x33, 0x33, 0x33))
            .with_italic(true);
        let resolved = Run::new("Hello").resolve(&style);
        assert_eq!(resolved.font_family, "Calibri");
        assert_eq!(resolved.size_pt, 11.0);
        assert_eq!(resolved.color, Rgb::new(0x33, 0x33, 0x33));
        assert!(!resolved.bold);
        assert!(resolved.italic);
    }

    #[test]
    fn overrides_take_precedence() {
        let style = Style::new("Calibri", 11.0).with_bold(true);
        let run = Run::new("Now you can.")
            .with_bold(false)
            .italic()
            .sized(12.0)
            .colored(Rgb::new(0x1A, 0x47, 0x8A))
            .font("Georgia");
        let resolved = run.resolve(&style);
        assert!(!resolved.bold);
        assert!(resolved.italic);
        assert_eq!(resolved.size_pt, 12.0);
        assert_eq!(resolved.color.hex(), "1A478A");
        assert_eq!(resolved.font_family, "Georgia");
    }

    #[test]
    fn plain_runs_have_no_overrides() {
        assert!(Run::from("text").is_plain());
        assert!(!Run::new("text").bold().is_plain());
    }
}
