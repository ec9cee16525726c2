//! Measurement capability — the paginator's only view of rendered height.
//!
//! # Architecture
//! - `Measurer` opens a transient `MeasureSurface` for one pagination run.
//! - `MeasureSurface` reports the rendered pixel height of an HTML fragment laid
//!   out at the profile's content width. Teardown lives in `Drop`, so it runs on
//!   every exit path of the caller, including early returns and unwinding.
//! - `StyleProfile` is the style sheet both the measurer and the print document
//!   must agree on. If they diverge, every height comparison is meaningless.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::block::CONTENT_WIDTH_PX;
use crate::layout::font_metrics::FontFamily;
use crate::models::DocumentKind;

// ────────────────────────────────────────────────────────────────────────────
// Capability traits
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("Measurement surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Measurement failed: {0}")]
    Failed(String),
}

/// Source of measurement surfaces. Implement this to swap the measuring backend
/// (font-metric estimate, a live browser, a scripted fake) without touching the
/// paginator.
pub trait Measurer {
    fn open_surface(
        &self,
        profile: &StyleProfile,
    ) -> Result<Box<dyn MeasureSurface + '_>, MeasureError>;
}

/// An off-screen container styled by a `StyleProfile`.
pub trait MeasureSurface {
    /// Returns the non-negative rendered height of `html` in pixels.
    fn measure(&mut self, html: &str) -> Result<f32, MeasureError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Style profile
// ────────────────────────────────────────────────────────────────────────────

/// Which print stylesheet a profile mirrors. The resume and the cover letter
/// ship different sheets, so the same fragment can measure differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleSheet {
    Resume,
    CoverLetter,
}

/// Page-content style shared by the measurer and the print stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub sheet: StyleSheet,
    pub content_width_px: f32,
    pub base_font_px: f32,
    /// Unitless CSS line-height of the body; elements inherit it unless their
    /// sheet overrides it.
    pub line_height: f32,
    pub body_font: FontFamily,
    pub heading_font: FontFamily,
}

/// Space taken by padding plus border on each side of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    fn uniform(px: f32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    /// padding: 15px + border-left: 4px
    fn highlight_box() -> Self {
        let mut insets = Self::uniform(15.0);
        insets.left += 4.0;
        insets
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

/// Computed box style of one element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub font: FontFamily,
    pub font_px: f32,
    pub letter_spacing_px: f32,
    /// Unitless, inherited.
    pub line_height: f32,
    pub margin_top_px: f32,
    pub margin_bottom_px: f32,
    pub insets: Insets,
    /// Inside a highlighted accomplishments box; inherited by descendants.
    pub in_highlight: bool,
}

impl BlockStyle {
    pub fn line_box_px(&self) -> f32 {
        self.font_px * self.line_height
    }
}

impl StyleProfile {
    /// The A4 resume profile: 688px content width, 16px Segoe UI, line-height
    /// 1.6, Roboto Mono headings.
    pub fn print_a4() -> Self {
        Self {
            sheet: StyleSheet::Resume,
            content_width_px: CONTENT_WIDTH_PX,
            base_font_px: 16.0,
            line_height: 1.6,
            body_font: FontFamily::SegoeUi,
            heading_font: FontFamily::RobotoMono,
        }
    }

    /// The A4 cover-letter profile. Same page and fonts as the resume, but the
    /// letter sheet sets `p { line-height: 1.7; margin-bottom: 1.2em }` and
    /// leaves `h1` without a bottom margin.
    pub fn cover_letter_a4() -> Self {
        Self {
            sheet: StyleSheet::CoverLetter,
            ..Self::print_a4()
        }
    }

    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Resume => Self::print_a4(),
            DocumentKind::CoverLetter => Self::cover_letter_a4(),
        }
    }

    /// Style of the measuring container itself.
    pub fn root_style(&self) -> BlockStyle {
        BlockStyle {
            font: self.body_font,
            font_px: self.base_font_px,
            letter_spacing_px: 0.0,
            line_height: self.line_height,
            margin_top_px: 0.0,
            margin_bottom_px: 0.0,
            insets: Insets::default(),
            in_highlight: false,
        }
    }

    /// Resolves the box style of `tag` (lowercase) with `classes`, inheriting
    /// font, letter spacing and line-height from `parent`. Margins given in
    /// `em` are relative to the element's own font size, as in CSS.
    pub fn resolve(&self, tag: &str, classes: &[String], parent: &BlockStyle) -> BlockStyle {
        use StyleSheet::{CoverLetter, Resume};

        let mut style = BlockStyle {
            margin_top_px: 0.0,
            margin_bottom_px: 0.0,
            insets: Insets::default(),
            ..*parent
        };
        let has_class = |name: &str| classes.iter().any(|c| c == name);

        let (scale, heading, spacing, mt_em, mb_em) = match (self.sheet, tag) {
            (Resume, "h1") => (2.8, true, Some(2.0), 0.0, 1.5),
            (CoverLetter, "h1") => (2.8, true, Some(2.0), 0.0, 0.0),
            (_, "h2") => (1.8, true, Some(1.0), 2.0, 1.0),
            (_, "h3") => (1.4, true, Some(0.5), 1.5, 0.5),
            (Resume, "h4") if parent.in_highlight => (1.1, false, None, 0.0, 0.5),
            (Resume, "h4") => (1.1, false, None, 0.0, 1.0),
            (CoverLetter, "h4") if parent.in_highlight => (1.0, true, None, 0.0, 0.5),
            (Resume, "p") => (1.0, false, None, 0.0, 1.0),
            (CoverLetter, "p") => (1.0, false, None, 0.0, 1.2),
            (_, "ul" | "ol") => (1.0, false, None, 0.0, 1.0),
            (_, "li") => (1.0, false, None, 0.0, 0.5),
            (Resume, "table") => (1.0, false, None, 0.0, 1.5),
            (Resume, "th") => (1.0, true, Some(0.5), 0.0, 0.0),
            (_, "div") if has_class("subtitle") => (1.2, true, None, 0.0, 2.0),
            (Resume, "div") if has_class("experience-item") => (1.0, false, None, 0.0, 2.0),
            (Resume, "div") if has_class("education-item") => (1.0, false, None, 0.0, 0.5),
            (Resume, "div") if has_class("section") || has_class("key-accomplishments") => {
                (1.0, false, None, 0.0, 1.0)
            }
            (CoverLetter, "div") if has_class("highlight-section") => (1.0, false, None, 1.5, 1.5),
            _ => (1.0, false, None, 0.0, 0.0),
        };

        style.font_px = parent.font_px * scale;
        if heading {
            style.font = self.heading_font;
        }
        if let Some(px) = spacing {
            style.letter_spacing_px = px;
        }
        style.margin_top_px = mt_em * style.font_px;
        style.margin_bottom_px = mb_em * style.font_px;
        if self.sheet == CoverLetter && tag == "p" {
            style.line_height = 1.7;
        }

        match (self.sheet, tag) {
            // padding-bottom: 0.3em + border-bottom: 3px
            (_, "h2") => style.insets.bottom = 0.3 * style.font_px + 3.0,
            // padding-left: 2em
            (_, "ul" | "ol") => style.insets.left = 2.0 * style.font_px,
            // padding: 12px + border: 1px
            (Resume, "th" | "td") => style.insets = Insets::uniform(13.0),
            (Resume, "div") if has_class("key-accomplishments") => {
                style.insets = Insets::highlight_box();
                style.in_highlight = true;
            }
            (CoverLetter, "div") if has_class("highlight-section") => {
                style.insets = Insets::highlight_box();
                style.in_highlight = true;
            }
            _ => {}
        }

        style
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::print_a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_a4_profile_matches_page_geometry() {
        let profile = StyleProfile::print_a4();
        assert_eq!(profile.sheet, StyleSheet::Resume);
        assert_eq!(profile.content_width_px, 688.0);
        assert_eq!(profile.base_font_px, 16.0);
        assert!((profile.line_height - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_profile_follows_document_kind() {
        assert_eq!(StyleProfile::for_kind(DocumentKind::Resume), StyleProfile::print_a4());
        let letter = StyleProfile::for_kind(DocumentKind::CoverLetter);
        assert_eq!(letter.sheet, StyleSheet::CoverLetter);
        assert_eq!(letter.content_width_px, 688.0);
    }

    #[test]
    fn test_resolve_h1_uses_heading_font_and_em_margins() {
        let profile = StyleProfile::print_a4();
        let root = profile.root_style();
        let h1 = profile.resolve("h1", &[], &root);
        assert_eq!(h1.font, FontFamily::RobotoMono);
        assert!((h1.font_px - 44.8).abs() < 1e-3);
        // margin-bottom: 1.5em of the h1's own font size
        assert!((h1.margin_bottom_px - 67.2).abs() < 1e-3);
        assert_eq!(h1.letter_spacing_px, 2.0);
    }

    #[test]
    fn test_resolve_inherits_from_parent() {
        let profile = StyleProfile::print_a4();
        let root = profile.root_style();
        let th = profile.resolve("th", &[], &root);
        let strong_in_th = profile.resolve("span", &[], &th);
        assert_eq!(strong_in_th.font, FontFamily::RobotoMono);
        assert_eq!(strong_in_th.letter_spacing_px, 0.5);
        assert_eq!(strong_in_th.insets, Insets::default());
    }

    #[test]
    fn test_resolve_list_indent_and_section_class() {
        let profile = StyleProfile::print_a4();
        let root = profile.root_style();
        let ul = profile.resolve("ul", &[], &root);
        assert_eq!(ul.insets.left, 32.0);

        let section = profile.resolve("div", &["section".to_string()], &root);
        assert_eq!(section.margin_bottom_px, 16.0);

        let plain = profile.resolve("div", &[], &root);
        assert_eq!(plain.margin_bottom_px, 0.0);
    }

    #[test]
    fn test_accomplishments_heading_has_tighter_margin() {
        let profile = StyleProfile::print_a4();
        let root = profile.root_style();
        let plain_h4 = profile.resolve("h4", &[], &root);
        assert!((plain_h4.margin_bottom_px - 17.6).abs() < 1e-3);

        let box_style = profile.resolve("div", &["key-accomplishments".to_string()], &root);
        assert!(box_style.in_highlight);
        let ul = profile.resolve("ul", &[], &box_style);
        assert!(ul.in_highlight);
        let h4 = profile.resolve("h4", &[], &box_style);
        // 0.5em of 17.6px
        assert!((h4.margin_bottom_px - 8.8).abs() < 1e-3);
    }

    #[test]
    fn test_cover_letter_paragraph_and_heading_rules() {
        let profile = StyleProfile::cover_letter_a4();
        let root = profile.root_style();

        let p = profile.resolve("p", &[], &root);
        assert!((p.line_height - 1.7).abs() < 1e-6);
        assert!((p.margin_bottom_px - 19.2).abs() < 1e-3);
        let strong_in_p = profile.resolve("strong", &[], &p);
        assert!((strong_in_p.line_height - 1.7).abs() < 1e-6);

        let h1 = profile.resolve("h1", &[], &root);
        assert_eq!(h1.margin_bottom_px, 0.0);
        assert!((h1.line_height - 1.6).abs() < 1e-6);

        // the letter sheet has no section spacing
        let section = profile.resolve("div", &["section".to_string()], &root);
        assert_eq!(section.margin_bottom_px, 0.0);
    }
}
