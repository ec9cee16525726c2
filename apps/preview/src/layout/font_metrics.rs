//! Static font-metric tables for the two faces of the print stylesheet.
//!
//! Character widths are in em units (relative to font size). This is an
//! approximation of the browser's shaping: no kerning, no ligatures, and bold
//! weights share the regular table. It is close enough to predict line wraps
//! for preview pagination, which is advisory anyway.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// Font faces used by the resume and cover-letter stylesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Body text — "Segoe UI WestEuropean", sans-serif.
    SegoeUi,
    /// Headings, subtitle and table headers — fixed-pitch.
    RobotoMono,
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width of `s` in pixels at `font_px`, with CSS `letter-spacing` added after
    /// every character.
    pub fn width_px(&self, s: &str, font_px: f32, letter_spacing_px: f32) -> f32 {
        self.measure_str(s) * font_px + letter_spacing_px * s.chars().count() as f32
    }

    /// Counts the lines `words` occupy when greedily word-wrapped at `max_width_px`.
    ///
    /// A word wider than the line still takes a line of its own (browsers
    /// overflow rather than break inside a word). No words → 0 lines.
    pub fn wrapped_line_count(
        &self,
        words: &[&str],
        max_width_px: f32,
        font_px: f32,
        letter_spacing_px: f32,
    ) -> usize {
        if words.is_empty() {
            return 0;
        }
        let space_w = self.space_width * font_px + letter_spacing_px;
        let mut line_count = 1usize;
        let mut current_width = 0.0_f32;
        let mut first = true;

        for word in words {
            let word_w = self.width_px(word, font_px, letter_spacing_px);
            let gap = if first { 0.0 } else { space_w };

            if !first && current_width + gap + word_w > max_width_px {
                line_count += 1;
                current_width = word_w;
            } else {
                current_width += gap + word_w;
                first = false;
            }
        }
        line_count
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Segoe UI — humanist sans-serif body face.
static SEGOE_UI_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.27, 0.27, 0.40, 0.62, 0.55, 0.84, 0.80, 0.23, 0.30, 0.30, 0.42, 0.68, 0.22, 0.39, 0.22, 0.39,
        // 0     1     2     3     4     5     6     7     8     9
        0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55,
        // :     ;     <     =     >     ?     @
        0.22, 0.22, 0.68, 0.68, 0.68, 0.45, 0.98,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.58, 0.64, 0.74, 0.51, 0.49, 0.72, 0.75, 0.27, 0.36, 0.59, 0.47, 0.93,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.78, 0.79, 0.57, 0.79, 0.60, 0.54, 0.55, 0.73, 0.65, 0.98, 0.61, 0.57, 0.59,
        // [     \     ]     ^     _     `
        0.30, 0.38, 0.30, 0.68, 0.42, 0.26,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.51, 0.59, 0.46, 0.59, 0.53, 0.32, 0.59, 0.57, 0.24, 0.24, 0.50, 0.24, 0.87,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.57, 0.59, 0.59, 0.59, 0.35, 0.42, 0.34, 0.57, 0.48, 0.74, 0.47, 0.48, 0.45,
        // {     |     }     ~
        0.30, 0.24, 0.30, 0.68,
    ],
    average_char_width: 0.53,
    space_width: 0.27,
};

/// Roboto Mono — every glyph advances 0.6em.
static ROBOTO_MONO_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.60; 95],
    average_char_width: 0.60,
    space_width: 0.60,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::SegoeUi => &SEGOE_UI_TABLE,
        FontFamily::RobotoMono => &ROBOTO_MONO_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
