//! Pagination estimator — predicts where the print engine will break the
//! document across A4 pages.
//!
//! # Algorithm
//! Greedy single pass, no backtracking. Each block is measured and appended to
//! the in-progress page while it fits in `PAGE_HEIGHT - MARGIN_BOTTOM`. A block
//! that does not fit is either split at a sentence boundary (plain paragraphs
//! without `avoid_break`) or moved whole to the next page. The first block on a
//! page is always accepted, so an oversized block overflows alone instead of
//! being deferred forever.
//!
//! The result is advisory: the print engine re-flows the same content itself
//! and may break differently.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::layout::block::{ContentBlock, Page, PageGeometry};
use crate::layout::measure::{MeasureError, MeasureSurface, Measurer, StyleProfile};

/// A single `<p>` (attributes allowed) wrapping plain text, nothing else.
static PLAIN_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(<p(?:\s[^>]*)?>)([^<]*)</p>\s*$").expect("valid paragraph regex")
});

/// Sentence terminator followed by the whitespace that ends the sentence.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Pagination estimator bound to a measurement backend, style profile and page
/// geometry. Holds no state between calls.
pub struct Paginator<'m> {
    measurer: &'m dyn Measurer,
    profile: StyleProfile,
    geometry: PageGeometry,
}

impl<'m> Paginator<'m> {
    /// A4 geometry with the print style profile.
    pub fn new(measurer: &'m dyn Measurer) -> Self {
        Self {
            measurer,
            profile: StyleProfile::print_a4(),
            geometry: PageGeometry::A4,
        }
    }

    /// Small page budgets keep pagination scenarios readable.
    #[cfg(test)]
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_profile(mut self, profile: StyleProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Lays `blocks` out onto pages. Never fails: if measurement is unavailable
    /// the result is a single page holding every block, unpaginated.
    pub fn compute_pages(&self, blocks: &[ContentBlock]) -> Vec<Page> {
        match self.try_compute_pages(blocks) {
            Ok(pages) => {
                info!(
                    blocks = blocks.len(),
                    pages = pages.len(),
                    "Pagination estimate complete"
                );
                pages
            }
            Err(e) => {
                warn!(
                    error = %e,
                    blocks = blocks.len(),
                    "Measurement unavailable; preview falls back to a single unpaginated page"
                );
                vec![Page {
                    number: 1,
                    content: blocks.to_vec(),
                    used_height: 0.0,
                }]
            }
        }
    }

    fn try_compute_pages(&self, blocks: &[ContentBlock]) -> Result<Vec<Page>, MeasureError> {
        // Dropped on every exit path below, which tears the surface down.
        let mut surface = self.measurer.open_surface(&self.profile)?;
        let budget = self.geometry.usable_height();
        let mut builder = PageBuilder::default();

        for (index, block) in blocks.iter().enumerate() {
            let mut pending = block.clone();
            let mut height = surface.measure(&pending.html)?;

            loop {
                let available = budget - builder.current_height;

                if height <= available {
                    debug!(index, height, available, "Block fits on current page");
                    builder.push(pending, height);
                    break;
                }

                if !pending.avoid_break {
                    if let Some(split) = split_paragraph(&pending.html, available, &mut *surface)? {
                        debug!(
                            index,
                            first_height = split.first_height,
                            available,
                            "Paragraph split at sentence boundary"
                        );
                        builder.push(split.first, split.first_height);
                        builder.flush();
                        pending = split.rest;
                        height = surface.measure(&pending.html)?;
                        continue;
                    }
                }

                if builder.is_empty() {
                    debug!(index, height, budget, "Oversized block overflows its own page");
                    builder.push(pending, height);
                    break;
                }

                debug!(index, height, available, "Block moved to next page");
                builder.flush();
            }
        }

        Ok(builder.finish())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page accumulation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct PageBuilder {
    pages: Vec<Page>,
    current: Vec<ContentBlock>,
    current_height: f32,
}

impl PageBuilder {
    fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    fn push(&mut self, block: ContentBlock, height: f32) {
        self.current.push(block);
        self.current_height += height;
    }

    /// Closes the in-progress page. A no-op on an empty page, so interior pages
    /// are never empty.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page {
            number,
            content: std::mem::take(&mut self.current),
            used_height: self.current_height,
        });
        self.current_height = 0.0;
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        if self.pages.is_empty() {
            vec![Page::empty(1)]
        } else {
            self.pages
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sentence-level split
// ────────────────────────────────────────────────────────────────────────────

struct Split {
    first: ContentBlock,
    first_height: f32,
    rest: ContentBlock,
}

/// Splits `text` after each `.`, `!` or `?` that is followed by whitespace.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Splits a plain paragraph so the first part fits in `available`.
///
/// Returns `Ok(None)` when the block is not a single plain-text paragraph,
/// when even the first sentence is too tall, or when every sentence fits.
fn split_paragraph<S>(
    html: &str,
    available: f32,
    surface: &mut S,
) -> Result<Option<Split>, MeasureError>
where
    S: MeasureSurface + ?Sized,
{
    let Some(caps) = PLAIN_PARAGRAPH.captures(html) else {
        return Ok(None);
    };
    let open_tag = &caps[1];
    let sentences = split_sentences(&caps[2]);
    let wrap = |parts: &[&str]| format!("{open_tag}{}</p>", parts.join(" "));

    let mut accepted = 0;
    let mut first_height = 0.0;
    for end in 1..=sentences.len() {
        let height = surface.measure(&wrap(&sentences[..end]))?;
        if height > available {
            break;
        }
        accepted = end;
        first_height = height;
    }

    if accepted == 0 || accepted == sentences.len() {
        return Ok(None);
    }

    Ok(Some(Split {
        first: ContentBlock::splittable(wrap(&sentences[..accepted])),
        first_height,
        rest: ContentBlock::splittable(wrap(&sentences[accepted..])),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
