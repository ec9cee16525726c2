//! Metric measurer — estimates rendered fragment height without a browser.
//!
//! Lays out a parsed fragment the way a browser's normal flow would, at the
//! granularity the print stylesheet needs:
//! - block elements stack vertically; adjacent sibling margins collapse to the larger
//! - a box without top (bottom) padding/border lets its first (last) child's
//!   margin escape through it
//! - table rows place cells side by side; row height is the tallest cell
//! - inline runs (text, `strong`, `span`, `br`, …) are greedy word-wrapped with
//!   the static font-metric tables; each line box is `font_px × line_height` of
//!   the enclosing block
//!
//! Like `offsetHeight` on the measuring container, the fragment's leading top
//! margin and trailing bottom margin are not counted.

use tracing::debug;

use crate::layout::font_metrics::get_metrics;
use crate::layout::html::{parse_fragment, Element, Node};
use crate::layout::measure::{BlockStyle, MeasureError, MeasureSurface, Measurer, StyleProfile};

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "table", "thead", "tbody",
    "tfoot", "tr", "th", "td", "section", "header", "footer", "blockquote",
];

// ────────────────────────────────────────────────────────────────────────────
// Measurer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic, pure-Rust measurement backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricMeasurer;

impl Measurer for MetricMeasurer {
    fn open_surface(
        &self,
        profile: &StyleProfile,
    ) -> Result<Box<dyn MeasureSurface + '_>, MeasureError> {
        if !(profile.content_width_px > 0.0 && profile.base_font_px > 0.0) {
            return Err(MeasureError::SurfaceUnavailable(format!(
                "content width {}px / font size {}px cannot hold text",
                profile.content_width_px, profile.base_font_px
            )));
        }
        debug!(
            width = profile.content_width_px,
            font_px = profile.base_font_px,
            "Metric measurement surface opened"
        );
        Ok(Box::new(MetricSurface {
            profile: profile.clone(),
            measured: 0,
        }))
    }
}

struct MetricSurface {
    profile: StyleProfile,
    measured: usize,
}

impl MeasureSurface for MetricSurface {
    fn measure(&mut self, html: &str) -> Result<f32, MeasureError> {
        self.measured += 1;
        fragment_height(&self.profile, html)
    }
}

impl Drop for MetricSurface {
    fn drop(&mut self) {
        debug!(
            fragments = self.measured,
            "Metric measurement surface released"
        );
    }
}

/// Rendered height of `html` inside a container styled by `profile`.
pub fn fragment_height(profile: &StyleProfile, html: &str) -> Result<f32, MeasureError> {
    let nodes = parse_fragment(html)
        .map_err(|e| MeasureError::Failed(format!("Malformed fragment: {e}")))?;
    let refs: Vec<&Node> = nodes.iter().collect();
    let flow = layout_flow(profile, &refs, &profile.root_style(), profile.content_width_px);
    Ok(flow.height.max(0.0))
}

// ────────────────────────────────────────────────────────────────────────────
// Block layout
// ────────────────────────────────────────────────────────────────────────────

/// Border-box height plus the margins the box presents to its siblings.
#[derive(Debug, Clone, Copy, Default)]
struct BoxMetrics {
    height: f32,
    margin_top: f32,
    margin_bottom: f32,
}

/// A stacked sequence of boxes. `height` runs from the first box's top edge to
/// the last box's bottom edge; the outer margins are reported separately.
#[derive(Debug, Clone, Copy, Default)]
struct Flow {
    height: f32,
    leading_margin: f32,
    trailing_margin: f32,
}

fn is_block(node: &Node) -> bool {
    matches!(node, Node::Element(e) if BLOCK_TAGS.contains(&e.tag.as_str()))
}

fn layout_flow(profile: &StyleProfile, nodes: &[&Node], style: &BlockStyle, width: f32) -> Flow {
    let mut boxes: Vec<BoxMetrics> = Vec::new();
    let mut inline_run: Vec<&Node> = Vec::new();

    let flush_run = |run: &mut Vec<&Node>, boxes: &mut Vec<BoxMetrics>| {
        let lines = inline_line_count(run, style, width);
        if lines > 0 {
            boxes.push(BoxMetrics {
                height: lines as f32 * style.line_box_px(),
                ..BoxMetrics::default()
            });
        }
        run.clear();
    };

    for &node in nodes {
        match node {
            Node::Element(element) if is_block(node) => {
                flush_run(&mut inline_run, &mut boxes);
                boxes.push(layout_block(profile, element, style, width));
            }
            _ => inline_run.push(node),
        }
    }
    flush_run(&mut inline_run, &mut boxes);

    let mut flow = Flow::default();
    for (i, b) in boxes.iter().enumerate() {
        if i == 0 {
            flow.leading_margin = b.margin_top;
        } else {
            flow.height += flow.trailing_margin.max(b.margin_top);
        }
        flow.height += b.height;
        flow.trailing_margin = b.margin_bottom;
    }
    flow
}

fn layout_block(
    profile: &StyleProfile,
    element: &Element,
    parent: &BlockStyle,
    width: f32,
) -> BoxMetrics {
    let style = profile.resolve(&element.tag, &element.classes, parent);

    let content_height = match element.tag.as_str() {
        "table" => table_height(profile, element, &style, width),
        "tr" => row_height(profile, element, &style, width),
        _ => {
            let inner_width = (width - style.insets.horizontal()).max(0.0);
            let children: Vec<&Node> = element.children.iter().collect();
            let flow = layout_flow(profile, &children, &style, inner_width);

            let mut height = flow.height;
            let mut margin_top = style.margin_top_px;
            let mut margin_bottom = style.margin_bottom_px;
            if style.insets.top > 0.0 {
                height += flow.leading_margin;
            } else {
                margin_top = margin_top.max(flow.leading_margin);
            }
            if style.insets.bottom > 0.0 {
                height += flow.trailing_margin;
            } else {
                margin_bottom = margin_bottom.max(flow.trailing_margin);
            }
            return BoxMetrics {
                height: height + style.insets.vertical(),
                margin_top,
                margin_bottom,
            };
        }
    };

    BoxMetrics {
        height: content_height + style.insets.vertical(),
        margin_top: style.margin_top_px,
        margin_bottom: style.margin_bottom_px,
    }
}

/// Sum of row heights. Rows may sit directly in the table or in row groups.
fn table_height(profile: &StyleProfile, table: &Element, style: &BlockStyle, width: f32) -> f32 {
    fn rows<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
        for child in &element.children {
            if let Node::Element(e) = child {
                match e.tag.as_str() {
                    "tr" => out.push(e),
                    "thead" | "tbody" | "tfoot" => rows(e, out),
                    _ => {}
                }
            }
        }
    }

    let mut table_rows = Vec::new();
    rows(table, &mut table_rows);
    table_rows
        .iter()
        .map(|row| {
            let row_style = profile.resolve(&row.tag, &row.classes, style);
            row_height(profile, row, &row_style, width)
        })
        .sum()
}

/// Height of the tallest cell, with cells sharing the row width equally.
fn row_height(profile: &StyleProfile, row: &Element, style: &BlockStyle, width: f32) -> f32 {
    let cells: Vec<&Element> = row
        .children
        .iter()
        .filter_map(|c| match c {
            Node::Element(e) if e.tag == "td" || e.tag == "th" => Some(e),
            _ => None,
        })
        .collect();
    if cells.is_empty() {
        return 0.0;
    }
    let cell_width = width / cells.len() as f32;
    cells
        .iter()
        .map(|cell| {
            // Cell margins never escape the row.
            let b = layout_block(profile, cell, style, cell_width);
            b.height
        })
        .fold(0.0_f32, f32::max)
}

// ────────────────────────────────────────────────────────────────────────────
// Inline layout
// ────────────────────────────────────────────────────────────────────────────

/// Number of line boxes an inline run produces. `<br>` forces a break; a
/// trailing `<br>` does not open a new line.
fn inline_line_count(run: &[&Node], style: &BlockStyle, width: f32) -> usize {
    fn collect(node: &Node, segments: &mut Vec<Vec<String>>) {
        match node {
            Node::Text(text) => {
                if let Some(current) = segments.last_mut() {
                    current.extend(text.split_whitespace().map(str::to_string));
                }
            }
            Node::Element(e) if e.tag == "br" => segments.push(Vec::new()),
            Node::Element(e) => {
                for child in &e.children {
                    collect(child, segments);
                }
            }
        }
    }

    let mut segments: Vec<Vec<String>> = vec![Vec::new()];
    for node in run {
        collect(node, &mut segments);
    }
    while segments.len() > 1 && segments.last().is_some_and(Vec::is_empty) {
        segments.pop();
    }
    if segments.iter().all(Vec::is_empty) {
        return 0;
    }

    let metrics = get_metrics(&style.font);
    segments
        .iter()
        .map(|segment| {
            let words: Vec<&str> = segment.iter().map(String::as_str).collect();
            metrics
                .wrapped_line_count(&words, width, style.font_px, style.letter_spacing_px)
                .max(1)
        })
        .sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn height(html: &str) -> f32 {
        fragment_height(&StyleProfile::print_a4(), html).unwrap()
    }

    fn letter_height(html: &str) -> f32 {
        fragment_height(&StyleProfile::cover_letter_a4(), html).unwrap()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-2,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_fragment_has_zero_height() {
        assert_eq!(height(""), 0.0);
        assert_eq!(height("   \n  "), 0.0);
    }

    #[test]
    fn test_single_line_paragraph_is_one_line_box() {
        // 16px × 1.6; the paragraph's bottom margin escapes the container
        assert_close(height("<p>Hello</p>"), 25.6);
    }

    #[test]
    fn test_sibling_paragraphs_collapse_margin_between_them() {
        assert_close(height("<p>a</p><p>b</p>"), 25.6 + 16.0 + 25.6);
    }

    #[test]
    fn test_h1_uses_scaled_line_box() {
        // 2.8em × 16px × 1.6
        assert_close(height("<h1>Sarah Johnson</h1>"), 71.68);
    }

    #[test]
    fn test_h2_includes_bottom_padding_and_border() {
        // 28.8px × 1.6 + 0.3em + 3px border
        assert_close(height("<h2>Education</h2>"), 46.08 + 8.64 + 3.0);
    }

    #[test]
    fn test_list_items_stack_with_item_margins() {
        assert_close(height("<ul><li>One</li><li>Two</li></ul>"), 25.6 + 8.0 + 25.6);
    }

    #[test]
    fn test_br_forces_line_breaks() {
        assert_close(height("<p><strong>Name</strong><br>Company<br>City</p>"), 3.0 * 25.6);
        assert_close(height("<p>Only<br></p>"), 25.6);
    }

    #[test]
    fn test_longer_text_is_taller() {
        let short = height("<p>One sentence here.</p>");
        let long = height(&format!("<p>{}</p>", "Another sentence here. ".repeat(40)));
        assert!(long > short * 5.0, "short {short}, long {long}");
    }

    #[test]
    fn test_list_indent_narrows_wrapping_width() {
        let text = "word ".repeat(118);
        let para = height(&format!("<p>{text}</p>"));
        let item = height(&format!("<ul><li>{text}</li></ul>"));
        assert!(item >= para, "indented item ({item}) should not be shorter than {para}");
    }

    #[test]
    fn test_table_rows_take_tallest_cell() {
        let one_row = height("<table><tbody><tr><td>A</td><td>B</td></tr></tbody></table>");
        // one line + 12px padding + 1px border on top and bottom
        assert_close(one_row, 25.6 + 26.0);

        let two_rows = height(
            "<table><thead><tr><th>H</th><th>I</th></tr></thead>\
             <tbody><tr><td>A</td><td>B</td></tr></tbody></table>",
        );
        assert!(two_rows > one_row * 1.9);
    }

    #[test]
    fn test_padded_box_contains_child_margins() {
        let padded = height("<div class=\"key-accomplishments\"><p>x</p></div>");
        // 15px padding top and bottom, the paragraph's 16px margin stays inside
        assert_close(padded, 15.0 + 25.6 + 16.0 + 15.0);
    }

    #[test]
    fn test_accomplishments_heading_margin_inside_box() {
        let boxed = height(
            "<div class=\"key-accomplishments\"><h4>Key Accomplishments:</h4><ul><li>x</li></ul></div>",
        );
        // h4 line 17.6 × 1.6, its 0.5em margin against the list's, list item
        // line plus the list's trailing 16px margin, all within 15px padding
        assert_close(boxed, 15.0 + 28.16 + 8.8 + 25.6 + 16.0 + 15.0);
    }

    #[test]
    fn test_cover_letter_paragraph_line_box() {
        // 16px × 1.7 per line
        assert_close(letter_height("<p>Hello</p>"), 27.2);
        assert_close(
            letter_height("<p><strong>Name</strong><br>Company<br>City</p>"),
            3.0 * 27.2,
        );
        // margin-bottom: 1.2em between letter paragraphs
        assert_close(letter_height("<p>a</p><p>b</p>"), 27.2 + 19.2 + 27.2);
        assert_close(height("<p>Hello</p>"), 25.6);
    }

    #[test]
    fn test_cover_letter_heading_has_no_bottom_margin() {
        // h1 line 71.68 followed directly by the paragraph
        assert_close(letter_height("<h1>Sarah</h1><p>x</p>"), 71.68 + 27.2);
        assert_close(height("<h1>Sarah</h1><p>x</p>"), 71.68 + 67.2 + 25.6);
    }

    #[test]
    fn test_cover_letter_measures_taller_than_resume_sheet() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(30);
        let html = format!("<p>{text}</p><p>{text}</p>");
        let letter = letter_height(&html);
        let resume = height(&html);
        assert!(letter > resume, "letter {letter} vs resume {resume}");
    }

    #[test]
    fn test_open_surface_rejects_zero_width_profile() {
        let profile = StyleProfile {
            content_width_px: 0.0,
            ..StyleProfile::print_a4()
        };
        let measurer = MetricMeasurer;
        let result = measurer.open_surface(&profile);
        assert!(matches!(result, Err(MeasureError::SurfaceUnavailable(_))));
    }

    #[test]
    fn test_malformed_fragment_fails_measurement() {
        let measurer = MetricMeasurer;
        let mut surface = measurer.open_surface(&StyleProfile::print_a4()).unwrap();
        let result = surface.measure("<p>cut off <strong");
        assert!(matches!(result, Err(MeasureError::Failed(_))));
    }

    #[test]
    fn test_surface_measures_repeatably() {
        let profile = StyleProfile::print_a4();
        let measurer = MetricMeasurer;
        let mut surface = measurer.open_surface(&profile).unwrap();
        let a = surface.measure("<p>Same input.</p>").unwrap();
        let b = surface.measure("<p>Same input.</p>").unwrap();
        assert_eq!(a, b);
    }
}
