#![forbid(unsafe_code)]

//! Exclusion-aware line flow.
//!
//! Text is laid out line by line from the top of the layout region. Each
//! line is a horizontal band one line-height tall; excluded rectangles that
//! intersect the band cut it into free intervals, and text fills those
//! intervals left to right. A line can therefore hold several fragments
//! when an exclusion sits in the middle of it.
//!
//! When a maximum line count truncates the text, the last fragment of the
//! last line is shortened to make room for the ellipsis.

use crate::measure::LayoutConstraints;
use crate::text::{Content, Span};
use crate::wrap::{Glyph, Token, display_width, tokenize};
use foldtext_core::geometry::LayoutRect;
use foldtext_render::Style;
use smallvec::SmallVec;

/// Slack for float rounding when converting layout widths to cells.
const CELL_EPSILON: f32 = 1e-4;

/// A piece of a line placed inside one free interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Left edge in layout units.
    pub x: f32,
    /// Width occupied by the text, in layout units.
    pub width: f32,
    /// Styled runs, adjacent glyphs with equal styles merged.
    pub spans: Vec<Span>,
}

impl Fragment {
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::as_str).collect()
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Top edge in layout units.
    pub top: f32,
    pub fragments: SmallVec<[Fragment; 1]>,
}

impl LayoutLine {
    /// Plain text of all fragments, in order, without separators.
    pub fn text(&self) -> String {
        self.fragments.iter().map(Fragment::text).collect()
    }
}

/// Result of laying out content under constraints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub lines: Vec<LayoutLine>,
    /// Total height in layout units.
    pub height: f32,
    /// Whether a maximum line count cut the content short.
    pub truncated: bool,
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Plain text of every line.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(LayoutLine::text).collect()
    }
}

/// Position in the token stream: token index plus glyph offset inside a
/// word that was split across lines.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    token: usize,
    glyph: usize,
}

impl Cursor {
    fn next_token(&mut self) {
        self.token += 1;
        self.glyph = 0;
    }
}

struct PendingFragment<'a> {
    x: f32,
    capacity: usize,
    used: usize,
    glyphs: Vec<Glyph<'a>>,
    ellipsis: bool,
}

impl<'a> PendingFragment<'a> {
    fn new(x: f32, capacity: usize) -> Self {
        Self {
            x,
            capacity,
            used: 0,
            glyphs: Vec::new(),
            ellipsis: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.used)
    }

    fn push(&mut self, glyph: Glyph<'a>) {
        self.used += glyph.cells;
        self.glyphs.push(glyph);
    }

    /// Shorten so `ellipsis_cells` fit, dropping trailing whitespace first.
    fn make_room_for_ellipsis(&mut self, ellipsis_cells: usize) {
        while let Some(last) = self.glyphs.last() {
            let trailing_space = last.text.chars().all(char::is_whitespace);
            if !trailing_space && self.used + ellipsis_cells <= self.capacity {
                break;
            }
            self.used -= last.cells;
            self.glyphs.pop();
        }
        self.ellipsis = true;
    }

    fn trim_trailing_whitespace(&mut self) {
        while let Some(last) = self.glyphs.last()
            && last.text.chars().all(char::is_whitespace)
        {
            self.used -= last.cells;
            self.glyphs.pop();
        }
    }

    fn finish(mut self, advance: f32, ellipsis: &str) -> Fragment {
        self.trim_trailing_whitespace();
        let mut spans: Vec<Span> = Vec::new();
        let mut last_style: Option<Style> = None;
        for glyph in &self.glyphs {
            if let Some(span) = spans.last_mut().filter(|s| s.style == glyph.style) {
                span.content.push_str(glyph.text);
            } else {
                spans.push(Span {
                    content: glyph.text.to_string(),
                    style: glyph.style,
                });
            }
            last_style = glyph.style;
        }
        let mut used = self.used;
        if self.ellipsis && !ellipsis.is_empty() {
            used += display_width(ellipsis);
            if let Some(span) = spans.last_mut().filter(|s| s.style == last_style) {
                span.content.push_str(ellipsis);
            } else {
                spans.push(Span {
                    content: ellipsis.to_string(),
                    style: last_style,
                });
            }
        }
        Fragment {
            x: self.x,
            width: used as f32 * advance,
            spans,
        }
    }
}

struct PendingLine<'a> {
    top: f32,
    fragments: Vec<PendingFragment<'a>>,
}

/// Lay out `content` under `constraints`.
///
/// Degenerate inputs (non-positive width, unusable font, empty content)
/// produce an empty layout of zero height.
pub fn flow(content: &Content, constraints: &LayoutConstraints) -> TextLayout {
    let font = constraints.font;
    let max_width = constraints.max_width;
    if content.is_empty() || !font.is_usable() || !(max_width > 0.0) || !max_width.is_finite() {
        return TextLayout::default();
    }

    let runs = content.runs();
    let tokens = tokenize(&runs);
    let exclusions: SmallVec<[LayoutRect; 2]> = constraints
        .exclusions
        .iter()
        .copied()
        .filter(|r| !r.is_empty() && r.x.is_finite() && r.y.is_finite() && r.bottom().is_finite())
        .collect();

    let advance = font.advance;
    let line_height = font.line_height;
    let full_capacity = cells_in(max_width, advance);

    let mut lines: Vec<PendingLine<'_>> = Vec::new();
    let mut cursor = Cursor::default();
    let mut paragraph_start = true;
    let mut truncated = false;

    while cursor.token < tokens.len() {
        if constraints.max_lines > 0 && lines.len() >= constraints.max_lines {
            truncated = true;
            break;
        }

        let top = lines.len() as f32 * line_height;
        let bottom = top + line_height;
        let band_blocked = exclusions.iter().any(|r| r.overlaps_band(top, bottom));
        let intervals = free_intervals(max_width, &exclusions, top, bottom, advance);

        let mut line = PendingLine {
            top,
            fragments: Vec::new(),
        };
        let mut consumed = false;
        let mut hard_break = false;

        'intervals: for (start, end) in intervals {
            let mut frag = PendingFragment::new(start, cells_in(end - start, advance));

            while let Some(token) = tokens.get(cursor.token) {
                match token {
                    Token::Break => {
                        cursor.next_token();
                        consumed = true;
                        hard_break = true;
                        if !frag.is_empty() {
                            line.fragments.push(frag);
                        }
                        break 'intervals;
                    }
                    Token::Space(glyphs) => {
                        consumed = true;
                        if frag.is_empty() && !paragraph_start {
                            cursor.next_token();
                            continue;
                        }
                        let cells = token.cells();
                        cursor.next_token();
                        if cells > frag.remaining() {
                            // whitespace at a wrap point is swallowed
                            break;
                        }
                        for glyph in glyphs {
                            frag.push(*glyph);
                        }
                    }
                    Token::Word(glyphs) => {
                        let rest = &glyphs[cursor.glyph..];
                        let cells: usize = rest.iter().map(|g| g.cells).sum();
                        if cells <= frag.remaining() {
                            for glyph in rest {
                                frag.push(*glyph);
                            }
                            cursor.next_token();
                            consumed = true;
                            paragraph_start = false;
                            continue;
                        }
                        if frag.is_empty() && cells > full_capacity {
                            let mut placed = 0;
                            for glyph in rest {
                                if glyph.cells > frag.remaining() {
                                    break;
                                }
                                frag.push(*glyph);
                                placed += 1;
                            }
                            if placed > 0 {
                                cursor.glyph += placed;
                                consumed = true;
                                paragraph_start = false;
                            }
                        }
                        break;
                    }
                }
            }

            if !frag.is_empty() {
                line.fragments.push(frag);
            }
        }

        if !consumed && !band_blocked {
            // nothing fits even on an unobstructed line; place one glyph anyway
            if matches!(tokens.get(cursor.token), Some(Token::Break)) {
                cursor.next_token();
                hard_break = true;
            } else if let Some(glyph) = next_glyph(&tokens, cursor) {
                let mut frag = PendingFragment::new(0.0, glyph.cells);
                frag.push(glyph);
                line.fragments.push(frag);
                cursor.glyph += 1;
                if let Some(Token::Word(glyphs)) = tokens.get(cursor.token)
                    && cursor.glyph >= glyphs.len()
                {
                    cursor.next_token();
                } else if !matches!(tokens.get(cursor.token), Some(Token::Word(_))) {
                    cursor.next_token();
                }
                paragraph_start = false;
                if matches!(tokens.get(cursor.token), Some(Token::Break)) {
                    cursor.next_token();
                    hard_break = true;
                }
            }
        }

        if hard_break {
            paragraph_start = true;
        } else if consumed {
            paragraph_start = false;
        }
        lines.push(line);
    }

    if truncated {
        let ellipsis_cells = display_width(&constraints.ellipsis);
        if let Some(frag) = lines
            .last_mut()
            .and_then(|line| line.fragments.last_mut())
        {
            frag.make_room_for_ellipsis(ellipsis_cells);
        }
    }

    let height = lines.len() as f32 * line_height;
    tracing::trace!(
        lines = lines.len(),
        height,
        truncated,
        max_width,
        exclusions = exclusions.len(),
        "flowed text"
    );

    TextLayout {
        lines: lines
            .into_iter()
            .map(|line| LayoutLine {
                top: line.top,
                fragments: line
                    .fragments
                    .into_iter()
                    .map(|frag| frag.finish(advance, &constraints.ellipsis))
                    .collect(),
            })
            .collect(),
        height,
        truncated,
    }
}

/// Whole cells that fit in `width` layout units.
fn cells_in(width: f32, advance: f32) -> usize {
    if !(width > 0.0) {
        return 0;
    }
    (width / advance + CELL_EPSILON).floor() as usize
}

fn next_glyph<'a>(tokens: &[Token<'a>], cursor: Cursor) -> Option<Glyph<'a>> {
    match tokens.get(cursor.token)? {
        Token::Word(glyphs) => glyphs.get(cursor.glyph).copied(),
        Token::Space(glyphs) => glyphs.first().copied(),
        Token::Break => None,
    }
}

/// Free horizontal intervals of the band `[top, bottom)` within
/// `[0, max_width)`, narrower intervals than one cell dropped.
fn free_intervals(
    max_width: f32,
    exclusions: &[LayoutRect],
    top: f32,
    bottom: f32,
    min_width: f32,
) -> SmallVec<[(f32, f32); 2]> {
    let mut blocked: SmallVec<[(f32, f32); 2]> = exclusions
        .iter()
        .filter(|r| r.overlaps_band(top, bottom))
        .map(|r| (r.x.max(0.0), r.right().min(max_width)))
        .filter(|(start, end)| start < end)
        .collect();
    blocked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut free = SmallVec::new();
    let mut cursor = 0.0f32;
    for (start, end) in blocked {
        if start > cursor {
            free.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if cursor < max_width {
        free.push((cursor, max_width));
    }
    free.retain(|(start, end)| *end - *start + CELL_EPSILON >= min_width);
    free
}
