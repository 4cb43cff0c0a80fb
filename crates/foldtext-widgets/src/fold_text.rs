#![forbid(unsafe_code)]

//! Widget that paints a [`FoldEngine`]'s current output.

use crate::Widget;
use crate::draw_text_span;
use crate::fold::FoldEngine;
use foldtext_core::geometry::{LayoutRect, Rect, Size};
use foldtext_render::buffer::Buffer;
use foldtext_render::cell::Cell;
use foldtext_text::{LayoutConstraints, TextLayout, TextLayouter};

/// Collapsible text.
///
/// Lays the engine's content out with the applied line cap and exclusion
/// region, then draws the affordance label over the reserved rectangle.
/// Layout units map to cells through the text font's advance and line
/// height.
#[derive(Debug)]
pub struct FoldText<'a, M> {
    engine: &'a FoldEngine<M>,
}

impl<'a, M: TextLayouter> FoldText<'a, M> {
    pub fn new(engine: &'a FoldEngine<M>) -> Self {
        Self { engine }
    }

    /// Lines as they will be painted.
    pub fn layout(&self) -> TextLayout {
        let config = self.engine.config();
        let container = self.engine.container();
        let constraints = LayoutConstraints::new(self.engine.bounds().width, config.text_font)
            .with_max_lines(container.max_lines())
            .with_exclusions(container.exclusions().iter().copied())
            .with_ellipsis(config.ellipsis.as_str());
        self.engine.measurer().layout(self.engine.content(), &constraints)
    }

    /// Rows needed to show the measured height.
    pub fn height_in_cells(&self) -> u16 {
        let font = self.engine.config().text_font;
        LayoutRect::from_size(Size::new(font.advance, self.engine.measured_height()))
            .to_cells(font.advance, font.line_height)
            .height
    }

    /// Cells covered by the visible affordance when the widget is drawn at
    /// `area`.
    pub fn affordance_area(&self, area: Rect) -> Option<Rect> {
        let affordance = self.engine.affordance()?;
        let font = self.engine.config().text_font;
        let cells = affordance.rect.to_cells(font.advance, font.line_height);
        let placed = Rect::new(
            area.x.saturating_add(cells.x),
            area.y.saturating_add(cells.y),
            cells.width,
            cells.height,
        );
        placed.intersection_opt(&area)
    }
}

impl<M: TextLayouter> Widget for FoldText<'_, M> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "FoldText",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        let Some(clip) = area.intersection_opt(&buf.area()) else {
            return;
        };
        if self.engine.output().is_none() {
            return;
        }

        let config = self.engine.config();
        let font = config.text_font;
        let base = config.text_style;

        let mut blank = Cell::default();
        base.apply_to(&mut blank);
        buf.fill(clip, blank);

        for line in &self.layout().lines {
            let row = (line.top / font.line_height).round() as u16;
            let y = area.y.saturating_add(row);
            if y >= clip.bottom() {
                break;
            }
            for frag in &line.fragments {
                let mut x = area.x.saturating_add((frag.x / font.advance).round() as u16);
                for span in &frag.spans {
                    let style = span.style.map_or(base, |s| s.merge(&base));
                    x = draw_text_span(buf, x, y, span.as_str(), style, clip.right());
                }
            }
        }

        if let Some(cells) = self.affordance_area(area).and_then(|c| c.intersection_opt(&clip))
            && let Some(label) = self.engine.affordance_label()
        {
            draw_text_span(
                buf,
                cells.x,
                cells.y,
                label,
                config.affordance_style,
                clip.right(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FoldConfig;
    use foldtext_render::cell::{PackedRgba, StyleFlags};
    use foldtext_render::style::Style;
    use foldtext_text::{MonospaceMeasurer, Span, StyledText};

    const LONG: &str = "one two three four five six seven eight nine ten";

    fn engine_with(text: &str) -> FoldEngine<MonospaceMeasurer> {
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
        engine.set_bounds(LayoutRect::new(0.0, 0.0, 10.0, 0.0));
        engine.set_text(Some(text));
        engine
    }

    fn render(engine: &FoldEngine<MonospaceMeasurer>) -> Buffer {
        let widget = FoldText::new(engine);
        let mut buf = Buffer::new(10, widget.height_in_cells().max(1));
        widget.render(buf.area(), &mut buf);
        buf
    }

    #[test]
    fn folded_render_truncates_beside_affordance() {
        let engine = engine_with(LONG);
        let buf = render(&engine);
        assert_eq!(
            buf.to_lines(),
            vec!["one two   ", "three four", "five… more"]
        );
    }

    #[test]
    fn unfolded_render_shows_everything() {
        let mut engine = engine_with(LONG);
        engine.toggle();
        let buf = render(&engine);
        assert_eq!(
            buf.to_lines(),
            vec![
                "one two   ",
                "three four",
                "five six  ",
                "seven     ",
                "eight nine",
                "ten   less",
            ]
        );
    }

    #[test]
    fn short_text_has_no_affordance() {
        let engine = engine_with("short");
        let widget = FoldText::new(&engine);
        assert_eq!(widget.height_in_cells(), 1);
        assert_eq!(widget.affordance_area(Rect::new(0, 0, 10, 1)), None);
        let buf = render(&engine);
        assert_eq!(buf.to_lines(), vec!["short     "]);
    }

    #[test]
    fn affordance_is_styled() {
        let engine = engine_with(LONG);
        let buf = render(&engine);
        for x in 6..10 {
            assert_eq!(buf.get(x, 2).map(|c| c.fg), Some(PackedRgba::BLUE));
        }
        assert_eq!(buf.get(0, 0).map(|c| c.fg), Some(PackedRgba::WHITE));
    }

    #[test]
    fn affordance_area_follows_render_origin() {
        let engine = engine_with(LONG);
        let widget = FoldText::new(&engine);
        assert_eq!(
            widget.affordance_area(Rect::new(2, 1, 10, 3)),
            Some(Rect::new(8, 3, 4, 1))
        );
        assert_eq!(widget.affordance_area(Rect::new(0, 0, 10, 2)), None);
    }

    #[test]
    fn span_styles_patch_text_style() {
        let mut engine = FoldEngine::new(
            MonospaceMeasurer::new(),
            FoldConfig::terminal().text_style(Style::new().fg(PackedRgba::rgb(1, 2, 3))),
        );
        engine.set_bounds(LayoutRect::new(0.0, 0.0, 10.0, 0.0));
        engine.set_styled_text(Some(StyledText::from_spans([
            Span::styled("bold", Style::new().bold()),
            Span::raw(" plain"),
        ])));
        let buf = render(&engine);
        assert_eq!(buf.row_text(0), "bold plain");
        let bold = buf.get(0, 0).copied();
        assert!(bold.is_some_and(|c| c.flags.contains(StyleFlags::BOLD)));
        assert_eq!(bold.map(|c| c.fg), Some(PackedRgba::rgb(1, 2, 3)));
        let plain = buf.get(5, 0).copied();
        assert!(plain.is_some_and(|c| !c.flags.contains(StyleFlags::BOLD)));
    }

    #[test]
    fn text_style_background_fills_area() {
        let background = PackedRgba::rgb(20, 20, 40);
        let mut engine = FoldEngine::new(
            MonospaceMeasurer::new(),
            FoldConfig::terminal().text_style(Style::new().bg(background)),
        );
        engine.set_bounds(LayoutRect::new(0.0, 0.0, 10.0, 0.0));
        engine.set_text(Some("short"));
        let mut buf = Buffer::new(12, 2);
        FoldText::new(&engine).render(Rect::new(1, 0, 10, 1), &mut buf);
        assert_eq!(buf.get(9, 0).map(|c| c.bg), Some(background));
        assert_eq!(buf.get(2, 0).map(|c| c.bg), Some(background));
        assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(Cell::default().bg));
        assert_eq!(buf.get(1, 1).map(|c| c.bg), Some(Cell::default().bg));
    }

    #[test]
    fn render_clips_to_area() {
        let mut engine = engine_with(LONG);
        engine.toggle();
        let widget = FoldText::new(&engine);
        let mut buf = Buffer::new(10, 2);
        widget.render(Rect::new(0, 0, 10, 6), &mut buf);
        assert_eq!(buf.to_lines(), vec!["one two   ", "three four"]);
    }

    #[test]
    fn unmeasured_engine_draws_nothing() {
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
        engine.set_text(Some(LONG));
        let widget = FoldText::new(&engine);
        let mut buf = Buffer::new(10, 3);
        widget.render(buf.area(), &mut buf);
        assert_eq!(buf.to_lines(), vec!["          "; 3]);
    }
}
