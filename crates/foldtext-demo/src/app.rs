#![forbid(unsafe_code)]

//! Demo screen: a fold widget in a container whose height tracks the
//! widget's height notifications.

use std::io::{self, Write};
use std::rc::Rc;

use foldtext_core::geometry::{LayoutRect, Rect};
use foldtext_render::buffer::Buffer;
use foldtext_render::cell::{Cell, PackedRgba};
use foldtext_render::style::Style;
use foldtext_text::MonospaceMeasurer;
use foldtext_widgets::config::FoldConfig;
use foldtext_widgets::fold::{FoldEngine, FoldState};
use foldtext_widgets::fold_text::FoldText;
use foldtext_widgets::observer::HeightObserver;
use foldtext_widgets::Widget;

pub const SAMPLE_TEXT: &str = "Folding keeps long passages out of the way until a reader asks \
for them. This paragraph is long enough to exceed three lines on most terminals, so it starts \
folded with a \"more\" label in the bottom-right corner of the last visible line. Press space \
or click the label to unfold it; the label turns into \"less\" and the container grows to fit \
the whole text. 折叠文本在终端中同样适用，宽字符会按两个单元格计算。Resize the window to watch \
the text reflow around the label.";

/// Left and right margin in columns.
const MARGIN_X: u16 = 2;
/// Rows above the widget.
const MARGIN_TOP: u16 = 2;

/// Input the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Toggle,
    Click { column: u16, row: u16 },
    Resize { width: u16, height: u16 },
    MoreLines,
    FewerLines,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Height constraint of the container, updated by the widget.
#[derive(Debug, Default)]
pub struct ContainerHeight {
    height: std::cell::Cell<f32>,
    updates: std::cell::Cell<u32>,
}

impl ContainerHeight {
    pub fn get(&self) -> f32 {
        self.height.get()
    }

    /// Notifications received so far.
    pub fn updates(&self) -> u32 {
        self.updates.get()
    }
}

impl HeightObserver for ContainerHeight {
    fn height_did_change(&self, height: f32) {
        self.height.set(height);
        self.updates.set(self.updates.get() + 1);
    }
}

/// Demo application state.
pub struct App {
    engine: FoldEngine<MonospaceMeasurer>,
    container: Rc<ContainerHeight>,
    fixed_width: Option<u16>,
    screen: (u16, u16),
}

impl App {
    /// Build the screen for a terminal of `screen` (columns, rows).
    pub fn new(config: FoldConfig, text: &str, fixed_width: Option<u16>, screen: (u16, u16)) -> Self {
        let container = Rc::new(ContainerHeight::default());
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), config);
        engine.set_observer(&container);

        let mut app = Self {
            engine,
            container,
            fixed_width,
            screen,
        };
        app.engine
            .set_bounds(LayoutRect::new(0.0, 0.0, app.layout_width(), 0.0));
        app.engine.set_text(Some(text));
        app
    }

    pub fn engine(&self) -> &FoldEngine<MonospaceMeasurer> {
        &self.engine
    }

    pub fn container_height(&self) -> f32 {
        self.container.get()
    }

    /// Apply one input.
    pub fn handle(&mut self, input: Input) -> Control {
        tracing::debug!(?input, "demo input");
        match input {
            Input::Quit => return Control::Quit,
            Input::Toggle => {
                self.engine.toggle();
            }
            Input::Click { column, row } => {
                let hit = FoldText::new(&self.engine)
                    .affordance_area(self.widget_area())
                    .is_some_and(|area| area.contains(column, row));
                if hit {
                    self.engine.toggle();
                }
            }
            Input::Resize { width, height } => {
                self.screen = (width, height);
                self.engine.set_width(self.layout_width());
            }
            Input::MoreLines => {
                self.engine.set_line_cap(self.engine.line_cap().saturating_add(1));
            }
            Input::FewerLines => {
                self.engine.set_line_cap(self.engine.line_cap().saturating_sub(1));
            }
        }
        self.engine.process_deferred();
        Control::Continue
    }

    /// Columns available to the widget.
    pub fn widget_width(&self) -> u16 {
        let available = self.screen.0.saturating_sub(MARGIN_X * 2);
        self.fixed_width.map_or(available, |w| w.min(available.max(1)))
    }

    /// Widget width in layout units.
    fn layout_width(&self) -> f32 {
        f32::from(self.widget_width()) * self.engine.config().text_font.advance
    }

    /// Terminal size (columns, rows).
    pub fn screen(&self) -> (u16, u16) {
        self.screen
    }

    /// Where the widget is drawn; its height follows the container.
    pub fn widget_area(&self) -> Rect {
        let font = self.engine.config().text_font;
        let rows = LayoutRect::new(0.0, 0.0, font.advance, self.container.get())
            .to_cells(font.advance, font.line_height)
            .height;
        Rect::new(MARGIN_X, MARGIN_TOP, self.widget_width(), rows)
    }

    /// Paint the whole screen.
    pub fn render(&self, buf: &mut Buffer) {
        let title = Style::new()
            .bold()
            .fg(PackedRgba::WHITE)
            .bg(PackedRgba::rgb(40, 40, 90));
        draw_line(buf, 0, MARGIN_X, "foldtext demo", title);

        FoldText::new(&self.engine).render(self.widget_area(), buf);

        let status = format!(
            "state: {}  lines: {}  height: {}",
            state_label(self.engine.fold_state(), self.engine.can_fold()),
            self.engine.line_cap(),
            self.container.get(),
        );
        let status_row = self.widget_area().bottom().saturating_add(1);
        let dim = Style::new().dim().fg(PackedRgba::rgb(160, 160, 160));
        draw_line(buf, status_row, MARGIN_X, &status, dim);
        draw_line(
            buf,
            buf.height().saturating_sub(1),
            MARGIN_X,
            "space: toggle  +/-: lines  q: quit",
            dim,
        );
    }

    /// Render only the widget, one string per row.
    pub fn snapshot(&self) -> Vec<String> {
        let area = Rect::from_size(self.widget_width(), self.widget_area().height);
        if area.is_empty() {
            return Vec::new();
        }
        let mut buf = Buffer::new(area.width, area.height);
        FoldText::new(&self.engine).render(area, &mut buf);
        buf.to_lines()
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

fn state_label(state: FoldState, can_fold: bool) -> &'static str {
    if can_fold { state.as_str() } else { "expanded" }
}

fn draw_line(buf: &mut Buffer, y: u16, x: u16, text: &str, style: Style) {
    if y >= buf.height() {
        return;
    }
    let mut col = x;
    for ch in text.chars() {
        if col >= buf.width() {
            break;
        }
        let mut cell = Cell::from_char(ch);
        style.apply_to(&mut cell);
        buf.set(col, y, cell);
        col = col.saturating_add(1);
    }
}

/// Write the folded and then the unfolded rendering of `app` to `out`.
pub fn print_once(app: &mut App, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "folded (height {}):", app.container_height())?;
    for line in app.snapshot() {
        writeln!(out, "  {line}")?;
    }
    app.handle(Input::Toggle);
    if app.engine().fold_state() == FoldState::Unfolded {
        writeln!(out, "unfolded (height {}):", app.container_height())?;
        for line in app.snapshot() {
            writeln!(out, "  {line}")?;
        }
    } else {
        writeln!(out, "content fits in {} lines; nothing to unfold", app.engine().line_cap())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "one two three four five six seven eight nine ten";

    fn app() -> App {
        // 10 usable columns
        App::new(FoldConfig::terminal(), LONG, None, (14, 20))
    }

    #[test]
    fn container_tracks_observer() {
        let mut app = app();
        assert_eq!(app.container_height(), 3.0);
        assert_eq!(app.widget_area(), Rect::new(2, 2, 10, 3));
        app.handle(Input::Toggle);
        assert_eq!(app.container_height(), 6.0);
        assert_eq!(app.widget_area().height, 6);
    }

    #[test]
    fn click_on_label_toggles() {
        let mut app = app();
        app.handle(Input::Click { column: 2, row: 2 });
        assert_eq!(app.engine().fold_state(), FoldState::Folded);
        // label occupies columns 8..12 of row 4
        app.handle(Input::Click { column: 9, row: 4 });
        assert_eq!(app.engine().fold_state(), FoldState::Unfolded);
    }

    #[test]
    fn resize_reflows() {
        let mut app = app();
        app.handle(Input::Toggle);
        app.handle(Input::Resize {
            width: 19,
            height: 20,
        });
        assert_eq!(app.widget_width(), 15);
        assert_eq!(app.engine().fold_state(), FoldState::Unfolded);
        assert_eq!(app.container_height(), 4.0);
    }

    #[test]
    fn line_cap_keys_change_cap() {
        let mut app = app();
        app.handle(Input::MoreLines);
        assert_eq!(app.engine().line_cap(), 4);
        assert_eq!(app.container_height(), 4.0);
        for _ in 0..5 {
            app.handle(Input::FewerLines);
        }
        assert_eq!(app.engine().line_cap(), 0);
        assert!(!app.engine().can_fold());
        assert_eq!(app.container_height(), 6.0);
    }

    #[test]
    fn quit_stops() {
        let mut app = app();
        assert_eq!(app.handle(Input::Quit), Control::Quit);
        assert_eq!(app.handle(Input::Toggle), Control::Continue);
    }

    #[test]
    fn fixed_width_is_clamped_to_screen() {
        let app = App::new(FoldConfig::terminal(), LONG, Some(40), (14, 20));
        assert_eq!(app.widget_width(), 10);
        let app = App::new(FoldConfig::terminal(), LONG, Some(6), (14, 20));
        assert_eq!(app.widget_width(), 6);
    }

    #[test]
    fn snapshot_shows_widget_rows() {
        let app = app();
        assert_eq!(app.snapshot(), vec!["one two", "three four", "five… more"]);
    }

    #[test]
    fn render_draws_title_and_widget() {
        let app = app();
        let mut buf = Buffer::new(14, 20);
        app.render(&mut buf);
        assert!(buf.row_text(0).contains("foldtext demo"));
        assert_eq!(buf.get(2, 0).map(|c| c.bg), Some(PackedRgba::rgb(40, 40, 90)));
        assert_eq!(buf.row_text(2).trim_end(), "  one two");
        assert!(buf.row_text(6).contains("state: folded"));
    }

    #[test]
    fn print_once_writes_both_states() {
        let mut app = app();
        let mut out = Vec::new();
        assert!(print_once(&mut app, &mut out).is_ok());
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("folded (height 3):"));
        assert!(text.contains("unfolded (height 6):"));
        assert!(text.contains("  ten   less"));
    }

    #[test]
    fn print_once_short_text() {
        let mut app = App::new(FoldConfig::terminal(), "short", None, (14, 20));
        let mut out = Vec::new();
        assert!(print_once(&mut app, &mut out).is_ok());
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("nothing to unfold"));
    }
}
