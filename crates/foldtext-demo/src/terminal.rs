#![forbid(unsafe_code)]

//! Terminal session and I/O for the interactive demo.
//!
//! [`TerminalSession`] enters raw mode, the alternate screen and mouse
//! capture, and restores the terminal on drop or panic. [`map_event`]
//! turns crossterm events into demo [`Input`]s and [`draw`] paints a
//! [`Buffer`].

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self as cte, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use foldtext_render::buffer::Buffer;
use foldtext_render::cell::{Cell, PackedRgba, StyleFlags};

use crate::app::Input;

/// Terminal modes the session enables.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub alternate_screen: bool,
    pub mouse_capture: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
        }
    }
}

/// Raw-mode terminal session, restored on drop.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested features.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or a feature cannot be enabled.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            mouse_enabled: false,
        };
        let mut stdout = io::stdout();

        if options.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            tracing::info!("alternate screen enabled");
        }

        if options.mouse_capture {
            execute!(stdout, EnableMouseCapture)?;
            session.mouse_enabled = true;
            tracing::info!("mouse capture enabled");
        }

        execute!(stdout, Hide)?;
        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for the next input the demo understands.
    pub fn next_input(&self, timeout: Duration) -> io::Result<Option<Input>> {
        if !cte::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(cte::read()?))
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        // Disable features in reverse order of enabling
        if self.mouse_enabled {
            let _ = execute!(stdout, DisableMouseCapture);
            self.mouse_enabled = false;
            tracing::info!("mouse capture disabled");
        }

        let _ = execute!(stdout, Show);

        if self.alternate_screen_enabled {
            let _ = execute!(stdout, LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            tracing::info!("alternate screen disabled");
        }

        let _ = terminal::disable_raw_mode();
        tracing::info!("terminal raw mode disabled");
        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture);
    let _ = execute!(stdout, Show);
    let _ = execute!(stdout, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Map a crossterm event to a demo input.
pub fn map_event(event: cte::Event) -> Option<Input> {
    match event {
        cte::Event::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return None;
            }
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Input::Quit)
                }
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('m') => Some(Input::Toggle),
                KeyCode::Char('+') | KeyCode::Char('=') => Some(Input::MoreLines),
                KeyCode::Char('-') => Some(Input::FewerLines),
                KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
                _ => None,
            }
        }
        cte::Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Input::Click {
                column: mouse.column,
                row: mouse.row,
            }),
            _ => None,
        },
        cte::Event::Resize(width, height) => Some(Input::Resize { width, height }),
        _ => None,
    }
}

/// Paint `buf` to `out`, starting at the top-left corner.
pub fn draw(out: &mut impl Write, buf: &Buffer) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    let mut current: Option<(PackedRgba, PackedRgba, StyleFlags)> = None;
    for y in 0..buf.height() {
        queue!(out, MoveTo(0, y))?;
        for cell in buf.row_cells(y) {
            if cell.is_continuation() {
                continue;
            }
            let style = (cell.fg, cell.bg, cell.flags);
            if current != Some(style) {
                apply_style(out, cell)?;
                current = Some(style);
            }
            let ch = cell.content.as_char().unwrap_or(' ');
            queue!(out, Print(ch))?;
        }
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()
}

fn apply_style(out: &mut impl Write, cell: &Cell) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(to_color(cell.fg)),
        SetBackgroundColor(to_color(cell.bg))
    )?;
    let attributes = [
        (StyleFlags::BOLD, Attribute::Bold),
        (StyleFlags::DIM, Attribute::Dim),
        (StyleFlags::ITALIC, Attribute::Italic),
        (StyleFlags::UNDERLINE, Attribute::Underlined),
        (StyleFlags::REVERSE, Attribute::Reverse),
        (StyleFlags::STRIKETHROUGH, Attribute::CrossedOut),
    ];
    for (flag, attribute) in attributes {
        if cell.flags.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

fn to_color(color: PackedRgba) -> Color {
    if color.is_visible() {
        Color::Rgb {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    } else {
        Color::Reset
    }
}
