#![forbid(unsafe_code)]

//! Terminal demo of the foldtext widget.

pub mod app;
pub mod cli;
pub mod error;
pub mod terminal;

use std::env;
use std::fs;
use std::io;
use std::time::Duration;

use foldtext_core::logging::{self, LogConfig, LogSink};
use foldtext_render::buffer::Buffer;
use foldtext_widgets::config::FoldConfig;

use crate::app::{App, Control, SAMPLE_TEXT, print_once};
use crate::cli::{Opts, TextSource};
use crate::error::DemoError;
use crate::terminal::{SessionOptions, TerminalSession};

/// Widget width for `--once` when none is given.
const ONCE_WIDTH: u16 = 60;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the demo with parsed options.
pub fn run(opts: Opts) -> Result<(), DemoError> {
    let mut log_config = LogConfig::from_env();
    if let Some(path) = &opts.log_file {
        log_config = log_config.sink(LogSink::File(path.clone()));
    }
    // stderr logs would corrupt the interactive screen
    if opts.once || opts.log_file.is_some() {
        logging::install(&log_config)?;
    }

    let config = fold_config(&opts, |key| env::var(key).ok())?;
    let text = load_text(&opts.source)?;

    if opts.once {
        let width = opts.width.unwrap_or(ONCE_WIDTH);
        let mut app = App::new(config, &text, Some(width), (width.saturating_add(4), 1));
        print_once(&mut app, &mut io::stdout().lock())?;
        return Ok(());
    }

    let session = TerminalSession::new(SessionOptions::default())?;
    let mut app = App::new(config, &text, opts.width, session.size()?);
    let mut stdout = io::stdout();
    tracing::info!(width = app.widget_width(), "demo started");

    let mut buf = frame_buffer(app.screen());
    loop {
        let size = app.screen();
        if (buf.width(), buf.height()) == (size.0.max(1), size.1.max(1)) {
            buf.clear();
        } else {
            buf = frame_buffer(size);
        }
        app.render(&mut buf);
        terminal::draw(&mut stdout, &buf)?;

        if let Some(input) = session.next_input(POLL_INTERVAL)?
            && app.handle(input) == Control::Quit
        {
            break;
        }
    }

    tracing::info!("demo finished");
    Ok(())
}

fn frame_buffer((columns, rows): (u16, u16)) -> Buffer {
    Buffer::new(columns.max(1), rows.max(1))
}

/// Terminal-grid configuration with environment and `--lines` overrides.
fn fold_config<F>(opts: &Opts, get_env: F) -> Result<FoldConfig, DemoError>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = FoldConfig::terminal().with_env_overrides(get_env);
    if let Some(lines) = opts.lines {
        config = config.line_cap(lines);
    }
    config.validate()?;
    Ok(config)
}

fn load_text(source: &TextSource) -> Result<String, DemoError> {
    match source {
        TextSource::Sample => Ok(SAMPLE_TEXT.to_string()),
        TextSource::Inline(text) => Ok(text.clone()),
        TextSource::File(path) => fs::read_to_string(path).map_err(|source| DemoError::ReadText {
            path: path.clone(),
            source,
        }),
    }
}
