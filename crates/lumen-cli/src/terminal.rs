//! Line-based terminal frontend
//!
//! Menus are answered with the option number (or `b` to go back). Text and
//! scan screens take one line; `:back` goes back. End of input closes the
//! session.
//!
//! Masked entries (the passphrase) are read from the terminal in raw mode
//! when [`TerminalFrontend::with_hidden_entry`] is set, so they are never
//! echoed.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use lumen_core::QrDensity;
use lumen_flow::{Destination, FlowError, Frontend, Input, Screen, ScreenKind};

use crate::qr;

const BACK_KEY: &str = "b";
const TEXT_BACK: &str = ":back";

pub struct TerminalFrontend<R, W> {
    input: R,
    output: W,
    qr_density: QrDensity,
    hidden_entry: bool,
}

impl<R: BufRead, W: Write> TerminalFrontend<R, W> {
    pub fn new(input: R, output: W, qr_density: QrDensity) -> Self {
        Self {
            input,
            output,
            qr_density,
            hidden_entry: false,
        }
    }

    /// Read masked entries from the terminal with echo off
    ///
    /// Only meaningful when the process is attached to a terminal.
    pub fn with_hidden_entry(mut self) -> Self {
        self.hidden_entry = true;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, FlowError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_error)?;
        if read == 0 {
            return Err(FlowError::InputClosed);
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn choose(&mut self, options: &[String], show_back: bool) -> Result<Input, FlowError> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option).map_err(io_error)?;
        }
        if show_back {
            writeln!(self.output, "  {}) Back", BACK_KEY).map_err(io_error)?;
        }

        loop {
            write!(self.output, "> ").map_err(io_error)?;
            self.output.flush().map_err(io_error)?;

            let line = self.read_line()?;
            let answer = line.trim();
            if show_back && answer.eq_ignore_ascii_case(BACK_KEY) {
                return Ok(Input::Back);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Input::Select(n - 1)),
                _ if show_back => writeln!(self.output, "Choose 1-{} or {}", options.len(), BACK_KEY)
                    .map_err(io_error)?,
                _ => writeln!(self.output, "Choose 1-{}", options.len()).map_err(io_error)?,
            }
        }
    }

    fn enter_text(&mut self, prompt: &str) -> Result<Input, FlowError> {
        write!(self.output, "{} ({} to go back): ", prompt, TEXT_BACK).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;

        let line = self.read_line()?;
        Ok(text_input(line))
    }

    fn enter_hidden(&mut self, prompt: &str) -> Result<Input, FlowError> {
        write!(self.output, "{} (hidden, {} to go back): ", prompt, TEXT_BACK).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;

        let line = read_hidden_line().map_err(io_error)?;
        writeln!(self.output).map_err(io_error)?;
        line.map(text_input).ok_or(FlowError::InputClosed)
    }

    fn show_qr(&mut self, payload: &str) -> Result<(), FlowError> {
        let frames = qr::encode_frames(payload, self.qr_density);
        let total = frames.len();
        for (i, frame) in frames.iter().enumerate() {
            let rendered = qr::render_frame(frame, self.qr_density)
                .map_err(|e| FlowError::Frontend(format!("QR encode: {}", e)))?;
            if total > 1 {
                writeln!(self.output, "Frame {}/{}", i + 1, total).map_err(io_error)?;
            }
            write!(self.output, "{}", rendered).map_err(io_error)?;
        }
        writeln!(self.output, "{}", payload).map_err(io_error)
    }
}

impl<R: BufRead, W: Write> Frontend for TerminalFrontend<R, W> {
    fn present(&mut self, destination: &Destination, screen: &Screen) -> Result<Input, FlowError> {
        tracing::debug!(%destination, "presenting screen");

        writeln!(self.output).map_err(io_error)?;
        writeln!(self.output, "== {} ==", screen.title).map_err(io_error)?;
        for line in &screen.body {
            writeln!(self.output, "{}", line).map_err(io_error)?;
        }

        match &screen.kind {
            ScreenKind::Menu { options } => self.choose(options, screen.show_back),
            ScreenKind::TextEntry { prompt, masked } if *masked && self.hidden_entry => {
                self.enter_hidden(prompt)
            }
            ScreenKind::TextEntry { prompt, .. } => self.enter_text(prompt),
            ScreenKind::Scan => self.enter_text("Scanned payload"),
            ScreenKind::QrDisplay { payload, options } => {
                self.show_qr(payload)?;
                self.choose(options, screen.show_back)
            }
        }
    }
}

fn text_input(line: String) -> Input {
    if line.trim() == TEXT_BACK {
        Input::Back
    } else {
        Input::Text(line)
    }
}

/// Terminal raw mode, restored on drop
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read one line from the terminal without echoing it
///
/// Returns `None` on Ctrl-C or Ctrl-D.
fn read_hidden_line() -> io::Result<Option<String>> {
    let _raw = RawMode::enable()?;
    let mut line = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(line)),
            KeyCode::Backspace => {
                line.pop();
            }
            KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Char(c) => line.push(c),
            _ => {}
        }
    }
}

fn io_error(e: io::Error) -> FlowError {
    FlowError::Frontend(e.to_string())
}
