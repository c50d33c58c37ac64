use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Size, Frame, Terminal};

use crate::error::AppError;

type PanicHook = Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

fn terminal_error(err: impl std::fmt::Display) -> AppError {
    AppError::Terminal(err.to_string())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Raw mode + alternate screen for the lifetime of the value.
pub struct TuiTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TuiTerminal {
    pub fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(terminal_error)?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_error(err));
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(t) => t,
            Err(err) => {
                restore_terminal();
                return Err(terminal_error(err));
            }
        };
        Ok(Self { terminal })
    }

    pub fn size(&self) -> Result<Size, AppError> {
        self.terminal.size().map_err(terminal_error)
    }

    pub fn draw<F>(&mut self, render: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render).map_err(terminal_error)?;
        Ok(())
    }
}

impl Drop for TuiTerminal {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

/// Restores the terminal before the default panic message is printed, and
/// puts the previous hook back when dropped.
pub struct PanicRestoreHookGuard {
    previous: Option<std::sync::Arc<PanicHook>>,
}

impl PanicRestoreHookGuard {
    pub fn install() -> Self {
        let previous: std::sync::Arc<PanicHook> = std::sync::Arc::new(panic::take_hook());
        let chained = std::sync::Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            chained(info);
        }));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for PanicRestoreHookGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let _ = panic::take_hook();
        if let Some(previous) = self.previous.take() {
            panic::set_hook(Box::new(move |info| previous(info)));
        }
    }
}
