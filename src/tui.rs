//! # Terminal
//!
//! Entering and leaving the full-screen terminal mode in which the board is
//! drawn. Besides the alternate screen and raw mode, the board needs mouse
//! capture so that cards can be dragged.

use std::{io::{self, stdout, Stdout}, panic, sync::{Arc, Mutex}, thread};

use crossterm::{
	event::{DisableMouseCapture, EnableMouseCapture},
	execute,
	terminal::{
		disable_raw_mode, enable_raw_mode,
		EnterAlternateScreen, LeaveAlternateScreen
	}
};
use log::{trace, warn};
use ratatui::{backend::{Backend, CrosstermBackend}, Terminal};

/// The terminal type.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run `f` against the full-screen terminal, restoring the terminal
/// afterward, including when `f` panics on the calling thread.
///
/// # Arguments
///
/// * `f` - The function to apply to the terminal.
///
/// # Returns
///
/// The result of `f`.
///
/// # Errors
///
/// Any error from entering or leaving full-screen mode, or from `f`.
pub fn tui<F, T>(f: F) -> io::Result<T>
	where F: FnOnce(&mut Tui) -> io::Result<T>
{
	// Install a panic hook that restores the terminal before delegating to
	// the previous hook. Panics on other threads (e.g., network workers) must
	// leave the terminal alone.
	let original_hook = panic::take_hook();
	let original_hook = Arc::new(Mutex::new(Some(original_hook)));
	let original_hook_clone = Arc::clone(&original_hook);
	let ui_thread = thread::current().id();
	panic::set_hook(Box::new(move |info| {
		if thread::current().id() == ui_thread
		{
			let _ = tui_restore();
		}
		if let Ok(hook) = original_hook.lock()
		{
			if let Some(hook) = hook.as_ref()
			{
				hook(info);
			}
		}
	}));
	// Setup is not atomic, so restore even after a partial failure.
	let result = match tui_init()
	{
		Ok(mut terminal) => f(&mut terminal),
		Err(e) => Err(e)
	};
	match original_hook_clone.lock().map(|mut hook| hook.take())
	{
		Ok(Some(hook)) => panic::set_hook(hook),
		_ => warn!("Failed to reinstate the original panic hook")
	}
	tui_restore()?;
	trace!("Terminal restored");
	result
}

/// Enter full-screen mode with mouse capture.
fn tui_init() -> io::Result<Tui>
{
	let mut stdout = stdout();
	execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
	enable_raw_mode()?;
	Terminal::new(CrosstermBackend::new(stdout))
}

/// Leave full-screen mode and show the cursor again.
fn tui_restore() -> io::Result<()>
{
	let mut stdout = stdout();
	execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)?;
	disable_raw_mode()?;
	CrosstermBackend::new(stdout).show_cursor()
}
