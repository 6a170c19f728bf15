//! # Application
//!
//! The application state and the text-based user interface (TUI) that drives
//! a [`Board`]: it lays out the screen, turns terminal input into board
//! actions, and carries out the effects the board asks for.

use std::{
	io,
	sync::mpsc::{channel, Receiver, Sender},
	thread,
	time::Duration
};

use crossterm::event::{
	poll, read, Event, KeyCode, KeyEvent, KeyEventKind,
	MouseButton, MouseEvent, MouseEventKind
};
use connections_board::{
	board::{Action, Board, CardId, Effect, Placement},
	client::ApiClient,
	color::{Color, Swatch},
	geometry::{self, BoardGeometry, Point},
	persistence::{self, LoadError, Store},
	puzzle::Puzzle
};
use log::{debug, error, trace, warn};
use ratatui::{
	buffer::Buffer,
	layout::{Alignment, Constraint, Direction, Layout, Rect},
	style::{self, Modifier, Style, Stylize},
	text::{Line, Span},
	widgets::{
		block::{Position, Title},
		Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap
	},
	Frame
};

use crate::tui::Tui;

/// How long to wait for input before drawing the next frame.
const FRAME: Duration = Duration::from_millis(16);

/// The width of the sidebar.
const SIDEBAR_WIDTH: u16 = 34;

/// The height of the drop target row.
const TRAY_HEIGHT: u16 = 6;

////////////////////////////////////////////////////////////////////////////////
//                                Application.                                //
////////////////////////////////////////////////////////////////////////////////

/// The application state.
#[must_use]
pub struct App
{
	/// What the application is doing.
	state: ExecutionState,

	/// The view-model.
	board: Board,

	/// Where the board is saved.
	store: Box<dyn Store>,

	/// The puzzle server.
	client: ApiClient,

	/// The width and height of a card.
	card_size: (u16, u16),

	/// The card under the mouse, the target of swatch keys.
	hover: Option<CardId>,

	/// Whether the notes panel is expanded.
	notes_open: bool,

	/// The most recent screen layout.
	screen: Screen,

	/// Hands network results back to the UI thread.
	sender: Sender<NetworkEvent>,

	/// Receives network results on the UI thread.
	receiver: Receiver<NetworkEvent>
}

// Public interface.
impl App
{
	/// Create the application for a puzzle, restoring any saved progress.
	///
	/// # Arguments
	///
	/// * `puzzle` - The puzzle to play.
	/// * `store` - Where progress is saved.
	/// * `client` - The puzzle server.
	/// * `card_size` - The width and height of a card.
	/// * `area` - The initial size of the terminal.
	///
	/// # Errors
	///
	/// [`io::ErrorKind::InvalidData`] if the puzzle is malformed.
	pub fn new(
		puzzle: Puzzle,
		store: Box<dyn Store>,
		client: ApiClient,
		card_size: (u16, u16),
		area: Rect
	) -> io::Result<Self>
	{
		let screen = Screen::new(area);
		let geometry = screen.geometry(card_size);
		let mut board = Board::new(puzzle, geometry)
			.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
		board.apply(Action::Resize { geometry, targets: screen.targets() });
		match persistence::load(store.as_ref(), &mut board)
		{
			Ok(restored) => debug!("restored: {:?}", restored),
			Err(LoadError::NotFound(date)) =>
				debug!("no saved state for {}", date),
			Err(e) => warn!("Error loading saved state: {}", e)
		}
		let (sender, receiver) = channel();
		Ok(Self {
			state: ExecutionState::Playing,
			board,
			store,
			client,
			card_size,
			hover: None,
			notes_open: true,
			screen,
			sender,
			receiver
		})
	}

	/// Run the application until the player exits. Each iteration:
	///
	/// * Applies any finished network requests and pending drag moves.
	/// * Renders the frame.
	/// * Processes the input that arrived since the last frame.
	///
	/// # Errors
	///
	/// Any error that occurs while driving the terminal.
	pub fn run(mut self, tui: &mut Tui) -> io::Result<()>
	{
		while self.is_running()
		{
			let size = tui.size()?;
			self.process_systems(Rect::new(0, 0, size.width, size.height));
			tui.draw(|frame| self.render_frame(frame))?;
			self.process_events()?;
		}
		Ok(())
	}

	/// Check if the application is running.
	#[inline]
	#[must_use]
	pub fn is_running(&self) -> bool
	{
		self.state != ExecutionState::Exiting
	}
}

// Private implementation details.
impl App
{
	/// Apply an action to the board and carry out its effects.
	fn dispatch(&mut self, action: Action)
	{
		let effects = self.board.apply(action);
		for effect in effects
		{
			self.perform(effect);
		}
	}

	/// Carry out one effect. Storage failures are logged; network requests
	/// run on their own threads and report back through the channel.
	fn perform(&mut self, effect: Effect)
	{
		match effect
		{
			Effect::Persist =>
			{
				if let Err(e) = persistence::save(self.store.as_mut(), &self.board)
				{
					warn!("Error saving state: {}", e);
				}
			},
			Effect::Forget =>
			{
				if let Err(e) =
					persistence::clear(self.store.as_mut(), self.board.date())
				{
					warn!("Error clearing state: {}", e);
				}
			},
			Effect::RequestHint { date, level } =>
			{
				let client = self.client.clone();
				let sender = self.sender.clone();
				thread::spawn(move || match client.hint(&date, level)
				{
					Ok(hint) =>
					{
						let _ = sender.send(NetworkEvent::Hint(hint));
					},
					Err(e) => error!("Error fetching hint: {}", e)
				});
			},
			Effect::Submit { date, submission } =>
			{
				let client = self.client.clone();
				let sender = self.sender.clone();
				thread::spawn(move || match client.submit(&date, &submission)
				{
					Ok(verdict) =>
					{
						let _ = sender.send(NetworkEvent::Verdict(verdict.correct));
					},
					Err(e) => error!("Error submitting answer: {}", e)
				});
			}
		}
	}

	/// Run the per-frame work: apply network results, track the terminal
	/// size, and apply the latest drag move.
	fn process_systems(&mut self, area: Rect)
	{
		while let Ok(event) = self.receiver.try_recv()
		{
			trace!("network event: {:?}", event);
			let action = match event
			{
				NetworkEvent::Hint(hint) => Action::HintReceived(hint),
				NetworkEvent::Verdict(correct) =>
					Action::SubmissionChecked(correct)
			};
			self.dispatch(action);
		}
		if area != self.screen.area
		{
			self.screen = Screen::new(area);
			let geometry = self.screen.geometry(self.card_size);
			self.dispatch(Action::Resize {
				geometry,
				targets: self.screen.targets()
			});
		}
		self.dispatch(Action::Frame);
	}

	/// Wait up to one frame for input, then drain everything that arrived, so
	/// that a burst of mouse moves costs a single board update.
	///
	/// # Errors
	///
	/// Any error that occurs while reading input.
	fn process_events(&mut self) -> io::Result<()>
	{
		if poll(FRAME)?
		{
			loop
			{
				match read()?
				{
					Event::Key(event) if event.kind == KeyEventKind::Press =>
						self.process_key_event(event),
					Event::Mouse(event) => self.process_mouse_event(event),
					_ => {}
				}
				if !poll(Duration::ZERO)?
				{
					break
				}
			}
		}
		Ok(())
	}

	/// Process a mouse event:
	///
	/// * Left press, drag, release - Drag a card, or click to select it.
	/// * Right press - Cycle the color of the card.
	/// * Movement - Track the card under the mouse.
	fn process_mouse_event(&mut self, event: MouseEvent)
	{
		let point = Point::new(event.column as i32, event.row as i32);
		if self.board.alert().is_some()
		{
			if let MouseEventKind::Down(_) = event.kind
			{
				self.dispatch(Action::DismissAlert);
			}
			return
		}
		match event.kind
		{
			MouseEventKind::Down(MouseButton::Left) =>
				self.dispatch(Action::PointerDown(point)),
			MouseEventKind::Drag(MouseButton::Left) =>
				self.dispatch(Action::PointerMove(point)),
			MouseEventKind::Up(MouseButton::Left) =>
				self.dispatch(Action::PointerUp(point)),
			MouseEventKind::Down(MouseButton::Right) =>
			{
				if let Some(id) = self.board.card_at(point)
				{
					self.dispatch(Action::CycleColor(id));
				}
			},
			MouseEventKind::Moved => self.hover = self.board.card_at(point),
			_ => {}
		}
	}

	/// Process a key event. An outstanding alert swallows the key.
	fn process_key_event(&mut self, event: KeyEvent)
	{
		if self.board.alert().is_some()
		{
			self.dispatch(Action::DismissAlert);
			return
		}
		match self.state
		{
			ExecutionState::Playing => self.process_key_event_playing(event),
			ExecutionState::EditingNotes =>
				self.process_key_event_notes(event),
			ExecutionState::ConfirmingReset =>
			{
				if let KeyCode::Char('y') | KeyCode::Char('Y') = event.code
				{
					self.dispatch(Action::Reset);
				}
				self.state = ExecutionState::Playing;
			},
			ExecutionState::Exiting => {}
		}
	}

	/// Process a key event while [playing](ExecutionState::Playing):
	///
	/// * Escape, Q - Exit the application.
	/// * 1-4 - Toggle yellow, green, blue, or purple on the card under the
	///   mouse.
	/// * 0 - Remove the color of the card under the mouse.
	/// * Y, G, B, P - Color every selected card.
	/// * X - Clear the selection.
	/// * C - Check the selection against the answer key.
	/// * R - Arrange the cards in a grid.
	/// * S - Shuffle the cards.
	/// * N - Edit the notes.
	/// * T - Collapse or expand the notes.
	/// * H - Request a hint.
	/// * L - Change the hint level.
	/// * Enter - Submit the grouping.
	/// * Delete - Reset the puzzle, after confirmation.
	fn process_key_event_playing(&mut self, event: KeyEvent)
	{
		let swatch = |c: char| match c
		{
			'0' => Some(Swatch::None),
			'1' ..= '4' => Some(Swatch::Color(Color::ALL[c as usize - '1' as usize])),
			_ => None
		};
		match event.code
		{
			KeyCode::Esc | KeyCode::Char('q') => self.exit(),
			KeyCode::Char(c) if swatch(c).is_some() =>
			{
				if let (Some(card), Some(swatch)) = (self.hover, swatch(c))
				{
					self.dispatch(Action::SelectSwatch { card, swatch });
				}
			},
			KeyCode::Char('y') => self.dispatch(Action::ColorSelection(Color::Yellow)),
			KeyCode::Char('g') => self.dispatch(Action::ColorSelection(Color::Green)),
			KeyCode::Char('b') => self.dispatch(Action::ColorSelection(Color::Blue)),
			KeyCode::Char('p') => self.dispatch(Action::ColorSelection(Color::Purple)),
			KeyCode::Char('x') => self.dispatch(Action::ClearSelection),
			KeyCode::Char('c') => self.dispatch(Action::CheckSelection),
			KeyCode::Char('r') => self.dispatch(Action::ArrangeGrid),
			KeyCode::Char('s') =>
				self.dispatch(Action::Shuffle { seed: rand::random() }),
			KeyCode::Char('n') =>
			{
				self.notes_open = true;
				self.state = ExecutionState::EditingNotes;
			},
			KeyCode::Char('t') => self.notes_open = !self.notes_open,
			KeyCode::Char('h') => self.dispatch(Action::RequestHint),
			KeyCode::Char('l') => self.dispatch(Action::CycleHintLevel),
			KeyCode::Enter => self.dispatch(Action::Submit),
			KeyCode::Delete => self.state = ExecutionState::ConfirmingReset,
			_ => {}
		}
	}

	/// Process a key event while [editing the notes](ExecutionState::EditingNotes):
	///
	/// * Escape - Save the notes and stop editing.
	/// * Enter - Start a new line.
	/// * Backspace - Delete the last character.
	/// * Any other character - Append it.
	fn process_key_event_notes(&mut self, event: KeyEvent)
	{
		match event.code
		{
			KeyCode::Esc =>
			{
				self.dispatch(Action::CommitNotes);
				self.state = ExecutionState::Playing;
			},
			KeyCode::Enter => self.dispatch(Action::InsertNote('\n')),
			KeyCode::Backspace => self.dispatch(Action::DeleteNote),
			KeyCode::Char(c) => self.dispatch(Action::InsertNote(c)),
			_ => {}
		}
	}

	/// Mark the application for exit. Notes typed but not yet committed are
	/// saved first.
	fn exit(&mut self)
	{
		self.perform(Effect::Persist);
		self.state = ExecutionState::Exiting;
	}

	/// Render the application frame.
	fn render_frame(&self, frame: &mut Frame)
	{
		frame.render_widget(self, frame.area());
	}

	/// Render the board, with its cards.
	fn render_board(&self, buf: &mut Buffer)
	{
		let title = format!("Connections – {}", self.board.date());
		Block::default()
			.borders(Borders::ALL)
			.border_style(Style::default().fg(style::Color::White))
			.title(
				Title::default()
					.content(title)
					.position(Position::Top)
					.alignment(Alignment::Center)
			)
			.title(
				Title::default()
					.content("⎋ – exit".yellow().bold())
					.position(Position::Top)
					.alignment(Alignment::Left)
			)
			.title(
				Title::default()
					.content("↵ – submit".green().bold())
					.position(Position::Top)
					.alignment(Alignment::Right)
			)
			.title(
				Title::default()
					.content(
						"\
							drag – move \
							click – select \
							right-click – cycle \
							1-4/0 – tag \
							ygbp – tag selected \
							c – check \
							x – unselect \
							r – grid \
							s – shuffle \
							⌦ – reset\
						".cyan()
					)
					.position(Position::Bottom)
					.alignment(Alignment::Center)
			)
			.render(self.screen.board, buf);
		// The dragged card is drawn last, so it stays on top.
		let dragged = self.board.dragged();
		let cards = self.board.cards().iter()
			.filter(|c| c.placement == Placement::Board && Some(c.id) != dragged)
			.chain(dragged.and_then(|id| self.board.card(id)));
		for card in cards
		{
			let Some(bounds) = self.board.card_bounds(card.id)
			else
			{
				continue
			};
			let area = to_area(bounds).intersection(self.screen.board_inner);
			if area.is_empty()
			{
				continue
			}
			let (border_type, border_style) =
				if card.is_completed()
				{
					(BorderType::Thick, Style::default().fg(style::Color::White))
				}
				else if self.board.is_selected(card.id)
				{
					(
						BorderType::Double,
						Style::default().fg(style::Color::Cyan).bold()
					)
				}
				else
				{
					(BorderType::Rounded, Style::default().fg(style::Color::Gray))
				};
			let mut text_style = card_style(card.color);
			if self.hover == Some(card.id) || dragged == Some(card.id)
			{
				text_style = text_style.add_modifier(Modifier::BOLD);
			}
			Clear.render(area, buf);
			Paragraph::new(card.text.as_str())
				.block(
					Block::new()
						.borders(Borders::ALL)
						.border_type(border_type)
						.border_style(border_style)
				)
				.alignment(Alignment::Center)
				.style(text_style)
				.render(area, buf);
		}
	}

	/// Render the drop targets, with the cards parented to them.
	fn render_trays(&self, buf: &mut Buffer)
	{
		for (index, &tray) in self.screen.trays.iter().enumerate()
		{
			Block::default()
				.borders(Borders::ALL)
				.border_type(BorderType::Rounded)
				.border_style(Style::default().fg(style::Color::DarkGray))
				.title(format!("Group {}", index + 1))
				.render(tray, buf);
		}
		for card in self.board.cards()
		{
			if card.placement == Placement::Board
			{
				continue
			}
			let Some(bounds) = self.board.card_bounds(card.id)
			else
			{
				continue
			};
			let area = to_area(bounds).intersection(self.screen.area);
			let mut line = Span::styled(card.text.as_str(), card_style(card.color));
			if self.board.is_selected(card.id)
			{
				line = line.add_modifier(Modifier::UNDERLINED);
			}
			Paragraph::new(Line::from(line)).render(area, buf);
		}
	}

	/// Render the sidebar: the hint, the solved groups, and the notes.
	fn render_sidebar(&self, buf: &mut Buffer)
	{
		let hint = self.board.hint().unwrap_or("Press h for a hint.");
		Paragraph::new(hint)
			.wrap(Wrap { trim: true })
			.block(
				Block::default()
					.borders(Borders::ALL)
					.title(format!("Hint ({})", self.board.hint_level()))
					.title(
						Title::default()
							.content("h – hint l – level".cyan())
							.position(Position::Bottom)
							.alignment(Alignment::Center)
					)
			)
			.render(self.screen.hint, buf);

		let puzzle = self.board.puzzle();
		let solved = self.board.completed().iter()
			.filter_map(|&index| puzzle.groups.get(index))
			.map(|group| {
				Line::from(vec![
					Span::styled(group.category.as_str(), card_style(Some(group.color))),
					Span::raw(format!(": {}", group.words.join(", ")))
				])
			})
			.collect::<Vec<_>>();
		Paragraph::new(solved)
			.wrap(Wrap { trim: true })
			.block(Block::default().borders(Borders::ALL).title("Completed Groups"))
			.render(self.screen.completed, buf);

		let editing = self.state == ExecutionState::EditingNotes;
		let (help, border) =
			if editing { ("⎋ – done", style::Color::Yellow) }
			else { ("n – edit t – collapse", style::Color::White) };
		let notes =
			if !self.notes_open { "(collapsed)".to_string() }
			else if editing { format!("{}▏", self.board.notes()) }
			else { self.board.notes().to_string() };
		Paragraph::new(notes)
			.wrap(Wrap { trim: false })
			.block(
				Block::default()
					.borders(Borders::ALL)
					.border_style(Style::default().fg(border))
					.title("Notes")
					.title(
						Title::default()
							.content(help.cyan())
							.position(Position::Bottom)
							.alignment(Alignment::Center)
					)
			)
			.render(self.screen.notes, buf);
	}

	/// Render a message box in the middle of the screen.
	fn render_popup(&self, title: &str, message: &str, buf: &mut Buffer)
	{
		let area = centered(self.screen.area, 50, 7);
		Clear.render(area, buf);
		Paragraph::new(message)
			.wrap(Wrap { trim: true })
			.alignment(Alignment::Center)
			.block(
				Block::default()
					.borders(Borders::ALL)
					.border_type(BorderType::Double)
					.title(title)
					.title(
						Title::default()
							.content("any key – dismiss".cyan())
							.position(Position::Bottom)
							.alignment(Alignment::Center)
					)
			)
			.render(area, buf);
	}
}

impl Widget for &App
{
	fn render(self, _area: Rect, buf: &mut Buffer)
	{
		self.render_board(buf);
		self.render_trays(buf);
		self.render_sidebar(buf);
		if let Some(alert) = self.board.alert()
		{
			self.render_popup("Alert", alert, buf);
		}
		else if self.state == ExecutionState::ConfirmingReset
		{
			self.render_popup(
				"Reset",
				"Are you sure you want to reset the puzzle? This will clear \
					your progress. (y/n)",
				buf
			);
		}
	}
}

/// The execution state of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExecutionState
{
	/// The player is working the board.
	Playing,

	/// Keys go to the notes.
	EditingNotes,

	/// The player asked to reset and must confirm.
	ConfirmingReset,

	/// The application is exiting.
	Exiting
}

/// A network result handed back to the UI thread.
#[derive(Clone, Debug)]
enum NetworkEvent
{
	/// A hint arrived.
	Hint(String),

	/// The server judged a submission.
	Verdict(bool)
}

////////////////////////////////////////////////////////////////////////////////
//                                  Layout.                                   //
////////////////////////////////////////////////////////////////////////////////

/// The regions of the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Screen
{
	/// The whole terminal.
	area: Rect,

	/// The board, including its border.
	board: Rect,

	/// The drag surface inside the border.
	board_inner: Rect,

	/// The drop targets beneath the board.
	trays: [Rect; 4],

	/// The hint panel.
	hint: Rect,

	/// The solved groups panel.
	completed: Rect,

	/// The notes panel.
	notes: Rect
}

impl Screen
{
	/// Lay out a terminal of the given size: the board and its drop targets
	/// on the left, the sidebar on the right.
	fn new(area: Rect) -> Self
	{
		let outer = Layout::default()
			.direction(Direction::Horizontal)
			.constraints([Constraint::Min(40), Constraint::Length(SIDEBAR_WIDTH)])
			.split(area);
		let left = Layout::default()
			.direction(Direction::Vertical)
			.constraints([Constraint::Min(8), Constraint::Length(TRAY_HEIGHT)])
			.split(outer[0]);
		let trays = Layout::default()
			.direction(Direction::Horizontal)
			.constraints([Constraint::Ratio(1, 4); 4])
			.split(left[1]);
		let right = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(7),
				Constraint::Length(8),
				Constraint::Min(5)
			])
			.split(outer[1]);
		let board_inner = Block::default().borders(Borders::ALL).inner(left[0]);
		Self {
			area,
			board: left[0],
			board_inner,
			trays: [trays[0], trays[1], trays[2], trays[3]],
			hint: right[0],
			completed: right[1],
			notes: right[2]
		}
	}

	/// The board geometry for cards of the given size.
	fn geometry(&self, (card_width, card_height): (u16, u16)) -> BoardGeometry
	{
		BoardGeometry {
			origin: Point::new(self.board_inner.x as i32, self.board_inner.y as i32),
			width: self.board_inner.width as i32,
			height: self.board_inner.height as i32,
			card_width: card_width as i32,
			card_height: card_height as i32
		}
	}

	/// The drop targets, in board terms.
	fn targets(&self) -> Vec<geometry::Rect>
	{
		self.trays.iter()
			.map(|t| geometry::Rect::new(
				t.x as i32,
				t.y as i32,
				t.width as i32,
				t.height as i32
			))
			.collect()
	}
}

/// Convert a board rectangle into a terminal area, dropping whatever lies
/// above or left of the terminal.
fn to_area(rect: geometry::Rect) -> Rect
{
	let x = rect.x.max(0);
	let y = rect.y.max(0);
	let width = (rect.x + rect.width - x).max(0);
	let height = (rect.y + rect.height - y).max(0);
	Rect::new(
		x.min(u16::MAX as i32) as u16,
		y.min(u16::MAX as i32) as u16,
		width.min(u16::MAX as i32) as u16,
		height.min(u16::MAX as i32) as u16
	)
}

/// A rectangle of at most the given size, centered in the area.
fn centered(area: Rect, width: u16, height: u16) -> Rect
{
	let width = width.min(area.width);
	let height = height.min(area.height);
	Rect::new(
		area.x + (area.width - width) / 2,
		area.y + (area.height - height) / 2,
		width,
		height
	)
}

/// The style of a card with the given tag.
fn card_style(color: Option<Color>) -> Style
{
	match color
	{
		None => Style::default().fg(style::Color::White),
		Some(color) =>
		{
			let background = match color
			{
				Color::Yellow => style::Color::Rgb(0xf7, 0xda, 0x21),
				Color::Green => style::Color::Rgb(0x78, 0xc4, 0x7d),
				Color::Blue => style::Color::Rgb(0x6a, 0xad, 0xea),
				Color::Purple => style::Color::Rgb(0xa8, 0x6c, 0xce)
			};
			Style::default().fg(style::Color::Black).bg(background)
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use connections_board::{
		color::Color as Tag,
		persistence::{state_key, MemoryStore, PersistedState},
		puzzle::Group
	};

	use super::*;

	fn puzzle() -> Puzzle
	{
		let group = |category: &str, words: [&str; 4], color| Group {
			category: category.to_string(),
			words: words.iter().map(|w| w.to_string()).collect(),
			color
		};
		Puzzle {
			date: "2024-06-12".to_string(),
			groups: vec![
				group("Fish", ["BASS", "PIKE", "CARP", "SOLE"], Tag::Yellow),
				group("Trees", ["ASH", "ELM", "OAK", "FIR"], Tag::Green),
				group("Planets", ["MARS", "VENUS", "EARTH", "SATURN"], Tag::Blue),
				group("Dances", ["SALSA", "TANGO", "WALTZ", "RUMBA"], Tag::Purple)
			]
		}
	}

	fn app() -> App
	{
		App::new(
			puzzle(),
			Box::new(MemoryStore::new()),
			ApiClient::new("http://127.0.0.1:9"),
			(16, 3),
			Rect::new(0, 0, 120, 40)
		).unwrap()
	}

	/// Hover over the top-left corner of a card.
	fn hover(app: &mut App, index: u8) -> CardId
	{
		let id = CardId::new(index);
		let corner = app.board.card_bounds(id).unwrap().origin();
		app.process_mouse_event(MouseEvent {
			kind: MouseEventKind::Moved,
			column: corner.x as u16,
			row: corner.y as u16,
			modifiers: crossterm::event::KeyModifiers::NONE
		});
		id
	}

	/// Ensure that the application exits when the escape key is pressed.
	#[test]
	fn test_handle_exit()
	{
		let mut app = app();
		assert!(app.is_running());
		app.process_key_event(KeyCode::Esc.into());
		assert!(!app.is_running());
	}

	/// The board sits inside the left pane, and the drop targets beneath it.
	#[test]
	fn test_layout()
	{
		let app = app();
		let geometry = app.board.geometry();
		assert_eq!(geometry.origin, Point::new(1, 1));
		assert_eq!(geometry.width, 120 - SIDEBAR_WIDTH as i32 - 2);
		assert_eq!(app.board.targets().len(), 4);
		assert!(app.board.targets().iter()
			.all(|t| t.y >= geometry.origin.y + geometry.height));
	}

	/// Swatch keys apply to the card under the mouse.
	#[test]
	fn test_handle_swatches()
	{
		let mut app = app();
		app.process_key_event(KeyCode::Char('3').into());
		assert!(app.board.cards().iter().all(|c| c.color.is_none()));
		let id = hover(&mut app, 5);
		app.process_key_event(KeyCode::Char('3').into());
		assert_eq!(app.board.card(id).unwrap().color, Some(Tag::Blue));
		app.process_key_event(KeyCode::Char('0').into());
		assert_eq!(app.board.card(id).unwrap().color, None);
		// Persisted as it changed.
		assert!(app.store.get(&state_key("2024-06-12")).unwrap().is_some());
	}

	/// Right-click cycles the color of the card under the mouse.
	#[test]
	fn test_handle_right_click()
	{
		let mut app = app();
		let id = CardId::new(2);
		let corner = app.board.card_bounds(id).unwrap().origin();
		let click = MouseEvent {
			kind: MouseEventKind::Down(MouseButton::Right),
			column: corner.x as u16 + 1,
			row: corner.y as u16 + 1,
			modifiers: crossterm::event::KeyModifiers::NONE
		};
		app.process_mouse_event(click);
		app.process_mouse_event(click);
		assert_eq!(app.board.card(id).unwrap().color, Some(Tag::Green));
	}

	/// Notes mode captures every key until escape.
	#[test]
	fn test_handle_notes()
	{
		let mut app = app();
		app.process_key_event(KeyCode::Char('n').into());
		for c in "quit".chars()
		{
			app.process_key_event(KeyCode::Char(c).into());
		}
		app.process_key_event(KeyCode::Backspace.into());
		app.process_key_event(KeyCode::Enter.into());
		assert!(app.is_running());
		assert_eq!(app.board.notes(), "qui\n");
		app.process_key_event(KeyCode::Esc.into());
		assert!(app.is_running());
		assert_eq!(app.state, ExecutionState::Playing);
		assert_eq!(
			app.store.get("puzzleNote_2024-06-12").unwrap().as_deref(),
			Some("qui\n")
		);
	}

	/// An incomplete grouping raises an alert, which the next key dismisses.
	#[test]
	fn test_handle_submit_alert()
	{
		let mut app = app();
		app.process_key_event(KeyCode::Enter.into());
		assert!(app.board.alert().is_some());
		app.process_key_event(KeyCode::Esc.into());
		assert!(app.board.alert().is_none());
		assert!(app.is_running());
	}

	/// Reset only happens after confirmation.
	#[test]
	fn test_handle_reset()
	{
		let mut app = app();
		let id = hover(&mut app, 0);
		app.process_key_event(KeyCode::Char('1').into());
		app.process_key_event(KeyCode::Delete.into());
		app.process_key_event(KeyCode::Char('n').into());
		assert_eq!(app.board.card(id).unwrap().color, Some(Tag::Yellow));
		app.process_key_event(KeyCode::Delete.into());
		app.process_key_event(KeyCode::Char('y').into());
		assert_eq!(app.board.card(id).unwrap().color, None);
		assert!(app.store.get(&state_key("2024-06-12")).unwrap().is_none());
	}

	/// A saved group marker outside the answer key neither loads nor breaks
	/// rendering.
	#[test]
	fn test_render_bad_group_marker()
	{
		let mut store = MemoryStore::new();
		{
			let app = app();
			let mut state = PersistedState::capture(&app.board);
			state.cards[0].group = Some(7);
			state.completed = vec![7];
			store.set(
				&state_key("2024-06-12"),
				&serde_json::to_string(&state).unwrap()
			).unwrap();
		}
		let area = Rect::new(0, 0, 120, 40);
		let app = App::new(
			puzzle(),
			Box::new(store),
			ApiClient::new("http://127.0.0.1:9"),
			(16, 3),
			area
		).unwrap();
		assert!(app.board.completed().is_empty());
		let mut buf = Buffer::empty(area);
		(&app).render(area, &mut buf);
	}

	/// Saved progress is restored when the application starts.
	#[test]
	fn test_restore()
	{
		let mut store = MemoryStore::new();
		{
			let mut app = app();
			let id = hover(&mut app, 9);
			app.process_key_event(KeyCode::Char('4').into());
			let json = app.store.get(&state_key("2024-06-12")).unwrap().unwrap();
			store.set(&state_key("2024-06-12"), &json).unwrap();
			assert_eq!(app.board.card(id).unwrap().color, Some(Tag::Purple));
		}
		let app = App::new(
			puzzle(),
			Box::new(store),
			ApiClient::new("http://127.0.0.1:9"),
			(16, 3),
			Rect::new(0, 0, 120, 40)
		).unwrap();
		assert_eq!(app.board.card(CardId::new(9)).unwrap().color, Some(Tag::Purple));
	}
}
