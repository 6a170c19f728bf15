//! # Board
//!
//! The board is the view-model of a single puzzle: the sixteen cards with
//! their positions, color tags, and group completion, plus the selection, the
//! notes, and the latest hint and alert. It is the single source of truth for
//! rendering. It changes only through [`Board::apply`], which consumes an
//! [`Action`] and answers the [`Effect`]s the caller must carry out, so every
//! transition can be exercised without a terminal.

use std::fmt::{self, Display, Formatter};

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
	client::HintLevel,
	color::{self, Color, Swatch},
	drag::{DragController, Release},
	geometry::{BoardGeometry, Point, Rect},
	layout,
	puzzle::{Puzzle, PuzzleError, GROUP_SIZE},
	validator::{self, Submission}
};

/// The most cards that may be selected at once.
pub const MAX_SELECTION: usize = GROUP_SIZE;

/// The alert shown when a checked selection is not a group.
pub const WRONG_GROUP: &str = "Not a valid group. Try again!";

/// The alert shown when the server accepts a submission.
pub const CORRECT: &str = "Congratulations! Your answer is correct!";

/// The alert shown when the server rejects a submission.
pub const INCORRECT: &str = "Sorry, that's not correct. Try again!";

////////////////////////////////////////////////////////////////////////////////
//                                  Cards.                                    //
////////////////////////////////////////////////////////////////////////////////

/// The stable identity of a card: its index in the flattened answer key. On
/// the wire and in storage it reads `card-<index>`.
#[derive(
	Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
	Serialize, Deserialize
)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(u8);

impl CardId
{
	#[inline]
	#[must_use]
	pub const fn new(index: u8) -> Self
	{
		Self(index)
	}

	/// The index of the card within the board.
	#[inline]
	#[must_use]
	pub const fn index(self) -> usize
	{
		self.0 as usize
	}
}

impl Display for CardId
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "card-{}", self.0)
	}
}

impl From<CardId> for String
{
	fn from(id: CardId) -> Self
	{
		id.to_string()
	}
}

impl TryFrom<String> for CardId
{
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error>
	{
		value.strip_prefix("card-")
			.and_then(|index| index.parse().ok())
			.map(CardId)
			.ok_or_else(|| format!("malformed card id: {:?}", value))
	}
}

/// Where a card currently lives.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize
)]
pub enum Placement
{
	/// Free on the board, at the card's position.
	#[default]
	Board,

	/// Parented to the drop target with the given index.
	Target(usize)
}

/// A single draggable word tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card
{
	/// The stable identity of the card.
	pub id: CardId,

	/// The word on the card.
	pub text: String,

	/// The offset of the card's top-left corner from the board origin. Zero
	/// while the card is parented to a drop target.
	pub position: Point,

	/// The color tag, if any.
	pub color: Option<Color>,

	/// The index of the answer-key group, once the player has solved it.
	pub group: Option<usize>,

	/// Where the card lives.
	pub placement: Placement
}

impl Card
{
	/// Create an untagged card at the board origin.
	pub fn new(id: CardId, text: String) -> Self
	{
		Self {
			id,
			text,
			position: Point::default(),
			color: None,
			group: None,
			placement: Placement::Board
		}
	}

	/// Check whether the card belongs to a solved group.
	#[inline]
	#[must_use]
	pub fn is_completed(&self) -> bool
	{
		self.group.is_some()
	}
}

////////////////////////////////////////////////////////////////////////////////
//                            Actions and effects.                            //
////////////////////////////////////////////////////////////////////////////////

/// An input to the board. Pointer coordinates are surface coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action
{
	/// The primary pointer was pressed.
	PointerDown(Point),

	/// The primary pointer moved while pressed.
	PointerMove(Point),

	/// The primary pointer was released.
	PointerUp(Point),

	/// A new frame is about to be drawn.
	Frame,

	/// The drawing surface changed shape.
	Resize { geometry: BoardGeometry, targets: Vec<Rect> },

	/// A swatch was chosen for a card.
	SelectSwatch { card: CardId, swatch: Swatch },

	/// Step the color of a card around the palette cycle.
	CycleColor(CardId),

	/// Add a card to, or remove it from, the selection.
	ToggleSelect(CardId),

	/// Tag every selected card with a color.
	ColorSelection(Color),

	/// Empty the selection.
	ClearSelection,

	/// Check the selection against the answer key.
	CheckSelection,

	/// Lay the cards out in a 4×4 grid.
	ArrangeGrid,

	/// Scatter the cards at random, reproducibly from the seed.
	Shuffle { seed: u64 },

	/// Type a character into the notes.
	InsertNote(char),

	/// Delete the last character of the notes.
	DeleteNote,

	/// Replace the notes wholesale.
	SetNotes(String),

	/// Finish editing the notes.
	CommitNotes,

	/// Move to the next hint level.
	CycleHintLevel,

	/// Ask for a hint at the current level.
	RequestHint,

	/// A hint arrived from the server.
	HintReceived(String),

	/// Validate the grouping and submit it.
	Submit,

	/// The server judged a submission.
	SubmissionChecked(bool),

	/// Dismiss the current alert.
	DismissAlert,

	/// Discard all progress on this puzzle.
	Reset
}

/// Work the owner of the board must carry out after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect
{
	/// Write the board and the notes to storage.
	Persist,

	/// Remove the board and the notes from storage.
	Forget,

	/// Fetch a hint from the server.
	RequestHint { date: String, level: HintLevel },

	/// Send a submission to the server.
	Submit { date: String, submission: Submission }
}

////////////////////////////////////////////////////////////////////////////////
//                                  Board.                                    //
////////////////////////////////////////////////////////////////////////////////

/// The view-model of one puzzle.
#[derive(Clone, Debug)]
pub struct Board
{
	/// The answer key.
	puzzle: Puzzle,

	/// The drag surface.
	geometry: BoardGeometry,

	/// The drop targets, as surface rectangles.
	targets: Vec<Rect>,

	/// The cards, in card order. The index of a card is its id.
	cards: Vec<Card>,

	/// The selected cards, in selection order.
	selection: Vec<CardId>,

	/// The color most recently applied to the selection.
	current_color: Option<Color>,

	/// The solved groups, in the order they were solved.
	completed: Vec<usize>,

	/// The free-text notes.
	notes: String,

	/// The level of the next hint request.
	hint_level: HintLevel,

	/// The most recent hint.
	hint: Option<String>,

	/// A message awaiting acknowledgement.
	alert: Option<String>,

	/// The drag in progress.
	drag: DragController
}

// Public interface.
impl Board
{
	/// Create a board for the given puzzle, with the cards in a grid.
	///
	/// # Arguments
	///
	/// * `puzzle` - The puzzle.
	/// * `geometry` - The initial board geometry.
	///
	/// # Errors
	///
	/// [`PuzzleError`] if the puzzle is malformed.
	pub fn new(puzzle: Puzzle, geometry: BoardGeometry) -> Result<Self, PuzzleError>
	{
		puzzle.validate()?;
		let mut cards = puzzle.words().into_iter().enumerate()
			.map(|(index, word)| {
				Card::new(CardId::new(index as u8), word.trim().to_string())
			})
			.collect::<Vec<_>>();
		layout::arrange_grid(&mut cards, &geometry);
		debug!("new board for {}", puzzle.date);
		Ok(Self {
			puzzle,
			geometry,
			targets: Vec::new(),
			cards,
			selection: Vec::new(),
			current_color: None,
			completed: Vec::new(),
			notes: String::new(),
			hint_level: HintLevel::default(),
			hint: None,
			alert: None,
			drag: DragController::default()
		})
	}

	/// The puzzle identity.
	#[inline]
	#[must_use]
	pub fn date(&self) -> &str
	{
		&self.puzzle.date
	}

	#[inline]
	#[must_use]
	pub fn puzzle(&self) -> &Puzzle
	{
		&self.puzzle
	}

	#[inline]
	#[must_use]
	pub fn geometry(&self) -> &BoardGeometry
	{
		&self.geometry
	}

	#[inline]
	#[must_use]
	pub fn targets(&self) -> &[Rect]
	{
		&self.targets
	}

	#[inline]
	#[must_use]
	pub fn cards(&self) -> &[Card]
	{
		&self.cards
	}

	/// Get a card by id.
	#[inline]
	#[must_use]
	pub fn card(&self, id: CardId) -> Option<&Card>
	{
		self.cards.get(id.index())
	}

	#[inline]
	#[must_use]
	pub fn selection(&self) -> &[CardId]
	{
		&self.selection
	}

	#[inline]
	#[must_use]
	pub fn is_selected(&self, id: CardId) -> bool
	{
		self.selection.contains(&id)
	}

	#[inline]
	#[must_use]
	pub fn current_color(&self) -> Option<Color>
	{
		self.current_color
	}

	/// The solved groups, in the order they were solved, as indices into the
	/// answer key.
	#[inline]
	#[must_use]
	pub fn completed(&self) -> &[usize]
	{
		&self.completed
	}

	#[inline]
	#[must_use]
	pub fn notes(&self) -> &str
	{
		&self.notes
	}

	#[inline]
	#[must_use]
	pub fn hint_level(&self) -> HintLevel
	{
		self.hint_level
	}

	#[inline]
	#[must_use]
	pub fn hint(&self) -> Option<&str>
	{
		self.hint.as_deref()
	}

	#[inline]
	#[must_use]
	pub fn alert(&self) -> Option<&str>
	{
		self.alert.as_deref()
	}

	/// The card being dragged, if any. It should be drawn on top.
	#[inline]
	#[must_use]
	pub fn dragged(&self) -> Option<CardId>
	{
		self.drag.card()
	}

	/// Compute the surface rectangle of a card. Cards on the board occupy a
	/// full card rectangle at their position; cards parented to a drop target
	/// are stacked one row each inside the target's border.
	///
	/// # Arguments
	///
	/// * `id` - The card.
	///
	/// # Returns
	///
	/// The surface rectangle, or `None` for an unknown card.
	#[must_use]
	pub fn card_bounds(&self, id: CardId) -> Option<Rect>
	{
		let card = self.card(id)?;
		match card.placement
		{
			Placement::Board => Some(self.geometry.card_bounds(card.position)),
			Placement::Target(index) =>
			{
				let target = self.targets.get(index)?;
				let row = self.cards.iter()
					.take_while(|c| c.id != id)
					.filter(|c| c.placement == card.placement)
					.count() as i32;
				Some(Rect::new(
					target.x + 1,
					target.y + 1 + row,
					(target.width - 2).max(0),
					1
				))
			}
		}
	}

	/// Find the topmost card under a surface point. The dragged card is on
	/// top, followed by the cards in reverse card order.
	#[must_use]
	pub fn card_at(&self, point: Point) -> Option<CardId>
	{
		let hit = |id: CardId| {
			self.card_bounds(id).map(|r| r.contains(point)).unwrap_or(false)
		};
		if let Some(id) = self.dragged().filter(|&id| hit(id))
		{
			return Some(id)
		}
		self.cards.iter().rev().map(|c| c.id).find(|&id| hit(id))
	}

	/// Apply an action.
	///
	/// # Arguments
	///
	/// * `action` - The action.
	///
	/// # Returns
	///
	/// The effects the caller must carry out, in order.
	pub fn apply(&mut self, action: Action) -> Vec<Effect>
	{
		trace!("apply: {:?}", action);
		match action
		{
			Action::PointerDown(point) => self.pointer_down(point),
			Action::PointerMove(point) =>
			{
				self.drag.update(point);
				vec![]
			},
			Action::PointerUp(point) => self.pointer_up(point),
			Action::Frame => self.frame(),
			Action::Resize { geometry, targets } =>
				self.resize(geometry, targets),
			Action::SelectSwatch { card, swatch } =>
				self.recolor(card, |current| color::select(current, swatch)),
			Action::CycleColor(card) => self.recolor(card, color::cycle),
			Action::ToggleSelect(card) => self.toggle_select(card),
			Action::ColorSelection(color) => self.color_selection(color),
			Action::ClearSelection =>
			{
				self.clear_selection();
				vec![]
			},
			Action::CheckSelection => self.check_selection(),
			Action::ArrangeGrid =>
			{
				self.drag.cancel();
				layout::arrange_grid(&mut self.cards, &self.geometry);
				vec![Effect::Persist]
			},
			Action::Shuffle { seed } =>
			{
				self.drag.cancel();
				let mut rng = StdRng::seed_from_u64(seed);
				layout::shuffle(&mut self.cards, &self.geometry, &mut rng);
				vec![Effect::Persist]
			},
			Action::InsertNote(c) =>
			{
				self.notes.push(c);
				vec![]
			},
			Action::DeleteNote =>
			{
				self.notes.pop();
				vec![]
			},
			Action::SetNotes(notes) =>
			{
				self.notes = notes;
				vec![]
			},
			Action::CommitNotes => vec![Effect::Persist],
			Action::CycleHintLevel =>
			{
				self.hint_level = self.hint_level.next();
				vec![]
			},
			Action::RequestHint => vec![Effect::RequestHint {
				date: self.puzzle.date.clone(),
				level: self.hint_level
			}],
			Action::HintReceived(hint) =>
			{
				self.hint = Some(hint);
				vec![]
			},
			Action::Submit => self.submit(),
			Action::SubmissionChecked(correct) =>
			{
				let message = if correct { CORRECT } else { INCORRECT };
				self.alert = Some(message.to_string());
				vec![]
			},
			Action::DismissAlert =>
			{
				self.alert = None;
				vec![]
			},
			Action::Reset => self.reset()
		}
	}
}

// Crate-internal access for the persistence adapter.
impl Board
{
	/// Get a mutable card by id.
	pub(crate) fn card_mut(&mut self, id: CardId) -> Option<&mut Card>
	{
		self.cards.get_mut(id.index())
	}

	/// Clamp a board offset into the current geometry.
	pub(crate) fn clamp(&self, position: Point) -> Point
	{
		self.geometry.clamp(position)
	}

	/// Rebuild the list of solved groups from the card markers, after the
	/// markers were restored wholesale. Groups keep their place in `order`;
	/// marked groups missing from it follow in answer-key order.
	pub(crate) fn rebuild_completed(&mut self, order: &[usize])
	{
		let mut marked = self.cards.iter()
			.filter_map(|c| c.group)
			.collect::<Vec<_>>();
		marked.sort_unstable();
		marked.dedup();
		let mut completed = Vec::with_capacity(marked.len());
		for &group in order.iter().chain(marked.iter())
		{
			if marked.contains(&group) && !completed.contains(&group)
			{
				completed.push(group);
			}
		}
		self.completed = completed;
	}

	pub(crate) fn set_notes(&mut self, notes: String)
	{
		self.notes = notes;
	}
}

// Private implementation details.
impl Board
{
	fn pointer_down(&mut self, point: Point) -> Vec<Effect>
	{
		let Some(id) = self.card_at(point)
		else
		{
			return vec![]
		};
		let Some(bounds) = self.card_bounds(id)
		else
		{
			return vec![]
		};
		if self.cards[id.index()].is_completed()
		{
			return vec![]
		}
		self.drag.begin(id, point, bounds.origin());
		vec![]
	}

	fn frame(&mut self) -> Vec<Effect>
	{
		if let Some((id, position)) = self.drag.flush(&self.geometry)
		{
			if let Some(card) = self.card_mut(id)
			{
				card.placement = Placement::Board;
				card.position = position;
			}
		}
		vec![]
	}

	fn pointer_up(&mut self, point: Point) -> Vec<Effect>
	{
		match self.drag.release(point, &self.geometry, &self.targets)
		{
			None => vec![],
			Some(Release::Click(id)) => self.toggle_select(id),
			Some(Release::Target(id, index)) =>
			{
				if let Some(card) = self.card_mut(id)
				{
					card.placement = Placement::Target(index);
					card.position = Point::default();
				}
				vec![Effect::Persist]
			},
			Some(Release::Board(id, position)) =>
			{
				if let Some(card) = self.card_mut(id)
				{
					card.placement = Placement::Board;
					card.position = position;
				}
				vec![Effect::Persist]
			}
		}
	}

	fn resize(&mut self, geometry: BoardGeometry, targets: Vec<Rect>)
		-> Vec<Effect>
	{
		let target_count = targets.len();
		self.geometry = geometry;
		self.targets = targets;
		for card in &mut self.cards
		{
			card.position = geometry.clamp(card.position);
			if matches!(card.placement, Placement::Target(i) if i >= target_count)
			{
				card.placement = Placement::Board;
			}
		}
		vec![]
	}

	/// Recolor a single card. Solved cards keep their group color.
	fn recolor<F>(&mut self, id: CardId, f: F) -> Vec<Effect>
		where F: FnOnce(Option<Color>) -> Option<Color>
	{
		match self.card_mut(id)
		{
			Some(card) if !card.is_completed() =>
			{
				card.color = f(card.color);
				vec![Effect::Persist]
			},
			_ => vec![]
		}
	}

	fn toggle_select(&mut self, id: CardId) -> Vec<Effect>
	{
		if let Some(index) = self.selection.iter().position(|&s| s == id)
		{
			self.selection.remove(index);
		}
		else if self.selection.len() < MAX_SELECTION
			&& self.card(id).map(|c| !c.is_completed()).unwrap_or(false)
		{
			self.selection.push(id);
		}
		vec![]
	}

	fn color_selection(&mut self, color: Color) -> Vec<Effect>
	{
		if self.selection.is_empty()
		{
			return vec![]
		}
		for id in self.selection.clone()
		{
			if let Some(card) = self.card_mut(id)
			{
				card.color = Some(color);
			}
		}
		self.current_color = Some(color);
		vec![Effect::Persist]
	}

	fn clear_selection(&mut self)
	{
		self.selection.clear();
		self.current_color = None;
	}

	fn check_selection(&mut self) -> Vec<Effect>
	{
		if self.selection.len() != MAX_SELECTION
		{
			return vec![]
		}
		let words = self.selection.iter()
			.filter_map(|&id| self.card(id).map(|c| c.text.clone()))
			.collect::<Vec<_>>();
		match self.puzzle.find_group(&words)
		{
			Some(group) =>
			{
				let color = self.puzzle.groups[group].color;
				for id in self.selection.clone()
				{
					if let Some(card) = self.card_mut(id)
					{
						card.group = Some(group);
						card.color = Some(color);
					}
				}
				self.completed.push(group);
				self.clear_selection();
				debug!("solved group: {}", self.puzzle.groups[group].category);
				vec![Effect::Persist]
			},
			None =>
			{
				self.alert = Some(WRONG_GROUP.to_string());
				self.clear_selection();
				vec![]
			}
		}
	}

	fn submit(&mut self) -> Vec<Effect>
	{
		match validator::validate(&self.cards)
		{
			Ok(submission) => vec![Effect::Submit {
				date: self.puzzle.date.clone(),
				submission
			}],
			Err(e) =>
			{
				debug!("rejected submission: {:?}", e.counts);
				self.alert = Some(e.to_string());
				vec![]
			}
		}
	}

	fn reset(&mut self) -> Vec<Effect>
	{
		self.drag.cancel();
		for card in &mut self.cards
		{
			card.color = None;
			card.group = None;
		}
		layout::arrange_grid(&mut self.cards, &self.geometry);
		self.clear_selection();
		self.completed.clear();
		self.notes.clear();
		self.hint = None;
		self.alert = None;
		vec![Effect::Forget]
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
