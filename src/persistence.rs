//! # Persistence
//!
//! Saves the board and the notes to a key-value store, namespaced by puzzle
//! date so that distinct puzzles never collide, and restores them at startup.
//! Restoration is best-effort: absent, malformed, or foreign state is
//! reported as an error and leaves the board untouched, so the caller can
//! simply carry on with the fresh layout.
//!
//! Stores are not transactional. Two sessions on the same puzzle overwrite
//! each other's saves, and the last write wins.

use std::{
	collections::HashMap,
	fs,
	io::{self, ErrorKind},
	path::{Path, PathBuf}
};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
	board::{Board, CardId, Placement},
	color::Color,
	geometry::Point
};

////////////////////////////////////////////////////////////////////////////////
//                                  Stores.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A string key-value store.
pub trait Store
{
	/// Read the value under a key.
	///
	/// # Errors
	///
	/// Any failure of the underlying medium. An absent key is not an error.
	fn get(&self, key: &str) -> io::Result<Option<String>>;

	/// Write the value under a key, replacing any previous value.
	///
	/// # Errors
	///
	/// Any failure of the underlying medium.
	fn set(&mut self, key: &str, value: &str) -> io::Result<()>;

	/// Remove a key. Removing an absent key succeeds.
	///
	/// # Errors
	///
	/// Any failure of the underlying medium.
	fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// A store that keeps one file per key in a directory.
#[derive(Clone, Debug)]
pub struct FileStore
{
	dir: PathBuf
}

impl FileStore
{
	/// Open a store in the given directory, creating the directory if
	/// necessary.
	///
	/// # Errors
	///
	/// If the directory cannot be created.
	pub fn open<T: AsRef<Path>>(dir: T) -> io::Result<Self>
	{
		fs::create_dir_all(dir.as_ref())?;
		Ok(Self { dir: dir.as_ref().to_path_buf() })
	}

	fn path(&self, key: &str) -> PathBuf
	{
		self.dir.join(format!("{}.json", key))
	}
}

impl Store for FileStore
{
	fn get(&self, key: &str) -> io::Result<Option<String>>
	{
		match fs::read_to_string(self.path(key))
		{
			Ok(value) => Ok(Some(value)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e)
		}
	}

	fn set(&mut self, key: &str, value: &str) -> io::Result<()>
	{
		fs::write(self.path(key), value)
	}

	fn remove(&mut self, key: &str) -> io::Result<()>
	{
		match fs::remove_file(self.path(key))
		{
			Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
			_ => Ok(())
		}
	}
}

/// A store that lives only in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore
{
	#[inline]
	pub fn new() -> Self { Self::default() }
}

impl Store for MemoryStore
{
	fn get(&self, key: &str) -> io::Result<Option<String>>
	{
		Ok(self.0.get(key).cloned())
	}

	fn set(&mut self, key: &str, value: &str) -> io::Result<()>
	{
		self.0.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&mut self, key: &str) -> io::Result<()>
	{
		self.0.remove(key);
		Ok(())
	}
}

/// The key of the board state for a puzzle.
#[inline]
#[must_use]
pub fn state_key(date: &str) -> String
{
	format!("puzzleState_{}", date)
}

/// The key of the notes for a puzzle.
#[inline]
#[must_use]
pub fn note_key(date: &str) -> String
{
	format!("puzzleNote_{}", date)
}

////////////////////////////////////////////////////////////////////////////////
//                              Stored format.                                //
////////////////////////////////////////////////////////////////////////////////

/// The stored board state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState
{
	/// The identity of the puzzle the state belongs to.
	pub puzzle_date: String,

	pub cards: Vec<PersistedCard>,

	/// The solved groups, in the order they were solved.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub completed: Vec<usize>
}

/// The stored state of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCard
{
	pub id: CardId,

	/// The trimmed card text, kept to detect a changed puzzle.
	pub text: String,

	pub position: PersistedPosition,

	pub color: Option<Color>,

	/// The drop target holding the card, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target: Option<usize>,

	/// The solved group, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group: Option<usize>
}

/// A stored card position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPosition
{
	pub left: i32,
	pub top: i32
}

impl PersistedState
{
	/// Capture the state of a board.
	pub fn capture(board: &Board) -> Self
	{
		let cards = board.cards().iter()
			.map(|card| PersistedCard {
				id: card.id,
				text: card.text.trim().to_string(),
				position: PersistedPosition {
					left: card.position.x,
					top: card.position.y
				},
				color: card.color,
				target: match card.placement
				{
					Placement::Board => None,
					Placement::Target(index) => Some(index)
				},
				group: card.group
			})
			.collect();
		Self {
			puzzle_date: board.date().to_string(),
			cards,
			completed: board.completed().to_vec()
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                             Save and restore.                              //
////////////////////////////////////////////////////////////////////////////////

/// What a successful [`load`] restored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Restored
{
	/// How many cards took their stored position and color.
	pub cards: usize,

	/// How many of those had different text in storage.
	pub mismatched: usize,

	/// Whether notes were found.
	pub notes: bool
}

/// A failure to restore a board.
#[derive(Debug, Error)]
pub enum LoadError
{
	#[error("no saved state for {0}")]
	NotFound(String),

	#[error("saved state is malformed: {0}")]
	Malformed(#[from] serde_json::Error),

	#[error("saved state is for puzzle {stored}, not {current}")]
	PuzzleMismatch { stored: String, current: String },

	#[error("storage failure: {0}")]
	Io(#[from] io::Error)
}

/// Save the board and its notes.
///
/// # Arguments
///
/// * `store` - The target store.
/// * `board` - The board.
///
/// # Errors
///
/// Any failure of the store.
pub fn save(store: &mut dyn Store, board: &Board) -> io::Result<()>
{
	let state = PersistedState::capture(board);
	let json = serde_json::to_string(&state)
		.map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
	store.set(&state_key(board.date()), &json)?;
	store.set(&note_key(board.date()), board.notes())?;
	trace!("saved state for {}", board.date());
	Ok(())
}

/// Restore a board from storage. The stored state is applied only after it
/// has been read, parsed, and matched to the board's puzzle; on error the
/// board is untouched. Cards are matched by id. A card whose stored text
/// differs from its current text is reported but restored all the same.
/// Stored positions are re-clamped to the current board.
///
/// # Arguments
///
/// * `store` - The source store.
/// * `board` - The board to restore.
///
/// # Returns
///
/// A summary of what was restored.
///
/// # Errors
///
/// * [`LoadError::NotFound`] if nothing was saved for the puzzle.
/// * [`LoadError::Malformed`] if the saved state cannot be parsed.
/// * [`LoadError::PuzzleMismatch`] if the saved state names another puzzle.
/// * [`LoadError::Io`] if the store fails.
pub fn load(store: &dyn Store, board: &mut Board) -> Result<Restored, LoadError>
{
	let date = board.date().to_string();
	let json = store.get(&state_key(&date))?
		.ok_or_else(|| LoadError::NotFound(date.clone()))?;
	let state: PersistedState = serde_json::from_str(&json)?;
	if state.puzzle_date != date
	{
		warn!("saved state is for a different puzzle: {}", state.puzzle_date);
		return Err(LoadError::PuzzleMismatch {
			stored: state.puzzle_date,
			current: date
		})
	}
	let target_count = board.targets().len();
	let mut restored = Restored::default();
	for stored in state.cards
	{
		let group = match stored.group
		{
			Some(index) if !is_member(board, index, stored.id) =>
			{
				warn!("ignoring bad group marker on {}: {}", stored.id, index);
				None
			},
			group => group
		};
		let position = board.clamp(Point::new(
			stored.position.left,
			stored.position.top
		));
		let Some(card) = board.card_mut(stored.id)
		else
		{
			debug!("ignoring unknown card: {}", stored.id);
			continue
		};
		if card.text.trim() != stored.text
		{
			warn!("card text mismatch: {} vs {}", card.text.trim(), stored.text);
			restored.mismatched += 1;
		}
		card.position = position;
		card.color = stored.color;
		card.group = group;
		card.placement = match stored.target
		{
			Some(index) if index < target_count => Placement::Target(index),
			_ => Placement::Board
		};
		restored.cards += 1;
	}
	board.rebuild_completed(&state.completed);
	if let Some(notes) = store.get(&note_key(&date))?
	{
		board.set_notes(notes);
		restored.notes = true;
	}
	debug!("restored {} cards for {}", restored.cards, date);
	Ok(restored)
}

/// Check that a card belongs to the given group of the answer key.
fn is_member(board: &Board, group: usize, id: CardId) -> bool
{
	let Some(card) = board.card(id)
	else
	{
		return false
	};
	board.puzzle().groups.get(group)
		.is_some_and(|g| g.words.iter().any(|w| w.trim() == card.text.trim()))
}

/// Forget everything saved for a puzzle.
///
/// # Errors
///
/// Any failure of the store.
pub fn clear(store: &mut dyn Store, date: &str) -> io::Result<()>
{
	store.remove(&state_key(date))?;
	store.remove(&note_key(date))?;
	debug!("cleared saved state for {}", date);
	Ok(())
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use tempfile::tempdir;

	use super::*;
	use crate::{
		board::Action,
		color::Swatch,
		geometry::BoardGeometry,
		layout::grid_position,
		puzzle::sample_puzzle
	};

	fn board() -> Board
	{
		Board::new(sample_puzzle(), BoardGeometry::default()).unwrap()
	}

	/// Drag a card by its corner to a new board offset.
	fn drag(board: &mut Board, id: CardId, to: Point)
	{
		let from = board.card_bounds(id).unwrap().origin();
		board.apply(Action::PointerDown(from));
		board.apply(Action::PointerMove(to));
		board.apply(Action::PointerUp(to));
	}

	fn positions(board: &Board) -> Vec<(Point, Option<Color>)>
	{
		board.cards().iter().map(|c| (c.position, c.color)).collect()
	}

	#[test]
	fn test_round_trip()
	{
		let mut store = MemoryStore::new();
		let mut original = board();
		drag(&mut original, CardId::new(3), Point::new(30, 14));
		drag(&mut original, CardId::new(11), Point::new(0, 0));
		original.apply(Action::CycleColor(CardId::new(3)));
		original.apply(Action::SelectSwatch {
			card: CardId::new(12),
			swatch: Swatch::Color(Color::Purple)
		});
		original.apply(Action::SetNotes("fish? trees!".to_string()));
		save(&mut store, &original).unwrap();

		let mut restored = board();
		let summary = load(&store, &mut restored).unwrap();
		assert_eq!(
			summary,
			Restored { cards: 16, mismatched: 0, notes: true }
		);
		assert_eq!(positions(&restored), positions(&original));
		assert_eq!(restored.notes(), "fish? trees!");
	}

	#[test]
	fn test_not_found()
	{
		let store = MemoryStore::new();
		let mut board = board();
		assert!(matches!(load(&store, &mut board), Err(LoadError::NotFound(_))));
	}

	/// State saved for another day is rejected and the grid stays put.
	#[test]
	fn test_puzzle_mismatch()
	{
		let mut store = MemoryStore::new();
		let mut other = board();
		drag(&mut other, CardId::new(0), Point::new(40, 10));
		let mut state = PersistedState::capture(&other);
		state.puzzle_date = "2024-06-11".to_string();
		store.set(
			&state_key("2024-06-12"),
			&serde_json::to_string(&state).unwrap()
		).unwrap();

		let mut board = board();
		assert!(matches!(
			load(&store, &mut board),
			Err(LoadError::PuzzleMismatch { .. })
		));
		let geometry = *board.geometry();
		for (index, card) in board.cards().iter().enumerate()
		{
			assert_eq!(card.position, grid_position(index, &geometry));
		}
	}

	#[test]
	fn test_malformed()
	{
		let mut store = MemoryStore::new();
		let mut board = board();
		for junk in ["", "{", "[1, 2]", r#"{"puzzleDate": 5, "cards": []}"#]
		{
			store.set(&state_key(board.date()), junk).unwrap();
			assert!(matches!(
				load(&store, &mut board),
				Err(LoadError::Malformed(_))
			), "{:?}", junk);
		}
		// A bad card id spoils the whole record.
		let mut state = PersistedState::capture(&board);
		let mut json = serde_json::to_value(&state).unwrap();
		json["cards"][0]["id"] = "tile-0".into();
		store.set(&state_key(board.date()), &json.to_string()).unwrap();
		assert!(matches!(load(&store, &mut board), Err(LoadError::Malformed(_))));
		// Unknown ids are merely skipped.
		state.cards[0].id = CardId::new(99);
		store.set(
			&state_key(board.date()),
			&serde_json::to_string(&state).unwrap()
		).unwrap();
		assert_eq!(load(&store, &mut board).unwrap().cards, 15);
	}

	/// Group markers that do not fit the answer key are dropped, so the
	/// solved groups only ever name real groups.
	#[test]
	fn test_bad_group_marker()
	{
		let mut store = MemoryStore::new();
		let mut board = board();
		let mut state = PersistedState::capture(&board);
		state.cards[0].group = Some(7);
		// ASH is a tree, not a fish.
		state.cards[4].group = Some(0);
		state.cards[5].group = Some(1);
		state.completed = vec![7, 0, 1];
		store.set(
			&state_key(board.date()),
			&serde_json::to_string(&state).unwrap()
		).unwrap();
		assert_eq!(load(&store, &mut board).unwrap().cards, 16);
		assert_eq!(board.card(CardId::new(0)).unwrap().group, None);
		assert_eq!(board.card(CardId::new(4)).unwrap().group, None);
		assert_eq!(board.card(CardId::new(5)).unwrap().group, Some(1));
		assert_eq!(board.completed(), &[1]);
		assert!(board.completed().iter()
			.all(|&index| index < board.puzzle().groups.len()));
	}

	/// Solved groups come back in the order they were solved.
	#[test]
	fn test_completed_order()
	{
		let mut store = MemoryStore::new();
		let mut original = board();
		for group in [[8, 9, 10, 11], [0, 1, 2, 3]]
		{
			for index in group
			{
				original.apply(Action::ToggleSelect(CardId::new(index)));
			}
			original.apply(Action::CheckSelection);
		}
		assert_eq!(original.completed(), &[2, 0]);
		save(&mut store, &original).unwrap();

		let mut board = board();
		load(&store, &mut board).unwrap();
		assert_eq!(board.completed(), &[2, 0]);
	}

	/// Changed text is reported, but position and color still apply.
	#[test]
	fn test_text_mismatch()
	{
		let mut store = MemoryStore::new();
		let mut original = board();
		drag(&mut original, CardId::new(1), Point::new(33, 12));
		original.apply(Action::CycleColor(CardId::new(1)));
		let mut state = PersistedState::capture(&original);
		state.cards[1].text = "TROUT".to_string();
		store.set(
			&state_key(original.date()),
			&serde_json::to_string(&state).unwrap()
		).unwrap();

		let mut board = board();
		let summary = load(&store, &mut board).unwrap();
		assert_eq!(summary.mismatched, 1);
		assert!(!summary.notes);
		let card = board.card(CardId::new(1)).unwrap();
		assert_eq!(card.position, Point::new(33, 12));
		assert_eq!(card.color, Some(Color::Yellow));
	}

	/// Solved groups and drop-target placement survive a round trip.
	#[test]
	fn test_groups_and_targets()
	{
		let mut store = MemoryStore::new();
		let targets = vec![crate::geometry::Rect::new(0, 25, 20, 6)];
		let mut original = board();
		original.apply(Action::Resize {
			geometry: *original.geometry(),
			targets: targets.clone()
		});
		for index in [0, 1, 2, 3]
		{
			original.apply(Action::ToggleSelect(CardId::new(index)));
		}
		original.apply(Action::CheckSelection);
		drag(&mut original, CardId::new(9), Point::new(5, 27));
		save(&mut store, &original).unwrap();

		let mut board = board();
		board.apply(Action::Resize {
			geometry: *board.geometry(),
			targets
		});
		load(&store, &mut board).unwrap();
		assert_eq!(board.completed(), &[0]);
		assert_eq!(
			board.card(CardId::new(9)).unwrap().placement,
			Placement::Target(0)
		);
	}

	#[test]
	fn test_file_store()
	{
		let dir = tempdir().unwrap();
		let mut store = FileStore::open(dir.path().join("state")).unwrap();
		let mut original = board();
		original.apply(Action::CycleColor(CardId::new(7)));
		save(&mut store, &original).unwrap();
		assert!(dir.path().join("state/puzzleState_2024-06-12.json").exists());

		// Reopening the same directory sees the same state.
		let store = FileStore::open(dir.path().join("state")).unwrap();
		let mut board = board();
		load(&store, &mut board).unwrap();
		assert_eq!(positions(&board), positions(&original));

		let mut store = store;
		clear(&mut store, "2024-06-12").unwrap();
		clear(&mut store, "2024-06-12").unwrap();
		assert!(matches!(load(&store, &mut board), Err(LoadError::NotFound(_))));
	}
}
