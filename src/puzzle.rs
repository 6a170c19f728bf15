//! # Puzzle
//!
//! A puzzle is one day's answer key: a date, which identifies the puzzle, and
//! exactly four groups of exactly four words. The sixteen words are unique
//! and together form the full card set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;

/// The number of groups in a puzzle.
pub const GROUP_COUNT: usize = 4;

/// The number of words in a group.
pub const GROUP_SIZE: usize = 4;

/// The number of cards on a board.
pub const CARD_COUNT: usize = GROUP_COUNT * GROUP_SIZE;

////////////////////////////////////////////////////////////////////////////////
//                                  Puzzle.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A group of the answer key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group
{
	/// The category label that connects the words.
	pub category: String,

	/// The member words.
	pub words: Vec<String>,

	/// The color the group is revealed with.
	pub color: Color
}

/// A puzzle, as published by the puzzle data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle
{
	/// The date of the puzzle, which serves as its identity.
	pub date: String,

	/// The answer key.
	pub groups: Vec<Group>
}

impl Puzzle
{
	/// Check the structural invariants of the puzzle: four groups of four
	/// non-empty words, none repeated anywhere in the puzzle.
	///
	/// # Errors
	///
	/// The first violated invariant, as a [`PuzzleError`].
	pub fn validate(&self) -> Result<(), PuzzleError>
	{
		if self.date.trim().is_empty()
		{
			return Err(PuzzleError::MissingDate)
		}
		if self.groups.len() != GROUP_COUNT
		{
			return Err(PuzzleError::GroupCount(self.groups.len()))
		}
		let mut seen = HashSet::new();
		for group in &self.groups
		{
			if group.words.len() != GROUP_SIZE
			{
				return Err(PuzzleError::GroupSize {
					category: group.category.clone(),
					size: group.words.len()
				})
			}
			for word in &group.words
			{
				let word = word.trim();
				if word.is_empty()
				{
					return Err(PuzzleError::EmptyWord(group.category.clone()))
				}
				if !seen.insert(word.to_lowercase())
				{
					return Err(PuzzleError::DuplicateWord(word.to_string()))
				}
			}
		}
		Ok(())
	}

	/// Flatten the answer key into the card texts, group by group. The
	/// position of a word in this list is the index of its card.
	#[must_use]
	pub fn words(&self) -> Vec<&str>
	{
		self.groups.iter()
			.flat_map(|g| g.words.iter().map(String::as_str))
			.collect()
	}

	/// Find the group whose members are exactly the given words, in any order.
	///
	/// # Arguments
	///
	/// * `words` - The candidate words.
	///
	/// # Returns
	///
	/// The index of the matching group, if any.
	#[must_use]
	pub fn find_group<T: AsRef<str>>(&self, words: &[T]) -> Option<usize>
	{
		if words.len() != GROUP_SIZE
		{
			return None
		}
		self.groups.iter().position(|group| {
			words.iter().all(|w| {
				group.words.iter().any(|g| g.trim() == w.as_ref().trim())
			})
		})
	}
}

/// The complete enumeration of puzzle invariant violations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PuzzleError
{
	#[error("puzzle has no date")]
	MissingDate,

	#[error("expected 4 groups, found {0}")]
	GroupCount(usize),

	#[error("group {category:?} has {size} words, expected 4")]
	GroupSize { category: String, size: usize },

	#[error("group {0:?} contains an empty word")]
	EmptyWord(String),

	#[error("word {0:?} appears more than once")]
	DuplicateWord(String)
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A well-formed puzzle for use by tests throughout the crate.
#[cfg(test)]
pub(crate) fn sample_puzzle() -> Puzzle
{
	let group = |category: &str, words: [&str; 4], color| Group {
		category: category.to_string(),
		words: words.iter().map(|w| w.to_string()).collect(),
		color
	};
	Puzzle {
		date: "2024-06-12".to_string(),
		groups: vec![
			group("Fish", ["BASS", "PIKE", "CARP", "SOLE"], Color::Yellow),
			group("Trees", ["ASH", "ELM", "OAK", "FIR"], Color::Green),
			group("Planets", ["MARS", "VENUS", "EARTH", "SATURN"], Color::Blue),
			group("Dances", ["SALSA", "TANGO", "WALTZ", "RUMBA"], Color::Purple)
		]
	}
}
