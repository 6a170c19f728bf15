//! # Group validation
//!
//! Before anything is sent to the server, the cards are partitioned by color
//! tag. A submission exists only when every color tags exactly four cards;
//! anything else is rejected locally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
	board::Card,
	color::Color,
	puzzle::{GROUP_COUNT, GROUP_SIZE}
};

/// A validated submission: one list of card texts per color, in palette order
/// (yellow, green, blue, purple).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(pub [Vec<String>; GROUP_COUNT]);

/// The grouping is not a complete four-by-four partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error(
	"Please assign all 16 cards to groups with exactly 4 cards in each color \
	group (yellow {}, green {}, blue {}, purple {}).",
	.counts[0], .counts[1], .counts[2], .counts[3]
)]
pub struct ValidationError
{
	/// How many cards carry each color, in palette order.
	pub counts: [usize; GROUP_COUNT]
}

/// Partition the cards by color tag, in palette order. Untagged cards belong
/// to no partition.
///
/// # Arguments
///
/// * `cards` - The cards to partition.
///
/// # Returns
///
/// The tagged cards, one list per color, each in card order.
#[must_use]
pub fn partition(cards: &[Card]) -> [Vec<&Card>; GROUP_COUNT]
{
	let mut partitions: [Vec<&Card>; GROUP_COUNT] = Default::default();
	for card in cards
	{
		if let Some(color) = card.color
		{
			partitions[color.index()].push(card);
		}
	}
	partitions
}

/// Validate the current grouping and build the submission.
///
/// # Errors
///
/// [`ValidationError`] unless each of the four colors tags exactly
/// [`GROUP_SIZE`] cards.
pub fn validate(cards: &[Card]) -> Result<Submission, ValidationError>
{
	let partitions = partition(cards);
	let mut counts = [0; GROUP_COUNT];
	for (count, partition) in counts.iter_mut().zip(&partitions)
	{
		*count = partition.len();
	}
	if counts.iter().any(|&count| count != GROUP_SIZE)
	{
		return Err(ValidationError { counts })
	}
	let words = Color::ALL.map(|color| {
		partitions[color.index()].iter()
			.map(|card| card.text.trim().to_string())
			.collect::<Vec<_>>()
	});
	Ok(Submission(words))
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use super::*;
	use crate::{board::CardId, puzzle::CARD_COUNT};

	/// Build 16 cards tagged according to the given color counts, in palette
	/// order; any remainder is left untagged.
	fn tagged(counts: [usize; 4]) -> Vec<Card>
	{
		let mut tags = Vec::new();
		for (color, &count) in Color::ALL.iter().zip(&counts)
		{
			tags.extend(std::iter::repeat(Some(*color)).take(count));
		}
		tags.resize(CARD_COUNT, None);
		tags.into_iter().enumerate()
			.map(|(i, color)| {
				let mut card = Card::new(CardId::new(i as u8), format!("W{}", i));
				card.color = color;
				card
			})
			.collect()
	}

	#[test]
	fn test_accept()
	{
		let submission = validate(&tagged([4, 4, 4, 4])).unwrap();
		assert_eq!(submission.0[0], vec!["W0", "W1", "W2", "W3"]);
		assert_eq!(submission.0[3], vec!["W12", "W13", "W14", "W15"]);
	}

	#[test]
	fn test_reject()
	{
		assert_eq!(
			validate(&tagged([3, 5, 4, 4])),
			Err(ValidationError { counts: [3, 5, 4, 4] })
		);
		assert_eq!(
			validate(&tagged([4, 4, 4, 0])),
			Err(ValidationError { counts: [4, 4, 4, 0] })
		);
		assert!(validate(&tagged([0, 0, 0, 0])).is_err());
	}

	/// The submission serializes as a bare array of four arrays.
	#[test]
	fn test_serialize()
	{
		let submission = validate(&tagged([4, 4, 4, 4])).unwrap();
		let json = serde_json::to_value(&submission).unwrap();
		assert_eq!(json.as_array().map(Vec::len), Some(4));
		assert_eq!(json[1][0], "W4");
	}

	#[test]
	fn test_message()
	{
		let error = ValidationError { counts: [3, 5, 4, 4] };
		assert!(error.to_string().starts_with("Please assign all 16 cards"));
		assert!(error.to_string().contains("yellow 3, green 5"));
	}
}
