//! # Color tagging
//!
//! The player marks tentative groups by tagging cards with one of four colors.
//! The palette is fixed and ordered, and a card carries at most one color at a
//! time. Two interaction styles are supported over the same model: explicit
//! swatches, which toggle, and a cyclic trigger, which steps through the
//! palette and back to untagged.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
//                                  Palette.                                  //
////////////////////////////////////////////////////////////////////////////////

/// A group color. The declaration order is the palette order, which is also
/// the order of the groups in a submission.
#[derive(
	Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
	Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum Color
{
	Yellow,
	Green,
	Blue,
	Purple
}

impl Color
{
	/// The complete palette, in order.
	pub const ALL: [Color; 4] =
		[Color::Yellow, Color::Green, Color::Blue, Color::Purple];

	/// Get the position of the color within the [palette](Self::ALL).
	#[inline]
	#[must_use]
	pub const fn index(self) -> usize
	{
		match self
		{
			Color::Yellow => 0,
			Color::Green => 1,
			Color::Blue => 2,
			Color::Purple => 3
		}
	}

	/// Get the lowercase name of the color, as used on the wire.
	#[inline]
	#[must_use]
	pub const fn name(self) -> &'static str
	{
		match self
		{
			Color::Yellow => "yellow",
			Color::Green => "green",
			Color::Blue => "blue",
			Color::Purple => "purple"
		}
	}
}

impl Display for Color
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "{}", self.name())
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                 Swatches.                                  //
////////////////////////////////////////////////////////////////////////////////

/// One of the five swatches offered on a card: a palette color, or the
/// "none" swatch that removes the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Swatch
{
	Color(Color),
	None
}

/// Apply a swatch to the current tag of a card. Clicking the active color or
/// the "none" swatch clears the tag; clicking any other color replaces it.
///
/// # Arguments
///
/// * `current` - The current tag of the card.
/// * `swatch` - The swatch that was chosen.
///
/// # Returns
///
/// The new tag of the card.
#[must_use]
pub fn select(current: Option<Color>, swatch: Swatch) -> Option<Color>
{
	match swatch
	{
		Swatch::None => None,
		Swatch::Color(color) if current == Some(color) => None,
		Swatch::Color(color) => Some(color)
	}
}

/// Advance a tag one step around the cycle
/// none → yellow → green → blue → purple → none.
#[must_use]
pub fn cycle(current: Option<Color>) -> Option<Color>
{
	match current
	{
		None => Some(Color::Yellow),
		Some(Color::Yellow) => Some(Color::Green),
		Some(Color::Green) => Some(Color::Blue),
		Some(Color::Blue) => Some(Color::Purple),
		Some(Color::Purple) => None
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use super::*;

	/// Five steps around the cycle return every tag to where it started.
	#[test]
	fn test_cycle_period()
	{
		let starts = [
			None,
			Some(Color::Yellow),
			Some(Color::Green),
			Some(Color::Blue),
			Some(Color::Purple)
		];
		for start in starts
		{
			let mut tag = start;
			for _ in 0 .. 5
			{
				tag = cycle(tag);
			}
			assert_eq!(tag, start);
		}
		assert_eq!(cycle(None), Some(Color::Yellow));
		assert_eq!(cycle(Some(Color::Purple)), None);
	}

	/// Test the toggling rules of [`select`].
	#[test]
	fn test_select()
	{
		let cases = [
			(None, Swatch::Color(Color::Blue), Some(Color::Blue)),
			(Some(Color::Blue), Swatch::Color(Color::Blue), None),
			(Some(Color::Blue), Swatch::Color(Color::Green), Some(Color::Green)),
			(Some(Color::Purple), Swatch::None, None),
			(None, Swatch::None, None)
		];
		for (current, swatch, expected) in cases
		{
			assert_eq!(select(current, swatch), expected, "{:?}", swatch);
		}
	}

	/// Colors travel as lowercase names.
	#[test]
	fn test_wire_names()
	{
		assert_eq!(serde_json::to_string(&Color::Purple).unwrap(), "\"purple\"");
		let color: Color = serde_json::from_str("\"green\"").unwrap();
		assert_eq!(color, Color::Green);
		assert!(serde_json::from_str::<Color>("\"orange\"").is_err());
	}
}
