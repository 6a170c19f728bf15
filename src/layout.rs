//! # Layout
//!
//! Whole-board layouts. Both overwrite the position of every card and return
//! every card to the board, out of any drop target.

use log::debug;
use rand::Rng;

use crate::{
	board::{Card, Placement},
	geometry::{BoardGeometry, Point},
	puzzle::GROUP_SIZE
};

/// The gap between the top of the board and the first grid row.
pub const GRID_TOP: i32 = 1;

/// The vertical gap between grid rows.
pub const GRID_ROW_GAP: i32 = 1;

/// The margin kept clear on every side of the board by [`shuffle`].
pub const SHUFFLE_INSET: i32 = 1;

/// Compute the grid slot of the card at the given index. Columns are centered
/// in quarters of the board width; rows are a card height plus a gap apart.
///
/// # Arguments
///
/// * `index` - The index of the card.
/// * `geometry` - The board geometry.
///
/// # Returns
///
/// The clamped board offset of the slot.
#[must_use]
pub fn grid_position(index: usize, geometry: &BoardGeometry) -> Point
{
	let row = (index / GROUP_SIZE) as i32;
	let column = (index % GROUP_SIZE) as i32;
	let x = geometry.width * column / 4 + geometry.width / 8
		- geometry.card_width / 2;
	let y = row * (geometry.card_height + GRID_ROW_GAP) + GRID_TOP;
	geometry.clamp(Point::new(x, y))
}

/// Arrange the cards in a 4×4 grid, in card order.
pub fn arrange_grid(cards: &mut [Card], geometry: &BoardGeometry)
{
	for (index, card) in cards.iter_mut().enumerate()
	{
		card.position = grid_position(index, geometry);
		card.placement = Placement::Board;
	}
	debug!("arranged {} cards in a grid", cards.len());
}

/// Scatter the cards uniformly at random over the board, keeping
/// [`SHUFFLE_INSET`] clear around the edges where the board allows it.
///
/// # Arguments
///
/// * `cards` - The cards to scatter.
/// * `geometry` - The board geometry.
/// * `rng` - The source of randomness.
pub fn shuffle<R: Rng>(cards: &mut [Card], geometry: &BoardGeometry, rng: &mut R)
{
	let usable_width = (geometry.max_x() - 2 * SHUFFLE_INSET).max(0);
	let usable_height = (geometry.max_y() - 2 * SHUFFLE_INSET).max(0);
	for card in cards.iter_mut()
	{
		let x = rng.random_range(0 ..= usable_width) + SHUFFLE_INSET;
		let y = rng.random_range(0 ..= usable_height) + SHUFFLE_INSET;
		card.position = geometry.clamp(Point::new(x, y));
		card.placement = Placement::Board;
	}
	debug!("shuffled {} cards", cards.len());
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use std::collections::HashSet;

	use rand::{rngs::StdRng, SeedableRng};

	use super::*;
	use crate::{board::CardId, puzzle::CARD_COUNT};

	fn cards() -> Vec<Card>
	{
		(0 .. CARD_COUNT)
			.map(|i| Card::new(CardId::new(i as u8), format!("W{}", i)))
			.collect()
	}

	/// The grid is 4×4, with distinct, pairwise non-overlapping slots.
	#[test]
	fn test_grid()
	{
		let geometry = BoardGeometry::default();
		let mut cards = cards();
		cards[5].placement = Placement::Target(2);
		arrange_grid(&mut cards, &geometry);
		let positions =
			cards.iter().map(|c| c.position).collect::<HashSet<_>>();
		assert_eq!(positions.len(), CARD_COUNT);
		let columns = cards.iter().map(|c| c.position.x).collect::<HashSet<_>>();
		let rows = cards.iter().map(|c| c.position.y).collect::<HashSet<_>>();
		assert_eq!(columns.len(), 4);
		assert_eq!(rows.len(), 4);
		for (i, a) in cards.iter().enumerate()
		{
			assert_eq!(a.placement, Placement::Board);
			assert!(geometry.is_in_bounds(a.position));
			for b in &cards[i + 1 ..]
			{
				assert!(
					!geometry.card_bounds(a.position)
						.intersects(&geometry.card_bounds(b.position)),
					"{} overlaps {}",
					a.text,
					b.text
				);
			}
		}
		assert_eq!(cards[0].position, Point::new(2, GRID_TOP));
		assert_eq!(cards[7].position, Point::new(62, 5));
	}

	#[test]
	fn test_shuffle()
	{
		let geometry = BoardGeometry::default();
		let mut rng = StdRng::seed_from_u64(7);
		let mut cards = cards();
		for _ in 0 .. 50
		{
			shuffle(&mut cards, &geometry, &mut rng);
			for card in &cards
			{
				assert!(geometry.is_in_bounds(card.position));
				assert!(card.position.x >= SHUFFLE_INSET);
				assert!(card.position.y >= SHUFFLE_INSET);
			}
		}
		// Even a board too small for the inset keeps every card in bounds.
		let cramped = BoardGeometry { width: 17, height: 3, ..geometry };
		shuffle(&mut cards, &cramped, &mut rng);
		assert!(cards.iter().all(|c| cramped.is_in_bounds(c.position)));
	}
}
