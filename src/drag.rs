//! # Drag controller
//!
//! Translates pointer presses, moves, and releases into card positions. A
//! press over a card captures the pointer's offset from the card's top-left
//! corner; thereafter the card follows the pointer, clamped to the board.
//! Moves are coalesced so that at most one position write happens per frame.
//! A release over a drop target reparents the card into that target; any
//! other release leaves the card on the board, still clamped.

use log::trace;

use crate::{
	board::CardId,
	geometry::{BoardGeometry, Point, Rect}
};

////////////////////////////////////////////////////////////////////////////////
//                                Controller.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The drag controller. At most one card is dragged at a time.
#[derive(Clone, Debug, Default)]
pub struct DragController
{
	/// The drag in progress, if any.
	active: Option<Drag>
}

/// A drag in progress.
#[derive(Clone, Copy, Debug)]
struct Drag
{
	/// The card being dragged.
	card: CardId,

	/// The pointer offset from the card's top-left corner, captured when the
	/// drag began.
	offset: Point,

	/// The latest pointer position not yet applied to the card.
	pending: Option<Point>,

	/// Whether the pointer has moved since the drag began.
	moved: bool
}

/// The outcome of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release
{
	/// The pointer never moved, so the press was a click on the card.
	Click(CardId),

	/// The card was released over the drop target with the given index.
	Target(CardId, usize),

	/// The card was released elsewhere and rests at the given board offset.
	Board(CardId, Point)
}

impl DragController
{
	/// Begin dragging a card.
	///
	/// # Arguments
	///
	/// * `card` - The card under the pointer.
	/// * `pointer` - The surface coordinate of the pointer.
	/// * `card_corner` - The surface coordinate of the card's top-left corner.
	pub fn begin(&mut self, card: CardId, pointer: Point, card_corner: Point)
	{
		let offset = pointer.minus(card_corner);
		trace!("drag begin: {} offset {:?}", card, offset);
		self.active = Some(Drag { card, offset, pending: None, moved: false });
	}

	/// Get the card being dragged, if any.
	#[inline]
	#[must_use]
	pub fn card(&self) -> Option<CardId>
	{
		self.active.map(|drag| drag.card)
	}

	/// Check whether a card is being dragged.
	#[inline]
	#[must_use]
	pub fn is_dragging(&self) -> bool
	{
		self.active.is_some()
	}

	/// Record a pointer move. Only the latest move survives until the next
	/// [flush](Self::flush). Ignored if nothing is being dragged.
	pub fn update(&mut self, pointer: Point)
	{
		if let Some(drag) = self.active.as_mut()
		{
			drag.pending = Some(pointer);
			drag.moved = true;
		}
	}

	/// Apply the latest pending move, if any.
	///
	/// # Returns
	///
	/// The dragged card and its new clamped board offset, or `None` if there
	/// was nothing to apply.
	pub fn flush(&mut self, geometry: &BoardGeometry) -> Option<(CardId, Point)>
	{
		let drag = self.active.as_mut()?;
		let pointer = drag.pending.take()?;
		Some((drag.card, position_for(pointer, drag.offset, geometry)))
	}

	/// Release the pointer, ending the drag.
	///
	/// # Arguments
	///
	/// * `pointer` - The surface coordinate of the release.
	/// * `geometry` - The board geometry.
	/// * `targets` - The drop targets, as surface rectangles.
	///
	/// # Returns
	///
	/// Where the card landed, or `None` if nothing was being dragged.
	pub fn release(
		&mut self,
		pointer: Point,
		geometry: &BoardGeometry,
		targets: &[Rect]
	) -> Option<Release>
	{
		let drag = self.active.take()?;
		if !drag.moved
		{
			trace!("drag click: {}", drag.card);
			return Some(Release::Click(drag.card))
		}
		if let Some(index) = targets.iter().position(|t| t.contains(pointer))
		{
			trace!("drag drop: {} into target {}", drag.card, index);
			return Some(Release::Target(drag.card, index))
		}
		let position = position_for(pointer, drag.offset, geometry);
		trace!("drag drop: {} at {:?}", drag.card, position);
		Some(Release::Board(drag.card, position))
	}

	/// Abandon the drag in progress, if any.
	pub fn cancel(&mut self)
	{
		self.active = None;
	}
}

/// Compute the board offset of a dragged card: the pointer, less the captured
/// offset, less the board origin, clamped to the board.
///
/// # Arguments
///
/// * `pointer` - The surface coordinate of the pointer.
/// * `offset` - The pointer offset within the card.
/// * `geometry` - The board geometry.
///
/// # Returns
///
/// The clamped board offset.
#[must_use]
pub fn position_for(pointer: Point, offset: Point, geometry: &BoardGeometry)
	-> Point
{
	geometry.clamp(pointer.minus(offset).minus(geometry.origin))
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use super::*;

	fn geometry() -> BoardGeometry
	{
		BoardGeometry { origin: Point::new(2, 1), ..Default::default() }
	}

	#[test]
	fn test_position_for()
	{
		let geometry = geometry();
		// Pointer 3 cells into a card, so the card's corner trails by 3.
		assert_eq!(
			position_for(Point::new(20, 6), Point::new(3, 1), &geometry),
			Point::new(15, 4)
		);
		// Far off the top-left, and far off the bottom-right.
		assert_eq!(
			position_for(Point::new(-50, -50), Point::new(0, 0), &geometry),
			Point::new(0, 0)
		);
		assert_eq!(
			position_for(Point::new(500, 500), Point::new(0, 0), &geometry),
			Point::new(geometry.max_x(), geometry.max_y())
		);
	}

	/// Moves are coalesced: only the last one before a flush is applied.
	#[test]
	fn test_coalesce()
	{
		let geometry = geometry();
		let card = CardId::new(3);
		let mut drag = DragController::default();
		assert_eq!(drag.flush(&geometry), None);
		drag.begin(card, Point::new(10, 5), Point::new(8, 4));
		assert_eq!(drag.flush(&geometry), None);
		drag.update(Point::new(11, 5));
		drag.update(Point::new(12, 6));
		drag.update(Point::new(30, 9));
		assert_eq!(drag.flush(&geometry), Some((card, Point::new(26, 7))));
		assert_eq!(drag.flush(&geometry), None);
	}

	#[test]
	fn test_release()
	{
		let geometry = geometry();
		let card = CardId::new(0);
		let targets = [Rect::new(0, 30, 20, 6), Rect::new(20, 30, 20, 6)];
		let mut drag = DragController::default();

		// Nothing to release.
		assert_eq!(drag.release(Point::new(1, 1), &geometry, &targets), None);

		// A press and release without movement is a click.
		drag.begin(card, Point::new(5, 5), Point::new(4, 4));
		assert_eq!(
			drag.release(Point::new(5, 5), &geometry, &targets),
			Some(Release::Click(card))
		);
		assert!(!drag.is_dragging());

		// Release over the second target.
		drag.begin(card, Point::new(5, 5), Point::new(4, 4));
		drag.update(Point::new(25, 31));
		assert_eq!(
			drag.release(Point::new(25, 32), &geometry, &targets),
			Some(Release::Target(card, 1))
		);

		// Release outside every target and outside the board still clamps.
		drag.begin(card, Point::new(5, 5), Point::new(4, 4));
		drag.update(Point::new(200, 100));
		assert_eq!(
			drag.release(Point::new(200, 100), &geometry, &targets),
			Some(Release::Board(card, Point::new(64, 17)))
		);
	}
}
