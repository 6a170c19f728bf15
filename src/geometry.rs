//! # Geometry
//!
//! Points and rectangles on the drawing surface, measured in terminal cells,
//! and the geometry of the board on which the cards are dragged.

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
//                                  Points.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A point. Depending on context this is either a surface coordinate (e.g.,
/// the pointer) or an offset relative to the board origin (e.g., the position
/// of a card).
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize
)]
pub struct Point
{
	pub x: i32,
	pub y: i32
}

impl Point
{
	#[inline]
	#[must_use]
	pub const fn new(x: i32, y: i32) -> Self
	{
		Self { x, y }
	}

	/// The component-wise difference `self - other`.
	#[inline]
	#[must_use]
	pub const fn minus(self, other: Point) -> Self
	{
		Self { x: self.x - other.x, y: self.y - other.y }
	}

	/// The component-wise sum `self + other`.
	#[inline]
	#[must_use]
	pub const fn plus(self, other: Point) -> Self
	{
		Self { x: self.x + other.x, y: self.y + other.y }
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                Rectangles.                                 //
////////////////////////////////////////////////////////////////////////////////

/// An axis-aligned rectangle. The right and bottom edges are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect
{
	pub x: i32,
	pub y: i32,
	pub width: i32,
	pub height: i32
}

impl Rect
{
	#[inline]
	#[must_use]
	pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self
	{
		Self { x, y, width, height }
	}

	/// The top-left corner.
	#[inline]
	#[must_use]
	pub const fn origin(&self) -> Point
	{
		Point::new(self.x, self.y)
	}

	/// Check whether the rectangle contains the given point.
	#[inline]
	#[must_use]
	pub const fn contains(&self, point: Point) -> bool
	{
		point.x >= self.x
			&& point.x < self.x + self.width
			&& point.y >= self.y
			&& point.y < self.y + self.height
	}

	/// Check whether two rectangles share at least one cell.
	#[inline]
	#[must_use]
	pub const fn intersects(&self, other: &Rect) -> bool
	{
		self.x < other.x + other.width
			&& other.x < self.x + self.width
			&& self.y < other.y + other.height
			&& other.y < self.y + self.height
	}
}

////////////////////////////////////////////////////////////////////////////////
//                              Board geometry.                               //
////////////////////////////////////////////////////////////////////////////////

/// The bounded drag surface and the size of the cards upon it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardGeometry
{
	/// The surface coordinate of the top-left corner of the board.
	pub origin: Point,

	/// The width of the board.
	pub width: i32,

	/// The height of the board.
	pub height: i32,

	/// The width of every card.
	pub card_width: i32,

	/// The height of every card.
	pub card_height: i32
}

impl BoardGeometry
{
	/// The largest X-offset a card may take without leaving the board. Never
	/// negative, even when the board is narrower than a card.
	#[inline]
	#[must_use]
	pub fn max_x(&self) -> i32
	{
		(self.width - self.card_width).max(0)
	}

	/// The largest Y-offset a card may take without leaving the board.
	#[inline]
	#[must_use]
	pub fn max_y(&self) -> i32
	{
		(self.height - self.card_height).max(0)
	}

	/// Clamp a board offset into
	/// `[0, width - card_width] × [0, height - card_height]`.
	#[must_use]
	pub fn clamp(&self, position: Point) -> Point
	{
		Point::new(
			position.x.clamp(0, self.max_x()),
			position.y.clamp(0, self.max_y())
		)
	}

	/// Check whether a board offset keeps the card fully on the board.
	#[inline]
	#[must_use]
	pub fn is_in_bounds(&self, position: Point) -> bool
	{
		self.clamp(position) == position
	}

	/// The surface rectangle occupied by a card at the given board offset.
	#[inline]
	#[must_use]
	pub fn card_bounds(&self, position: Point) -> Rect
	{
		let corner = self.origin.plus(position);
		Rect::new(corner.x, corner.y, self.card_width, self.card_height)
	}

	/// The surface rectangle of the board itself.
	#[inline]
	#[must_use]
	pub fn bounds(&self) -> Rect
	{
		Rect::new(self.origin.x, self.origin.y, self.width, self.height)
	}
}

impl Default for BoardGeometry
{
	fn default() -> Self
	{
		Self {
			origin: Point::default(),
			width: 80,
			height: 20,
			card_width: 16,
			card_height: 3
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
