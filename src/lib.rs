//! # Connections Board
//!
//! Connections is a word puzzle game where the player must sort 16 words into
//! 4 hidden groups of 4. This crate provides a scratch board for solving it:
//! the player drags the word cards around, tags tentative groups with colors,
//! keeps notes, asks a server for hints, and finally submits a grouping for
//! checking. Progress is saved per puzzle and restored on the next visit.
//!
//! Everything here is independent of the terminal front end. The
//! [`Board`](board::Board) is driven by [`Action`](board::Action)s and answers
//! [`Effect`](board::Effect)s for its owner to carry out.

pub mod archive;
pub mod board;
pub mod client;
pub mod color;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod persistence;
pub mod puzzle;
pub mod settings;
pub mod validator;
