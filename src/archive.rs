//! # Puzzle archive
//!
//! Herein is support for obtaining and caching the published puzzles. The
//! archive is a JSON array of [`Puzzle`]s hosted by a third party. It is
//! downloaded once, kept on disk, and mirrored in a binary cache that is
//! cheaper to read on subsequent starts.

use std::{
	fs::{self, File},
	io::{self, BufReader, BufWriter, Read, Write},
	path::Path
};

use chrono::NaiveDate;
use log::{debug, trace, warn};
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::Puzzle;

/// The date alias that resolves to the newest puzzle.
pub const LATEST: &str = "latest";

/// The date alias that picks a puzzle at random.
pub const RANDOM: &str = "random";

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// An archive is a list of well-formed puzzles, in publication order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct PuzzleArchive(Vec<Puzzle>);

impl PuzzleArchive
{
	/// Construct an empty archive. Same as [`Default::default`].
	#[inline]
	pub fn new() -> Self { Self(Vec::new()) }

	/// Construct an archive from the given puzzles, discarding any that are
	/// malformed.
	///
	/// # Arguments
	///
	/// * `puzzles` - The candidate puzzles.
	///
	/// # Returns
	///
	/// An archive of the well-formed puzzles.
	pub fn from_puzzles(puzzles: Vec<Puzzle>) -> Self
	{
		let total = puzzles.len();
		let puzzles = puzzles.into_iter()
			.filter(|puzzle| match puzzle.validate()
			{
				Ok(()) => true,
				Err(e) =>
				{
					warn!("skipping puzzle {:?}: {}", puzzle.date, e);
					false
				}
			})
			.collect::<Vec<_>>();
		debug!("accepted {} of {} puzzles", puzzles.len(), total);
		Self(puzzles)
	}

	/// Check if the archive is empty.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	/// The number of puzzles in the archive.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize { self.0.len() }

	/// The puzzles, in publication order.
	#[inline]
	#[must_use]
	pub fn puzzles(&self) -> &[Puzzle] { &self.0 }

	/// Find the puzzle for the given date. [`LATEST`] names the newest puzzle.
	///
	/// # Arguments
	///
	/// * `date` - The date, or [`LATEST`].
	///
	/// # Returns
	///
	/// The puzzle, if the archive has one for the date.
	#[must_use]
	pub fn by_date(&self, date: &str) -> Option<&Puzzle>
	{
		if date == LATEST
		{
			return self.latest()
		}
		self.0.iter().find(|puzzle| puzzle.date == date)
	}

	/// The newest puzzle, by date.
	#[must_use]
	pub fn latest(&self) -> Option<&Puzzle>
	{
		self.0.iter().max_by(|a, b| compare_dates(&a.date, &b.date))
	}

	/// A puzzle chosen uniformly at random.
	#[must_use]
	pub fn random<R: Rng>(&self, rng: &mut R) -> Option<&Puzzle>
	{
		self.0.choose(rng)
	}

	/// Choose a puzzle by date, or by one of the aliases [`LATEST`] and
	/// [`RANDOM`].
	///
	/// # Arguments
	///
	/// * `choice` - The date or alias.
	/// * `rng` - The source of randomness for [`RANDOM`].
	///
	/// # Errors
	///
	/// [`ArchiveError::UnknownDate`] if no puzzle matches.
	pub fn choose<R: Rng>(&self, choice: &str, rng: &mut R)
		-> Result<&Puzzle, ArchiveError>
	{
		let puzzle =
			if choice == RANDOM { self.random(rng) }
			else { self.by_date(choice) };
		puzzle.ok_or_else(|| ArchiveError::UnknownDate(choice.to_string()))
	}

	/// The dates of all puzzles, newest first. Dates that do not parse sort
	/// after all those that do.
	#[must_use]
	pub fn dates(&self) -> Vec<&str>
	{
		let mut dates = self.0.iter()
			.map(|puzzle| puzzle.date.as_str())
			.collect::<Vec<_>>();
		dates.sort_by(|a, b| compare_dates(b, a));
		dates
	}

	/// Download the archive from the given URL and save the JSON to the given
	/// path, replacing whatever is there.
	///
	/// # Arguments
	///
	/// * `url` - The location of the published archive.
	/// * `path` - Where to keep the JSON.
	///
	/// # Returns
	///
	/// The downloaded archive.
	///
	/// # Errors
	///
	/// * [`ArchiveError::Http`] if the download fails.
	/// * [`ArchiveError::Json`] if the download is not a puzzle array.
	/// * [`ArchiveError::Io`] if the JSON cannot be written.
	pub fn download<T: AsRef<Path>>(url: &str, path: T)
		-> Result<Self, ArchiveError>
	{
		trace!("downloading archive: {}", url);
		let body = reqwest::blocking::get(url)?
			.error_for_status()?
			.text()?;
		let puzzles: Vec<Puzzle> = serde_json::from_str(&body)?;
		if let Some(parent) = path.as_ref().parent()
		{
			fs::create_dir_all(parent)?;
		}
		fs::write(path.as_ref(), &body)?;
		debug!(
			"downloaded {} puzzles to {}",
			puzzles.len(),
			path.as_ref().display()
		);
		Ok(Self::from_puzzles(puzzles))
	}

	/// Open the archive with the given name. Only the specified directory will
	/// be searched. `name` denotes the archive file, sans the extension. If a
	/// binary cache (`<name>.bin`) exists _and_ is newer than the JSON
	/// (`<name>.json`), it will be read; otherwise, the JSON will be read and
	/// the binary cache rebuilt.
	///
	/// # Arguments
	///
	/// * `dir` - The directory to search.
	/// * `name` - The name of the archive file.
	///
	/// # Returns
	///
	/// The archive.
	///
	/// # Errors
	///
	/// * [`ArchiveError::Io`] if the JSON cannot be read.
	/// * [`ArchiveError::Json`] if the JSON is not a puzzle array.
	pub fn open<T: AsRef<Path>>(dir: T, name: &str) -> Result<Self, ArchiveError>
	{
		let bin_path = dir.as_ref().join(format!("{}.bin", name));
		let json_path = dir.as_ref().join(format!("{}.json", name));
		// Use the cache only if it's strictly newer than the JSON. Any failure
		// to stat either file just means falling back to the JSON.
		let cache_is_fresh = bin_path
			.metadata()
			.and_then(|m| m.modified())
			.and_then(|bin_time| {
				json_path
					.metadata()
					.and_then(|m| m.modified())
					.map(|json_time| bin_time > json_time)
			})
			.unwrap_or(false);
		if cache_is_fresh
		{
			match Self::deserialize_from_file(&bin_path)
			{
				Ok(archive) =>
				{
					trace!("Read binary archive: {}", bin_path.display());
					return Ok(archive)
				},
				Err(e) => warn!(
					"Failed to read binary archive: {}: {}",
					bin_path.display(),
					e
				)
			}
		}
		let archive = Self::read_from_file(&json_path)?;
		trace!("Read JSON archive: {}", json_path.display());
		match archive.serialize_to_file(&bin_path)
		{
			Ok(_) => trace!("Wrote binary archive: {}", bin_path.display()),
			Err(e) => warn!(
				"Failed to write binary archive: {}: {}",
				bin_path.display(),
				e
			)
		}
		Ok(archive)
	}

	/// Read an archive from a JSON file.
	///
	/// # Errors
	///
	/// * [`ArchiveError::Io`] if the file cannot be read.
	/// * [`ArchiveError::Json`] if the file is not a puzzle array.
	pub fn read_from_file<T: AsRef<Path>>(path: T) -> Result<Self, ArchiveError>
	{
		let reader = BufReader::new(File::open(path)?);
		let puzzles: Vec<Puzzle> = serde_json::from_reader(reader)?;
		Ok(Self::from_puzzles(puzzles))
	}

	/// Deserialize an archive from the given file. The file must contain a
	/// serialized archive in [`bincode`](bincode) format.
	///
	/// # Errors
	///
	/// * [`ArchiveError::Io`] if the file cannot be read.
	/// * [`ArchiveError::Binary`] if the file contains invalid data.
	pub fn deserialize_from_file<T: AsRef<Path>>(path: T)
		-> Result<Self, ArchiveError>
	{
		let mut reader = BufReader::new(File::open(path)?);
		let mut content = Vec::new();
		reader.read_to_end(&mut content)?;
		Ok(bincode::deserialize(&content)?)
	}

	/// Serialize the archive to the given file in [`bincode`](bincode)
	/// format.
	///
	/// # Errors
	///
	/// * [`ArchiveError::Io`] if the file cannot be written.
	/// * [`ArchiveError::Binary`] if the archive cannot be encoded.
	pub fn serialize_to_file<T: AsRef<Path>>(&self, path: T)
		-> Result<(), ArchiveError>
	{
		let content = bincode::serialize(self)?;
		let mut writer = BufWriter::new(File::create(path)?);
		writer.write_all(&content)?;
		writer.flush()?;
		Ok(())
	}
}

/// Order two puzzle dates chronologically. Parsable dates precede
/// unparsable ones; unparsable ones compare as strings.
fn compare_dates(a: &str, b: &str) -> std::cmp::Ordering
{
	let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
	match (parse(a), parse(b))
	{
		(Some(a), Some(b)) => a.cmp(&b),
		(Some(_), None) => std::cmp::Ordering::Greater,
		(None, Some(_)) => std::cmp::Ordering::Less,
		(None, None) => a.cmp(b)
	}
}

/// A failure to obtain the archive.
#[derive(Debug, Error)]
pub enum ArchiveError
{
	#[error("archive I/O failed: {0}")]
	Io(#[from] io::Error),

	#[error("archive is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("binary archive is invalid: {0}")]
	Binary(#[from] bincode::Error),

	#[error("archive download failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("no puzzle for {0}")]
	UnknownDate(String)
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
