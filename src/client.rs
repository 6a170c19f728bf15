//! # Puzzle server client
//!
//! Thin blocking calls to the hint and submission endpoints. Both are keyed by
//! the puzzle date. Neither call retries; the caller decides what a failure
//! means for the user.

use std::fmt::{self, Display, Formatter};

use log::{debug, trace};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validator::Submission;

////////////////////////////////////////////////////////////////////////////////
//                                Hint levels.                                //
////////////////////////////////////////////////////////////////////////////////

/// How much a hint may give away.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum HintLevel
{
	#[default]
	Beginner,
	Intermediate,
	Advanced
}

impl HintLevel
{
	/// The next level, wrapping from advanced back to beginner.
	#[must_use]
	pub const fn next(self) -> Self
	{
		match self
		{
			HintLevel::Beginner => HintLevel::Intermediate,
			HintLevel::Intermediate => HintLevel::Advanced,
			HintLevel::Advanced => HintLevel::Beginner
		}
	}
}

impl Display for HintLevel
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			HintLevel::Beginner => write!(f, "beginner"),
			HintLevel::Intermediate => write!(f, "intermediate"),
			HintLevel::Advanced => write!(f, "advanced")
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                              Wire formats.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The body of a hint request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest
{
	pub level: HintLevel
}

/// The body of a hint response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResponse
{
	pub hint: String
}

/// The body of a submission request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest
{
	pub submission: Submission
}

/// The server's verdict on a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict
{
	/// Whether the grouping matches the answer key.
	pub correct: bool,

	/// A message for the player. Not every server sends one.
	#[serde(default)]
	pub message: Option<String>
}

////////////////////////////////////////////////////////////////////////////////
//                                  Client.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A client for the puzzle server. Cheap to clone; clones share one
/// connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient
{
	/// The base URL of the server, without a trailing slash.
	base_url: String,

	/// The underlying HTTP client.
	http: Client
}

impl ApiClient
{
	/// Create a client for the server at the given base URL.
	pub fn new(base_url: &str) -> Self
	{
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			http: Client::new()
		}
	}

	/// The URL of the hint endpoint for the given puzzle.
	#[must_use]
	pub fn hint_url(&self, date: &str) -> String
	{
		format!("{}/api/hint/{}", self.base_url, date)
	}

	/// The URL of the submission endpoint for the given puzzle.
	#[must_use]
	pub fn submit_url(&self, date: &str) -> String
	{
		format!("{}/api/submit/{}", self.base_url, date)
	}

	/// Ask the server for a hint.
	///
	/// # Arguments
	///
	/// * `date` - The puzzle date.
	/// * `level` - How much the hint may give away.
	///
	/// # Returns
	///
	/// The hint text.
	///
	/// # Errors
	///
	/// Any transport failure, error status, or undecodable response.
	pub fn hint(&self, date: &str, level: HintLevel)
		-> Result<String, ClientError>
	{
		let url = self.hint_url(date);
		trace!("requesting {} hint: {}", level, url);
		let response = self.http
			.post(&url)
			.json(&HintRequest { level })
			.send()?
			.error_for_status()?
			.json::<HintResponse>()?;
		debug!("received {} hint for {}", level, date);
		Ok(response.hint)
	}

	/// Submit a grouping for checking.
	///
	/// # Arguments
	///
	/// * `date` - The puzzle date.
	/// * `submission` - The validated grouping.
	///
	/// # Returns
	///
	/// The server's verdict.
	///
	/// # Errors
	///
	/// Any transport failure, error status, or undecodable response.
	pub fn submit(&self, date: &str, submission: &Submission)
		-> Result<Verdict, ClientError>
	{
		let url = self.submit_url(date);
		trace!("submitting: {}", url);
		let verdict = self.http
			.post(&url)
			.json(&SubmitRequest { submission: submission.clone() })
			.send()?
			.error_for_status()?
			.json::<Verdict>()?;
		debug!("submission for {} correct: {}", date, verdict.correct);
		Ok(verdict)
	}
}

/// A failed call to the puzzle server.
#[derive(Debug, Error)]
pub enum ClientError
{
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error)
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
