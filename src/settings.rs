//! # Settings
//!
//! Runtime configuration, layered from built-in defaults, an optional TOML
//! file, and `CONNECTIONS_*` environment variables, in increasing order of
//! precedence.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// The name of the configuration file looked for in the working directory
/// when no file is given explicitly, sans the extension.
pub const DEFAULT_CONFIG: &str = "connections";

/// The prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "CONNECTIONS";

/// The published puzzle archive.
pub const DEFAULT_ARCHIVE_URL: &str =
	"https://raw.githubusercontent.com/Eyefyre/NYT-Connections-Answers/main/connections.json";

/// The runtime configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings
{
	/// The base URL of the hint and submission server.
	pub api_url: String,

	/// Where to download the puzzle archive from.
	pub archive_url: String,

	/// The directory holding the downloaded archive and its binary cache.
	pub data_dir: PathBuf,

	/// The name of the archive files, sans the extension.
	pub archive_name: String,

	/// The directory holding saved boards and notes.
	pub state_dir: PathBuf,

	/// The width of a card, in cells.
	pub card_width: u16,

	/// The height of a card, in cells.
	pub card_height: u16,

	/// Where to write the log. Without one, the log goes to standard error.
	pub log_file: Option<PathBuf>
}

impl Settings
{
	/// Load the settings.
	///
	/// # Arguments
	///
	/// * `path` - An explicit configuration file, which must exist. Without
	///   one, `connections.toml` in the working directory is used if present.
	///
	/// # Errors
	///
	/// If an explicit file is missing, or any source holds an invalid value.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError>
	{
		let file = match path
		{
			Some(path) => File::from(path).required(true),
			None => File::with_name(DEFAULT_CONFIG).required(false)
		};
		let settings = Config::builder()
			.set_default("api_url", "http://localhost:5000")?
			.set_default("archive_url", DEFAULT_ARCHIVE_URL)?
			.set_default("data_dir", "data")?
			.set_default("archive_name", "connections")?
			.set_default("state_dir", "state")?
			.set_default("card_width", 16_i64)?
			.set_default("card_height", 3_i64)?
			.add_source(file)
			.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
			.build()?
			.try_deserialize::<Settings>()?;
		debug!("settings: {:?}", settings);
		Ok(settings)
	}
}

/// The settings could not be assembled.
#[derive(Debug, Error)]
pub enum SettingsError
{
	#[error("invalid configuration: {0}")]
	Config(#[from] config::ConfigError)
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	#[test]
	fn test_file_overrides_defaults()
	{
		let dir = tempdir().unwrap();
		let path = dir.path().join("board.toml");
		fs::write(
			&path,
			"api_url = \"https://example.test\"\ncard_width = 20\n"
		).unwrap();
		let settings = Settings::load(Some(&path)).unwrap();
		assert_eq!(settings.api_url, "https://example.test");
		assert_eq!(settings.card_width, 20);
		assert_eq!(settings.card_height, 3);
		assert_eq!(settings.archive_name, "connections");
		assert_eq!(settings.log_file, None);
	}

	#[test]
	fn test_missing_file()
	{
		let dir = tempdir().unwrap();
		let path = dir.path().join("absent.toml");
		assert!(Settings::load(Some(&path)).is_err());
	}

	#[test]
	fn test_bad_value()
	{
		let dir = tempdir().unwrap();
		let path = dir.path().join("board.toml");
		fs::write(&path, "card_height = \"tall\"\n").unwrap();
		assert!(Settings::load(Some(&path)).is_err());
	}
}
