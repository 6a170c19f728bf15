//! # Connections Board
//!
//! Connections is a word puzzle game where the player must sort 16 words into
//! 4 hidden groups of 4. Each group shares a connection, and the groups are
//! revealed in yellow, green, blue, and purple, roughly in order of
//! difficulty.
//!
//! This program is a scratch board for solving Connections puzzles in the
//! terminal. Via command line options, the user chooses the puzzle by date.
//! Then the user can drag the cards around, tag candidate groups with colors,
//! keep notes, ask the puzzle server for hints, and submit the final grouping.
//! Progress is saved as the user goes, and restored on the next run.

mod app;
mod tui;

use std::{fs::File, path::PathBuf};

use clap::{Parser, Subcommand};
use connections_board::{
	archive::{PuzzleArchive, LATEST},
	client::ApiClient,
	persistence::{self, FileStore},
	settings::Settings
};
use log::{debug, trace, LevelFilter};
use ratatui::layout::Rect;

use app::App;
use tui::tui;

////////////////////////////////////////////////////////////////////////////////
//                           Command line options.                            //
////////////////////////////////////////////////////////////////////////////////

/// CLI for solving Connections puzzles.
#[derive(Clone, Debug, Parser)]
#[command(version = "1.0", author = "Todd L Smith")]
struct Opts
{
	/// The path to a TOML configuration file. Without one,
	/// `connections.toml` in the working directory is used if present.
	#[arg(short = 'c', long)]
	config: Option<PathBuf>,

	/// The date of the puzzle, as YYYY-MM-DD, or `latest` for the newest
	/// puzzle, or `random` for any puzzle.
	#[arg(short = 'd', long, default_value = LATEST)]
	date: String,

	#[command(subcommand)]
	command: Option<Command>
}

/// The subcommands of the CLI.
#[derive(Copy, Clone, Debug, Default, Subcommand)]
enum Command
{
	/// Open the text-based user interface (TUI) for solving the puzzle. This
	/// is the default.
	#[default]
	Play,

	/// Download the puzzle archive, rebuild the binary cache, and exit.
	Fetch,

	/// Print the dates of the available puzzles, newest first, and exit.
	Dates,

	/// Forget the saved board and notes for the puzzle, and exit.
	Reset
}

////////////////////////////////////////////////////////////////////////////////
//                               Main program.                                //
////////////////////////////////////////////////////////////////////////////////

/// Parse the command line options and execute the appropriate subcommand.
fn main()
{
	// Parse the command line options.
	let opts = Opts::parse();

	// Load the settings and start logging. The TUI owns the terminal, so the
	// log goes to a file whenever one is configured.
	let settings = Settings::load(opts.config.as_deref())
		.unwrap_or_else(|e| panic!("Failed to load settings: {}", e));
	init_logging(&settings);
	debug!("Command line options: {:?}", opts);

	let command = opts.command.unwrap_or_default();
	let json_path = settings.data_dir
		.join(format!("{}.json", settings.archive_name));

	// Fetch always downloads; otherwise only download when there is no
	// archive yet.
	if matches!(command, Command::Fetch) || !json_path.exists()
	{
		let archive = PuzzleArchive::download(&settings.archive_url, &json_path)
			.unwrap_or_else(|e|
				panic!(
					"Failed to download archive: {} to {}: {}",
					settings.archive_url,
					json_path.display(),
					e
				)
			);
		trace!("Downloaded {} puzzles", archive.len());
	}

	// Open the archive, creating the binary cache if necessary.
	let archive = PuzzleArchive::open(&settings.data_dir, &settings.archive_name)
		.unwrap_or_else(|e|
			panic!(
				"Failed to open archive: {}/{}.json: {}",
				settings.data_dir.display(),
				settings.archive_name,
				e
			)
		);

	// Execute the appropriate subcommand.
	match command
	{
		Command::Fetch =>
		{
			println!("Fetched {} puzzles.", archive.len());
		},
		Command::Dates =>
		{
			for date in archive.dates()
			{
				println!("{}", date);
			}
		},
		Command::Reset =>
		{
			let puzzle = archive.choose(&opts.date, &mut rand::rng())
				.unwrap_or_else(|e| panic!("{}", e));
			let mut store = FileStore::open(&settings.state_dir)
				.unwrap_or_else(|e| panic!("Failed to open state store: {}", e));
			persistence::clear(&mut store, &puzzle.date)
				.unwrap_or_else(|e| panic!("Failed to clear state: {}", e));
			println!("Reset {}.", puzzle.date);
		},
		Command::Play =>
		{
			let puzzle = archive.choose(&opts.date, &mut rand::rng())
				.unwrap_or_else(|e| panic!("{}", e))
				.clone();
			let store = FileStore::open(&settings.state_dir)
				.unwrap_or_else(|e| panic!("Failed to open state store: {}", e));
			let client = ApiClient::new(&settings.api_url);
			let card_size = (settings.card_width, settings.card_height);
			trace!("Opening TUI");
			tui(|terminal| {
				let size = terminal.size()?;
				let area = Rect::new(0, 0, size.width, size.height);
				App::new(puzzle, Box::new(store), client, card_size, area)?
					.run(terminal)
			})
			.unwrap_or_else(|e| panic!("Failed to drive TUI: {}", e));
		}
	}
}

/// Initialize the logger. `RUST_LOG` overrides the default level, which only
/// admits warnings and errors.
///
/// # Arguments
///
/// * `settings` - The settings, which may name a log file.
fn init_logging(settings: &Settings)
{
	let mut builder = env_logger::Builder::new();
	builder.filter_level(LevelFilter::Warn).parse_default_env();
	if let Some(path) = &settings.log_file
	{
		match File::create(path)
		{
			Ok(file) =>
			{
				builder.target(env_logger::Target::Pipe(Box::new(file)));
			},
			Err(e) => eprintln!(
				"Failed to create log file: {}: {}",
				path.display(),
				e
			)
		}
	}
	builder.init();
}
