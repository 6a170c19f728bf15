use std::time::Duration;

use connections_board::{
	archive::PuzzleArchive,
	board::{Action, Board},
	color::{Color, Swatch},
	geometry::BoardGeometry,
	layout,
	validator
};
use const_format::concatcp;
use criterion::{measurement::Measurement, BenchmarkGroup, Criterion};
use rand::{rngs::StdRng, SeedableRng};

/// The path of the directory containing the archive.
#[inline]
#[must_use]
const fn dir() -> &'static str
{
	"data"
}

/// The name of the archive file.
#[inline]
#[must_use]
const fn name() -> &'static str
{
	"sample"
}

/// The path to the JSON file.
#[inline]
#[must_use]
const fn path_json() -> &'static str
{
	concatcp!(dir(), "/", name(), ".json")
}

/// The path to the binary cache.
#[inline]
#[must_use]
const fn path_bin() -> &'static str
{
	concatcp!(dir(), "/", name(), ".bin")
}

/// Benchmark reading an archive from JSON.
///
/// # Arguments
///
/// * `g` - The benchmark group.
fn bench_read_from_file<M: Measurement>(g: &mut BenchmarkGroup<M>)
{
	g.bench_function("read_from_file", |b| {
		b.iter(|| PuzzleArchive::read_from_file(path_json()).unwrap());
	});
}

/// Benchmark deserializing an archive from the binary cache.
///
/// # Arguments
///
/// * `g` - The benchmark group.
fn bench_deserialize_from_file<M: Measurement>(g: &mut BenchmarkGroup<M>)
{
	g.bench_function("deserialize_from_file", |b| {
		b.iter(|| PuzzleArchive::deserialize_from_file(path_bin()).unwrap());
	});
}

/// Benchmark laying out a board: a grid, then a shuffle.
///
/// # Arguments
///
/// * `g` - The benchmark group.
/// * `archive` - The source of the puzzle.
fn bench_layout<M: Measurement>(g: &mut BenchmarkGroup<M>, archive: &PuzzleArchive)
{
	let geometry = BoardGeometry::default();
	let puzzle = archive.latest().unwrap().clone();
	let board = Board::new(puzzle, geometry).unwrap();
	let mut rng = StdRng::seed_from_u64(0);
	g.bench_function("layout", |b| {
		b.iter(|| {
			let mut cards = board.cards().to_vec();
			layout::arrange_grid(&mut cards, &geometry);
			layout::shuffle(&mut cards, &geometry, &mut rng);
			cards
		});
	});
}

/// Benchmark validating a fully tagged board.
///
/// # Arguments
///
/// * `g` - The benchmark group.
/// * `archive` - The source of the puzzle.
fn bench_validate<M: Measurement>(g: &mut BenchmarkGroup<M>, archive: &PuzzleArchive)
{
	let puzzle = archive.latest().unwrap().clone();
	let mut board = Board::new(puzzle, BoardGeometry::default()).unwrap();
	let ids = board.cards().iter().map(|c| c.id).collect::<Vec<_>>();
	for (index, card) in ids.into_iter().enumerate()
	{
		let swatch = Swatch::Color(Color::ALL[index % Color::ALL.len()]);
		board.apply(Action::SelectSwatch { card, swatch });
	}
	g.bench_function("validate", |b| {
		b.iter(|| validator::validate(board.cards()).unwrap());
	});
}

/// Run all benchmarks.
///
/// The main purpose of the benchmarking is to ensure that
/// [`deserialize_from_file`](PuzzleArchive::deserialize_from_file) is faster
/// than [`read_from_file`](PuzzleArchive::read_from_file).
fn main()
{
	// Ensure that both the JSON and binary files exist.
	let archive = PuzzleArchive::open(dir(), name()).unwrap();

	// Run the benchmarks.
	let mut criterion = Criterion::default().configure_from_args();
	let mut group = criterion.benchmark_group("benchmarks");
	group.measurement_time(Duration::from_secs(10));
	bench_read_from_file(&mut group);
	bench_deserialize_from_file(&mut group);
	bench_layout(&mut group, &archive);
	bench_validate(&mut group, &archive);
	group.finish();

	// Generate the final summary.
	criterion.final_summary();
}
