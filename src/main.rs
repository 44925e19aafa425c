use clap::Parser;
use photo_finish::config::{
    GridSize, Settings, DEFAULT_BOARD_EXTENT, DEFAULT_SHUFFLE_SWAPS, DEFAULT_TILE_GAP,
};
use photo_finish::puzzle::Puzzle;
use photo_finish::ui::{self, tile_labels};
use rand::{rngs::StdRng, SeedableRng};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photo-finish", version, about = "Sliding-tile picture puzzle")]
struct Cli {
    #[arg(long, value_enum, env = "PHOTO_FINISH_GRID", default_value_t = GridSize::Small)]
    grid: GridSize,
    /// Grid dimension as a number (3 to 7), instead of `--grid`.
    #[arg(long, conflicts_with = "grid")]
    size: Option<usize>,
    #[arg(long, env = "PHOTO_FINISH_SHUFFLES", default_value_t = DEFAULT_SHUFFLE_SWAPS)]
    shuffles: usize,
    #[arg(long, default_value_t = DEFAULT_TILE_GAP)]
    gap: f32,
    #[arg(long, default_value_t = DEFAULT_BOARD_EXTENT)]
    extent: f32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the solved and shuffled boards instead of playing.
    #[arg(long)]
    print: bool,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    // The terminal belongs to the game, so logs only go to a file.
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| -> Box<dyn std::error::Error> { err })?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let settings = Settings {
        grid: GridSize::resolve(cli.size, cli.grid)?,
        shuffle_swaps: cli.shuffles,
        gap: cli.gap,
        extent: cli.extent,
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(grid = settings.grid.label(), seed = ?cli.seed, "starting");

    if cli.print {
        let size = settings.grid.dimension();
        let mut puzzle = Puzzle::new(size, tile_labels(size))?;
        println!("Solved Puzzle:\n{}", puzzle);

        puzzle.shuffle_with(&mut rng, settings.shuffle_swaps);
        println!("Shuffled Puzzle:\n{}", puzzle);
        println!("Solvable: {}", puzzle.is_solvable());
        return Ok(());
    }

    ui::run(settings, rng)
}
