//! Popcorn Catch headless runner
//!
//! Plays one full session against in-memory collaborators with an autopilot
//! catcher, then prints the summary and the score board. With `--scores` the
//! board is read from and written back to a JSON file.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use glam::Vec2;

use popcorn_catch::platform::{FixedViewport, RecordingSurface, ScoreTally};
use popcorn_catch::sim::ObjectKind;
use popcorn_catch::{Collaborators, HighScores, Profile, Session, SessionConfig};

/// 60 fps frame cadence
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "popcorn-catch", about = "Play one headless popcorn catch session")]
struct Args {
    /// Session preset: quick, standard or full
    #[arg(long, value_parser = parse_profile)]
    profile: Option<Profile>,

    /// Seed for spawn positions
    #[arg(long)]
    seed: Option<u64>,

    /// JSON session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name recorded on the score board
    #[arg(long, default_value = "player")]
    player: String,

    /// Score board file, created if missing
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn parse_profile(name: &str) -> Result<Profile, String> {
    Profile::from_str(name).ok_or_else(|| format!("unknown profile '{name}'"))
}

/// Display x of the lowest good object still above the catcher
fn autopilot(session: &Session) -> Option<Vec2> {
    let catcher_y = session.catcher_body_position()?.y;
    session
        .world()
        .objects()
        .filter(|b| matches!(b.tag(), Some(tag) if tag.kind == ObjectKind::Good))
        .filter(|b| b.pos.y < catcher_y)
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal))
        .map(|b| session.mapper().to_display(b.pos))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::from_profile(args.profile.unwrap_or_default()),
    };
    if let Some(profile) = args.profile.filter(|_| args.config.is_some()) {
        let capacity = profile.slot_capacity();
        config.profile = profile;
        config.slot_capacity.good = capacity;
        config.slot_capacity.bad = capacity;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    log::info!("Profile {}", config.profile.as_str());

    let surface = RecordingSurface::new(config.slot_capacity);
    let viewport = Rc::new(FixedViewport::new(1280.0, 1000.0));
    let tally = ScoreTally::new();
    let mut session = popcorn_catch::start(
        config,
        Collaborators::new(surface.clone(), viewport, tally.clone()),
    )?;

    while session.is_running() {
        if let Some(target) = autopilot(&session) {
            session.drag_catcher(target);
        }
        session.advance(FRAME);
    }
    // Final frame after game over
    session.frame(FRAME);

    let summary = session.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    log::debug!("{} slot transform writes", surface.transform_writes());

    let player = args.player.as_str();
    let mut board = match &args.scores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::new(),
    };
    if board.submit(player, tally.total()) {
        log::info!("New best for {player}: {}", tally.total());
    }
    for (rank, entry) in board.top(10).iter().enumerate() {
        println!("{:>2}. {:<16} {}", rank + 1, entry.player, entry.score);
    }
    if let Some(rank) = board.rank(player) {
        println!("{player} is ranked #{rank} of {}", board.len());
    }
    if let Some(path) = &args.scores {
        board.save(path)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
