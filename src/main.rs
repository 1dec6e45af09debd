//! Cube Runner headless driver
//!
//! Plays runs with a simple autopilot at a simulated 60 Hz, logs the
//! outcome and records finished runs on the leaderboard.

mod headless {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};

    use cube_runner::consts::SIM_DT;
    use cube_runner::platform::{ManualClock, SensorInput, SensorLatch};
    use cube_runner::renderer::RenderFrame;
    use cube_runner::sim::{
        Command, ControlMode, GameSession, Lane, ObstacleKind, SessionEvent, SessionPhase,
        SessionSnapshot, TickInput, VerticalMode,
    };
    use cube_runner::{Leaderboard, Tuning};

    /// Obstacles closer than this (in depth) are reacted to
    const LOOKAHEAD: f32 = 8.0;

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum Control {
        Keyboard,
        /// Distance sensor tracks height continuously
        Sensor,
        /// Distance sensor zones trigger timed jumps and crouches
        SensorZones,
    }

    #[derive(Parser, Debug)]
    #[command(name = "cube-runner")]
    #[command(about = "Run Cube Runner sessions headless with an autopilot", long_about = None)]
    struct Cli {
        /// RNG seed for the first run (defaults to the current time)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of runs to play
        #[arg(short, long, default_value_t = 1)]
        runs: u32,

        /// Give up on a run after this many ticks
        #[arg(long, default_value_t = 5 * 60 * 60)]
        max_ticks: u64,

        /// Control method the autopilot drives
        #[arg(short, long, value_enum, default_value = "keyboard")]
        control: Control,

        /// Tuning JSON (missing file = defaults)
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// Leaderboard file to update
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Name recorded on the leaderboard
        #[arg(short, long, default_value = "autopilot")]
        name: String,
    }

    /// Pick commands for the keyboard path from the current frame
    fn autopilot(snapshot: &SessionSnapshot) -> Vec<Command> {
        let player = &snapshot.player;
        let threat = |lane: Lane| {
            let o = &snapshot.obstacles[lane.index()];
            let ahead = player.z() - o.z;
            (0.0..LOOKAHEAD).contains(&ahead).then_some(o)
        };

        let Some(o) = threat(player.lane) else {
            return Vec::new();
        };
        match o.kind {
            ObstacleKind::Sphere if o.vertical_offset < 0.0 => Vec::new(),
            ObstacleKind::Sphere => vec![Command::Jump],
            ObstacleKind::Wall => {
                let safe = |lane: Lane| threat(lane).is_none_or(|t| t.kind == ObstacleKind::Sphere);
                match (player.lane.left(), player.lane.right()) {
                    (Some(l), _) if safe(l) => vec![Command::MoveLeft],
                    (_, Some(r)) if safe(r) => vec![Command::MoveRight],
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Encode autopilot intent as the sensor device would report it
    fn sensor_lines(commands: &[Command]) -> Vec<String> {
        let x = match commands.first() {
            Some(Command::MoveLeft) => -512,
            Some(Command::MoveRight) => 512,
            _ => 0,
        };
        let distance = if commands.contains(&Command::Jump) { 40.0 } else { 20.0 };
        vec![format!("X:{x}"), format!("Distance: {distance:.1}")]
    }

    fn play_run(
        session: &mut GameSession<ManualClock>,
        clock: &ManualClock,
        control: Control,
        max_ticks: u64,
    ) -> Option<Duration> {
        let mode = match control {
            Control::Keyboard => ControlMode::Keyboard,
            Control::Sensor => ControlMode::Sensor {
                vertical: VerticalMode::Continuous,
            },
            Control::SensorZones => ControlMode::Sensor {
                vertical: VerticalMode::Discrete,
            },
        };
        session.select_control(mode);

        let latch = SensorLatch::new();
        let mut sensor = SensorInput::new(
            session.tuning().sensor.clone(),
            session.tuning().player.neutral_y,
            mode.vertical_mode(),
        );
        let frame = Duration::from_secs_f32(SIM_DT);

        for _ in 0..max_ticks {
            clock.advance(frame);
            let commands = autopilot(&session.snapshot());
            let input = match control {
                Control::Keyboard => TickInput::with_commands(commands),
                Control::Sensor | Control::SensorZones => {
                    for line in sensor_lines(&commands) {
                        // The encoder only emits well-formed lines
                        let _ = latch.push_line(&line);
                    }
                    sensor.next_input(&latch.latest())
                }
            };

            match session.tick(&input) {
                Some(SessionEvent::RunEnded { elapsed, formatted }) => {
                    log::info!("Game over at {formatted}");
                    return Some(elapsed);
                }
                Some(event) => log::debug!("{event:?}"),
                None => {}
            }

            if session.phase() == SessionPhase::Running && session.run_ticks().is_multiple_of(600) {
                let render = RenderFrame::from_session(session);
                log::info!(
                    "t={} player={:?} obstacles={}",
                    render.hud_time,
                    render.player.position,
                    render.obstacles.len()
                );
            }
        }
        log::warn!("Run still alive after {max_ticks} ticks, giving up");
        None
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Cube Runner (headless) starting...");

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => Tuning::default(),
        };
        let mut board = match &cli.scores {
            Some(path) => Leaderboard::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => Leaderboard::new(),
        };

        let seed = cli.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        log::info!("Session seed: {seed}");

        let clock = ManualClock::new();
        let mut session = GameSession::new(tuning, clock.clone(), seed);

        for run in 1..=cli.runs {
            if let Some(elapsed) = play_run(&mut session, &clock, cli.control, cli.max_ticks) {
                let rank = board.add_score(&cli.name, elapsed);
                println!("run {run}: {} (rank {rank:?})", cube_runner::sim::format_elapsed(elapsed));
            } else {
                println!("run {run}: survived {} ticks", session.run_ticks());
            }
            if session.phase() == SessionPhase::Ended {
                // Let the game-over frame play out so the next selection is accepted
                while session.tick(&TickInput::default()) != Some(SessionEvent::ReturnedToSelection) {}
            } else {
                let next = session.seed().wrapping_add(1);
                session = GameSession::new(session.tuning().clone(), clock.clone(), next);
            }
        }

        if let Some(path) = &cli.scores {
            board.save(path).with_context(|| format!("saving {}", path.display()))?;
        }
        for (i, entry) in board.entries.iter().enumerate() {
            println!("{:>2}. {:<12} {}", i + 1, entry.name, entry.formatted());
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    headless::run()
}
