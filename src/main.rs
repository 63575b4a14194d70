use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

use plankster::animation::ClipLibrary;
use plankster::command::Command;
use plankster::config::{self, MascotConfig};
use plankster::feedback::FeedbackBoard;
use plankster::{MascotSession, RenderFrame, StatusUpdate};

/// One JSON line on stdout.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputLine<'a> {
    Status(&'a StatusUpdate),
    Frame { tick: u64, frame: &'a RenderFrame },
    MessageCleared { message: String },
}

fn emit(out: &mut impl Write, line: &OutputLine<'_>) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Forward stdin lines as commands until EOF.
fn read_commands(tx: Sender<Command>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(cmd) => {
                if tx.send(cmd).is_err() {
                    break;
                }
            }
            Err(e) => warn!(line = %line, error = %e, "ignoring input"),
        }
    }
}

fn clip_library(cfg: &MascotConfig) -> ClipLibrary {
    ClipLibrary::new(cfg.animation.clips.clone())
}

fn run(cfg: &MascotConfig, commands: Receiver<Command>) -> anyhow::Result<()> {
    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = MascotSession::spawn(cfg, clip_library(cfg), rng);
    let mut feedback = FeedbackBoard::new();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let frame_time = Duration::from_secs_f64(1.0 / cfg.output.fps as f64);
    let mut last = Instant::now();
    let mut tick: u64 = 0;

    'frames: loop {
        // Drain input before simulating so pointer overrides win this frame.
        loop {
            let cmd = match commands.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("input closed");
                    break 'frames;
                }
            };

            let status = match cmd {
                Command::Feed => Some(session.feed()),
                Command::Provoke => Some(session.provoke()),
                Command::Scam => Some(session.toggle_scam()),
                Command::PointerDown(ndc) => {
                    session.pointer_down(ndc);
                    None
                }
                Command::PointerMove(ndc) => {
                    session.pointer_move(ndc);
                    None
                }
                Command::PointerUp(ndc) => {
                    session.pointer_up(ndc);
                    None
                }
                Command::Reload => {
                    session.reload_model(clip_library(cfg));
                    None
                }
                Command::Unload => {
                    session.unload_model();
                    None
                }
                Command::Quit => break 'frames,
            };

            if let Some(status) = status {
                feedback.post(status.message.clone(), status.message_ttl(), Instant::now());
                emit(&mut out, &OutputLine::Status(&status))?;
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        let frame = session.tick(dt);
        tick += 1;

        if cfg.output.frame_every > 0 && tick % cfg.output.frame_every == 0 {
            emit(&mut out, &OutputLine::Frame { tick, frame: &frame })?;
        }
        if let Some(message) = feedback.expire(now) {
            emit(&mut out, &OutputLine::MessageCleared { message })?;
        }

        let spent = now.elapsed();
        if spent < frame_time {
            std::thread::sleep(frame_time - spent);
        }
    }

    info!(
        level = session.mascot().level(),
        mood = %session.mascot().mood(),
        ticks = tick,
        "session ended"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Init tracing to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("plankster starting");

    let cfg = config::load();
    info!(name = %cfg.identity.name, seed = ?cfg.seed, fps = cfg.output.fps, "config loaded");

    let (tx, rx) = unbounded::<Command>();
    std::thread::spawn(move || read_commands(tx));

    run(&cfg, rx)
}
