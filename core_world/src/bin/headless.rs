use std::io::{self, BufRead};
use std::num::{ParseFloatError, ParseIntError};
use std::thread;

use bevy::app::{App, Update};
use crossbeam_channel::{unbounded, Receiver};
use thiserror::Error;
use tracing::{info, warn};

use core_world::metrics::{collect_metrics, EngineMetrics};
use core_world::{
    build_headless_app, event_bridge, run_frame, CellId, EventSender, InteractionLog,
    SnapshotHistory, ViewBounds, WinState, WorldPos,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut app = build_headless_app();
    app.insert_resource(EngineMetrics::default());
    app.add_systems(Update, collect_metrics);

    let (sender, inbox) = event_bridge();
    app.insert_resource(inbox);

    let command_rx = spawn_stdin_listener();

    info!(target: "waymark::server", "Waymark headless driver ready");
    eprintln!("commands: move x y | view west south east north | pickup i j | place i j | run [n] | state | metrics | quit");

    let mut announced_win = false;
    while let Ok(line) = command_rx.recv() {
        match parse_command_line(&line) {
            Ok(DriverCommand::Quit) => break,
            Ok(command) => {
                dispatch(&mut app, &sender, command);
                announce_win_transition(&app, &mut announced_win);
            }
            Err(CommandParseError::Empty) => {}
            Err(err) => eprintln!("error: {err}"),
        }
    }

    info!(target: "waymark::server", "Waymark headless driver stopped");
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DriverCommand {
    Move { x: f64, y: f64 },
    View { west: f64, south: f64, east: f64, north: f64 },
    Pickup { cell: CellId },
    Place { cell: CellId },
    Run { frames: u32 },
    State,
    Metrics,
    Quit,
}

#[derive(Debug, Error)]
enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("invalid float '{value}' for {context}: {source}")]
    InvalidFloat {
        value: String,
        context: &'static str,
        source: ParseFloatError,
    },
}

fn parse_command_line(input: &str) -> Result<DriverCommand, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts
        .next()
        .map(|v| v.to_ascii_lowercase())
        .ok_or(CommandParseError::Empty)?;

    match verb.as_str() {
        "move" => {
            let x = parse_f64(next_arg(&mut parts, "x")?, "move x")?;
            let y = parse_f64(next_arg(&mut parts, "y")?, "move y")?;
            Ok(DriverCommand::Move { x, y })
        }
        "view" => {
            let west = parse_f64(next_arg(&mut parts, "west")?, "view west")?;
            let south = parse_f64(next_arg(&mut parts, "south")?, "view south")?;
            let east = parse_f64(next_arg(&mut parts, "east")?, "view east")?;
            let north = parse_f64(next_arg(&mut parts, "north")?, "view north")?;
            Ok(DriverCommand::View {
                west,
                south,
                east,
                north,
            })
        }
        "pickup" => Ok(DriverCommand::Pickup {
            cell: parse_cell(&mut parts)?,
        }),
        "place" => Ok(DriverCommand::Place {
            cell: parse_cell(&mut parts)?,
        }),
        "run" => {
            let frames = match parts.next() {
                Some(raw) => parse_u32(raw, "run frames")?,
                None => 1,
            };
            Ok(DriverCommand::Run { frames })
        }
        "state" => Ok(DriverCommand::State),
        "metrics" => Ok(DriverCommand::Metrics),
        "quit" | "exit" => Ok(DriverCommand::Quit),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn next_arg<'a>(
    parts: &mut std::str::SplitWhitespace<'a>,
    name: &'static str,
) -> Result<&'a str, CommandParseError> {
    parts.next().ok_or(CommandParseError::MissingArgument(name))
}

fn parse_cell(parts: &mut std::str::SplitWhitespace<'_>) -> Result<CellId, CommandParseError> {
    let i = parse_i64(next_arg(parts, "cell i")?, "cell i")?;
    let j = parse_i64(next_arg(parts, "cell j")?, "cell j")?;
    Ok(CellId::new(i, j))
}

fn parse_f64(raw: &str, context: &'static str) -> Result<f64, CommandParseError> {
    raw.parse().map_err(|source| CommandParseError::InvalidFloat {
        value: raw.to_string(),
        context,
        source,
    })
}

fn parse_i64(raw: &str, context: &'static str) -> Result<i64, CommandParseError> {
    raw.parse()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: raw.to_string(),
            context,
            source,
        })
}

fn parse_u32(raw: &str, context: &'static str) -> Result<u32, CommandParseError> {
    raw.parse()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: raw.to_string(),
            context,
            source,
        })
}

fn dispatch(app: &mut App, sender: &EventSender, command: DriverCommand) {
    match command {
        DriverCommand::Move { x, y } => {
            sender.player_moved(WorldPos::from_f64(x, y));
            drive_frame(app);
        }
        DriverCommand::View {
            west,
            south,
            east,
            north,
        } => {
            sender.viewport_changed(ViewBounds::from_f64(west, south, east, north));
            drive_frame(app);
        }
        DriverCommand::Pickup { cell } => {
            sender.request_pickup(cell);
            drive_frame(app);
        }
        DriverCommand::Place { cell } => {
            sender.request_place(cell);
            drive_frame(app);
        }
        DriverCommand::Run { frames } => {
            for _ in 0..frames {
                drive_frame(app);
            }
        }
        DriverCommand::State => print_state(app),
        DriverCommand::Metrics => {
            let metrics = app.world.resource::<EngineMetrics>();
            println!("{metrics:?}");
        }
        DriverCommand::Quit => {}
    }
}

fn drive_frame(app: &mut App) {
    run_frame(app);
    let log = app.world.resource::<InteractionLog>();
    for (request, result) in &log.receipts {
        match result {
            Ok(receipt) => match receipt.crafted {
                Some(value) => println!(
                    "ok: merged token {} at {} into {}",
                    receipt.token, receipt.cell, value
                ),
                None => println!("ok: picked up token {} at {}", receipt.token, receipt.cell),
            },
            Err(err) => println!("rejected: {} at {}: {}", kind_name(request.kind), request.cell, err),
        }
    }
}

fn kind_name(kind: core_world::InteractionKind) -> &'static str {
    match kind {
        core_world::InteractionKind::Pickup => "pickup",
        core_world::InteractionKind::Place => "place",
    }
}

fn announce_win_transition(app: &App, announced: &mut bool) {
    if *announced {
        return;
    }
    let win = app.world.resource::<WinState>();
    if win.won {
        *announced = true;
        if let Some(record) = win.achieved {
            println!(
                "victory: crafted {} at {} on tick {}",
                record.value, record.cell, record.tick
            );
        }
    }
}

fn print_state(app: &App) {
    let history = app.world.resource::<SnapshotHistory>();
    match &history.last_snapshot {
        Some(snapshot) => match world_proto::encode_snapshot_json(snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!(target: "waymark::server", error = %err, "snapshot.encode_failed"),
        },
        None => println!("no snapshot yet; issue a command or `run` first"),
    }
}

fn spawn_stdin_listener() -> Receiver<String> {
    let (sender, receiver) = unbounded::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(target: "waymark::server", error = %err, "stdin.read_failed");
                    break;
                }
            }
        }
    });
    receiver
}
