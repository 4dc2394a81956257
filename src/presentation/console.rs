use crate::config::{BuildingConfig, SpawnConfig};
use crate::shared::Intent;
use crossbeam_channel as cbc;
use log::{info, warn};
use std::io::BufRead;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' is missing an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument '{0}'")]
    InvalidArgument(String),
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Intent(Intent),
    Quit,
}

/**
 * Headless stand-in for the call buttons and control panel.
 *
 * Reads one command per line and forwards it as an intent to the simulation thread.
 * End of input counts as `quit`.
 *
 * # Fields
 * - `intent_tx`:       Sends parsed intents to the simulation.
 * - `terminate_tx`:    Stops the simulation on `quit`.
 * - `spawn_defaults`:  Interval used by `spawn on` without explicit bounds.
 */
pub struct ElevatorConsole {
    intent_tx: cbc::Sender<Intent>,
    terminate_tx: cbc::Sender<()>,
    spawn_defaults: SpawnConfig,
}

impl ElevatorConsole {
    pub fn new(
        spawn_defaults: SpawnConfig,
        intent_tx: cbc::Sender<Intent>,
        terminate_tx: cbc::Sender<()>,
    ) -> ElevatorConsole {
        ElevatorConsole {
            intent_tx,
            terminate_tx,
            spawn_defaults,
        }
    }

    pub fn run<R: BufRead>(self, input: R) {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Error reading input: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line, &self.spawn_defaults) {
                Ok(Command::Intent(intent)) => {
                    if self.intent_tx.send(intent).is_err() {
                        return;
                    }
                }
                Ok(Command::Quit) => break,
                Err(e) => warn!("{}", e),
            }
        }

        info!("Console closed");
        let _ = self.terminate_tx.send(());
    }
}

pub fn parse_command(line: &str, spawn_defaults: &SpawnConfig) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(CommandError::Empty)?;
    let args: Vec<&str> = words.collect();

    let intent = match verb {
        "call" => Intent::RequestFloor(parse_arg(&args, 0, "call")?),
        "add" => Intent::AddPassengers(parse_arg(&args, 0, "add")?),
        "auto" => Intent::SetAutoDispatch(parse_switch(&args, "auto")?),
        "spawn" => {
            let enabled = parse_switch(&args, "spawn")?;
            let (min_interval, max_interval) = if args.len() >= 3 {
                (
                    Duration::from_millis(parse_arg(&args, 1, "spawn")?),
                    Duration::from_millis(parse_arg(&args, 2, "spawn")?),
                )
            } else {
                (spawn_defaults.min_interval(), spawn_defaults.max_interval())
            };
            if min_interval > max_interval {
                return Err(CommandError::InvalidArgument(format!(
                    "{}..{}",
                    min_interval.as_millis(),
                    max_interval.as_millis()
                )));
            }
            Intent::SetAutoSpawn {
                enabled,
                min_interval,
                max_interval,
            }
        }
        "reconfigure" => Intent::Reconfigure(BuildingConfig {
            floors: parse_arg(&args, 0, "reconfigure")?,
            capacity: parse_arg(&args, 1, "reconfigure")?,
            move_duration_ms: parse_arg(&args, 2, "reconfigure")?,
        }),
        "status" => Intent::PublishStatus,
        "quit" | "exit" => return Ok(Command::Quit),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Intent(intent))
}

fn parse_arg<T: std::str::FromStr>(
    args: &[&str],
    index: usize,
    verb: &'static str,
) -> Result<T, CommandError> {
    let arg = args.get(index).ok_or(CommandError::MissingArgument(verb))?;
    arg.parse()
        .map_err(|_| CommandError::InvalidArgument(arg.to_string()))
}

fn parse_switch(args: &[&str], verb: &'static str) -> Result<bool, CommandError> {
    match args.first() {
        Some(&"on") => Ok(true),
        Some(&"off") => Ok(false),
        Some(other) => Err(CommandError::InvalidArgument(other.to_string())),
        None => Err(CommandError::MissingArgument(verb)),
    }
}
