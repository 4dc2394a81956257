/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::BuildingConfig;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassengerId(pub u64);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Travel direction of a passenger, fixed when the passenger is created.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn between(origin: u8, destination: u8) -> Direction {
        if destination > origin {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Motion as reported to the presentation layer.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Stopped,
    Up,
    Down,
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Motion::Stopped => "Stopped",
            Motion::Up => "Up",
            Motion::Down => "Down",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CabinStatus {
    #[serde(rename = "currentFloor")]
    pub current_floor: f64,
    pub motion: Motion,
    pub occupancy: usize,
    pub capacity: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PassengerView {
    pub id: PassengerId,
    #[serde(rename = "originFloor")]
    pub origin_floor: u8,
    #[serde(rename = "destinationFloor")]
    pub destination_floor: u8,
    pub boarded: bool,
    pub direction: Direction,
}

/// Result of one floor-arrival protocol.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrivalReport {
    pub floor: u8,
    pub alighted: Vec<PassengerId>,
    pub boarded: Vec<PassengerId>,
    pub direction: Option<Direction>,
}

/// Everything a renderer needs to draw one frame.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationStatus {
    pub cabin: CabinStatus,
    pub state: String,
    #[serde(rename = "autoDispatch")]
    pub auto_dispatch: bool,
    #[serde(rename = "autoSpawn")]
    pub auto_spawn: bool,
    pub waiting: usize,
    pub spawned: u64,
    pub delivered: u64,
    pub passengers: Vec<PassengerView>,
    #[serde(rename = "lastArrival")]
    pub last_arrival: Option<ArrivalReport>,
}

/// User intents forwarded from the presentation layer into the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    RequestFloor(u8),
    AddPassengers(usize),
    SetAutoDispatch(bool),
    SetAutoSpawn {
        enabled: bool,
        min_interval: Duration,
        max_interval: Duration,
    },
    Reconfigure(BuildingConfig),
    PublishStatus,
}
