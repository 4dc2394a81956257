/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{BuildingConfig, DispatchConfig};
use crate::elevator::cabin::{Cabin, MoveCommand};
use crate::passenger::{Passenger, WaitingRegistry};
use crate::shared::{ArrivalReport, Direction, PassengerId, PassengerView, SimError, Timer};

/// The cabin starts every run on this floor.
pub const GROUND_FLOOR: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    EnRoute(u8),
    Servicing(u8),
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::EnRoute(floor) => write!(f, "enRoute({})", floor),
            EngineState::Servicing(floor) => write!(f, "servicing({})", floor),
        }
    }
}

#[derive(Debug)]
enum ServicePhase {
    Alighting {
        leaving: Vec<PassengerId>,
        until: Instant,
    },
    Boarding {
        queue: VecDeque<PassengerId>,
        next_at: Instant,
    },
}

#[derive(Debug)]
struct Service {
    phase: ServicePhase,
    report: ArrivalReport,
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    alight: Duration,
    board: Duration,
    dispatch_delay: Duration,
}

/**
 * Scheduling brain of the simulation.
 *
 * Decides where the cabin goes next and runs the floor-arrival protocol: every occupant
 * bound for the floor alights first, then waiting passengers heading in the pickup direction
 * board one at a time until the cabin is full. With auto-dispatch enabled the engine picks the
 * nearest useful floor after every arrival.
 *
 * The engine never reads a clock. Every call takes `now`, so the same code runs under the
 * event loop and under tests with synthetic instants.
 *
 * # Fields
 * - `cabin`:           The elevator car.
 * - `waiting`:         Passengers waiting on their origin floor.
 * - `floors`:          Number of floors, numbered from 1.
 * - `state`:           Current engine state.
 * - `service`:         In-progress arrival protocol while `Servicing`.
 * - `auto_dispatch`:   Continuous auto-dispatch mode.
 * - `dispatch_timer`:  Delay between settling and choosing the next automatic target.
 * - `last_arrival`:    Report of the most recent completed arrival protocol.
 * - `delivered`:       Passengers that reached their destination.
 */
#[derive(Debug)]
pub struct DispatchEngine {
    cabin: Cabin,
    waiting: WaitingRegistry,
    floors: u8,
    state: EngineState,
    service: Option<Service>,
    auto_dispatch: bool,
    dispatch_timer: Timer,
    timing: Timing,
    last_arrival: Option<ArrivalReport>,
    delivered: u64,
}

impl DispatchEngine {
    pub fn new(
        building: &BuildingConfig,
        dispatch: &DispatchConfig,
        now: Instant,
    ) -> DispatchEngine {
        let mut cabin = Cabin::new(GROUND_FLOOR, building.capacity, building.move_duration());
        cabin.move_to(GROUND_FLOOR, true, now);

        DispatchEngine {
            cabin,
            waiting: WaitingRegistry::new(),
            floors: building.floors,
            state: EngineState::Idle,
            service: None,
            auto_dispatch: false,
            dispatch_timer: Timer::new(),
            timing: Timing {
                alight: dispatch.alight_duration(),
                board: dispatch.board_duration(),
                dispatch_delay: dispatch.dispatch_delay(),
            },
            last_arrival: None,
            delivered: 0,
        }
    }

    /***************************************/
    /*              Queries                */
    /***************************************/
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn cabin(&self) -> &Cabin {
        &self.cabin
    }

    pub fn waiting(&self) -> &WaitingRegistry {
        &self.waiting
    }

    pub fn floors(&self) -> u8 {
        self.floors
    }

    pub fn auto_dispatch(&self) -> bool {
        self.auto_dispatch
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn last_arrival(&self) -> Option<&ArrivalReport> {
        self.last_arrival.as_ref()
    }

    /// Boarded passengers first, then waiting passengers.
    pub fn passenger_views(&self) -> Vec<PassengerView> {
        self.cabin
            .occupants()
            .iter()
            .chain(self.waiting.iter())
            .map(Passenger::view)
            .collect()
    }

    /***************************************/
    /*              Intents                */
    /***************************************/

    /// Sends the cabin to `floor`. Returns false when the request is dropped.
    pub fn request_floor(&mut self, floor: u8, now: Instant) -> bool {
        if let Err(e) = self.validate_request(floor) {
            debug!("{}", e);
            return false;
        }

        match self.cabin.move_to(floor, false, now) {
            MoveCommand::Started => {
                info!("Cabin leaving floor {} for floor {}", self.cabin.rounded_floor(), floor);
                self.state = EngineState::EnRoute(floor);
                self.dispatch_timer.stop();
                true
            }
            MoveCommand::Ignored | MoveCommand::Teleported => false,
        }
    }

    pub fn add_passengers(&mut self, passengers: Vec<Passenger>, now: Instant) {
        for passenger in passengers {
            debug!(
                "Passenger {} waiting at floor {} for floor {}",
                passenger.id(),
                passenger.origin_floor(),
                passenger.destination_floor()
            );
            self.waiting.push(passenger);
        }

        if self.auto_dispatch
            && self.state == EngineState::Idle
            && !self.dispatch_timer.is_active()
        {
            self.dispatch_timer.start(now, self.timing.dispatch_delay);
        }
    }

    pub fn set_auto_dispatch(&mut self, enabled: bool, now: Instant) {
        if self.auto_dispatch == enabled {
            return;
        }
        info!("Auto dispatch {}", if enabled { "enabled" } else { "disabled" });
        self.auto_dispatch = enabled;

        if enabled {
            self.dispatch_next(now);
        } else {
            self.dispatch_timer.stop();
        }
    }

    /***************************************/
    /*             Event loop              */
    /***************************************/

    /// Advances movement, the arrival protocol and the dispatch timer up to `now`.
    pub fn step(&mut self, now: Instant) -> Result<(), SimError> {
        loop {
            let progressed = match self.state {
                EngineState::EnRoute(_) => match self.cabin.tick(now) {
                    Some(floor) => {
                        self.begin_service(floor, now);
                        true
                    }
                    None => false,
                },
                EngineState::Servicing(floor) => self.advance_service(floor, now)?,
                EngineState::Idle => {
                    self.dispatch_timer.fire(now) && self.dispatch_next(now)
                }
            };

            if !progressed {
                return Ok(());
            }
        }
    }

    /// Earliest instant at which `step` has work to do, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (&self.state, &self.service) {
            (EngineState::Servicing(_), Some(service)) => match &service.phase {
                ServicePhase::Alighting { until, .. } => Some(*until),
                ServicePhase::Boarding { next_at, .. } => Some(*next_at),
            },
            (EngineState::Idle, _) => self.dispatch_timer.deadline(),
            _ => None,
        }
    }

    /// Nearest useful floor: an occupant destination if anyone is aboard, otherwise a waiting
    /// passenger's origin. Ties go to the first candidate encountered.
    pub fn next_target(&self) -> Option<u8> {
        let current = self.cabin.rounded_floor();
        let candidates: Vec<u8> = if self.cabin.occupancy() > 0 {
            self.cabin
                .occupants()
                .iter()
                .map(Passenger::destination_floor)
                .collect()
        } else if self.waiting.is_empty() {
            return None;
        } else {
            self.waiting.origin_floors()
        };

        let mut target = None;
        let mut min_distance = u8::MAX;
        for floor in candidates {
            let distance = floor.abs_diff(current);
            if distance > 0 && distance < min_distance {
                min_distance = distance;
                target = Some(floor);
            }
        }
        target
    }

    /***************************************/
    /*          Private functions          */
    /***************************************/
    fn validate_request(&self, floor: u8) -> Result<(), SimError> {
        let reason = if floor < 1 || floor > self.floors {
            Some("outside the building")
        } else if floor == self.cabin.rounded_floor() {
            Some("cabin is already there")
        } else if self.state != EngineState::Idle {
            Some("cabin is busy")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SimError::InvalidFloorRequest {
                floor,
                floors: self.floors,
                reason,
            }),
            None => Ok(()),
        }
    }

    fn dispatch_next(&mut self, now: Instant) -> bool {
        if !self.auto_dispatch || self.state != EngineState::Idle {
            return false;
        }
        match self.next_target() {
            Some(target) => {
                debug!("Auto dispatch chose floor {}", target);
                self.request_floor(target, now)
            }
            None => false,
        }
    }

    fn begin_service(&mut self, floor: u8, now: Instant) {
        info!("Cabin arrived at floor {}", floor);
        self.state = EngineState::Servicing(floor);

        let leaving: Vec<PassengerId> = self
            .cabin
            .occupants()
            .iter()
            .filter(|p| p.destination_floor() == floor)
            .map(Passenger::id)
            .collect();

        let mut report = ArrivalReport {
            floor,
            ..ArrivalReport::default()
        };

        self.service = Some(if leaving.is_empty() {
            let (phase, direction) = self.boarding_phase(floor, now);
            report.direction = direction;
            Service { phase, report }
        } else {
            Service {
                phase: ServicePhase::Alighting {
                    leaving,
                    until: now + self.timing.alight,
                },
                report,
            }
        });
    }

    fn advance_service(&mut self, floor: u8, now: Instant) -> Result<bool, SimError> {
        let mut service = match self.service.take() {
            Some(service) => service,
            None => {
                self.finish_service(None, now);
                return Ok(true);
            }
        };

        let progressed = match &mut service.phase {
            ServicePhase::Alighting { leaving, until } => {
                if now < *until {
                    false
                } else {
                    // Every alighting passenger leaves before anyone boards.
                    for id in leaving.drain(..) {
                        let passenger = self.cabin.alight(id)?;
                        info!(
                            "Passenger {} delivered to floor {}",
                            passenger.id(),
                            passenger.destination_floor()
                        );
                        service.report.alighted.push(passenger.id());
                        self.delivered += 1;
                    }
                    let (phase, direction) = self.boarding_phase(floor, now);
                    service.phase = phase;
                    service.report.direction = direction;
                    true
                }
            }
            ServicePhase::Boarding { queue, next_at } => {
                if queue.is_empty() || self.cabin.is_full() {
                    self.finish_service(Some(service.report), now);
                    return Ok(true);
                }
                if now < *next_at {
                    false
                } else {
                    if let Some(id) = queue.pop_front() {
                        if let Some(passenger) = self.waiting.take(floor, id) {
                            info!(
                                "Passenger {} boarded at floor {} for floor {}",
                                passenger.id(),
                                floor,
                                passenger.destination_floor()
                            );
                            self.cabin.board(passenger)?;
                            service.report.boarded.push(id);
                        }
                    }
                    *next_at += self.timing.board;
                    true
                }
            }
        };

        self.service = Some(service);
        Ok(progressed)
    }

    /// Chooses the pickup direction and the passengers allowed to board.
    fn boarding_phase(&self, floor: u8, now: Instant) -> (ServicePhase, Option<Direction>) {
        let direction = self.pickup_direction(floor);
        let queue: VecDeque<PassengerId> = self
            .waiting
            .at_floor(floor)
            .filter(|p| direction.map_or(true, |d| p.direction() == d))
            .map(Passenger::id)
            .take(self.cabin.free_slots())
            .collect();

        debug!(
            "Floor {} pickup direction {:?}, {} passenger(s) to board",
            floor,
            direction,
            queue.len()
        );

        let phase = ServicePhase::Boarding {
            queue,
            next_at: now + self.timing.board,
        };
        (phase, direction)
    }

    /// Occupants keep their direction. An empty cabin follows the majority waiting on the
    /// floor, ties going up. `None` means nobody is constrained.
    pub fn pickup_direction(&self, floor: u8) -> Option<Direction> {
        let occupants = self.cabin.occupants();
        if occupants.iter().any(|p| p.destination_floor() > floor) {
            return Some(Direction::Up);
        }
        if occupants.iter().any(|p| p.destination_floor() < floor) {
            return Some(Direction::Down);
        }

        let (up, down) = self
            .waiting
            .at_floor(floor)
            .fold((0usize, 0usize), |(up, down), p| match p.direction() {
                Direction::Up => (up + 1, down),
                Direction::Down => (up, down + 1),
            });

        match (up, down) {
            (0, 0) => None,
            (up, down) if up >= down => Some(Direction::Up),
            _ => Some(Direction::Down),
        }
    }

    fn finish_service(&mut self, report: Option<ArrivalReport>, now: Instant) {
        if let Some(report) = report {
            self.last_arrival = Some(report);
        }
        self.service = None;
        self.state = EngineState::Idle;

        if self.auto_dispatch {
            self.dispatch_timer.start(now, self.timing.dispatch_delay);
        }
    }
}
