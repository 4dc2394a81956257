/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::passenger::Passenger;
use crate::shared::{CabinStatus, Motion, PassengerId, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    /// Cabin was already moving, nothing changed.
    Ignored,
    /// Forced move, cabin placed on the target floor instantly.
    Teleported,
    /// Movement started, completion is reported by `tick`.
    Started,
}

#[derive(Debug, Clone, Copy)]
struct Movement {
    from: f64,
    target: u8,
    started: Instant,
}

/**
 * The elevator car.
 *
 * Owns the current (possibly fractional) floor, the in-flight movement and the boarded passengers
 * in boarding order. `current_floor` only changes through `move_to`/`tick`, the occupant list
 * only through `board`/`alight`.
 *
 * # Fields
 * - `current_floor`:   Position of the cabin, interpolated while moving.
 * - `movement`:        The in-flight movement, if any.
 * - `occupants`:       Boarded passengers, never more than `capacity`.
 * - `capacity`:        Maximum number of occupants.
 * - `move_duration`:   Time a single movement takes regardless of distance.
 */
#[derive(Debug)]
pub struct Cabin {
    current_floor: f64,
    movement: Option<Movement>,
    occupants: Vec<Passenger>,
    capacity: usize,
    move_duration: Duration,
}

impl Cabin {
    pub fn new(initial_floor: u8, capacity: usize, move_duration: Duration) -> Cabin {
        Cabin {
            current_floor: f64::from(initial_floor),
            movement: None,
            occupants: Vec::with_capacity(capacity),
            capacity,
            move_duration,
        }
    }

    /// Floor used for every logical decision.
    pub fn rounded_floor(&self) -> u8 {
        self.current_floor.round() as u8
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }

    pub fn occupants(&self) -> &[Passenger] {
        &self.occupants
    }

    pub fn occupancy(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.capacity
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.occupants.len())
    }

    /// Starts a movement. A second command while moving is dropped unless forced.
    pub fn move_to(&mut self, target: u8, forced: bool, now: Instant) -> MoveCommand {
        if forced {
            self.movement = None;
            self.current_floor = f64::from(target);
            return MoveCommand::Teleported;
        }
        if self.is_moving() {
            return MoveCommand::Ignored;
        }

        self.movement = Some(Movement {
            from: self.current_floor,
            target,
            started: now,
        });
        MoveCommand::Started
    }

    /// Advances the movement. Returns the reached floor exactly once, when the move completes.
    pub fn tick(&mut self, now: Instant) -> Option<u8> {
        let movement = self.movement?;
        let elapsed = now.saturating_duration_since(movement.started);

        if elapsed >= self.move_duration {
            self.current_floor = f64::from(movement.target);
            self.movement = None;
            return Some(movement.target);
        }

        let progress = elapsed.as_secs_f64() / self.move_duration.as_secs_f64();
        let span = f64::from(movement.target) - movement.from;
        self.current_floor = movement.from + span * progress;
        None
    }

    pub fn board(&mut self, mut passenger: Passenger) -> Result<(), SimError> {
        if self.is_full() {
            return Err(SimError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        passenger.set_boarded(true);
        self.occupants.push(passenger);
        Ok(())
    }

    pub fn alight(&mut self, id: PassengerId) -> Result<Passenger, SimError> {
        let index = self
            .occupants
            .iter()
            .position(|p| p.id() == id)
            .ok_or(SimError::PassengerNotAboard(id))?;
        let mut passenger = self.occupants.remove(index);
        passenger.set_boarded(false);
        Ok(passenger)
    }

    pub fn status_snapshot(&self) -> CabinStatus {
        let motion = match self.movement {
            Some(movement) if f64::from(movement.target) > self.current_floor => Motion::Up,
            Some(movement) if f64::from(movement.target) < self.current_floor => Motion::Down,
            Some(movement) if f64::from(movement.target) >= movement.from => Motion::Up,
            Some(_) => Motion::Down,
            None => Motion::Stopped,
        };

        CabinStatus {
            current_floor: self.current_floor,
            motion,
            occupancy: self.occupants.len(),
            capacity: self.capacity,
        }
    }
}
