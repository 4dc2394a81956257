/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, PassengerId, PassengerView, SimError};

/**
 * One rider in the building.
 *
 * Origin, destination and direction never change after creation. The `boarded` flag
 * is flipped by the cabin's boarding primitive. Ownership of a passenger moves from the
 * waiting registry into the cabin and is dropped on alighting, so a passenger can never be
 * in both places at once.
 */
#[derive(Debug, PartialEq, Eq)]
pub struct Passenger {
    id: PassengerId,
    origin_floor: u8,
    destination_floor: u8,
    direction: Direction,
    boarded: bool,
}

impl Passenger {
    pub fn new(
        id: PassengerId,
        origin_floor: u8,
        destination_floor: u8,
    ) -> Result<Passenger, SimError> {
        if origin_floor == destination_floor {
            return Err(SimError::DuplicateOriginDestination { floor: origin_floor });
        }

        Ok(Passenger {
            id,
            origin_floor,
            destination_floor,
            direction: Direction::between(origin_floor, destination_floor),
            boarded: false,
        })
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn origin_floor(&self) -> u8 {
        self.origin_floor
    }

    pub fn destination_floor(&self) -> u8 {
        self.destination_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn set_boarded(&mut self, boarded: bool) {
        self.boarded = boarded;
    }

    pub fn view(&self) -> PassengerView {
        PassengerView {
            id: self.id,
            origin_floor: self.origin_floor,
            destination_floor: self.destination_floor,
            boarded: self.boarded,
            direction: self.direction,
        }
    }
}
