/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::{BTreeMap, VecDeque};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::passenger::Passenger;
use crate::shared::PassengerId;

/// Waiting passengers grouped by origin floor, each floor in arrival order.
#[derive(Debug, Default)]
pub struct WaitingRegistry {
    floors: BTreeMap<u8, VecDeque<Passenger>>,
    len: usize,
}

impl WaitingRegistry {
    pub fn new() -> WaitingRegistry {
        WaitingRegistry::default()
    }

    pub fn push(&mut self, passenger: Passenger) {
        self.floors
            .entry(passenger.origin_floor())
            .or_default()
            .push_back(passenger);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn at_floor(&self, floor: u8) -> impl Iterator<Item = &Passenger> {
        self.floors.get(&floor).into_iter().flatten()
    }

    /// Removes a specific waiting passenger, keeping the rest of the queue in order.
    pub fn take(&mut self, floor: u8, id: PassengerId) -> Option<Passenger> {
        let queue = self.floors.get_mut(&floor)?;
        let index = queue.iter().position(|p| p.id() == id)?;
        let passenger = queue.remove(index)?;
        if queue.is_empty() {
            self.floors.remove(&floor);
        }
        self.len -= 1;
        Some(passenger)
    }

    /// Distinct origin floors ordered by their earliest waiting passenger.
    pub fn origin_floors(&self) -> Vec<u8> {
        let mut heads: Vec<(PassengerId, u8)> = self
            .floors
            .iter()
            .filter_map(|(floor, queue)| queue.front().map(|p| (p.id(), *floor)))
            .collect();
        heads.sort();
        heads.into_iter().map(|(_, floor)| floor).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Passenger> {
        self.floors.values().flatten()
    }
}
