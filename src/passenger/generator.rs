/***************************************/
/*        3rd party libraries          */
/***************************************/
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::passenger::Passenger;
use crate::shared::{PassengerId, SimError};

/**
 * Produces passengers with uniformly random origin and destination floors.
 *
 * The destination is resampled until it differs from the origin. Passenger ids are handed
 * out in increasing order, which the waiting registry relies on for arrival ordering.
 */
pub struct PopulationGenerator {
    rng: StdRng,
    next_id: u64,
}

impl PopulationGenerator {
    pub fn new(seed: Option<u64>) -> PopulationGenerator {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        PopulationGenerator { rng, next_id: 0 }
    }

    pub fn generate(&mut self, count: usize, floors: u8) -> Result<Vec<Passenger>, SimError> {
        if floors < 2 {
            return Err(SimError::SingleFloorBuilding);
        }

        let mut passengers = Vec::with_capacity(count);
        for _ in 0..count {
            let origin = self.rng.gen_range(1..=floors);
            let mut destination = self.rng.gen_range(1..=floors);
            while destination == origin {
                destination = self.rng.gen_range(1..=floors);
            }

            let id = PassengerId(self.next_id);
            self.next_id += 1;
            passengers.push(Passenger::new(id, origin, destination)?);
        }
        Ok(passengers)
    }

    /// Uniform sample from `[min, max]`, used to schedule the next automatic spawn.
    pub fn sample_interval(&mut self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let millis = self.rng.gen_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}
