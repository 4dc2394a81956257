/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::passenger::PopulationGenerator;
use crate::shared::Timer;

/**
 * Schedules automatic passenger spawns.
 *
 * Enabling spawns one passenger right away. Every fire reschedules the next spawn at a
 * uniformly sampled interval within `[min_interval, max_interval]`.
 */
#[derive(Debug)]
pub struct AutoSpawner {
    enabled: bool,
    min_interval: Duration,
    max_interval: Duration,
    timer: Timer,
}

impl AutoSpawner {
    pub fn new(min_interval: Duration, max_interval: Duration) -> AutoSpawner {
        AutoSpawner {
            enabled: false,
            min_interval,
            max_interval,
            timer: Timer::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns how many passengers should be spawned immediately.
    pub fn set_enabled(
        &mut self,
        enabled: bool,
        min_interval: Duration,
        max_interval: Duration,
        now: Instant,
        generator: &mut PopulationGenerator,
    ) -> usize {
        self.min_interval = min_interval.min(max_interval);
        self.max_interval = max_interval.max(min_interval);

        if !enabled {
            self.disable();
            return 0;
        }
        if self.enabled {
            return 0;
        }

        self.enabled = true;
        self.schedule(now, generator);
        1
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.timer.stop();
    }

    /// Returns true when a spawn is due, rescheduling the next one.
    pub fn poll(&mut self, now: Instant, generator: &mut PopulationGenerator) -> bool {
        if !self.enabled || !self.timer.fire(now) {
            return false;
        }
        self.schedule(now, generator);
        true
    }

    pub fn next_spawn(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    fn schedule(&mut self, now: Instant, generator: &mut PopulationGenerator) {
        let interval = generator.sample_interval(self.min_interval, self.max_interval);
        self.timer.start(now, interval);
    }
}
