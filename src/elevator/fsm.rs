use crate::config::{BuildingConfig, Config, DispatchConfig};
use crate::elevator::DispatchEngine;
use crate::passenger::{AutoSpawner, PopulationGenerator};
use crate::shared::{Intent, SimulationStatus};
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::time::{Duration, Instant};

/**
 * Runs the simulation.
 *
 * The `ElevatorFSM` owns the whole simulation state and is the only place it is mutated. It
 * receives intents from the console, advances the dispatch engine on every loop iteration and
 * publishes a status snapshot to the renderer whenever something visible changed.
 *
 * # Fields
 * - `intent_rx`:           Receives intents from the console.
 * - `status_tx`:           Publishes status snapshots for rendering.
 * - `terminate_rx`:        Stops the loop.
 * - `engine`:              Dispatch engine with cabin and waiting passengers.
 * - `generator`:           Creates new passengers.
 * - `spawner`:             Automatic passenger spawning.
 * - `dispatch_config`:     Timing used whenever the engine is rebuilt.
 * - `frame_interval`:      Longest time the loop waits for an intent before stepping.
 * - `spawned`:             Passengers created since the last reconfiguration.
 * - `last_status`:         Last published snapshot.
 *
 */
pub struct ElevatorFSM {
    // Channels
    intent_rx: cbc::Receiver<Intent>,
    status_tx: cbc::Sender<SimulationStatus>,
    terminate_rx: cbc::Receiver<()>,

    // Private fields
    engine: DispatchEngine,
    generator: PopulationGenerator,
    spawner: AutoSpawner,
    dispatch_config: DispatchConfig,
    frame_interval: Duration,
    spawned: u64,
    last_status: Option<SimulationStatus>,
}

impl ElevatorFSM {
    pub fn new(
        config: &Config,
        intent_rx: cbc::Receiver<Intent>,
        status_tx: cbc::Sender<SimulationStatus>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorFSM {
        let now = Instant::now();
        let mut fsm = ElevatorFSM {
            intent_rx,
            status_tx,
            terminate_rx,
            engine: DispatchEngine::new(&config.building, &config.dispatch, now),
            generator: PopulationGenerator::new(config.spawn.seed),
            spawner: AutoSpawner::new(config.spawn.min_interval(), config.spawn.max_interval()),
            dispatch_config: config.dispatch,
            frame_interval: config.frame_interval(),
            spawned: 0,
            last_status: None,
        };

        fsm.spawn_passengers(config.spawn.initial_passengers, now);
        if config.dispatch.auto_dispatch {
            fsm.engine.set_auto_dispatch(true, now);
        }
        if config.spawn.auto_spawn {
            fsm.handle_intent(
                Intent::SetAutoSpawn {
                    enabled: true,
                    min_interval: config.spawn.min_interval(),
                    max_interval: config.spawn.max_interval(),
                },
                now,
            );
        }
        fsm
    }

    pub fn run(mut self) {
        self.publish_status(true);

        // Main loop
        loop {
            let timeout = self.next_wakeup(Instant::now());
            cbc::select! {
                recv(self.intent_rx) -> intent => {
                    match intent {
                        Ok(intent) => self.handle_intent(intent, Instant::now()),
                        Err(_) => {
                            // The console drops its sender right after a quit
                            info!("Intent channel closed, simulation terminated");
                            break;
                        }
                    }
                }
                recv(self.terminate_rx) -> _ => {
                    info!("Simulation terminated");
                    break;
                }
                default(timeout) => {}
            }

            self.step(Instant::now());
            self.publish_status(false);
        }
    }

    #[cfg(test)]
    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    /// Time until the next scheduled engine or spawner event, capped at one frame.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        [self.engine.next_deadline(), self.spawner.next_spawn()]
            .into_iter()
            .flatten()
            .min()
            .map_or(self.frame_interval, |due| {
                due.saturating_duration_since(now).min(self.frame_interval)
            })
    }

    pub fn handle_intent(&mut self, intent: Intent, now: Instant) {
        match intent {
            Intent::RequestFloor(floor) => {
                self.engine.request_floor(floor, now);
            }
            Intent::AddPassengers(count) => {
                self.spawn_passengers(count, now);
            }
            Intent::SetAutoDispatch(enabled) => {
                self.engine.set_auto_dispatch(enabled, now);
            }
            Intent::SetAutoSpawn {
                enabled,
                min_interval,
                max_interval,
            } => {
                let immediate = self.spawner.set_enabled(
                    enabled,
                    min_interval,
                    max_interval,
                    now,
                    &mut self.generator,
                );
                info!("Auto spawn {}", if enabled { "enabled" } else { "disabled" });
                self.spawn_passengers(immediate, now);
            }
            Intent::Reconfigure(building) => {
                self.reconfigure(building, now);
            }
            Intent::PublishStatus => {
                self.publish_status(true);
            }
        }
    }

    pub fn step(&mut self, now: Instant) {
        if self.spawner.poll(now, &mut self.generator) {
            self.spawn_passengers(1, now);
        }
        if let Err(e) = self.engine.step(now) {
            error!("Dispatch engine invariant violated: {}", e);
        }
    }

    pub fn status(&self) -> SimulationStatus {
        SimulationStatus {
            cabin: self.engine.cabin().status_snapshot(),
            state: self.engine.state().to_string(),
            auto_dispatch: self.engine.auto_dispatch(),
            auto_spawn: self.spawner.is_enabled(),
            waiting: self.engine.waiting().len(),
            spawned: self.spawned,
            delivered: self.engine.delivered(),
            passengers: self.engine.passenger_views(),
            last_arrival: self.engine.last_arrival().cloned(),
        }
    }

    /***************************************/
    /*          Private functions          */
    /***************************************/
    fn spawn_passengers(&mut self, count: usize, now: Instant) {
        if count == 0 {
            return;
        }
        match self.generator.generate(count, self.engine.floors()) {
            Ok(passengers) => {
                info!("Adding {} passenger(s)", passengers.len());
                self.spawned += passengers.len() as u64;
                self.engine.add_passengers(passengers, now);
            }
            Err(e) => warn!("Could not add passengers: {}", e),
        }
    }

    fn reconfigure(&mut self, building: BuildingConfig, now: Instant) {
        if let Err(e) = building.validate() {
            warn!("Ignoring reconfiguration: {}", e);
            return;
        }

        info!(
            "Reconfiguring: {} floors, capacity {}, move duration {} ms",
            building.floors, building.capacity, building.move_duration_ms
        );
        self.engine = DispatchEngine::new(&building, &self.dispatch_config, now);
        self.spawner.disable();
        self.spawned = 0;
    }

    fn publish_status(&mut self, force: bool) {
        let status = self.status();
        if !force && self.last_status.as_ref() == Some(&status) {
            return;
        }
        if let Err(e) = self.status_tx.send(status.clone()) {
            error!("Error sending status: {}", e);
        }
        self.last_status = Some(status);
    }
}
