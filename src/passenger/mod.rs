pub mod generator;
pub mod passenger;
pub mod registry;
pub mod spawner;

pub use generator::PopulationGenerator;
pub use passenger::Passenger;
pub use registry::WaitingRegistry;
pub use spawner::AutoSpawner;
