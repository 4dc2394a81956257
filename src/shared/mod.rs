pub mod error;
pub mod macros;
pub mod structs;
pub mod timer;

pub use error::SimError;
pub use structs::ArrivalReport;
pub use structs::CabinStatus;
pub use structs::Direction;
pub use structs::Intent;
pub use structs::Motion;
pub use structs::PassengerId;
pub use structs::PassengerView;
pub use structs::SimulationStatus;
pub use timer::Timer;
