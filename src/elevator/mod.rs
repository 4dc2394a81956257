pub mod cabin;
pub mod dispatch;
pub mod dispatch_tests;
pub mod fsm;

pub use dispatch::DispatchEngine;
pub use fsm::ElevatorFSM;
