/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::PassengerId;

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("ignored request for floor {floor} of {floors}: {reason}")]
    InvalidFloorRequest { floor: u8, floors: u8, reason: &'static str },

    #[error("cabin is full ({capacity} occupants)")]
    CapacityExceeded { capacity: usize },

    #[error("passenger {0} is not aboard the cabin")]
    PassengerNotAboard(PassengerId),

    #[error("origin and destination are both floor {floor}")]
    DuplicateOriginDestination { floor: u8 },

    #[error("a single-floor building cannot produce passengers")]
    SingleFloorBuilding,
}
