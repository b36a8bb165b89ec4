pub mod distance;
pub mod export;
pub mod ledger;
pub mod resolver;
pub mod session;

pub use crate::domain::model::{
    CalculationRecord, Coordinate, DistanceOutcome, PlaceCatalog, PlaceName, Selection, Unit,
    FAILURE_PLACEHOLDER,
};
pub use crate::domain::ports::{Candidate, Geocoder, RawNumber, Storage};
pub use crate::utils::error::Result;
