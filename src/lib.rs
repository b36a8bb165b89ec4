pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::CliArgs;

pub use self::adapters::{LocalStorage, NominatimGeocoder};
pub use self::app::console::{Command, Console, Flow};
pub use self::config::AppConfig;
pub use self::core::{
    export::{ExportedDocument, ReportExporter, ReportLayout},
    ledger::HistoryLedger,
    resolver::GeocodeResolver,
    session::CalculatorSession,
};
pub use self::domain::model::{
    CalculationRecord, Coordinate, DistanceOutcome, PlaceCatalog, PlaceName, Selection, Unit,
};
pub use self::utils::error::{AppError, Result};
