// Adapters layer: concrete implementations of the domain ports.

pub mod nominatim;
pub mod storage;

pub use nominatim::NominatimGeocoder;
pub use storage::LocalStorage;
