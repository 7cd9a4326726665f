pub mod import_service;
pub mod location_service;

pub use import_service::{ImportOptions, ImportService};
pub use location_service::LocationService;
