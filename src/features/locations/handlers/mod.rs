pub mod import_handler;
pub mod location_handler;
