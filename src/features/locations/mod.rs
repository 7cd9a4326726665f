//! IP-geolocation records: list/show, lookup by IP, and CSV bulk import.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/locations` | List all records |
//! | GET | `/locations/{id}` | Show one record |
//! | GET | `/ip_address/{ip_address}` | Look up a record by IP |
//! | POST | `/import_data` | Bulk-import a CSV dump |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validator;

pub use services::{ImportService, LocationService};
