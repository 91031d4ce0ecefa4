//! Service layer tying configuration, storage and transport together.
//!
//! Callers (the CLI, or a UI host embedding the library) talk to
//! [`GeoDataService`] in terms of [`Domain`](crate::domains::Domain)s and
//! never see stores or transports directly.

mod geo_service;

pub use geo_service::GeoDataService;
