//! This is a library for managing a collection of named map locations in a
//! database, along with the in-memory view state used to browse and edit
//! them on an interactive map.

pub mod database;
pub mod error;
pub mod geo;
pub mod loadable;
pub mod location;
pub mod view;

pub use database::Database;
pub use error::Error;
pub use error::Result;
