pub mod api;
pub mod attendance;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod repository;
pub mod routes;

pub use error::{AttendanceError, Result};
