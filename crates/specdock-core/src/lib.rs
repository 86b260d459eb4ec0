//! Specdock Core - Domain types and traits for the workspace access-control engine

pub mod error;
pub mod ids;
pub mod models;
pub mod traits;


pub use error::*;
pub use ids::*;
pub use models::*;
pub use traits::*;
