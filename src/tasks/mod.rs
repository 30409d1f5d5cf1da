//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Janitor: Sweeps expired entries out of every cache shard at a fixed interval

mod janitor;

pub use janitor::Janitor;
