//! Domain core for the real-estate listings administration console: entity
//! model, lifecycle transitions, stats derivation, view projections, the
//! chat session model, and the trait seams for the remote collaborators.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod remote;
pub mod telemetry;
