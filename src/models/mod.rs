//! Data models for the employee directory.
//!
//! These models match the frontend TypeScript interfaces for seamless interoperability.

mod employee;
mod filters;

pub use employee::*;
pub use filters::*;
