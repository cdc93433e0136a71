//! Sustainable-finance taxonomy reference catalog and the guided project review
//! that decides whether a project is eligible for, and aligned with, a taxonomy activity.

pub mod catalog;
pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
