#![forbid(unsafe_code)]

//! Ranked video feed for the Rankup frontend.
//!
//! Raw YouTube-API-shaped records come from a JSON file on disk (or from an
//! operator upload that replaces it for the rest of the process), get their
//! untyped counters normalized, and leave as a list sorted by hype.

pub mod config;
pub mod error;
pub mod videos;
