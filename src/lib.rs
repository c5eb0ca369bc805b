//! Core library for the `movetrack` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration parsing, the Movebank direct-read client and fetch
//! orchestration, GPS track loading and statistics, day/night geometry,
//! playback state, and the map, image and terminal presentations. The
//! primary user-facing interface is the `movetrack` command-line
//! application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod error;
pub mod geo;
pub mod movebank;
pub mod playback;
pub mod render;
pub mod timestamp;
pub mod track;
pub mod ui;
