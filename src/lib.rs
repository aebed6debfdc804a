//! seerr-settings: settings editor for the `SeerrBridge` service
//!
//! A library for reading and writing the service's `.env` settings, with a
//! prioritized editor for the torrent filter regex list, reusable filter
//! presets, and a trigger that makes the running service reload.

pub mod config;
pub mod editor;
pub mod env;
pub mod filter;
pub mod preset;
pub mod schedule;
pub mod service;
pub mod session;
pub mod time;
