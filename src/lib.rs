//! Sports Leagues CLI Library
//!
//! Browse TheSportsDB leagues with an expiring on-disk cache and request
//! coalescing in front of the API.

pub mod app;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod filter;
pub mod logging;
pub mod output;
pub mod service;
