pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::http::{HttpBookingSource, HttpHoursSource};
pub use crate::config::{BoardSettings, CliConfig};
pub use crate::core::engine::AvailabilityEngine;
pub use crate::core::token::TokenCache;
pub use crate::utils::error::{BoardError, Result};
