//! Golden window classification and overlap engine.
//!
//! Takes per-day labels from three transit systems plus intraday bird-batch
//! and microtransit windows, and derives the background days and precision
//! "Micro Bird" posting windows for a date range. Everything here is pure and
//! synchronous; upstream computation and downstream publishing live outside.
//!
//! ```no_run
//! use chrono::{FixedOffset, NaiveDate};
//! use golden_window::calendar::{CalendarRequest, DateRange, UpstreamData, assemble_calendar};
//!
//! # fn main() -> Result<(), golden_window::error::CalendarError> {
//! let request = CalendarRequest {
//!     profile_id: "profile-1".into(),
//!     range: DateRange::new(
//!         NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
//!     ),
//!     utc_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
//! };
//! let calendar = assemble_calendar(&request, &UpstreamData::default())?;
//! println!("{} precision windows", calendar.micro_bird_windows.len());
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod stats;
pub mod transits;
pub mod warning;
pub mod windows;
