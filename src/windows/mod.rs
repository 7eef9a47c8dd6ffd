//! Intraday window filtering and Micro Bird overlap computation.
//!
//! Bird-batch and microtransit windows are attributed to days (split at
//! local midnight), restricted to background days, and finally intersected
//! pairwise per day to yield Micro Bird windows.

pub mod bird_tier;
pub mod clip;
pub mod filter;
pub mod overlap;
pub mod types;
