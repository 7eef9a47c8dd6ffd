//! Day-level transit classification.
//!
//! Three upstream label streams (PTI, Vedic, Personal) are validated into
//! closed enums, combined into one verdict per day, and reduced to the set
//! of background days that qualify for posting.

pub mod background;
pub mod classifier;
pub mod labels;
pub mod types;
