//! Domain types for COG functional classification.
//!
//! Groups the record types read from the reference tables and the search
//! output, plus the functional-category super-groups.

pub mod category; // COG super-groups (information, cellular, metabolism, poorly characterized)
pub mod cog;
