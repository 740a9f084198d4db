pub mod cdd;
pub mod definitions;

pub use cdd::CddIndex;
pub use definitions::{CategoryTable, CogDefinitions};
