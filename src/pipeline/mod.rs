pub mod assign;
pub mod expand;
pub mod processor;
pub mod report;

pub use processor::{CogClassifier, InputPaths, ProcessingError};
pub use report::{generate_summary, ReportWriter};
