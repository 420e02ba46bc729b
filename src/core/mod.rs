pub mod errors;
pub mod models;

pub use errors::WordsiftError;
pub use models::{ FlatRecord, MetricValue, ProgressEvent, RawRecord };
