pub mod core;
pub mod export;
pub mod session;
pub mod table;

pub use crate::core::{
    FlatRecord,
    MetricValue,
    ProgressEvent,
    RawRecord,
    WordsiftError,
};
pub use crate::session::SessionState;
pub use crate::table::TableState;
