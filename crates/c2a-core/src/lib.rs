pub mod error;
pub mod timestamp;
pub mod types;

pub use error::*;
pub use timestamp::{Timestamp, TimestampError};
pub use types::*;
