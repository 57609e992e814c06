pub mod duration;
pub mod http_date;
pub mod logging;

pub use duration::{parse_duration, DurationSpan};
