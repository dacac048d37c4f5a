pub mod clock;
pub mod datetime;
pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod sql;

pub use clock::{Clock, FixedClock, SystemClock};
pub use extractor::{SafeSectionIdI64, SafeSurveyIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
