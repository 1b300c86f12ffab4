pub mod fixtures;

pub use fixtures::{WEBHOOK_URL, error_record, recorded_handler, recorded_handler_with};
