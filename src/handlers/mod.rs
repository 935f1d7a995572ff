mod health;
mod metrics;
mod submit;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use submit::{check_submission_handler, submit_handler};
