use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, GaugeVec, Histogram, register_counter, register_counter_vec,
    register_gauge_vec, register_histogram,
};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("join_requests_total", "Total number of submission requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: CounterVec = register_counter_vec!(
        "join_rate_limited_total",
        "Requests rejected by a rate limiter",
        &["scope"]
    )
    .unwrap();
    pub static ref BLOCKED_AGENTS_TOTAL: Counter =
        register_counter!("join_blocked_agents_total", "Requests blocked by user agent").unwrap();
    pub static ref SUBMISSIONS_TOTAL: Counter =
        register_counter!("join_submissions_total", "Applications stored").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "join_request_latency_seconds",
        "Submission latency in seconds"
    )
    .unwrap();
    pub static ref LIMITER_KEYS: GaugeVec = register_gauge_vec!(
        "join_limiter_keys",
        "Keys resident in a limiter registry",
        &["scope"]
    )
    .unwrap();
}
