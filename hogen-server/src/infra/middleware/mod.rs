pub mod activity;
pub mod rate_limit;

pub use activity::track_activity;
pub use rate_limit::{RateDecision, RateLimiter, enforce_rate_limit};
