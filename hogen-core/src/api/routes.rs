macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Service summary and dashboard.
pub const ROOT: &str = "/";

/// Liveness and provider status.
pub const HEALTH: &str = api_path!("/health");
/// Supported dialect list.
pub const DIALECTS: &str = api_path!("/dialects");
/// Self-ping target.
pub const KEEP_ALIVE: &str = api_path!("/keep-alive");
/// Runtime statistics.
pub const STATS: &str = api_path!("/stats");

/// Translation endpoints.
pub mod translate {
    /// Single text.
    pub const SINGLE: &str = api_path!("/translate");
    /// Up to the batch limit of texts in one request.
    pub const BATCH: &str = api_path!("/translate/batch");
}

/// Method/path pairs advertised by the not-found handler.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", ROOT),
    ("GET", HEALTH),
    ("GET", DIALECTS),
    ("GET", KEEP_ALIVE),
    ("GET", STATS),
    ("POST", translate::SINGLE),
    ("POST", translate::BATCH),
];

/// Self-ping traffic is excluded from activity accounting and rate limiting.
pub fn is_self_ping(path: &str) -> bool {
    path == KEEP_ALIVE
}
