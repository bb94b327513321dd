/// Route constants shared by the server, the keep-alive pinger and tests
pub mod routes;

/// JSON request and response bodies
pub mod types;
