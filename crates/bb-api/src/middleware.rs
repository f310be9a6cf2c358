//! brittle-board/crates/bb-api/src/middleware.rs
//!
//! Request logging and traffic policy shared by the binary and the tests.

use actix_cors::Cors;
use actix_web::middleware::Logger;

// Returns the standard access logger:
// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn request_logger() -> Logger {
    Logger::default()
}

// Wide-open CORS, matching the rest of the security posture here.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .max_age(3600)
}
