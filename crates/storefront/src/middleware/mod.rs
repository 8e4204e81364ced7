//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fills the span field, Sentry tag and response header)
//! 4. Session layer (tower-sessions, bounded moka store)
//! 5. Security headers (CSP, frame options, etc.)
//!
//! [`OrderContext`] is an extractor rather than a layer; it reads the
//! session installed by step 4.

pub mod order;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use order::{OrderContext, session_keys};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::{SecurityHeaders, security_headers_middleware};
pub use session::{SessionStore, create_session_layer, session_store};
