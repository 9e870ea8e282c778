//! Hard-coded endpoint settings shared by the server and client binaries.

use std::time::Duration;

/// Port the server listens on.
pub const DEFAULT_PORT: u16 = 3000;

/// Address the client binary calls.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Upper bound on a whole client round-trip (connect, send, receive).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
