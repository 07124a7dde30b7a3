//! JSON bodies returned by the HTTP API.
//!
//! ```json
//! GET  /api/status  → {"ok":true,"online":false}
//! POST /api/wake    → {"ok":true}
//! POST /api/sleep   → {"ok":false,"error":"SSH command failed (code 1)"}
//! ```

use serde::{Deserialize, Serialize};

/// Body of `GET /api/status`.  `ok` is always `true`; reachability is in `online`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub online: bool,
}

impl StatusResponse {
    pub fn new(online: bool) -> Self {
        Self { ok: true, online }
    }
}

/// Body of `POST /api/wake` and `POST /api/sleep`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub ok: bool,
    /// Human-readable failure message; omitted on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
