//! Platform-specific `ping` arguments for the one-shot liveness probe.
//!
//! Every desktop OS ships a `ping` binary, but the flags disagree:
//!
//! | Platform | Count flag | Timeout flag | Timeout unit  |
//! |----------|------------|--------------|---------------|
//! | Windows  | `-n`       | `-w`         | milliseconds  |
//! | macOS    | `-c`       | `-W`         | milliseconds  |
//! | Linux    | `-c`       | `-W`         | seconds       |
//!
//! The mapping lives here as a pure function so it can be tested on every
//! platform without spawning a process.

/// Name of the executable launched for the liveness probe.
pub const PING_PROGRAM: &str = "ping";

/// Operating system family that determines the `ping` argument dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other Unix-like system (iputils / busybox syntax).
    Other,
}

impl Platform {
    /// Returns the platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// Builds the argument list for a single echo request to `host` with a
/// one-second reply timeout.
///
/// # Examples
///
/// ```rust
/// use lanpower_core::{ping_args, Platform};
///
/// assert_eq!(ping_args(Platform::Other, "10.0.0.2"), ["-c", "1", "-W", "1", "10.0.0.2"]);
/// ```
pub fn ping_args(platform: Platform, host: &str) -> Vec<String> {
    let flags: [&str; 4] = match platform {
        Platform::Windows => ["-n", "1", "-w", "1000"],
        Platform::MacOs => ["-c", "1", "-W", "1000"],
        Platform::Other => ["-c", "1", "-W", "1"],
    };
    flags
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(host.to_string()))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
