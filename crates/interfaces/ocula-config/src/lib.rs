//! Central configuration constants for runtime limits and defaults.

use std::time::Duration;

/// Default artificial latency applied by every mock repository call.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(250);

/// Upper bound for a user supplied simulated latency.
pub const MAX_SIMULATED_LATENCY: Duration = Duration::from_secs(5);

/// Minimum accepted password length for registration and password changes.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of appointments shown on the home dashboard.
pub const UPCOMING_APPOINTMENTS_LIMIT: usize = 5;

/// How long the CLI waits for a controller to settle after an event.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// File name of the JSON preference store inside the config directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub const PROJECT_QUALIFIER: &str = "com";
pub const PROJECT_ORG: &str = "ocula";
pub const PROJECT_APP: &str = "care";

/// Clamp a requested latency into the allowed range.
pub fn clamp_latency(v: Duration) -> Duration {
    v.min(MAX_SIMULATED_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_latency_caps_large_values() {
        assert_eq!(clamp_latency(Duration::from_secs(60)), MAX_SIMULATED_LATENCY);
        assert_eq!(
            clamp_latency(Duration::from_millis(10)),
            Duration::from_millis(10)
        );
    }
}
