//! Tunables for the simulated backend.
//!
//! The browser has no environment to read from, so the shell builds
//! [`AppConfig::default`]; tests use [`AppConfig::instant`] to drop every
//! artificial delay.

use std::time::Duration;

/// Shared configuration for the session service, fixture client and pages.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Delay before a login attempt settles.
    pub login_delay: Duration,
    /// Base delay before a registration settles.
    pub register_delay: Duration,
    /// Upper bound of the random jitter added on top of the base delays.
    pub max_jitter: Duration,
    /// Delay for forgot-password and reset-password calls.
    pub recovery_delay: Duration,
    /// Delay before a page's fixture data is handed to the view.
    pub page_load_delay: Duration,
    /// Delay of the dashboard refresh button.
    pub dashboard_refresh_delay: Duration,
    /// Lifetime of a toast before it is removed automatically.
    pub notification_ttl: Duration,
    /// Default table page size.
    pub rows_per_page: usize,
    /// Password shared by every seeded fixture account.
    pub fixture_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            login_delay: Duration::from_millis(800),
            register_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(400),
            recovery_delay: Duration::from_millis(1000),
            page_load_delay: Duration::from_millis(800),
            dashboard_refresh_delay: Duration::from_millis(1000),
            notification_ttl: Duration::from_secs(5),
            rows_per_page: 5,
            fixture_password: "password".to_owned(),
        }
    }
}

impl AppConfig {
    /// Same as the default but with every simulated delay set to zero.
    pub fn instant() -> Self {
        Self {
            login_delay: Duration::ZERO,
            register_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
            recovery_delay: Duration::ZERO,
            page_load_delay: Duration::ZERO,
            dashboard_refresh_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// `base` plus a uniformly random jitter in `[0, max_jitter]`.
    pub fn jittered(&self, base: Duration) -> Duration {
        use rand::Rng;

        let max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if max == 0 {
            return base;
        }
        base + Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }
}
