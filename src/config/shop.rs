//! Shop configuration: staffing, capacity, operating window and pacing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::SimTime;

const HOUR: u64 = 3600;
const DAY: u64 = 24 * HOUR;

/// Environment variable prefix read by [`ShopConfig::from_env`].
pub const ENV_PREFIX: &str = "BARBERSHOP_";

/// Construction-time configuration for one shop run.
///
/// All times are simulated seconds. Nothing here can change once the shop is
/// open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Number of barbers (worker threads).
    pub barbers: usize,
    /// Number of chairs in the waiting room.
    pub chairs: usize,
    /// Opening time, seconds since midnight.
    pub opening_time_secs: u64,
    /// Closing time, seconds since midnight, at most 24h. No arrival is attempted at or after it.
    pub closing_time_secs: u64,
    /// Simulated seconds between two arrival attempts.
    pub client_interval_secs: u64,
    /// Simulated seconds one haircut takes.
    pub haircut_duration_secs: u64,
    /// Simulated seconds that elapse per real second.
    pub time_compression: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            barbers: 2,
            chairs: 5,
            opening_time_secs: 8 * HOUR,
            closing_time_secs: 20 * HOUR,
            client_interval_secs: 2 * HOUR,
            haircut_duration_secs: 30 * 60,
            time_compression: 3600,
        }
    }
}

impl ShopConfig {
    /// Create a configuration with the default shop values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of barbers.
    #[must_use]
    pub const fn with_barbers(mut self, barbers: usize) -> Self {
        self.barbers = barbers;
        self
    }

    /// Set the number of waiting-room chairs.
    #[must_use]
    pub const fn with_chairs(mut self, chairs: usize) -> Self {
        self.chairs = chairs;
        self
    }

    /// Set the operating window as offsets from midnight.
    #[must_use]
    pub const fn with_operating_window(mut self, opening: Duration, closing: Duration) -> Self {
        self.opening_time_secs = opening.as_secs();
        self.closing_time_secs = closing.as_secs();
        self
    }

    /// Set the simulated time between arrival attempts.
    #[must_use]
    pub const fn with_client_interval(mut self, interval: Duration) -> Self {
        self.client_interval_secs = interval.as_secs();
        self
    }

    /// Set the simulated duration of one haircut.
    #[must_use]
    pub const fn with_haircut_duration(mut self, duration: Duration) -> Self {
        self.haircut_duration_secs = duration.as_secs();
        self
    }

    /// Set how many simulated seconds pass per real second.
    #[must_use]
    pub const fn with_time_compression(mut self, compression: u32) -> Self {
        self.time_compression = compression;
        self
    }

    /// Opening time.
    #[must_use]
    pub const fn opening_time(&self) -> SimTime {
        SimTime::from_secs(self.opening_time_secs)
    }

    /// Closing time.
    #[must_use]
    pub const fn closing_time(&self) -> SimTime {
        SimTime::from_secs(self.closing_time_secs)
    }

    /// Arrival period.
    #[must_use]
    pub const fn client_interval(&self) -> Duration {
        Duration::from_secs(self.client_interval_secs)
    }

    /// Service duration.
    #[must_use]
    pub const fn haircut_duration(&self) -> Duration {
        Duration::from_secs(self.haircut_duration_secs)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.barbers == 0 {
            return Err("barbers must be greater than 0".into());
        }
        if self.chairs == 0 {
            return Err("chairs must be greater than 0".into());
        }
        if self.closing_time_secs > DAY {
            return Err(format!(
                "closing_time_secs {} is past the end of the day ({DAY})",
                self.closing_time_secs
            ));
        }
        if self.closing_time_secs <= self.opening_time_secs {
            return Err(format!(
                "closing time {} must be after opening time {}",
                self.closing_time(),
                self.opening_time()
            ));
        }
        if self.client_interval_secs == 0 {
            return Err("client_interval_secs must be greater than 0".into());
        }
        if self.time_compression == 0 {
            return Err("time_compression must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate it.
    ///
    /// Missing fields fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `BARBERSHOP_*` environment variables on top of
    /// the defaults, then validate it.
    ///
    /// Recognized variables: `BARBERSHOP_BARBERS`, `BARBERSHOP_CHAIRS`,
    /// `BARBERSHOP_OPENING_TIME_SECS`, `BARBERSHOP_CLOSING_TIME_SECS`,
    /// `BARBERSHOP_CLIENT_INTERVAL_SECS`, `BARBERSHOP_HAIRCUT_DURATION_SECS`,
    /// `BARBERSHOP_TIME_COMPRESSION`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable that failed to parse, or the
    /// validation failure.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ShopConfig::from_env`] with a caller-supplied lookup.
    ///
    /// # Errors
    ///
    /// See [`ShopConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn read<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            name: &str,
            slot: &mut T,
        ) -> Result<(), String>
        where
            T::Err: std::fmt::Display,
        {
            let key = format!("{ENV_PREFIX}{name}");
            if let Some(raw) = lookup(&key) {
                *slot = raw
                    .trim()
                    .parse()
                    .map_err(|e| format!("{key}={raw:?}: {e}"))?;
            }
            Ok(())
        }

        let mut cfg = Self::default();
        read(&lookup, "BARBERS", &mut cfg.barbers)?;
        read(&lookup, "CHAIRS", &mut cfg.chairs)?;
        read(&lookup, "OPENING_TIME_SECS", &mut cfg.opening_time_secs)?;
        read(&lookup, "CLOSING_TIME_SECS", &mut cfg.closing_time_secs)?;
        read(&lookup, "CLIENT_INTERVAL_SECS", &mut cfg.client_interval_secs)?;
        read(&lookup, "HAIRCUT_DURATION_SECS", &mut cfg.haircut_duration_secs)?;
        read(&lookup, "TIME_COMPRESSION", &mut cfg.time_compression)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
