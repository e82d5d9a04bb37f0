// Dashboard configuration: defaults, optional file, environment overrides
use crate::application::notification_service::DEFAULT_DISPLAY;
use anyhow::ensure;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub server: ServerSettings,
    pub polling: PollingSettings,
    pub flow: FlowSettings,
    pub notifications: NotificationSettings,
}

impl DashboardConfig {
    /// Reject values the controllers cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.backend.request_timeout_ms > 0,
            "backend.request_timeout_ms must be greater than zero"
        );
        ensure!(
            self.polling.history_interval_secs > 0,
            "polling.history_interval_secs must be greater than zero"
        );
        ensure!(
            self.polling.instant_interval_ms > 0,
            "polling.instant_interval_ms must be greater than zero"
        );
        ensure!(
            self.notifications.display_ms > 0,
            "notifications.display_ms must be greater than zero"
        );
        ensure!(
            self.flow.dead_band.is_finite() && self.flow.dead_band >= 0.0,
            "flow.dead_band must be a non-negative number, got {}",
            self.flow.dead_band
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub history_interval_secs: u64,
    pub instant_interval_ms: u64,
}

impl PollingSettings {
    pub fn history_interval(&self) -> Duration {
        Duration::from_secs(self.history_interval_secs)
    }

    pub fn instant_interval(&self) -> Duration {
        Duration::from_millis(self.instant_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlowSettings {
    /// Flow magnitudes below this are shown as idle.
    pub dead_band: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub display_ms: u64,
}

impl NotificationSettings {
    pub fn display_for(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("backend.base_url", "http://localhost:8080")?
        .set_default("backend.request_timeout_ms", 10_000)?
        .set_default("server.bind", "0.0.0.0:4300")?
        .set_default("polling.history_interval_secs", 30)?
        .set_default("polling.instant_interval_ms", 1_000)?
        .set_default("flow.dead_band", 10.0)?
        .set_default("notifications.display_ms", DEFAULT_DISPLAY.as_millis() as u64)
}

/// Load `config/dashboard.*` (optional) and `SOLNAX__*` environment overrides.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("SOLNAX")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> DashboardConfig {
        let config: DashboardConfig = with_defaults(config::Config::builder())
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        config.validate().unwrap();
        config
    }

    fn rejected(toml: &str) -> String {
        let config: DashboardConfig = with_defaults(config::Config::builder())
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        config.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = parse("");

        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.server.bind, "0.0.0.0:4300");
        assert_eq!(config.polling.history_interval(), Duration::from_secs(30));
        assert_eq!(config.polling.instant_interval(), Duration::from_secs(1));
        assert_eq!(config.flow.dead_band, 10.0);
        assert_eq!(config.notifications.display_for(), Duration::from_secs(3));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = parse(
            r#"
            [backend]
            base_url = "http://solnax.lan:8080/"

            [flow]
            dead_band = 0.5
            "#,
        );

        assert_eq!(config.backend.base_url, "http://solnax.lan:8080/");
        assert_eq!(config.flow.dead_band, 0.5);
        assert_eq!(config.polling.history_interval_secs, 30);
    }

    #[test]
    fn test_zero_intervals_are_rejected() {
        let err = rejected("[polling]\ninstant_interval_ms = 0");
        assert!(err.contains("polling.instant_interval_ms"), "{err}");

        let err = rejected("[polling]\nhistory_interval_secs = 0");
        assert!(err.contains("polling.history_interval_secs"), "{err}");

        let err = rejected("[notifications]\ndisplay_ms = 0");
        assert!(err.contains("notifications.display_ms"), "{err}");
    }

    #[test]
    fn test_negative_dead_band_is_rejected() {
        let err = rejected("[flow]\ndead_band = -1.0");
        assert!(err.contains("flow.dead_band"), "{err}");
    }
}
