use serde::Deserialize;
use std::time::Duration;

/// Root application configuration. Loaded from environment variables with
/// the prefix `FUNNEL_EXPRESS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
}

/// Presentation delays for the three transition classes. These shape the
/// in-flight window between a begun and an applied transition; they carry no
/// correctness weight of their own.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Fade between two question cards, forward or back.
    #[serde(default = "default_question_fade_ms")]
    pub question_fade_ms: u64,
    /// Entrance of an interstitial card after the outgoing question fades.
    #[serde(default = "default_interstitial_entrance_ms")]
    pub interstitial_entrance_ms: u64,
    /// Leaving an interstitial card, forward or back.
    #[serde(default = "default_interstitial_exit_ms")]
    pub interstitial_exit_ms: u64,
}

impl TimingConfig {
    pub fn question_fade(&self) -> Duration {
        Duration::from_millis(self.question_fade_ms)
    }

    pub fn interstitial_entrance(&self) -> Duration {
        Duration::from_millis(self.interstitial_entrance_ms)
    }

    pub fn interstitial_exit(&self) -> Duration {
        Duration::from_millis(self.interstitial_exit_ms)
    }
}

/// Completion webhook settings. The identity fields are operator tags sent
/// with every notification; they never reflect participant-entered data.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Endpoint for the completion POST. Absent means the call is skipped.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_reply_to")]
    pub reply_to: String,
}

/// Where the participant is sent after completion.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectConfig {
    #[serde(default = "default_destination_url")]
    pub destination_url: String,
}

// Default functions
fn default_question_fade_ms() -> u64 {
    50
}
fn default_interstitial_entrance_ms() -> u64 {
    300
}
fn default_interstitial_exit_ms() -> u64 {
    500
}
fn default_from_name() -> String {
    "Funnel Express".to_string()
}
fn default_reply_to() -> String {
    "leads@funnel-express.dev".to_string()
}
fn default_destination_url() -> String {
    "https://example.com/thank-you".to_string()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            question_fade_ms: default_question_fade_ms(),
            interstitial_entrance_ms: default_interstitial_entrance_ms(),
            interstitial_exit_ms: default_interstitial_exit_ms(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            from_name: default_from_name(),
            reply_to: default_reply_to(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            destination_url: default_destination_url(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            notification: NotificationConfig::default(),
            redirect: RedirectConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("FUNNEL_EXPRESS")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presentation_timings() {
        let timing = TimingConfig::default();
        assert_eq!(timing.question_fade(), Duration::from_millis(50));
        assert_eq!(timing.interstitial_entrance(), Duration::from_millis(300));
        assert_eq!(timing.interstitial_exit(), Duration::from_millis(500));
    }

    #[test]
    fn notification_endpoint_defaults_to_absent() {
        let config = AppConfig::default();
        assert!(config.notification.endpoint.is_none());
        assert!(!config.notification.from_name.is_empty());
    }
}
