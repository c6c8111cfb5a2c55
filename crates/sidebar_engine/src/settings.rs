use std::time::Duration;

use url::Url;

use crate::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Streaming endpoint, `ws://` or `wss://`.
    pub ws_url: String,
    /// Base URL of the job launcher; triggering calls are POSTed below it.
    pub api_base_url: String,
    /// Fixed pause between a close and the next connection attempt.
    pub reconnect_delay: Duration,
    /// How long the feed may show its loading flag without a terminal frame.
    pub feed_watchdog: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8765/ws".to_string(),
            api_base_url: "http://localhost:8765".to_string(),
            reconnect_delay: Duration::from_secs(3),
            feed_watchdog: Duration::from_secs(12),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        check_scheme("ws_url", &self.ws_url, &["ws", "wss"])?;
        check_scheme("api_base_url", &self.api_base_url, &["http", "https"])?;
        Ok(())
    }

    /// Launcher base with a trailing slash so relative endpoints join below it.
    pub(crate) fn api_base(&self) -> Result<Url, EngineError> {
        let mut base = check_scheme("api_base_url", &self.api_base_url, &["http", "https"])?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }
}

fn check_scheme(field: &'static str, value: &str, allowed: &[&str]) -> Result<Url, EngineError> {
    let url = Url::parse(value).map_err(|err| EngineError::InvalidSetting {
        field,
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    if !allowed.contains(&url.scheme()) {
        return Err(EngineError::InvalidSetting {
            field,
            value: value.to_string(),
            reason: format!("scheme must be one of {allowed:?}"),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::EngineSettings;

    #[test]
    fn defaults_are_valid() {
        EngineSettings::default().validate().unwrap();
    }

    #[test]
    fn rejects_http_socket_url() {
        let settings = EngineSettings {
            ws_url: "http://localhost:8765/ws".to_string(),
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn api_base_gains_trailing_slash() {
        let settings = EngineSettings {
            api_base_url: "http://localhost:8765/api".to_string(),
            ..EngineSettings::default()
        };
        let base = settings.api_base().unwrap();
        assert_eq!(
            base.join("research/followup").unwrap().as_str(),
            "http://localhost:8765/api/research/followup"
        );
    }
}
