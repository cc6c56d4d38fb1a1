use crate::recognition::HostEnvironment;
use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recognition: SessionConfig,
    pub nats: NatsConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,

    /// How long a stopped session waits for the service's last final transcript
    pub drain_timeout_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// Force the secure-transport fact instead of deriving it from the NATS URL
    pub secure_transport: Option<bool>,
}

impl Config {
    /// Load defaults, then the optional config file at `path`, then
    /// `DICTATION__SECTION__KEY` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "live-dictation")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8787)?
            .set_default("recognition.continuous", true)?
            .set_default("recognition.interim_results", true)?
            .set_default("recognition.language", "zh-CN")?
            .set_default("nats.url", "nats://localhost:4222")?
            .set_default("nats.drain_timeout_ms", 1500)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("DICTATION").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Host environment for error classification
    pub fn host_environment(&self) -> HostEnvironment {
        match self.environment.secure_transport {
            Some(secure) => HostEnvironment::new(secure),
            None => HostEnvironment::for_endpoint(&self.nats.url),
        }
    }
}
