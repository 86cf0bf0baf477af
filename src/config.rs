use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recorder: RecorderConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Include internal failure detail in HTTP error bodies. Leave off in
    /// production; client-side precondition messages are always returned.
    pub expose_internal_errors: bool,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct RecorderConfig {
    /// Encoder input: a device/stream URL or a local file path.
    pub stream_input: String,
    pub recordings_path: String,
    pub ffmpeg_path: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: Option<String>,
    /// Custom S3 endpoint (MinIO et al.); default AWS when unset.
    pub endpoint: Option<String>,
    pub signed_url_ttl_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Layered load: defaults, then an optional config file, then
    /// `DRONE_CAPTURE_*` environment variables (`__` as section separator,
    /// e.g. `DRONE_CAPTURE_STORAGE__BUCKET`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "drone-capture")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 4000_i64)?
            .set_default("service.expose_internal_errors", false)?
            .set_default("recorder.recordings_path", "recordings")?
            .set_default("recorder.ffmpeg_path", "ffmpeg")?
            .set_default("storage.signed_url_ttl_secs", 3600_i64)?
            .set_default("analysis.timeout_secs", 30_i64)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("DRONE_CAPTURE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
