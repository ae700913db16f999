use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    UploadsDir,
    ResultsDir,
    TranscoderBin,
    QualityMetricsBin,
    MaxUploadBytes,
    UniqueOutputNames,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::UploadsDir => "UPLOADS_DIR",
            EnvKey::ResultsDir => "RESULTS_DIR",
            EnvKey::TranscoderBin => "TRANSCODER_BIN",
            EnvKey::QualityMetricsBin => "QUALITY_METRICS_BIN",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::UniqueOutputNames => "UNIQUE_OUTPUT_NAMES",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
