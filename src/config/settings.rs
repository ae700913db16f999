use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024 * 1024;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub uploads_dir: PathBuf,
    pub results_dir: PathBuf,
    pub transcoder_bin: String,
    pub metrics_bin: String,
    pub max_upload_bytes: usize,
    /// Append a per-request suffix to codec-derived output names.
    pub unique_output_names: bool,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3030),
            transcoder_bin: env::get_or(EnvKey::TranscoderBin, "ffmpeg"),
            metrics_bin: env::get_or(EnvKey::QualityMetricsBin, "ffmpeg-quality-metrics"),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
            unique_output_names: env::get_parsed(EnvKey::UniqueOutputNames, false),
            ..Self::with_roots(
                env::get_or(EnvKey::UploadsDir, "uploads"),
                env::get_or(EnvKey::ResultsDir, "results"),
            )
        }
    }

    /// Config rooted at explicit storage directories, everything else default.
    pub fn with_roots(uploads_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_port: 3030,
            uploads_dir: uploads_dir.into(),
            results_dir: results_dir.into(),
            transcoder_bin: "ffmpeg".to_string(),
            metrics_bin: "ffmpeg-quality-metrics".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            unique_output_names: false,
        }
    }
}
