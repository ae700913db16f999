use super::dto::{MetricsReport, MetricsRequest};
use crate::common::error::{AppError, AppResult};
use crate::infrastructure::process::runner::{Invocation, ProcessOutcome};
use crate::state::AppState;
use serde_json::Value;
use tracing::{error, info};

const METRICS: [&str; 3] = ["psnr", "ssim", "vmaf"];
const BYTES_PER_MEGABYTE: f64 = 1_000_000.0;

pub struct MetricsService;

impl MetricsService {
    /// Quality metrics first, then the size probe. Either failing fails the
    /// whole report.
    pub async fn compute_metrics(state: &AppState, req: MetricsRequest) -> AppResult<MetricsReport> {
        let output_path = state.storage.result_path(&req.output_name)?;
        let source_path = state.storage.resolve_source(&req.source_video_path)?;

        let invocation = Invocation::new(&state.config.metrics_bin)
            .arg(&output_path)
            .arg(&source_path)
            .arg("-m")
            .args(METRICS);
        info!("📊 QUALITY METRICS: {}", invocation);

        let stdout = match state.runner.run(&invocation).await {
            ProcessOutcome::Success { stdout } => stdout,
            ProcessOutcome::Failure { exit_code, stderr } => {
                error!("❌ Quality metrics for {} failed: {}", req.output_name, stderr.trim());
                return Err(AppError::ProcessFailure {
                    program: state.config.metrics_bin.clone(),
                    exit_code,
                    stderr: state.storage.redact_roots(&stderr),
                });
            }
        };
        let quality_metrics = parse_quality_metrics(&stdout)?;

        let bytes = state.storage.result_size(&req.output_name).await?;
        info!("📦 FILE SIZE: {} = {} bytes", req.output_name, bytes);

        Ok(MetricsReport {
            filename: req.output_name,
            size: format_megabytes(bytes),
            quality_metrics,
        })
    }
}

/// The tool prints a single JSON object on stdout.
pub fn parse_quality_metrics(stdout: &str) -> AppResult<Value> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| AppError::ParseFailure(e.to_string()))?;

    if !value.is_object() {
        return Err(AppError::ParseFailure(
            "expected a JSON object on stdout".to_string(),
        ));
    }

    Ok(value)
}

/// Decimal megabytes, two decimals.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MEGABYTE)
}
