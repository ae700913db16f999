use crate::common::validation::validate_bare_filename;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    /// Artifact name returned by `/codecs` or `/commands`.
    #[validate(custom(function = "validate_bare_filename"))]
    pub output_name: String,
    /// Source path returned by `/codecs` or `/commands`.
    #[validate(length(min = 1, message = "sourceVideoPath is required"))]
    pub source_video_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsReport {
    pub filename: String,
    /// Decimal megabytes with two decimals, e.g. `"5.00"`.
    pub size: String,
    /// Structured output of the quality-metrics tool.
    #[schema(value_type = Object)]
    pub quality_metrics: serde_json::Value,
}
