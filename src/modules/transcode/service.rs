use super::dto::{TranscodeRequest, TranscodeResponse, UploadedAsset};
use super::naming::{derive_output_name, derive_unique_output_name};
use crate::common::error::{AppError, AppResult};
use crate::infrastructure::process::runner::{Invocation, ProcessOutcome};
use crate::state::AppState;
use tracing::{error, info};
use uuid::Uuid;

const CONVERTED_MESSAGE: &str = "File converted!";

pub struct TranscodeService;

impl TranscodeService {
    pub async fn transcode(
        state: &AppState,
        asset: &UploadedAsset,
        request: TranscodeRequest,
    ) -> AppResult<TranscodeResponse> {
        match request {
            TranscodeRequest::Codec { codec } => {
                Self::transcode_by_codec(state, asset, &codec).await
            }
            TranscodeRequest::RawCommand {
                raw,
                args,
                output_filename,
            } => Self::transcode_by_command(state, asset, &raw, args, &output_filename).await,
        }
    }

    pub async fn transcode_by_codec(
        state: &AppState,
        asset: &UploadedAsset,
        codec: &str,
    ) -> AppResult<TranscodeResponse> {
        let output_name = if state.config.unique_output_names {
            let suffix = Uuid::new_v4().simple().to_string();
            derive_unique_output_name(&asset.original_filename, codec, &suffix[..8])?
        } else {
            derive_output_name(&asset.original_filename, codec)?
        };
        info!("🎥 CODEC: {} -> {}", codec, output_name);

        Self::run_transcoder(state, asset, ["-c:v".to_string(), codec.to_string()], &output_name, codec).await
    }

    pub async fn transcode_by_command(
        state: &AppState,
        asset: &UploadedAsset,
        raw: &str,
        args: Vec<String>,
        output_filename: &str,
    ) -> AppResult<TranscodeResponse> {
        info!("🎥 COMMAND: {} -> {}", raw, output_filename);

        Self::run_transcoder(state, asset, args, output_filename, raw).await
    }

    async fn run_transcoder(
        state: &AppState,
        asset: &UploadedAsset,
        args: impl IntoIterator<Item = String>,
        output_name: &str,
        codec_label: &str,
    ) -> AppResult<TranscodeResponse> {
        let output_path = state.storage.result_path(output_name)?;

        let invocation = Invocation::new(&state.config.transcoder_bin)
            .arg("-y")
            .arg("-i")
            .arg(&asset.storage_path)
            .args(args)
            .arg(&output_path);

        match state.runner.run(&invocation).await {
            ProcessOutcome::Success { .. } => {
                info!("✅ Converted {} -> {}", asset.original_filename, output_name);
                Ok(TranscodeResponse {
                    message: CONVERTED_MESSAGE.to_string(),
                    source_video_path: state.storage.public_upload_path(&asset.storage_path),
                    output_name: output_name.to_string(),
                    codec: codec_label.to_string(),
                })
            }
            ProcessOutcome::Failure { exit_code, stderr } => {
                error!("❌ Transcode of {} failed: {}", asset.original_filename, stderr.trim());
                state.storage.discard_file(&output_path).await;
                Err(AppError::ProcessFailure {
                    program: state.config.transcoder_bin.clone(),
                    exit_code,
                    stderr: state.storage.redact_roots(&stderr),
                })
            }
        }
    }
}
