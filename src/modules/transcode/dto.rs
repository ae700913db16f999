use crate::common::error::{AppError, AppResult};
use crate::common::validation::{ensure_bare_filename, ensure_codec_token, split_raw_args};
use axum::http::HeaderMap;
use serde::Serialize;
use std::path::PathBuf;
use utoipa::ToSchema;

pub const CODEC_HEADER: &str = "codec";
pub const COMMAND_HEADER: &str = "command";
pub const OUTPUT_HEADER: &str = "output";
pub const INPUT_HEADER: &str = "input";

/// A source video written to the uploads root for the current request.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub storage_path: PathBuf,
    pub original_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeRequest {
    Codec {
        codec: String,
    },
    /// `raw` is kept verbatim for the response; `args` is what gets spawned.
    RawCommand {
        raw: String,
        args: Vec<String>,
        output_filename: String,
    },
}

impl TranscodeRequest {
    pub fn codec_from_headers(headers: &HeaderMap) -> AppResult<Self> {
        let codec = required_header(headers, CODEC_HEADER)?;
        ensure_codec_token(&codec)?;
        Ok(TranscodeRequest::Codec { codec })
    }

    pub fn command_from_headers(headers: &HeaderMap) -> AppResult<Self> {
        let raw = required_header(headers, COMMAND_HEADER)?;
        let output_filename = required_header(headers, OUTPUT_HEADER)?;
        ensure_bare_filename(&output_filename)?;
        let args = split_raw_args(&raw)?;
        Ok(TranscodeRequest::RawCommand {
            raw,
            args,
            output_filename,
        })
    }
}

/// Optional `input` header naming the stored upload.
pub fn stored_name_from_headers(headers: &HeaderMap) -> AppResult<Option<String>> {
    match optional_header(headers, INPUT_HEADER)? {
        Some(name) => {
            ensure_bare_filename(&name)?;
            Ok(Some(name))
        }
        None => Ok(None),
    }
}

fn optional_header(headers: &HeaderMap, name: &str) -> AppResult<Option<String>> {
    match headers.get(name) {
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| AppError::InvalidRequest(format!("header '{}' is not valid text", name)))?
                .trim();
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(value.to_string()))
            }
        }
        None => Ok(None),
    }
}

fn required_header(headers: &HeaderMap, name: &str) -> AppResult<String> {
    optional_header(headers, name)?
        .ok_or_else(|| AppError::InvalidRequest(format!("missing '{}' header", name)))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeResponse {
    pub message: String,
    pub source_video_path: String,
    pub output_name: String,
    /// Codec name, or the raw argument string for command requests
    /// (informational only).
    pub codec: String,
}
