use super::dto::{stored_name_from_headers, TranscodeRequest, TranscodeResponse};
use super::service::TranscodeService;
use crate::common::error::AppResult;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::common::upload::receive_video;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

/// Convert an uploaded video to a named codec
///
/// Output is named `<stem>_<codec>.<ext>` and written to the results root.
#[utoipa::path(
    post,
    path = "/codecs",
    params(
        ("codec" = String, Header, description = "Target video codec, e.g. h264"),
        ("input" = Option<String>, Header, description = "Filename to store the upload under")
    ),
    request_body(content = String, content_type = "multipart/form-data", description = "Field `video`"),
    responses(
        (status = 200, description = "File converted", body = TranscodeResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Transcoder failed", body = ErrorBody)
    ),
    tag = "Transcode"
)]
pub async fn transcode_by_codec(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = TranscodeRequest::codec_from_headers(&headers)?;
    handle(state, headers, multipart, request).await
}

/// Convert an uploaded video with free-form transcoder arguments
///
/// The `command` header is split on whitespace and spliced between the
/// input and output paths. `output` names the result file.
#[utoipa::path(
    post,
    path = "/commands",
    params(
        ("command" = String, Header, description = "Transcoder arguments, e.g. `-c:v libx265 -crf 28`"),
        ("output" = String, Header, description = "Output filename (bare name)"),
        ("input" = Option<String>, Header, description = "Filename to store the upload under")
    ),
    request_body(content = String, content_type = "multipart/form-data", description = "Field `video`"),
    responses(
        (status = 200, description = "File converted", body = TranscodeResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Transcoder failed", body = ErrorBody)
    ),
    tag = "Transcode"
)]
pub async fn transcode_by_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = TranscodeRequest::command_from_headers(&headers)?;
    handle(state, headers, multipart, request).await
}

// Headers are validated before the body is read so a bad request never
// touches the uploads root.
async fn handle(
    state: AppState,
    headers: HeaderMap,
    mut multipart: Multipart,
    request: TranscodeRequest,
) -> AppResult<impl IntoResponse> {
    let stored_name = stored_name_from_headers(&headers)?;
    let asset = receive_video(&state.storage, &mut multipart, stored_name.as_deref()).await?;

    match TranscodeService::transcode(&state, &asset, request).await {
        Ok(response) => Ok(ApiSuccess(response, StatusCode::OK)),
        Err(e) => {
            // Naming errors surface only after the upload landed.
            if e.status_code().is_client_error() {
                state.storage.discard_file(&asset.storage_path).await;
            }
            Err(e)
        }
    }
}
