use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::transcode::handler::transcode_by_codec,
        crate::modules::transcode::handler::transcode_by_command,
        crate::modules::metrics::handler::compute_metrics,
    ),
    components(
        schemas(
            crate::common::response::ErrorBody,
            crate::modules::transcode::dto::TranscodeResponse,
            crate::modules::metrics::dto::MetricsRequest,
            crate::modules::metrics::dto::MetricsReport,
        )
    ),
    tags(
        (name = "Transcode", description = "Video conversion through the external transcoder"),
        (name = "Metrics", description = "Objective quality metrics of converted videos")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in ["/codecs", "/commands", "/metrics"] {
            assert!(doc.paths.paths.contains_key(path), "{} missing", path);
        }
    }
}
