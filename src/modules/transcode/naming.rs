use crate::common::error::{AppError, AppResult};

/// `name.ext` + `token` -> `name_token.ext`.
///
/// Splits on the first `.`, so `archive.tar.gz` keeps `tar.gz` as its
/// extension. Both halves must be non-empty.
pub fn derive_output_name(filename: &str, token: &str) -> AppResult<String> {
    match filename.split_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            Ok(format!("{}_{}.{}", stem, token, ext))
        }
        _ => Err(AppError::InvalidFilename(filename.to_string())),
    }
}

/// Like [`derive_output_name`] with a request-scoped suffix appended to the
/// token, so concurrent requests for the same source never share an output.
pub fn derive_unique_output_name(filename: &str, token: &str, suffix: &str) -> AppResult<String> {
    derive_output_name(filename, &format!("{}_{}", token, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_token_before_extension() {
        assert_eq!(derive_output_name("clip.mp4", "h264").unwrap(), "clip_h264.mp4");
        assert_eq!(derive_output_name("my video.mkv", "vp9").unwrap(), "my video_vp9.mkv");
    }

    #[test]
    fn splits_on_first_dot() {
        assert_eq!(
            derive_output_name("archive.tar.gz", "libx265").unwrap(),
            "archive_libx265.tar.gz"
        );
    }

    #[test]
    fn missing_extension_is_invalid() {
        for name in ["clip", "", ".mp4", "clip."] {
            assert!(
                matches!(derive_output_name(name, "h264"), Err(AppError::InvalidFilename(_))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn naming_is_deterministic() {
        let first = derive_output_name("clip.mp4", "h264").unwrap();
        let second = derive_output_name("clip.mp4", "h264").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unique_names_keep_the_extension() {
        assert_eq!(
            derive_unique_output_name("clip.mp4", "h264", "1a2b3c4d").unwrap(),
            "clip_h264_1a2b3c4d.mp4"
        );
    }
}
