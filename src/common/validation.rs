//! Boundary checks for every client-supplied token that ends up in a
//! filesystem path or a subprocess argument vector.

use crate::common::error::{AppError, AppResult};
use validator::ValidationError;

const MAX_NAME_LEN: usize = 255;
const MAX_CODEC_LEN: usize = 64;

/// Options that would let a caller read or write files outside the
/// storage roots.
const FORBIDDEN_ARGS: &[&str] = &[
    "-i",
    "-y",
    "-n",
    "-filter_script",
    "-filter_complex_script",
    "-passlogfile",
    "-attach",
    "-dump_attachment",
    "-vstats_file",
    "-sdp_file",
    "-progress",
];

/// Options that take no value. Every other option consumes the next token.
const VALUELESS_OPTIONS: &[&str] = &[
    "-an",
    "-vn",
    "-sn",
    "-dn",
    "-shortest",
    "-hide_banner",
    "-nostdin",
    "-nostats",
    "-stats",
    "-copyts",
    "-start_at_zero",
    "-re",
    "-accurate_seek",
    "-noaccurate_seek",
    "-bitexact",
];

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ' | '+' | '(' | ')')
}

fn is_codec_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_option(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// `file:/x`, `pipe:1`, `tcp://host`: a URL scheme the transcoder would open.
fn has_protocol_prefix(arg: &str) -> bool {
    match arg.split_once(':') {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        None => false,
    }
}

fn is_arg_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '_' | '.' | ':' | '=' | ',' | '+' | '/' | '*' | '%' | '@' | '[' | ']')
}

/// Accepts only a bare file name: no separators, no `..`, no leading dot,
/// allow-listed characters.
pub fn ensure_bare_filename(name: &str) -> AppResult<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(AppError::InvalidRequest(format!(
            "filename must be 1..={} bytes",
            MAX_NAME_LEN
        )));
    }

    if name.contains('/') || name.contains('\\') || name.contains("..") || name.starts_with('.') {
        return Err(AppError::PathTraversal(name.to_string()));
    }

    if !name.chars().all(is_name_char) {
        return Err(AppError::InvalidRequest(format!(
            "filename '{}' contains disallowed characters",
            name
        )));
    }

    Ok(())
}

/// Codec names end up inside the output file name, so dots may only sit
/// between other characters.
pub fn ensure_codec_token(codec: &str) -> AppResult<()> {
    if codec.is_empty()
        || codec.len() > MAX_CODEC_LEN
        || !codec.chars().all(is_codec_char)
        || codec.starts_with('.')
        || codec.ends_with('.')
        || codec.contains("..")
    {
        return Err(AppError::InvalidRequest(format!(
            "codec '{}' is not a valid codec name",
            codec
        )));
    }

    Ok(())
}

/// Splits a free-form transcoder argument string on whitespace and checks
/// every token. There is no shell, so quoting is not interpreted.
///
/// Every token must be an option or the value of the option before it. A
/// stray positional token would be opened by the transcoder as an extra
/// output, so it is rejected as a traversal.
pub fn split_raw_args(raw: &str) -> AppResult<Vec<String>> {
    let args: Vec<String> = raw.split_whitespace().map(str::to_string).collect();

    if args.is_empty() {
        return Err(AppError::InvalidRequest("command must not be empty".to_string()));
    }

    let mut expects_value = false;
    for arg in &args {
        if arg.starts_with('/') || arg.starts_with('.') || arg.contains("..") {
            return Err(AppError::PathTraversal(arg.clone()));
        }
        if !arg.chars().all(is_arg_char) {
            return Err(AppError::InvalidRequest(format!(
                "argument '{}' contains disallowed characters",
                arg
            )));
        }

        if is_option(arg) {
            if expects_value {
                return Err(AppError::InvalidRequest(format!(
                    "option '{}' follows an option that expects a value",
                    arg
                )));
            }
            if FORBIDDEN_ARGS.contains(&arg.as_str()) {
                return Err(AppError::InvalidRequest(format!(
                    "option '{}' is not allowed in a command",
                    arg
                )));
            }
            expects_value = !VALUELESS_OPTIONS.contains(&arg.as_str());
            continue;
        }

        if !expects_value || has_protocol_prefix(arg) {
            return Err(AppError::PathTraversal(arg.clone()));
        }
        expects_value = false;
    }

    if expects_value {
        return Err(AppError::InvalidRequest(format!(
            "option '{}' is missing its value",
            args[args.len() - 1]
        )));
    }

    Ok(args)
}

/// `validator` adapter for DTO fields that must be bare file names.
pub fn validate_bare_filename(name: &str) -> Result<(), ValidationError> {
    ensure_bare_filename(name).map_err(|e| {
        let mut error = ValidationError::new("bare_filename");
        error.message = Some(e.to_string().into());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(ensure_bare_filename("clip.mp4").is_ok());
        assert!(ensure_bare_filename("my clip (1).mkv").is_ok());
        assert!(ensure_bare_filename("clip_h264.tar.gz").is_ok());
    }

    #[test]
    fn rejects_traversal() {
        for name in ["../clip.mp4", "a/b.mp4", "..", "a\\b.mp4", ".hidden", "x/../../etc"] {
            assert!(
                matches!(ensure_bare_filename(name), Err(AppError::PathTraversal(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn rejects_shell_metacharacters() {
        for name in ["clip;rm.mp4", "clip$(x).mp4", "a|b.mp4", "clip`.mp4"] {
            assert!(matches!(
                ensure_bare_filename(name),
                Err(AppError::InvalidRequest(_))
            ));
        }
        assert!(ensure_bare_filename("").is_err());
    }

    #[test]
    fn codec_tokens() {
        assert!(ensure_codec_token("h264").is_ok());
        assert!(ensure_codec_token("h264.").is_err());
        assert!(ensure_codec_token(".h264").is_err());
        assert!(ensure_codec_token("h2..64").is_err());
        assert!(ensure_codec_token("libx265").is_ok());
        assert!(ensure_codec_token("h264 -f null").is_err());
        assert!(ensure_codec_token("").is_err());
        assert!(ensure_codec_token("h264;ls").is_err());
    }

    #[test]
    fn splits_args_on_whitespace() {
        let args = split_raw_args("  -c:v libx265   -crf 28 -vf scale=iw/2:ih/2 ").unwrap();
        assert_eq!(
            args,
            vec!["-c:v", "libx265", "-crf", "28", "-vf", "scale=iw/2:ih/2"]
        );
    }

    #[test]
    fn rejects_dangerous_args() {
        assert!(matches!(split_raw_args("-c copy /etc/passwd"), Err(AppError::PathTraversal(_))));
        assert!(matches!(split_raw_args("-c copy ../x.mp4"), Err(AppError::PathTraversal(_))));
        assert!(matches!(split_raw_args("-i secret.mp4"), Err(AppError::InvalidRequest(_))));
        assert!(matches!(split_raw_args("-c:v h264; rm"), Err(AppError::InvalidRequest(_))));
        assert!(matches!(split_raw_args("   "), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn rejects_extra_output_paths() {
        for raw in [
            "-c copy file:/tmp/owned.mp4 -c copy",
            "-f mp4 .env",
            "stolen.mp4",
            "-an stolen.mp4",
            "-c:v libx264 -crf 28 extra.mkv",
            "-metadata pipe:1",
        ] {
            assert!(
                matches!(split_raw_args(raw), Err(AppError::PathTraversal(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn option_values_are_paired() {
        assert_eq!(
            split_raw_args("-an -c:v libx265 -ss -5 -map 0:v").unwrap(),
            vec!["-an", "-c:v", "libx265", "-ss", "-5", "-map", "0:v"]
        );
        assert!(matches!(split_raw_args("-c:v"), Err(AppError::InvalidRequest(_))));
        assert!(matches!(split_raw_args("-c:v -crf 28"), Err(AppError::InvalidRequest(_))));
        assert!(matches!(split_raw_args("-progress x"), Err(AppError::InvalidRequest(_))));
    }
}
