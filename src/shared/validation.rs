use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that may not appear in a storage key segment
    /// - Kept: ASCII letters, digits, `_`, `-`
    /// - Replaced: spaces, punctuation, Cyrillic and any other non-ASCII
    pub static ref UNSAFE_FILE_NAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// Make an uploaded file name safe for use in a storage key.
///
/// Directory components sent by the client are dropped, unsafe characters in
/// the stem and the extension become `_`, and the `.ext` suffix is kept.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name);

    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let mut sanitized = UNSAFE_FILE_NAME_CHARS.replace_all(stem, "_").into_owned();
    if sanitized.is_empty() {
        sanitized.push_str("file");
    }

    if let Some(ext) = extension {
        sanitized.push('.');
        sanitized.push_str(&UNSAFE_FILE_NAME_CHARS.replace_all(ext, "_"));
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_names() {
        assert_eq!(sanitize_file_name("order_12-a.pdf"), "order_12-a.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(
            sanitize_file_name("tech report (v2).PDF"),
            "tech_report__v2_.PDF"
        );
        assert_eq!(sanitize_file_name("a.b.c.jpg"), "a_b_c.jpg");
    }

    #[test]
    fn test_sanitize_non_ascii_keeps_extension() {
        let sanitized = sanitize_file_name("Акт приймання.pdf");
        assert!(sanitized.ends_with(".pdf"));
        let stem = sanitized.trim_end_matches(".pdf");
        assert!(stem.chars().all(|c| c == '_'));
        assert_eq!(stem.chars().count(), "Акт приймання".chars().count());
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\scans\\act 1.png"), "act_1.png");
    }

    #[test]
    fn test_sanitize_edge_cases() {
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name(".env"), "_env");
        assert_eq!(sanitize_file_name("archive."), "archive_");
    }
}
