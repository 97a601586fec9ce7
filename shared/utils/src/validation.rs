use crate::error::{HealthBotError, HealthBotResult};
use regex::Regex;
use std::sync::OnceLock;

/// File extensions accepted by the PDF upload endpoint.
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["pdf"];

/// Trims `text` and rejects it when nothing is left.
pub fn validate_message<'a>(field: &str, text: &'a str) -> HealthBotResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(HealthBotError::validation(
            field,
            format!("Field '{}' must not be empty", field),
        ));
    }
    Ok(trimmed)
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> HealthBotResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(HealthBotError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file_size: u64, max_size: u64) -> HealthBotResult<()> {
    if file_size > max_size {
        return Err(HealthBotError::validation(
            "file_size",
            format!(
                "File size {} bytes exceeds maximum allowed size {} bytes",
                file_size, max_size
            ),
        ));
    }

    Ok(())
}

/// Checks that `index` addresses an element of a collection of `len` items.
pub fn validate_index(resource: &str, index: usize, len: usize) -> HealthBotResult<()> {
    if index >= len {
        return Err(HealthBotError::not_found(format!("{} {}", resource, index)));
    }
    Ok(())
}

/// Reduces an uploaded filename to a safe single path component.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`, maps whitespace to `_`,
/// drops everything else and strips leading dots and underscores. Returns `None` when
/// nothing usable remains.
pub fn sanitize_filename(file_name: &str) -> Option<String> {
    static UNDERSCORES: OnceLock<Regex> = OnceLock::new();

    // Browsers on Windows may send the full client path.
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name);

    let mapped: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let re = UNDERSCORES.get_or_init(|| Regex::new(r"_{2,}").expect("static regex"));
    let collapsed = re.replace_all(&mapped, "_");
    let cleaned = collapsed
        .trim_start_matches(|c| c == '.' || c == '_')
        .trim_end_matches('_');

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message("message", "  hello \n").unwrap(), "hello");
        assert!(validate_message("message", "").is_err());
        assert!(validate_message("message", " \t\n ").is_err());
    }

    #[test]
    fn test_validate_file_type() {
        assert!(validate_file_type("report.pdf", ALLOWED_UPLOAD_EXTENSIONS).is_ok());
        assert!(validate_file_type("REPORT.PDF", ALLOWED_UPLOAD_EXTENSIONS).is_ok());
        assert!(validate_file_type("report.txt", ALLOWED_UPLOAD_EXTENSIONS).is_err());
        assert!(validate_file_type("report", ALLOWED_UPLOAD_EXTENSIONS).is_err());
        assert!(validate_file_type("report.pdf.exe", ALLOWED_UPLOAD_EXTENSIONS).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        let max = 16 * 1024 * 1024;
        assert!(validate_file_size(max, max).is_ok());
        assert!(validate_file_size(max + 1, max).is_err());
    }

    #[test]
    fn test_validate_index() {
        assert!(validate_index("message", 0, 1).is_ok());
        let err = validate_index("message", 1, 1).unwrap_err();
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf").as_deref(), Some("report.pdf"));
        assert_eq!(sanitize_filename("My Lab Results.pdf").as_deref(), Some("My_Lab_Results.pdf"));
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.pdf").as_deref(), Some("scan.pdf"));
        assert_eq!(sanitize_filename(".hidden.pdf").as_deref(), Some("hidden.pdf"));
        assert_eq!(sanitize_filename("résumé.pdf").as_deref(), Some("rsum.pdf"));
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename(""), None);
    }

    proptest! {
        #[test]
        fn prop_sanitized_filename_is_single_safe_component(name in "\\PC{0,40}") {
            if let Some(clean) = sanitize_filename(&name) {
                prop_assert!(!clean.contains('/'));
                prop_assert!(!clean.contains('\\'));
                prop_assert!(!clean.starts_with('.'));
                prop_assert!(clean.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
            }
        }
    }
}
