use crate::utils::error::{KitError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                &format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            &format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// 來源可以是 http(s) 網址或本地檔案路徑
pub fn validate_source(field_name: &str, source: &str) -> Result<()> {
    if is_remote_source(source) {
        validate_url(field_name, source)
    } else {
        validate_path(field_name, source)
    }
}

pub fn is_remote_source(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| KitError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 不在任何範圍內
    if !(value >= min && value <= max) {
        return Err(invalid(
            field_name,
            &value.to_string(),
            &format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            &format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

fn invalid(field_name: &str, value: &str, reason: &str) -> KitError {
    KitError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("cleanup.source", "https://example.org/api/campaigns").is_ok());
        assert!(validate_url("cleanup.source", "http://localhost:8080").is_ok());
        assert!(validate_url("cleanup.source", "").is_err());
        assert!(validate_url("cleanup.source", "invalid-url").is_err());
        assert!(validate_url("cleanup.source", "ftp://example.org").is_err());
    }

    #[test]
    fn test_validate_source_accepts_paths_and_urls() {
        assert!(validate_source("cleanup.source", "campaigns.json").is_ok());
        assert!(validate_source("cleanup.source", "https://example.org/campaigns").is_ok());
        assert!(validate_source("cleanup.source", "").is_err());
        assert!(validate_source("cleanup.source", "http://").is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("count_up.restart_epsilon", 0.01, 0.0, 1.0).is_ok());
        assert!(validate_range("count_up.restart_epsilon", f64::NAN, 0.0, 1.0).is_err());
        assert!(validate_range("normalizer.max_iterations", 0usize, 1, 100).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("cleanup.output_formats", "csv", &["csv", "json"]).is_ok());
        let err = validate_one_of("cleanup.output_formats", "xml", &["csv", "json"]).unwrap_err();
        assert!(err.to_string().contains("csv, json"));
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("x".to_string());
        assert_eq!(validate_required_field("a", &present).unwrap(), "x");
        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("cleanup.source", &missing),
            Err(KitError::MissingConfigError { .. })
        ));
    }
}
