//! Join-time identity validation.
//!
//! Applied before a player record is created. Names are trimmed and
//! truncated rather than rejected when over-long; only an empty name
//! is an error. Photos are optional and fail the check over the byte
//! cap, so one join can't balloon server memory; callers drop the
//! field and carry on.

use crate::SessionError;

/// Trims and caps a display name.
///
/// # Errors
/// [`SessionError::NameRequired`] when nothing is left after trimming.
pub fn sanitize_name(raw: &str, max_chars: usize) -> Result<String, SessionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::NameRequired);
    }
    Ok(trimmed.chars().take(max_chars).collect())
}

/// Validates an optional encoded photo against the byte cap.
///
/// # Errors
/// [`SessionError::PhotoTooLarge`] when the payload exceeds the cap.
pub fn check_photo(photo: Option<String>, max_bytes: usize) -> Result<Option<String>, SessionError> {
    match photo {
        Some(p) if p.len() > max_bytes => Err(SessionError::PhotoTooLarge {
            size: p.len(),
            limit: max_bytes,
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_trims_and_caps() {
        let name = sanitize_name("  Ana The Unstoppable Quizmaster  ", 20).unwrap();
        assert_eq!(name, "Ana The Unstoppable ");
        assert_eq!(sanitize_name("Bart", 20).unwrap(), "Bart");
    }

    #[test]
    fn test_sanitize_name_rejects_whitespace_only() {
        assert!(matches!(
            sanitize_name("   ", 20),
            Err(SessionError::NameRequired)
        ));
    }

    #[test]
    fn test_check_photo_enforces_byte_cap() {
        assert_eq!(check_photo(None, 10).unwrap(), None);
        assert_eq!(
            check_photo(Some("ok".into()), 10).unwrap(),
            Some("ok".into())
        );
        assert!(matches!(
            check_photo(Some("x".repeat(11)), 10),
            Err(SessionError::PhotoTooLarge { size: 11, limit: 10 })
        ));
    }
}
