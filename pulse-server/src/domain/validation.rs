use thiserror::Error;

pub const POST_TEXT_MIN_CHARS: usize = 10;
pub const COMMENT_TEXT_MIN_CHARS: usize = 4;
pub const COMMENT_TEXT_MAX_CHARS: usize = 140;

/// A field-level rejection. Carries the offending value so the caller can
/// echo it back on the originating form.
#[derive(Debug, Clone, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
    pub value: String,
}

impl ValidationError {
    fn new(field: &'static str, message: String, value: &str) -> Self {
        Self {
            field,
            message,
            value: value.to_owned(),
        }
    }
}

/// Lengths are counted in characters, not bytes, so non-ASCII text is
/// measured the way a reader would count it.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn min_size(text: &str) -> Result<(), ValidationError> {
    if char_len(text) < POST_TEXT_MIN_CHARS {
        return Err(ValidationError::new(
            "text",
            format!("post text must contain at least {POST_TEXT_MIN_CHARS} characters"),
            text,
        ));
    }
    Ok(())
}

pub fn size_comment(text: &str) -> Result<(), ValidationError> {
    let len = char_len(text);
    if len < COMMENT_TEXT_MIN_CHARS {
        return Err(ValidationError::new(
            "text",
            format!("comment must contain at least {COMMENT_TEXT_MIN_CHARS} characters"),
            text,
        ));
    }
    if len > COMMENT_TEXT_MAX_CHARS {
        return Err(ValidationError::new(
            "text",
            format!("comment must contain at most {COMMENT_TEXT_MAX_CHARS} characters"),
            text,
        ));
    }
    Ok(())
}

pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(
            "value",
            "an empty value is not allowed".to_string(),
            value,
        ));
    }
    Ok(())
}
