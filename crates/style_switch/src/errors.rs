use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// Raw flag input outside of `0`/`1`.
    #[error("value must be 0 or 1 for clipping auto-adjust, got {value}")]
    InvalidFlagValue { value: i64 },
}

/// Interpret an integer as a strict boolean flag.
pub fn flag_from_value(value: i64) -> Result<bool, SwitchError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(SwitchError::InvalidFlagValue { value }),
    }
}
