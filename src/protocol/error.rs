use thiserror::Error;

/// Failures raised while building a request message or assigning one of its
/// mutable properties.
///
/// Every variant carries the name of the offending argument so callers can
/// tell causes apart without parsing the message text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("missing required argument '{name}'")]
    MissingArgument { name: &'static str },

    #[error("argument '{name}' is out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },

    #[error("invalid argument '{name}', {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

impl MessageError {
    /// Name of the argument or property that was rejected.
    pub fn argument_name(&self) -> &'static str {
        match self {
            MessageError::MissingArgument { name }
            | MessageError::OutOfRange { name, .. }
            | MessageError::InvalidArgument { name, .. } => name,
        }
    }
}

/// Unwraps a required builder argument.
pub(crate) fn required<T>(value: Option<T>, name: &'static str) -> Result<T, MessageError> {
    value.ok_or(MessageError::MissingArgument { name })
}

/// Rejects negative values of a numeric argument.
pub(crate) fn non_negative(value: i32, name: &'static str) -> Result<i32, MessageError> {
    if value < 0 {
        return Err(MessageError::OutOfRange {
            name,
            value: value.into(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_name_for_every_variant() {
        let errors = vec![
            (MessageError::MissingArgument { name: "query" }, "query"),
            (
                MessageError::OutOfRange {
                    name: "skip",
                    value: -1,
                },
                "skip",
            ),
            (
                MessageError::InvalidArgument {
                    name: "response_handling",
                    reason: String::new(),
                },
                "response_handling",
            ),
        ];

        for (error, name) in errors {
            assert_eq!(error.argument_name(), name);
        }
    }

    #[test]
    fn required_reports_missing_name() {
        let err = required::<i32>(None, "collection_namespace").unwrap_err();
        assert_eq!(
            err,
            MessageError::MissingArgument {
                name: "collection_namespace"
            }
        );
        assert_eq!(required(Some(3), "skip"), Ok(3));
    }

    #[test]
    fn non_negative_bounds() {
        assert_eq!(non_negative(0, "skip"), Ok(0));
        assert_eq!(
            non_negative(-1, "skip"),
            Err(MessageError::OutOfRange {
                name: "skip",
                value: -1
            })
        );
        assert_eq!(
            non_negative(-1, "skip").unwrap_err().to_string(),
            "argument 'skip' is out of range: -1"
        );
    }
}
