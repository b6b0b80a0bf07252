use std::fmt;

use super::MessageError;

/// What the caller expects to happen with the reply to a request.
///
/// Only [`Return`](ResponseHandling::Return) and [`Ignore`](ResponseHandling::Ignore)
/// may be requested by a caller. [`NoResponseExpected`](ResponseHandling::NoResponseExpected)
/// is reached by encoders that know the server will not reply at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseHandling {
    /// The reply is read and handed back to the caller.
    #[default]
    Return,
    /// A reply may arrive and must be drained, but its content is discarded.
    Ignore,
    /// No reply will be sent for this request.
    NoResponseExpected,
}

impl ResponseHandling {
    /// Whether a caller may request this handling on a message.
    pub fn is_requestable(self) -> bool {
        matches!(self, ResponseHandling::Return | ResponseHandling::Ignore)
    }
}

impl TryFrom<i32> for ResponseHandling {
    type Error = MessageError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ResponseHandling::Return),
            1 => Ok(ResponseHandling::Ignore),
            2 => Ok(ResponseHandling::NoResponseExpected),
            v => Err(MessageError::InvalidArgument {
                name: "value",
                reason: format!("{v} is not a response handling value"),
            }),
        }
    }
}

impl From<ResponseHandling> for i32 {
    fn from(value: ResponseHandling) -> Self {
        match value {
            ResponseHandling::Return => 0,
            ResponseHandling::Ignore => 1,
            ResponseHandling::NoResponseExpected => 2,
        }
    }
}

impl fmt::Display for ResponseHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseHandling::Return => "return",
            ResponseHandling::Ignore => "ignore",
            ResponseHandling::NoResponseExpected => "no-response-expected",
        };
        write!(f, "{name}")
    }
}
