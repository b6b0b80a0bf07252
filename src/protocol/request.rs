use std::{
    fmt,
    sync::atomic::{AtomicI32, Ordering},
};

use super::{EncoderError, MessageEncoderFactory, PostWriteAction, RequestEncoder};

static CURRENT_REQUEST_ID: AtomicI32 = AtomicI32::new(0);

/// Hands out the next process-wide request id.
///
/// Ids increase by one per call and wrap at `i32::MAX`. Using this is
/// optional; any caller-chosen id is accepted by the messages.
pub fn next_request_id() -> i32 {
    CURRENT_REQUEST_ID
        .fetch_add(1, Ordering::Relaxed)
        .wrapping_add(1)
}

/// Last id returned by [`next_request_id`].
pub fn current_request_id() -> i32 {
    CURRENT_REQUEST_ID.load(Ordering::Relaxed)
}

/// Operation a request message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Delete,
    GetMore,
    Insert,
    KillCursors,
    Query,
    Update,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Delete => "delete",
            MessageType::GetMore => "get_more",
            MessageType::Insert => "insert",
            MessageType::KillCursors => "kill_cursors",
            MessageType::Query => "query",
            MessageType::Update => "update",
        };
        write!(f, "{name}")
    }
}

/// Contract shared by every client-to-server message.
///
/// Writers only hold a `&dyn RequestMessage`; [`request_encoder`] lets them
/// obtain a working encoder without matching on the concrete message type.
///
/// [`request_encoder`]: RequestMessage::request_encoder
pub trait RequestMessage: fmt::Debug {
    /// Caller-assigned id of this request. Any value is accepted.
    fn request_id(&self) -> i32;

    fn message_type(&self) -> MessageType;

    /// Callback the writer runs after the message has been encoded.
    fn post_write_action(&self) -> Option<&PostWriteAction> {
        None
    }

    /// Resolves the encoder for this message through `factory` and binds it
    /// to the message.
    ///
    /// Implementations forward to [`EncodableMessage::encoder`](super::EncodableMessage::encoder)
    /// through [`bind_encoder`](super::bind_encoder) so both paths always pick
    /// the same encoder.
    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError>;
}
