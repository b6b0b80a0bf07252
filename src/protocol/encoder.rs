//! Encoder resolution.
//!
//! Message types describe *what* is sent; encoders decide *how* it is laid out
//! on the wire. A [`MessageEncoderFactory`] supplies one encoder per message
//! type, and every message knows which lookup to ask for. That keeps new wire
//! formats out of the message types: adding one means adding a factory.
//!
//! Two resolution paths exist:
//!
//! - [`EncodableMessage::encoder`], typed on the concrete message, for callers
//!   that know what they hold.
//! - [`RequestMessage::request_encoder`](super::RequestMessage::request_encoder),
//!   for writers that only hold a `&dyn RequestMessage`. It forwards to the
//!   typed path and wraps the result in a [`BoundEncoder`].
use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};

use thiserror::Error;

use super::{
    DeleteMessage, GetMoreMessage, InsertMessage, KillCursorsMessage, MessageType, QueryMessage,
    RequestMessage, UpdateMessage,
};

/// Failures reported by encoders and encoder factories.
///
/// These originate outside the message model and are passed through unchanged.
#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("no encoder available for {message_type} messages")]
    Unavailable { message_type: MessageType },

    #[error("invalid element name '{name}'")]
    InvalidElementName { name: String },

    #[error("encoder IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Hook an encoder exposes for adjustments made after a message was written.
pub trait MessageEncoderPostProcessor {
    /// Turns an unacknowledged write into an acknowledged one.
    fn change_write_concern_from_w0_to_w1(&self);
}

/// Serializes one message type.
pub trait MessageEncoder<M>: Send + Sync {
    fn write_message(&self, message: &M, out: &mut dyn Write) -> Result<(), EncoderError>;

    fn post_processor(&self) -> Option<&dyn MessageEncoderPostProcessor> {
        None
    }
}

/// Encoder handle as handed out by a factory.
pub type SharedEncoder<M> = Arc<dyn MessageEncoder<M>>;

/// Supplies the encoder for each message type.
#[cfg_attr(test, mockall::automock)]
pub trait MessageEncoderFactory {
    fn delete_message_encoder(&self) -> Result<SharedEncoder<DeleteMessage>, EncoderError>;

    fn get_more_message_encoder(&self) -> Result<SharedEncoder<GetMoreMessage>, EncoderError>;

    fn insert_message_encoder(&self) -> Result<SharedEncoder<InsertMessage>, EncoderError>;

    fn kill_cursors_message_encoder(
        &self,
    ) -> Result<SharedEncoder<KillCursorsMessage>, EncoderError>;

    fn query_message_encoder(&self) -> Result<SharedEncoder<QueryMessage>, EncoderError>;

    fn update_message_encoder(&self) -> Result<SharedEncoder<UpdateMessage>, EncoderError>;
}

/// A message that knows which factory lookup produces its encoder.
pub trait EncodableMessage: RequestMessage + Sized {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError>;
}

/// Type-erased encoder, already bound to the message it will write.
pub trait RequestEncoder {
    fn message_type(&self) -> MessageType;

    fn write_request(&self, out: &mut dyn Write) -> Result<(), EncoderError>;

    fn post_processor(&self) -> Option<&dyn MessageEncoderPostProcessor>;

    /// Address of the underlying encoder, for comparison with the handle
    /// the factory returned.
    fn encoder_ptr(&self) -> *const ();
}

/// Pairs a message with the encoder resolved for it.
pub struct BoundEncoder<'a, M> {
    message: &'a M,
    encoder: SharedEncoder<M>,
}

impl<'a, M> BoundEncoder<'a, M> {
    pub fn new(message: &'a M, encoder: SharedEncoder<M>) -> Self {
        Self { message, encoder }
    }
}

impl<M: RequestMessage> RequestEncoder for BoundEncoder<'_, M> {
    fn message_type(&self) -> MessageType {
        self.message.message_type()
    }

    fn write_request(&self, out: &mut dyn Write) -> Result<(), EncoderError> {
        self.encoder.write_message(self.message, out)
    }

    fn post_processor(&self) -> Option<&dyn MessageEncoderPostProcessor> {
        self.encoder.post_processor()
    }

    fn encoder_ptr(&self) -> *const () {
        Arc::as_ptr(&self.encoder) as *const ()
    }
}

/// Resolves `message`'s encoder through its typed lookup and erases the type.
pub fn bind_encoder<'a, M: EncodableMessage>(
    message: &'a M,
    factory: &dyn MessageEncoderFactory,
) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
    let encoder = message.encoder(factory)?;
    Ok(Box::new(BoundEncoder::new(message, encoder)))
}

/// Callback run by the writer once a message has been encoded.
///
/// Clones share the same callback.
#[derive(Clone)]
pub struct PostWriteAction(Arc<dyn Fn(&dyn MessageEncoderPostProcessor) + Send + Sync>);

impl PostWriteAction {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&dyn MessageEncoderPostProcessor) + Send + Sync + 'static,
    {
        Self(Arc::new(action))
    }

    pub fn invoke(&self, post_processor: &dyn MessageEncoderPostProcessor) {
        (self.0)(post_processor)
    }

    /// Whether both handles refer to the same callback.
    pub fn ptr_eq(&self, other: &PostWriteAction) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PostWriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PostWriteAction").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    /// Encoder that records which encoder instance wrote which request.
    pub(crate) struct RecordingEncoder {
        pub id: u32,
        pub writes: Mutex<Vec<(u32, i32)>>,
        pub upgrades: AtomicUsize,
    }

    impl RecordingEncoder {
        pub fn new(id: u32) -> Arc<Self> {
            Arc::new(Self {
                id,
                writes: Mutex::new(Vec::new()),
                upgrades: AtomicUsize::new(0),
            })
        }

        pub fn writes(&self) -> Vec<(u32, i32)> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl<M: RequestMessage> MessageEncoder<M> for RecordingEncoder {
        fn write_message(&self, message: &M, out: &mut dyn Write) -> Result<(), EncoderError> {
            self.writes
                .lock()
                .unwrap()
                .push((self.id, message.request_id()));
            write!(out, "{}:{}", self.id, message.message_type())?;
            Ok(())
        }

        fn post_processor(&self) -> Option<&dyn MessageEncoderPostProcessor> {
            Some(self)
        }
    }

    impl MessageEncoderPostProcessor for RecordingEncoder {
        fn change_write_concern_from_w0_to_w1(&self) {
            self.upgrades.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn post_write_action_invokes_callback() {
        let encoder = RecordingEncoder::new(1);
        let action = PostWriteAction::new(|p| p.change_write_concern_from_w0_to_w1());

        action.invoke(encoder.as_ref());
        action.clone().invoke(encoder.as_ref());

        assert_eq!(encoder.upgrades.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn post_write_action_identity() {
        let action = PostWriteAction::new(|_| {});
        let other = PostWriteAction::new(|_| {});

        assert!(action.ptr_eq(&action.clone()));
        assert!(!action.ptr_eq(&other));
        assert_eq!(format!("{action:?}"), "PostWriteAction(..)");
    }

    #[test]
    fn unavailable_error_names_message_type() {
        let err = EncoderError::Unavailable {
            message_type: MessageType::KillCursors,
        };
        assert_eq!(
            err.to_string(),
            "no encoder available for kill_cursors messages"
        );
    }
}
