use std::io::{self, Write};

use log::{debug, trace, warn};
use thiserror::Error;

use super::{EncoderError, MessageEncoderFactory, MessageType, RequestMessage};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] EncoderError),
    #[error("{message_type} encoder cannot run a post-write action")]
    MissingPostProcessor { message_type: MessageType },
    #[error("Transport IO Error: {0}")]
    Io(#[from] io::Error),
}

/// Writes request messages to a stream using the encoders of one factory.
///
/// The writer never looks at the concrete message type: encoders are
/// resolved through [`RequestMessage::request_encoder`].
pub struct MessageWriter<W: Write, F: MessageEncoderFactory> {
    stream: W,
    factory: F,
}

impl<W: Write, F: MessageEncoderFactory> MessageWriter<W, F> {
    pub fn new(stream: W, factory: F) -> Self {
        Self { stream, factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    /// Encodes `message`, runs its post-write action with the encoder's post
    /// processor, then flushes the stream.
    ///
    /// A message whose post-write action cannot run is rejected before any
    /// byte reaches the stream.
    pub fn write_message(&mut self, message: &dyn RequestMessage) -> Result<(), TransportError> {
        let encoder = message.request_encoder(&self.factory)?;

        let post_write = match message.post_write_action() {
            Some(action) => {
                let Some(post_processor) = encoder.post_processor() else {
                    warn!(
                        "post-write action on {} message #{} has no post processor",
                        message.message_type(),
                        message.request_id()
                    );
                    return Err(TransportError::MissingPostProcessor {
                        message_type: message.message_type(),
                    });
                };
                Some((action, post_processor))
            }
            None => None,
        };

        debug!(
            "writing {} message #{}",
            encoder.message_type(),
            message.request_id()
        );
        encoder.write_request(&mut self.stream)?;

        if let Some((action, post_processor)) = post_write {
            trace!("running post-write action for #{}", message.request_id());
            action.invoke(post_processor);
        }

        self.stream.flush()?;
        Ok(())
    }
}
