//! Client-to-server request messages.
//!
//! This module models the requests a client sends to a document database:
//! which operation, against which namespace, with which arguments. It does
//! not decide how those requests are laid out in bytes; that is the job of
//! encoders supplied by a [`MessageEncoderFactory`].
//!
//! # Overview
//!
//! Every message implements [`RequestMessage`] and is built through a
//! fallible builder (or a plain constructor where nothing can go wrong).
//! A successfully built message is always valid: required arguments are
//! present and numeric arguments are in range. Failures are reported as
//! [`MessageError`] and name the offending argument.
//!
//! After construction a message is immutable, with two exceptions on
//! [`QueryMessage`]: its [`ResponseHandling`] and its [`PostWriteAction`].
//!
//! # Encoder resolution
//!
//! Each message knows which factory lookup yields its encoder
//! ([`EncodableMessage::encoder`]). Code that only holds a
//! `&dyn RequestMessage`, such as [`MessageWriter`], goes through
//! [`RequestMessage::request_encoder`], which forwards to the same lookup.
//!
//! # Key Components
//!
//! - [`QueryMessage`], [`DeleteMessage`], [`InsertMessage`], [`UpdateMessage`],
//!   [`GetMoreMessage`], [`KillCursorsMessage`]: the operations.
//! - [`MessageEncoderFactory`]: supplies one encoder per operation.
//! - [`MessageWriter`]: drives encoding over any [`std::io::Write`].
//! - [`TextEncoderFactory`]: renders messages as readable text.
mod delete;
mod encoder;
mod error;
mod get_more;
mod insert;
mod kill_cursors;
mod namespace;
mod query;
mod request;
mod response;
mod text;
mod transport;
mod update;
mod validator;

pub use delete::{DeleteMessage, DeleteMessageBuilder};
pub use encoder::{
    BoundEncoder, EncodableMessage, EncoderError, MessageEncoder, MessageEncoderFactory,
    MessageEncoderPostProcessor, PostWriteAction, RequestEncoder, SharedEncoder, bind_encoder,
};
pub use error::MessageError;
pub use get_more::{GetMoreMessage, GetMoreMessageBuilder};
pub use insert::{
    DEFAULT_MAX_BATCH_COUNT, DEFAULT_MAX_MESSAGE_SIZE, InsertMessage, InsertMessageBuilder,
};
pub use kill_cursors::{KillCursorsMessage, KillCursorsMessageBuilder};
pub use namespace::{CollectionNamespace, DatabaseNamespace};
pub use query::{QueryFlags, QueryMessage, QueryMessageBuilder};
pub use request::{MessageType, RequestMessage, current_request_id, next_request_id};
pub use response::ResponseHandling;
pub use text::{TextEncoder, TextEncoderFactory};
pub use transport::{MessageWriter, TransportError};
pub use update::{UpdateMessage, UpdateMessageBuilder};
pub use validator::{
    CollectionElementNameValidator, ElementNameValidator, NoOpElementNameValidator,
};
