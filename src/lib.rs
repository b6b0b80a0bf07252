pub mod command;
pub mod protocol;

pub use command::{Command, CommandError};
pub use protocol::{
    CollectionNamespace, DeleteMessage, EncodableMessage, MessageEncoderFactory, MessageError,
    MessageType, MessageWriter, QueryMessage, RequestMessage, ResponseHandling,
};
