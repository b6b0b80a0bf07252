use super::{
    EncodableMessage, EncoderError, MessageEncoderFactory, MessageError, MessageType,
    RequestEncoder, RequestMessage, SharedEncoder, bind_encoder, error::required,
};

/// Closes server-side cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillCursorsMessage {
    request_id: i32,
    cursor_ids: Vec<i64>,
}

impl KillCursorsMessage {
    pub fn new(request_id: i32, cursor_ids: Vec<i64>) -> Self {
        Self {
            request_id,
            cursor_ids,
        }
    }

    pub fn builder(request_id: i32) -> KillCursorsMessageBuilder {
        KillCursorsMessageBuilder {
            request_id,
            cursor_ids: None,
        }
    }

    pub fn cursor_ids(&self) -> &[i64] {
        &self.cursor_ids
    }
}

impl RequestMessage for KillCursorsMessage {
    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn message_type(&self) -> MessageType {
        MessageType::KillCursors
    }

    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
        bind_encoder(self, factory)
    }
}

impl EncodableMessage for KillCursorsMessage {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError> {
        factory.kill_cursors_message_encoder()
    }
}

#[derive(Debug)]
pub struct KillCursorsMessageBuilder {
    request_id: i32,
    cursor_ids: Option<Vec<i64>>,
}

impl KillCursorsMessageBuilder {
    pub fn cursor_ids(mut self, cursor_ids: impl IntoIterator<Item = i64>) -> Self {
        self.cursor_ids
            .get_or_insert_with(Vec::new)
            .extend(cursor_ids);
        self
    }

    pub fn build(self) -> Result<KillCursorsMessage, MessageError> {
        Ok(KillCursorsMessage::new(
            self.request_id,
            required(self.cursor_ids, "cursor_ids")?,
        ))
    }
}
