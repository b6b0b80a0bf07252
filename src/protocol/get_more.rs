use super::{
    CollectionNamespace, EncodableMessage, EncoderError, MessageEncoderFactory, MessageError,
    MessageType, RequestEncoder, RequestMessage, SharedEncoder, bind_encoder, error::required,
};

/// Fetches the next batch from an open cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMoreMessage {
    request_id: i32,
    collection_namespace: CollectionNamespace,
    cursor_id: i64,
    batch_size: i32,
}

impl GetMoreMessage {
    pub fn new(
        request_id: i32,
        collection_namespace: CollectionNamespace,
        cursor_id: i64,
        batch_size: i32,
    ) -> Self {
        Self {
            request_id,
            collection_namespace,
            cursor_id,
            batch_size,
        }
    }

    pub fn builder(request_id: i32) -> GetMoreMessageBuilder {
        GetMoreMessageBuilder {
            request_id,
            ..Default::default()
        }
    }

    pub fn collection_namespace(&self) -> &CollectionNamespace {
        &self.collection_namespace
    }

    pub fn cursor_id(&self) -> i64 {
        self.cursor_id
    }

    pub fn batch_size(&self) -> i32 {
        self.batch_size
    }
}

impl RequestMessage for GetMoreMessage {
    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn message_type(&self) -> MessageType {
        MessageType::GetMore
    }

    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
        bind_encoder(self, factory)
    }
}

impl EncodableMessage for GetMoreMessage {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError> {
        factory.get_more_message_encoder()
    }
}

#[derive(Debug, Default)]
pub struct GetMoreMessageBuilder {
    request_id: i32,
    collection_namespace: Option<CollectionNamespace>,
    cursor_id: i64,
    batch_size: i32,
}

impl GetMoreMessageBuilder {
    pub fn collection_namespace(mut self, collection_namespace: CollectionNamespace) -> Self {
        self.collection_namespace = Some(collection_namespace);
        self
    }

    pub fn cursor_id(mut self, cursor_id: i64) -> Self {
        self.cursor_id = cursor_id;
        self
    }

    pub fn batch_size(mut self, batch_size: i32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn build(self) -> Result<GetMoreMessage, MessageError> {
        Ok(GetMoreMessage::new(
            self.request_id,
            required(self.collection_namespace, "collection_namespace")?,
            self.cursor_id,
            self.batch_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::encoder::{MockMessageEncoderFactory, tests::RecordingEncoder};
    use super::*;

    #[test]
    fn builder_matches_constructor() {
        let ns = CollectionNamespace::new("db", "events");
        let built = GetMoreMessage::builder(3)
            .collection_namespace(ns.clone())
            .cursor_id(i64::MAX)
            .batch_size(-2)
            .build()
            .unwrap();

        assert_eq!(built, GetMoreMessage::new(3, ns, i64::MAX, -2));
        assert_eq!(built.cursor_id(), i64::MAX);
        assert_eq!(built.batch_size(), -2);
        assert_eq!(built.message_type(), MessageType::GetMore);
    }

    #[test]
    fn builder_without_namespace() {
        let err = GetMoreMessage::builder(3).cursor_id(1).build().unwrap_err();
        assert_eq!(err.argument_name(), "collection_namespace");
    }

    #[test]
    fn resolves_get_more_encoder() {
        let encoder: SharedEncoder<GetMoreMessage> = RecordingEncoder::new(2);
        let mut factory = MockMessageEncoderFactory::new();
        factory
            .expect_get_more_message_encoder()
            .times(1)
            .returning(move || Ok(encoder.clone()));

        let message = GetMoreMessage::new(3, CollectionNamespace::new("db", "c"), 10, 0);
        let mut out = Vec::new();
        message
            .request_encoder(&factory)
            .unwrap()
            .write_request(&mut out)
            .unwrap();

        assert_eq!(out, b"2:get_more");
    }
}
