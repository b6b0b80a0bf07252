use bson::Document;

use super::{
    CollectionNamespace, EncodableMessage, EncoderError, MessageEncoderFactory, MessageError,
    MessageType, RequestEncoder, RequestMessage, SharedEncoder, bind_encoder, error::required,
};

/// Removes the documents matching `query` from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMessage {
    request_id: i32,
    collection_namespace: CollectionNamespace,
    query: Document,
    is_multi: bool,
}

impl DeleteMessage {
    pub fn new(
        request_id: i32,
        collection_namespace: CollectionNamespace,
        query: Document,
        is_multi: bool,
    ) -> Self {
        Self {
            request_id,
            collection_namespace,
            query,
            is_multi,
        }
    }

    pub fn builder(request_id: i32) -> DeleteMessageBuilder {
        DeleteMessageBuilder {
            request_id,
            ..Default::default()
        }
    }

    pub fn collection_namespace(&self) -> &CollectionNamespace {
        &self.collection_namespace
    }

    pub fn query(&self) -> &Document {
        &self.query
    }

    /// `true` removes every match, `false` only the first.
    pub fn is_multi(&self) -> bool {
        self.is_multi
    }
}

impl RequestMessage for DeleteMessage {
    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn message_type(&self) -> MessageType {
        MessageType::Delete
    }

    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
        bind_encoder(self, factory)
    }
}

impl EncodableMessage for DeleteMessage {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError> {
        factory.delete_message_encoder()
    }
}

#[derive(Debug, Default)]
pub struct DeleteMessageBuilder {
    request_id: i32,
    collection_namespace: Option<CollectionNamespace>,
    query: Option<Document>,
    is_multi: bool,
}

impl DeleteMessageBuilder {
    pub fn collection_namespace(mut self, collection_namespace: CollectionNamespace) -> Self {
        self.collection_namespace = Some(collection_namespace);
        self
    }

    pub fn query(mut self, query: Document) -> Self {
        self.query = Some(query);
        self
    }

    pub fn multi(mut self, is_multi: bool) -> Self {
        self.is_multi = is_multi;
        self
    }

    pub fn build(self) -> Result<DeleteMessage, MessageError> {
        Ok(DeleteMessage::new(
            self.request_id,
            required(self.collection_namespace, "collection_namespace")?,
            required(self.query, "query")?,
            self.is_multi,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bson::doc;

    use super::super::encoder::{MockMessageEncoderFactory, tests::RecordingEncoder};
    use super::*;

    fn namespace() -> CollectionNamespace {
        CollectionNamespace::new("database", "collection")
    }

    fn subject() -> DeleteMessage {
        DeleteMessage::new(1, namespace(), doc! { "x": 1 }, true)
    }

    #[test]
    fn constructor_initializes_instance() {
        for is_multi in [false, true] {
            let message = DeleteMessage::new(-4, namespace(), doc! { "x": 1 }, is_multi);

            assert_eq!(message.request_id(), -4);
            assert_eq!(message.collection_namespace(), &namespace());
            assert_eq!(message.query(), &doc! { "x": 1 });
            assert_eq!(message.is_multi(), is_multi);
            assert_eq!(message.message_type(), MessageType::Delete);
            assert!(message.post_write_action().is_none());
        }
    }

    #[test]
    fn builder_matches_constructor() {
        let built = DeleteMessage::builder(1)
            .collection_namespace(namespace())
            .query(doc! { "x": 1 })
            .multi(true)
            .build()
            .unwrap();

        assert_eq!(built, subject());
    }

    #[test]
    fn builder_without_namespace() {
        let err = DeleteMessage::builder(1)
            .query(doc! {})
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            MessageError::MissingArgument {
                name: "collection_namespace"
            }
        );
    }

    #[test]
    #[should_panic(expected = "MissingArgument")]
    fn builder_without_anything() {
        DeleteMessage::builder(1).build().unwrap();
    }

    #[test]
    fn builder_without_query() {
        let err = DeleteMessage::builder(1)
            .collection_namespace(namespace())
            .build()
            .unwrap_err();

        assert_eq!(err.argument_name(), "query");
    }

    #[test]
    fn typed_and_polymorphic_encoders_are_identical() {
        let encoder = RecordingEncoder::new(7);
        let shared: SharedEncoder<DeleteMessage> = encoder.clone();
        let returned = shared.clone();

        let mut factory = MockMessageEncoderFactory::new();
        factory
            .expect_delete_message_encoder()
            .times(2)
            .returning(move || Ok(returned.clone()));
        factory.expect_query_message_encoder().never();

        let message = subject();
        let typed = message.encoder(&factory).unwrap();
        assert!(Arc::ptr_eq(&typed, &shared));

        let erased = message.request_encoder(&factory).unwrap();
        let mut out = Vec::new();
        erased.write_request(&mut out).unwrap();

        assert_eq!(erased.message_type(), MessageType::Delete);
        assert_eq!(erased.encoder_ptr(), Arc::as_ptr(&shared) as *const ());
        assert_eq!(out, b"7:delete");
        assert_eq!(encoder.writes(), vec![(7, 1)]);
    }

    #[test]
    fn factory_failure_is_passed_through() {
        let mut factory = MockMessageEncoderFactory::new();
        factory.expect_delete_message_encoder().returning(|| {
            Err(EncoderError::Unavailable {
                message_type: MessageType::Delete,
            })
        });

        assert!(matches!(
            subject().request_encoder(&factory),
            Err(EncoderError::Unavailable {
                message_type: MessageType::Delete
            })
        ));
    }
}
