use std::sync::Arc;

use bson::Document;

use super::{
    CollectionNamespace, ElementNameValidator, EncodableMessage, EncoderError,
    MessageEncoderFactory, MessageError, MessageType, RequestEncoder, RequestMessage,
    SharedEncoder, bind_encoder, error::required,
};

/// Applies `update` to the documents matching `query`.
#[derive(Debug, Clone)]
pub struct UpdateMessage {
    request_id: i32,
    collection_namespace: CollectionNamespace,
    query: Document,
    update: Document,
    update_validator: Arc<dyn ElementNameValidator>,
    is_multi: bool,
    is_upsert: bool,
}

impl UpdateMessage {
    pub fn builder(request_id: i32) -> UpdateMessageBuilder {
        UpdateMessageBuilder {
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

    pub fn update(&self) -> &Document {
        &self.update
    }

    pub fn update_validator(&self) -> &dyn ElementNameValidator {
        self.update_validator.as_ref()
    }

    pub fn is_multi(&self) -> bool {
        self.is_multi
    }

    /// Insert `update` when nothing matches.
    pub fn is_upsert(&self) -> bool {
        self.is_upsert
    }
}

impl RequestMessage for UpdateMessage {
    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn message_type(&self) -> MessageType {
        MessageType::Update
    }

    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
        bind_encoder(self, factory)
    }
}

impl EncodableMessage for UpdateMessage {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError> {
        factory.update_message_encoder()
    }
}

#[derive(Debug, Default)]
pub struct UpdateMessageBuilder {
    request_id: i32,
    collection_namespace: Option<CollectionNamespace>,
    query: Option<Document>,
    update: Option<Document>,
    update_validator: Option<Arc<dyn ElementNameValidator>>,
    is_multi: bool,
    is_upsert: bool,
}

impl UpdateMessageBuilder {
    pub fn collection_namespace(mut self, collection_namespace: CollectionNamespace) -> Self {
        self.collection_namespace = Some(collection_namespace);
        self
    }

    pub fn query(mut self, query: Document) -> Self {
        self.query = Some(query);
        self
    }

    pub fn update(mut self, update: Document) -> Self {
        self.update = Some(update);
        self
    }

    pub fn update_validator(mut self, validator: Arc<dyn ElementNameValidator>) -> Self {
        self.update_validator = Some(validator);
        self
    }

    pub fn multi(mut self, is_multi: bool) -> Self {
        self.is_multi = is_multi;
        self
    }

    pub fn upsert(mut self, is_upsert: bool) -> Self {
        self.is_upsert = is_upsert;
        self
    }

    pub fn build(self) -> Result<UpdateMessage, MessageError> {
        Ok(UpdateMessage {
            request_id: self.request_id,
            collection_namespace: required(self.collection_namespace, "collection_namespace")?,
            query: required(self.query, "query")?,
            update: required(self.update, "update")?,
            update_validator: required(self.update_validator, "update_validator")?,
            is_multi: self.is_multi,
            is_upsert: self.is_upsert,
        })
    }
}
