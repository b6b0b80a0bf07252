use bson::Document;

use super::{
    CollectionNamespace, EncodableMessage, EncoderError, MessageEncoderFactory, MessageError,
    MessageType, RequestEncoder, RequestMessage, SharedEncoder, bind_encoder,
    error::{non_negative, required},
};

/// Upper bound on documents per insert batch when the caller sets none.
pub const DEFAULT_MAX_BATCH_COUNT: i32 = 1000;
/// Upper bound on the encoded size of one insert message when the caller sets none.
pub const DEFAULT_MAX_MESSAGE_SIZE: i32 = 48_000_000;

/// Adds documents to a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertMessage {
    request_id: i32,
    collection_namespace: CollectionNamespace,
    documents: Vec<Document>,
    max_batch_count: i32,
    max_message_size: i32,
    continue_on_error: bool,
}

impl InsertMessage {
    pub fn builder(request_id: i32) -> InsertMessageBuilder {
        InsertMessageBuilder {
            request_id,
            collection_namespace: None,
            documents: Vec::new(),
            max_batch_count: DEFAULT_MAX_BATCH_COUNT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            continue_on_error: false,
        }
    }

    pub fn collection_namespace(&self) -> &CollectionNamespace {
        &self.collection_namespace
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn max_batch_count(&self) -> i32 {
        self.max_batch_count
    }

    pub fn max_message_size(&self) -> i32 {
        self.max_message_size
    }

    pub fn continue_on_error(&self) -> bool {
        self.continue_on_error
    }
}

impl RequestMessage for InsertMessage {
    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn message_type(&self) -> MessageType {
        MessageType::Insert
    }

    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
        bind_encoder(self, factory)
    }
}

impl EncodableMessage for InsertMessage {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError> {
        factory.insert_message_encoder()
    }
}

#[derive(Debug)]
pub struct InsertMessageBuilder {
    request_id: i32,
    collection_namespace: Option<CollectionNamespace>,
    documents: Vec<Document>,
    max_batch_count: i32,
    max_message_size: i32,
    continue_on_error: bool,
}

impl InsertMessageBuilder {
    pub fn collection_namespace(mut self, collection_namespace: CollectionNamespace) -> Self {
        self.collection_namespace = Some(collection_namespace);
        self
    }

    pub fn documents(mut self, documents: impl IntoIterator<Item = Document>) -> Self {
        self.documents.extend(documents);
        self
    }

    pub fn max_batch_count(mut self, max_batch_count: i32) -> Self {
        self.max_batch_count = max_batch_count;
        self
    }

    pub fn max_message_size(mut self, max_message_size: i32) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn build(self) -> Result<InsertMessage, MessageError> {
        Ok(InsertMessage {
            request_id: self.request_id,
            collection_namespace: required(self.collection_namespace, "collection_namespace")?,
            documents: self.documents,
            max_batch_count: non_negative(self.max_batch_count, "max_batch_count")?,
            max_message_size: non_negative(self.max_message_size, "max_message_size")?,
            continue_on_error: self.continue_on_error,
        })
    }
}
