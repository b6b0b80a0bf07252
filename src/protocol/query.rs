use std::sync::Arc;

use bson::Document;

use super::{
    CollectionNamespace, ElementNameValidator, EncodableMessage, EncoderError,
    MessageEncoderFactory, MessageError, MessageType, PostWriteAction, RequestEncoder,
    RequestMessage, ResponseHandling, SharedEncoder, bind_encoder,
    error::{non_negative, required},
};

/// Cursor flags of a query. No combination is rejected here; the server
/// decides what it accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QueryFlags {
    pub slave_ok: bool,
    pub partial_ok: bool,
    pub no_cursor_timeout: bool,
    pub oplog_replay: bool,
    pub tailable_cursor: bool,
    pub await_data: bool,
}

/// Find request: selects documents from a collection and opens a cursor
/// over them.
///
/// Everything except [`response_handling`](QueryMessage::response_handling)
/// and [`post_write_action`](RequestMessage::post_write_action) is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct QueryMessage {
    request_id: i32,
    collection_namespace: CollectionNamespace,
    query: Document,
    fields: Option<Document>,
    query_validator: Arc<dyn ElementNameValidator>,
    skip: i32,
    batch_size: i32,
    flags: QueryFlags,
    response_handling: ResponseHandling,
    post_write_action: Option<PostWriteAction>,
}

impl QueryMessage {
    pub fn builder(request_id: i32) -> QueryMessageBuilder {
        QueryMessageBuilder {
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

    /// Projection; `None` returns whole documents.
    pub fn fields(&self) -> Option<&Document> {
        self.fields.as_ref()
    }

    pub fn query_validator(&self) -> &dyn ElementNameValidator {
        self.query_validator.as_ref()
    }

    pub fn skip(&self) -> i32 {
        self.skip
    }

    /// Requested size of the first batch. Zero and negative values keep
    /// their server-side meaning.
    pub fn batch_size(&self) -> i32 {
        self.batch_size
    }

    pub fn flags(&self) -> QueryFlags {
        self.flags
    }

    pub fn slave_ok(&self) -> bool {
        self.flags.slave_ok
    }

    pub fn partial_ok(&self) -> bool {
        self.flags.partial_ok
    }

    pub fn no_cursor_timeout(&self) -> bool {
        self.flags.no_cursor_timeout
    }

    pub fn oplog_replay(&self) -> bool {
        self.flags.oplog_replay
    }

    pub fn tailable_cursor(&self) -> bool {
        self.flags.tailable_cursor
    }

    pub fn await_data(&self) -> bool {
        self.flags.await_data
    }

    pub fn response_handling(&self) -> ResponseHandling {
        self.response_handling
    }

    /// Only [`ResponseHandling::Return`] and [`ResponseHandling::Ignore`] are
    /// accepted. On error the previous value is kept.
    ///
    /// A rejected value is reported with the argument name
    /// `"response_handling"`. Raw integers are checked earlier by
    /// `ResponseHandling::try_from`, which reports `"value"` instead.
    pub fn set_response_handling(&mut self, value: ResponseHandling) -> Result<(), MessageError> {
        if !value.is_requestable() {
            return Err(MessageError::InvalidArgument {
                name: "response_handling",
                reason: format!("'{value}' cannot be requested by the caller"),
            });
        }
        self.response_handling = value;
        Ok(())
    }

    pub fn set_post_write_action(&mut self, action: Option<PostWriteAction>) {
        self.post_write_action = action;
    }
}

impl RequestMessage for QueryMessage {
    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn message_type(&self) -> MessageType {
        MessageType::Query
    }

    fn post_write_action(&self) -> Option<&PostWriteAction> {
        self.post_write_action.as_ref()
    }

    fn request_encoder<'a>(
        &'a self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<Box<dyn RequestEncoder + 'a>, EncoderError> {
        bind_encoder(self, factory)
    }
}

impl EncodableMessage for QueryMessage {
    fn encoder(
        &self,
        factory: &dyn MessageEncoderFactory,
    ) -> Result<SharedEncoder<Self>, EncoderError> {
        factory.query_message_encoder()
    }
}

#[derive(Debug, Default)]
pub struct QueryMessageBuilder {
    request_id: i32,
    collection_namespace: Option<CollectionNamespace>,
    query: Option<Document>,
    fields: Option<Document>,
    query_validator: Option<Arc<dyn ElementNameValidator>>,
    skip: i32,
    batch_size: i32,
    flags: QueryFlags,
}

impl QueryMessageBuilder {
    pub fn collection_namespace(mut self, collection_namespace: CollectionNamespace) -> Self {
        self.collection_namespace = Some(collection_namespace);
        self
    }

    pub fn query(mut self, query: Document) -> Self {
        self.query = Some(query);
        self
    }

    pub fn fields(mut self, fields: Option<Document>) -> Self {
        self.fields = fields;
        self
    }

    pub fn query_validator(mut self, validator: Arc<dyn ElementNameValidator>) -> Self {
        self.query_validator = Some(validator);
        self
    }

    pub fn skip(mut self, skip: i32) -> Self {
        self.skip = skip;
        self
    }

    pub fn batch_size(mut self, batch_size: i32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn flags(mut self, flags: QueryFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn slave_ok(mut self, value: bool) -> Self {
        self.flags.slave_ok = value;
        self
    }

    pub fn partial_ok(mut self, value: bool) -> Self {
        self.flags.partial_ok = value;
        self
    }

    pub fn no_cursor_timeout(mut self, value: bool) -> Self {
        self.flags.no_cursor_timeout = value;
        self
    }

    pub fn oplog_replay(mut self, value: bool) -> Self {
        self.flags.oplog_replay = value;
        self
    }

    pub fn tailable_cursor(mut self, value: bool) -> Self {
        self.flags.tailable_cursor = value;
        self
    }

    pub fn await_data(mut self, value: bool) -> Self {
        self.flags.await_data = value;
        self
    }

    pub fn build(self) -> Result<QueryMessage, MessageError> {
        Ok(QueryMessage {
            request_id: self.request_id,
            collection_namespace: required(self.collection_namespace, "collection_namespace")?,
            query: required(self.query, "query")?,
            fields: self.fields,
            query_validator: required(self.query_validator, "query_validator")?,
            skip: non_negative(self.skip, "skip")?,
            batch_size: self.batch_size,
            flags: self.flags,
            response_handling: ResponseHandling::Return,
            post_write_action: None,
        })
    }
}
