//! Human-readable rendering of request messages.
//!
//! Each message becomes one line of text. This is meant for inspecting what a
//! client is about to send; it is not a wire format.
use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use bson::{Bson, Document};

use super::{
    CollectionElementNameValidator, DeleteMessage, ElementNameValidator, EncoderError,
    GetMoreMessage, InsertMessage, KillCursorsMessage, MessageEncoder, MessageEncoderFactory,
    MessageEncoderPostProcessor, QueryFlags, QueryMessage, RequestMessage, SharedEncoder,
    UpdateMessage,
};

/// Renders every message type. Element names are checked with the validator
/// the message carries before anything is written.
#[derive(Debug, Default)]
pub struct TextEncoder {
    write_concern_upgraded: AtomicBool,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a post-write action asked for acknowledged writes.
    pub fn write_concern_upgraded(&self) -> bool {
        self.write_concern_upgraded.load(Ordering::SeqCst)
    }
}

impl MessageEncoderPostProcessor for TextEncoder {
    fn change_write_concern_from_w0_to_w1(&self) {
        self.write_concern_upgraded.store(true, Ordering::SeqCst);
    }
}

fn check_element_names(
    document: &Document,
    validator: &dyn ElementNameValidator,
) -> Result<(), EncoderError> {
    for (name, value) in document {
        if !validator.is_valid_element_name(name) {
            return Err(EncoderError::InvalidElementName { name: name.clone() });
        }
        if let Bson::Document(nested) = value {
            check_element_names(nested, validator.validator_for(name))?;
        }
    }
    Ok(())
}

fn flag_names(flags: QueryFlags) -> Vec<&'static str> {
    [
        (flags.slave_ok, "slave_ok"),
        (flags.partial_ok, "partial_ok"),
        (flags.no_cursor_timeout, "no_cursor_timeout"),
        (flags.oplog_replay, "oplog_replay"),
        (flags.tailable_cursor, "tailable_cursor"),
        (flags.await_data, "await_data"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}

fn header(message: &dyn RequestMessage) -> String {
    format!("{} #{}", message.message_type(), message.request_id())
}

impl MessageEncoder<QueryMessage> for TextEncoder {
    fn write_message(&self, message: &QueryMessage, out: &mut dyn Write) -> Result<(), EncoderError> {
        check_element_names(message.query(), message.query_validator())?;

        write!(
            out,
            "{} {} query={} skip={} batch_size={}",
            header(message),
            message.collection_namespace(),
            message.query(),
            message.skip(),
            message.batch_size()
        )?;
        if let Some(fields) = message.fields() {
            write!(out, " fields={fields}")?;
        }
        let flags = flag_names(message.flags());
        if !flags.is_empty() {
            write!(out, " flags=[{}]", flags.join(","))?;
        }
        writeln!(out, " response={}", message.response_handling())?;
        Ok(())
    }

    fn post_processor(&self) -> Option<&dyn MessageEncoderPostProcessor> {
        Some(self)
    }
}

impl MessageEncoder<DeleteMessage> for TextEncoder {
    fn write_message(&self, message: &DeleteMessage, out: &mut dyn Write) -> Result<(), EncoderError> {
        writeln!(
            out,
            "{} {} query={} multi={}",
            header(message),
            message.collection_namespace(),
            message.query(),
            message.is_multi()
        )?;
        Ok(())
    }
}

impl MessageEncoder<InsertMessage> for TextEncoder {
    fn write_message(&self, message: &InsertMessage, out: &mut dyn Write) -> Result<(), EncoderError> {
        for document in message.documents() {
            check_element_names(document, &CollectionElementNameValidator)?;
        }

        let documents = message
            .documents()
            .iter()
            .map(Document::to_string)
            .collect::<Vec<_>>();
        writeln!(
            out,
            "{} {} documents=[{}] max_batch_count={} max_message_size={} continue_on_error={}",
            header(message),
            message.collection_namespace(),
            documents.join(", "),
            message.max_batch_count(),
            message.max_message_size(),
            message.continue_on_error()
        )?;
        Ok(())
    }
}

impl MessageEncoder<UpdateMessage> for TextEncoder {
    fn write_message(&self, message: &UpdateMessage, out: &mut dyn Write) -> Result<(), EncoderError> {
        check_element_names(message.update(), message.update_validator())?;

        writeln!(
            out,
            "{} {} query={} update={} multi={} upsert={}",
            header(message),
            message.collection_namespace(),
            message.query(),
            message.update(),
            message.is_multi(),
            message.is_upsert()
        )?;
        Ok(())
    }
}

impl MessageEncoder<GetMoreMessage> for TextEncoder {
    fn write_message(&self, message: &GetMoreMessage, out: &mut dyn Write) -> Result<(), EncoderError> {
        writeln!(
            out,
            "{} {} cursor_id={} batch_size={}",
            header(message),
            message.collection_namespace(),
            message.cursor_id(),
            message.batch_size()
        )?;
        Ok(())
    }
}

impl MessageEncoder<KillCursorsMessage> for TextEncoder {
    fn write_message(
        &self,
        message: &KillCursorsMessage,
        out: &mut dyn Write,
    ) -> Result<(), EncoderError> {
        writeln!(
            out,
            "{} cursor_ids={:?}",
            header(message),
            message.cursor_ids()
        )?;
        Ok(())
    }
}

/// Hands out one shared [`TextEncoder`] for every message type.
#[derive(Debug, Clone, Default)]
pub struct TextEncoderFactory {
    encoder: Arc<TextEncoder>,
}

impl TextEncoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoder(&self) -> &Arc<TextEncoder> {
        &self.encoder
    }

    fn shared<M>(&self) -> SharedEncoder<M>
    where
        TextEncoder: MessageEncoder<M>,
    {
        self.encoder.clone()
    }
}

impl MessageEncoderFactory for TextEncoderFactory {
    fn delete_message_encoder(&self) -> Result<SharedEncoder<DeleteMessage>, EncoderError> {
        Ok(self.shared())
    }

    fn get_more_message_encoder(&self) -> Result<SharedEncoder<GetMoreMessage>, EncoderError> {
        Ok(self.shared())
    }

    fn insert_message_encoder(&self) -> Result<SharedEncoder<InsertMessage>, EncoderError> {
        Ok(self.shared())
    }

    fn kill_cursors_message_encoder(
        &self,
    ) -> Result<SharedEncoder<KillCursorsMessage>, EncoderError> {
        Ok(self.shared())
    }

    fn query_message_encoder(&self) -> Result<SharedEncoder<QueryMessage>, EncoderError> {
        Ok(self.shared())
    }

    fn update_message_encoder(&self) -> Result<SharedEncoder<UpdateMessage>, EncoderError> {
        Ok(self.shared())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::super::{CollectionNamespace, EncodableMessage, NoOpElementNameValidator};
    use super::*;

    fn render(message: &dyn RequestMessage) -> Result<String, EncoderError> {
        let factory = TextEncoderFactory::new();
        let encoder = message.request_encoder(&factory)?;
        let mut out = Vec::new();
        encoder.write_request(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn namespace() -> CollectionNamespace {
        CollectionNamespace::new("database", "collection")
    }

    #[test]
    fn renders_query() {
        let query = doc! { "y": 2 };
        let fields = doc! { "x": 1 };
        let message = QueryMessage::builder(2)
            .collection_namespace(namespace())
            .query(query.clone())
            .fields(Some(fields.clone()))
            .query_validator(Arc::new(NoOpElementNameValidator))
            .skip(3)
            .batch_size(1)
            .tailable_cursor(true)
            .await_data(true)
            .build()
            .unwrap();

        assert_eq!(
            render(&message).unwrap(),
            format!(
                "query #2 database.collection query={query} skip=3 batch_size=1 fields={fields} flags=[tailable_cursor,await_data] response=return\n"
            )
        );
    }

    #[test]
    fn renders_delete() {
        let query = doc! { "x": 1 };
        let message = DeleteMessage::new(1, namespace(), query.clone(), false);

        assert_eq!(
            render(&message).unwrap(),
            format!("delete #1 database.collection query={query} multi=false\n")
        );
    }

    #[test]
    fn renders_kill_cursors() {
        let message = KillCursorsMessage::new(9, vec![1, 2]);
        assert_eq!(render(&message).unwrap(), "kill_cursors #9 cursor_ids=[1, 2]\n");
    }

    #[test]
    fn renders_get_more() {
        let message = GetMoreMessage::new(4, namespace(), 77, 10);
        assert_eq!(
            render(&message).unwrap(),
            "get_more #4 database.collection cursor_id=77 batch_size=10\n"
        );
    }

    #[test]
    fn query_validator_is_consulted() {
        let message = QueryMessage::builder(2)
            .collection_namespace(namespace())
            .query(doc! { "a": { "$gt": 1 } })
            .query_validator(Arc::new(CollectionElementNameValidator))
            .build()
            .unwrap();

        let err = render(&message).unwrap_err();
        assert!(matches!(err, EncoderError::InvalidElementName { name } if name == "$gt"));
    }

    #[test]
    fn insert_rejects_operator_names() {
        let message = InsertMessage::builder(5)
            .collection_namespace(namespace())
            .documents([doc! { "ok": 1 }, doc! { "$bad": 1 }])
            .build()
            .unwrap();

        let err = render(&message).unwrap_err();
        assert!(matches!(err, EncoderError::InvalidElementName { name } if name == "$bad"));
    }

    #[test]
    fn update_uses_message_validator() {
        let update = doc! { "$set": { "a": 1 } };
        let message = UpdateMessage::builder(6)
            .collection_namespace(namespace())
            .query(doc! {})
            .update(update.clone())
            .update_validator(Arc::new(NoOpElementNameValidator))
            .upsert(true)
            .build()
            .unwrap();

        let rendered = render(&message).unwrap();
        assert!(rendered.starts_with("update #6 database.collection"));
        assert!(rendered.contains(&format!("update={update}")));
        assert!(rendered.ends_with("multi=false upsert=true\n"));
    }

    #[test]
    fn factory_shares_one_encoder() {
        let factory = TextEncoderFactory::new();
        let message = DeleteMessage::new(1, namespace(), doc! {}, true);
        let query = QueryMessage::builder(2)
            .collection_namespace(namespace())
            .query(doc! {})
            .query_validator(Arc::new(NoOpElementNameValidator))
            .build()
            .unwrap();

        let delete_encoder = message.encoder(&factory).unwrap();
        let query_encoder = query.encoder(&factory).unwrap();
        query_encoder
            .post_processor()
            .unwrap()
            .change_write_concern_from_w0_to_w1();

        assert!(delete_encoder.post_processor().is_none());
        assert!(factory.encoder().write_concern_upgraded());
    }
}
