//! Command-line description of a single request.
//!
//! This module defines the [`Command`] enum parsed by the `docwire_explain`
//! binary. Each subcommand carries the arguments of one message type and is
//! turned into a built message with [`Command::into_message`].
//!
//! Documents are given as JSON objects and converted to BSON.
//!
//! # Example
//! ```rust
//! use docwire::{Command, protocol::MessageType};
//!
//! let command = Command::KillCursors { cursor_ids: vec![42] };
//! let message = command.into_message(1).unwrap();
//! assert_eq!(message.message_type(), MessageType::KillCursors);
//! ```
use std::sync::Arc;

use bson::Document;
use clap::{Args, Subcommand};
use thiserror::Error;

use crate::protocol::{
    CollectionNamespace, DEFAULT_MAX_BATCH_COUNT, DEFAULT_MAX_MESSAGE_SIZE, DeleteMessage,
    GetMoreMessage, InsertMessage, KillCursorsMessage, MessageError, NoOpElementNameValidator,
    QueryFlags, QueryMessage, RequestMessage, ResponseHandling, UpdateMessage,
};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid JSON for '{argument}': {source}")]
    Json {
        argument: &'static str,
        source: serde_json::Error,
    },

    #[error("'{argument}' is not a document: {source}")]
    NotADocument {
        argument: &'static str,
        source: bson::ser::Error,
    },

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Cursor flags of a query, one switch each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Args)]
pub struct FlagArgs {
    #[arg(long)]
    pub slave_ok: bool,
    #[arg(long)]
    pub partial_ok: bool,
    #[arg(long)]
    pub no_cursor_timeout: bool,
    #[arg(long)]
    pub oplog_replay: bool,
    #[arg(long)]
    pub tailable_cursor: bool,
    #[arg(long)]
    pub await_data: bool,
}

impl From<FlagArgs> for QueryFlags {
    fn from(value: FlagArgs) -> Self {
        QueryFlags {
            slave_ok: value.slave_ok,
            partial_ok: value.partial_ok,
            no_cursor_timeout: value.no_cursor_timeout,
            oplog_replay: value.oplog_replay,
            tailable_cursor: value.tailable_cursor,
            await_data: value.await_data,
        }
    }
}

/// One request to build.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Find documents
    Query {
        /// Target as `database.collection`
        #[arg(long, short)]
        namespace: String,
        /// Predicate as a JSON object
        #[arg(long, default_value = "{}")]
        filter: String,
        /// Projection as a JSON object
        #[arg(long)]
        fields: Option<String>,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        skip: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        batch_size: i32,
        #[command(flatten)]
        flags: FlagArgs,
        /// Drain the reply without returning it
        #[arg(long)]
        ignore_response: bool,
    },
    /// Remove documents
    Delete {
        #[arg(long, short)]
        namespace: String,
        #[arg(long, default_value = "{}")]
        filter: String,
        /// Remove every match instead of the first
        #[arg(long)]
        multi: bool,
    },
    /// Modify documents
    Update {
        #[arg(long, short)]
        namespace: String,
        #[arg(long, default_value = "{}")]
        filter: String,
        /// Update document as a JSON object
        #[arg(long)]
        update: String,
        #[arg(long)]
        multi: bool,
        #[arg(long)]
        upsert: bool,
    },
    /// Add documents
    Insert {
        #[arg(long, short)]
        namespace: String,
        /// Document as a JSON object; repeat for more
        #[arg(long = "document")]
        documents: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_BATCH_COUNT, allow_negative_numbers = true)]
        max_batch_count: i32,
        #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE, allow_negative_numbers = true)]
        max_message_size: i32,
        #[arg(long)]
        continue_on_error: bool,
    },
    /// Fetch the next batch of a cursor
    GetMore {
        #[arg(long, short)]
        namespace: String,
        #[arg(long, allow_negative_numbers = true)]
        cursor_id: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        batch_size: i32,
    },
    /// Close cursors
    KillCursors {
        #[arg(long = "cursor-id", required = true, allow_negative_numbers = true)]
        cursor_ids: Vec<i64>,
    },
}

fn parse_document(argument: &'static str, json: &str) -> Result<Document, CommandError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|source| CommandError::Json { argument, source })?;
    bson::to_document(&value).map_err(|source| CommandError::NotADocument { argument, source })
}

impl Command {
    /// Builds the message this command describes.
    pub fn into_message(self, request_id: i32) -> Result<Box<dyn RequestMessage>, CommandError> {
        let message: Box<dyn RequestMessage> = match self {
            Command::Query {
                namespace,
                filter,
                fields,
                skip,
                batch_size,
                flags,
                ignore_response,
            } => {
                let fields = fields
                    .map(|json| parse_document("fields", &json))
                    .transpose()?;
                let mut message = QueryMessage::builder(request_id)
                    .collection_namespace(CollectionNamespace::from_full_name(&namespace)?)
                    .query(parse_document("filter", &filter)?)
                    .fields(fields)
                    .query_validator(Arc::new(NoOpElementNameValidator))
                    .skip(skip)
                    .batch_size(batch_size)
                    .flags(flags.into())
                    .build()?;
                if ignore_response {
                    message.set_response_handling(ResponseHandling::Ignore)?;
                }
                Box::new(message)
            }
            Command::Delete {
                namespace,
                filter,
                multi,
            } => Box::new(DeleteMessage::new(
                request_id,
                CollectionNamespace::from_full_name(&namespace)?,
                parse_document("filter", &filter)?,
                multi,
            )),
            Command::Update {
                namespace,
                filter,
                update,
                multi,
                upsert,
            } => Box::new(
                UpdateMessage::builder(request_id)
                    .collection_namespace(CollectionNamespace::from_full_name(&namespace)?)
                    .query(parse_document("filter", &filter)?)
                    .update(parse_document("update", &update)?)
                    .update_validator(Arc::new(NoOpElementNameValidator))
                    .multi(multi)
                    .upsert(upsert)
                    .build()?,
            ),
            Command::Insert {
                namespace,
                documents,
                max_batch_count,
                max_message_size,
                continue_on_error,
            } => {
                let documents = documents
                    .iter()
                    .map(|json| parse_document("document", json))
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(
                    InsertMessage::builder(request_id)
                        .collection_namespace(CollectionNamespace::from_full_name(&namespace)?)
                        .documents(documents)
                        .max_batch_count(max_batch_count)
                        .max_message_size(max_message_size)
                        .continue_on_error(continue_on_error)
                        .build()?,
                )
            }
            Command::GetMore {
                namespace,
                cursor_id,
                batch_size,
            } => Box::new(GetMoreMessage::new(
                request_id,
                CollectionNamespace::from_full_name(&namespace)?,
                cursor_id,
                batch_size,
            )),
            Command::KillCursors { cursor_ids } => {
                Box::new(KillCursorsMessage::new(request_id, cursor_ids))
            }
        };
        Ok(message)
    }
}
