//! Record codec: maps typed records to and from driver documents.
//!
//! Documents carry their identity in the `_key` meta attribute; records carry
//! it in `id`. Decoding moves `_key` into `id` and drops `_id`; encoding moves
//! `id` back into `_key`.


use crate::db::executor::Document;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Document meta attribute holding the primary key.
pub const KEY_FIELD: &str = "_key";

/// Document meta attribute holding the collection-qualified handle.
pub const HANDLE_FIELD: &str = "_id";

/// Record attribute holding the primary key.
pub const RECORD_ID_FIELD: &str = "id";

///
/// CodecError
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("document is missing its `_key` attribute")]
    MissingKey,

    #[error("record conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode one document into a typed record.
pub fn decode_record<E: DeserializeOwned>(document: Document) -> Result<E, CodecError> {
    let Document::Object(mut fields) = document else {
        return Err(CodecError::NotAnObject);
    };

    let key = fields.remove(KEY_FIELD).ok_or(CodecError::MissingKey)?;
    fields.remove(HANDLE_FIELD);
    fields.insert(RECORD_ID_FIELD.to_string(), key);

    Ok(serde_json::from_value(Document::Object(fields))?)
}

/// Encode a typed record into a document. A non-empty `id` becomes `_key`.
pub fn encode_record<E: Serialize>(record: &E) -> Result<Document, CodecError> {
    let Document::Object(mut fields) = serde_json::to_value(record)? else {
        return Err(CodecError::NotAnObject);
    };

    if let Some(id) = fields.remove(RECORD_ID_FIELD)
        && id.as_str().is_some_and(|s| !s.is_empty())
    {
        fields.insert(KEY_FIELD.to_string(), id);
    }

    Ok(Document::Object(fields))
}

/// Decode a bare scalar row such as a count or a key.
pub fn decode_scalar<T: DeserializeOwned>(document: Document) -> Result<T, CodecError> {
    Ok(serde_json::from_value(document)?)
}
