//! Embed-document validation for the embed-sending flow.
//!
//! This schema parallels the components schema in `components.rs` but
//! targets a different composition API (a document of embed objects, as
//! exported by embed design tools). Keep the two separate.

use serde_json::Value;

use crate::error::ValidationError;

/// Validate an embed document before its embeds are built and sent.
///
/// The document must be an object with a non-empty `embeds` list; every
/// entry needs at least one of `title`/`description`, and `fields`, when
/// present, must be a list. Fail-fast, no side effects.
pub fn validate_embed_document(document: &Value) -> Result<(), ValidationError> {
    let Some(object) = document.as_object() else {
        return Err(ValidationError::DocumentNotAnObject);
    };

    let Some(embeds) = object.get("embeds") else {
        return Err(ValidationError::MissingEmbeds);
    };

    let Some(list) = embeds.as_array() else {
        return Err(ValidationError::EmbedsNotAList);
    };

    if list.is_empty() {
        return Err(ValidationError::EmptyEmbeds);
    }

    for (i, embed) in list.iter().enumerate() {
        // Entries are numbered from 1 in error messages; these reach the
        // operator who authored the document.
        let index = i + 1;

        let Some(entry) = embed.as_object() else {
            return Err(ValidationError::EmbedNotAnObject { index });
        };

        if !entry.contains_key("title") && !entry.contains_key("description") {
            return Err(ValidationError::EmbedMissingTitleOrDescription { index });
        }

        if let Some(fields) = entry.get("fields")
            && !fields.is_array()
        {
            return Err(ValidationError::EmbedFieldsNotAList { index });
        }
    }

    Ok(())
}
