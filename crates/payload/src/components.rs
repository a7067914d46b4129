//! Components-v2 message payload validation.

use serde_json::Value;

use crate::error::ValidationError;

/// Button style value that marks a link button. Link buttons carry a `url`
/// instead of a `custom_id`.
const LINK_BUTTON_STYLE: u64 = 5;

/// Closed set of component types accepted in a raw message payload.
///
/// The wire format tags components with an integer; anything outside this
/// set is rejected rather than passed through to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    ActionRow,
    Button,
    Text,
    Media,
    Divider,
    Container,
}

impl ComponentKind {
    /// Map a wire `type` tag onto a known component kind.
    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            1 => Some(Self::ActionRow),
            2 => Some(Self::Button),
            10 => Some(Self::Text),
            12 => Some(Self::Media),
            14 => Some(Self::Divider),
            17 => Some(Self::Container),
            _ => None,
        }
    }
}

/// Validate a raw message payload before it is posted through the REST API.
///
/// Checks run in order and the first violation wins. The payload is never
/// mutated; a full pass means the structure is safe to hand to the API
/// as-is.
pub fn validate_message(payload: &Value) -> Result<(), ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError::NotAnObject);
    };

    if !["content", "embeds", "components"]
        .iter()
        .any(|key| object.contains_key(*key))
    {
        return Err(ValidationError::MissingBody);
    }

    let Some(components) = object.get("components") else {
        // Text/embed-only payloads are valid without a components tree.
        return Ok(());
    };

    let Some(list) = components.as_array() else {
        return Err(ValidationError::ComponentsNotAList);
    };

    for (i, node) in list.iter().enumerate() {
        validate_component(node, &format!("components[{i}]"))?;
    }

    Ok(())
}

fn validate_component(node: &Value, path: &str) -> Result<(), ValidationError> {
    let Some(object) = node.as_object() else {
        return Err(ValidationError::ComponentNotAnObject {
            path: path.to_string(),
        });
    };

    let Some(tag) = object.get("type") else {
        return Err(ValidationError::MissingType {
            path: path.to_string(),
        });
    };

    let kind = tag.as_u64().and_then(ComponentKind::from_tag).ok_or_else(|| {
        ValidationError::UnsupportedType {
            path: path.to_string(),
            tag: tag.to_string(),
        }
    })?;

    match kind {
        ComponentKind::Container => {
            let Some(children) = object.get("components").and_then(Value::as_array) else {
                return Err(ValidationError::ContainerMissingChildren {
                    path: path.to_string(),
                });
            };
            validate_children(children, path)
        },
        ComponentKind::ActionRow => {
            let Some(children) = object.get("components").and_then(Value::as_array) else {
                return Err(ValidationError::ActionRowMissingChildren {
                    path: path.to_string(),
                });
            };
            validate_children(children, path)
        },
        ComponentKind::Button => {
            let Some(style) = object.get("style") else {
                return Err(ValidationError::ButtonMissingStyle {
                    path: path.to_string(),
                });
            };
            if style.as_u64() == Some(LINK_BUTTON_STYLE) {
                if !object.contains_key("url") {
                    return Err(ValidationError::LinkButtonMissingUrl {
                        path: path.to_string(),
                    });
                }
            } else if !object.contains_key("custom_id") {
                return Err(ValidationError::ButtonMissingCustomId {
                    path: path.to_string(),
                });
            }
            Ok(())
        },
        ComponentKind::Text => {
            if !object.contains_key("content") {
                return Err(ValidationError::TextMissingContent {
                    path: path.to_string(),
                });
            }
            Ok(())
        },
        ComponentKind::Media => {
            if !object.contains_key("items") {
                return Err(ValidationError::MediaMissingItems {
                    path: path.to_string(),
                });
            }
            Ok(())
        },
        ComponentKind::Divider => Ok(()),
    }
}

fn validate_children(children: &[Value], path: &str) -> Result<(), ValidationError> {
    for (i, child) in children.iter().enumerate() {
        validate_component(child, &format!("{path}.components[{i}]"))?;
    }
    Ok(())
}
