/// A payload schema violation.
///
/// `path` fields locate the offending node with a dotted/indexed locator
/// such as `components[0].components[1]`. Validation fails fast: the first
/// violation wins and no others are collected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("payload requires at least one of `content`, `embeds`, or `components`")]
    MissingBody,

    #[error("`components` must be a list")]
    ComponentsNotAList,

    #[error("{path}: component must be an object")]
    ComponentNotAnObject { path: String },

    #[error("{path}: component missing `type`")]
    MissingType { path: String },

    #[error("{path}: unsupported component type ({tag})")]
    UnsupportedType { path: String, tag: String },

    #[error("{path}: container requires a `components` list")]
    ContainerMissingChildren { path: String },

    #[error("{path}: action row requires a `components` list")]
    ActionRowMissingChildren { path: String },

    #[error("{path}: button missing `style`")]
    ButtonMissingStyle { path: String },

    #[error("{path}: link button missing `url`")]
    LinkButtonMissingUrl { path: String },

    #[error("{path}: button missing `custom_id`")]
    ButtonMissingCustomId { path: String },

    #[error("{path}: text component missing `content`")]
    TextMissingContent { path: String },

    #[error("{path}: media component missing `items`")]
    MediaMissingItems { path: String },

    #[error("document must be a JSON object")]
    DocumentNotAnObject,

    #[error("missing required `embeds` field")]
    MissingEmbeds,

    #[error("`embeds` must be a list")]
    EmbedsNotAList,

    #[error("embeds list is empty")]
    EmptyEmbeds,

    #[error("embed #{index} is not an object")]
    EmbedNotAnObject { index: usize },

    #[error("embed #{index} requires `title` or `description`")]
    EmbedMissingTitleOrDescription { index: usize },

    #[error("embed #{index}: `fields` must be a list")]
    EmbedFieldsNotAList { index: usize },
}
