use folio_models::contact::FieldErrors;
use serde::Serialize;

/// Body of every response of the contact endpoint.
#[derive(Debug, Serialize)]
pub struct ApiMessage<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a FieldErrors>,
}
