//! Request and response bodies of the platform message API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use supermsg_core::{Error, Result};

/// Template, title and data shared by create and update requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Template id and version, from the template manager of the console
    #[serde(rename = "templateID")]
    pub template_id: String,
    #[serde(rename = "templateVersion")]
    pub template_version: i32,
    /// Shown in the channel list and in system notifications
    pub title: String,
    /// Card state, may be empty
    pub data: Map<String, Value>,
}

impl MessageContent {
    pub fn new(
        template_id: impl Into<String>,
        template_version: i32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            template_version,
            title: title.into(),
            data: Map::new(),
        }
    }

    /// Use `data` as the card state; it must serialize to a JSON object
    pub fn with_data<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        self.data = match serde_json::to_value(data)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(Error::validation(
                    "data",
                    "message data must be a JSON object",
                ))
            }
        };
        Ok(self)
    }

    /// Trim text fields and check the required ones
    pub(crate) fn normalize(&mut self) -> Result<()> {
        self.template_id = self.template_id.trim().to_string();
        if self.template_id.is_empty() {
            return Err(Error::validation("templateID", "template id is required"));
        }

        if self.template_version < 1 {
            return Err(Error::validation(
                "templateVersion",
                "invalid template version, version number must be greater than 0",
            ));
        }

        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(Error::validation("title", "message title is required"));
        }

        Ok(())
    }
}

/// Push a message to a whole channel or to selected members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    /// Open ids of the recipients, empty when sending to everyone
    pub recipients: Vec<String>,
    #[serde(rename = "toAll")]
    pub to_all: bool,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl CreateMessageRequest {
    pub fn to_all(content: MessageContent) -> Self {
        Self {
            recipients: Vec::new(),
            to_all: true,
            content,
        }
    }

    pub fn to_recipients<I, S>(recipients: I, content: MessageContent) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recipients: recipients.into_iter().map(Into::into).collect(),
            to_all: false,
            content,
        }
    }
}

/// Replace template, title and data of an existing message. Recipients of
/// the original message cannot be changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl UpdateMessageRequest {
    pub fn new(id: i64, content: MessageContent) -> Self {
        Self { id, content }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateMessageResponse {
    pub id: i64,
}

/// Envelope shared by every platform endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}
