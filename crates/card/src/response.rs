//! The body returned to a card request
//!
//! A [`Response`] carries at most one primary [`Action`] on the card that
//! sent the request plus an optional transient tip ([`Dismiss`]). Each
//! request gets exactly one response: [`Response::output`] consumes it.

use crate::operations::UpdatePart;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::io::Write;
use supermsg_core::{
    RequestContext, Result, DEFAULT_DISMISS_DURATION_MS, RESPONSE_PROTOCOL_VERSION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipType {
    Info,
    Success,
    Warning,
    Error,
}

impl TipType {
    pub fn code(self) -> u8 {
        match self {
            TipType::Info => 0,
            TipType::Success => 1,
            TipType::Warning => 2,
            TipType::Error => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TipType::Info),
            1 => Some(TipType::Success),
            2 => Some(TipType::Warning),
            3 => Some(TipType::Error),
            _ => None,
        }
    }
}

impl Serialize for TipType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for TipType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        TipType::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown tip type {code}")))
    }
}

/// Transient tip shown by the client, then dismissed after `duration` ms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismiss {
    #[serde(rename = "type")]
    pub tip_type: TipType,
    pub duration: u32,
    pub tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMessage {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(rename = "localID", default, skip_serializing_if = "is_zero")]
    pub local_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessage {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(rename = "localID", default, skip_serializing_if = "is_zero")]
    pub local_id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(rename = "tid", default, skip_serializing_if = "String::is_empty")]
    pub template_id: String,
    #[serde(rename = "tv", default, skip_serializing_if = "is_zero_i32")]
    pub template_version: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(rename = "tid", default, skip_serializing_if = "String::is_empty")]
    pub template_id: String,
    #[serde(rename = "tv", default, skip_serializing_if = "is_zero_i32")]
    pub template_version: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// What happens to the card that sent the request
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Delete(DeleteMessage),
    Update(UpdateMessage),
    New(NewMessage),
    UpdatePart(UpdatePart),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    action: Option<Action>,
    dismiss: Option<Dismiss>,
    version: i32,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            action: None,
            dismiss: None,
            version: RESPONSE_PROTOCOL_VERSION,
        }
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Set the primary action, replacing any previous one
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Delete the message the request was triggered from
    pub fn delete_this_message(self, ctx: &RequestContext) -> Self {
        self.with_action(Action::Delete(DeleteMessage {
            id: ctx.message_id,
            local_id: ctx.message_local_id,
        }))
    }

    /// Replace title and data of the originating message, keeping its template
    pub fn update_this_message<T: Serialize + ?Sized>(
        self,
        ctx: &RequestContext,
        title: impl Into<String>,
        data: &T,
    ) -> Result<Self> {
        self.update_this_message_with_template(
            ctx,
            ctx.template_id.clone(),
            ctx.template_version,
            title,
            data,
        )
    }

    /// Replace the originating message, switching to another template
    pub fn update_this_message_with_template<T: Serialize + ?Sized>(
        self,
        ctx: &RequestContext,
        template_id: impl Into<String>,
        template_version: i32,
        title: impl Into<String>,
        data: &T,
    ) -> Result<Self> {
        let data = serde_json::to_value(data)?;
        Ok(self.with_action(Action::Update(UpdateMessage {
            id: ctx.message_id,
            local_id: ctx.message_local_id,
            title: title.into(),
            data,
            template_id: template_id.into(),
            template_version,
        })))
    }

    /// Render a new card in the client
    pub fn new_message<T: Serialize + ?Sized>(
        self,
        template_id: impl Into<String>,
        template_version: i32,
        title: impl Into<String>,
        data: &T,
    ) -> Result<Self> {
        let data = serde_json::to_value(data)?;
        Ok(self.with_action(Action::New(NewMessage {
            template_id: template_id.into(),
            template_version,
            title: title.into(),
            data,
        })))
    }

    /// Patch the originating card in place
    pub fn update_part_data(self, update_part: UpdatePart) -> Self {
        self.with_action(Action::UpdatePart(update_part))
    }

    pub fn show_tip(mut self, tip_type: TipType, tip: impl Into<String>, duration_ms: u32) -> Self {
        self.dismiss = Some(Dismiss {
            tip_type,
            duration: duration_ms,
            tip: tip.into(),
        });
        self
    }

    pub fn show_info(self, tip: impl Into<String>) -> Self {
        self.show_tip(TipType::Info, tip, DEFAULT_DISMISS_DURATION_MS)
    }

    pub fn show_success(self, tip: impl Into<String>) -> Self {
        self.show_tip(TipType::Success, tip, DEFAULT_DISMISS_DURATION_MS)
    }

    pub fn show_warning(self, tip: impl Into<String>) -> Self {
        self.show_tip(TipType::Warning, tip, DEFAULT_DISMISS_DURATION_MS)
    }

    pub fn show_error(self, tip: impl Into<String>) -> Self {
        self.show_tip(TipType::Error, tip, DEFAULT_DISMISS_DURATION_MS)
    }

    /// Tip-only response
    pub fn info(tip: impl Into<String>) -> Self {
        Self::new().show_info(tip)
    }

    pub fn success(tip: impl Into<String>) -> Self {
        Self::new().show_success(tip)
    }

    pub fn warning(tip: impl Into<String>) -> Self {
        Self::new().show_warning(tip)
    }

    pub fn error(tip: impl Into<String>) -> Self {
        Self::new().show_error(tip)
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn dismiss(&self) -> Option<&Dismiss> {
        self.dismiss.as_ref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Encode the response body. Nothing else may be sent for this request.
    pub fn output(self) -> Result<Vec<u8>> {
        tracing::debug!(action = self.action_name(), tip = self.dismiss.is_some(), "writing card response");
        Ok(serde_json::to_vec(&self)?)
    }

    /// Stream the encoded body into `writer`
    pub fn write_to<W: Write>(self, writer: W) -> Result<()> {
        tracing::debug!(action = self.action_name(), tip = self.dismiss.is_some(), "writing card response");
        serde_json::to_writer(writer, &self)?;
        Ok(())
    }

    fn action_name(&self) -> &'static str {
        match self.action {
            None => "none",
            Some(Action::Delete(_)) => "delete",
            Some(Action::Update(_)) => "update",
            Some(Action::New(_)) => "new",
            Some(Action::UpdatePart(_)) => "updatePart",
        }
    }
}

/// Wire layout: one optional key per action kind
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    delete: Option<&'a DeleteMessage>,
    #[serde(rename = "updatePart", skip_serializing_if = "Option::is_none")]
    update_part: Option<&'a UpdatePart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<&'a UpdateMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new: Option<&'a NewMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dismiss: Option<&'a Dismiss>,
    version: i32,
}

#[derive(Deserialize)]
struct Envelope {
    delete: Option<DeleteMessage>,
    #[serde(rename = "updatePart")]
    update_part: Option<UpdatePart>,
    update: Option<UpdateMessage>,
    new: Option<NewMessage>,
    dismiss: Option<Dismiss>,
    #[serde(default)]
    version: i32,
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut envelope = EnvelopeRef {
            delete: None,
            update_part: None,
            update: None,
            new: None,
            dismiss: self.dismiss.as_ref(),
            version: self.version,
        };
        match &self.action {
            Some(Action::Delete(m)) => envelope.delete = Some(m),
            Some(Action::Update(m)) => envelope.update = Some(m),
            Some(Action::New(m)) => envelope.new = Some(m),
            Some(Action::UpdatePart(p)) => envelope.update_part = Some(p),
            None => {}
        }
        envelope.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let envelope = Envelope::deserialize(deserializer)?;
        let mut actions = [
            envelope.delete.map(Action::Delete),
            envelope.update_part.map(Action::UpdatePart),
            envelope.update.map(Action::Update),
            envelope.new.map(Action::New),
        ]
        .into_iter()
        .flatten();

        let action = actions.next();
        if actions.next().is_some() {
            return Err(serde::de::Error::custom(
                "response carries more than one primary action",
            ));
        }

        Ok(Response {
            action,
            dismiss: envelope.dismiss,
            version: envelope.version,
        })
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_zero_i32(value: &i32) -> bool {
    *value == 0
}
