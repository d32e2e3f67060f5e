//! Partial card updates
//!
//! An [`UpdatePart`] is an ordered batch of [`Operation`]s the client applies
//! to the data of the card that sent the request, without re-rendering the
//! whole card. Every operation addresses the card data with a key path such
//! as `list.0.done`.
//!
//! The client applies operations strictly in order. With `ignoreError` set it
//! skips an operation that fails and carries on; otherwise it stops at the
//! first failure. Operations applied before the failure stay applied.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use supermsg_core::{Error, Result};

/// Set new values or replace existing ones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetOp(IndexMap<String, Value>);

impl SetOp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key_path` to `value`, replacing an earlier value for the same path
    pub fn set(mut self, key_path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key_path.into(), value.into());
        self
    }

    /// Like [`SetOp::set`] for any serializable value
    pub fn set_serialized<T: Serialize>(self, key_path: impl Into<String>, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(self.set(key_path, value))
    }

    pub fn remove(mut self, key_path: &str) -> Self {
        self.0.shift_remove(key_path);
        self
    }

    pub fn get(&self, key_path: &str) -> Option<&Value> {
        self.0.get(key_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Delete values from the card data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnsetOp(IndexSet<String>);

impl UnsetOp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add key paths. Paths already present keep their position.
    pub fn add<I, S>(mut self, key_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(key_paths.into_iter().map(Into::into));
        self
    }

    pub fn path(self, key_path: impl Into<String>) -> Self {
        self.add([key_path])
    }

    /// Drop exactly `key_path`, keeping the order of the others
    pub fn remove(mut self, key_path: &str) -> Self {
        self.0.shift_remove(key_path);
        self
    }

    pub fn contains(&self, key_path: &str) -> bool {
        self.0.contains(key_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where an [`InsertOp`] places its elements. Encoded as `-1` for append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertPosition {
    #[default]
    Append,
    At(usize),
}

impl Serialize for InsertPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            InsertPosition::Append => serializer.serialize_i64(-1),
            InsertPosition::At(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl<'de> Deserialize<'de> for InsertPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match i64::deserialize(deserializer)? {
            -1 => Ok(InsertPosition::Append),
            index if index >= 0 => Ok(InsertPosition::At(index as usize)),
            other => Err(serde::de::Error::custom(format!(
                "invalid insert index {other}"
            ))),
        }
    }
}

/// Insert elements into an array of the card data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOp {
    #[serde(rename = "$keypath")]
    key_path: String,
    #[serde(rename = "$ele")]
    elements: Vec<Value>,
    #[serde(rename = "$index")]
    position: InsertPosition,
}

impl InsertOp {
    /// Append the elements of `list` to the array at `key_path`.
    ///
    /// Fails with [`Error::InvalidOperand`] unless `list` serializes to a JSON
    /// array.
    pub fn append<T: Serialize + ?Sized>(key_path: impl Into<String>, list: &T) -> Result<Self> {
        let key_path = key_path.into();
        match serde_json::to_value(list)? {
            Value::Array(elements) => Ok(Self::from_values(key_path, elements)),
            other => Err(Error::invalid_operand(
                key_path,
                format!("insert expects an array, got {}", json_type(&other)),
            )),
        }
    }

    pub fn from_values(key_path: impl Into<String>, elements: Vec<Value>) -> Self {
        Self {
            key_path: key_path.into(),
            elements,
            position: InsertPosition::Append,
        }
    }

    /// Insert at `index` instead of appending
    pub fn at(mut self, index: usize) -> Self {
        self.position = InsertPosition::At(index);
        self
    }

    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn position(&self) -> InsertPosition {
        self.position
    }
}

/// Remove elements from an array of the card data.
///
/// Indexes refer to the array as it was before the batch started; the client
/// resolves shifts, they are never renumbered here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOp {
    #[serde(rename = "$keypath")]
    key_path: String,
    #[serde(rename = "$indexes")]
    indexes: Vec<usize>,
}

impl RemoveOp {
    pub fn new(key_path: impl Into<String>, indexes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            key_path: key_path.into(),
            indexes: indexes.into_iter().collect(),
        }
    }

    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "$set")]
    Set(SetOp),
    #[serde(rename = "$unset")]
    Unset(UnsetOp),
    #[serde(rename = "$insert")]
    Insert(InsertOp),
    #[serde(rename = "$remove")]
    Remove(RemoveOp),
}

impl From<SetOp> for Operation {
    fn from(op: SetOp) -> Self {
        Operation::Set(op)
    }
}

impl From<UnsetOp> for Operation {
    fn from(op: UnsetOp) -> Self {
        Operation::Unset(op)
    }
}

impl From<InsertOp> for Operation {
    fn from(op: InsertOp) -> Self {
        Operation::Insert(op)
    }
}

impl From<RemoveOp> for Operation {
    fn from(op: RemoveOp) -> Self {
        Operation::Remove(op)
    }
}

/// Ordered batch of operations sent as the `updatePart` of a response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePart {
    #[serde(rename = "ignoreError", default, skip_serializing_if = "is_false")]
    ignore_error: bool,
    #[serde(rename = "noMoreContents", default, skip_serializing_if = "is_false")]
    no_more_contents: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ops: Vec<Operation>,
}

impl UpdatePart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: impl Into<Operation>) -> &mut Self {
        self.ops.push(op.into());
        self
    }

    pub fn set(mut self, op: SetOp) -> Self {
        self.push(op);
        self
    }

    pub fn unset(mut self, op: UnsetOp) -> Self {
        self.push(op);
        self
    }

    pub fn insert(mut self, op: InsertOp) -> Self {
        self.push(op);
        self
    }

    pub fn remove(mut self, op: RemoveOp) -> Self {
        self.push(op);
        self
    }

    /// Let the client skip failing operations instead of stopping the batch
    pub fn ignore_errors(mut self) -> Self {
        self.ignore_error = true;
        self
    }

    /// Tell the client a paginated list has no more pages, so it stops asking
    pub fn mark_no_more_contents(mut self) -> Self {
        self.no_more_contents = true;
        self
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn ignores_errors(&self) -> bool {
        self.ignore_error
    }

    pub fn has_no_more_contents(&self) -> bool {
        self.no_more_contents
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
