//! Schemaless records for hosts whose models are plain JSON objects.
//!
//! A [`Record`] is a JSON object whose identifier field is named at the type
//! level by an [`IdentifierKey`]. Roots for such hosts usually arrive as JSON
//! too; [`root_from_json`] turns them into typed roots and rejects every shape
//! it cannot interpret.
//!
//! 面向以普通 JSON 对象为模型的宿主的无模式记录。

use crate::entity::{DEFAULT_IDENTIFIER_KEY, PoolEntity, Reference};
use crate::error::{PoolError, Result};
use crate::pool::Pool;
use crate::root::OwnedRoot;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use tracing::warn;

/// Type-level name of a record's identifier field.
/// 记录标识字段的类型级名称。
pub trait IdentifierKey {
    const NAME: &'static str;
}

/// The `"id"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DefaultKey;

impl IdentifierKey for DefaultKey {
    const NAME: &'static str = DEFAULT_IDENTIFIER_KEY;
}

/// Identifier of a record: a string or an integer.
/// 记录的标识：字符串或整数。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    /// Interpret a JSON scalar as an identifier. Floats and non-scalars are not identifiers.
    /// 将 JSON 标量解释为标识。浮点数与非标量不是标识。
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(RecordId::Text(text.clone())),
            Value::Number(number) => number.as_i64().map(RecordId::Number),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(text) => f.write_str(text),
            RecordId::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(text: &str) -> Self {
        RecordId::Text(text.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(text: String) -> Self {
        RecordId::Text(text)
    }
}

impl From<i64> for RecordId {
    fn from(number: i64) -> Self {
        RecordId::Number(number)
    }
}

/// A JSON object used as a pooled entity.
///
/// The identifier is parsed from the `K::NAME` field when the record is built
/// or when that field is set. Snapshot apply replaces the whole field map, so
/// fields absent from the incoming snapshot disappear.
///
/// 用作池实体的 JSON 对象。
/// 标识在记录构建时或该字段被设置时从 `K::NAME` 字段解析。
/// 快照应用会替换整个字段映射，因此传入快照中不存在的字段会消失。
pub struct Record<K = DefaultKey> {
    id: Option<RecordId>,
    fields: Map<String, Value>,
    _key: PhantomData<fn() -> K>,
}

impl<K: IdentifierKey> Record<K> {
    pub fn new(fields: Map<String, Value>) -> Self {
        let id = fields.get(K::NAME).and_then(RecordId::from_json);
        Self {
            id,
            fields,
            _key: PhantomData,
        }
    }

    /// Build a record from any JSON value.
    ///
    /// # Errors
    /// [`PoolError::InvalidEntity`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            _ => Err(PoolError::InvalidEntity { key: K::NAME }),
        }
    }

    #[inline]
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set one field, returning its previous value.
    ///
    /// Setting the identifier field re-reads the identifier. Do not do that
    /// on a pooled record.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        if name == K::NAME {
            self.id = RecordId::from_json(&value);
        }
        self.fields.insert(name, value)
    }

    #[inline]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl<K: IdentifierKey> PoolEntity for Record<K> {
    type Id = RecordId;

    const IDENTIFIER_KEY: &'static str = K::NAME;

    #[inline]
    fn identifier(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl<K> Clone for Record<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            fields: self.fields.clone(),
            _key: PhantomData,
        }
    }
}

impl<K> PartialEq for Record<K> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K> fmt::Debug for Record<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<K> Serialize for Record<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de, K: IdentifierKey> Deserialize<'de> for Record<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::new)
    }
}

fn reference_from_json<K: IdentifierKey>(value: &Value) -> Option<Reference<Record<K>>> {
    let id = match value {
        Value::Object(fields) => fields.get(K::NAME).and_then(RecordId::from_json),
        scalar => RecordId::from_json(scalar),
    };
    id.map(Reference::new)
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "non-integer number",
        Value::Number(_) => "integer outside the i64 range",
        Value::String(_) => "string",
        Value::Array(_) => "array with non-reference elements",
        Value::Object(_) => "object without identifier",
    }
}

/// Interpret a JSON value as a root.
///
/// - `null` is an absent single root.
/// - A string or integer identifier, or an object carrying the `K::NAME`
///   field, is a present single root.
/// - An array of those is a collection root.
///
/// # Errors
/// [`PoolError::AmbiguousRootShape`] for every other shape.
///
/// 将 JSON 值解释为根。
/// - `null` 是空的单根。
/// - 字符串或整数标识，或携带 `K::NAME` 字段的对象，是非空的单根。
/// - 由上述值组成的数组是集合根。
pub fn root_from_json<K: IdentifierKey>(value: &Value) -> Result<OwnedRoot<Record<K>>> {
    match value {
        Value::Null => Ok(OwnedRoot::Single(None)),
        Value::Array(items) => items
            .iter()
            .map(reference_from_json::<K>)
            .collect::<Option<Vec<_>>>()
            .map(OwnedRoot::Collection)
            .ok_or(PoolError::AmbiguousRootShape {
                found: shape_of(value),
            }),
        single => reference_from_json::<K>(single)
            .map(|reference| OwnedRoot::Single(Some(reference)))
            .ok_or(PoolError::AmbiguousRootShape {
                found: shape_of(single),
            }),
    }
}

impl<K: IdentifierKey> Pool<Record<K>> {
    /// Collect against roots supplied as JSON values.
    ///
    /// Every root is interpreted with [`root_from_json`] before anything is
    /// marked. If any root is ambiguous the cycle is abandoned and the pool
    /// is left untouched, even when it is empty.
    ///
    /// 以 JSON 值形式提供的根执行回收。
    /// 标记之前先用 [`root_from_json`] 解释每个根。任何根有歧义时放弃本次回收，
    /// 池保持不变，即使池为空也是如此。
    pub fn collect_json(&mut self, roots: &[Value]) -> Result<usize> {
        let parsed = roots
            .iter()
            .map(root_from_json::<K>)
            .collect::<Result<Vec<_>>>()
            .inspect_err(|err| warn!(pool = %self.label(), %err, "rejected dynamic roots"))?;
        Ok(self.collect(parsed.iter().map(OwnedRoot::as_root)))
    }
}
