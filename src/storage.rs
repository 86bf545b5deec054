//! Small typed values kept per node identity across frames.
//!
//! Nodes are rebuilt every frame, so anything a widget needs to remember (a toggle, a scroll
//! position, the last drag point) lives here instead, keyed by the node's [`NodeId`].

use std::collections::HashMap;

use smallstr::SmallString;

use crate::{hasher::IdentityBuildHasher, prelude::*};

/// A storage key. Keys up to 32 bytes are stored inline.
pub type StorageKey = SmallString<[u8; 32]>;

/// A stored value. Every variant is `Copy` and holds no references.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoredValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Vector2(Vector2),
    Rect(Rect),
    Id(NodeId),
}

impl StoredValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Bool(_) => "bool",
            StoredValue::Int(_) => "signed integer",
            StoredValue::UInt(_) => "unsigned integer",
            StoredValue::Float(_) => "float",
            StoredValue::Vector2(_) => "Vector2",
            StoredValue::Rect(_) => "Rect",
            StoredValue::Id(_) => "NodeId",
        }
    }
}

/// A type that can be kept in [`Storage`].
pub trait Storable: Copy {
    const TYPE_NAME: &'static str;

    fn into_value(self) -> StoredValue;

    /// Returns `None` if the value holds a different type, or a number that doesn't fit.
    fn from_value(value: StoredValue) -> Option<Self>;
}

macro_rules! impl_storable_int {
    ($variant:ident, $wide:ty, $name:literal: $($t:ty),*) => {
        $(
            impl Storable for $t {
                const TYPE_NAME: &'static str = $name;

                fn into_value(self) -> StoredValue {
                    StoredValue::$variant(self as $wide)
                }

                fn from_value(value: StoredValue) -> Option<Self> {
                    match value {
                        StoredValue::$variant(v) => <$t>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_storable_int!(Int, i64, "signed integer": i8, i16, i32, i64, isize);
impl_storable_int!(UInt, u64, "unsigned integer": u8, u16, u32, u64, usize);

macro_rules! impl_storable {
    ($t:ty, $variant:ident, $name:literal) => {
        impl Storable for $t {
            const TYPE_NAME: &'static str = $name;

            fn into_value(self) -> StoredValue {
                StoredValue::$variant(self)
            }

            fn from_value(value: StoredValue) -> Option<Self> {
                match value {
                    StoredValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_storable!(bool, Bool, "bool");
impl_storable!(f64, Float, "float");
impl_storable!(Vector2, Vector2, "Vector2");
impl_storable!(Rect, Rect, "Rect");
impl_storable!(NodeId, Id, "NodeId");

impl Storable for f32 {
    const TYPE_NAME: &'static str = "float";

    fn into_value(self) -> StoredValue {
        StoredValue::Float(self as f64)
    }

    fn from_value(value: StoredValue) -> Option<Self> {
        match value {
            StoredValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

/// Values keyed by node identity and then by name.
///
/// Entries are never removed automatically. Call [`Storage::retain_nodes`], or enable
/// [`crate::gui::GuiOptions::sweep_storage`], to drop the entries of nodes that no longer exist.
#[derive(Debug, Default, Clone)]
pub struct Storage {
    values: HashMap<NodeId, HashMap<StorageKey, StoredValue>, IdentityBuildHasher>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, or `default` if nothing is stored or the stored value has another type.
    pub fn get<T: Storable>(&self, id: NodeId, key: &str, default: T) -> T {
        match self.try_get(id, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                log::warn!("{err} (node {id}), using the default");
                default
            }
        }
    }

    /// Like [`Storage::get`], but reports a type mismatch instead of falling back.
    pub fn try_get<T: Storable>(&self, id: NodeId, key: &str) -> Result<Option<T>, LayoutError> {
        let Some(value) = self.get_value(id, key) else {
            return Ok(None);
        };

        T::from_value(value).map(Some).ok_or_else(|| LayoutError::StorageTypeMismatch {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            found: value.type_name(),
        })
    }

    pub fn get_value(&self, id: NodeId, key: &str) -> Option<StoredValue> {
        self.values.get(&id)?.get(key).copied()
    }

    /// Stores a value, replacing whatever was stored under the same key.
    pub fn set<T: Storable>(&mut self, id: NodeId, key: &str, value: T) {
        self.values.entry(id).or_default().insert(StorageKey::from_str(key), value.into_value());
    }

    pub fn remove(&mut self, id: NodeId, key: &str) -> Option<StoredValue> {
        let inner = self.values.get_mut(&id)?;
        let removed = inner.remove(key);
        if inner.is_empty() {
            self.values.remove(&id);
        }
        removed
    }

    /// Removes every value of a node. Returns `true` if the node had any.
    pub fn clear_node(&mut self, id: NodeId) -> bool {
        self.values.remove(&id).is_some()
    }

    pub fn contains(&self, id: NodeId, key: &str) -> bool {
        self.values.get(&id).is_some_and(|inner| inner.contains_key(key))
    }

    /// The number of stored values across all nodes.
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of nodes with at least one stored value.
    pub fn node_count(&self) -> usize {
        self.values.len()
    }

    /// Keeps only the nodes for which `keep` returns `true`. Returns how many nodes were dropped.
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> usize {
        let before = self.values.len();
        self.values.retain(|id, _| keep(*id));
        before - self.values.len()
    }
}
