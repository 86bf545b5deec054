//! A stable node identity derived from a key and the identity stack.

use std::{fmt, num::NonZeroU64};

use crate::hasher::{FNV_PRIME, fnv1a_64};

/// The identity of a layout node.
///
/// Identities are derived from a key and the scope of the enclosing node, so the same key declared
/// under the same ancestor path produces the same [`NodeId`] every frame. That is what lets per-node
/// storage survive the node being rebuilt.
///
/// Two unrelated widgets that use the same key under the same path will share an identity and
/// silently share storage. Use [`crate::gui::Gui::push_id`] to separate them, for example when
/// generating nodes from a list.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) NonZeroU64);

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> u64 {
        id.0.get()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0.get())
    }
}

/// Creates a key hash from the call location.
///
/// Repeated calls from the same place produce the same value, so it can be used as a node key in
/// code that doesn't have a natural name for the node.
/// You can optionally pass a comma separated list of anything that implements [`IdKey`] to make it
/// unique, such as the position in a list.
#[macro_export]
macro_rules! id {
    () => {
        const { $crate::nodeid::__call_site(file!(), line!(), column!()) }
    };
    ($($x:expr),+ $(,)?) => {{
        let mut id = const { $crate::nodeid::__call_site(file!(), line!(), column!()) };
        $(
            id = $crate::nodeid::__mix(id, $crate::nodeid::IdKey::key_hash(&$x));
        )+
        id
    }};
}

#[doc(hidden)]
pub const fn __call_site(file: &'static str, line: u32, column: u32) -> u64 {
    let h1 = fnv1a_64(None, file.as_bytes());
    let h2 = fnv1a_64(Some(h1), &line.to_le_bytes());
    fnv1a_64(Some(h2), &column.to_le_bytes())
}

#[doc(hidden)]
pub const fn __mix(lhs: u64, rhs: u64) -> u64 {
    (lhs ^ rhs).wrapping_mul(FNV_PRIME)
}

/// Something that can name a node or be pushed onto the identity stack.
pub trait IdKey {
    fn key_hash(&self) -> u64;
}

impl IdKey for str {
    fn key_hash(&self) -> u64 {
        fnv1a_64(None, self.as_bytes())
    }
}

impl IdKey for String {
    fn key_hash(&self) -> u64 {
        self.as_str().key_hash()
    }
}

impl IdKey for NodeId {
    fn key_hash(&self) -> u64 {
        self.0.get()
    }
}

impl<T: IdKey + ?Sized> IdKey for &T {
    fn key_hash(&self) -> u64 {
        (**self).key_hash()
    }
}

macro_rules! impl_id_key_int {
    ($($t:ty),*) => {
        $(
            impl IdKey for $t {
                fn key_hash(&self) -> u64 {
                    fnv1a_64(None, &self.to_le_bytes())
                }
            }
        )*
    };
}

impl_id_key_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl NodeId {
    /// Derives the identity of a node named `key_hash` inside `scope`.
    ///
    /// `scope` is the top of the identity stack, which already folds in every pushed id.
    pub const fn derive(scope: u64, key_hash: u64) -> Self {
        let non_zero = match NonZeroU64::new(__mix(scope, key_hash)) {
            Some(val) => val,
            None => NonZeroU64::MAX,
        };
        NodeId(non_zero)
    }

    /// Creates an identity from a raw value, for example one restored from disk.
    pub const fn from_raw(raw: u64) -> Self {
        let non_zero = match NonZeroU64::new(raw) {
            Some(val) => val,
            None => NonZeroU64::MAX,
        };
        NodeId(non_zero)
    }

    /// The raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}
