use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Identifier field name used when an entity type does not name its own.
/// 实体类型未指定标识字段时使用的默认字段名。
pub const DEFAULT_IDENTIFIER_KEY: &str = "id";

/// A record type that can live in a [`Pool`](crate::Pool).
///
/// The identifier is type-level metadata: [`IDENTIFIER_KEY`](Self::IDENTIFIER_KEY)
/// names the field and [`identifier`](Self::identifier) reads it. Neither
/// depends on what the pool currently holds, so both work on an empty pool.
///
/// **Contract**: an entity's identifier is stable for its whole lifetime in
/// the pool. `apply_snapshot` is only ever called with a snapshot carrying
/// the same identifier as `self`.
///
/// 可以存放在 [`Pool`](crate::Pool) 中的记录类型。
///
/// 标识是类型级别的元数据：[`IDENTIFIER_KEY`](Self::IDENTIFIER_KEY) 给出字段名，
/// [`identifier`](Self::identifier) 读取字段值。两者都不依赖池当前的内容，
/// 因此在空池上同样可用。
///
/// **约定**：实体在池中的整个生命周期内标识保持不变。
/// `apply_snapshot` 只会以与 `self` 标识相同的快照调用。
pub trait PoolEntity {
    /// Identifier type, unique within one pool.
    /// 标识类型，在同一个池内唯一。
    type Id: Eq + Hash + Clone + fmt::Debug;

    /// Name of the identifier field.
    /// 标识字段的名称。
    const IDENTIFIER_KEY: &'static str = DEFAULT_IDENTIFIER_KEY;

    /// Read the identifier, or `None` if this value has none.
    /// 读取标识；若该值没有标识则返回 `None`。
    fn identifier(&self) -> Option<&Self::Id>;

    /// Overwrite every field of `self` from `snapshot`.
    ///
    /// The default is a full replace. Implementations may keep local state
    /// that is not part of the snapshot, but must never change the identifier.
    ///
    /// 用 `snapshot` 覆盖 `self` 的所有字段。
    /// 默认实现是整体替换。
    fn apply_snapshot(&mut self, snapshot: Self)
    where
        Self: Sized,
    {
        *self = snapshot;
    }
}

/// A non-owning pointer-by-identity into a pool of `E`.
///
/// Holding a `Reference` never keeps its entity alive by itself: liveness is
/// decided by the roots passed to [`Pool::collect`](crate::Pool::collect).
/// Serializes as the bare identifier.
///
/// 指向 `E` 类型池的非拥有型按标识引用。
/// 持有 `Reference` 本身并不会保活其实体：存活性由传给
/// [`Pool::collect`](crate::Pool::collect) 的根决定。
/// 序列化为裸标识。
pub struct Reference<E: PoolEntity> {
    id: E::Id,
    _entity: PhantomData<fn() -> E>,
}

impl<E: PoolEntity> Reference<E> {
    #[inline]
    pub fn new(id: E::Id) -> Self {
        Self {
            id,
            _entity: PhantomData,
        }
    }

    #[inline]
    pub fn id(&self) -> &E::Id {
        &self.id
    }

    #[inline]
    pub fn into_id(self) -> E::Id {
        self.id
    }
}

impl<E: PoolEntity> Clone for Reference<E> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<E: PoolEntity> PartialEq for Reference<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: PoolEntity> Eq for Reference<E> {}

impl<E: PoolEntity> Hash for Reference<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E: PoolEntity> fmt::Debug for Reference<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reference").field(&self.id).finish()
    }
}

impl<E> Serialize for Reference<E>
where
    E: PoolEntity,
    E::Id: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, E> Deserialize<'de> for Reference<E>
where
    E: PoolEntity,
    E::Id: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        E::Id::deserialize(deserializer).map(Self::new)
    }
}
