use crate::entity::{PoolEntity, Reference};
use crate::error::{PoolError, Result};
use crate::root::{Root, mark};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

/// Label used in tracing events when none is configured.
/// 未配置时 tracing 事件中使用的标签。
pub(crate) const DEFAULT_LABEL: &str = "pool";

/// Builder for configuring a [`Pool`].
///
/// # Example
/// ```
/// use ref_pool::{Pool, PoolEntity};
///
/// struct Todo {
///     id: String,
/// }
///
/// impl PoolEntity for Todo {
///     type Id = String;
///
///     fn identifier(&self) -> Option<&String> {
///         Some(&self.id)
///     }
/// }
///
/// let pool = Pool::<Todo>::builder()
///     .capacity(128)
///     .label("todos")
///     .build();
/// assert!(pool.is_empty());
/// ```
///
/// 用于配置 [`Pool`] 的构建器。
pub struct PoolBuilder<E> {
    capacity: usize,
    label: Cow<'static, str>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: PoolEntity> PoolBuilder<E> {
    /// Create a new builder with default settings.
    /// 创建一个带有默认设置的新构建器。
    #[inline]
    pub fn new() -> Self {
        Self {
            capacity: 0,
            label: Cow::Borrowed(DEFAULT_LABEL),
            _entity: PhantomData,
        }
    }

    /// Pre-size the pool for `capacity` entities.
    ///
    /// Default: `0`
    ///
    /// 为 `capacity` 个实体预分配空间。
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Name attached to every tracing event emitted by the pool.
    ///
    /// Default: `"pool"`
    ///
    /// 附加到池发出的每个 tracing 事件上的名称。
    #[inline]
    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    #[inline]
    pub fn build(self) -> Pool<E> {
        Pool {
            entries: IndexMap::with_capacity(self.capacity),
            label: self.label,
        }
    }
}

impl<E: PoolEntity> Default for PoolBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// An identity-deduplicating pool of canonical entities.
///
/// For every identifier the pool holds exactly one entity, the canonical
/// instance. Insertions merge into it; [`Reference`]s elsewhere in the
/// application denote it by identifier. Entities are only ever removed by
/// [`collect`](Self::collect), which is never run implicitly.
///
/// Entities keep insertion order. Removals shift later entities forward
/// without reordering them.
///
/// **Thread Safety**: `Pool` is a plain single-owner value. Use
/// [`SharedPool`](crate::SharedPool) when several threads need it.
///
/// **Typical Usage**:
/// ```
/// use ref_pool::{Pool, PoolEntity, Reference, Root};
///
/// struct Todo {
///     id: String,
///     title: String,
/// }
///
/// impl PoolEntity for Todo {
///     type Id = String;
///
///     fn identifier(&self) -> Option<&String> {
///         Some(&self.id)
///     }
/// }
///
/// let mut pool = Pool::new();
/// let todos: Vec<Reference<Todo>> = vec![
///     pool.add(Todo { id: "a".into(), title: "Hello".into() }).unwrap(),
///     pool.add(Todo { id: "b".into(), title: "World".into() }).unwrap(),
/// ];
/// let current = Some(todos[0].clone());
///
/// // Only `current` anchors anything now
/// let removed = pool.collect([Root::collection(&[]), Root::from(&current)]);
/// assert_eq!(removed, 1);
/// assert_eq!(pool.get(&todos[0]).unwrap().title, "Hello");
/// assert!(!pool.contains(&todos[1]));
/// ```
///
/// 按标识去重的规范实体池。
///
/// 对每个标识，池中恰好保存一个实体，即规范实例。插入操作会合并到该实例；
/// 应用中其他位置的 [`Reference`] 通过标识指向它。实体只会被
/// [`collect`](Self::collect) 移除，而回收永远不会隐式运行。
///
/// 实体保持插入顺序。移除操作只会让后面的实体前移，不会打乱顺序。
///
/// **线程安全性**：`Pool` 是普通的单一所有者值。多线程访问请使用
/// [`SharedPool`](crate::SharedPool)。
pub struct Pool<E: PoolEntity> {
    entries: IndexMap<E::Id, E>,
    label: Cow<'static, str>,
}

impl<E: PoolEntity> Pool<E> {
    /// Create an empty pool with default settings.
    /// 使用默认设置创建一个空池。
    #[inline]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring the pool.
    /// 创建一个用于配置池的构建器。
    #[inline]
    pub fn builder() -> PoolBuilder<E> {
        PoolBuilder::new()
    }

    /// Name of the identifier field for `E`. Available on an empty pool.
    /// `E` 的标识字段名，在空池上同样可用。
    #[inline]
    pub fn identifier_key(&self) -> &'static str {
        E::IDENTIFIER_KEY
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Look up the canonical entity for `id`.
    /// 查找 `id` 对应的规范实体。
    #[inline]
    pub fn resolve(&self, id: &E::Id) -> Option<&E> {
        self.entries.get(id)
    }

    #[inline]
    pub fn get(&self, reference: &Reference<E>) -> Option<&E> {
        self.resolve(reference.id())
    }

    #[inline]
    pub fn contains(&self, reference: &Reference<E>) -> bool {
        self.entries.contains_key(reference.id())
    }

    /// Mutate the canonical entity behind `reference` in place.
    ///
    /// The closure works on a copy that replaces the pooled entity only if
    /// its identifier is unchanged. Returns `Ok(None)` if the entity is not
    /// pooled.
    ///
    /// # Errors
    /// [`PoolError::IdentifierChanged`] if the closure changed or cleared the
    /// identifier. The pooled entity is left as it was.
    ///
    /// 原地修改 `reference` 指向的规范实体。
    /// 闭包作用于一份副本，只有标识未变时才替换池中实体。若实体不在池中则返回 `Ok(None)`。
    pub fn update<R>(
        &mut self,
        reference: &Reference<E>,
        f: impl FnOnce(&mut E) -> R,
    ) -> Result<Option<R>>
    where
        E: Clone,
    {
        let Some(pooled) = self.entries.get_mut(reference.id()) else {
            return Ok(None);
        };

        let mut draft = pooled.clone();
        let out = f(&mut draft);
        if draft.identifier() != Some(reference.id()) {
            warn!(pool = %self.label, id = ?reference.id(), "rejected update that changed the identifier");
            return Err(PoolError::IdentifierChanged {
                key: E::IDENTIFIER_KEY,
            });
        }

        *pooled = draft;
        Ok(Some(out))
    }

    /// Insert `candidate`, or merge it into the entity sharing its identifier.
    ///
    /// If an entity with the same identifier is pooled, every field of it is
    /// overwritten from `candidate` through [`PoolEntity::apply_snapshot`].
    /// The entity keeps its position and every outstanding reference stays
    /// valid. Otherwise `candidate` is appended.
    ///
    /// The merge is unconditional: a candidate whose other fields differ in
    /// shape from the pooled entity still replaces them.
    ///
    /// # Errors
    /// [`PoolError::InvalidEntity`] if `candidate` has no identifier. The pool
    /// is left untouched.
    ///
    /// 插入 `candidate`，或将其合并到具有相同标识的实体中。
    ///
    /// 若池中已有相同标识的实体，则通过 [`PoolEntity::apply_snapshot`]
    /// 用 `candidate` 覆盖其全部字段。该实体位置不变，所有已有引用保持有效。
    /// 否则将 `candidate` 追加到末尾。
    ///
    /// 合并是无条件的：即使候选值其他字段的结构与池中实体不同，也会被替换。
    pub fn add(&mut self, candidate: E) -> Result<Reference<E>> {
        let id = candidate
            .identifier()
            .cloned()
            .ok_or(PoolError::InvalidEntity {
                key: E::IDENTIFIER_KEY,
            })?;
        Ok(self.insert_canonical(id, candidate))
    }

    /// Apply [`add`](Self::add) to every candidate in order.
    ///
    /// The returned references follow input order. Every candidate is checked
    /// for an identifier before the pool is touched, so a failing batch
    /// leaves the pool unchanged.
    ///
    /// # Errors
    /// [`PoolError::InvalidBatchEntity`] naming the first candidate without an
    /// identifier.
    ///
    /// 按顺序对每个候选值执行 [`add`](Self::add)。
    /// 在修改池之前会先检查所有候选值的标识，因此失败的批量不会改变池。
    pub fn add_all<I>(&mut self, candidates: I) -> Result<Vec<Reference<E>>>
    where
        I: IntoIterator<Item = E>,
    {
        let key = self.identifier_key();
        let staged = candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| match candidate.identifier() {
                Some(id) => Ok((id.clone(), candidate)),
                None => Err(PoolError::InvalidBatchEntity { index, key }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(staged
            .into_iter()
            .map(|(id, candidate)| self.insert_canonical(id, candidate))
            .collect())
    }

    fn insert_canonical(&mut self, id: E::Id, candidate: E) -> Reference<E> {
        match self.entries.entry(id.clone()) {
            Entry::Occupied(mut pooled) => {
                let pooled = pooled.get_mut();
                pooled.apply_snapshot(candidate);
                assert!(
                    pooled.identifier() == Some(&id),
                    "BUG: `apply_snapshot` changed the identifier of a pooled entity. \
                     This violates the `PoolEntity` contract."
                );
                trace!(pool = %self.label, ?id, "merged snapshot into pooled entity");
            }
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                trace!(pool = %self.label, ?id, "appended entity to pool");
            }
        }
        Reference::new(id)
    }

    /// Perform a collection cycle against the given roots.
    ///
    /// This method:
    /// 1. Returns immediately if the pool is empty.
    /// 2. Marks every identifier denoted by `roots` (see [`mark`]).
    /// 3. Sweeps every entity whose identifier was not marked.
    ///
    /// Survivors keep their identity, fields and relative order. The sweep
    /// is a single filtering pass that rebuilds the ordered storage, never a
    /// removal from the structure being iterated.
    ///
    /// Returns the number of entities removed.
    ///
    /// 执行一次针对给定根的回收周期。
    /// 此方法：
    /// 1. 若池为空则立即返回。
    /// 2. 标记 `roots` 指向的所有标识（见 [`mark`]）。
    /// 3. 清除所有未被标记的实体。
    ///
    /// 存活实体保持其身份、字段与相对顺序。清除阶段是一次重建有序存储的过滤遍历，
    /// 而不是在遍历的同时从该结构中移除元素。
    ///
    /// 返回被移除实体的数量。
    pub fn collect<'a, I>(&mut self, roots: I) -> usize
    where
        E: 'a,
        I: IntoIterator<Item = Root<'a, E>>,
    {
        if self.entries.is_empty() {
            return 0;
        }

        let reachable = mark(roots);
        let scanned = self.entries.len();

        let label = &self.label;
        self.entries.retain(|id, _| {
            let live = reachable.contains(id);
            if !live {
                trace!(pool = %label, ?id, "swept unreachable entity");
            }
            live
        });

        let removed = scanned - self.entries.len();
        debug!(
            pool = %self.label,
            scanned,
            reachable = reachable.len(),
            removed,
            "pool collection finished"
        );
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over pooled entities in pool order.
    /// 按池顺序遍历池中实体。
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &E> + '_ {
        self.entries.values()
    }

    #[inline]
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &E::Id> + '_ {
        self.entries.keys()
    }
}

impl<E: PoolEntity> Default for Pool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Pool<E>
where
    E: PoolEntity + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("label", &self.label)
            .field("entries", &self.entries)
            .finish()
    }
}
