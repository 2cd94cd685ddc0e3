use crate::entity::{PoolEntity, Reference};
use std::collections::HashSet;

/// A caller-declared liveness anchor for one collection cycle.
///
/// Roots denote identifiers directly. References stored inside pooled
/// entities are not followed: a container that should keep entities alive
/// has to be passed as a root itself.
///
/// 调用者为一次回收周期声明的存活锚点。
///
/// 根直接指向标识。池中实体字段内保存的引用不会被追踪：
/// 需要保活实体的容器必须自己作为根传入。
#[derive(Debug)]
pub enum Root<'a, E: PoolEntity> {
    /// An optional single reference; `None` contributes nothing.
    /// 可选的单个引用；`None` 不贡献任何标识。
    Single(Option<&'a Reference<E>>),
    /// An ordered collection of references, possibly empty.
    /// 引用的有序集合，可以为空。
    Collection(&'a [Reference<E>]),
}

impl<'a, E: PoolEntity> Root<'a, E> {
    #[inline]
    pub fn single(reference: Option<&'a Reference<E>>) -> Self {
        Root::Single(reference)
    }

    #[inline]
    pub fn collection(references: &'a [Reference<E>]) -> Self {
        Root::Collection(references)
    }

    fn ids(self) -> impl Iterator<Item = &'a E::Id> {
        let refs: &'a [Reference<E>] = match self {
            Root::Single(reference) => reference.map(std::slice::from_ref).unwrap_or_default(),
            Root::Collection(references) => references,
        };
        refs.iter().map(Reference::id)
    }
}

impl<E: PoolEntity> Clone for Root<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: PoolEntity> Copy for Root<'_, E> {}

impl<'a, E: PoolEntity> From<&'a Reference<E>> for Root<'a, E> {
    fn from(reference: &'a Reference<E>) -> Self {
        Root::Single(Some(reference))
    }
}

impl<'a, E: PoolEntity> From<&'a Option<Reference<E>>> for Root<'a, E> {
    fn from(reference: &'a Option<Reference<E>>) -> Self {
        Root::Single(reference.as_ref())
    }
}

impl<'a, E: PoolEntity> From<&'a [Reference<E>]> for Root<'a, E> {
    fn from(references: &'a [Reference<E>]) -> Self {
        Root::Collection(references)
    }
}

impl<'a, E: PoolEntity> From<&'a Vec<Reference<E>>> for Root<'a, E> {
    fn from(references: &'a Vec<Reference<E>>) -> Self {
        Root::Collection(references.as_slice())
    }
}

/// Owning counterpart of [`Root`], for roots assembled at runtime.
/// [`Root`] 的拥有型版本，用于运行时构造的根。
#[derive(Debug)]
pub enum OwnedRoot<E: PoolEntity> {
    Single(Option<Reference<E>>),
    Collection(Vec<Reference<E>>),
}

impl<E: PoolEntity> OwnedRoot<E> {
    #[inline]
    pub fn as_root(&self) -> Root<'_, E> {
        match self {
            OwnedRoot::Single(reference) => Root::Single(reference.as_ref()),
            OwnedRoot::Collection(references) => Root::Collection(references),
        }
    }
}

impl<E: PoolEntity> Clone for OwnedRoot<E> {
    fn clone(&self) -> Self {
        match self {
            OwnedRoot::Single(reference) => OwnedRoot::Single(reference.clone()),
            OwnedRoot::Collection(references) => OwnedRoot::Collection(references.clone()),
        }
    }
}

impl<E: PoolEntity> PartialEq for OwnedRoot<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OwnedRoot::Single(a), OwnedRoot::Single(b)) => a == b,
            (OwnedRoot::Collection(a), OwnedRoot::Collection(b)) => a == b,
            _ => false,
        }
    }
}

/// Mark phase: the union of every identifier denoted by `roots`.
///
/// A single flat pass over the roots, no graph walk. Identifiers that are not
/// in any pool are kept in the set; the sweeper only asks about members.
///
/// 标记阶段：`roots` 所指向的全部标识的并集。
/// 对根的一次扁平遍历，不做图遍历。
pub fn mark<'a, E, I>(roots: I) -> HashSet<&'a E::Id>
where
    E: PoolEntity + 'a,
    I: IntoIterator<Item = Root<'a, E>>,
{
    roots.into_iter().flat_map(Root::ids).collect()
}
