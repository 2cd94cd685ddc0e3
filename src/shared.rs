use crate::entity::{PoolEntity, Reference};
use crate::error::Result;
use crate::pool::Pool;
use crate::root::Root;
use crate::sync::{Arc, Mutex};

/// A cloneable handle to a pool shared between threads.
///
/// Every operation holds one mutex for its whole duration, so insertions,
/// merges and collection cycles are serialized in call order. A sweep can
/// never interleave with a merge.
///
/// Use [`with`](Self::with) to run several steps (for example "remove from a
/// container, then collect") as one atomic unit.
///
/// ```
/// use ref_pool::{PoolEntity, Root, SharedPool};
///
/// struct Tag(u32);
///
/// impl PoolEntity for Tag {
///     type Id = u32;
///
///     fn identifier(&self) -> Option<&u32> {
///         Some(&self.0)
///     }
/// }
///
/// let shared = SharedPool::new();
/// let handle = shared.clone();
/// let tag = std::thread::spawn(move || handle.add(Tag(7)).unwrap())
///     .join()
///     .unwrap();
///
/// assert!(shared.contains(&tag));
/// assert_eq!(shared.collect([Root::single(None)]), 1);
/// assert!(shared.is_empty());
/// ```
///
/// 在线程间共享的池的可克隆句柄。
///
/// 每个操作在整个执行期间持有同一个互斥锁，因此插入、合并与回收周期按调用顺序串行化。
/// 清除阶段永远不会与合并交错。
///
/// 使用 [`with`](Self::with) 将多个步骤（例如"先从容器中移除，再回收"）作为一个原子单元执行。
pub struct SharedPool<E: PoolEntity> {
    inner: Arc<Mutex<Pool<E>>>,
}

impl<E: PoolEntity> SharedPool<E> {
    #[inline]
    pub fn new() -> Self {
        Self::from_pool(Pool::new())
    }

    /// Share an already configured pool.
    /// 共享一个已配置好的池。
    #[inline]
    pub fn from_pool(pool: Pool<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// Run `f` with exclusive access to the pool.
    /// 以独占方式访问池并运行 `f`。
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut Pool<E>) -> R) -> R {
        let mut pool = self.inner.lock();
        f(&mut pool)
    }

    #[inline]
    pub fn add(&self, candidate: E) -> Result<Reference<E>> {
        self.with(|pool| pool.add(candidate))
    }

    #[inline]
    pub fn add_all<I>(&self, candidates: I) -> Result<Vec<Reference<E>>>
    where
        I: IntoIterator<Item = E>,
    {
        self.with(|pool| pool.add_all(candidates))
    }

    /// See [`Pool::collect`].
    #[inline]
    pub fn collect<'a, I>(&self, roots: I) -> usize
    where
        E: 'a,
        I: IntoIterator<Item = Root<'a, E>>,
    {
        self.with(|pool| pool.collect(roots))
    }

    #[inline]
    pub fn contains(&self, reference: &Reference<E>) -> bool {
        self.with(|pool| pool.contains(reference))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.with(|pool| pool.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.with(|pool| pool.is_empty())
    }
}

impl<E: PoolEntity> Clone for SharedPool<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: PoolEntity> Default for SharedPool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PoolEntity> From<Pool<E>> for SharedPool<E> {
    fn from(pool: Pool<E>) -> Self {
        Self::from_pool(pool)
    }
}
