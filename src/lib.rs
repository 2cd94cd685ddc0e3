//! Identity-deduplicating entity pool with caller-rooted mark-and-sweep collection.
//!
//! A [`Pool`] stores exactly one canonical entity per identifier. Other parts
//! of an application hold lightweight [`Reference`]s to pooled entities
//! instead of copies. When references are dropped from those containers, the
//! owner calls [`Pool::collect`] with every container that may still hold
//! references, and the pool sweeps whatever none of them denote.
//!
//! Collection never runs implicitly.
//!
//! 按标识去重的实体池，配合由调用者提供根的标记-清除回收。
//!
//! [`Pool`] 为每个标识只保存一个规范实体。应用的其他部分持有指向池中实体的轻量
//! [`Reference`]，而不是副本。当这些容器丢弃引用后，所有者以所有可能仍持有引用的容器
//! 调用 [`Pool::collect`]，池会清除它们都未指向的实体。
//!
//! 回收永远不会隐式运行。

mod entity;
mod error;
mod pool;
pub mod record;
mod root;
mod shared;
mod sync;

pub use entity::{DEFAULT_IDENTIFIER_KEY, PoolEntity, Reference};
pub use error::{PoolError, Result};
pub use pool::{Pool, PoolBuilder};
pub use record::{DefaultKey, IdentifierKey, Record, RecordId};
pub use root::{OwnedRoot, Root, mark};
pub use shared::SharedPool;

#[cfg(test)]
mod tests;
