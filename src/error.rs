use thiserror::Error;

/// Errors reported by pool operations.
///
/// A failed operation never leaves the pool half-mutated: the pool looks
/// exactly as it did before the call.
///
/// 池操作报告的错误。
/// 失败的操作不会让池处于半修改状态：池与调用之前完全一致。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The candidate has no value for the identifier field.
    /// 候选值缺少标识字段的值。
    #[error("entity has no value for identifier field `{key}`")]
    InvalidEntity { key: &'static str },

    /// A candidate inside a batch has no value for the identifier field.
    /// The whole batch was rejected.
    /// 批量中的某个候选值缺少标识字段的值，整个批量被拒绝。
    #[error("batch entity at index {index} has no value for identifier field `{key}`")]
    InvalidBatchEntity { index: usize, key: &'static str },

    /// An in-place update changed or cleared the identifier of a pooled
    /// entity. The update was discarded.
    /// 原地更新修改或清除了池中实体的标识，该更新已被丢弃。
    #[error("update changed identifier field `{key}` of a pooled entity")]
    IdentifierChanged { key: &'static str },

    /// A dynamically supplied root is neither an absent value, a single
    /// reference, nor an ordered collection of references.
    /// 动态提供的根既不是空值、单个引用，也不是引用的有序集合。
    #[error("root of shape `{found}` is neither a reference, an absent value, nor a collection of references")]
    AmbiguousRootShape { found: &'static str },
}

pub type Result<T, E = PoolError> = std::result::Result<T, E>;
