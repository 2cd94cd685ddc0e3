use crate::PoolEntity;

mod collection_tests;

/// 测试用的待办实体
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Todo {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) done: bool,
}

impl Todo {
    pub(crate) fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            done: false,
        }
    }
}

impl PoolEntity for Todo {
    type Id = String;

    fn identifier(&self) -> Option<&String> {
        Some(&self.id)
    }
}

/// 标识字段可能缺失的实体，标识字段名为 `key`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draft {
    pub(crate) key: Option<u32>,
    pub(crate) body: String,
}

impl PoolEntity for Draft {
    type Id = u32;

    const IDENTIFIER_KEY: &'static str = "key";

    fn identifier(&self) -> Option<&u32> {
        self.key.as_ref()
    }
}

pub(crate) fn draft(key: u32, body: &str) -> Draft {
    Draft {
        key: Some(key),
        body: body.to_owned(),
    }
}
