/// 回收测试模块
/// 测试标记阶段、清除阶段以及各种根的组合
use super::{Todo, draft};
use crate::{OwnedRoot, Pool, Reference, Root, mark};

fn pool_of(ids: &[&str]) -> (Pool<Todo>, Vec<Reference<Todo>>) {
    let mut pool = Pool::new();
    let refs = pool
        .add_all(ids.iter().map(|id| Todo::new(id, id)))
        .unwrap();
    (pool, refs)
}

fn ids(pool: &Pool<Todo>) -> Vec<&str> {
    pool.ids().map(String::as_str).collect()
}

/// 测试1: 空池回收是空操作
#[test]
fn test_collect_empty_pool() {
    let mut pool: Pool<Todo> = Pool::new();

    assert_eq!(pool.collect([]), 0);
    assert_eq!(pool.collect([Root::single(None)]), 0);
    assert!(pool.is_empty());
}

/// 测试2: 没有根时清空整个池
#[test]
fn test_collect_without_roots_sweeps_everything() {
    let (mut pool, _refs) = pool_of(&["a", "b", "c"]);

    assert_eq!(pool.collect([]), 3);
    assert!(pool.is_empty());
}

/// 测试3: 单根保活其实体
#[test]
fn test_single_root_keeps_entity() {
    let (mut pool, refs) = pool_of(&["a", "b"]);
    let current = Some(refs[0].clone());

    let removed = pool.collect([Root::from(&current)]);

    assert_eq!(removed, 1);
    assert_eq!(ids(&pool), ["a"]);
}

/// 测试4: 空的单根和空集合不贡献任何标识
#[test]
fn test_absent_and_empty_roots_contribute_nothing() {
    let (mut pool, _refs) = pool_of(&["a", "b"]);
    let current: Option<Reference<Todo>> = None;
    let todos: Vec<Reference<Todo>> = Vec::new();

    let removed = pool.collect([Root::from(&todos), Root::from(&current)]);

    assert_eq!(removed, 2);
    assert!(pool.is_empty());
}

/// 测试5: 集合根中的每个元素都被标记
#[test]
fn test_collection_root_keeps_every_element() {
    let (mut pool, refs) = pool_of(&["a", "b", "c", "d"]);
    let list = vec![refs[1].clone(), refs[3].clone()];

    pool.collect([Root::collection(&list)]);

    assert_eq!(ids(&pool), ["b", "d"]);
}

/// 测试6: 多个根取并集
#[test]
fn test_roots_are_unioned() {
    let (mut pool, refs) = pool_of(&["a", "b", "c", "d", "e"]);
    let todos = vec![refs[0].clone()];
    let current = Some(refs[2].clone());
    let lists = vec![vec![refs[4].clone()], vec![refs[2].clone(), refs[0].clone()]];

    let roots = [Root::from(&todos), Root::from(&current)]
        .into_iter()
        .chain(lists.iter().map(Root::from));
    let removed = pool.collect(roots);

    assert_eq!(removed, 2);
    assert_eq!(ids(&pool), ["a", "c", "e"]);
}

/// 测试7: 存活实体保持相对顺序、身份与字段
#[test]
fn test_survivors_keep_order_and_fields() {
    let mut pool = Pool::new();
    let refs = pool
        .add_all((0..10).map(|key| draft(key, &format!("body {key}"))))
        .unwrap();
    // 逆序给出根，不影响池内顺序
    let roots: Vec<_> = refs.iter().rev().step_by(3).cloned().collect();

    pool.collect([Root::collection(&roots)]);

    let survivors: Vec<(u32, &str)> = pool
        .iter()
        .map(|d| (d.key.unwrap(), d.body.as_str()))
        .collect();
    assert_eq!(
        survivors,
        [(0, "body 0"), (3, "body 3"), (6, "body 6"), (9, "body 9")]
    );
}

/// 测试8: 不属于池的根标识被忽略
#[test]
fn test_unknown_root_ids_are_ignored() {
    let (mut pool, refs) = pool_of(&["a"]);
    let stale = vec![Reference::new("gone".to_owned()), refs[0].clone()];

    assert_eq!(pool.collect([Root::collection(&stale)]), 0);
    assert_eq!(ids(&pool), ["a"]);
}

/// 测试9: 实体字段里的引用不会传递保活
#[test]
fn test_no_transitive_liveness() {
    #[derive(Debug)]
    struct Node {
        id: u32,
        next: Option<Reference<Node>>,
    }

    impl crate::PoolEntity for Node {
        type Id = u32;

        fn identifier(&self) -> Option<&u32> {
            Some(&self.id)
        }
    }

    let mut pool = Pool::new();
    let tail = pool.add(Node { id: 2, next: None }).unwrap();
    let head = pool
        .add(Node {
            id: 1,
            next: Some(tail.clone()),
        })
        .unwrap();

    pool.collect([Root::from(&head)]);

    assert!(pool.contains(&head));
    assert!(!pool.contains(&tail));
    // head 仍然"指向" tail，但 tail 已被回收
    let next = pool.get(&head).unwrap().next.as_ref().unwrap();
    assert!(pool.get(next).is_none());
}

/// 测试10: 每个不可达实体只被一次回收移除
#[test]
fn test_unreachable_removed_exactly_once() {
    let (mut pool, refs) = pool_of(&["a", "b", "c"]);
    let keep = vec![refs[1].clone()];

    assert_eq!(pool.collect([Root::collection(&keep)]), 2);
    assert_eq!(pool.collect([Root::collection(&keep)]), 0);
    assert_eq!(ids(&pool), ["b"]);
}

/// 测试11: 回收之后重新插入同一标识
#[test]
fn test_reinsert_after_sweep() {
    let (mut pool, refs) = pool_of(&["a", "b"]);
    pool.collect([Root::from(&refs[1])]);

    let a = pool.add(Todo::new("a", "back again")).unwrap();

    assert_eq!(a, refs[0]);
    // 重新插入的实体追加到末尾
    assert_eq!(ids(&pool), ["b", "a"]);
    assert_eq!(pool.get(&a).unwrap().title, "back again");
}

/// 测试12: 标记阶段返回所有根标识的并集
#[test]
fn test_mark_returns_union() {
    let a: Reference<Todo> = Reference::new("a".to_owned());
    let b: Reference<Todo> = Reference::new("b".to_owned());
    let list = vec![a.clone(), b.clone(), a.clone()];
    let absent: Option<Reference<Todo>> = None;

    let marked = mark([Root::from(&list), Root::from(&absent), Root::from(&b)]);

    assert_eq!(marked.len(), 2);
    assert!(marked.contains(&"a".to_owned()));
    assert!(marked.contains(&"b".to_owned()));
}

/// 测试13: 拥有型根
#[test]
fn test_owned_roots() {
    let (mut pool, refs) = pool_of(&["a", "b", "c"]);
    let roots = vec![
        OwnedRoot::Single(Some(refs[0].clone())),
        OwnedRoot::Single(None),
        OwnedRoot::Collection(vec![refs[2].clone()]),
    ];

    pool.collect(roots.iter().map(OwnedRoot::as_root));

    assert_eq!(ids(&pool), ["a", "c"]);
}
