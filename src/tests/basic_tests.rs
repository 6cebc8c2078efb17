/// 基础测试模块
/// 测试构造、遍历、查询和相等比较的核心行为
use crate::{EpochRange, RangeError};
use std::collections::VecDeque;

/// 测试1: 创建 EpochRange 并查询长度
#[test]
fn test_create_range_and_query_len() {
    let range = EpochRange::new(vec![10, 20, 30]);

    assert_eq!(range.len(), 3);
    assert!(!range.is_empty());
}

/// 测试2: 索引访问与底层容器一致
#[test]
fn test_indexed_access_matches_source() {
    let source = vec![5, 6, 7, 8, 9];
    let range = EpochRange::new(source.clone());

    // 对每个合法索引，包装器读到的值与源一致
    for (i, expected) in source.iter().enumerate() {
        assert_eq!(range.get(i), Ok(expected));
    }

    // 越界索引失败
    assert_eq!(range.get(source.len()), Err(RangeError::OutOfRange));
}

/// 测试3: 按序遍历 1..9，随后的前进失败
#[test]
fn test_ordered_traversal_then_out_of_range() {
    let mut range = EpochRange::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);

    let mut cursor = range.begin();
    let bound = range.end_bound();
    let mut seen = Vec::new();

    while cursor != bound {
        seen.push(*cursor.get().unwrap());
        cursor.advance().unwrap();
    }

    assert_eq!(seen, [1, 2, 3, 4, 5, 6, 7, 8, 9]);

    // 已到末尾，再前进失败
    assert_eq!(cursor.advance(), Err(RangeError::OutOfRange));

    // 包装器仍然可用
    assert_eq!(range.mutable_access().len(), 9);
}

/// 测试4: 开头处后退失败
#[test]
fn test_retreat_at_begin_fails() {
    let range = EpochRange::new(vec![1, 2, 3]);

    let mut cursor = range.begin();
    assert_eq!(cursor.retreat(), Err(RangeError::OutOfRange));

    // 失败后位置不变，仍指向首元素
    assert_eq!(cursor.get(), Ok(&1));
}

/// 测试5: 从 end() 反向遍历
#[test]
fn test_reverse_traversal_from_end() {
    let range = EpochRange::new(vec![1, 2, 3]);

    let mut cursor = range.end();
    let mut seen = Vec::new();

    while cursor.retreat().is_ok() {
        seen.push(*cursor.get().unwrap());
    }

    assert_eq!(seen, [3, 2, 1]);
}

/// 测试6: offset_by 的正负偏移和越界
#[test]
fn test_offset_by() {
    let range = EpochRange::new(vec![0, 1, 2, 3, 4]);

    let cursor = range.begin().offset_by(2).unwrap();
    assert_eq!(cursor.get(), Ok(&2));

    // 从中间向回偏移
    assert_eq!(cursor.offset_by(-2).unwrap().get(), Ok(&0));

    // 目标落在 [0, len) 之外：包括恰好等于 len 的位置
    assert_eq!(cursor.offset_by(3).err(), Some(RangeError::OutOfRange));
    assert_eq!(cursor.offset_by(-3).err(), Some(RangeError::OutOfRange));
}

/// 测试7: 通过游标的带索引解引用
#[test]
fn test_get_at() {
    let range = EpochRange::new(vec![10, 20, 30, 40]);

    let cursor = range.begin().offset_by(1).unwrap();
    assert_eq!(cursor.get_at(0), Ok(&20));
    assert_eq!(cursor.get_at(2), Ok(&40));
    assert_eq!(cursor.get_at(-1), Ok(&10));
    assert_eq!(cursor.get_at(3), Err(RangeError::OutOfRange));
    assert_eq!(cursor.get_at(-2), Err(RangeError::OutOfRange));
}

/// 测试8: front 和 back
#[test]
fn test_front_and_back() {
    let range = EpochRange::new(vec![7, 8, 9]);

    assert_eq!(range.front(), Ok(&7));
    assert_eq!(range.back(), Ok(&9));
}

/// 测试9: replace 安装新内容
#[test]
fn test_replace_installs_new_contents() {
    let mut range = EpochRange::new(vec![1, 2, 3]);

    range.replace(vec![4, 5]);

    assert_eq!(range.len(), 2);
    assert_eq!(range.front(), Ok(&4));
    assert_eq!(range.begin().get(), Ok(&4));
}

/// 测试10: VecDeque 作为非连续容器也可遍历
#[test]
fn test_vecdeque_traversal() {
    let mut deque = VecDeque::new();
    deque.push_back(2);
    deque.push_back(3);
    deque.push_front(1);

    let range = EpochRange::new(deque);

    let mut cursor = range.begin();
    let bound = range.end_bound();
    let mut seen = Vec::new();
    while cursor != bound {
        seen.push(*cursor.get().unwrap());
        cursor.advance().unwrap();
    }

    assert_eq!(seen, [1, 2, 3]);
}

/// 测试11: 连续容器的原始存储访问
#[test]
fn test_contiguous_slice_access() {
    let range = EpochRange::new(vec![1, 2, 3]);
    assert_eq!(range.as_slice(), &[1, 2, 3]);

    let view = range.view();
    assert_eq!(view.as_slice(), &[1, 2, 3]);

    // 数组和 Box<[T]> 同样具备该能力
    let array_range = EpochRange::new([4, 5, 6]);
    assert_eq!(array_range.as_slice(), &[4, 5, 6]);

    let boxed: Box<[i32]> = vec![7, 8].into_boxed_slice();
    let boxed_range = EpochRange::new(boxed);
    assert_eq!(boxed_range.as_slice(), &[7, 8]);
}

/// 测试12: 游标相等要求相同容器与相同索引
#[test]
fn test_cursor_equality_requires_same_container() {
    let range_a = EpochRange::new(vec![1, 2, 3]);
    let range_b = EpochRange::new(vec![1, 2, 3]);

    // 同一容器、同一索引：相等
    assert_eq!(range_a.begin(), range_a.begin());

    // 不同容器、相同索引：不相等
    assert_ne!(range_a.begin(), range_b.begin());

    // 同一容器、不同索引：不相等
    assert_ne!(range_a.begin(), range_a.end());
}

/// 测试13: 边界标记的相等同样要求容器身份一致
#[test]
fn test_end_bound_requires_container_identity() {
    let range_a = EpochRange::new(vec![1, 2, 3]);
    let range_b = EpochRange::new(vec![1, 2, 3]);

    // 位于末尾的游标与自己容器的边界相等
    assert!(range_a.end() == range_a.end_bound());
    assert!(range_a.end_bound() == range_a.end());

    // 与另一容器的边界不相等，即使索引一致
    assert!(range_a.end() != range_b.end_bound());
}

/// 测试14: 视图的查询委托给容器
#[test]
fn test_view_queries_delegate() {
    let range = EpochRange::new(vec![5, 6, 7]);
    let view = range.view();

    assert_eq!(view.len(), 3);
    assert!(!view.is_empty());
    assert_eq!(view.front(), Ok(&5));
    assert_eq!(view.back(), Ok(&7));
    assert_eq!(view.get(1), Ok(&6));
    assert_eq!(view.get(3), Err(RangeError::OutOfRange));
}

/// 测试15: 视图铸造的游标与拥有者的游标语义一致
#[test]
fn test_view_cursor_traversal() {
    let range = EpochRange::new(vec![1, 2, 3]);
    let view = range.view();

    let mut cursor = view.begin();
    let bound = view.end_bound();
    let mut seen = Vec::new();
    while cursor != bound {
        seen.push(*cursor.get().unwrap());
        cursor.advance().unwrap();
    }

    assert_eq!(seen, [1, 2, 3]);
    assert_eq!(cursor.advance(), Err(RangeError::OutOfRange));
}

/// 测试16: From<C> 构造
#[test]
fn test_from_container() {
    let range: EpochRange<Vec<i32>> = vec![1, 2].into();
    assert_eq!(range.len(), 2);
}
