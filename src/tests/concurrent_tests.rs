/// 并发测试模块
/// 测试多线程下的簿记计数器、跨线程失效观察和拥有者异线程销毁
use crate::{EpochRange, RangeError};
use std::sync::Arc;
use std::thread;

/// 测试1: 多个线程通过各自的视图并发读取
#[test]
fn test_concurrent_readers_through_views() {
    let range = Arc::new(EpochRange::new(vec![1, 2, 3, 4, 5]));

    let mut handles = vec![];

    // 创建 5 个读取线程，每个持有自己的视图
    for _ in 0..5 {
        let range = Arc::clone(&range);
        handles.push(thread::spawn(move || {
            let view = range.view();
            for _ in 0..100 {
                let mut cursor = view.begin();
                let bound = view.end_bound();
                let mut sum = 0;
                while cursor != bound {
                    sum += *cursor.get().unwrap();
                    cursor.advance().unwrap();
                }
                assert_eq!(sum, 15);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(range.ref_count(), 1);
}

/// 测试2: 多线程克隆与销毁游标后计数复原
#[test]
fn test_concurrent_cursor_churn() {
    let range = Arc::new(EpochRange::new(vec![7; 16]));

    let mut handles = vec![];

    for _ in 0..4 {
        let range = Arc::clone(&range);
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                let cursor = range.begin();
                let copy = cursor.clone();
                drop(cursor);
                drop(copy);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // 所有线程的获取/释放严格配对
    assert_eq!(range.ref_count(), 1);
}

/// 测试3: 变更前的游标在其他线程上观察到失效
#[test]
fn test_cross_thread_invalidation() {
    let mut range = EpochRange::new(vec![1, 2, 3]);

    // 第一阶段：变更之前铸造的游标
    let stale_cursors: Vec<_> = (0..4).map(|_| range.begin()).collect();

    // 第二阶段：变更
    range.mutable_access().push(4);

    // 第三阶段：把旧游标分发到各线程，全部观察到失效
    let mut handles = vec![];
    for cursor in stale_cursors {
        handles.push(thread::spawn(move || {
            assert_eq!(cursor.get(), Err(RangeError::Invalidated));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // 变更之后的游标正常读取
    assert_eq!(range.begin().get(), Ok(&1));
}

/// 测试4: 拥有者在另一线程销毁，本线程游标失效
#[test]
fn test_owner_dropped_on_other_thread() {
    let range = EpochRange::new(vec![1, 2, 3]);
    let cursor = range.begin();
    let view = range.view();

    thread::spawn(move || {
        drop(range);
    })
    .join()
    .unwrap();

    // 游标失效；视图仍能读取最终内容
    assert_eq!(cursor.get(), Err(RangeError::Invalidated));
    assert_eq!(view.front(), Ok(&1));
    assert_eq!(view.begin().get(), Ok(&1));
}

/// 测试5: 游标作为最后的份额在其他线程释放存储
#[test]
fn test_last_share_released_on_other_thread() {
    let range = EpochRange::new(vec![String::from("a"), String::from("b")]);
    let cursor = range.begin();

    drop(range);

    thread::spawn(move || {
        // 该游标是最后一个份额；存储在此线程释放
        assert_eq!(cursor.get(), Err(RangeError::Invalidated));
        drop(cursor);
    })
    .join()
    .unwrap();
}
