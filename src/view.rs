use crate::cursor::{Cursor, EndBound};
use crate::error::{RangeError, Result};
use crate::seq::{Contiguous, Sequence};
use crate::state::Shared;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A read-only view of an epoch-guarded container.
///
/// A `RangeView` does not own the container; it shares the control block with
/// the [`EpochRange`](crate::EpochRange) that does, holding one reference
/// share of its own (acquired at construction and on clone, released on
/// drop). It offers no mutation surface, and the cursors it mints carry
/// exactly the same staleness semantics as the owner's: created against the
/// current epoch, failing [`RangeError::Invalidated`] once the owner mutates.
///
/// The view itself is never invalidated. Its direct queries always read the
/// container's current contents, and because the view's share keeps the
/// guarded allocation alive, they keep working even after the owning range
/// has been dropped — they then read the final, retired contents.
///
/// 受纪元守护容器的只读视图。
/// `RangeView` 不拥有容器；它与拥有容器的 [`EpochRange`](crate::EpochRange)
/// 共享控制块，自己持有一个引用份额（构造和克隆时获取，drop 时释放）。
/// 它不提供任何变更入口，它铸造的游标与拥有者的游标具有完全相同的过期语义：
/// 以当前纪元创建，一旦拥有者变更即以 [`RangeError::Invalidated`] 失败。
///
/// 视图本身永远不会失效。它的直接查询总是读取容器的当前内容；
/// 由于视图的份额使被守护分配保持存活，即使拥有型区间已被 drop，
/// 这些查询仍然可用 —— 此时读到的是最终的、已退役的内容。
pub struct RangeView<C: Sequence> {
    shared: NonNull<Shared<C>>,
    _marker: PhantomData<Shared<C>>,
}

impl<C: Sequence> RangeView<C> {
    /// Construct a view over the given allocation, acquiring one share.
    /// 在给定分配上构造视图，获取一个份额。
    pub(crate) fn new(shared: NonNull<Shared<C>>) -> Self {
        // SAFETY: the caller holds a live share, so the allocation is alive
        // for the acquire.
        unsafe { &shared.as_ref().control }.acquire();
        RangeView {
            shared,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn container(&self) -> &C {
        // SAFETY: this view's own share keeps the allocation alive; mutation
        // runs only through the owning range under the crate's aliasing
        // contract.
        unsafe { self.shared.as_ref().container() }
    }

    /// A cursor at the first position.
    /// 指向首个位置的游标。
    #[inline]
    pub fn begin(&self) -> Cursor<C> {
        Cursor::new(self.shared, 0)
    }

    /// A cursor at the one-past-last position. Retreat-capable, which is how
    /// reverse traversal starts.
    /// 指向「末元素再往后一格」的游标。可以后退，反向遍历由此开始。
    #[inline]
    pub fn end(&self) -> Cursor<C> {
        Cursor::new(self.shared, self.container().len())
    }

    /// The boundary marker for loop termination tests.
    /// 用于循环终止判断的边界标记。
    #[inline]
    pub fn end_bound(&self) -> EndBound<C> {
        EndBound::new(self.shared.as_ptr().cast_const(), self.container().len())
    }

    /// Current number of elements.
    /// 当前元素数量。
    #[inline]
    pub fn len(&self) -> usize {
        self.container().len()
    }

    /// Whether the container currently holds no elements.
    /// 容器当前是否为空。
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.container().is_empty()
    }

    /// The first element; fails with [`RangeError::OutOfRange`] when empty.
    /// 首元素；容器为空时以 [`RangeError::OutOfRange`] 失败。
    #[inline]
    pub fn front(&self) -> Result<&C::Item> {
        self.container().item_at(0).ok_or(RangeError::OutOfRange)
    }

    /// The last element; fails with [`RangeError::OutOfRange`] when empty.
    /// 末元素；容器为空时以 [`RangeError::OutOfRange`] 失败。
    #[inline]
    pub fn back(&self) -> Result<&C::Item> {
        let container = self.container();
        let len = container.len();
        if len == 0 {
            return Err(RangeError::OutOfRange);
        }
        container.item_at(len - 1).ok_or(RangeError::OutOfRange)
    }

    /// The element at `index`; fails with [`RangeError::OutOfRange`] when
    /// `index >= len()`.
    /// `index` 处的元素；当 `index >= len()` 时以
    /// [`RangeError::OutOfRange`] 失败。
    #[inline]
    pub fn get(&self, index: usize) -> Result<&C::Item> {
        self.container().item_at(index).ok_or(RangeError::OutOfRange)
    }

    #[cfg(test)]
    pub(crate) fn ref_count(&self) -> usize {
        // SAFETY: share held by `self`.
        unsafe { &self.shared.as_ref().control }.ref_count()
    }
}

impl<C: Contiguous> RangeView<C> {
    /// The elements as one contiguous slice. Only containers with contiguous
    /// storage offer this.
    /// 以一个连续切片形式返回全部元素。仅具备连续存储的容器提供。
    #[inline]
    pub fn as_slice(&self) -> &[C::Item] {
        self.container().as_slice()
    }
}

impl<C: Sequence> Clone for RangeView<C> {
    /// Cloning re-acquires: the copy holds its own reference share.
    /// 克隆会重新获取：副本持有自己的引用份额。
    #[inline]
    fn clone(&self) -> Self {
        RangeView::new(self.shared)
    }
}

impl<C: Sequence> Drop for RangeView<C> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: releases exactly the share acquired at construction.
        unsafe { Shared::release(self.shared) };
    }
}

impl<C: Sequence> fmt::Debug for RangeView<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeView").field("len", &self.len()).finish()
    }
}

// SAFETY: same reasoning as for Cursor — atomic bookkeeping, shared reads of
// the container body (C: Sync), and the receiving thread may drop the last
// share and with it the container (C: Send).
unsafe impl<C: Sequence + Send + Sync> Send for RangeView<C> {}
unsafe impl<C: Sequence + Send + Sync> Sync for RangeView<C> {}
