use crate::error::{RangeError, Result};
use crate::seq::Sequence;
use crate::state::Shared;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A checked position into an epoch-guarded container.
///
/// A `Cursor` pairs an index with the epoch it observed at construction. Every
/// dereference re-reads the control block first: if the container was
/// structurally mutated since the cursor was created, the access fails with
/// [`RangeError::Invalidated`] instead of returning stale or relocated data.
/// Movement ([`advance`](Cursor::advance), [`retreat`](Cursor::retreat),
/// [`offset_by`](Cursor::offset_by)) is boundary-checked and fails with
/// [`RangeError::OutOfRange`] rather than stepping outside `[0, len]`.
///
/// Each cursor owns one share of the control block's reference count,
/// acquired at construction and released on drop; clones acquire their own
/// share. The count is what keeps the guarded storage alive for as long as
/// any cursor can still reach it.
///
/// **Safety Contract**: a reference returned by [`get`](Cursor::get) or
/// [`get_at`](Cursor::get_at) aliases the live container storage. Release it
/// before the owning [`EpochRange`](crate::EpochRange) performs any mutation;
/// the epoch check detects stale *cursors*, not borrows the caller is still
/// holding.
///
/// 指向受纪元守护容器的受检位置。
/// `Cursor` 将一个索引与构造时观察到的纪元配对。每次解引用都会先重读控制块：
/// 如果容器在游标创建之后发生了结构性变更，访问将以
/// [`RangeError::Invalidated`] 失败，而不是返回过期或已搬迁的数据。
/// 移动（[`advance`](Cursor::advance)、[`retreat`](Cursor::retreat)、
/// [`offset_by`](Cursor::offset_by)）带边界检查，越界时以
/// [`RangeError::OutOfRange`] 失败，而不会走出 `[0, len]`。
///
/// 每个游标持有控制块引用计数的一个份额，构造时获取、drop 时释放；
/// 克隆会获取自己的份额。正是这个计数让被守护的存储在任何游标
/// 仍能到达它时保持存活。
///
/// **安全合约**：[`get`](Cursor::get) 或 [`get_at`](Cursor::get_at)
/// 返回的引用与容器的存活存储构成别名。在拥有它的
/// [`EpochRange`](crate::EpochRange) 执行任何变更之前必须先放弃该引用；
/// 纪元检查探测的是过期的*游标*，而不是调用者仍持有的借用。
pub struct Cursor<C: Sequence> {
    shared: NonNull<Shared<C>>,
    index: usize,
    /// The control block epoch observed when this cursor was created. Never
    /// changes afterwards; it is the proof the container has not been
    /// structurally mutated since.
    /// 游标创建时观察到的控制块纪元。此后不再变化；
    /// 它是容器自那以后未发生结构性变更的凭证。
    epoch: usize,
    _marker: PhantomData<Shared<C>>,
}

impl<C: Sequence> Cursor<C> {
    /// Construct a cursor at `index`, acquiring a fresh reference and
    /// capturing the current epoch.
    /// 在 `index` 处构造游标：获取一个新的引用份额并捕获当前纪元。
    pub(crate) fn new(shared: NonNull<Shared<C>>, index: usize) -> Self {
        // SAFETY: the caller (an owning range, a view, or another cursor)
        // holds a live share, so the allocation is alive for the acquire.
        let control = unsafe { &shared.as_ref().control };
        control.acquire();
        Cursor {
            shared,
            index,
            epoch: control.epoch(),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn shared(&self) -> &Shared<C> {
        // SAFETY: this cursor's own share keeps the allocation alive for as
        // long as `self` does.
        unsafe { self.shared.as_ref() }
    }

    #[inline]
    fn container(&self) -> &C {
        // SAFETY: share held by `self`; mutation runs only through the owning
        // range, whose callers uphold the crate's aliasing contract.
        unsafe { self.shared().container() }
    }

    /// The index this cursor currently points at.
    /// 游标当前指向的索引。
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move forward one position.
    ///
    /// Fails with [`RangeError::OutOfRange`] when the cursor already sits at
    /// the container's end; the position is left unchanged on failure.
    ///
    /// 前移一个位置。
    /// 当游标已位于容器末尾时以 [`RangeError::OutOfRange`] 失败；
    /// 失败时位置保持不变。
    #[inline]
    pub fn advance(&mut self) -> Result<()> {
        if self.index >= self.container().len() {
            return Err(RangeError::OutOfRange);
        }
        self.index += 1;
        Ok(())
    }

    /// Move back one position.
    ///
    /// Fails with [`RangeError::OutOfRange`] when the cursor already sits at
    /// the container's begin; the position is left unchanged on failure.
    ///
    /// 后移一个位置。
    /// 当游标已位于容器开头时以 [`RangeError::OutOfRange`] 失败；
    /// 失败时位置保持不变。
    #[inline]
    pub fn retreat(&mut self) -> Result<()> {
        if self.index == 0 {
            return Err(RangeError::OutOfRange);
        }
        self.index -= 1;
        Ok(())
    }

    /// A new cursor `offset` positions away from this one.
    ///
    /// The target index is `index + offset`; when it falls outside
    /// `[0, len)` the call fails with [`RangeError::OutOfRange`]. The new
    /// cursor captures the current epoch, like any fresh construction.
    ///
    /// 距当前位置 `offset` 个位置的新游标。
    /// 目标索引为 `index + offset`；当它落在 `[0, len)` 之外时以
    /// [`RangeError::OutOfRange`] 失败。新游标与任何新构造一样捕获当前纪元。
    pub fn offset_by(&self, offset: isize) -> Result<Cursor<C>> {
        let target = self.index as isize + offset;
        if target < 0 || target as usize >= self.container().len() {
            return Err(RangeError::OutOfRange);
        }
        Ok(Cursor::new(self.shared, target as usize))
    }

    /// Dereference: a reference to the element this cursor points at.
    ///
    /// Checked in order:
    /// 1. the captured epoch against the control block's current epoch —
    ///    mismatch fails with [`RangeError::Invalidated`];
    /// 2. the position against the container's current length — at or past
    ///    the end fails with [`RangeError::OutOfRange`].
    ///
    /// On success the reference aliases the live element in the container's
    /// current storage, not a copy. See the type-level Safety Contract.
    ///
    /// 解引用：获得游标所指元素的引用。
    /// 按顺序检查：
    /// 1. 捕获的纪元与控制块当前纪元 —— 不一致时以
    ///    [`RangeError::Invalidated`] 失败；
    /// 2. 位置与容器当前长度 —— 位于或越过末尾时以
    ///    [`RangeError::OutOfRange`] 失败。
    /// 成功时返回的引用与容器当前存储中的存活元素构成别名，而非副本。
    /// 参见类型级安全合约。
    #[inline]
    pub fn get(&self) -> Result<&C::Item> {
        if self.epoch != self.shared().control.epoch() {
            return Err(RangeError::Invalidated);
        }
        self.container()
            .item_at(self.index)
            .ok_or(RangeError::OutOfRange)
    }

    /// Indexed dereference: the element `offset` positions away.
    ///
    /// The epoch check runs against *this* cursor's captured epoch before any
    /// movement, so a stale cursor fails with [`RangeError::Invalidated`]
    /// here exactly as it would on [`get`](Cursor::get).
    ///
    /// 带索引的解引用：距当前位置 `offset` 处的元素。
    /// 纪元检查在任何移动之前针对*本*游标捕获的纪元进行，
    /// 因此过期游标在这里与在 [`get`](Cursor::get) 上一样以
    /// [`RangeError::Invalidated`] 失败。
    pub fn get_at(&self, offset: isize) -> Result<&C::Item> {
        if self.epoch != self.shared().control.epoch() {
            return Err(RangeError::Invalidated);
        }
        let target = self.index as isize + offset;
        if target < 0 {
            return Err(RangeError::OutOfRange);
        }
        self.container()
            .item_at(target as usize)
            .ok_or(RangeError::OutOfRange)
    }
}

impl<C: Sequence> Clone for Cursor<C> {
    /// Cloning behaves as a fresh construction at the same position: the
    /// clone acquires its own reference and captures the *current* epoch,
    /// independent of the epoch the original captured.
    ///
    /// 克隆等同于在同一位置的全新构造：副本获取自己的引用份额并捕获
    /// *当前*纪元，与原游标捕获的纪元无关。
    #[inline]
    fn clone(&self) -> Self {
        Cursor::new(self.shared, self.index)
    }
}

impl<C: Sequence> Drop for Cursor<C> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: releases exactly the share acquired at construction.
        unsafe { Shared::release(self.shared) };
    }
}

/// Cursor equality requires the same guarded allocation and the same index.
///
/// This is deliberately stricter than position-only comparison: two cursors
/// over different containers never compare equal, even when their indices
/// happen to match.
///
/// 游标相等要求同一个被守护分配和相同的索引。
/// 这比只比较位置更严格：指向不同容器的两个游标即使索引恰好相同也不相等。
impl<C: Sequence> PartialEq for Cursor<C> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.shared == other.shared && self.index == other.index
    }
}

impl<C: Sequence> Eq for Cursor<C> {}

impl<C: Sequence> fmt::Debug for Cursor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("epoch", &self.epoch)
            .finish()
    }
}

// SAFETY: the bookkeeping counters are atomic. Sending a cursor moves read
// access to the container body to another thread (C: Sync), and the receiving
// thread may turn out to hold the last share and drop the container there
// (C: Send). Concurrent structural mutation of the body is the caller's
// synchronization obligation, as for every handle in this crate.
unsafe impl<C: Sequence + Send + Sync> Send for Cursor<C> {}
// SAFETY: all &self operations either touch the atomic counters or read the
// container body (C: Sync).
unsafe impl<C: Sequence + Send + Sync> Sync for Cursor<C> {}

/// The boundary marker for traversal: "one past the last element", captured
/// when the marker was created.
///
/// An `EndBound` holds the end index and the identity of the container it was
/// taken from. It owns no reference-count share and is never dereferenced;
/// it exists only to be compared against a [`Cursor`].
///
/// Equality against a cursor requires both the position match *and* that both
/// sides refer to the same container instance, so a cursor into one container
/// never appears finished by another container's bound.
///
/// 遍历的边界标记：「末元素再往后一格」，在标记创建时捕获。
/// `EndBound` 持有末尾索引和它所来自容器的身份。它不占引用计数份额，
/// 也永远不会被解引用；它存在的唯一目的就是与 [`Cursor`] 比较。
/// 与游标的相等比较既要求位置一致，*也*要求两侧指向同一个容器实例，
/// 因此一个容器上的游标不会被另一个容器的边界误判为已完成。
pub struct EndBound<C: Sequence> {
    /// Identity only; never dereferenced.
    /// 仅作身份标识；永不解引用。
    target: *const Shared<C>,
    index: usize,
}

impl<C: Sequence> EndBound<C> {
    pub(crate) fn new(target: *const Shared<C>, index: usize) -> Self {
        EndBound { target, index }
    }

    /// The end index this bound captured at creation.
    /// 此边界在创建时捕获的末尾索引。
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<C: Sequence> Clone for EndBound<C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Sequence> Copy for EndBound<C> {}

impl<C: Sequence> PartialEq<EndBound<C>> for Cursor<C> {
    #[inline]
    fn eq(&self, other: &EndBound<C>) -> bool {
        self.index == other.index && std::ptr::eq(self.shared.as_ptr().cast_const(), other.target)
    }
}

impl<C: Sequence> PartialEq<Cursor<C>> for EndBound<C> {
    #[inline]
    fn eq(&self, other: &Cursor<C>) -> bool {
        other == self
    }
}

impl<C: Sequence> fmt::Debug for EndBound<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndBound").field("index", &self.index).finish()
    }
}

// SAFETY: an EndBound only ever compares its pointer for identity; it never
// dereferences it, so the container type imposes no constraint.
unsafe impl<C: Sequence> Send for EndBound<C> {}
unsafe impl<C: Sequence> Sync for EndBound<C> {}
