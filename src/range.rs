use crate::cursor::{Cursor, EndBound};
use crate::error::{RangeError, Result};
use crate::seq::{Contiguous, Sequence};
use crate::state::Shared;
use crate::view::RangeView;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// The owning wrapper around an epoch-guarded container.
///
/// `EpochRange` takes ownership of a container value and allocates the shared
/// control block guarding it (epoch 0, one reference — the wrapper's own).
/// It is the single entry point for handles: [`begin`](EpochRange::begin) /
/// [`end`](EpochRange::end) mint cursors, [`view`](EpochRange::view) mints
/// read-only views, and all of them transparently share this wrapper's
/// control block.
///
/// It is also the single doorway for mutation. Every structural mutation path
/// bumps the shared epoch, so every handle created earlier fails
/// [`RangeError::Invalidated`] on its next dereference:
/// - [`replace`](EpochRange::replace) bumps strictly *before* installing the
///   new contents;
/// - [`mutable_access`](EpochRange::mutable_access) bumps unconditionally,
///   because it cannot tell a read-only caller from a restructuring one;
/// - [`unchecked_mutable_access`](EpochRange::unchecked_mutable_access) is
///   the `unsafe` escape hatch that skips the bump on the caller's promise.
///
/// Dropping the wrapper bumps the epoch first (surviving handles fail
/// `Invalidated` rather than reading retired contents as fresh) and then
/// releases its reference; the container value itself lives until the last
/// handle releases.
///
/// **Safety Contract**: references obtained through cursors or views alias
/// the container's live storage. Callers must drop them before invoking any
/// mutation method here, and callers mutating from one thread while another
/// thread dereferences must bring their own synchronization — the epoch
/// machinery detects *stale* access, it does not arbitrate *concurrent*
/// access.
///
/// **Typical Usage**:
/// ```
/// use epoch_range::{EpochRange, RangeError};
///
/// let mut range = EpochRange::new(vec![1, 2, 3]);
///
/// let cursor = range.begin();
/// assert_eq!(cursor.get(), Ok(&1));
///
/// // Any mutable access invalidates the handles that predate it.
/// range.mutable_access().push(4);
/// assert_eq!(cursor.get(), Err(RangeError::Invalidated));
///
/// // Recovery is the caller's move: request a fresh cursor.
/// assert_eq!(range.begin().get(), Ok(&1));
/// ```
///
/// 拥有受纪元守护容器的包装器。
/// `EpochRange` 取得容器值的所有权，并分配守护它的共享控制块
/// （纪元 0，引用数 1 —— 包装器自己的份额）。它是句柄的唯一入口：
/// [`begin`](EpochRange::begin) / [`end`](EpochRange::end) 铸造游标，
/// [`view`](EpochRange::view) 铸造只读视图，它们全部透明地共享
/// 本包装器的控制块。
///
/// 它也是变更的唯一门户。每条结构性变更路径都会推进共享纪元，
/// 因此更早创建的每个句柄都会在下一次解引用时以
/// [`RangeError::Invalidated`] 失败：
/// - [`replace`](EpochRange::replace) 严格地在安装新内容*之前*推进；
/// - [`mutable_access`](EpochRange::mutable_access) 无条件推进，
///   因为它无法区分只读调用者和重构调用者；
/// - [`unchecked_mutable_access`](EpochRange::unchecked_mutable_access)
///   是 `unsafe` 逃生通道，凭调用者的承诺跳过推进。
///
/// drop 包装器时先推进纪元（幸存句柄以 `Invalidated` 失败，
/// 而不会把退役内容当作新鲜数据读取），再释放自己的引用；
/// 容器值本身存活到最后一个句柄释放为止。
///
/// **安全合约**：通过游标或视图获得的引用与容器的存活存储构成别名。
/// 调用者必须在调用这里的任何变更方法之前放弃它们；在一个线程变更、
/// 另一个线程解引用时，调用者必须自备同步 —— 纪元机制探测的是*过期*访问，
/// 不仲裁*并发*访问。
pub struct EpochRange<C: Sequence> {
    shared: NonNull<Shared<C>>,
    _marker: PhantomData<Shared<C>>,
}

impl<C: Sequence> EpochRange<C> {
    /// Take ownership of `container` and allocate its control block with
    /// refs = 1 and epoch = 0.
    /// 取得 `container` 的所有权，分配 refs = 1、epoch = 0 的控制块。
    pub fn new(container: C) -> Self {
        EpochRange {
            shared: Shared::allocate(container),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn shared(&self) -> &Shared<C> {
        // SAFETY: the wrapper's own share keeps the allocation alive for as
        // long as `self` does.
        unsafe { self.shared.as_ref() }
    }

    #[inline]
    fn container(&self) -> &C {
        // SAFETY: share held by `self`; exclusive access paths all run
        // through `&mut self` on this same wrapper.
        unsafe { self.shared().container() }
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

    /// A read-only view sharing this wrapper's control block.
    /// 共享本包装器控制块的只读视图。
    #[inline]
    pub fn view(&self) -> RangeView<C> {
        RangeView::new(self.shared)
    }

    /// Replace the owned contents.
    ///
    /// The epoch is bumped strictly before the new contents are installed:
    /// a dereference racing this call either completes against the old, still
    /// valid contents or observes the new epoch and fails — it can never see
    /// a half-updated container as fresh.
    ///
    /// 替换所拥有的内容。
    /// 纪元严格地在安装新内容之前推进：与此调用竞争的解引用要么在旧的、
    /// 仍然有效的内容上完成，要么观察到新纪元并失败 ——
    /// 绝不会把半更新的容器当作新鲜数据看到。
    pub fn replace(&mut self, new_contents: C) {
        self.shared().control.bump_epoch();
        // SAFETY: `&mut self` is the exclusive mutation right; callers uphold
        // the crate's aliasing contract for any outstanding element borrows.
        let slot = unsafe { self.shared().container_mut() };
        *slot = new_contents;
    }

    /// Mutable access to the owned container, invalidating all outstanding
    /// handles first.
    ///
    /// The bump is unconditional: this method cannot distinguish "caller will
    /// only read" from "caller will restructure", so every call is treated as
    /// potentially structural — even if the subsequent use turns out to be
    /// read-only.
    ///
    /// 对所拥有容器的可变访问，先使所有在外句柄失效。
    /// 推进是无条件的：此方法无法区分「调用者只会读」与「调用者会重构」，
    /// 因此每次调用都按可能的结构性变更对待 —— 即使随后的使用其实是只读的。
    pub fn mutable_access(&mut self) -> &mut C {
        self.shared().control.bump_epoch();
        // SAFETY: as in `replace`.
        unsafe { self.shared().container_mut() }
    }

    /// Mutable access *without* bumping the epoch.
    ///
    /// The escape hatch: outstanding handles stay valid exactly insofar as
    /// the caller's promise below holds.
    ///
    /// # Safety
    /// The caller must perform no structural change through the returned
    /// reference — no reallocation, no length change, no reordering — and
    /// must not mutate while any element reference obtained from a cursor or
    /// view is still being used.
    ///
    /// *不*推进纪元的可变访问。
    /// 逃生通道：在外句柄保持有效的程度，恰好等于下述承诺成立的程度。
    ///
    /// # Safety
    /// 调用者不得通过返回的引用做任何结构性变更 —— 不得重新分配、
    /// 不得改变长度、不得重排 —— 且在从游标或视图获得的元素引用仍在使用时
    /// 不得进行变更。
    pub unsafe fn unchecked_mutable_access(&mut self) -> &mut C {
        // SAFETY: as in `replace`; structural stability is the caller's
        // promise.
        unsafe { self.shared().container_mut() }
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
        self.shared().control.ref_count()
    }
}

impl<C: Contiguous> EpochRange<C> {
    /// The elements as one contiguous slice. Only containers with contiguous
    /// storage offer this.
    /// 以一个连续切片形式返回全部元素。仅具备连续存储的容器提供。
    #[inline]
    pub fn as_slice(&self) -> &[C::Item] {
        self.container().as_slice()
    }
}

impl<C: Sequence> From<C> for EpochRange<C> {
    #[inline]
    fn from(container: C) -> Self {
        EpochRange::new(container)
    }
}

impl<C: Sequence> Drop for EpochRange<C> {
    /// Bump the epoch so surviving handles fail `Invalidated` from here on,
    /// then release the wrapper's own reference.
    /// 先推进纪元，使幸存句柄从此以 `Invalidated` 失败，
    /// 再释放包装器自己的引用。
    fn drop(&mut self) {
        self.shared().control.bump_epoch();
        // SAFETY: releases exactly the share allocated in `new`.
        unsafe { Shared::release(self.shared) };
    }
}

impl<C: Sequence> fmt::Debug for EpochRange<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpochRange").field("len", &self.len()).finish()
    }
}

// SAFETY: same reasoning as for Cursor — atomic bookkeeping, the container
// moves with the wrapper (C: Send), and handles left behind read the body
// from other threads (C: Sync).
unsafe impl<C: Sequence + Send + Sync> Send for EpochRange<C> {}
unsafe impl<C: Sequence + Send + Sync> Sync for EpochRange<C> {}
