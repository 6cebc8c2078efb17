use crate::sync::{AtomicUsize, Ordering, fence};
use std::cell::UnsafeCell;
use std::ptr::NonNull;

/// The bookkeeping shared by every handle derived from one owning range.
///
/// Holds two lock-free counters:
/// - `epoch`: monotonically increasing, bumped on every structural mutation of
///   the owned container. Handles capture it at construction and compare on
///   dereference; a mismatch means the handle is stale.
/// - `refs`: the number of live acquirers (the owning range, every cursor,
///   every view). The acquirer that decrements it to zero frees the
///   allocation, exactly once.
///
/// Both counters are safe to touch concurrently from independent threads
/// holding independent handles. The container body itself is not protected
/// here.
///
/// 由同一个拥有型区间派生出的所有句柄共享的簿记。
/// 持有两个无锁计数器：
/// - `epoch`：单调递增，在被拥有容器的每次结构性变更时推进。
///   句柄在构造时捕获它并在解引用时比较；不一致即表示句柄已过期。
/// - `refs`：存活获取者的数量（拥有型区间、每个游标、每个视图）。
///   将其减到零的那个获取者负责释放整个分配，恰好一次。
///
/// 两个计数器都可以从持有独立句柄的不同线程并发访问。容器本体不受此处保护。
#[derive(Debug)]
pub(crate) struct ControlBlock {
    epoch: AtomicUsize,
    refs: AtomicUsize,
}

impl ControlBlock {
    /// A fresh block: epoch 0, one reference (the owner's own share).
    /// 新建的块：纪元为 0，引用数为 1（拥有者自己的份额）。
    fn new() -> Self {
        ControlBlock {
            epoch: AtomicUsize::new(0),
            refs: AtomicUsize::new(1),
        }
    }

    /// The current epoch.
    ///
    /// Acquire pairing with [`bump_epoch`](ControlBlock::bump_epoch): a handle
    /// that observes the new epoch also observes every write sequenced before
    /// the bump.
    ///
    /// 当前纪元。
    /// 与 [`bump_epoch`](ControlBlock::bump_epoch) 构成 Acquire 配对：
    /// 观察到新纪元的句柄也能观察到推进之前的所有写入。
    #[inline]
    pub(crate) fn epoch(&self) -> usize {
        self.epoch.load(Ordering::Acquire)
    }

    /// Advance the epoch by one.
    ///
    /// Has no immediate effect on existing handles; each one notices the
    /// change at its next dereference.
    ///
    /// 将纪元推进一。
    /// 对已有句柄没有立即影响；每个句柄会在下一次解引用时察觉变化。
    #[inline]
    pub(crate) fn bump_epoch(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Record one more live acquirer. Always succeeds.
    /// 记录一个新的存活获取者。总是成功。
    #[inline]
    pub(crate) fn acquire(&self) {
        self.refs.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop one acquirer. Returns `true` exactly once: for the caller that
    /// observed the count reach zero and therefore owns deallocation.
    ///
    /// Release on the decrement plus an Acquire fence before handing back
    /// ownership, so every handle's final use happens-before the free.
    ///
    /// 释放一个获取者。恰好返回一次 `true`：给观察到计数归零、
    /// 因而拥有释放责任的那个调用者。
    /// 递减使用 Release，归零后在移交所有权之前配合一个 Acquire 栅栏，
    /// 使每个句柄的最后一次使用都 happens-before 释放。
    #[inline]
    pub(crate) fn release(&self) -> bool {
        if self.refs.fetch_sub(1, Ordering::Release) != 1 {
            return false;
        }
        fence(Ordering::Acquire);
        true
    }

    /// The number of live acquirers, for tests.
    /// 存活获取者的数量，供测试使用。
    #[cfg(test)]
    pub(crate) fn ref_count(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }
}

/// The single heap allocation behind one owning range: the control block plus
/// the container value it guards.
///
/// Keeping the container inside the refcounted allocation means a surviving
/// handle can never observe freed container storage: the value is dropped
/// together with the block, when the last acquirer releases. The owning range
/// alone holds the right to reach `container` mutably.
///
/// 一个拥有型区间背后的唯一堆分配：控制块加上它守护的容器值。
/// 把容器放进这块引用计数的分配意味着存活的句柄永远不会看到已释放的容器存储：
/// 容器值与块一起，在最后一个获取者释放时被丢弃。
/// 只有拥有型区间持有可变访问 `container` 的权利。
pub(crate) struct Shared<C> {
    pub(crate) control: ControlBlock,
    container: UnsafeCell<C>,
}

impl<C> Shared<C> {
    /// Move `container` into a fresh allocation with refs = 1, epoch = 0.
    /// 将 `container` 移入一块新分配，refs = 1，epoch = 0。
    pub(crate) fn allocate(container: C) -> NonNull<Shared<C>> {
        let boxed = Box::new(Shared {
            control: ControlBlock::new(),
            container: UnsafeCell::new(container),
        });
        NonNull::from(Box::leak(boxed))
    }

    /// Release one acquirer's share of the allocation at `ptr`, freeing it
    /// (and dropping the container) when this was the last share.
    ///
    /// # Safety
    /// `ptr` must come from [`Shared::allocate`], and the caller must hold one
    /// of the shares counted in `refs`. After this call the caller's share is
    /// gone and `ptr` must not be used again through it.
    ///
    /// 释放 `ptr` 处分配的一个获取者份额；若这是最后一个份额，
    /// 则释放分配（并丢弃容器）。
    ///
    /// # Safety
    /// `ptr` 必须来自 [`Shared::allocate`]，且调用者必须持有 `refs`
    /// 计入的份额之一。此调用之后该份额即告失效，不得再通过它使用 `ptr`。
    pub(crate) unsafe fn release(ptr: NonNull<Shared<C>>) {
        // SAFETY: the caller's share keeps the allocation alive across the
        // decrement; `release` returning true transfers sole ownership here.
        if unsafe { ptr.as_ref() }.control.release() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
    }

    /// Shared access to the guarded container.
    ///
    /// # Safety
    /// The caller must hold a live share of this allocation, and no mutable
    /// access obtained via [`container_mut`](Shared::container_mut) may
    /// overlap the returned borrow.
    ///
    /// 对被守护容器的共享访问。
    ///
    /// # Safety
    /// 调用者必须持有本分配的存活份额，且通过
    /// [`container_mut`](Shared::container_mut) 获得的可变访问
    /// 不得与返回的借用重叠。
    #[inline]
    pub(crate) unsafe fn container(&self) -> &C {
        unsafe { &*self.container.get() }
    }

    /// Exclusive access to the guarded container.
    ///
    /// # Safety
    /// Reserved to the owning range, which holds the sole mutation right; the
    /// returned borrow must not overlap any other access to the container.
    ///
    /// 对被守护容器的独占访问。
    ///
    /// # Safety
    /// 仅保留给持有唯一变更权的拥有型区间；返回的借用不得与对容器的
    /// 任何其他访问重叠。
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn container_mut(&self) -> &mut C {
        unsafe { &mut *self.container.get() }
    }
}
