//! Epoch-checked containers, cursors and views.
//!
//! Ordinary iteration becomes unsafe the moment the underlying container is
//! structurally changed while an iterator still references it. This crate
//! replaces that risk with explicit, checked failure: every handle carries
//! enough bookkeeping to detect "the container has moved on since I was
//! created" and refuses to return data in that case, surfacing a
//! distinguishable [`RangeError`] instead.
//!
//! The pieces:
//! - [`EpochRange`] owns a container and the shared control block guarding it
//!   (a lock-free epoch counter plus a reference count);
//! - [`Cursor`] is a checked position handle that captures the epoch at
//!   construction and re-checks it on every dereference;
//! - [`EndBound`] marks the end of traversal and is only ever compared, never
//!   dereferenced;
//! - [`RangeView`] is a read-only handle sharing the owner's control block;
//! - [`Sequence`] / [`Contiguous`] are the capability traits a container
//!   implements to be guarded (index addressing, and optionally raw-slice
//!   access).
//!
//! Every structural mutation path on the owner bumps the shared epoch, and
//! every handle created before that point fails cleanly with
//! [`RangeError::Invalidated`] on its next use:
//!
//! ```
//! use epoch_range::{EpochRange, RangeError};
//!
//! let mut range = EpochRange::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
//!
//! // Ordered traversal, then a clean failure instead of walking off the end.
//! let mut cursor = range.begin();
//! let bound = range.end_bound();
//! let mut seen = Vec::new();
//! while cursor != bound {
//!     seen.push(*cursor.get()?);
//!     cursor.advance()?;
//! }
//! assert_eq!(seen, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! assert_eq!(cursor.advance(), Err(RangeError::OutOfRange));
//!
//! // Structural mutation invalidates the handles that predate it, even when
//! // the element they pointed at is untouched.
//! let stale = range.begin();
//! range.mutable_access().resize(1000, 0);
//! assert_eq!(stale.get(), Err(RangeError::Invalidated));
//!
//! // A fresh cursor sees the new contents.
//! assert_eq!(range.begin().get(), Ok(&1));
//! # Ok::<(), RangeError>(())
//! ```
//!
//! **Safety Contract**: the bookkeeping counters are atomic and safe to touch
//! from independent threads holding independent handles, but the container
//! body has no built-in concurrency protection — mutating it from one thread
//! while another dereferences is the caller's synchronization problem. The
//! epoch machinery detects *stale* access; it does not arbitrate *concurrent*
//! access. Likewise, element references returned by cursors alias live
//! storage and must be released before any mutation call.
//!
//! 受纪元检查的容器、游标与视图。
//! 底层容器一旦在迭代器仍引用它时发生结构性变更，普通迭代就不再安全。
//! 本 crate 用显式的、受检的失败取代这种风险：每个句柄都携带足够的簿记
//! 来发现「容器在我创建之后已经前进了」，并在这种情况下拒绝返回数据，
//! 以可区分的 [`RangeError`] 报告。
//!
//! 纪元计数器与引用计数是原子的，可以从持有独立句柄的不同线程安全访问；
//! 容器本体没有内建并发保护 —— 一个线程变更、另一个线程解引用时，
//! 同步是调用者的义务。纪元机制探测*过期*访问，不仲裁*并发*访问。

mod cursor;
mod error;
mod range;
mod seq;
mod state;
mod sync;
mod view;

pub use cursor::{Cursor, EndBound};
pub use error::{RangeError, Result};
pub use range::EpochRange;
pub use seq::{Contiguous, Sequence};
pub use view::RangeView;

#[cfg(all(test, not(feature = "loom")))]
mod tests;
