use std::collections::VecDeque;

/// Read access to a finite, index-addressable sequence of elements.
///
/// This is the capability a container must offer for cursors and views to
/// traverse it. Positions are plain indices, so length queries and
/// random-access movement come with the base capability; the container's own
/// storage layout stays opaque.
///
/// The container is treated as an opaque value: this trait never mutates it,
/// and the crate never assumes anything about its element layout beyond what
/// [`item_at`](Sequence::item_at) returns.
///
/// 对有限的、可按索引寻址的元素序列的读取能力。
/// 这是容器为游标和视图提供遍历所需的能力。位置就是普通索引，
/// 因此长度查询和随机访问移动随基础能力一起提供；容器自身的存储布局保持不透明。
pub trait Sequence {
    /// The element type stored in the container.
    /// 容器中存储的元素类型。
    type Item;

    /// Number of elements currently in the container.
    /// 容器当前的元素数量。
    fn len(&self) -> usize;

    /// Whether the container currently holds no elements.
    /// 容器当前是否不包含任何元素。
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A reference to the element at `index`, or `None` when `index >= len()`.
    /// `index` 处元素的引用；当 `index >= len()` 时为 `None`。
    fn item_at(&self, index: usize) -> Option<&Self::Item>;
}

/// A [`Sequence`] whose elements occupy one contiguous region of memory.
///
/// Gates raw-storage access at compile time: containers without contiguous
/// storage (for example `VecDeque`) simply do not offer `as_slice`, instead of
/// rejecting the call at runtime.
///
/// 元素占据一段连续内存的 [`Sequence`]。
/// 在编译期约束原始存储访问：不具备连续存储的容器（例如 `VecDeque`）
/// 根本不提供 `as_slice`，而不是在运行时拒绝调用。
pub trait Contiguous: Sequence {
    /// The elements as one contiguous slice.
    /// 以一个连续切片形式返回全部元素。
    fn as_slice(&self) -> &[Self::Item];
}

impl<T> Sequence for Vec<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn item_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> Contiguous for Vec<T> {
    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

// VecDeque is index-addressable but its ring buffer may wrap, so it stays
// non-Contiguous.
impl<T> Sequence for VecDeque<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn item_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> Sequence for Box<[T]> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn item_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> Contiguous for Box<[T]> {
    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> Sequence for [T; N] {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn item_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T, const N: usize> Contiguous for [T; N] {
    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}
