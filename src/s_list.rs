//! A singly linked list guarded by a single reader/writer lock

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use core::fmt;

use crate::Error;

/// A node of a `LinkedList`.
///
/// Nodes can only be reached through a [`HeadRef`], so the list stays
/// read-locked for as long as any node is borrowed.
pub struct Node<T> {
    content: T,
    next: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(content: T, next: Option<Box<Node<T>>>) -> Box<Self> {
        Box::new(Node { content, next })
    }

    /// Returns the element stored in this node.
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Returns the following node, or None if this is the last one.
    pub fn next(&self) -> Option<&Node<T>> {
        self.next.as_deref()
    }

    /// Returns an iterator over the elements from this node to the end of the chain.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { curr: Some(self) }
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

/// Read-locked view of the first node of a `LinkedList`.
///
/// Writers are blocked until the guard is dropped.
pub type HeadRef<'a, T> = MappedRwLockReadGuard<'a, Node<T>>;

/// An iterator over the elements of a chain of nodes.
///
/// This `struct` is created by [`Node::iter()`]. It borrows from a
/// [`HeadRef`] and therefore never outlives the read lock.
pub struct Iter<'a, T: 'a> {
    curr: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.curr.map(|node| {
            self.curr = node.next();
            &node.content
        })
    }
}

// everything behind the lock
struct Chain<T> {
    head: Option<Box<Node<T>>>,
    // always the number of nodes reachable from head
    size: usize,
}

impl<T> Chain<T> {
    const fn new() -> Self {
        Self {
            head: None,
            size: 0,
        }
    }

    fn iter(&self) -> Iter<'_, T> {
        Iter {
            curr: self.head.as_deref(),
        }
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        let mut node = self.head.as_deref_mut()?;
        for _ in 0..index {
            node = node.next.as_deref_mut()?;
        }
        Some(node)
    }

    /// the link that owns the node at `index`, caller guarantees `index <= size`
    ///
    /// `size` is never out of sync with the chain, so the walk can't come up short
    fn link_mut(&mut self, index: usize) -> &mut Option<Box<Node<T>>> {
        if index == 0 {
            &mut self.head
        } else {
            match self.node_mut(index - 1) {
                Some(prev) => &mut prev.next,
                None => unreachable!("list size out of sync with its chain"),
            }
        }
    }

    fn link(&mut self, index: usize, content: T) {
        let link = self.link_mut(index);
        let next = link.take();
        *link = Some(Node::new(content, next));
        self.size += 1;
    }

    /// caller guarantees `index < size`
    fn unlink(&mut self, index: usize) -> T {
        let link = self.link_mut(index);
        let Some(removed) = link.take() else {
            unreachable!("list size out of sync with its chain");
        };
        let Node { content, next } = *removed;
        *link = next;
        self.size -= 1;
        content
    }
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        // unlink one node at a time so long chains don't recurse
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

/// Concurrent singly linked list
///
/// Every mutation takes the write lock for its whole duration, every query
/// takes the read lock, so readers never see a half spliced chain.
///
/// Read paths use `read_recursive`, so a thread holding a [`HeadRef`] can keep
/// querying the list even while a writer is waiting for the lock.
pub struct LinkedList<T> {
    inner: RwLock<Chain<T>>,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedList<T> {
    /// Creates a new, empty `LinkedList`.
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(Chain::new()),
        }
    }

    /// Appends an element to the back of the list.
    pub fn append(&self, value: T) {
        let mut chain = self.inner.write();
        let size = chain.size;
        chain.link(size, value);
        log::trace!("appended element, list size is now {}", chain.size);
    }

    /// Inserts an element at position `index`, shifting later elements back.
    ///
    /// `index` may equal the current size, which appends.
    pub fn insert(&self, index: usize, value: T) -> Result<(), Error> {
        let mut chain = self.inner.write();
        if index > chain.size {
            log::debug!("rejected insert at {} into list of size {}", index, chain.size);
            return Err(Error::OutOfBounds {
                index,
                size: chain.size,
            });
        }
        chain.link(index, value);
        log::trace!("inserted element at {}, list size is now {}", index, chain.size);
        Ok(())
    }

    /// Removes the element at position `index` and returns it.
    pub fn remove_at(&self, index: usize) -> Result<T, Error> {
        let mut chain = self.inner.write();
        if index >= chain.size {
            log::debug!("rejected remove at {} from list of size {}", index, chain.size);
            return Err(Error::OutOfBounds {
                index,
                size: chain.size,
            });
        }
        let value = chain.unlink(index);
        log::trace!("removed element at {}, list size is now {}", index, chain.size);
        Ok(value)
    }

    /// Returns the position of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.inner
            .read_recursive()
            .iter()
            .position(|content| content == value)
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read_recursive().head.is_none()
    }

    /// Counts the elements by walking the whole chain.
    ///
    /// This is O(n); [`len`](Self::len) returns the same value from the
    /// maintained counter.
    pub fn size(&self) -> usize {
        let chain = self.inner.read_recursive();
        let size = chain.iter().count();
        debug_assert_eq!(size, chain.size);
        size
    }

    /// Returns the number of elements in the list.
    pub fn len(&self) -> usize {
        self.inner.read_recursive().size
    }

    /// Returns a read-locked view of the first node, or None if the list is empty.
    ///
    /// The list cannot be modified while the returned guard is alive, so
    /// don't hold on to it from a thread that is about to mutate the list.
    /// Queries on the same thread are fine: every read path takes the lock
    /// recursively and doesn't queue behind a waiting writer.
    pub fn head(&self) -> Option<HeadRef<'_, T>> {
        let chain = self.inner.read_recursive();
        RwLockReadGuard::try_map(chain, |chain| chain.head.as_deref()).ok()
    }

    /// Copies the elements of the list, in order, under a single read lock.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.read_recursive().iter().cloned().collect()
    }

    /// Prints the elements separated by spaces to stdout.
    pub fn print(&self)
    where
        T: fmt::Display,
    {
        println!("{}", self);
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let chain = self.inner.get_mut();
        let mut added = 0;
        let mut tail = chain.link_mut(chain.size);
        for value in iter {
            tail = &mut tail.insert(Node::new(value, None)).next;
            added += 1;
        }
        chain.size += added;
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T: fmt::Display> fmt::Display for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = self.inner.read_recursive();
        let mut iter = chain.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for content in iter {
                write!(f, " {}", content)?;
            }
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.read_recursive().iter()).finish()
    }
}
