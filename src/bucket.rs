use core::fmt::{self, Debug};
use core::mem;

use crate::alloc;
use crate::error::{AllocError, OnError};

/// A live key-value pair: the owned key bytes, the owned value, and the
/// seeded digest the key was bucketed with.
pub struct Entry<V> {
    pub(crate) digest: u32,
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
}

impl<V> Entry<V> {
    #[inline(always)]
    pub(crate) const fn new(digest: u32, key: Box<[u8]>, value: V) -> Self {
        Self { digest, key, value }
    }

    /// Returns the digest the key was bucketed with.
    #[inline(always)]
    pub const fn digest(&self) -> u32 {
        self.digest
    }

    /// Returns the key bytes.
    #[inline(always)]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Returns a reference to the value.
    #[inline(always)]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Digest comparison first, exact byte comparison second. Colliding
    /// digests are tolerated, never trusted.
    #[inline(always)]
    pub(crate) fn matches(&self, digest: u32, key: &[u8]) -> bool {
        self.digest == digest && *self.key == *key
    }

    #[inline(always)]
    pub(crate) fn into_value(self) -> V {
        self.value
    }

    #[inline(always)]
    pub(crate) fn into_pair(self) -> (Box<[u8]>, V) {
        (self.key, self.value)
    }
}

impl<V> Debug for Entry<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("digest", &self.digest)
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// One link of a bucket's overflow chain.
pub(crate) struct Node<V> {
    pub(crate) entry: Entry<V>,
    pub(crate) next: Option<Box<Node<V>>>,
}

/// One slot of the bucket array.
///
/// The first entry of a bucket lives inline in the array; colliding entries
/// overflow into a heap-allocated chain linked most-recent-first. Both fields
/// `None` is the empty sentinel.
///
/// Invariant (between table operations): `chain` is `None` whenever `head`
/// is `None`.
pub(crate) struct Bucket<V> {
    pub(crate) head: Option<Entry<V>>,
    pub(crate) chain: Option<Box<Node<V>>>,
}

impl<V> Bucket<V> {
    #[inline(always)]
    pub(crate) const fn empty() -> Self {
        Self {
            head: None,
            chain: None,
        }
    }

    /// Finds the entry matching `(digest, key)`, scanning the inline slot
    /// first and then the chain. First match wins.
    pub(crate) fn find(&self, digest: u32, key: &[u8]) -> Option<&Entry<V>> {
        let head = self.head.as_ref()?;

        if head.matches(digest, key) {
            return Some(head);
        }

        let mut cur = self.chain.as_deref();
        while let Some(node) = cur {
            if node.entry.matches(digest, key) {
                return Some(&node.entry);
            }
            cur = node.next.as_deref();
        }

        None
    }

    /// Mutable counterpart of [`Bucket::find`].
    pub(crate) fn find_mut(&mut self, digest: u32, key: &[u8]) -> Option<&mut Entry<V>> {
        if self.head.as_ref()?.matches(digest, key) {
            return self.head.as_mut();
        }

        let mut cur = self.chain.as_deref_mut();
        while let Some(node) = cur {
            if node.entry.matches(digest, key) {
                return Some(&mut node.entry);
            }
            cur = node.next.as_deref_mut();
        }

        None
    }

    /// Inserts `entry`, overwriting a matching key in place.
    ///
    /// Returns the displaced entry when the key was already present, `None`
    /// when the entry occupied the inline slot or a new chain node. A chain
    /// node allocation failure hands the entry back with the error so the
    /// caller decides whether it is dropped or forgotten.
    pub(crate) fn insert(
        &mut self,
        entry: Entry<V>,
        on_err: OnError,
    ) -> Result<Option<Entry<V>>, (Entry<V>, AllocError)> {
        let Some(head) = self.head.as_mut() else {
            self.head = Some(entry);
            return Ok(None);
        };

        if head.matches(entry.digest, &entry.key) {
            return Ok(Some(mem::replace(head, entry)));
        }

        let mut cur = self.chain.as_deref_mut();
        while let Some(node) = cur {
            if node.entry.matches(entry.digest, &entry.key) {
                return Ok(Some(mem::replace(&mut node.entry, entry)));
            }
            cur = node.next.as_deref_mut();
        }

        // New colliding key: link at the head of the chain.
        let node = Node {
            entry,
            next: self.chain.take(),
        };

        match alloc::boxed(node, on_err) {
            Ok(node) => {
                self.chain = Some(node);
                Ok(None)
            }
            Err((node, err)) => {
                let Node { entry, next } = node;
                self.chain = next;
                Err((entry, err))
            }
        }
    }

    /// Removes and returns the entry matching `(digest, key)`.
    ///
    /// Removing the inline entry promotes the chain head into the inline
    /// slot; removing a chain node splices it out of the chain; removing the
    /// last entry resets the slot to the empty sentinel.
    pub(crate) fn remove(&mut self, digest: u32, key: &[u8]) -> Option<Entry<V>> {
        if self.head.as_ref()?.matches(digest, key) {
            let removed = self.head.take();
            if let Some(node) = self.chain.take() {
                let Node { entry, next } = *node;
                self.head = Some(entry);
                self.chain = next;
            }
            return removed;
        }

        let mut cur = &mut self.chain;
        loop {
            let hit = match cur {
                Some(node) => node.entry.matches(digest, key),
                None => return None,
            };

            if hit {
                let node = cur.take()?;
                let Node { entry, next } = *node;
                *cur = next;
                return Some(entry);
            }

            match cur {
                Some(node) => cur = &mut node.next,
                None => return None,
            }
        }
    }

    /// Drops every entry and chain node, resetting the slot to the empty
    /// sentinel. Chain links are detached one at a time to keep teardown off
    /// the call stack.
    pub(crate) fn clear(&mut self) {
        self.head = None;

        let mut node = self.chain.take();
        while let Some(mut boxed) = node {
            node = boxed.next.take();
        }
    }

    /// Frees every chain node and resets the slot to the empty sentinel
    /// *without* dropping the entries.
    ///
    /// This is the disposal-disabled teardown used on bucket arrays whose
    /// entries are bitwise duplicates owned by another array.
    pub(crate) fn forget_entries(&mut self) {
        if let Some(entry) = self.head.take() {
            mem::forget(entry);
        }

        let mut node = self.chain.take();
        while let Some(boxed) = node {
            let Node { entry, next } = *boxed;
            mem::forget(entry);
            node = next;
        }
    }
}
