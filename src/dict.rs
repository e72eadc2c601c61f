use core::fmt::{self, Debug};
use core::hint::unreachable_unchecked;
use core::mem;
use core::ptr;

use crate::alloc::{self, RawArray};
use crate::bucket::{Bucket, Entry, Node};
use crate::digest::digest;
use crate::error::{AllocError, OnError};
use crate::opt::Defer;

/// Owns the bucket array and its capacity.
///
/// All `cap` slots are initialized from construction onward; operations
/// replace slot contents but never leave a slot uninitialized. Drop clears
/// every slot and frees the array, so teardown of a table is `clear`
/// followed by deallocation.
struct Slots<V> {
    array: RawArray<Bucket<V>>,
    cap: usize,
}

impl<V> Slots<V> {
    /// Allocates `cap` buckets, all set to the empty sentinel.
    ///
    /// Error handling depends on the error handling context `on_err`. On
    /// failure nothing stays allocated.
    fn new_allocate(cap: usize, on_err: OnError) -> Result<Self, AllocError> {
        let mut array = RawArray::allocate(cap, on_err)?;

        unsafe {
            for i in 0..cap {
                array.store(i, Bucket::empty());
            }
        }

        Ok(Slots { array, cap })
    }

    #[inline(always)]
    fn buckets(&self) -> &[Bucket<V>] {
        // SAFETY: all `cap` slots are initialized (type invariant).
        unsafe { self.array.as_slice(self.cap) }
    }

    #[inline(always)]
    fn buckets_mut(&mut self) -> &mut [Bucket<V>] {
        // SAFETY: all `cap` slots are initialized (type invariant).
        unsafe { self.array.as_slice_mut(self.cap) }
    }

    /// Bucket offset of a digest: `digest mod capacity`.
    #[inline(always)]
    fn bucket_index(&self, digest: u32) -> usize {
        digest as usize % self.cap
    }

    /// Disposal-disabled teardown: resets every slot and frees the chain
    /// nodes while forgetting the entries themselves.
    ///
    /// Called on arrays whose entries are bitwise duplicates owned by
    /// another array, so that the subsequent drop frees structural memory
    /// only.
    fn forget_entries(&mut self) {
        for bucket in self.buckets_mut() {
            bucket.forget_entries();
        }
    }
}

impl<V> Drop for Slots<V> {
    fn drop(&mut self) {
        for bucket in self.buckets_mut() {
            bucket.clear();
        }
        // SAFETY: all slots were just reset to the empty sentinel.
        unsafe { self.array.deallocate(self.cap) };
    }
}

/// A hash table keyed by byte strings, bucketed by a seeded 32-bit digest.
///
/// The bucket count (capacity) is chosen by the caller at construction and
/// changed only by [`Dict::resize`]; the table never grows on its own. Each
/// bucket stores its first entry inline and chains colliding entries through
/// heap nodes, most recent first.
///
/// Keys are copied into the table; values are owned by the table and dropped
/// whenever it destroys an entry (overwrite, delete, clear, drop).
///
/// # Examples
///
/// ```
/// use bytedict::Dict;
///
/// let mut dict = Dict::new(0xdead_beef, 64);
///
/// dict.set(b"one", 1);
/// dict.set(b"two", 2);
///
/// assert_eq!(dict.get(b"one"), Some(&1));
/// assert_eq!(dict.len(), 2);
///
/// dict.del(b"one");
///
/// assert!(!dict.contains(b"one"));
/// ```
pub struct Dict<V> {
    slots: Slots<V>,
    used: usize,
    seed: u32,
}

// Core implementation
impl<V> Dict<V> {
    const DEFAULT_CAPACITY: usize = 16;

    fn new_impl(seed: u32, capacity: usize, on_err: OnError) -> Result<Self, AllocError> {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Ok(Dict {
            slots: Slots::new_allocate(capacity, on_err)?,
            used: 0,
            seed,
        })
    }

    /// Creates a new `Dict` with `capacity` buckets, hashing keys with
    /// `seed`.
    ///
    /// # Panics
    ///
    /// This function will panic if `capacity` is zero, if capacity overflow
    /// occurs, or when allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let dict: Dict<i32> = Dict::new(0xdead_beef, 512);
    ///
    /// assert_eq!(dict.len(), 0);
    /// assert_eq!(dict.capacity(), 512);
    /// assert_eq!(dict.seed(), 0xdead_beef);
    /// ```
    #[must_use]
    #[inline]
    pub fn new(seed: u32, capacity: usize) -> Self {
        match Self::new_impl(seed, capacity, OnError::NoReturn) {
            Ok(dict) => dict,
            // Hints the compiler that the error branch can be eliminated from the call chain.
            Err(_) => unsafe { unreachable_unchecked() },
        }
    }

    /// Creates a new `Dict`, returning an error instead of panicking when
    /// the bucket array cannot be allocated.
    ///
    /// # Panics
    ///
    /// This function will panic if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::{AllocError, Dict};
    ///
    /// let dict = Dict::<i32>::try_new(0xdead_beef, 512);
    /// assert!(dict.is_ok());
    ///
    /// let result = Dict::<i32>::try_new(0xdead_beef, usize::MAX);
    /// assert!(matches!(result, Err(AllocError::Overflow)));
    /// ```
    #[inline]
    pub fn try_new(seed: u32, capacity: usize) -> Result<Self, AllocError> {
        Self::new_impl(seed, capacity, OnError::ReturnErr)
    }

    /// Returns the number of entries in the `Dict`.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.used
    }

    /// Checks if the `Dict` is empty.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Returns the number of buckets. Fixed between calls to
    /// [`Dict::resize`] and never zero.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.slots.cap
    }

    /// Returns the digest seed. Fixed at construction and carried across
    /// resize and clone.
    #[inline(always)]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the ratio of entries to buckets.
    ///
    /// The table never acts on this value; choosing when and how far to
    /// [`Dict::resize`] is the caller's policy.
    #[inline(always)]
    pub fn load_factor(&self) -> f64 {
        self.used as f64 / self.slots.cap as f64
    }

    /// Finds the entry of `key`, if present.
    fn find(&self, key: &[u8]) -> Option<&Entry<V>> {
        let digest = digest(self.seed, key);
        self.slots.buckets()[self.slots.bucket_index(digest)].find(digest, key)
    }

    fn set_impl(&mut self, key: &[u8], value: V, on_err: OnError) -> Result<Option<V>, AllocError> {
        let digest = digest(self.seed, key);
        let idx = self.slots.bucket_index(digest);

        // A failed key copy drops `value` right here; ownership never stays
        // with the caller once `set` is entered.
        let key = alloc::boxed_bytes(key, on_err)?;

        match self.slots.buckets_mut()[idx].insert(Entry::new(digest, key, value), on_err) {
            Ok(Some(old)) => Ok(Some(old.into_value())),
            Ok(None) => {
                self.used += 1;
                Ok(None)
            }
            // Ownership transferred on the call, so a failed chain insert
            // releases the pair instead of leaking it.
            Err((entry, err)) => {
                drop(entry);
                Err(err)
            }
        }
    }

    /// Inserts `value` under `key`, copying the key bytes into the table.
    ///
    /// If the key was already present, its value is replaced and the old
    /// value is returned; the entry count is unchanged. Otherwise the entry
    /// occupies its bucket's inline slot, or a new chain node when the
    /// bucket is taken.
    ///
    /// # Panics
    ///
    /// This method will panic when allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// assert_eq!(dict.set(b"one", 1), None);
    /// assert_eq!(dict.set(b"one", 2), Some(1));
    ///
    /// assert_eq!(dict.get(b"one"), Some(&2));
    /// assert_eq!(dict.len(), 1);
    /// ```
    #[inline]
    pub fn set(&mut self, key: &[u8], value: V) -> Option<V> {
        match self.set_impl(key, value, OnError::NoReturn) {
            Ok(old) => old,
            Err(_) => unsafe { unreachable_unchecked() },
        }
    }

    /// Inserts `value` under `key`, returning an error instead of panicking
    /// when allocation fails.
    ///
    /// Ownership of `value` transfers unconditionally: on allocation failure
    /// the value (and the partial key copy) are dropped before the error is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// assert!(dict.try_set(b"one", 1).is_ok());
    /// ```
    #[inline]
    pub fn try_set(&mut self, key: &[u8], value: V) -> Result<Option<V>, AllocError> {
        self.set_impl(key, value, OnError::ReturnErr)
    }

    /// Retrieves a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    ///
    /// assert_eq!(dict.get(b"one"), Some(&1));
    /// assert_eq!(dict.get(b"two"), None);
    /// ```
    #[must_use]
    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.find(key).map(|entry| &entry.value)
    }

    /// Retrieves a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    ///
    /// if let Some(value) = dict.get_mut(b"one") {
    ///     *value = 10;
    /// }
    ///
    /// assert_eq!(dict.get(b"one"), Some(&10));
    /// ```
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let digest = digest(self.seed, key);
        let idx = self.slots.bucket_index(digest);
        self.slots.buckets_mut()[idx]
            .find_mut(digest, key)
            .map(|entry| &mut entry.value)
    }

    /// Retrieves the full entry stored under `key`, exposing its digest,
    /// key bytes and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    ///
    /// let entry = dict.get_entry(b"one").unwrap();
    ///
    /// assert_eq!(entry.key(), b"one");
    /// assert_eq!(entry.value(), &1);
    /// ```
    #[must_use]
    #[inline]
    pub fn get_entry(&self, key: &[u8]) -> Option<&Entry<V>> {
        self.find(key)
    }

    /// Returns `true` if the table contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    ///
    /// assert!(dict.contains(b"one"));
    /// assert!(!dict.contains(b"two"));
    /// ```
    #[must_use]
    #[inline]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry stored under `key` and returns its value.
    ///
    /// When the removed entry occupied its bucket's inline slot, the chain
    /// head (the most recently inserted colliding key) is promoted into the
    /// slot. A miss returns `None` and changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    ///
    /// assert_eq!(dict.del(b"one"), Some(1));
    /// assert_eq!(dict.del(b"one"), None);
    /// assert_eq!(dict.len(), 0);
    /// ```
    #[inline]
    pub fn del(&mut self, key: &[u8]) -> Option<V> {
        let digest = digest(self.seed, key);
        let idx = self.slots.bucket_index(digest);
        let entry = self.slots.buckets_mut()[idx].remove(digest, key)?;

        self.used -= 1;
        Some(entry.into_value())
    }

    /// Clears the table, dropping all keys and values and resetting every
    /// bucket to the empty sentinel. The capacity remains unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    /// dict.set(b"two", 2);
    ///
    /// dict.clear();
    ///
    /// assert_eq!(dict.len(), 0);
    /// assert!(!dict.contains(b"one"));
    /// assert_eq!(dict.capacity(), 64);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }

        for bucket in self.slots.buckets_mut() {
            bucket.clear();
        }

        self.used = 0;
    }

    fn resize_impl(&mut self, capacity: usize, on_err: OnError) -> Result<(), AllocError> {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let transient = Slots::new_allocate(capacity, on_err)?;

        // The transient holds bitwise duplicates until the swap commits;
        // exactly one of the two arrays may ever drop an entry, and the
        // guard side never does.
        let mut guard = Defer::activate(transient, Slots::forget_entries);

        for entry in self.iter() {
            // The original keeps ownership of the duplicated entry until
            // the swap below.
            let dup = unsafe { ptr::read(entry) };
            let idx = guard.arg.bucket_index(dup.digest());

            match guard.arg.buckets_mut()[idx].insert(dup, on_err) {
                Ok(None) => {}
                Ok(Some(shadowed)) => {
                    mem::forget(shadowed);
                    debug_assert!(false, "Logic error: duplicate key during migration");
                }
                Err((dup, err)) => {
                    mem::forget(dup);
                    return Err(err);
                }
            }
        }

        let mut retired = guard.release();
        mem::swap(&mut self.slots, &mut retired);

        // The retired array's entries live on in the swapped-in buckets.
        retired.forget_entries();
        Ok(())
    }

    /// Changes the number of buckets to `capacity`, re-bucketing every entry
    /// by its stored digest.
    ///
    /// The table's identity and entry set are unchanged; only the bucket
    /// array is replaced. Shrinking below the entry count is valid and
    /// simply lengthens the collision chains.
    ///
    /// # Panics
    ///
    /// This method will panic if `capacity` is zero, if capacity overflow
    /// occurs, or when allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 512);
    ///
    /// dict.set(b"one", 1);
    /// dict.set(b"two", 2);
    ///
    /// dict.resize(4);
    ///
    /// assert_eq!(dict.capacity(), 4);
    /// assert_eq!(dict.get(b"one"), Some(&1));
    /// assert_eq!(dict.get(b"two"), Some(&2));
    /// ```
    #[inline]
    pub fn resize(&mut self, capacity: usize) {
        match self.resize_impl(capacity, OnError::NoReturn) {
            Ok(_) => (),
            Err(_) => unsafe { unreachable_unchecked() },
        }
    }

    /// Changes the number of buckets to `capacity`, returning an error
    /// instead of panicking when allocation fails.
    ///
    /// On error the table is left completely unmodified.
    ///
    /// # Panics
    ///
    /// This method will panic if `capacity` is zero.
    #[inline]
    pub fn try_resize(&mut self, capacity: usize) -> Result<(), AllocError> {
        self.resize_impl(capacity, OnError::ReturnErr)
    }

    fn clone_impl<KD, VD>(
        &self,
        mut dup_key: KD,
        mut dup_value: VD,
        on_err: OnError,
    ) -> Result<Self, AllocError>
    where
        KD: FnMut(&[u8]) -> Box<[u8]>,
        VD: FnMut(&V) -> V,
    {
        let mut clone = Dict {
            slots: Slots::new_allocate(self.slots.cap, on_err)?,
            used: 0,
            seed: self.seed,
        };

        for entry in self.iter() {
            // Same seed, same digest: the stored digest carries over.
            let dup = Entry::new(entry.digest(), dup_key(entry.key()), dup_value(entry.value()));
            let idx = clone.slots.bucket_index(dup.digest());

            match clone.slots.buckets_mut()[idx].insert(dup, on_err) {
                Ok(None) => clone.used += 1,
                Ok(Some(shadowed)) => {
                    debug_assert!(false, "Logic error: duplicate key during clone");
                    drop(shadowed);
                }
                // The orphaned duplicate is dropped here and the partial
                // clone releases everything migrated so far.
                Err((dup, err)) => {
                    drop(dup);
                    return Err(err);
                }
            }
        }

        Ok(clone)
    }

    /// Returns an independent copy of the table built with caller-supplied
    /// duplication functions for keys and values.
    ///
    /// The copy shares the source's seed and capacity. Duplicating values
    /// through a shared handle keeps the duplication shallow.
    ///
    /// # Panics
    ///
    /// This method will panic when allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use bytedict::Dict;
    ///
    /// let mut source = Dict::new(0xdead_beef, 16);
    /// source.set(b"one", Rc::new(1));
    ///
    /// let clone = source.clone_with(|key| key.into(), Rc::clone);
    ///
    /// // Both tables hold the same shared value.
    /// assert!(Rc::ptr_eq(
    ///     source.get(b"one").unwrap(),
    ///     clone.get(b"one").unwrap(),
    /// ));
    /// ```
    #[must_use]
    #[inline]
    pub fn clone_with<KD, VD>(&self, dup_key: KD, dup_value: VD) -> Self
    where
        KD: FnMut(&[u8]) -> Box<[u8]>,
        VD: FnMut(&V) -> V,
    {
        match self.clone_impl(dup_key, dup_value, OnError::NoReturn) {
            Ok(clone) => clone,
            Err(_) => unsafe { unreachable_unchecked() },
        }
    }

    /// Returns an independent copy of the table, reporting allocation
    /// failure instead of panicking.
    ///
    /// On error the partially built copy and its duplicated entries are
    /// released; the source is never affected.
    #[inline]
    pub fn try_clone_with<KD, VD>(&self, dup_key: KD, dup_value: VD) -> Result<Self, AllocError>
    where
        KD: FnMut(&[u8]) -> Box<[u8]>,
        VD: FnMut(&V) -> V,
    {
        self.clone_impl(dup_key, dup_value, OnError::ReturnErr)
    }

    /// Returns an iterator over the entries.
    ///
    /// Entries come out in bucket-index order; within one bucket, the
    /// inline entry first and then the chain, most recently inserted
    /// colliding key first. The sequence is a single forward pass;
    /// restarting means calling `iter` again.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(1, 1);
    ///
    /// dict.set(b"a", 1);
    /// dict.set(b"b", 2);
    /// dict.set(b"c", 3);
    ///
    /// // One bucket: inline entry first, then the chain, most recent first.
    /// let values: Vec<i32> = dict.iter().map(|entry| *entry.value()).collect();
    /// assert_eq!(values, vec![1, 3, 2]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.slots.buckets(),
            idx: 0,
            node: None,
            remaining: self.used,
        }
    }

    /// Returns an iterator over the key bytes.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.iter().map(Entry::key)
    }

    /// Returns an iterator over the values.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(Entry::value)
    }

    /// Returns an iterator over the entries of `self` whose keys are absent
    /// from `other`.
    ///
    /// Membership in `other` is decided with `other`'s own seed, so the two
    /// tables may hash differently.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut a = Dict::new(1, 16);
    /// a.set(b"one", 1);
    /// a.set(b"two", 2);
    ///
    /// let mut b = Dict::new(2, 16);
    /// b.set(b"two", 2);
    ///
    /// let keys: Vec<&[u8]> = a.difference(&b).map(|entry| entry.key()).collect();
    /// assert_eq!(keys, [&b"one"[..]]);
    /// ```
    #[inline]
    pub fn difference<'a>(&'a self, other: &'a Dict<V>) -> Difference<'a, V> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Returns an iterator over the entries of `self` whose keys are present
    /// in `other`.
    ///
    /// Membership in `other` is decided with `other`'s own seed, so the two
    /// tables may hash differently.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut a = Dict::new(1, 16);
    /// a.set(b"one", 1);
    /// a.set(b"two", 2);
    ///
    /// let mut b = Dict::new(2, 16);
    /// b.set(b"two", 2);
    ///
    /// let keys: Vec<&[u8]> = a.intersection(&b).map(|entry| entry.key()).collect();
    /// assert_eq!(keys, [&b"two"[..]]);
    /// ```
    #[inline]
    pub fn intersection<'a>(&'a self, other: &'a Dict<V>) -> Intersection<'a, V> {
        Intersection {
            iter: self.iter(),
            other,
        }
    }
}

impl<V> Default for Dict<V> {
    /// Creates a new `Dict` with seed `0` and the default capacity of `16`
    /// buckets.
    ///
    /// # Panics
    ///
    /// This function will panic when allocation fails.
    #[inline]
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_CAPACITY)
    }
}

impl<V> Clone for Dict<V>
where
    V: Clone,
{
    /// Creates an independent deep copy with the same seed and capacity.
    ///
    /// Mutating the clone never affects the source.
    ///
    /// # Panics
    ///
    /// This method will panic when allocation fails.
    #[inline]
    fn clone(&self) -> Self {
        self.clone_with(|key| key.into(), V::clone)
    }
}

impl<V> Dict<V>
where
    V: Clone,
{
    /// Creates an independent deep copy, reporting allocation failure
    /// instead of panicking.
    #[inline]
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        self.try_clone_with(|key| key.into(), V::clone)
    }
}

impl<V> PartialEq for Dict<V>
where
    V: PartialEq,
{
    /// Two tables are equal when they hold the same keys with equal values,
    /// regardless of seed or capacity.
    fn eq(&self, other: &Self) -> bool {
        if self.used != other.used {
            return false;
        }
        self.iter()
            .all(|entry| other.get(entry.key()).is_some_and(|value| entry.value == *value))
    }
}

impl<V> Debug for Dict<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.key(), entry.value())))
            .finish()
    }
}

/// An iterator over a table's entries: buckets in index order, the inline
/// entry before its chain.
pub struct Iter<'a, V> {
    buckets: &'a [Bucket<V>],
    idx: usize,
    node: Option<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(node) = self.node {
            self.node = node.next.as_deref();
            self.remaining -= 1;
            return Some(&node.entry);
        }

        while let Some(bucket) = self.buckets.get(self.idx) {
            self.idx += 1;

            if let Some(entry) = bucket.head.as_ref() {
                self.node = bucket.chain.as_deref();
                self.remaining -= 1;
                return Some(entry);
            }
        }

        None
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, V> IntoIterator for &'a Dict<V> {
    type Item = &'a Entry<V>;
    type IntoIter = Iter<'a, V>;

    /// Returns an iterator over the entries.
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A lazy traversal of the entries of one table whose keys are absent from
/// another. A stateless wrapper over [`Iter`].
pub struct Difference<'a, V> {
    iter: Iter<'a, V>,
    other: &'a Dict<V>,
}

impl<'a, V> Iterator for Difference<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.iter.next()?;
            if !self.other.contains(entry.key()) {
                return Some(entry);
            }
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}

/// A lazy traversal of the entries of one table whose keys are present in
/// another. A stateless wrapper over [`Iter`].
pub struct Intersection<'a, V> {
    iter: Iter<'a, V>,
    other: &'a Dict<V>,
}

impl<'a, V> Iterator for Intersection<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.iter.next()?;
            if self.other.contains(entry.key()) {
                return Some(entry);
            }
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}

/// An owning iterator draining a table's entries as `(key, value)` pairs.
pub struct IntoIter<V> {
    slots: Slots<V>,
    idx: usize,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (Box<[u8]>, V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < self.slots.cap {
            let bucket = &mut self.slots.buckets_mut()[self.idx];

            if let Some(entry) = bucket.head.take() {
                self.remaining -= 1;
                return Some(entry.into_pair());
            }

            if let Some(node) = bucket.chain.take() {
                let Node { entry, next } = *node;
                bucket.chain = next;
                self.remaining -= 1;
                return Some(entry.into_pair());
            }

            self.idx += 1;
        }

        None
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> IntoIterator for Dict<V> {
    type Item = (Box<[u8]>, V);
    type IntoIter = IntoIter<V>;

    /// Consumes the `Dict` and returns an iterator over its entries.
    ///
    /// Entries not pulled from the iterator are dropped with it.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytedict::Dict;
    ///
    /// let mut dict = Dict::new(0xdead_beef, 64);
    ///
    /// dict.set(b"one", 1);
    ///
    /// let mut iter = dict.into_iter();
    ///
    /// let (key, value) = iter.next().unwrap();
    /// assert_eq!(&*key, b"one");
    /// assert_eq!(value, 1);
    ///
    /// assert!(iter.next().is_none());
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        let Dict { slots, used, .. } = self;

        IntoIter {
            slots,
            idx: 0,
            remaining: used,
        }
    }
}

/// Development and testing methods that are not available in release builds.
#[cfg(test)]
impl<V> Dict<V> {
    /// Returns `true` if the slot at `offset` is at the empty sentinel:
    /// no inline entry and no chain.
    pub(crate) fn debug_slot_is_empty(&self, offset: usize) -> bool {
        let bucket = &self.slots.buckets()[offset];
        bucket.head.is_none() && bucket.chain.is_none()
    }

    /// Returns the number of overflow nodes chained to the slot at `offset`.
    pub(crate) fn debug_chain_len(&self, offset: usize) -> usize {
        let mut count = 0;
        let mut cur = self.slots.buckets()[offset].chain.as_deref();
        while let Some(node) = cur {
            count += 1;
            cur = node.next.as_deref();
        }
        count
    }

    /// Returns the bucket offset `key` currently maps to.
    pub(crate) fn debug_bucket_of(&self, key: &[u8]) -> usize {
        self.slots.bucket_index(digest(self.seed, key))
    }
}
