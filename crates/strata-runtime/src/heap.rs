/// Opaque reference to an entry of an [`IndexedHeap`]. Stale once the entry is popped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: usize,
    generation: u64,
}

/// Binary min-heap with stable handles for re-prioritizing entries in place.
///
/// Scores come from the `score` function and are read only on [`add`],
/// [`fix`] and [`fix_all`]; between those calls an entry keeps the score it
/// was last given. Wrap the score in `std::cmp::Reverse` for max-first order.
///
/// [`add`]: IndexedHeap::add
/// [`fix`]: IndexedHeap::fix
/// [`fix_all`]: IndexedHeap::fix_all
pub struct IndexedHeap<T, S, F> {
    /// `(score, slot)` in heap order.
    heap: Vec<(S, usize)>,
    items: Vec<Option<T>>,
    /// Heap position of each occupied slot.
    pos: Vec<usize>,
    generation: Vec<u64>,
    free: Vec<usize>,
    score: F,
}

impl<T, S, F> IndexedHeap<T, S, F>
where
    S: Ord,
    F: Fn(&T) -> S,
{
    pub fn new(score: F) -> Self {
        Self::with_capacity(0, score)
    }

    pub fn with_capacity(capacity: usize, score: F) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
            pos: Vec::with_capacity(capacity),
            generation: Vec::with_capacity(capacity),
            free: Vec::new(),
            score,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Inserts `item` scored now. O(log n).
    pub fn add(&mut self, item: T) -> Handle {
        let s = (self.score)(&item);
        let slot = match self.free.pop() {
            Some(slot) => {
                self.items[slot] = Some(item);
                slot
            }
            None => {
                self.items.push(Some(item));
                self.pos.push(0);
                self.generation.push(0);
                self.items.len() - 1
            }
        };
        let i = self.heap.len();
        self.heap.push((s, slot));
        self.pos[slot] = i;
        self.sift_up(i);
        Handle {
            slot,
            generation: self.generation[slot],
        }
    }

    #[inline]
    pub fn contains(&self, h: Handle) -> bool {
        self.items.get(h.slot).is_some_and(Option::is_some) && self.generation[h.slot] == h.generation
    }

    pub fn get(&self, h: Handle) -> Option<&T> {
        if !self.contains(h) {
            return None;
        }
        self.items[h.slot].as_ref()
    }

    /// Re-reads the score of `h` and restores heap order. O(log n).
    /// Returns `false` for a stale handle.
    pub fn fix(&mut self, h: Handle) -> bool {
        if !self.contains(h) {
            return false;
        }
        let Some(item) = self.items[h.slot].as_ref() else {
            return false;
        };
        let i = self.pos[h.slot];
        self.heap[i].0 = (self.score)(item);
        let i = self.sift_up(i);
        self.sift_down(i);
        true
    }

    /// Re-scores every entry and rebuilds the heap. O(n).
    pub fn fix_all(&mut self) {
        let Self {
            heap, items, score, ..
        } = self;
        for (s, slot) in heap.iter_mut() {
            if let Some(item) = items[*slot].as_ref() {
                *s = score(item);
            }
        }
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    /// Removes the entry with the smallest score. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (_, slot) = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        self.generation[slot] += 1;
        self.free.push(slot);
        self.items[slot].take()
    }

    /// Smallest entry and its last-read score.
    pub fn peek(&self) -> Option<(&T, &S)> {
        let (s, slot) = self.heap.first()?;
        Some((self.items[*slot].as_ref()?, s))
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos[self.heap[a].1] = a;
        self.pos[self.heap[b].1] = b;
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let p = (i - 1) / 2;
            if self.heap[i].0 >= self.heap[p].0 {
                break;
            }
            self.swap(i, p);
            i = p;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let l = 2 * i + 1;
            if l >= n {
                break;
            }
            let r = l + 1;
            let m = if r < n && self.heap[r].0 < self.heap[l].0 { r } else { l };
            if self.heap[m].0 >= self.heap[i].0 {
                break;
            }
            self.swap(i, m);
            i = m;
        }
    }
}
