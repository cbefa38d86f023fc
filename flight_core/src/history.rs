//! Pose history.
//!
//! A fixed-capacity ring of past world matrices. All slots are allocated
//! (zeroed) up front; recording a pose overwrites the slot that would fall
//! off the back, so nothing allocates after construction.

use crate::matrix::Mat4;

#[derive(Debug, Clone)]
pub struct PoseHistory {
    slots: Box<[Mat4]>,
    /// Slot holding the newest pose.
    head: usize,
    len: usize,
}

impl PoseHistory {
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "pose history needs at least one slot");
        Self {
            slots: vec![Mat4::zero(); capacity].into_boxed_slice(),
            head: capacity - 1,
            len: 0,
        }
    }

    /// Stores `pose` as the newest record, evicting the oldest once full.
    pub fn record(&mut self, pose: &Mat4) {
        self.head = (self.head + 1) % self.slots.len();
        self.slots[self.head] = *pose;
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    /// Pose `age` records back; 0 is the newest.
    pub fn get(&self, age: usize) -> Option<&Mat4> {
        if age >= self.len {
            return None;
        }
        let cap = self.slots.len();
        Some(&self.slots[(self.head + cap - age) % cap])
    }

    pub fn newest(&self) -> Option<&Mat4> {
        self.get(0)
    }

    pub fn oldest(&self) -> Option<&Mat4> {
        self.oldest_index().and_then(|i| self.get(i))
    }

    /// Age of the oldest record: `None` while empty, then counting up and
    /// saturating at `capacity - 1`.
    pub fn oldest_index(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Records from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Mat4> + '_ {
        (0..self.len).filter_map(move |age| self.get(age))
    }
}
