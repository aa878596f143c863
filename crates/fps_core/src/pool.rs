//! Reusable-object pool backed by an arena of slots and a free-index stack.
//!
//! # Invariants
//! - A slot index is on the free stack iff the slot is `Idle`.
//! - A handle returned by [`Pool::acquire`] refers to a `Leased` slot until it
//!   is passed to [`Pool::release`].
//! - The free stack never holds more than `max_size` entries; instances
//!   released beyond that are dropped and their slot is left `Vacant` for a
//!   later acquire to refill.

/// Types that can live in a [`Pool`].
pub trait Poolable {
    /// A fresh instance in its resting state.
    fn inert() -> Self;
    /// Return an in-use instance to its resting state.
    fn reset(&mut self);
}

/// Index of a leased slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle(u32);

impl PoolHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
enum Slot<T> {
    Idle(T),
    Leased(T),
    Vacant,
}

/// Bounded pool. `acquire` never fails: when no warm instance is free it
/// builds a new one.
#[derive(Debug)]
pub struct Pool<T: Poolable> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    vacant: Vec<u32>,
    max_size: usize,
    leased: usize,
}

impl<T: Poolable> Pool<T> {
    /// Pre-populate `initial_size` inert instances; keep at most `max_size`
    /// idle instances around after releases.
    pub fn new(initial_size: usize, max_size: usize) -> Self {
        let warm = initial_size.min(max_size);
        if warm < initial_size {
            log::warn!(
                "Pool warm size {} exceeds max {}; clamping",
                initial_size,
                max_size
            );
        }

        let slots = (0..warm).map(|_| Slot::Idle(T::inert())).collect();
        // Hand out low indices first
        let free = (0..warm as u32).rev().collect();
        Self {
            slots,
            free,
            vacant: Vec::new(),
            max_size,
            leased: 0,
        }
    }

    /// Lease an instance, reusing a free one when available.
    pub fn acquire(&mut self) -> PoolHandle {
        let index = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let Slot::Idle(item) = std::mem::replace(slot, Slot::Vacant) else {
                unreachable!("free stack pointed at a non-idle slot");
            };
            *slot = Slot::Leased(item);
            index
        } else if let Some(index) = self.vacant.pop() {
            self.slots[index as usize] = Slot::Leased(T::inert());
            index
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot::Leased(T::inert()));
            log::trace!("Pool grew to {} slots", self.slots.len());
            index
        };

        self.leased += 1;
        PoolHandle(index)
    }

    /// Return a leased instance. Releasing a handle that is not currently
    /// leased is a caller bug; it trips a debug assertion and is otherwise
    /// ignored.
    pub fn release(&mut self, handle: PoolHandle) {
        let index = handle.0;
        let Some(slot) = self.slots.get_mut(index as usize) else {
            debug_assert!(false, "released unknown pool handle {index}");
            log::warn!("Released unknown pool handle {}", index);
            return;
        };

        if !matches!(slot, Slot::Leased(_)) {
            debug_assert!(false, "double release of pool handle {index}");
            log::warn!("Double release of pool handle {}", index);
            return;
        }
        let Slot::Leased(mut item) = std::mem::replace(slot, Slot::Vacant) else {
            unreachable!("slot checked as leased");
        };
        self.leased -= 1;

        if self.free.len() < self.max_size {
            item.reset();
            *slot = Slot::Idle(item);
            self.free.push(index);
        } else {
            // Drop the instance and leave the slot vacant.
            self.vacant.push(index);
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        match self.slots.get(handle.index()) {
            Some(Slot::Leased(item)) => Some(item),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index()) {
            Some(Slot::Leased(item)) => Some(item),
            _ => None,
        }
    }

    /// Idle instances ready for reuse.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Instances currently handed out.
    pub fn leased_len(&self) -> usize {
        self.leased
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Instances alive in storage, leased or idle.
    pub fn live_len(&self) -> usize {
        self.leased + self.free.len()
    }
}
