//! Process tree operations
//!
//! Child creation and subtree teardown on top of [`ProcessTable`]. Both
//! operations come in two flavors: a `try_` form that reports every refusal
//! as a [`PcbError`], and a lenient form that turns recoverable refusals
//! (bad target, full table) into a no-op.

use crate::core::models::{Pcb, ProcessId};
use crate::core::process_table::ProcessTable;
use crate::error::{ignore_recoverable, PcbError, PcbResult};
use tracing::debug;

impl ProcessTable {
    /// Create a child of `parent` in the lowest free slot.
    ///
    /// Storage for the new child link is reserved before the slot is
    /// occupied, so an allocation failure leaves the table untouched.
    pub fn try_create_child(&mut self, parent: ProcessId) -> PcbResult<ProcessId> {
        self.ensure_occupied(parent)?;
        let child = self.find_free_index().ok_or(PcbError::CapacityExhausted {
            capacity: self.capacity(),
        })?;

        self.children_mut(parent)?.try_reserve(1)?;
        self.occupy(child, Pcb::child_of(parent));
        self.children_mut(parent)?.push(child);

        debug!(%parent, %child, "created child process");
        Ok(child)
    }

    /// Lenient [`try_create_child`](Self::try_create_child): `Ok(None)` when
    /// the parent is invalid or the table is full.
    pub fn create_child(&mut self, parent: ProcessId) -> PcbResult<Option<ProcessId>> {
        ignore_recoverable(self.try_create_child(parent))
    }

    /// Free every strict descendant of `pid`, leaving `pid` itself with no
    /// children. Returns the freed ids in the order they were freed.
    ///
    /// Children are visited in list order and each subtree is torn down
    /// before its own root is freed. The walk keeps an explicit stack, so a
    /// degenerate chain as deep as the table costs heap, not call depth.
    pub fn try_destroy_descendants(&mut self, pid: ProcessId) -> PcbResult<Vec<ProcessId>> {
        self.ensure_occupied(pid)?;

        let mut freed = Vec::new();
        // (process, index of the next child to visit)
        let mut stack: Vec<(ProcessId, usize)> = vec![(pid, 0)];
        while let Some(frame) = stack.last_mut() {
            let (current, next) = *frame;
            let child = self
                .get(current)
                .and_then(|pcb| pcb.children.get(next).copied());

            match child {
                Some(child) => {
                    frame.1 += 1;
                    stack.push((child, 0));
                }
                None => {
                    stack.pop();
                    if current != pid && self.vacate(current).is_some() {
                        freed.push(current);
                    }
                }
            }
        }

        if let Some(pcb) = self.get_mut(pid) {
            pcb.children = Vec::new();
        }

        debug!(%pid, freed = freed.len(), "destroyed descendants");
        Ok(freed)
    }

    /// Lenient [`try_destroy_descendants`](Self::try_destroy_descendants):
    /// an invalid target frees nothing.
    pub fn destroy_descendants(&mut self, pid: ProcessId) -> Vec<ProcessId> {
        match ignore_recoverable(self.try_destroy_descendants(pid)) {
            Ok(freed) => freed.unwrap_or_default(),
            // Destruction never allocates table storage, so nothing fatal can surface
            Err(_) => Vec::new(),
        }
    }

    /// Every process reachable from `pid` through child links, excluding
    /// `pid`, in pre-order.
    pub fn descendants(&self, pid: ProcessId) -> Vec<ProcessId> {
        let mut found = Vec::new();
        let mut stack: Vec<ProcessId> = match self.get(pid) {
            Some(pcb) => pcb.children.iter().rev().copied().collect(),
            None => return found,
        };

        while let Some(current) = stack.pop() {
            found.push(current);
            if let Some(pcb) = self.get(current) {
                stack.extend(pcb.children.iter().rev().copied());
            }
        }
        found
    }

    fn children_mut(&mut self, pid: ProcessId) -> PcbResult<&mut Vec<ProcessId>> {
        let capacity = self.capacity();
        self.get_mut(pid)
            .map(|pcb| &mut pcb.children)
            .ok_or(PcbError::InvalidReference {
                pid: i64::try_from(pid.index()).unwrap_or(i64::MAX),
                capacity,
            })
    }
}
