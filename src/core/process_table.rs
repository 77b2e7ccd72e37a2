//! Fixed-capacity process table
//!
//! Slots are allocated once when the table is built; a free slot is `None`.
//! Ids are handed out lowest-free-first so reuse is predictable.

use crate::config::MAX_CAPACITY;
use crate::core::models::{Pcb, ProcessEntry, ProcessId, TableSnapshot};
use crate::error::{errors, PcbError, PcbResult};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTable {
    slots: Vec<Option<Pcb>>,
}

impl ProcessTable {
    /// Build an empty table with `capacity` slots.
    pub fn new(capacity: usize) -> PcbResult<Self> {
        if capacity == 0 {
            return Err(errors::config_error("capacity must be at least 1"));
        }
        if capacity > MAX_CAPACITY {
            return Err(errors::config_error(format!(
                "capacity {} exceeds the maximum of {}",
                capacity, MAX_CAPACITY
            )));
        }

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);
        Ok(Self { slots })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.find_free_index().is_none()
    }

    /// Lowest-numbered free slot, or `None` when every slot is occupied.
    pub fn find_free_index(&self) -> Option<ProcessId> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(ProcessId::new)
    }

    pub fn get(&self, pid: ProcessId) -> Option<&Pcb> {
        self.slots.get(pid.index()).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, pid: ProcessId) -> Option<&mut Pcb> {
        self.slots.get_mut(pid.index()).and_then(Option::as_mut)
    }

    pub fn is_occupied(&self, pid: ProcessId) -> bool {
        self.get(pid).is_some()
    }

    /// Occupied slots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProcessId, &Pcb)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|pcb| (ProcessId::new(index), pcb)))
    }

    /// Map a user supplied integer onto an occupied id.
    pub fn resolve(&self, raw: i64) -> PcbResult<ProcessId> {
        let invalid = || PcbError::InvalidReference {
            pid: raw,
            capacity: self.capacity(),
        };

        let index = usize::try_from(raw).map_err(|_| invalid())?;
        let pid = ProcessId::new(index);
        if self.is_occupied(pid) {
            Ok(pid)
        } else {
            Err(invalid())
        }
    }

    /// Check that `pid` names an occupied slot.
    pub(crate) fn ensure_occupied(&self, pid: ProcessId) -> PcbResult<()> {
        if self.is_occupied(pid) {
            Ok(())
        } else {
            Err(PcbError::InvalidReference {
                pid: i64::try_from(pid.index()).unwrap_or(i64::MAX),
                capacity: self.capacity(),
            })
        }
    }

    /// Place `pcb` into a free slot. The caller has already checked the slot.
    pub(crate) fn occupy(&mut self, pid: ProcessId, pcb: Pcb) {
        debug_assert!(self.slots[pid.index()].is_none(), "slot {} already occupied", pid);
        self.slots[pid.index()] = Some(pcb);
    }

    /// Free a slot, returning its record.
    pub(crate) fn vacate(&mut self, pid: ProcessId) -> Option<Pcb> {
        self.slots.get_mut(pid.index()).and_then(Option::take)
    }

    /// Discard every process and create the root (id 0, no parent, no children).
    pub fn reset(&mut self) {
        let freed = self.teardown();
        self.occupy(ProcessId::ROOT, Pcb::root());
        debug!(freed, "process table reset");
    }

    /// Free every occupied slot. Returns the number of slots freed.
    pub fn teardown(&mut self) -> usize {
        let mut freed = 0;
        for slot in self.slots.iter_mut() {
            if slot.take().is_some() {
                freed += 1;
            }
        }
        if freed > 0 {
            debug!(freed, "process table torn down");
        }
        freed
    }

    /// Read-only view in ascending id order.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            capacity: self.capacity(),
            processes: self
                .iter()
                .map(|(pid, pcb)| ProcessEntry {
                    pid,
                    parent: pcb.parent,
                    children: pcb.children.clone(),
                })
                .collect(),
        }
    }

    /// Verify the parent/child structure.
    ///
    /// Checks that every link points at an occupied slot, that each id is
    /// listed under at most one parent, that parent and child links agree in
    /// both directions, and that no process is its own ancestor.
    pub fn validate(&self) -> PcbResult<()> {
        let capacity = self.capacity();
        let mut listed = vec![false; capacity];

        for (pid, pcb) in self.iter() {
            for &child in &pcb.children {
                let child_pcb = self.get(child).ok_or_else(|| {
                    errors::corrupted(format!("process {} lists free slot {} as a child", pid, child))
                })?;
                if listed[child.index()] {
                    return Err(errors::corrupted(format!(
                        "process {} is listed as a child more than once",
                        child
                    )));
                }
                listed[child.index()] = true;
                if child_pcb.parent != Some(pid) {
                    return Err(errors::corrupted(format!(
                        "process {} lists {} as a child but its parent is {:?}",
                        pid, child, child_pcb.parent
                    )));
                }
            }
        }

        // A process listed by anyone is listed by its own parent (checked above).
        for (pid, pcb) in self.iter() {
            match pcb.parent {
                None if listed[pid.index()] => {
                    return Err(errors::corrupted(format!(
                        "root process {} is listed as a child",
                        pid
                    )));
                }
                None => {}
                Some(parent) => {
                    if self.get(parent).is_none() {
                        return Err(errors::corrupted(format!(
                            "process {} has free slot {} as parent",
                            pid, parent
                        )));
                    }
                    if !listed[pid.index()] {
                        return Err(errors::corrupted(format!(
                            "process {} is missing from the children of its parent {}",
                            pid, parent
                        )));
                    }
                }
            }
        }

        // Each slot's ancestor chain is walked once; slots already known to
        // reach a root end the walk early.
        let mut grounded = vec![false; capacity];
        let mut on_path = vec![false; capacity];
        let mut path = Vec::new();
        for (pid, _) in self.iter() {
            let mut cursor = Some(pid);
            while let Some(current) = cursor {
                if grounded[current.index()] {
                    break;
                }
                if on_path[current.index()] {
                    return Err(errors::corrupted(format!(
                        "process {} is its own ancestor",
                        current
                    )));
                }
                on_path[current.index()] = true;
                path.push(current);
                cursor = self.get(current).and_then(|p| p.parent);
            }
            for visited in path.drain(..) {
                on_path[visited.index()] = false;
                grounded[visited.index()] = true;
            }
        }

        Ok(())
    }
}
