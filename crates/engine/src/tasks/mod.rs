// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Steady-state tasks
//!
//! Each lane runs three tasks on their own threads:
//!
//! - [`LaneTask`] polls the size sensor and hands items off
//! - [`CountTask`] confirms that large items reached the collector
//! - [`GateTask`] diverts small items with the shared gate

mod count;
mod gate;
mod lane;

pub(crate) use count::CountTask;
pub(crate) use gate::GateTask;
pub(crate) use lane::LaneTask;

use sorter_core::Lane;
use std::fmt;

/// Kind of steady-state task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Lane,
    Count,
    Gate,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Lane, TaskKind::Count, TaskKind::Gate];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Lane => "lane",
            TaskKind::Count => "count",
            TaskKind::Gate => "gate",
        }
    }
}

/// Identity of one steady-state task, e.g. `gate-left`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    pub kind: TaskKind,
    pub lane: Lane,
}

impl TaskId {
    pub fn new(kind: TaskKind, lane: Lane) -> Self {
        Self { kind, lane }
    }

    /// The six tasks of a session, in spawn order
    pub fn steady_state() -> impl Iterator<Item = TaskId> {
        Lane::ALL.into_iter().flat_map(|lane| {
            TaskKind::ALL
                .into_iter()
                .map(move |kind| TaskId::new(kind, lane))
        })
    }

    pub fn thread_name(self) -> String {
        format!("sorter-{}", self)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.lane)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
