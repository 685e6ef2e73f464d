// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Concurrency core of the two-lane sorting conveyor

mod calibration;
mod control;
mod error;
mod gate;
mod session;
mod shutdown;
mod signals;
mod tasks;

pub use control::{Conveyor, ConveyorDeps, SessionSummary};
pub use error::{CalibrationError, EngineError, TaskError};
pub use gate::SharedGate;
pub use session::ConveyorHandle;
pub use shutdown::{ShutdownSignal, Suspend};
pub use signals::{
    CountingSignal, InterfaceGuard, InterfaceLock, PostOutcome, SignalSet, WaitOutcome,
};
pub use tasks::{TaskId, TaskKind};
