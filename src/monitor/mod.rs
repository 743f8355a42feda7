//! Monitor module - position reconciliation and the poll loop
//!
//! # Architecture
//!
//! ```text
//!  Init ──acquire()──▶ Seeding ──fetch_positions()──▶ Polling ◀─────────┐
//!   │                    │                              │               │
//!   ▼                    ▼                    sleep, fetch_positions()  │
//!  AuthFailed        FetchFailed                        │               │
//!                                            reconcile(baseline, current)
//!                                                       │               │
//!                                            send each message in order │
//!                                                       │               │
//!                                              baseline = current ──────┘
//! ```
//!
//! A failed poll ends the loop in `FetchFailed`, unless the failure is an
//! expired session and re-authentication is enabled, in which case the
//! loop goes back to `Init`.

pub mod poll_loop;
pub mod reconciler;

pub use poll_loop::{CycleReport, MonitorSettings, PositionMonitor};
pub use reconciler::{diff, reconcile, SnapshotDiff, Transition};
