//! Order ledger and simulation state library.
//!
//! The crate exposes:
//! - [`SimulationController`]: single writer applying deposits and edits atomically.
//! - [`SimulationState`]: the persisted `{config, orders, pool}` triple and its transitions.
//! - [`reconcile`]: merges a loaded snapshot against the default parameter table.
//! - [`StateStore`]: load/save hooks, with json-file and in-memory implementations.

pub mod config;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod reconcile;
pub mod state;
pub mod storage;

pub use config::LedgerConfig;
pub use controller::{OrderReceipt, SimulationController};
pub use error::{LedgerError, Result, StorageError};
pub use ledger::OrderLedger;
pub use reconcile::{reconcile, PersistedState, PoolDecision, Reconciled};
pub use state::{ConfigChange, ConfigPatch, OrderRequest, PackagePatch, SimulationState};
pub use storage::{JsonStateStore, MemoryStateStore, StateStore};
