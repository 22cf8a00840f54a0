//! The admissions kanban: an owned store of records with derived, filtered
//! views, stage bucketing, a drag controller and optimistic stage updates
//! with exact rollback.
//!
//! Nothing here knows about terminals or HTTP. The board is driven by a
//! front-end (see `intake-cli`) and persists through any
//! [`intake_core::AdmissionRepository`].

#![allow(async_fn_in_trait)]

pub mod board;
pub mod drag;
pub mod filter;
pub mod notify;
pub mod optimistic;
pub mod pipeline;

pub use board::{Board, LoadState, ViewMode};
pub use drag::{DragController, DragState, DropEffect};
pub use filter::{FacilityFilter, Filters};
pub use notify::{Notifier, Severity, Toast};
pub use optimistic::{MoveOutcome, StageChange};
