//! Kanban pipeline state: the board snapshot, drag resolution and
//! optimistic stage transitions.

pub mod board;
pub mod drag;
pub mod engine;
pub mod kanban;
pub mod service;
pub mod stats;


pub use board::PipelineBoard;
pub use drag::{DragController, DragOutcome, DragState, TransitionRequest};
pub use engine::{transition, TransitionOutcome};
pub use kanban::Kanban;
pub use service::{HttpLeadService, LeadBackend, LeadService, StoreLeadService};
pub use stats::BoardStats;
