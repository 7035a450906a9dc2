//! Bulk assignment of line items to payroll runs.
//!
//! The orchestrator reuses the calculation pipeline for every contract and
//! talks to persistence only through the [`LineItemStore`] trait.

mod orchestrator;
mod store;

pub use orchestrator::{
    AssignmentFailure, BulkAssignment, BulkAssignmentOrchestrator, BulkAssignmentReport,
    SkipReason, SkippedContract, bulk_assign,
};
pub use store::{InMemoryLineItemStore, LineItemStore};
