//! Bulk assignment of line items to a payroll run.
//!
//! Every active contract that is not yet in the run gets one line item computed
//! with neutral novelties. A contract that fails (bad salary, deductions above
//! income, store error) is reported and the batch carries on.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{EligibilityCache, compute_for_contract};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, Novelties, PayrollLineItem, PayrollRun};

use super::store::LineItemStore;

/// Why a contract was not assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The run already has a line item for the contract.
    AlreadyAssigned,
    /// The contract is inactive or its dates do not overlap the run.
    Inactive,
}

/// A contract left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedContract {
    /// The contract identifier.
    pub contract_id: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// A contract whose line item could not be built or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFailure {
    /// The contract identifier.
    pub contract_id: String,
    /// The error message.
    pub reason: String,
}

impl AssignmentFailure {
    fn new(contract_id: &str, error: &EngineError) -> Self {
        Self {
            contract_id: contract_id.to_string(),
            reason: error.to_string(),
        }
    }
}

/// The outcome of computing a batch, before anything is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignment {
    /// Line items computed, in input order.
    pub created: Vec<PayrollLineItem>,
    /// Contracts skipped.
    pub skipped: Vec<SkippedContract>,
    /// Contracts that failed.
    pub failed: Vec<AssignmentFailure>,
}

impl BulkAssignment {
    /// Number of line items created.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Computes one line item per active contract not already in the run.
///
/// Pure: nothing is persisted. A contract listed twice is computed once; the
/// second occurrence is skipped as already assigned.
pub fn bulk_assign(
    run: &PayrollRun,
    contracts: &[Contract],
    existing_contract_ids: &HashSet<String>,
    defaults: &Novelties,
    config: &PayrollConfig,
) -> BulkAssignment {
    let mut assigned = existing_contract_ids.clone();
    let mut eligibility_cache = EligibilityCache::new();
    let mut result = BulkAssignment::default();

    for contract in contracts {
        if !contract.is_active_during(run) {
            tracing::debug!(contract_id = %contract.id, "Skipping inactive contract");
            result.skipped.push(SkippedContract {
                contract_id: contract.id.clone(),
                reason: SkipReason::Inactive,
            });
            continue;
        }

        if !assigned.insert(contract.id.clone()) {
            tracing::debug!(contract_id = %contract.id, "Skipping contract already in run");
            result.skipped.push(SkippedContract {
                contract_id: contract.id.clone(),
                reason: SkipReason::AlreadyAssigned,
            });
            continue;
        }

        let eligibility = eligibility_cache.get_or_classify(contract);
        match compute_for_contract(&run.id, contract, eligibility, defaults, config) {
            Ok(item) => result.created.push(item),
            Err(error) => {
                tracing::warn!(
                    run_id = %run.id,
                    contract_id = %contract.id,
                    error = %error,
                    "Failed to compute line item"
                );
                result
                    .failed
                    .push(AssignmentFailure::new(&contract.id, &error));
            }
        }
    }

    result
}

/// The outcome of a persisted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignmentReport {
    /// Identifies this batch in logs.
    pub batch_id: Uuid,
    /// The run the batch assigned to.
    pub run_id: String,
    /// Number of line items stored.
    pub created_count: usize,
    /// Line items stored, ordered by contract id.
    pub created: Vec<PayrollLineItem>,
    /// Contracts skipped.
    pub skipped: Vec<SkippedContract>,
    /// Contracts that failed, ordered by contract id.
    pub failed: Vec<AssignmentFailure>,
}

/// Drives [`bulk_assign`] against a [`LineItemStore`].
#[derive(Debug)]
pub struct BulkAssignmentOrchestrator<S> {
    store: Arc<S>,
    config: Arc<PayrollConfig>,
    defaults: Novelties,
}

impl<S: LineItemStore + 'static> BulkAssignmentOrchestrator<S> {
    /// Creates an orchestrator that assigns with [`Novelties::neutral`].
    pub fn new(store: Arc<S>, config: Arc<PayrollConfig>) -> Self {
        Self {
            store,
            config,
            defaults: Novelties::neutral(),
        }
    }

    /// Replaces the novelties every new line item is computed with.
    pub fn with_defaults(mut self, defaults: Novelties) -> Self {
        self.defaults = defaults;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Assigns the contracts and stores each new line item in turn.
    ///
    /// Only a failure to read the existing assignments aborts the batch.
    pub fn run(&self, run: &PayrollRun, contracts: &[Contract]) -> EngineResult<BulkAssignmentReport> {
        let batch_id = Uuid::new_v4();
        let assignment = self.prepare(run, contracts)?;

        let mut created = Vec::with_capacity(assignment.created.len());
        let mut failed = assignment.failed;
        for item in assignment.created {
            let contract_id = item.contract_id.clone();
            match self.store.create_line_item(item.clone()) {
                Ok(()) => created.push(item),
                Err(error) => {
                    tracing::warn!(
                        batch_id = %batch_id,
                        contract_id = %contract_id,
                        error = %error,
                        "Failed to store line item"
                    );
                    failed.push(AssignmentFailure::new(&contract_id, &error));
                }
            }
        }

        Ok(self.report(batch_id, run, created, assignment.skipped, failed))
    }

    /// Like [`run`](Self::run), but dispatches every store call on the tokio
    /// blocking pool at once.
    pub async fn run_concurrent(
        &self,
        run: &PayrollRun,
        contracts: &[Contract],
    ) -> EngineResult<BulkAssignmentReport> {
        let batch_id = Uuid::new_v4();
        let assignment = self.prepare(run, contracts)?;

        let handles: Vec<_> = assignment
            .created
            .into_iter()
            .map(|item| {
                let store = Arc::clone(&self.store);
                let contract_id = item.contract_id.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    store.create_line_item(item.clone()).map(|()| item)
                });
                (contract_id, handle)
            })
            .collect();

        let mut created = Vec::with_capacity(handles.len());
        let mut failed = assignment.failed;
        for (contract_id, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|join_error| {
                Err(EngineError::Persistence {
                    message: format!("store task failed: {}", join_error),
                })
            });
            match outcome {
                Ok(item) => created.push(item),
                Err(error) => {
                    tracing::warn!(
                        batch_id = %batch_id,
                        contract_id = %contract_id,
                        error = %error,
                        "Failed to store line item"
                    );
                    failed.push(AssignmentFailure::new(&contract_id, &error));
                }
            }
        }

        Ok(self.report(batch_id, run, created, assignment.skipped, failed))
    }

    fn prepare(&self, run: &PayrollRun, contracts: &[Contract]) -> EngineResult<BulkAssignment> {
        let existing = self.store.existing_contract_ids(&run.id)?;
        Ok(bulk_assign(
            run,
            contracts,
            &existing,
            &self.defaults,
            &self.config,
        ))
    }

    fn report(
        &self,
        batch_id: Uuid,
        run: &PayrollRun,
        mut created: Vec<PayrollLineItem>,
        skipped: Vec<SkippedContract>,
        mut failed: Vec<AssignmentFailure>,
    ) -> BulkAssignmentReport {
        created.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));
        failed.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));

        tracing::info!(
            batch_id = %batch_id,
            run_id = %run.id,
            created = created.len(),
            skipped = skipped.len(),
            failed = failed.len(),
            "Bulk assignment completed"
        );

        BulkAssignmentReport {
            batch_id,
            run_id: run.id.clone(),
            created_count: created.len(),
            created,
            skipped,
            failed,
        }
    }
}
