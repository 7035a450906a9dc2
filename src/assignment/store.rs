//! Line item persistence boundary.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollLineItem;

/// Storage for computed line items, implemented by the external layer.
///
/// Calls are synchronous and may block; the orchestrator moves them onto the
/// blocking pool when running concurrently.
pub trait LineItemStore: Send + Sync {
    /// Contract ids that already have a line item in the run.
    fn existing_contract_ids(&self, run_id: &str) -> EngineResult<HashSet<String>>;

    /// Persists a new line item. Fails if the (run, contract) pair exists.
    fn create_line_item(&self, item: PayrollLineItem) -> EngineResult<()>;
}

type LineItemKey = (String, String);

/// A [`LineItemStore`] kept in memory, keyed by run and contract.
#[derive(Debug, Default)]
pub struct InMemoryLineItemStore {
    items: Mutex<HashMap<LineItemKey, PayrollLineItem>>,
    rejected_contracts: HashSet<String>,
}

impl InMemoryLineItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every create for `contract_id` fail with a persistence error.
    pub fn with_rejected_contract(mut self, contract_id: impl Into<String>) -> Self {
        self.rejected_contracts.insert(contract_id.into());
        self
    }

    /// Line items of a run, ordered by contract id.
    pub fn line_items(&self, run_id: &str) -> EngineResult<Vec<PayrollLineItem>> {
        let guard = self.lock()?;
        let mut items: Vec<PayrollLineItem> = guard
            .values()
            .filter(|item| item.run_id == run_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));
        Ok(items)
    }

    /// Total number of stored line items across runs.
    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, HashMap<LineItemKey, PayrollLineItem>>> {
        self.items.lock().map_err(|_| EngineError::Persistence {
            message: "line item store lock poisoned".to_string(),
        })
    }
}

impl LineItemStore for InMemoryLineItemStore {
    fn existing_contract_ids(&self, run_id: &str) -> EngineResult<HashSet<String>> {
        let guard = self.lock()?;
        Ok(guard
            .keys()
            .filter(|(run, _)| run == run_id)
            .map(|(_, contract)| contract.clone())
            .collect())
    }

    fn create_line_item(&self, item: PayrollLineItem) -> EngineResult<()> {
        if self.rejected_contracts.contains(&item.contract_id) {
            return Err(EngineError::Persistence {
                message: format!("store rejected contract '{}'", item.contract_id),
            });
        }

        let mut guard = self.lock()?;
        let key = (item.run_id.clone(), item.contract_id.clone());
        if guard.contains_key(&key) {
            return Err(EngineError::Persistence {
                message: format!(
                    "line item for contract '{}' already exists in run '{}'",
                    key.1, key.0
                ),
            });
        }
        guard.insert(key, item);
        Ok(())
    }
}
