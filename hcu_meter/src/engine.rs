//! HCU accounting over the coprocessor events of one transaction.
//!
//! Events are replayed in emission order. Every produced handle gets a
//! cumulative cost: the own cost of the operation that produced it plus the
//! largest cumulative cost among its parents. Handles never produced in the
//! trace (inputs from earlier transactions) count as zero-cost parents.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::{debug, warn};

use crate::error::HcuError;
use crate::operation::{FheOperation, RightOperand};
use crate::registry::{OperandShape, PriceKey, Registry};
use crate::tracker::HcuTracker;
use crate::types::{DecodedEvent, Handle, HcuReport, TransactionTrace, TxOutcome};

/// Compute the HCU cost of a transaction from its decoded coprocessor events.
///
/// Fails with [`HcuError::RevertedTransaction`] without looking at the events
/// when the transaction did not succeed. Any other failure aborts the whole
/// computation.
pub fn compute_cost(
    outcome: TxOutcome,
    events: &[DecodedEvent],
    registry: &Registry,
) -> Result<HcuReport, HcuError> {
    if !outcome.is_success() {
        return Err(HcuError::RevertedTransaction);
    }
    events
        .iter()
        .try_fold(Accumulator::new(), |acc, event| acc.record(event, registry))
        .map(Accumulator::into_report)
}

/// Compute the HCU cost of a decoded transaction trace.
pub fn compute_trace_cost(
    trace: &TransactionTrace,
    registry: &Registry,
) -> Result<HcuReport, HcuError> {
    compute_cost(trace.status, &trace.events, registry)
}

/// Own cost of an operation, excluding anything upstream of it.
pub fn operation_cost(operation: &FheOperation, registry: &Registry) -> Result<u64, HcuError> {
    let price_key = operation.price_key();
    match *operation {
        // the result handle carries no type yet, the declared type is an argument
        FheOperation::TrivialEncrypt { fhe_type, .. } | FheOperation::Rand { fhe_type, .. } => {
            let fhe_type = registry.types.lookup(fhe_type)?;
            registry.price(price_key, PriceKey::Type(fhe_type))
        }
        FheOperation::Cast { input, .. } | FheOperation::Unary { input, .. } => {
            let fhe_type = registry.resolve_type(&input)?;
            registry.price(price_key, PriceKey::Type(fhe_type))
        }
        FheOperation::Binary { rhs, result, .. } => {
            let fhe_type = registry.resolve_type(&result)?;
            let shape = match rhs {
                RightOperand::Scalar => OperandShape::Scalar,
                RightOperand::Handle(_) => OperandShape::NonScalar,
            };
            registry.price(price_key, PriceKey::Shaped(shape, fhe_type))
        }
        FheOperation::IfThenElse { result, .. } => {
            let fhe_type = registry.resolve_type(&result)?;
            registry.price(price_key, PriceKey::Type(fhe_type))
        }
    }
}

/// Accumulator for replaying events.
struct Accumulator {
    costs: BTreeMap<Handle, u64>,
    tracker: HcuTracker,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            costs: BTreeMap::new(),
            tracker: HcuTracker::new(),
        }
    }

    fn cumulative(&self, handle: &Handle) -> u64 {
        self.costs.get(handle).copied().unwrap_or(0)
    }

    /// Price one event and record the cumulative cost of its result.
    fn record(mut self, event: &DecodedEvent, registry: &Registry) -> Result<Self, HcuError> {
        let operation = FheOperation::decode(event)?;
        let cost = operation_cost(&operation, registry)?;
        let parents = operation.parents();
        let upstream = parents
            .iter()
            .map(|parent| self.cumulative(parent))
            .max()
            .unwrap_or(0);
        let result = operation.result();

        self.tracker.charge(cost, &event.name);
        match self.costs.entry(result) {
            Entry::Vacant(entry) => {
                let cumulative = cost.saturating_add(upstream);
                debug!(
                    "{} produced {result} from {} parents with cumulative cost {cumulative}",
                    event.name,
                    parents.len()
                );
                entry.insert(cumulative);
            }
            Entry::Occupied(entry) => {
                warn!(
                    "{} produced {result} again, keeping its cumulative cost {}",
                    event.name,
                    entry.get()
                );
            }
        }
        Ok(self)
    }

    fn into_report(self) -> HcuReport {
        let max_depth = self.costs.values().copied().max().unwrap_or(0);
        HcuReport {
            total_work: self.tracker.total(),
            max_depth,
            per_handle_cost: self.costs,
        }
    }
}
