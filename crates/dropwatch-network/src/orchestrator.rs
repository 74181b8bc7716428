//! Refresh orchestration.
//!
//! One refresh cycle:
//! 1. bump the generation and reset all five cells to `Pending`;
//! 2. issue the four balance reads concurrently, each settling its own cell
//!    as soon as it completes;
//! 3. on the first failed balance read, move every cell that is still
//!    pending (price included) to `Failed` with that read's message;
//! 4. once all four have settled, read the price, but only if none failed.
//!
//! Every write carries the generation it was started under and is dropped
//! if a newer refresh has begun since. Overlapping refreshes therefore never
//! mix results: the latest trigger wins, not the slowest read.

use crate::balance::BalanceReader;
use crate::price::PriceReader;
use dropwatch_core::{
    derive, Allocation, BalanceQuery, Cell, DerivedSnapshot, QueryKind, SnapshotConfig,
    SnapshotInputs, TokenAmount,
};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The five result cells of the latest refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotCells {
    pub generation: u64,
    pub hub: Cell<TokenAmount>,
    pub bonded: Cell<TokenAmount>,
    pub vault: Cell<TokenAmount>,
    pub locker: Cell<TokenAmount>,
    pub price: Cell<f64>,
}

impl SnapshotCells {
    pub fn balance(&self, kind: QueryKind) -> &Cell<TokenAmount> {
        match kind {
            QueryKind::Hub => &self.hub,
            QueryKind::Bonded => &self.bonded,
            QueryKind::Vault => &self.vault,
            QueryKind::Locker => &self.locker,
        }
    }

    fn balance_mut(&mut self, kind: QueryKind) -> &mut Cell<TokenAmount> {
        match kind {
            QueryKind::Hub => &mut self.hub,
            QueryKind::Bonded => &mut self.bonded,
            QueryKind::Vault => &mut self.vault,
            QueryKind::Locker => &mut self.locker,
        }
    }

    pub fn inputs(&self) -> SnapshotInputs {
        SnapshotInputs {
            hub: self.hub.copied(),
            bonded: self.bonded.copied(),
            vault: self.vault.copied(),
            locker: self.locker.copied(),
            price: self.price.copied(),
        }
    }

    /// Safe to call at any point of a refresh; unsettled inputs read as zero.
    pub fn derive(&self, allocation: &Allocation) -> DerivedSnapshot {
        derive(&self.inputs(), allocation)
    }

    pub fn is_complete(&self) -> bool {
        QueryKind::ALL
            .iter()
            .all(|kind| self.balance(*kind).is_settled())
            && self.price.is_settled()
    }

    /// `(label, message)` for every failed cell.
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        let mut out: Vec<(&'static str, &str)> = QueryKind::ALL
            .iter()
            .filter_map(|kind| self.balance(*kind).error().map(|e| (kind.label(), e)))
            .collect();
        if let Some(e) = self.price.error() {
            out.push(("Spot price", e));
        }
        out
    }

    fn reset(&mut self) {
        self.hub = Cell::Pending;
        self.bonded = Cell::Pending;
        self.vault = Cell::Pending;
        self.locker = Cell::Pending;
        self.price = Cell::Pending;
    }

    fn fail_pending(&mut self, msg: &str) -> bool {
        // non-short-circuiting: every pending cell must be visited
        let mut changed = false;
        for kind in QueryKind::ALL {
            changed |= self.balance_mut(kind).fail_if_pending(msg);
        }
        changed |= self.price.fail_if_pending(msg);
        changed
    }
}

/// Shared holder of the latest [`SnapshotCells`].
///
/// Backed by a `watch` channel so the presentation layer can re-render on
/// every settle instead of waiting for the whole cycle.
#[derive(Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<SnapshotCells>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SnapshotCells::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> SnapshotCells {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SnapshotCells> {
        self.tx.subscribe()
    }

    /// Start a new generation with every cell pending.
    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|cells| {
            cells.generation += 1;
            cells.reset();
            generation = cells.generation;
        });
        generation
    }

    fn settle_balance(&self, generation: u64, kind: QueryKind, cell: Cell<TokenAmount>) -> bool {
        self.tx.send_if_modified(|cells| {
            if cells.generation != generation {
                return false;
            }
            *cells.balance_mut(kind) = cell;
            true
        })
    }

    fn settle_price(&self, generation: u64, cell: Cell<f64>) -> bool {
        self.tx.send_if_modified(|cells| {
            if cells.generation != generation {
                return false;
            }
            cells.price = cell;
            true
        })
    }

    fn fail_pending(&self, generation: u64, msg: &str) {
        self.tx.send_if_modified(|cells| {
            cells.generation == generation && cells.fail_pending(msg)
        });
    }
}

/// Summary of one refresh, for logging. The cells hold the actual results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub failed_reads: usize,
    pub price_requested: bool,
    /// A newer refresh started before this one finished; some or all of
    /// this cycle's results were discarded.
    pub superseded: bool,
}

pub struct RefreshOrchestrator<B, P> {
    queries: [BalanceQuery; 4],
    balances: B,
    price: P,
    store: SnapshotStore,
}

impl<B: BalanceReader, P: PriceReader> RefreshOrchestrator<B, P> {
    pub fn new(config: &SnapshotConfig, balances: B, price: P) -> Self {
        Self::with_store(config, balances, price, SnapshotStore::new())
    }

    fn with_store(
        config: &SnapshotConfig,
        balances: B,
        price: P,
        store: SnapshotStore,
    ) -> Self {
        Self {
            queries: config.balance_queries(),
            balances,
            price,
            store,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run one full refresh cycle. Never fails; outcomes land in the cells.
    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = self.store.begin();
        info!(generation, "refresh started");

        let mut reads: FuturesUnordered<_> = self
            .queries
            .iter()
            .map(|query| async move { (query.kind, self.balances.balance_of(query).await) })
            .collect();

        let mut failed_reads = 0;
        let mut first_error: Option<String> = None;
        let mut superseded = false;

        while let Some((kind, result)) = reads.next().await {
            let cell = match result {
                Ok(amount) => {
                    debug!(generation, %kind, %amount, "balance read settled");
                    Cell::Succeeded(amount)
                }
                Err(e) => {
                    failed_reads += 1;
                    warn!(generation, %kind, error = %e, "balance read failed");
                    Cell::Failed(e.to_string())
                }
            };
            let message = cell.error().map(str::to_owned);

            if !self.store.settle_balance(generation, kind, cell) {
                superseded = true;
                debug!(generation, %kind, "discarding result from superseded refresh");
                continue;
            }
            if let (Some(msg), None) = (message, first_error.as_ref()) {
                self.store.fail_pending(generation, &msg);
                first_error = Some(msg);
            }
        }

        let mut price_requested = false;
        if !superseded && first_error.is_none() {
            price_requested = true;
            let cell: Cell<f64> = match self.price.spot_price().await {
                Ok(price) => {
                    debug!(generation, price, "spot price settled");
                    Cell::Succeeded(price)
                }
                Err(e) => {
                    warn!(generation, error = %e, "spot price read failed");
                    Cell::Failed(e.to_string())
                }
            };
            if !self.store.settle_price(generation, cell) {
                superseded = true;
            }
        }

        let outcome = RefreshOutcome {
            generation,
            failed_reads,
            price_requested,
            superseded,
        };
        if superseded {
            info!(generation, "refresh superseded by a newer one");
        } else {
            info!(generation, failed_reads, "refresh complete");
        }
        outcome
    }
}
