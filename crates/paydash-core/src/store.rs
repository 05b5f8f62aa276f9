//! In-memory transaction store
//!
//! The store is created empty, filled once by `seed`, and read for the
//! rest of the process lifetime. All mutation goes through its methods.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use paydash_config::{Config, StatsSource};
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::{PoisonError, RwLock};

use crate::contract::Validate;
use crate::error::CoreResult;
use crate::models::{Amounts, DashboardStats, NewTransaction, Transaction};
use crate::types::{Currency, TransactionStatus, TransactionType};

/// Fee rate applied to synthetic records (2%)
pub const SEED_MDR_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Synthetic dates fall within this many milliseconds before "now" (~116 days)
pub const SEED_MAX_AGE_MS: i64 = 10_000_000_000;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Read-side operations the HTTP layer depends on
pub trait TransactionStorage: Send + Sync {
    /// All transactions in insertion (ascending id) order
    fn list_transactions(&self) -> Vec<Transaction>;

    /// Current dashboard stats snapshot
    fn stats(&self) -> DashboardStats;

    /// Populate with synthetic data if empty; returns the number created
    fn seed(&self) -> usize;
}

#[derive(Debug)]
struct StoreData {
    transactions: Vec<Transaction>,
    next_id: u64,
}

/// Process-wide transaction store
#[derive(Debug)]
pub struct TransactionStore {
    data: RwLock<StoreData>,
    seed_count: usize,
    stats_source: StatsSource,
}

impl TransactionStore {
    /// Create an empty store
    pub fn new(seed_count: usize, stats_source: StatsSource) -> Self {
        Self {
            data: RwLock::new(StoreData {
                transactions: Vec::new(),
                next_id: 1,
            }),
            seed_count,
            stats_source,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store.seed_count, config.stats.source)
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate and append a transaction, assigning the next sequential id
    pub fn insert(&self, new_tx: NewTransaction) -> CoreResult<Transaction> {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        Self::push(&mut data, new_tx, Utc::now())
    }

    fn push(data: &mut StoreData, new_tx: NewTransaction, now: DateTime<Utc>) -> CoreResult<Transaction> {
        new_tx.validate()?;
        let tx = new_tx.into_transaction(data.next_id, now);
        data.next_id += 1;
        data.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Seed with an explicit RNG and clock
    pub fn seed_with<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> usize {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        if !data.transactions.is_empty() {
            log::debug!("Store already holds {} transactions, skipping seed", data.transactions.len());
            return 0;
        }

        let mut created = 0;
        for i in 1..=self.seed_count {
            let new_tx = synthetic_transaction(rng, i, now);
            match Self::push(&mut data, new_tx, now) {
                Ok(_) => created += 1,
                Err(e) => log::log!(
                    e.severity().log_level(),
                    "Discarding synthetic transaction {}: {}",
                    i,
                    e.to_details()
                ),
            }
        }

        log::info!("Seeded {} synthetic transactions", created);
        created
    }
}

impl TransactionStorage for TransactionStore {
    fn list_transactions(&self) -> Vec<Transaction> {
        self.data.read().unwrap_or_else(PoisonError::into_inner).transactions.clone()
    }

    fn stats(&self) -> DashboardStats {
        match self.stats_source {
            StatsSource::Fixed => DashboardStats::fixed(),
            StatsSource::Derived => {
                let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
                DashboardStats::derive_from(&data.transactions, Utc::now().date_naive())
            }
        }
    }

    fn seed(&self) -> usize {
        self.seed_with(&mut rand::thread_rng(), Utc::now())
    }
}

fn pick<T: Copy, R: Rng>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn base36<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect()
}

/// One pseudo-random record; `index` is used for the display name
fn synthetic_transaction<R: Rng>(rng: &mut R, index: usize, now: DateTime<Utc>) -> NewTransaction {
    // Whole cents in [100.00, 1100.00)
    let gross = Decimal::new(rng.gen_range(10_000..110_000), 2);
    let amounts = Amounts::from_gross(gross, SEED_MDR_RATE);
    let age = Duration::milliseconds(rng.gen_range(0..SEED_MAX_AGE_MS));

    NewTransaction {
        user: format!("User {}", index),
        order_id: format!("ORD-{}", rng.gen_range(100_000..1_000_000u32)),
        txn_ref: format!("TXN-{}", rng.gen_range(10_000_000..100_000_000u32)),
        unique_ref: format!("UNQ-{}", base36(rng, 6)),
        bank_ref: format!("UTR-{}", rng.gen_range(1_000_000_000..10_000_000_000u64)),
        currency: pick(rng, &Currency::ALL),
        kind: pick(rng, &TransactionType::ALL),
        gross: amounts.gross,
        mdr: amounts.mdr,
        net: amounts.net,
        status: pick(rng, &TransactionStatus::ALL),
        date: Some((now - age).trunc_subsecs(3)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn seeded(seed: u64) -> TransactionStore {
        let store = TransactionStore::new(50, StatsSource::Fixed);
        store.seed_with(&mut StdRng::seed_from_u64(seed), now());
        store
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = TransactionStore::new(50, StatsSource::Fixed);
        assert!(store.is_empty());

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(store.seed_with(&mut rng, now()), 50);
        let first = store.list_transactions();

        assert_eq!(store.seed_with(&mut rng, now()), 0);
        assert_eq!(store.seed(), 0);
        assert_eq!(store.list_transactions(), first);
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_seed_ids_are_sequential() {
        let ids: Vec<u64> = seeded(2).list_transactions().iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<u64>>());
    }

    #[test]
    fn test_seed_amounts() {
        for tx in seeded(3).list_transactions() {
            assert_eq!(tx.net, tx.gross - tx.mdr);
            assert_eq!(tx.mdr, paydash_utils::to_cents(tx.gross * SEED_MDR_RATE));
            assert!(tx.gross >= Decimal::new(10_000, 2));
            assert!(tx.gross < Decimal::new(110_000, 2));
            assert_eq!(tx.gross.scale(), 2);
            assert_eq!(tx.mdr.scale(), 2);
            assert_eq!(tx.net.scale(), 2);
        }
    }

    #[test]
    fn test_seed_enumerations_and_references() {
        for tx in seeded(4).list_transactions() {
            assert!(TransactionStatus::ALL.contains(&tx.status));
            assert!(TransactionType::ALL.contains(&tx.kind));
            assert!(Currency::ALL.contains(&tx.currency));
            assert_eq!(tx.user, format!("User {}", tx.id));
            assert!(tx.order_id.starts_with("ORD-") && tx.order_id.len() == 10);
            assert!(tx.txn_ref.starts_with("TXN-") && tx.txn_ref.len() == 12);
            assert!(tx.unique_ref.starts_with("UNQ-") && tx.unique_ref.len() == 10);
            assert!(tx.bank_ref.starts_with("UTR-") && tx.bank_ref.len() == 14);
            assert!(tx.unique_ref[4..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_seed_dates_within_window() {
        let earliest = now() - Duration::milliseconds(SEED_MAX_AGE_MS);
        for tx in seeded(5).list_transactions() {
            assert!(tx.date <= now());
            assert!(tx.date > earliest);
            assert_eq!(tx.date.timestamp_subsec_nanos() % 1_000_000, 0);
        }
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let list = seeded(6).list_transactions();
        assert!(list.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn test_seed_count_from_config() {
        let mut config = Config::default();
        config.store.seed_count = 5;
        let store = TransactionStore::from_config(&config);
        assert_eq!(store.seed(), 5);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_concurrent_seed_creates_one_batch() {
        let store = Arc::new(TransactionStore::new(50, StatsSource::Fixed));
        let created: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let store = Arc::clone(&store);
                    scope.spawn(move || store.seed())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(created, 50);
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_insert_assigns_next_id() {
        let store = seeded(7);
        let mut new_tx = synthetic_transaction(&mut StdRng::seed_from_u64(8), 51, now());
        new_tx.date = None;

        let before = Utc::now().trunc_subsecs(0);
        let tx = store.insert(new_tx.clone()).unwrap();
        assert_eq!(tx.id, 51);
        assert!(tx.date >= before);

        new_tx.order_id = "  ".to_string();
        let err = store.insert(new_tx).unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: Some(ref f), .. } if f == "orderId"));
        assert_eq!(store.len(), 51);
    }

    #[test]
    fn test_stats_sources() {
        let fixed = seeded(9);
        assert_eq!(fixed.stats(), DashboardStats::fixed());

        let derived = TransactionStore::new(50, StatsSource::Derived);
        derived.seed_with(&mut StdRng::seed_from_u64(9), now());
        let stats = derived.stats();
        let balance: Decimal = derived.list_transactions().iter().map(|t| t.net).sum();
        assert_eq!(stats.total_balance, paydash_utils::format_amount(balance));
        assert!(!stats.today_deposited.is_empty());
    }
}
