//! Shared in-process table cache
//!
//! Encoders built with the same `(d, W, H, δ, n, basis)` receive the same
//! `Arc<ReconstructionTable>` instead of rebuilding it.

use super::{ReconstructionTable, TableParams};
use crate::basis::BasisPair;
use crate::Result;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Identity of a reconstruction table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub dimension: usize,
    pub width: usize,
    pub height: usize,
    /// `delta.to_bits()`, so the key stays `Eq + Hash`
    pub delta_bits: u64,
    pub samples_per_axis: usize,
    pub basis_fingerprint: String,
}

impl TableKey {
    pub fn new(basis: &BasisPair, params: &TableParams) -> Self {
        Self {
            dimension: basis.dimension(),
            width: params.width,
            height: params.height,
            delta_bits: params.delta.to_bits(),
            samples_per_axis: params.samples_per_axis,
            basis_fingerprint: basis.fingerprint().to_string(),
        }
    }

    pub fn of_table(table: &ReconstructionTable) -> Self {
        let params = table.params();
        Self {
            dimension: table.dimension(),
            width: params.width,
            height: params.height,
            delta_bits: params.delta.to_bits(),
            samples_per_axis: params.samples_per_axis,
            basis_fingerprint: table.basis_fingerprint().to_string(),
        }
    }

    /// Hex SHA-256 over every key field
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "d={};w={};h={};delta={:016x};n={};basis={}",
            self.dimension,
            self.width,
            self.height,
            self.delta_bits,
            self.samples_per_axis,
            self.basis_fingerprint
        ));
        format!("{:x}", hasher.finalize())
    }
}

static GLOBAL_REGISTRY: OnceLock<TableRegistry> = OnceLock::new();

/// Memo of built tables keyed by [`TableKey`]
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: Mutex<HashMap<TableKey, Arc<ReconstructionTable>>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by the encoders' default constructors
    pub fn global() -> &'static TableRegistry {
        GLOBAL_REGISTRY.get_or_init(TableRegistry::new)
    }

    /// Shared table for `(basis, params)`, building it on first request.
    ///
    /// The lock is never held across a build: `ReconstructionTable::build`
    /// runs on the rayon pool, and pool workers may themselves be waiting in
    /// this registry. Two callers racing on a missing key may both build;
    /// the first insert wins and both receive that table.
    pub fn get_or_build(
        &self,
        basis: &BasisPair,
        params: TableParams,
    ) -> Result<Arc<ReconstructionTable>> {
        let key = TableKey::new(basis, &params);
        if let Some(table) = self.tables.lock().get(&key) {
            debug!("Reconstruction table cache hit ({})", &key.digest()[..12]);
            return Ok(Arc::clone(table));
        }

        let built = Arc::new(ReconstructionTable::build(basis, params)?);
        let mut tables = self.tables.lock();
        let table = tables.entry(key).or_insert(built);
        Ok(Arc::clone(table))
    }

    /// Register an already-built table (e.g. one loaded from disk)
    pub fn insert(&self, table: ReconstructionTable) -> Arc<ReconstructionTable> {
        let key = TableKey::of_table(&table);
        let table = Arc::new(table);
        self.tables.lock().insert(key, Arc::clone(&table));
        table
    }

    pub fn get(&self, key: &TableKey) -> Option<Arc<ReconstructionTable>> {
        self.tables.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.lock().is_empty()
    }

    pub fn clear(&self) {
        self.tables.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn params() -> TableParams {
        TableParams {
            width: 3,
            height: 3,
            delta: 2.0,
            samples_per_axis: 4,
        }
    }

    #[test]
    fn test_same_config_shares_table() {
        let registry = TableRegistry::new();
        let basis = BasisPair::from_seed(32, 1).unwrap();

        let a = registry.get_or_build(&basis, params()).unwrap();
        let b = registry.get_or_build(&basis, params()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_basis_builds_new_table() {
        let registry = TableRegistry::new();
        let basis_a = BasisPair::from_seed(32, 1).unwrap();
        let basis_b = BasisPair::from_seed(32, 2).unwrap();

        let a = registry.get_or_build(&basis_a, params()).unwrap();
        let b = registry.get_or_build(&basis_b, params()).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_different_delta_builds_new_table() {
        let registry = TableRegistry::new();
        let basis = BasisPair::from_seed(32, 1).unwrap();
        let mut wide = params();
        wide.delta = 3.0;

        registry.get_or_build(&basis, params()).unwrap();
        registry.get_or_build(&basis, wide).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_insert_and_get() {
        let registry = TableRegistry::new();
        let basis = BasisPair::from_seed(16, 3).unwrap();
        let table = ReconstructionTable::build(&basis, params()).unwrap();

        let shared = registry.insert(table);
        let key = TableKey::new(&basis, &params());
        assert!(Arc::ptr_eq(&shared, &registry.get(&key).unwrap()));

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_params_not_cached() {
        let registry = TableRegistry::new();
        let basis = BasisPair::from_seed(16, 3).unwrap();
        let mut bad = params();
        bad.samples_per_axis = 0;

        assert!(registry.get_or_build(&basis, bad).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pool_workers_and_plain_thread_build_concurrently() {
        let registry = Arc::new(TableRegistry::new());
        let basis = Arc::new(BasisPair::from_seed(32, 4).unwrap());
        let (tx, rx) = mpsc::channel();

        let pool_requests = {
            let registry = Arc::clone(&registry);
            let basis = Arc::clone(&basis);
            thread::spawn(move || {
                let mut wide = params();
                wide.delta = 3.0;
                let tables: Vec<_> = (0..rayon::current_num_threads() * 2)
                    .into_par_iter()
                    .map(|_| {
                        thread::sleep(Duration::from_millis(20));
                        registry.get_or_build(&basis, wide).unwrap()
                    })
                    .collect();
                tables.iter().all(|t| Arc::ptr_eq(t, &tables[0]))
            })
        };

        {
            let registry = Arc::clone(&registry);
            let basis = Arc::clone(&basis);
            thread::spawn(move || {
                let large = TableParams {
                    width: 7,
                    height: 7,
                    delta: 2.0,
                    samples_per_axis: 12,
                };
                let built = registry.get_or_build(&basis, large).is_ok();
                let _ = tx.send(built);
            });
        }

        assert!(rx.recv_timeout(Duration::from_secs(60)).unwrap());
        assert!(pool_requests.join().unwrap());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_key_digest_stable() {
        let basis = BasisPair::from_seed(16, 3).unwrap();
        let a = TableKey::new(&basis, &params());
        let b = TableKey::new(&basis, &params());
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }
}
