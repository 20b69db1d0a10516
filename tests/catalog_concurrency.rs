use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use tell_presto::catalog::CatalogCache;
use tell_presto::config::ConnectorConfig;
use tell_presto::spi::ConnectorMetadata;
use tell_presto::store::memory::MemoryStore;
use tell_presto::store::{Field, FieldType, Table, Transaction, TransactionId};
use tell_presto::{tprintln, ConnectorResult, TellConnector};

// Enumeration that stays in flight long enough for every thread to pile up behind it.
struct SlowTxn {
    id: TransactionId,
    calls: Arc<AtomicUsize>,
}

impl Transaction for SlowTxn {
    fn transaction_id(&self) -> TransactionId { self.id }

    fn enumerate_tables(&self) -> ConnectorResult<Vec<Table>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        Ok((0..20).map(|i| Table::new(i, format!("t{:02}", i), vec![Field::new("v", FieldType::BigInt)])).collect())
    }
}

#[test]
fn concurrent_first_callers_enumerate_once() {
    const N: usize = 16;
    let cache = Arc::new(CatalogCache::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(N));

    let handles: Vec<_> = (0..N)
        .map(|i| {
            let cache = cache.clone();
            let calls = calls.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let txn = SlowTxn { id: i as TransactionId, calls };
                barrier.wait();
                let snap = cache.snapshot(&txn).expect("snapshot");
                assert_eq!(snap.len(), 20);
                Arc::as_ptr(snap) as usize
            })
        })
        .collect();

    let ptrs: Vec<usize> = handles.into_iter().map(|h| h.join().expect("thread panicked")).collect();
    tprintln!("snapshot pointers: {:?}", ptrs);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(ptrs.iter().all(|p| *p == ptrs[0]), "every caller must observe the same published snapshot");
}

#[test]
fn concurrent_metadata_requests_through_connector() {
    let store = MemoryStore::new();
    for i in 0..8 {
        store.create_table(format!("orders_{}", i), vec![Field::new("id", FieldType::Int), Field::new("note", FieldType::Text)]);
    }
    let connector = Arc::new(TellConnector::new(ConnectorConfig::default(), Arc::new(store.clone())));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let connector = connector.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let md = connector.begin().expect("begin");
                barrier.wait();
                md.list_tables(None).expect("list tables").len()
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().expect("thread panicked"), 8);
    }
    assert_eq!(store.enumeration_count(), 1);
}
