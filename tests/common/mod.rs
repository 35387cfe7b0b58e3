#![allow(dead_code)]

use rand::Rng;
use std::io::Write;
use tempfile::NamedTempFile;
use upipay::application::UpiService;
use upipay::infrastructure::in_memory::{
    InMemoryCollectStore, InMemoryMandateStore, InMemoryTransactionStore, InMemoryVpaStore,
};

/// In-memory service plus handles on the stores it writes to.
pub struct Harness {
    pub service: UpiService,
    pub transactions: InMemoryTransactionStore,
    pub collects: InMemoryCollectStore,
}

pub fn harness() -> Harness {
    let transactions = InMemoryTransactionStore::new();
    let collects = InMemoryCollectStore::new();
    let service = UpiService::new(
        Box::new(InMemoryVpaStore::new()),
        Box::new(transactions.clone()),
        Box::new(InMemoryMandateStore::new()),
        Box::new(collects.clone()),
    );
    Harness {
        service,
        transactions,
        collects,
    }
}

/// A random, well-formed caller identity.
pub fn user_id() -> String {
    let bytes: [u8; 12] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A random VPA prefix made of letters, digits and dots.
pub fn prefix() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.";
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(3..16);
    let mut prefix: String = (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    prefix.insert(0, 'u');
    prefix
}

/// Writes `lines` to a temporary JSON-lines request file.
pub fn request_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}
