#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

use kvtool::{
    execute, AccessMode, Command, Confirm, GlobalOptions, Invocation, Result, Store, StoreConfig,
};
use tempfile::TempDir;

/// A store living in a temporary directory
pub struct TestStore {
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Create a store holding `entries`, then close it
    pub fn with_entries(entries: &[(&[u8], &[u8])]) -> Self {
        let test_store = Self::new();
        let store = test_store.open(AccessMode::ReadWrite);
        let txn = store.begin_write().unwrap();
        for (key, value) in entries {
            txn.set(key, value).unwrap();
        }
        txn.commit().unwrap();
        store.close();
        test_store
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("db")
    }

    pub fn open(&self, access: AccessMode) -> Store {
        Store::open(&StoreConfig::new(self.path(), access)).expect("Failed to open store")
    }

    pub fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        let store = self.open(AccessMode::ReadOnly);
        let value = store.view(|snapshot| snapshot.get(key)).unwrap();
        store.close();
        value
    }

    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            db: Some(self.path()),
            ..Default::default()
        }
    }

    /// Run one command the way the binary would, returning stdout
    pub fn run(&self, command: Command, confirm: &mut dyn Confirm) -> Result<String> {
        let invocation = Invocation {
            globals: self.globals(),
            command: Some(command),
        };
        run_invocation(&invocation, confirm)
    }
}

pub fn run_invocation(invocation: &Invocation, confirm: &mut dyn Confirm) -> Result<String> {
    let mut out = Vec::new();
    execute(invocation, &mut out, confirm)?;
    Ok(String::from_utf8(out).expect("output is ASCII"))
}

/// Fails the test if a prompt is ever answered
pub struct NeverAsked;

impl Confirm for NeverAsked {
    fn confirm(&mut self) -> io::Result<bool> {
        panic!("confirmation should not have been requested");
    }
}

/// Canned answers, recording how many were consumed
pub struct Answers {
    answers: VecDeque<bool>,
    pub asked: usize,
}

impl Answers {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: 0,
        }
    }
}

impl Confirm for Answers {
    fn confirm(&mut self) -> io::Result<bool> {
        self.asked += 1;
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
