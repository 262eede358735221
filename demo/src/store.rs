use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Clone, Debug, Serialize)]
pub struct Transaction {
    pub id: String,
    pub category: String,
    pub amount_cents: i64,
    pub description: String,
    pub booked_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("connection already exists: institution={institution}, external_id={external_id}")]
    DuplicateConnection {
        institution: String,
        external_id: String,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

/// 内存账本存储
#[derive(Default)]
pub struct LedgerStore {
    transactions: Mutex<Vec<Transaction>>,
    connections: Mutex<HashSet<(String, String)>>,
    spent: Mutex<HashMap<String, i64>>,
    audit: Mutex<Vec<String>>,
}

impl LedgerStore {
    pub fn insert_transaction(&self, tx: Transaction) -> Result<(), StoreError> {
        self.transactions
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(tx);
        Ok(())
    }

    pub fn transactions(&self, category: Option<&str>) -> Result<Vec<Transaction>, StoreError> {
        let all = self.transactions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(all
            .iter()
            .filter(|tx| category.is_none_or(|c| tx.category == c))
            .cloned()
            .collect())
    }

    pub fn insert_connection(&self, institution: &str, external_id: &str) -> Result<(), StoreError> {
        let mut connections = self.connections.lock().map_err(|_| StoreError::Poisoned)?;
        if !connections.insert((institution.to_string(), external_id.to_string())) {
            return Err(StoreError::DuplicateConnection {
                institution: institution.to_string(),
                external_id: external_id.to_string(),
            });
        }
        Ok(())
    }

    /// 累加类别支出，返回累加后的总额
    pub fn add_spent(&self, category: &str, amount_cents: i64) -> Result<i64, StoreError> {
        let mut spent = self.spent.lock().map_err(|_| StoreError::Poisoned)?;
        let total = spent.entry(category.to_string()).or_default();
        *total += amount_cents;
        Ok(*total)
    }

    pub fn append_audit(&self, line: String) -> Result<(), StoreError> {
        self.audit.lock().map_err(|_| StoreError::Poisoned)?.push(line);
        Ok(())
    }

    pub fn audit_len(&self) -> usize {
        self.audit.lock().map(|a| a.len()).unwrap_or_default()
    }
}
