//! Bank reports over `customers`, `accounts`, and `transactions`.
//!
//! Transaction entries carry `price`/`total` either as numbers or as
//! string-encoded numeric text, so every volume report coerces with
//! `$toDouble` before summing. The repair report rewrites the stored values
//! so the coercion eventually becomes a no-op.

use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::Serialize;

use crate::error::Result;
use crate::params::ActiveClientsCriteria;
use crate::storage::{ACCOUNTS_COLLECTION, CUSTOMERS_COLLECTION, TRANSACTIONS_COLLECTION};

use super::{f64_field, i64_field, str_field};

/// One active customer + account pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveClientRow {
    pub name: String,
    pub address: String,
    pub email: String,
    pub cuenta: i64,
    pub limite: i64,
}

/// Distinct customer count per product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductClientsRow {
    pub producto: String,
    pub total_clientes: i64,
}

/// One account's total transaction volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountVolumeRow {
    pub account_id: i64,
    pub monto_total: f64,
}

/// One (account, transaction type) pair's total volume, with the owning
/// customer's display name attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedVolumeRow {
    pub account_id: i64,
    pub nombre: String,
    pub monto_total: f64,
    pub tipo: String,
}

/// Outcome of the numeric-field repair bulk update.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RepairOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Reports over the bank collections.
#[derive(Clone)]
pub struct BankReports {
    customers: Collection<Document>,
    transactions: Collection<Document>,
}

impl BankReports {
    pub fn new(database: &Database) -> Self {
        Self {
            customers: database.collection(CUSTOMERS_COLLECTION),
            transactions: database.collection(TRANSACTIONS_COLLECTION),
        }
    }

    /// Customers joined to their accounts, filtered by the normalized
    /// `active`/`limit` criteria.
    pub async fn active_clients(
        &self,
        criteria: &ActiveClientsCriteria,
    ) -> Result<Vec<ActiveClientRow>> {
        let mut cursor = self
            .customers
            .aggregate(active_clients_pipeline(criteria))
            .await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(ActiveClientRow {
                name: str_field(&doc, "name"),
                address: str_field(&doc, "address"),
                email: str_field(&doc, "email"),
                cuenta: i64_field(&doc, "cuenta"),
                limite: i64_field(&doc, "limite"),
            });
        }

        Ok(rows)
    }

    /// Distinct customers per product across all joined accounts.
    pub async fn clients_by_product(&self) -> Result<Vec<ProductClientsRow>> {
        let mut cursor = self
            .customers
            .aggregate(clients_by_product_pipeline())
            .await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(ProductClientsRow {
                producto: str_field(&doc, "producto"),
                total_clientes: i64_field(&doc, "total_clientes"),
            });
        }

        Ok(rows)
    }

    /// Top `n` accounts by summed transaction volume, largest first.
    pub async fn top_accounts(&self, n: i64) -> Result<Vec<AccountVolumeRow>> {
        let mut cursor = self.transactions.aggregate(top_accounts_pipeline(n)).await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(AccountVolumeRow {
                account_id: i64_field(&doc, "account_id"),
                monto_total: f64_field(&doc, "monto_total"),
            });
        }

        Ok(rows)
    }

    /// Top `n` (account, transaction type) pairs by volume, joined back to
    /// customers for the display name.
    pub async fn top_by_transaction_type(&self, n: i64) -> Result<Vec<TypedVolumeRow>> {
        let mut cursor = self
            .transactions
            .aggregate(top_by_transaction_type_pipeline(n))
            .await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(TypedVolumeRow {
                account_id: i64_field(&doc, "account_id"),
                nombre: str_field(&doc, "nombre"),
                monto_total: f64_field(&doc, "monto_total"),
                tipo: str_field(&doc, "tipo"),
            });
        }

        Ok(rows)
    }

    /// Rewrite every embedded transaction entry so `price` and `total` are
    /// numeric, leaving other fields unchanged.
    ///
    /// Awaits completion and reports matched/modified counts; a second run
    /// modifies zero documents. No concurrency guard — callers must treat
    /// this as requiring exclusive access to the transactions collection.
    pub async fn repair_numeric_fields(&self) -> Result<RepairOutcome> {
        let result = self
            .transactions
            .update_many(doc! {}, repair_numeric_fields_pipeline())
            .await?;

        Ok(RepairOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }
}

/// Join customers to accounts, flatten, filter by criteria, project the
/// documented fields.
pub fn active_clients_pipeline(criteria: &ActiveClientsCriteria) -> Vec<Document> {
    let mut matching = doc! { "account.limit": { "$gte": criteria.min_limit } };
    if let Some(active) = criteria.active {
        matching.insert("active", active);
    }

    vec![
        doc! { "$lookup": {
            "from": ACCOUNTS_COLLECTION,
            "localField": "accounts",
            "foreignField": "account_id",
            "as": "account",
        }},
        doc! { "$unwind": "$account" },
        doc! { "$match": matching },
        doc! { "$project": {
            "_id": 0,
            "name": 1,
            "address": 1,
            "email": 1,
            "cuenta": "$account.account_id",
            "limite": "$account.limit",
        }},
    ]
}

/// Join customers to accounts, flatten accounts then products, count
/// distinct customers per product via a set accumulator.
pub fn clients_by_product_pipeline() -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": ACCOUNTS_COLLECTION,
            "localField": "accounts",
            "foreignField": "account_id",
            "as": "account",
        }},
        doc! { "$unwind": "$account" },
        doc! { "$unwind": "$account.products" },
        doc! { "$group": {
            "_id": "$account.products",
            "total_clientes": { "$addToSet": "$_id" },
        }},
        doc! { "$project": {
            "_id": 0,
            "producto": "$_id",
            "total_clientes": { "$size": "$total_clientes" },
        }},
    ]
}

/// Flatten transaction entries, coerce totals to numeric, sum per account,
/// keep the `n` largest.
pub fn top_accounts_pipeline(n: i64) -> Vec<Document> {
    vec![
        doc! { "$unwind": "$transactions" },
        doc! { "$addFields": {
            "monto": { "$toDouble": "$transactions.total" },
        }},
        doc! { "$group": {
            "_id": "$account_id",
            "monto_total": { "$sum": "$monto" },
        }},
        doc! { "$sort": { "monto_total": -1 } },
        doc! { "$limit": n },
        doc! { "$project": {
            "_id": 0,
            "account_id": "$_id",
            "monto_total": 1,
        }},
    ]
}

/// As [`top_accounts_pipeline`] with a compound (account, transaction code)
/// group key; after the limit, join back to customers for the name.
pub fn top_by_transaction_type_pipeline(n: i64) -> Vec<Document> {
    vec![
        doc! { "$unwind": "$transactions" },
        doc! { "$addFields": {
            "monto": { "$toDouble": "$transactions.total" },
        }},
        doc! { "$group": {
            "_id": {
                "account_id": "$account_id",
                "tipo_transaccion": "$transactions.transaction_code",
            },
            "monto_total": { "$sum": "$monto" },
        }},
        doc! { "$sort": { "monto_total": -1 } },
        doc! { "$limit": n },
        doc! { "$lookup": {
            "from": CUSTOMERS_COLLECTION,
            "localField": "_id.account_id",
            "foreignField": "accounts",
            "as": "customer",
        }},
        doc! { "$unwind": "$customer" },
        doc! { "$project": {
            "_id": 0,
            "account_id": "$_id.account_id",
            "nombre": "$customer.name",
            "monto_total": 1,
            "tipo": "$_id.tipo_transaccion",
        }},
    ]
}

/// Update pipeline rewriting each embedded entry with `price`/`total`
/// coerced via `$toDouble`.
pub fn repair_numeric_fields_pipeline() -> Vec<Document> {
    vec![doc! { "$set": {
        "transactions": { "$map": {
            "input": "$transactions",
            "as": "trans",
            "in": {
                "date": "$$trans.date",
                "amount": "$$trans.amount",
                "transaction_code": "$$trans.transaction_code",
                "symbol": "$$trans.symbol",
                "price": { "$toDouble": "$$trans.price" },
                "total": { "$toDouble": "$$trans.total" },
            },
        }},
    }}]
}
