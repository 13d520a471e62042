use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// Account row as persisted. The stored hash is part of the row and shows up
/// in full listings; login responses use a separate view instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub display_name: String,
    pub login_id: String,
    pub password_hash: String,
    pub balance: f64,
}

/// Column values for a new account. The hash is already derived by the time
/// a row reaches the store.
#[derive(Debug)]
pub struct NewAccount {
    pub display_name: String,
    pub login_id: String,
    pub password_hash: String,
    pub balance: f64,
}

/// Column assignments for a partial update. `None` leaves the column
/// untouched; a zero balance is a real assignment.
#[derive(Debug, Default)]
pub struct AccountChanges {
    pub display_name: Option<String>,
    pub login_id: Option<String>,
    pub password_hash: Option<String>,
    pub balance: Option<f64>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.login_id.is_none()
            && self.password_hash.is_none()
            && self.balance.is_none()
    }
}

/// Row-store capability used by the account services. Implemented over
/// Postgres in production and by an in-memory fake in tests.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Account>>;
    async fn insert(&self, account: NewAccount) -> anyhow::Result<i64>;
    /// Returns the number of rows matched by `id`.
    async fn update(&self, id: i64, changes: AccountChanges) -> anyhow::Result<u64>;
    /// Returns the number of rows matched by `id`.
    async fn delete(&self, id: i64) -> anyhow::Result<u64>;
    async fn find_by_login_id(&self, login_id: &str) -> anyhow::Result<Option<Account>>;
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn list(&self) -> anyhow::Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, display_name, login_id, password_hash, balance
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, account: NewAccount) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (display_name, login_id, password_hash, balance)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&account.display_name)
        .bind(&account.login_id)
        .bind(&account.password_hash)
        .bind(account.balance)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> anyhow::Result<u64> {
        let mut query = update_query(id, &changes);
        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_login_id(&self, login_id: &str) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, display_name, login_id, password_hash, balance
            FROM accounts
            WHERE login_id = $1
            "#,
        )
        .bind(login_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }
}

/// Assembles `UPDATE accounts SET ... WHERE id = $n` with one assignment per
/// supplied column. Caller must pass at least one change.
fn update_query<'a>(id: i64, changes: &'a AccountChanges) -> QueryBuilder<'a, Postgres> {
    debug_assert!(!changes.is_empty(), "update requires at least one change");
    let mut query: QueryBuilder<'a, Postgres> = QueryBuilder::new("UPDATE accounts SET ");
    {
        let mut assignments = query.separated(", ");
        if let Some(display_name) = &changes.display_name {
            assignments
                .push("display_name = ")
                .push_bind_unseparated(display_name.as_str());
        }
        if let Some(login_id) = &changes.login_id {
            assignments
                .push("login_id = ")
                .push_bind_unseparated(login_id.as_str());
        }
        if let Some(password_hash) = &changes.password_hash {
            assignments
                .push("password_hash = ")
                .push_bind_unseparated(password_hash.as_str());
        }
        if let Some(balance) = changes.balance {
            assignments.push("balance = ").push_bind_unseparated(balance);
        }
    }
    query.push(" WHERE id = ");
    query.push_bind(id);
    query
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_query_includes_only_supplied_columns() {
        let changes = AccountChanges {
            balance: Some(0.0),
            ..Default::default()
        };
        let query = update_query(7, &changes);
        assert_eq!(query.sql(), "UPDATE accounts SET balance = $1 WHERE id = $2");
    }

    #[test]
    fn update_query_orders_assignments_by_column() {
        let changes = AccountChanges {
            display_name: Some("Bob".into()),
            login_id: None,
            password_hash: Some("$argon2id$...".into()),
            balance: Some(12.5),
        };
        let query = update_query(3, &changes);
        assert_eq!(
            query.sql(),
            "UPDATE accounts SET display_name = $1, password_hash = $2, balance = $3 WHERE id = $4"
        );
    }

    #[test]
    fn empty_changes_report_empty() {
        assert!(AccountChanges::default().is_empty());
        let with_balance = AccountChanges {
            balance: Some(0.0),
            ..Default::default()
        };
        assert!(!with_balance.is_empty());
    }

    #[test]
    fn account_serializes_with_camel_case_keys() {
        let account = Account {
            id: 1,
            display_name: "Bob".into(),
            login_id: "bob1".into(),
            password_hash: "$argon2id$...".into(),
            balance: 10.0,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["displayName"], "Bob");
        assert_eq!(json["loginId"], "bob1");
        assert_eq!(json["passwordHash"], "$argon2id$...");
        assert_eq!(json["balance"], 10.0);
    }
}
