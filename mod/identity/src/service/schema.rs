use taskmarket_sql::SQLStore;

use crate::service::IdentityError;

/// Initialize the SQLite schema for the identity store.
///
/// Two logical tables, kept consistent on every write: `accounts`
/// keyed by internal id, and the `external_identities` index keyed by
/// external identity. The UNIQUE constraints on both sides enforce the
/// bijection — at most one internal account per external identity.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), IdentityError> {
    let statements = [
        // Accounts table: the durable internal identity.
        "CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            external_id TEXT UNIQUE,
            role TEXT NOT NULL DEFAULT 'pending',
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_accounts_role ON accounts(role)",

        // External identity index: provider identity -> internal account.
        "CREATE TABLE IF NOT EXISTS external_identities (
            external_id TEXT PRIMARY KEY,
            account_id TEXT NOT NULL UNIQUE,
            FOREIGN KEY (account_id) REFERENCES accounts(id)
        )",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
    }

    Ok(())
}
