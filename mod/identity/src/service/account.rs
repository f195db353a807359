use taskmarket_core::{new_id, now_rfc3339};
use taskmarket_sql::{Row, SQLError, Value};

use crate::model::{Account, Profile, PublicId, Role};
use crate::service::{IdentityError, IdentityService};

impl IdentityService {
    /// Look up an account by external provider identity, through the
    /// external-identity index.
    pub fn find_by_external_identity(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, IdentityError> {
        let rows = self.sql.query(
            "SELECT a.data FROM external_identities e \
             JOIN accounts a ON a.id = e.account_id \
             WHERE e.external_id = ?1",
            &[Value::Text(external_id.to_string())],
        )?;
        rows.first().map(row_to_account).transpose()
    }

    /// Look up an account by internal id.
    pub fn find_by_internal_id(&self, id: &str) -> Result<Option<Account>, IdentityError> {
        let rows = self.sql.query(
            "SELECT data FROM accounts WHERE id = ?1",
            &[Value::Text(id.to_string())],
        )?;
        rows.first().map(row_to_account).transpose()
    }

    /// Create a new pending account for an external identity.
    ///
    /// The account row and its index entry are written in one
    /// transaction. If a concurrent creator got there first, the UNIQUE
    /// constraint fires and the winner's account is returned instead —
    /// both callers observe the same record.
    pub fn create_from_external(
        &self,
        external_id: &str,
        profile: &Profile,
    ) -> Result<Account, IdentityError> {
        let now = now_rfc3339();
        let account = Account {
            id: new_id(),
            external_id: Some(external_id.to_string()),
            role: Role::Pending,
            profile: profile.clone(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let data = serde_json::to_string(&account)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        let insert = self.sql.exec_batch(&[
            (
                "INSERT INTO accounts (id, external_id, role, data, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    Value::Text(account.id.clone()),
                    Value::Text(external_id.to_string()),
                    Value::Text(account.role.as_str().to_string()),
                    Value::Text(data),
                    Value::Text(now.clone()),
                    Value::Text(now),
                ],
            ),
            (
                "INSERT INTO external_identities (external_id, account_id) VALUES (?1, ?2)",
                &[
                    Value::Text(external_id.to_string()),
                    Value::Text(account.id.clone()),
                ],
            ),
        ]);

        match insert {
            Ok(_) => Ok(account),
            Err(SQLError::UniqueViolation(_)) => self
                .find_by_external_identity(external_id)?
                .ok_or_else(|| {
                    IdentityError::Internal(format!(
                        "lost creation race for external identity '{}' but no winner found",
                        external_id
                    ))
                }),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge non-empty incoming profile fields over an account's
    /// current profile and bump `updated_at`.
    ///
    /// The record JSON is rewritten whole, so the write is guarded by
    /// the `updated_at` it was read with: a concurrent writer (a role
    /// assignment, another merge) invalidates the snapshot and the
    /// merge is redone against the fresh record instead of clobbering
    /// the other write.
    pub fn update_profile(
        &self,
        id: &str,
        incoming: &Profile,
    ) -> Result<Account, IdentityError> {
        loop {
            let mut account = self
                .find_by_internal_id(id)?
                .ok_or_else(|| IdentityError::NotFound(format!("account '{}'", id)))?;
            let read_at = account.updated_at.clone();

            account.profile.merge_from(incoming);
            account.updated_at = now_rfc3339();

            let data = serde_json::to_string(&account)
                .map_err(|e| IdentityError::Internal(e.to_string()))?;
            let affected = self.sql.exec(
                "UPDATE accounts SET data = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND updated_at = ?4",
                &[
                    Value::Text(data),
                    Value::Text(account.updated_at.clone()),
                    Value::Text(id.to_string()),
                    Value::Text(read_at),
                ],
            )?;
            if affected == 1 {
                return Ok(account);
            }
            // Another writer committed between our read and write.
            // Each miss means someone else made progress, so the retry
            // terminates.
        }
    }

    /// Resolve an external identity to its account, creating a pending
    /// account on first sight and refreshing the profile on every
    /// subsequent one. Safe under concurrent invocation for the same
    /// identity: the store's UNIQUE constraints guarantee one account.
    pub fn resolve_or_create(
        &self,
        external_id: &str,
        profile: &Profile,
    ) -> Result<Account, IdentityError> {
        if let Some(existing) = self.find_by_external_identity(external_id)? {
            return self.update_profile(&existing.id, profile);
        }
        self.create_from_external(external_id, profile)
    }

    /// Resolve a public identifier to an account.
    pub fn resolve_by_public_id(&self, public_id: &str) -> Result<Account, IdentityError> {
        let selector = PublicId::decode(public_id).ok_or_else(|| {
            IdentityError::InvalidIdentifier(format!("unrecognized identifier '{}'", public_id))
        })?;
        let found = match &selector {
            PublicId::External(ext) => self.find_by_external_identity(ext)?,
            PublicId::Internal(id) => self.find_by_internal_id(id)?,
        };
        found.ok_or_else(|| IdentityError::NotFound(format!("account '{}'", public_id)))
    }

    /// Resolve an ordered list of public identifiers (at most
    /// [`BATCH_LIMIT`]) in one lookup per address kind.
    ///
    /// Candidates are deduplicated case-insensitively preserving
    /// first-seen order; identifiers that decode to nothing or resolve
    /// to no account are silently omitted. The result keeps the
    /// caller's order.
    pub fn resolve_batch(&self, candidates: &[String]) -> Result<Vec<Account>, IdentityError> {
        if candidates.len() > BATCH_LIMIT {
            return Err(IdentityError::InvalidPayload(format!(
                "at most {} identifiers per batch lookup",
                BATCH_LIMIT
            )));
        }

        // Case-insensitive dedupe, first occurrence wins.
        let mut seen = std::collections::HashSet::new();
        let mut selectors = Vec::new();
        for candidate in candidates {
            let key = candidate.trim().to_ascii_lowercase();
            if key.is_empty() || !seen.insert(key) {
                continue;
            }
            if let Some(selector) = PublicId::decode(candidate) {
                selectors.push(selector);
            }
        }

        let externals: Vec<&str> = selectors
            .iter()
            .filter_map(|s| match s {
                PublicId::External(ext) => Some(ext.as_str()),
                PublicId::Internal(_) => None,
            })
            .collect();
        let internals: Vec<&str> = selectors
            .iter()
            .filter_map(|s| match s {
                PublicId::Internal(id) => Some(id.as_str()),
                PublicId::External(_) => None,
            })
            .collect();

        let mut by_external = std::collections::HashMap::new();
        for account in self.lookup_many(
            "SELECT a.data FROM external_identities e \
             JOIN accounts a ON a.id = e.account_id \
             WHERE e.external_id IN",
            &externals,
        )? {
            if let Some(ext) = account.external_id.clone() {
                by_external.insert(ext, account);
            }
        }

        let mut by_internal = std::collections::HashMap::new();
        for account in
            self.lookup_many("SELECT data FROM accounts WHERE id IN", &internals)?
        {
            by_internal.insert(account.id.clone(), account);
        }

        // Reassemble in the caller's (deduplicated) order.
        let mut result = Vec::new();
        for selector in &selectors {
            let account = match selector {
                PublicId::External(ext) => by_external.get(ext),
                PublicId::Internal(id) => by_internal.get(id),
            };
            if let Some(account) = account {
                result.push(account.clone());
            }
        }
        Ok(result)
    }

    /// Run one `IN`-list query for a partition of batch keys.
    fn lookup_many(&self, prefix: &str, keys: &[&str]) -> Result<Vec<Account>, IdentityError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: Vec<String> = (1..=keys.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!("{} ({})", prefix, placeholders.join(", "));
        let params: Vec<Value> = keys.iter().map(|k| Value::Text(k.to_string())).collect();

        let rows = self.sql.query(&sql, &params)?;
        rows.iter().map(row_to_account).collect()
    }
}

/// Maximum number of candidate identifiers per batch lookup.
pub const BATCH_LIMIT: usize = 200;

fn row_to_account(row: &Row) -> Result<Account, IdentityError> {
    let data = row
        .get_str("data")
        .ok_or_else(|| IdentityError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| IdentityError::Internal(e.to_string()))
}
