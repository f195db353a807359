use serde::{Deserialize, Serialize};

/// An account's role. Assigned exactly once: `pending` is the initial
/// state, `customer` and `executor` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pending,
    Customer,
    Executor,
}

impl Role {
    /// Parse a role requested by a client. Only the two assignable
    /// roles are accepted — `pending` cannot be requested.
    pub fn parse_assignable(s: &str) -> Option<Role> {
        match s {
            "customer" => Some(Role::Customer),
            "executor" => Some(Role::Executor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pending => "pending",
            Role::Customer => "customer",
            Role::Executor => "executor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile fields carried by a login assertion. All optional; merged
/// field-by-field so an absent or empty incoming value never clobbers
/// a value we already hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Profile {
    /// Merge incoming fields over this profile. A field is taken from
    /// `incoming` only when it is present and non-empty.
    pub fn merge_from(&mut self, incoming: &Profile) {
        merge_field(&mut self.first_name, &incoming.first_name);
        merge_field(&mut self.last_name, &incoming.last_name);
        merge_field(&mut self.username, &incoming.username);
        merge_field(&mut self.photo_url, &incoming.photo_url);
    }
}

fn merge_field(existing: &mut Option<String>, incoming: &Option<String>) {
    if let Some(v) = incoming {
        if !v.is_empty() {
            *existing = Some(v.clone());
        }
    }
}

/// The durable internal account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Internal account id (UUIDv4, no dashes). Never reused or changed.
    pub id: String,

    /// External provider identity, present for accounts created via the
    /// verified-assertion flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Current role. Once not `pending`, never reverts.
    pub role: Role,

    /// Mutable profile fields, last-write-wins at record granularity.
    #[serde(flatten)]
    pub profile: Profile,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp, bumped on every mutation.
    pub updated_at: String,
}

/// The wire representation of an account: addressed by its public
/// identifier, with the internal id exposed as a string alongside.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: String,
    pub role: Role,
    pub external_identity: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
    pub internal_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        AccountView {
            id: crate::model::encode_public_id(account),
            role: account.role,
            external_identity: account.external_id.clone(),
            profile: account.profile.clone(),
            internal_id: account.id.clone(),
            created_at: account.created_at.clone(),
            updated_at: account.updated_at.clone(),
        }
    }
}
