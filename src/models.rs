use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize, Serialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub api: ApiConfig,
    pub admin: Credentials,
    /// Placeholder name -> user ID, for `people_in_charge` entries
    #[serde(default)]
    pub people: HashMap<String, String>,
    #[serde(default)]
    pub asociations: BTreeMap<String, NewAsociation>,
    #[serde(default)]
    pub activities: Vec<ActivitySeed>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub auth_header: AuthHeader,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthHeader {
    /// `X-API-Key: <token>`, what the service checks
    #[default]
    ApiKey,
    /// `Authorization: Bearer <token>`
    Bearer,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Login response. Everything past `id` and `token` is optional so older
/// servers still parse.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Session {
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub expires_at: Option<u64>,
    #[serde(default)]
    pub manager_of: Vec<String>,
    #[serde(default)]
    pub chair_of: Vec<String>,
    #[serde(default)]
    pub board_of: Vec<String>,
    #[serde(default)]
    pub member_of: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NewAsociation {
    pub short_name: String,
    pub long_name: String,
    pub email: String,
    pub description: String,
    pub is_public_joinable: bool,
    #[serde(default = "empty_object")]
    pub info: serde_json::Value,
}

/// An association as listed by the server. Only the keys the seeders need are
/// typed; the rest is kept for printing.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Asociation {
    pub id: String,
    pub short_name: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAccess {
    Public,
    Members,
    Board,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    False,
    Board,
    ViceChair,
    Chair,
}

/// One `[[activities]]` entry of the seed file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActivitySeed {
    /// Organizing associations, by short name
    pub asociations: Vec<String>,
    /// Placeholder names, see `SeedConfig::people`
    pub people_in_charge: Vec<String>,
    pub activity: ActivityTemplate,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActivityTemplate {
    pub name: String,
    pub description: String,
    pub room: String,
    pub days_from_now: i64,
    #[serde(default)]
    pub is_multi_session: bool,
    #[serde(default)]
    pub is_creditable: bool,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub is_accepted: bool,
    #[serde(default)]
    pub is_room_accepted: bool,
    #[serde(default)]
    pub is_media_accepted: bool,
    #[serde(default)]
    pub is_registration_needed: bool,
    pub access: ActivityAccess,
    #[serde(default = "empty_object")]
    pub additional_info: serde_json::Value,
}

/// The `activity` object sent to `POST /api/activities`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NaiveActivity {
    pub name: String,
    pub description: String,
    pub room: String,
    pub initial_date: String,
    pub is_multi_session: bool,
    pub is_creditable: bool,
    pub is_external: bool,
    pub is_accepted: bool,
    pub is_room_accepted: bool,
    pub is_media_accepted: bool,
    pub is_registration_needed: bool,
    pub access: ActivityAccess,
    pub additional_info: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewFullActivity {
    pub people_in_charge: Vec<String>,
    pub organizers: Vec<String>,
    pub activity: NaiveActivity,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MembershipRequest {
    pub user_id: String,
    pub asociation: String,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
