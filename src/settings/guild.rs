use serde::{Deserialize, Deserializer, Serialize};

use crate::threading::message::RawId;

/// Who may export conversations in one guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Role ids whose members are allowed
    #[serde(
        rename = "command_allowed_role_id",
        default,
        deserialize_with = "deserialize_ids"
    )]
    pub allowed_role_ids: Vec<String>,

    /// Individually allowed user ids
    #[serde(
        rename = "command_allowed_user_id",
        default,
        deserialize_with = "deserialize_ids"
    )]
    pub allowed_user_ids: Vec<String>,
}

impl GuildSettings {
    /// Build settings from comma-separated id lists, e.g. `"111,222"`
    ///
    /// Whitespace around ids is trimmed and empty entries are dropped, so an
    /// empty string means "none".
    pub fn from_id_lists(role_ids: &str, user_ids: &str) -> Self {
        GuildSettings {
            allowed_role_ids: split_id_list(role_ids),
            allowed_user_ids: split_id_list(user_ids),
        }
    }

    /// Whether a requester with these roles may run an export
    pub fn allows(&self, user_id: &str, role_ids: &[String]) -> bool {
        self.allowed_user_ids.iter().any(|id| id == user_id)
            || role_ids
                .iter()
                .any(|role| self.allowed_role_ids.contains(role))
    }
}

fn split_id_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

/// Accept ids written as JSON strings or bare integers
fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawId> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(RawId::into_string).collect())
}
