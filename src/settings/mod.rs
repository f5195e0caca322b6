//! Guild-scoped export permissions
//!
//! Each guild has an allow-list of role ids and user ids that may run an
//! export. Guilds without an entry allow nobody. The allow-lists live behind
//! the `SettingsRepository` trait; `JsonFileSettingsRepository` persists them
//! as a JSON object keyed by guild id:
//!
//! ```text
//! {
//!   "123456": {
//!     "command_allowed_role_id": ["111", "222"],
//!     "command_allowed_user_id": ["333"]
//!   }
//! }
//! ```

pub mod error;
pub mod guild;
pub mod repository;

pub use error::{SettingsError, SettingsResult};
pub use guild::GuildSettings;
pub use repository::{InMemorySettingsRepository, JsonFileSettingsRepository, SettingsRepository};
