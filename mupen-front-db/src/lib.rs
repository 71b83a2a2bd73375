pub mod cheats;
pub mod config;
pub mod database;
pub mod detail;
pub mod error;

pub use cheats::{Cheat, CheatCode, CheatFile, CheatOption, CheatSection};
pub use config::{ConfigFile, ConfigSection, SECTIONLESS_NAME};
pub use database::{AmbiguityPolicy, CrcLookup, Resolution, RomDatabase};
pub use detail::RomDetail;
pub use error::DbError;
