//! The fixed Steam tool catalog.
//!
//! Registration order is the order `tools/list` reports.

pub mod news;
pub mod stats;
pub mod store;
pub mod webapi;

use crate::registry::{RegistryError, ToolRegistry};

pub use news::GameNews;
pub use stats::{
    CurrentPlayers, GameSchema, GlobalAchievementPercentages, GlobalStatsForGame, PlayerAchievements,
    UserStatsForGame,
};
pub use store::AppDetails;
pub use webapi::SupportedApiList;

pub(crate) const APPID_DESCRIPTION: &str = "Steam application id, e.g. 570 for Dota 2";
pub(crate) const STEAMID_DESCRIPTION: &str = "64-bit Steam id of the player, as a string";

pub(crate) fn app_subject(appid: u64) -> String {
    format!("appid {appid}")
}

pub(crate) fn player_subject(steamid: &str, appid: u64) -> String {
    format!("steamid {steamid}, appid {appid}")
}

/// Build a registry holding every catalog tool
///
/// # Errors
///
/// Returns error if two catalog tools share a name
pub fn registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(CurrentPlayers)?;
    registry.register(AppDetails)?;
    registry.register(GameSchema)?;
    registry.register(GameNews)?;
    registry.register(PlayerAchievements)?;
    registry.register(UserStatsForGame)?;
    registry.register(GlobalStatsForGame)?;
    registry.register(SupportedApiList)?;
    registry.register(GlobalAchievementPercentages)?;
    Ok(registry)
}
