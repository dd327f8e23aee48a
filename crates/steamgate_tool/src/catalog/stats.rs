//! `ISteamUserStats` tools.

use super::{app_subject, player_subject, APPID_DESCRIPTION, STEAMID_DESCRIPTION};
use crate::invoke::{Invocation, SingleCall};
use crate::schema::{InputSchema, OutputSchema, ToolSchema};
use crate::signal::SuccessSignal;
use crate::trait_::ToolContract;
use crate::upstream::UpstreamRequest;
use crate::validate::{ArgObject, ValidationError};
use serde_json::{Value, json};

const CURRENT_PLAYERS_PATH: &str = "/ISteamUserStats/GetNumberOfCurrentPlayers/v1/";
const SCHEMA_PATH: &str = "/ISteamUserStats/GetSchemaForGame/v2/";
const PLAYER_ACHIEVEMENTS_PATH: &str = "/ISteamUserStats/GetPlayerAchievements/v1/";
const USER_STATS_PATH: &str = "/ISteamUserStats/GetUserStatsForGame/v2/";
const GLOBAL_STATS_PATH: &str = "/ISteamUserStats/GetGlobalStatsForGame/v1/";
const ACHIEVEMENT_PERCENTAGES_PATH: &str = "/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v2/";

/// Arguments keyed by a single application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppArgs {
    /// Application id
    pub appid: u64,
}

impl AppArgs {
    fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let args = ArgObject::parse(raw)?;
        Ok(Self {
            appid: args.required_u64("appid")?,
        })
    }
}

/// Arguments keyed by a player and an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAppArgs {
    /// 64-bit Steam id, as a string
    pub steamid: String,
    /// Application id
    pub appid: u64,
}

impl PlayerAppArgs {
    fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let args = ArgObject::parse(raw)?;
        Ok(Self {
            steamid: args.required_str("steamid")?,
            appid: args.required_u64("appid")?,
        })
    }

    fn request(&self, path: &'static str) -> UpstreamRequest {
        UpstreamRequest::api(path)
            .param("steamid", &self.steamid)
            .param("appid", self.appid)
            .subject(player_subject(&self.steamid, self.appid))
    }
}

fn app_input() -> InputSchema {
    InputSchema::new().required_integer("appid", APPID_DESCRIPTION)
}

fn player_input() -> InputSchema {
    InputSchema::new()
        .required_string("steamid", STEAMID_DESCRIPTION)
        .required_integer("appid", APPID_DESCRIPTION)
}

/// Number of players currently in a game
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentPlayers;

impl ToolContract for CurrentPlayers {
    type Args = AppArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("getCurrentPlayers", "Get the number of players currently in a game")
            .with_input(app_input())
            .with_output(OutputSchema::envelope(json!({
                "type": "object",
                "properties": {
                    "response": {
                        "type": "object",
                        "properties": {
                            "player_count": {"type": "integer"},
                            "result": {"type": "integer"},
                        },
                    },
                },
            })))
    }

    fn validate(&self, raw: &Value) -> Result<AppArgs, ValidationError> {
        AppArgs::parse(raw)
    }

    fn plan(&self, args: AppArgs) -> Invocation {
        Invocation::Single(SingleCall::new(
            UpstreamRequest::api(CURRENT_PLAYERS_PATH)
                .param("appid", args.appid)
                .subject(app_subject(args.appid)),
            SuccessSignal::result_code("/response/result", 1),
        ))
    }
}

/// Achievement and stat definitions of a game
#[derive(Debug, Clone, Copy, Default)]
pub struct GameSchema;

impl ToolContract for GameSchema {
    type Args = AppArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getGameSchema",
            "Get the achievement and stat definitions of a game",
        )
        .with_input(app_input())
        .with_output(OutputSchema::envelope(json!({
            "type": "object",
            "properties": {
                "game": {
                    "type": "object",
                    "properties": {
                        "gameName": {"type": "string"},
                        "gameVersion": {"type": "string"},
                        "availableGameStats": {"type": "object"},
                    },
                },
            },
            "required": ["game"],
        })))
    }

    fn validate(&self, raw: &Value) -> Result<AppArgs, ValidationError> {
        AppArgs::parse(raw)
    }

    fn plan(&self, args: AppArgs) -> Invocation {
        Invocation::Single(SingleCall::new(
            UpstreamRequest::api(SCHEMA_PATH)
                .param("appid", args.appid)
                .subject(app_subject(args.appid)),
            SuccessSignal::field("game"),
        ))
    }
}

/// A player's unlocked achievements in one game
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerAchievements;

impl ToolContract for PlayerAchievements {
    type Args = PlayerAppArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getPlayerAchievements",
            "Get a player's achievements for a game; the profile must be public",
        )
        .with_input(player_input())
        .with_output(OutputSchema::envelope(json!({
            "type": "object",
            "properties": {
                "playerstats": {
                    "type": "object",
                    "properties": {
                        "steamID": {"type": "string"},
                        "gameName": {"type": "string"},
                        "achievements": {"type": "array"},
                        "success": {"type": "boolean"},
                    },
                },
            },
        })))
    }

    fn validate(&self, raw: &Value) -> Result<PlayerAppArgs, ValidationError> {
        PlayerAppArgs::parse(raw)
    }

    fn plan(&self, args: PlayerAppArgs) -> Invocation {
        Invocation::Single(SingleCall::new(
            args.request(PLAYER_ACHIEVEMENTS_PATH),
            SuccessSignal::flag("/playerstats/success"),
        ))
    }
}

/// A player's stats in one game
#[derive(Debug, Clone, Copy, Default)]
pub struct UserStatsForGame;

impl ToolContract for UserStatsForGame {
    type Args = PlayerAppArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getUserStatsForGame",
            "Get a player's stats and achievements for a game; the profile must be public",
        )
        .with_input(player_input())
        .with_output(OutputSchema::envelope(json!({
            "type": "object",
            "properties": {
                "playerstats": {
                    "type": "object",
                    "properties": {
                        "steamID": {"type": "string"},
                        "gameName": {"type": "string"},
                        "stats": {"type": "array"},
                        "achievements": {"type": "array"},
                    },
                },
            },
            "required": ["playerstats"],
        })))
    }

    fn validate(&self, raw: &Value) -> Result<PlayerAppArgs, ValidationError> {
        PlayerAppArgs::parse(raw)
    }

    fn plan(&self, args: PlayerAppArgs) -> Invocation {
        Invocation::Single(SingleCall::new(
            args.request(USER_STATS_PATH),
            SuccessSignal::field("playerstats"),
        ))
    }
}

/// Arguments of [`GlobalStatsForGame`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStatsArgs {
    /// Application id
    pub appid: u64,
    /// Aggregated stat names
    pub stat_names: Vec<String>,
    /// Start of the aggregation window, unix seconds
    pub start_date: Option<u64>,
    /// End of the aggregation window, unix seconds
    pub end_date: Option<u64>,
}

/// Aggregated values of global stats
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalStatsForGame;

impl ToolContract for GlobalStatsForGame {
    type Args = GlobalStatsArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getGlobalStatsForGame",
            "Get aggregated values of global stats for a game; only stats flagged as global upstream are available",
        )
        .with_input(
            app_input()
                .required_string_array("stat_names", "Names of the global stats to fetch", 1)
                .optional_integer("start_date", "Start of the aggregation window, unix seconds", None)
                .optional_integer("end_date", "End of the aggregation window, unix seconds", None),
        )
        .with_output(OutputSchema::envelope(json!({
            "type": "object",
            "properties": {
                "response": {
                    "type": "object",
                    "properties": {
                        "globalstats": {"type": "object"},
                        "result": {"type": "integer"},
                    },
                },
            },
        })))
    }

    fn validate(&self, raw: &Value) -> Result<GlobalStatsArgs, ValidationError> {
        let args = ArgObject::parse(raw)?;
        Ok(GlobalStatsArgs {
            appid: args.required_u64("appid")?,
            stat_names: args.required_str_list("stat_names", 1)?,
            start_date: args.optional_u64("start_date")?,
            end_date: args.optional_u64("end_date")?,
        })
    }

    fn plan(&self, args: GlobalStatsArgs) -> Invocation {
        Invocation::Single(SingleCall::new(
            UpstreamRequest::api(GLOBAL_STATS_PATH)
                .param("appid", args.appid)
                .param("count", args.stat_names.len())
                .indexed("name", &args.stat_names)
                .param_opt("startdate", args.start_date)
                .param_opt("enddate", args.end_date)
                .subject(app_subject(args.appid)),
            SuccessSignal::result_code("/response/result", 1),
        ))
    }
}

/// Unlock percentage of every achievement of a game
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalAchievementPercentages;

impl ToolContract for GlobalAchievementPercentages {
    type Args = AppArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getGlobalAchievementPercentages",
            "Get the global unlock percentage of every achievement of a game",
        )
        .with_input(app_input())
        .with_output(OutputSchema::envelope(json!({
            "type": "object",
            "properties": {
                "achievementpercentages": {
                    "type": "object",
                    "properties": {
                        "achievements": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": {"type": "string"},
                                    "percent": {"type": "number"},
                                },
                            },
                        },
                    },
                },
            },
            "required": ["achievementpercentages"],
        })))
    }

    fn validate(&self, raw: &Value) -> Result<AppArgs, ValidationError> {
        AppArgs::parse(raw)
    }

    fn plan(&self, args: AppArgs) -> Invocation {
        // upstream names this parameter `gameid`
        Invocation::Single(SingleCall::new(
            UpstreamRequest::api(ACHIEVEMENT_PERCENTAGES_PATH)
                .param("gameid", args.appid)
                .subject(app_subject(args.appid)),
            SuccessSignal::field("achievementpercentages"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(invocation: Invocation) -> SingleCall {
        match invocation {
            Invocation::Single(call) => call,
            Invocation::FanOut(_) => panic!("expected a single call"),
        }
    }

    #[test]
    fn test_current_players_plan() {
        let args = CurrentPlayers.validate(&json!({"appid": 570})).unwrap();
        let call = single(CurrentPlayers.plan(args));
        assert_eq!(call.request.path, CURRENT_PLAYERS_PATH);
        assert_eq!(call.request.query, vec![("appid".to_string(), "570".to_string())]);
        assert_eq!(call.request.subject.as_deref(), Some("appid 570"));
        assert!(call.request.authenticated);
    }

    #[test]
    fn test_player_tools_keep_steamid_as_string() {
        let raw = json!({"steamid": "76561197960435530", "appid": 440});
        let args = PlayerAchievements.validate(&raw).unwrap();
        let call = single(PlayerAchievements.plan(args));
        assert_eq!(call.request.query_value("steamid"), Some("76561197960435530"));
        assert_eq!(call.signal, SuccessSignal::flag("/playerstats/success"));

        // numeric steamids are rejected; they exceed the safe integer range of many callers
        assert!(UserStatsForGame.validate(&json!({"steamid": 76561197960435530u64, "appid": 440})).is_err());
    }

    #[test]
    fn test_global_stats_mapping() {
        let raw = json!({
            "appid": 550,
            "stat_names": ["global.map.emp_isle", "global.map.mid"],
            "end_date": 1700000000,
        });
        let args = GlobalStatsForGame.validate(&raw).unwrap();
        let call = single(GlobalStatsForGame.plan(args));
        let query: Vec<(&str, &str)> = call
            .request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            query,
            vec![
                ("appid", "550"),
                ("count", "2"),
                ("name[0]", "global.map.emp_isle"),
                ("name[1]", "global.map.mid"),
                ("enddate", "1700000000"),
            ]
        );
    }

    #[test]
    fn test_global_stats_rejects_empty_and_null() {
        assert!(GlobalStatsForGame.validate(&json!({"appid": 550, "stat_names": []})).is_err());
        assert!(
            GlobalStatsForGame
                .validate(&json!({"appid": 550, "stat_names": ["a"], "start_date": null}))
                .is_err()
        );
    }

    #[test]
    fn test_achievement_percentages_renames_appid() {
        let args = GlobalAchievementPercentages.validate(&json!({"appid": 440})).unwrap();
        let call = single(GlobalAchievementPercentages.plan(args));
        assert_eq!(call.request.query_value("gameid"), Some("440"));
        assert_eq!(call.request.query_value("appid"), None);
    }

    #[test]
    fn test_schema_signal_is_game_field() {
        let args = GameSchema.validate(&json!({"appid": 440, "extra": true})).unwrap();
        let call = single(GameSchema.plan(args));
        assert_eq!(call.signal, SuccessSignal::field("game"));
    }
}
