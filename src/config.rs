use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Shorter codes leave too few combinations for live rooms
pub const MIN_ROOM_CODE_LENGTH: usize = 4;

pub const DEFAULT_JUDGE_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:streamGenerateContent";

/// Rules applied to every room created by this server
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_players: usize,
    pub min_players_to_start: usize,
    pub room_code_length: usize,
    pub round_duration_seconds: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: 6,
            min_players_to_start: 2,
            room_code_length: 6,
            round_duration_seconds: 100,
        }
    }
}

/// Settings for the external judging provider
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Upper bound for a single judge request
    pub request_timeout: Duration,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_JUDGE_API_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// CORS origins; an empty list allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub judge: JudgeConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Builds the configuration from `DRAWDUEL_*` environment variables,
    /// falling back to defaults for anything missing or invalid
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();

        let game = validated_game(GameConfig {
            max_players: parse_or(&lookup, "DRAWDUEL_MAX_PLAYERS", defaults.game.max_players),
            min_players_to_start: parse_or(
                &lookup,
                "DRAWDUEL_MIN_PLAYERS",
                defaults.game.min_players_to_start,
            ),
            room_code_length: parse_or(
                &lookup,
                "DRAWDUEL_ROOM_CODE_LENGTH",
                defaults.game.room_code_length,
            ),
            round_duration_seconds: parse_or(
                &lookup,
                "DRAWDUEL_ROUND_DURATION_SECONDS",
                defaults.game.round_duration_seconds,
            ),
        });

        let judge = JudgeConfig {
            api_url: lookup("DRAWDUEL_JUDGE_API_URL").unwrap_or(defaults.judge.api_url),
            api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DRAWDUEL_JUDGE_TIMEOUT_SECONDS",
                defaults.judge.request_timeout.as_secs(),
            )),
        };

        let server = ServerConfig {
            bind_addr: lookup("DRAWDUEL_BIND_ADDR").unwrap_or(defaults.server.bind_addr),
            allowed_origins: lookup("DRAWDUEL_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        Self {
            game,
            judge,
            server,
        }
    }
}

/// Replaces settings that would make rooms unusable with their defaults
fn validated_game(mut game: GameConfig) -> GameConfig {
    let defaults = GameConfig::default();

    if game.max_players == 0
        || game.min_players_to_start == 0
        || game.min_players_to_start > game.max_players
    {
        warn!(
            max_players = game.max_players,
            min_players_to_start = game.min_players_to_start,
            "Player limits cannot be satisfied, using defaults"
        );
        game.max_players = defaults.max_players;
        game.min_players_to_start = defaults.min_players_to_start;
    }

    if game.room_code_length < MIN_ROOM_CODE_LENGTH {
        warn!(
            room_code_length = game.room_code_length,
            minimum = MIN_ROOM_CODE_LENGTH,
            "Room code length too short, using default"
        );
        game.room_code_length = defaults.room_code_length;
    }

    game
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, value = %raw, default = %default, "Invalid config value, using default");
                default
            }
        },
    }
}
