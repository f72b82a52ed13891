use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 费率库 JSON 文件路径
    pub path: String,
    /// 文件不存在时是否写入内置费率表
    pub seed_if_missing: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

// api_key 不能出现在启动日志里
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CATALOG_PATH: &str = "smart_rate_store_v3.json";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            catalog: CatalogConfig {
                path: DEFAULT_CATALOG_PATH.to_string(),
                seed_if_missing: true,
            },
            ai: AiConfig {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            },
            catalog: CatalogConfig {
                path: std::env::var("CATALOG_PATH")
                    .unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string()),
                seed_if_missing: std::env::var("CATALOG_SEED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
            },
            ai: AiConfig {
                api_key: std::env::var("GEMINI_API_KEY")
                    .or_else(|_| std::env::var("API_KEY"))
                    .ok(),
                model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                base_url: std::env::var("GEMINI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
                timeout_secs: std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    /// 分层加载: 默认值 -> 可选 smartrate.toml -> SMARTRATE__* 环境变量
    ///
    /// 例如 `SMARTRATE__SERVER__PORT=9000`
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = Self::from_env();
        let settings = config::Config::builder()
            .set_default("server.host", env.server.host)?
            .set_default("server.port", env.server.port as i64)?
            .set_default("catalog.path", env.catalog.path)?
            .set_default("catalog.seed_if_missing", env.catalog.seed_if_missing)?
            .set_default("ai.api_key", env.ai.api_key)?
            .set_default("ai.model", env.ai.model)?
            .set_default("ai.base_url", env.ai.base_url)?
            .set_default("ai.timeout_secs", env.ai.timeout_secs as i64)?
            .add_source(config::File::with_name("smartrate").required(false))
            .add_source(config::Environment::with_prefix("SMARTRATE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
