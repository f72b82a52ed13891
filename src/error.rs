use thiserror::Error;

/// 外部 AI 能力调用错误
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key not configured. Set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("empty response from model")]
    EmptyResponse,
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response does not match expected shape: {0}")]
    Schema(String),
}

/// 应用错误
#[derive(Debug, Error)]
pub enum AppError {
    /// 外部调用失败 (传输/解析/结构不符)
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("invalid import file: {0}")]
    InvalidImport(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<AiError> for AppError {
    fn from(e: AiError) -> Self {
        AppError::AnalysisFailed(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
