use crate::app::Console;
use crate::errors::AppResult;
use crate::models::log::LogEntry;

impl Console {
    pub async fn system_logs(&self) -> AppResult<Vec<LogEntry>> {
        self.fetch("logs").await
    }

    pub async fn my_logs(&self) -> AppResult<Vec<LogEntry>> {
        self.fetch("logs/mine").await
    }
}
