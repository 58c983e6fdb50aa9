use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerConfig {
    /// OS thread name, shows up in debuggers and panic messages.
    pub thread_name: String,
    /// Runs slower than this are logged at `warn`. `None` disables the check.
    pub frame_budget_ms: Option<u64>,
}

impl WorkerConfig {
    pub fn frame_budget(&self) -> Option<Duration> {
        self.frame_budget_ms.map(Duration::from_millis)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: "framegrade-worker".into(),
            frame_budget_ms: Some(33),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: WorkerConfig = serde_json::from_str(r#"{"frameBudgetMs": 16}"#).unwrap();
        assert_eq!(cfg.thread_name, "framegrade-worker");
        assert_eq!(cfg.frame_budget(), Some(Duration::from_millis(16)));
    }

    #[test]
    fn budget_can_be_disabled() {
        let cfg: WorkerConfig = serde_json::from_str(r#"{"frameBudgetMs": null}"#).unwrap();
        assert_eq!(cfg.frame_budget(), None);
    }
}
