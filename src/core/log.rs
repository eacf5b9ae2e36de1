//! Append-only audit trail of computation steps.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub step: String,
    pub description: String,
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CalculationLog {
    entries: Vec<LogEntry>,
}

impl CalculationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. Each entry is mirrored to the `log` facade at debug level.
    pub fn record<I, K>(&mut self, step: &str, description: &str, values: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let values: BTreeMap<String, Value> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        log::debug!("{} {}: {:?}", step, description, values);
        self.entries.push(LogEntry {
            step: step.to_string(),
            description: description.to_string(),
            values,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.step.as_str())
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_steps_in_order() {
        let mut log = CalculationLog::new();
        log.record("CALC-BP1-100", "transfer gain", [("transferGain", json!(100))]);
        log.record("CALC-DED-001", "basic deduction", [("total", json!(2500000))]);

        let steps: Vec<_> = log.steps().collect();
        assert_eq!(steps, ["CALC-BP1-100", "CALC-DED-001"]);
        assert_eq!(log.entries()[0].values["transferGain"], json!(100));
    }
}
