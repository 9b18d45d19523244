//! Rule table loading. Without `THREEUP_RULES_PATH` the classic table is used.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::rules::RuleTable;
use crate::error::AppError;

/// Load and validate a JSON rule table. Missing fields take classic values.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleTable, AppError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("cannot read rules {}: {e}", path.display())))?;
    let rules: RuleTable = serde_json::from_str(&raw)
        .map_err(|e| AppError::config(format!("invalid rules {}: {e}", path.display())))?;
    rules
        .validate()
        .map_err(|e| AppError::config(format!("rules {} rejected: {e}", path.display())))?;
    info!(path = %path.display(), hand_size = rules.hand_size, "Loaded rule table");
    Ok(rules)
}

pub fn rules_from_env(rules_path: Option<&str>) -> Result<RuleTable, AppError> {
    match rules_path {
        Some(path) => load_rules(path),
        None => Ok(RuleTable::classic()),
    }
}
