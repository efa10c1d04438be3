use std::path::Path;

use crate::config::ResolvedConfig;

pub fn config_output(config_path: &Path, config: &ResolvedConfig) -> serde_json::Value {
    serde_json::json!({
        "config_file": config_path.display().to_string(),
        "data_directory": config.data_dir.display().to_string(),
        "display": {
            "currency_decimals": config.display.currency_decimals,
            "currency_symbol": config.display.currency_symbol,
            "currency_grouping": config.display.currency_grouping,
        },
        "ledger": {
            "seed_months": config.ledger.seed_months,
        }
    })
}
