//! Output formatting for CLI commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::domain::TradeRecord;
use crate::error::Result;
use crate::rl::environment::BacktestReport;

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct MetricRow {
    pub metric: String,
    pub value: String,
}

impl MetricRow {
    fn new(metric: &str, value: String) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}

/// One row per backtest metric
pub fn report_rows(report: &BacktestReport) -> Vec<MetricRow> {
    vec![
        MetricRow::new("total_reward", format!("{:.4}", report.total_reward)),
        MetricRow::new("win_rate", format!("{:.2}%", report.win_rate * 100.0)),
        MetricRow::new("max_drawdown", format!("{:.2}%", report.max_drawdown * 100.0)),
        MetricRow::new("final_balance", format!("{:.2}", report.final_balance)),
        MetricRow::new("num_trades", report.num_trades.to_string()),
        MetricRow::new("sharpe_ratio", format!("{:.4}", report.sharpe_ratio)),
        MetricRow::new("var_95", format!("{:.6}", report.var_95)),
    ]
}

#[derive(Debug, Serialize, Tabled)]
pub struct TradeRow {
    pub id: String,
    pub symbol: String,
    pub direction: String,
    pub amount: String,
    pub price: String,
    pub simulated: bool,
}

impl From<&TradeRecord> for TradeRow {
    fn from(trade: &TradeRecord) -> Self {
        Self {
            id: trade.id.to_string(),
            symbol: trade.symbol.clone(),
            direction: trade.direction.to_string(),
            amount: trade.amount.to_string(),
            price: trade.price.to_string(),
            simulated: trade.simulated,
        }
    }
}

/// Print a vec of Tabled + Serialize items in the chosen mode.
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(no results)");
            } else {
                let table = Table::new(items).to_string();
                println!("{table}");
            }
        }
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(items)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Print a single Serialize item as pretty JSON.
pub fn print_item<T: Serialize>(item: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_rows_cover_every_metric() {
        let report = BacktestReport {
            total_reward: 1.5,
            win_rate: 0.5,
            max_drawdown: 0.1,
            final_balance: 9_000.0,
            num_trades: 4,
            sharpe_ratio: 0.25,
            var_95: -0.01,
        };
        let rows = report_rows(&report);

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[1].value, "50.00%");
        assert_eq!(rows[4].value, "4");
    }
}
