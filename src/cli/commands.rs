//! Command runners invoked by the binary.

use std::path::Path;

use tracing::info;

use super::output::{self, OutputMode, TradeRow};
use crate::analysis::TradeMetrics;
use crate::config::AppConfig;
use crate::domain::{generate_sample_series, MarketSeries};
use crate::error::{BitHunterError, Result};
use crate::exchange::build_executor;
use crate::rl::core::Action;
use crate::rl::environment::{BacktestEngine, TradingEnvironment};
use crate::rl::policy::{Policy, RandomPolicy};

/// Read a JSON array of `{price, volume, sentiment}` rows
pub fn load_series(path: &Path) -> Result<MarketSeries> {
    let raw = std::fs::read_to_string(path)?;
    let series = MarketSeries::from_json(&raw)?;
    info!("Loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

pub fn run_backtest(
    config: &AppConfig,
    data: &Path,
    actions: Option<&[Action]>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let series = load_series(data)?;
    let mut env = TradingEnvironment::new(&series, config.environment)?;

    let report = BacktestEngine::new(&mut env)
        .with_seed(seed.or(config.backtest.seed))
        .with_periods_per_year(config.backtest.periods_per_year)
        .run(actions);

    match OutputMode::from_json_flag(json) {
        OutputMode::Json => output::print_item(&report),
        OutputMode::Table => output::print_items(&output::report_rows(&report), OutputMode::Table),
    }
}

pub fn run_simulate(
    config: &AppConfig,
    data: &Path,
    steps: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let series = load_series(data)?;
    let mut env = TradingEnvironment::new(&series, config.environment)?;
    let mut policy = RandomPolicy::new(seed.or(config.backtest.seed));

    let mut observation = env.reset();
    println!("{}", env.render());

    let steps = steps.unwrap_or(env.max_steps());
    for step in 0..steps {
        let action = policy.act(&observation, step);
        let result = env.step(action);
        println!("action={} reward={:.4} | {}", action, result.reward, env.render());

        observation = result.observation;
        if result.done {
            break;
        }
    }
    Ok(())
}

pub fn run_sample(len: usize, volatility: f64, seed: Option<u64>, out: &Path) -> Result<()> {
    if len == 0 {
        return Err(BitHunterError::validation("sample length must be positive"));
    }
    if !(volatility.is_finite() && volatility >= 0.0) {
        return Err(BitHunterError::validation("volatility must be non-negative"));
    }

    let series = generate_sample_series(len, volatility, seed);
    let json = serde_json::to_string_pretty(&series.to_rows())?;
    std::fs::write(out, json)?;

    println!("Wrote {} samples to {}", series.len(), out.display());
    Ok(())
}

pub async fn run_trade(config: &AppConfig, action: Action) -> Result<()> {
    let executor = build_executor(&config.execution, None)?;

    match executor.execute(action).await? {
        Some(trade) => {
            output::print_items(&[TradeRow::from(&trade)], OutputMode::Table)?;
            let metrics = TradeMetrics::from_trades(&executor.trades().await)?;
            output::print_item(&metrics)?;
        }
        None => println!("hold: no order placed"),
    }
    Ok(())
}

pub fn show_config(config: &AppConfig) -> Result<()> {
    let rendered =
        toml::to_string_pretty(config).map_err(|e| BitHunterError::Other(e.into()))?;
    println!("{rendered}");
    Ok(())
}
