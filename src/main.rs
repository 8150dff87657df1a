use clap::Parser;
use pyramidbot::backtest::{MarketScenario, SimRunner, SyntheticBarGenerator};
use pyramidbot::strategy::MartingaleConfig;
use pyramidbot::Result;

/// Paper-trade the martingale breakout strategy over synthetic data
#[derive(Parser, Debug)]
#[command(name = "pyramidbot", version, about)]
struct Args {
    /// Market scenario to simulate
    #[arg(long, value_enum, default_value = "dip-and-recover")]
    scenario: MarketScenario,

    /// Number of fast (one-minute) bars to generate
    #[arg(long, default_value_t = 4000)]
    bars: usize,

    /// RNG seed for the synthetic data
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Deliver a slow bar every N fast bars
    #[arg(long, default_value_t = 15)]
    slow_every: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let args = Args::parse();
    let config = load_config();

    tracing::info!("📊 Strategy configuration:");
    tracing::info!("  Band: {} x {}", config.boll_window, config.boll_dev);
    tracing::info!("  Dump trigger: {}%", config.dump_trigger_pct * 100.0);
    tracing::info!("  Exit profit: {}%", config.exit_profit_pct * 100.0);
    tracing::info!(
        "  Sizing: {} x {}^k, max {} adds",
        config.initial_notional,
        config.size_multiplier,
        config.max_pyramid_count
    );
    tracing::info!(
        "🔄 Simulating {:?}: {} bars, slow every {}, seed {}",
        args.scenario,
        args.bars,
        args.slow_every,
        args.seed
    );

    let bars = SyntheticBarGenerator::new(args.seed).generate(args.scenario, args.bars);
    let mut runner = SimRunner::new(config, args.slow_every);
    let report = runner.run(&bars)?;

    tracing::info!(
        "✅ Run complete: {} buys, {} sells, realized profit {:.4}",
        report.buy_fills,
        report.sell_fills,
        report.realized_profit
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pyramidbot=info".into()),
        )
        .init();
}

/// Strategy parameters from the environment, falling back to the defaults
fn load_config() -> MartingaleConfig {
    let defaults = MartingaleConfig::default();
    MartingaleConfig {
        boll_window: env_or("BOLL_WINDOW", defaults.boll_window),
        boll_dev: env_or("BOLL_DEV", defaults.boll_dev),
        dump_trigger_pct: env_or("DUMP_TRIGGER_PCT", defaults.dump_trigger_pct),
        exit_profit_pct: env_or("EXIT_PROFIT_PCT", defaults.exit_profit_pct),
        initial_notional: env_or("INITIAL_NOTIONAL", defaults.initial_notional),
        size_multiplier: env_or("SIZE_MULTIPLIER", defaults.size_multiplier),
        max_pyramid_count: env_or("MAX_PYRAMID_COUNT", defaults.max_pyramid_count),
        fee_rate: env_or("FEE_RATE", defaults.fee_rate),
        min_notional: env_or("MIN_NOTIONAL", defaults.min_notional),
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
