//! # Running Dry Is Not an Error
//!
//! With a small wallet the requested amount regularly exceeds the free cash.
//! The engine clips to what is available, and once the wallet is empty the
//! attempts quietly no-op until an exit replenishes it.

mod utils;

use dca_rs::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("dca_rs=trace").init();

    let bars = utils::generate_sample_bars(600, 3, 50.0);
    let initial_balance = 2_000.0;
    // an aggressive base: 15% of the wallet per period
    let base_cash = initial_balance.how_many(15.0);

    let config = ConfigBuilder::builder()
        .base_cash_per_period(base_cash)
        .ma_window(90)
        .investment_interval_days(10)
        .profit_target_pct(40.0)
        .exit_sell_ratio(1.0)
        .sizing(Sizing::Fractional)
        .build()?;

    let mut engine = Engine::new(config, SimBroker::new(initial_balance)?);
    engine.run(bars)?;

    // fractional sizing loses at most a fraction of a cent to rounding, so a
    // shortfall of a whole dollar means the wallet did the clipping
    let clipped = engine
        .investment_history()
        .filter(|i| i.amount < base_cash * i.multiplier - 1.0)
        .count();

    println!("{}", engine.summarize());
    println!("clipped periods {clipped} / {}", engine.investment_count());

    Ok(())
}
