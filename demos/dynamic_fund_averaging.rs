//! # Dynamic Fund Averaging
//!
//! The reference policy: every 14 days deploy a deviation-scaled slice of
//! $500, liquidate the whole position once it is up 50%.

mod utils;

use dca_rs::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("dca_rs=debug").init();

    let bars = utils::generate_sample_bars(1000, 42, 100.0);
    let initial_balance = 10_000.0;

    let config = ConfigBuilder::builder()
        .base_cash_per_period(500.0)
        .ma_window(120)
        .investment_interval_days(14)
        .profit_target_pct(50.0)
        .exit_sell_ratio(1.0)
        .build()?;

    let mut engine = Engine::new(config, SimBroker::new(initial_balance)?);
    engine.run(bars.clone())?;

    println!("{}", engine.summarize());

    let last_price = bars.last().unwrap().close();
    let final_value = engine.broker().balance() + engine.position().value_at(last_price);
    let perf = initial_balance.change(final_value);
    println!("final value {final_value:.2} ({perf:.2}%)");

    let first_price = bars.first().unwrap().close();
    let buy_and_hold = (initial_balance / first_price) * last_price;
    let buy_and_hold_perf = first_price.change(last_price);
    println!("buy and hold {buy_and_hold:.2} ({buy_and_hold_perf:.2}%)");

    Ok(())
}
