//! # Partial Exits with a Cooldown
//!
//! A fractional-unit variant: weekly deployments against a 60-day average,
//! selling half the position at +75% and then standing down for 30 days.

mod utils;

use dca_rs::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("dca_rs=debug").init();

    let bars = utils::generate_sample_bars(1000, 7, 80.0);
    let initial_balance = 10_000.0;

    let config = ConfigBuilder::builder()
        .base_cash_per_period(250.0)
        .ma_window(60)
        .investment_interval_days(7)
        .profit_target_pct(75.0)
        .exit_sell_ratio(0.5)
        .cooldown_days(30)
        .sizing(Sizing::Fractional)
        .build()?;

    let mut engine = Engine::new(config, SimBroker::new(initial_balance)?);
    engine.run(bars.clone())?;

    println!("{}", engine.summarize());

    for exit in engine.exit_history() {
        println!(
            "{}: sold {:.4} at {:.2} for {:.2} ({:+.1}%)",
            exit.date, exit.shares_sold, exit.price, exit.proceeds, exit.return_pct
        );
    }

    let last_price = bars.last().unwrap().close();
    let final_value = engine.broker().balance() + engine.position().value_at(last_price);
    println!("final value {final_value:.2}");

    Ok(())
}
