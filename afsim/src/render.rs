use aam_engine::PoolHealth;
use aggregations::{AggregateReport, OrderReport, PageInfo};
use core_types::{AamPool, OrderDailyDetail, SimulationConfig, StakingOrder};
use ledger::{OrderReceipt, SimulationState};

pub fn state(state: &SimulationState) {
    config(&state.config);
    println!();
    pool(&state.pool, &state.config);
    println!();
    orders(state);
}

pub fn config(config: &SimulationConfig) {
    println!(
        "Starting pool: {:.2} USDC / {:.2} AF (price {:.6})",
        config.initial_lp_usdc,
        config.initial_lp_af,
        config.initial_price()
    );
    println!(
        "Deposit split: {:.2}% to LP, {:.2}% to buyback",
        config.deposit_lp_ratio, config.deposit_buyback_ratio
    );
    for package in &config.package_configs {
        println!(
            "  tier {}: withdraw {:.1}% / keep {:.1}% / convert {:.1}%",
            package.tier,
            package.release_withdraw_percent,
            package.release_keep_percent,
            package.release_convert_percent
        );
    }
}

pub fn pool(pool: &AamPool, config: &SimulationConfig) {
    let health = PoolHealth::measure(pool, config);
    println!(
        "Pool: {:.4} USDC / {:.4} AF, price {:.6} ({:+.2}%), lp {:.4}",
        pool.usdc_balance, pool.af_balance, pool.af_price, health.price_change_pct, pool.lp_tokens
    );
    println!(
        "Buybacks: {:.4} USDC total, {:.2}% of starting AF removed, {:.4} AF headroom",
        pool.total_buyback, health.af_depleted_pct, health.buyback_headroom
    );
}

fn orders(state: &SimulationState) {
    let ledger = &state.orders;
    if ledger.is_empty() {
        println!("No orders.");
        return;
    }
    println!(
        "{} orders, {:.2} USDC deposited",
        ledger.len(),
        ledger.total_deposited()
    );
    for order in ledger.list() {
        println!("  {}", describe_order(order));
    }
}

fn describe_order(order: &StakingOrder) -> String {
    let term = match (order.duration_days, order.package_tier) {
        (Some(days), _) => format!("{days} days"),
        (None, Some(tier)) => format!("tier {tier}"),
        (None, None) => "-".to_string(),
    };
    format!(
        "{} {:>12.2} {:<8} {:<8} from day {}",
        order.id,
        order.amount,
        order.mode.label(),
        term,
        order.start_day
    )
}

pub fn receipt(receipt: &OrderReceipt) {
    let outcome = &receipt.outcome;
    println!("Order {} accepted", receipt.id);
    println!(
        "  {:.4} USDC to LP, {:.4} USDC to buyback ({:.4} spent for {:.4} AF)",
        outcome.to_lp, outcome.to_buyback, outcome.buyback_usdc, outcome.af_bought
    );
    if outcome.unspent_buyback() > 0.0 {
        println!(
            "  {:.4} USDC of buyback unspent; pool is at its AF floor",
            outcome.unspent_buyback()
        );
    }
}

pub fn aggregate_report(report: &AggregateReport) {
    println!("Aggregate release across {} orders", report.order_count);
    rows(&report.page, &report.rows);
    summaries(&report.page_summary, &report.total_summary);
}

pub fn order_report(report: &OrderReport) {
    println!("Release schedule for order {}", report.order_id);
    rows(&report.page, &report.rows);
    summaries(&report.page_summary, &report.total_summary);
}

fn rows(page: &PageInfo, rows: &[OrderDailyDetail]) {
    println!(
        "Page {} of {} (rows {}-{} of {})",
        page.index + 1,
        page.page_count.max(1),
        page.first_row(),
        page.last_row(),
        page.total_rows
    );
    println!(
        "{:>5} {:>12} {:>12} {:>12} {:>10} {:>14} {:>14} {:>12} {:>12} {:>12} {:>10}",
        "day",
        "principal",
        "interest",
        "af release",
        "af price",
        "cum af",
        "af in system",
        "trading cap",
        "forex",
        "withdrawn",
        "fee"
    );
    for row in rows {
        line(&row.day.to_string(), row);
    }
}

fn summaries(page: &OrderDailyDetail, total: &OrderDailyDetail) {
    line("page", page);
    line("total", total);
}

fn line(label: &str, row: &OrderDailyDetail) {
    println!(
        "{:>5} {:>12.4} {:>12.4} {:>12.4} {:>10.6} {:>14.4} {:>14.4} {:>12.4} {:>12.4} {:>12.4} {:>10.4}",
        label,
        row.principal_release,
        row.interest_release,
        row.daily_af_release,
        row.af_price,
        row.cum_af_released,
        row.af_in_system,
        row.trading_capital,
        row.forex_income,
        row.withdrawn_af,
        row.withdraw_fee
    );
}
