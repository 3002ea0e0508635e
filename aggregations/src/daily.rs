use core_types::OrderDailyDetail;
use log::debug;

/// Folds every order's daily series into one row per day `1..=total_days`.
///
/// Flow fields and the per-order stocks (`cum_af_released`, `af_in_system`)
/// are summed. `af_price` is overwritten by each contributing record in
/// iteration order, so a day carries the price of the last order that has a
/// row for it. Records outside the horizon are skipped.
pub fn aggregate_all_orders(
    per_order: &[Vec<OrderDailyDetail>],
    total_days: u32,
) -> Vec<OrderDailyDetail> {
    let mut rows: Vec<OrderDailyDetail> = (1..=total_days).map(OrderDailyDetail::zeroed).collect();
    let mut skipped = 0usize;
    for details in per_order {
        for detail in details {
            if detail.day == 0 || detail.day > total_days {
                skipped += 1;
                continue;
            }
            let row = &mut rows[(detail.day - 1) as usize];
            add_flows(row, detail);
            row.cum_af_released += detail.cum_af_released;
            row.af_in_system += detail.af_in_system;
            row.af_price = detail.af_price;
        }
    }
    if skipped > 0 {
        debug!("skipped {} detail rows outside days 1..={}", skipped, total_days);
    }
    rows
}

/// Collapses a window of rows into a single record.
///
/// Flows are summed. Stocks and the price are read at the last row; `day` is
/// the last row's day. An empty window yields a zeroed record for day 0.
pub fn compute_summary(rows: &[OrderDailyDetail]) -> OrderDailyDetail {
    let Some(last) = rows.last() else {
        return OrderDailyDetail::default();
    };
    let mut summary = OrderDailyDetail {
        day: last.day,
        cum_af_released: last.cum_af_released,
        af_in_system: last.af_in_system,
        af_price: last.af_price,
        ..Default::default()
    };
    for row in rows {
        add_flows(&mut summary, row);
    }
    summary
}

fn add_flows(into: &mut OrderDailyDetail, from: &OrderDailyDetail) {
    into.principal_release += from.principal_release;
    into.interest_release += from.interest_release;
    into.daily_af_release += from.daily_af_release;
    into.trading_capital += from.trading_capital;
    into.forex_income += from.forex_income;
    into.withdrawn_af += from.withdrawn_af;
    into.withdraw_fee += from.withdraw_fee;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, release: f64, cum: f64, price: f64) -> OrderDailyDetail {
        OrderDailyDetail {
            day,
            principal_release: release,
            daily_af_release: release * 10.0,
            cum_af_released: cum,
            af_in_system: 1_000.0 - cum,
            af_price: price,
            withdraw_fee: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn zero_orders_yield_zeroed_horizon() {
        let rows = aggregate_all_orders(&[], 45);
        assert_eq!(rows.len(), 45);
        for (idx, row) in rows.iter().enumerate() {
            assert_eq!(*row, OrderDailyDetail::zeroed(idx as u32 + 1));
        }
    }

    #[test]
    fn flows_and_stocks_sum_across_orders() {
        let a = vec![row(1, 10.0, 100.0, 0.1), row(2, 10.0, 200.0, 0.1)];
        let b = vec![row(2, 5.0, 50.0, 0.2)];
        let rows = aggregate_all_orders(&[a, b], 3);

        assert_eq!(rows[0].principal_release, 10.0);
        assert_eq!(rows[1].principal_release, 15.0);
        assert_eq!(rows[1].daily_af_release, 150.0);
        assert_eq!(rows[1].cum_af_released, 250.0);
        assert_eq!(rows[1].af_in_system, 800.0 + 950.0);
        assert_eq!(rows[1].withdraw_fee, 1.0);
        assert_eq!(rows[2], OrderDailyDetail::zeroed(3));
    }

    #[test]
    fn price_is_last_order_written() {
        let a = vec![row(1, 1.0, 1.0, 0.10)];
        let b = vec![row(1, 1.0, 1.0, 0.30)];
        let c = vec![row(1, 1.0, 1.0, 0.20)];

        let rows = aggregate_all_orders(&[a.clone(), b.clone(), c.clone()], 1);
        assert_eq!(rows[0].af_price, 0.20);

        let rows = aggregate_all_orders(&[c, a, b], 1);
        assert_eq!(rows[0].af_price, 0.30);
    }

    #[test]
    fn out_of_horizon_rows_are_ignored() {
        let a = vec![row(0, 9.0, 9.0, 9.0), row(2, 1.0, 1.0, 0.1), row(8, 9.0, 9.0, 9.0)];
        let rows = aggregate_all_orders(&[a], 3);
        let total: f64 = rows.iter().map(|r| r.principal_release).sum();
        assert_eq!(total, 1.0);
        assert_eq!(rows.iter().map(|r| r.day).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn summary_reads_stocks_at_last_row() {
        let rows = vec![
            row(4, 10.0, 100.0, 0.10),
            row(5, 20.0, 300.0, 0.12),
            row(6, 30.0, 600.0, 0.15),
        ];
        let summary = compute_summary(&rows);
        assert_eq!(summary.day, 6);
        assert_eq!(summary.principal_release, 60.0);
        assert_eq!(summary.daily_af_release, 600.0);
        assert_eq!(summary.withdraw_fee, 1.5);
        assert_eq!(summary.cum_af_released, 600.0);
        assert_eq!(summary.af_in_system, 400.0);
        assert_eq!(summary.af_price, 0.15);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        assert_eq!(compute_summary(&[]), OrderDailyDetail::default());
    }
}
