use core_types::{OrderDailyDetail, StakingOrder};
use serde::Serialize;

use crate::{
    daily::{aggregate_all_orders, compute_summary},
    paging::{paginate, PageInfo},
    schedule::{collect_order_details, ReleaseSchedule},
    AggregationError,
};

/// A page of one order's series with summaries over the page and the full run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub order_id: String,
    pub page: PageInfo,
    pub rows: Vec<OrderDailyDetail>,
    pub page_summary: OrderDailyDetail,
    pub total_summary: OrderDailyDetail,
}

impl OrderReport {
    pub fn build<S: ReleaseSchedule + ?Sized>(
        schedule: &S,
        order: &StakingOrder,
        total_days: u32,
        page_size: usize,
        page: usize,
    ) -> Result<Self, AggregationError> {
        let series = schedule.order_daily_details(order, total_days);
        let window = paginate(&series, page_size, page)?;
        Ok(Self {
            order_id: order.id.clone(),
            page: window.info,
            rows: window.rows.to_vec(),
            page_summary: compute_summary(window.rows),
            total_summary: compute_summary(&series),
        })
    }
}

/// A page of the cross-order daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub order_count: usize,
    pub page: PageInfo,
    pub rows: Vec<OrderDailyDetail>,
    pub page_summary: OrderDailyDetail,
    pub total_summary: OrderDailyDetail,
}

impl AggregateReport {
    pub fn build<S: ReleaseSchedule + ?Sized>(
        schedule: &S,
        orders: &[StakingOrder],
        total_days: u32,
        page_size: usize,
        page: usize,
    ) -> Result<Self, AggregationError> {
        let per_order = collect_order_details(schedule, orders, total_days);
        let series = aggregate_all_orders(&per_order, total_days);
        let window = paginate(&series, page_size, page)?;
        Ok(Self {
            order_count: orders.len(),
            page: window.info,
            rows: window.rows.to_vec(),
            page_summary: compute_summary(window.rows),
            total_summary: compute_summary(&series),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::OrderMode;

    fn order(id: &str, amount: f64) -> StakingOrder {
        StakingOrder {
            id: id.to_string(),
            amount,
            mode: OrderMode::Package,
            duration_days: None,
            package_tier: Some(1),
            start_day: 0,
        }
    }

    fn linear(order: &StakingOrder, days: u32) -> Vec<OrderDailyDetail> {
        let daily = order.amount / days as f64;
        (1..=days)
            .map(|day| OrderDailyDetail {
                principal_release: daily,
                cum_af_released: daily * day as f64,
                ..OrderDailyDetail::zeroed(day)
            })
            .collect()
    }

    #[test]
    fn aggregate_report_pages_and_summarizes() {
        let orders = [order("a", 450.0), order("b", 900.0)];
        let report = AggregateReport::build(&linear, &orders, 45, 20, 1000).unwrap();

        assert_eq!(report.order_count, 2);
        assert_eq!(report.page.index, 2);
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.rows[0].day, 41);
        assert!((report.page_summary.principal_release - 5.0 * 30.0).abs() < 1e-9);
        assert!((report.total_summary.principal_release - 1_350.0).abs() < 1e-9);
        assert!((report.total_summary.cum_af_released - 1_350.0).abs() < 1e-9);
    }

    #[test]
    fn order_report_uses_single_series() {
        let report = OrderReport::build(&linear, &order("a", 100.0), 10, 4, 1).unwrap();
        assert_eq!(report.order_id, "a");
        assert_eq!(report.rows.iter().map(|r| r.day).collect::<Vec<_>>(), vec![5, 6, 7, 8]);
        assert!((report.page_summary.principal_release - 40.0).abs() < 1e-9);
        assert!((report.page_summary.cum_af_released - 80.0).abs() < 1e-9);
    }

    #[test]
    fn zero_page_size_propagates() {
        assert!(AggregateReport::build(&linear, &[], 10, 0, 0).is_err());
    }
}
