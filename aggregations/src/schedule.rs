use std::{collections::HashMap, fs, path::Path};

use core_types::{OrderDailyDetail, OrderId, StakingOrder};
use log::{debug, info};

use crate::AggregationError;

/// Source of per-order daily release rows.
///
/// Implementations must be a pure function of the order and the horizon.
pub trait ReleaseSchedule {
    fn order_daily_details(&self, order: &StakingOrder, total_days: u32) -> Vec<OrderDailyDetail>;
}

impl<F> ReleaseSchedule for F
where
    F: Fn(&StakingOrder, u32) -> Vec<OrderDailyDetail>,
{
    fn order_daily_details(&self, order: &StakingOrder, total_days: u32) -> Vec<OrderDailyDetail> {
        self(order, total_days)
    }
}

/// Schedules produced elsewhere and stored as `{"<order id>": [detail, ...]}`.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSchedule {
    by_order: HashMap<OrderId, Vec<OrderDailyDetail>>,
}

impl PrecomputedSchedule {
    pub fn new(by_order: HashMap<OrderId, Vec<OrderDailyDetail>>) -> Self {
        let mut by_order = by_order;
        for details in by_order.values_mut() {
            details.sort_by_key(|detail| detail.day);
        }
        Self { by_order }
    }

    pub fn from_json(json: &str) -> Result<Self, AggregationError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AggregationError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| AggregationError::ScheduleIo {
            path: path.to_path_buf(),
            source,
        })?;
        let schedule = Self::from_json(&json)?;
        info!(
            "loaded release schedules for {} orders from {:?}",
            schedule.by_order.len(),
            path
        );
        Ok(schedule)
    }

    pub fn len(&self) -> usize {
        self.by_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_order.is_empty()
    }
}

impl ReleaseSchedule for PrecomputedSchedule {
    fn order_daily_details(&self, order: &StakingOrder, total_days: u32) -> Vec<OrderDailyDetail> {
        match self.by_order.get(&order.id) {
            Some(details) => details
                .iter()
                .filter(|detail| (1..=total_days).contains(&detail.day))
                .cloned()
                .collect(),
            None => {
                debug!("no release schedule for order {}", order.id);
                Vec::new()
            }
        }
    }
}

/// One series per order, in ledger order.
pub fn collect_order_details<S: ReleaseSchedule + ?Sized>(
    schedule: &S,
    orders: &[StakingOrder],
    total_days: u32,
) -> Vec<Vec<OrderDailyDetail>> {
    orders
        .iter()
        .map(|order| schedule.order_daily_details(order, total_days))
        .collect()
}
