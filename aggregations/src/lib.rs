// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Cross-order daily aggregation, windowed summaries and pagination over
//! externally generated release schedules.

pub mod daily;
pub mod paging;
pub mod report;
pub mod schedule;

use std::path::PathBuf;

use thiserror::Error;

pub use daily::{aggregate_all_orders, compute_summary};
pub use paging::{page_count, paginate, Page, PageInfo};
pub use report::{AggregateReport, OrderReport};
pub use schedule::{collect_order_details, PrecomputedSchedule, ReleaseSchedule};

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("page size must be positive")]
    InvalidPageSize,
    #[error("failed to read release schedule {path:?}: {source}")]
    ScheduleIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed release schedule: {0}")]
    ScheduleFormat(#[from] serde_json::Error),
}
