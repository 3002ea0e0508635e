use serde::Serialize;

use crate::AggregationError;

/// Position of a page within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Zero-based index after clamping.
    pub index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

impl PageInfo {
    /// One-based number of the first row on the page, or 0 for an empty series.
    pub fn first_row(&self) -> usize {
        if self.total_rows == 0 {
            0
        } else {
            self.index * self.page_size + 1
        }
    }

    pub fn last_row(&self) -> usize {
        ((self.index + 1) * self.page_size).min(self.total_rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub info: PageInfo,
    pub rows: &'a [T],
}

pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_rows.div_ceil(page_size)
}

/// Slices out page `requested`, clamping past-the-end indices to the last page.
pub fn paginate<T>(
    rows: &[T],
    page_size: usize,
    requested: usize,
) -> Result<Page<'_, T>, AggregationError> {
    if page_size == 0 {
        return Err(AggregationError::InvalidPageSize);
    }
    let pages = page_count(rows.len(), page_size);
    let index = requested.min(pages.saturating_sub(1));
    let start = (index * page_size).min(rows.len());
    let end = (start + page_size).min(rows.len());
    Ok(Page {
        info: PageInfo {
            index,
            page_count: pages,
            page_size,
            total_rows: rows.len(),
        },
        rows: &rows[start..end],
    })
}
