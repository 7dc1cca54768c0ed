pub mod columns;
pub mod summary;
pub mod tasks;

use chrono::NaiveDate;

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d-%b-%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}
