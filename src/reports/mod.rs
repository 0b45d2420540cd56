//! Aggregation reports.
//!
//! Each report is a fixed composition of pipeline stages, always in this
//! relative order when combined: join, flatten, filter, group, sort, limit,
//! project. Pipeline builders are pure functions of the normalized criteria
//! so their stage lists can be asserted without a database; executors run
//! them against the store and shape rows into the documented output fields.
//!
//! No report specifies a secondary sort key; rows tied on the primary key
//! come back in unspecified order.

mod bank;
mod employees;
mod trips;

pub use bank::{
    AccountVolumeRow, ActiveClientRow, BankReports, ProductClientsRow, RepairOutcome,
    TypedVolumeRow,
};
pub use employees::{DeptSalaryRow, Employee, EmployeeReports, NewEmployee, UpdateEmployee};
pub use trips::{
    DailyTripsRow, HourlyTripsRow, PeakHoursRow, StationRow, TripReports, UserDistributionRow,
};

use mongodb::bson::{Bson, Document};

/// Numeric field access tolerant of int32/int64/double storage.
pub(crate) fn f64_field(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

pub(crate) fn i64_field(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

pub(crate) fn str_field(doc: &Document, key: &str) -> String {
    doc.get_str(key).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_f64_field_widens_integers() {
        let doc = doc! { "a": 3_i32, "b": 4_i64, "c": 5.5 };
        assert_eq!(f64_field(&doc, "a"), 3.0);
        assert_eq!(f64_field(&doc, "b"), 4.0);
        assert_eq!(f64_field(&doc, "c"), 5.5);
        assert_eq!(f64_field(&doc, "missing"), 0.0);
    }

    #[test]
    fn test_i64_field_accepts_any_numeric() {
        let doc = doc! { "a": 3_i32, "b": 4_i64, "c": 5.0 };
        assert_eq!(i64_field(&doc, "a"), 3);
        assert_eq!(i64_field(&doc, "b"), 4);
        assert_eq!(i64_field(&doc, "c"), 5);
        assert_eq!(i64_field(&doc, "missing"), 0);
    }

    #[test]
    fn test_str_field_defaults_empty() {
        let doc = doc! { "name": "Ada" };
        assert_eq!(str_field(&doc, "name"), "Ada");
        assert_eq!(str_field(&doc, "missing"), "");
    }
}
