//! Trip analytics over the `trips` collection.
//!
//! Every report groups by a key derived from the trip document — the rider
//! category, an extract of the `start time` timestamp, or the start station —
//! so the filter stages here run on the group key, after `$group`.

use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::Serialize;

use crate::error::Result;
use crate::storage::TRIPS_COLLECTION;

use super::{f64_field, i64_field, str_field};

/// Trip counts and mean duration per rider category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDistributionRow {
    pub usertype: String,
    pub total_trips: i64,
    pub average_duration: f64,
}

/// Trip counts and mean duration for one hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTripsRow {
    pub hour: i64,
    pub total_trips: i64,
    pub average_duration: f64,
}

/// Trip count for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTripsRow {
    pub day: String,
    pub total_trips: i64,
}

/// One start station's popularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRow {
    pub start_station_id: i64,
    pub station_name: String,
    pub average_duration: f64,
    pub total_trips: i64,
}

/// Trip count for one (hour, day-of-week) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHoursRow {
    pub hour: i64,
    pub day_of_week: i64,
    pub total_trips: i64,
}

/// Reports over the trips collection.
#[derive(Clone)]
pub struct TripReports {
    trips: Collection<Document>,
}

impl TripReports {
    pub fn new(database: &Database) -> Self {
        Self {
            trips: database.collection(TRIPS_COLLECTION),
        }
    }

    /// Trip volume and mean duration per rider category, busiest first.
    pub async fn user_distribution(&self) -> Result<Vec<UserDistributionRow>> {
        let mut cursor = self.trips.aggregate(user_distribution_pipeline()).await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(UserDistributionRow {
                usertype: str_field(&doc, "usertype"),
                total_trips: i64_field(&doc, "total_trips"),
                average_duration: f64_field(&doc, "average_duration"),
            });
        }

        Ok(rows)
    }

    /// The single hour-of-day bucket matching `hour`, or no rows when no
    /// trip started in that hour.
    pub async fn trips_by_hour(&self, hour: i32) -> Result<Vec<HourlyTripsRow>> {
        let mut cursor = self.trips.aggregate(trips_by_hour_pipeline(hour)).await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(HourlyTripsRow {
                hour: i64_field(&doc, "hour"),
                total_trips: i64_field(&doc, "total_trips"),
                average_duration: f64_field(&doc, "average_duration"),
            });
        }

        Ok(rows)
    }

    /// Trip counts per calendar day, chronological.
    pub async fn trips_by_day(&self) -> Result<Vec<DailyTripsRow>> {
        let mut cursor = self.trips.aggregate(trips_by_day_pipeline()).await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(DailyTripsRow {
                day: str_field(&doc, "day"),
                total_trips: i64_field(&doc, "total_trips"),
            });
        }

        Ok(rows)
    }

    /// The `limit` most popular start stations by departures.
    pub async fn top_stations(&self, limit: i64) -> Result<Vec<StationRow>> {
        let mut cursor = self.trips.aggregate(top_stations_pipeline(limit)).await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(StationRow {
                start_station_id: i64_field(&doc, "start_station_id"),
                station_name: str_field(&doc, "station_name"),
                average_duration: f64_field(&doc, "average_duration"),
                total_trips: i64_field(&doc, "total_trips"),
            });
        }

        Ok(rows)
    }

    /// Trip count for the requested (hour, day-of-week) cell.
    pub async fn peak_hours(&self, hour: i32, day_of_week: i32) -> Result<Vec<PeakHoursRow>> {
        let mut cursor = self
            .trips
            .aggregate(peak_hours_pipeline(hour, day_of_week))
            .await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(PeakHoursRow {
                hour: i64_field(&doc, "hour"),
                day_of_week: i64_field(&doc, "day_of_week"),
                total_trips: i64_field(&doc, "total_trips"),
            });
        }

        Ok(rows)
    }
}

/// Group by rider category, busiest first.
pub fn user_distribution_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": "$usertype",
            "total_trips": { "$sum": 1 },
            "average_duration": { "$avg": "$tripduration" },
        }},
        doc! { "$sort": { "total_trips": -1 } },
        doc! { "$project": {
            "_id": 0,
            "usertype": "$_id",
            "total_trips": 1,
            "average_duration": 1,
        }},
    ]
}

/// Group by hour of the start timestamp, then keep the requested hour.
pub fn trips_by_hour_pipeline(hour: i32) -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": { "hour": { "$hour": "$start time" } },
            "total_trips": { "$sum": 1 },
            "average_duration": { "$avg": "$tripduration" },
        }},
        doc! { "$match": { "_id.hour": hour } },
        doc! { "$sort": { "_id.hour": -1 } },
        doc! { "$project": {
            "_id": 0,
            "hour": "$_id.hour",
            "total_trips": 1,
            "average_duration": 1,
        }},
    ]
}

/// Group by calendar day of the start timestamp, chronological.
pub fn trips_by_day_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": { "$dateToString": { "format": "%Y-%m-%d", "date": "$start time" } },
            "total_trips": { "$sum": 1 },
        }},
        doc! { "$sort": { "_id": 1 } },
        doc! { "$project": {
            "_id": 0,
            "day": "$_id",
            "total_trips": 1,
        }},
    ]
}

/// Group by start station, most departures first, capped at `limit` rows.
pub fn top_stations_pipeline(limit: i64) -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": "$start station id",
            "station_name": { "$first": "$start station name" },
            "total_trips": { "$sum": 1 },
            "average_duration": { "$avg": "$tripduration" },
        }},
        doc! { "$sort": { "total_trips": -1 } },
        doc! { "$limit": limit },
        doc! { "$project": {
            "_id": 0,
            "start_station_id": "$_id",
            "station_name": 1,
            "average_duration": 1,
            "total_trips": 1,
        }},
    ]
}

/// Group by (hour, day-of-week) of the start timestamp, keep the requested
/// cell, busiest first, at most ten rows.
pub fn peak_hours_pipeline(hour: i32, day_of_week: i32) -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": {
                "hour": { "$hour": "$start time" },
                "dayOfWeek": { "$dayOfWeek": "$start time" },
            },
            "total_trips": { "$sum": 1 },
        }},
        doc! { "$match": { "_id.hour": hour, "_id.dayOfWeek": day_of_week } },
        doc! { "$sort": { "total_trips": -1 } },
        doc! { "$limit": 10 },
        doc! { "$project": {
            "_id": 0,
            "hour": "$_id.hour",
            "day_of_week": "$_id.dayOfWeek",
            "total_trips": 1,
        }},
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_distribution_groups_by_usertype() {
        let pipeline = user_distribution_pipeline();
        assert_eq!(pipeline.len(), 3);

        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$usertype");

        let sort = pipeline[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("total_trips").unwrap(), -1);
    }

    #[test]
    fn test_trips_by_hour_filters_group_key() {
        let pipeline = trips_by_hour_pipeline(9);

        let matching = pipeline[1].get_document("$match").unwrap();
        assert_eq!(matching.get_i32("_id.hour").unwrap(), 9);

        // Filter on the derived key comes after the group, before the
        // rename in $project.
        assert!(pipeline[0].contains_key("$group"));
        let project = pipeline[3].get_document("$project").unwrap();
        assert_eq!(project.get_str("hour").unwrap(), "$_id.hour");
    }

    #[test]
    fn test_trips_by_day_sorts_chronologically() {
        let pipeline = trips_by_day_pipeline();

        let group = pipeline[0].get_document("$group").unwrap();
        let key = group.get_document("_id").unwrap();
        assert_eq!(
            key.get_document("$dateToString").unwrap(),
            &doc! { "format": "%Y-%m-%d", "date": "$start time" }
        );

        let sort = pipeline[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("_id").unwrap(), 1);
    }

    #[test]
    fn test_top_stations_caps_rows() {
        let pipeline = top_stations_pipeline(10);
        assert_eq!(pipeline[2], doc! { "$limit": 10_i64 });

        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$start station id");
        assert_eq!(
            group.get_document("station_name").unwrap(),
            &doc! { "$first": "$start station name" }
        );
    }

    #[test]
    fn test_peak_hours_matches_both_key_parts() {
        let pipeline = peak_hours_pipeline(8, 2);

        let matching = pipeline[1].get_document("$match").unwrap();
        assert_eq!(matching.get_i32("_id.hour").unwrap(), 8);
        assert_eq!(matching.get_i32("_id.dayOfWeek").unwrap(), 2);

        assert_eq!(pipeline[3], doc! { "$limit": 10 });
    }
}
