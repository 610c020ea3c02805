//! Dashboard aggregation.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::dashboard::types::{FiveWSummary, MonthlyReach, ReachRecord};

/// Disaggregations whose name contains this (case-insensitive) count
/// households, not people.
pub const HOUSEHOLDS_MARKER: &str = "households";

const TOTAL: &str = "total";

fn counts_people(name: &str) -> bool {
    !name.to_lowercase().contains(HOUSEHOLDS_MARKER)
}

/// Folds reach records into the 5W figures.
#[must_use]
pub fn summarize(records: &[ReachRecord]) -> FiveWSummary {
    let mut indicators = HashSet::new();
    let mut partners = HashSet::new();
    let mut provinces = HashSet::new();
    let mut domains = BTreeSet::new();
    let mut by_month: BTreeMap<chrono::NaiveDate, i64> = BTreeMap::new();
    let mut reach_by_activity: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    let mut people_reached = 0i64;

    for record in records {
        indicators.insert(record.indicator_id);
        partners.extend(record.implementing_partner_id);
        provinces.extend(record.province_id);
        domains.insert(record.activity_domain.clone());

        let Some(name) = record.disaggregation_name.as_deref() else {
            continue;
        };

        let row = reach_by_activity.entry(name.to_string()).or_default();
        *row.entry(record.activity_domain.clone()).or_default() += record.reached;
        *row.entry(TOTAL.to_string()).or_default() += record.reached;

        if counts_people(name) {
            people_reached += record.reached;
            *by_month.entry(record.report_month).or_default() += record.reached;
        }
    }

    FiveWSummary {
        indicators_count: indicators.len(),
        implementing_partners_count: partners.len(),
        provinces_count: provinces.len(),
        people_reached,
        people_reached_by_month: by_month
            .into_iter()
            .map(|(month, reached)| MonthlyReach {
                month,
                label: month.format("%b").to_string(),
                reached,
            })
            .collect(),
        activity_domains: domains.into_iter().collect(),
        reach_by_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn record(month: u32, domain: &str, name: Option<&str>, reached: i64) -> ReachRecord {
        ReachRecord {
            report_month: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            indicator_id: Uuid::nil(),
            implementing_partner_id: None,
            province_id: Some(Uuid::nil()),
            activity_domain: domain.into(),
            disaggregation_name: name.map(str::to_string),
            reached,
        }
    }

    #[test]
    fn test_households_excluded_from_people() {
        let summary = summarize(&[
            record(3, "Hygiene", Some("Girls(0-5)"), 10),
            record(3, "Hygiene", Some("Households"), 4),
            record(4, "Water", Some("Women(18+)"), 6),
            record(4, "Water", Some("Female headed HOUSEHOLDS"), 2),
        ]);

        assert_eq!(summary.people_reached, 16);
        assert_eq!(summary.people_reached_by_month.len(), 2);
        assert_eq!(summary.people_reached_by_month[0].label, "Mar");
        assert_eq!(summary.people_reached_by_month[0].reached, 10);
        assert_eq!(summary.reach_by_activity["Households"]["total"], 4);
    }

    #[test]
    fn test_reach_by_activity_matrix() {
        let summary = summarize(&[
            record(3, "Hygiene", Some("Girls(0-5)"), 10),
            record(3, "Water", Some("Girls(0-5)"), 5),
            record(3, "Water", None, 0),
        ]);

        let girls = &summary.reach_by_activity["Girls(0-5)"];
        assert_eq!(girls["Hygiene"], 10);
        assert_eq!(girls["Water"], 5);
        assert_eq!(girls["total"], 15);
        assert_eq!(summary.activity_domains, vec!["Hygiene", "Water"]);
    }

    #[test]
    fn test_distinct_counts() {
        let partner = Uuid::new_v4();
        let mut a = record(3, "Hygiene", Some("Girls(0-5)"), 1);
        a.implementing_partner_id = Some(partner);
        let mut b = a.clone();
        b.indicator_id = Uuid::new_v4();
        b.province_id = Some(Uuid::new_v4());

        let summary = summarize(&[a, b]);
        assert_eq!(summary.indicators_count, 2);
        assert_eq!(summary.implementing_partners_count, 1);
        assert_eq!(summary.provinces_count, 2);
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[]), FiveWSummary::default());
    }
}
