use std::collections::BTreeSet;

use chrono::Month;
use tracing::debug;

use crate::models::{MarginDirection, ScoredRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginThreshold {
    pub direction: MarginDirection,
    pub percent: f64,
}

impl MarginThreshold {
    /// A zero percentage leaves the margin filter off.
    pub fn from_operator(direction: MarginDirection, percent: i64) -> Option<Self> {
        (percent != 0).then_some(Self {
            direction,
            percent: percent as f64,
        })
    }

    pub fn keeps(&self, margin: f64) -> bool {
        let bound = self.percent / 100.0;
        match self.direction {
            MarginDirection::Above => margin > bound,
            MarginDirection::Below => margin < bound,
        }
    }
}

/// Independent predicates over the scored view. Empty sets impose nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub routes: BTreeSet<String>,
    pub flight_classes: BTreeSet<String>,
    pub travel_types: BTreeSet<String>,
    pub months: BTreeSet<u32>,
    pub margin: Option<MarginThreshold>,
}

impl FilterSet {
    pub fn is_identity(&self) -> bool {
        self.routes.is_empty()
            && self.flight_classes.is_empty()
            && self.travel_types.is_empty()
            && self.months.is_empty()
            && self.margin.is_none()
    }

    pub fn matches(&self, request: &ScoredRequest) -> bool {
        let record = &request.record;
        member(&self.routes, &record.route)
            && member(&self.flight_classes, &record.flight_class)
            && member(&self.travel_types, &record.travel_type)
            && (self.months.is_empty() || self.months.contains(&record.travel_month))
            && self
                .margin
                .map_or(true, |threshold| threshold.keeps(record.margin))
    }

    /// Returns the matching rows in their original order.
    pub fn apply(&self, scored: &[ScoredRequest]) -> Vec<ScoredRequest> {
        if self.is_identity() {
            return scored.to_vec();
        }

        let kept: Vec<ScoredRequest> = scored
            .iter()
            .filter(|request| self.matches(request))
            .cloned()
            .collect();
        debug!(kept = kept.len(), total = scored.len(), "applied filters");
        kept
    }
}

fn member(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not a month name or a number between 1 and 12")]
pub struct MonthParseError(pub String);

/// Accepts English month names (full or abbreviated) or numbers 1-12.
pub fn parse_month(value: &str) -> Result<u32, MonthParseError> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return if (1..=12).contains(&number) {
            Ok(number)
        } else {
            Err(MonthParseError(value.to_string()))
        };
    }

    trimmed
        .parse::<Month>()
        .map(|month| month.number_from_month())
        .map_err(|_| MonthParseError(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quadrant, RequestRecord};

    fn scored(
        id: &str,
        route: &str,
        class: &str,
        kind: &str,
        month: u32,
        margin: f64,
    ) -> ScoredRequest {
        ScoredRequest {
            record: RequestRecord {
                acquirer_flag: 0.0,
                noise_index: 0.0,
                expiration_proximity: 0.0,
                failed_contact_count: 0.0,
                explicit_refusal_count: 0.0,
                special_request_count: 0.0,
                routed_count: 0.0,
                pending_review_flag: 0.0,
                margin,
                route: route.to_string(),
                flight_class: class.to_string(),
                travel_type: kind.to_string(),
                travel_month: month,
                request_id: id.to_string(),
                operation_id: format!("op-{id}"),
            },
            xscore: 0.0,
            yscore: margin,
            score: margin.abs(),
            quadrant: Quadrant::Q1,
        }
    }

    fn backlog() -> Vec<ScoredRequest> {
        vec![
            scored("1", "GRU-MIA", "economy", "leisure", 1, 0.05),
            scored("2", "GIG-LIS", "business", "corporate", 2, 0.15),
            scored("3", "GRU-MIA", "business", "leisure", 2, 0.2),
            scored("4", "POA-EZE", "economy", "corporate", 12, -0.3),
        ]
    }

    fn ids(view: &[ScoredRequest]) -> Vec<&str> {
        view.iter().map(|r| r.record.request_id.as_str()).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn inactive_filters_return_input_unchanged() {
        let data = backlog();
        let filters = FilterSet::default();
        assert!(filters.is_identity());
        assert_eq!(filters.apply(&data), data);
    }

    #[test]
    fn margin_above_ten_percent_keeps_last_two_rows() {
        let data = vec![
            scored("1", "A", "c", "t", 1, 0.05),
            scored("2", "A", "c", "t", 1, 0.15),
            scored("3", "A", "c", "t", 1, 0.2),
        ];
        let filters = FilterSet {
            margin: MarginThreshold::from_operator(MarginDirection::Above, 10),
            ..FilterSet::default()
        };
        assert_eq!(ids(&filters.apply(&data)), vec!["2", "3"]);
    }

    #[test]
    fn margin_below_uses_strict_bound() {
        let threshold = MarginThreshold::from_operator(MarginDirection::Below, -30).unwrap();
        assert!(!threshold.keeps(-0.3));
        assert!(threshold.keeps(-0.31));
    }

    #[test]
    fn zero_percent_disables_margin_filter() {
        assert_eq!(MarginThreshold::from_operator(MarginDirection::Above, 0), None);
    }

    #[test]
    fn active_predicates_are_combined_with_and() {
        let filters = FilterSet {
            routes: set(&["GRU-MIA", "GIG-LIS"]),
            flight_classes: set(&["business"]),
            months: [2].into_iter().collect(),
            ..FilterSet::default()
        };
        assert_eq!(ids(&filters.apply(&backlog())), vec!["2", "3"]);

        let narrower = FilterSet {
            travel_types: set(&["leisure"]),
            ..filters
        };
        assert_eq!(ids(&narrower.apply(&backlog())), vec!["3"]);
    }

    #[test]
    fn predicates_commute() {
        let by_route = FilterSet {
            routes: set(&["GRU-MIA", "POA-EZE"]),
            ..FilterSet::default()
        };
        let by_margin = FilterSet {
            margin: MarginThreshold::from_operator(MarginDirection::Above, 1),
            ..FilterSet::default()
        };

        let route_then_margin = by_margin.apply(&by_route.apply(&backlog()));
        let margin_then_route = by_route.apply(&by_margin.apply(&backlog()));
        assert_eq!(route_then_margin, margin_then_route);
        assert_eq!(ids(&route_then_margin), vec!["1", "3"]);
    }

    #[test]
    fn no_matches_yields_empty_view() {
        let filters = FilterSet {
            routes: set(&["CNF-SCL"]),
            ..FilterSet::default()
        };
        assert!(filters.apply(&backlog()).is_empty());
    }

    #[test]
    fn months_parse_from_names_and_numbers() {
        assert_eq!(parse_month("January"), Ok(1));
        assert_eq!(parse_month("dec"), Ok(12));
        assert_eq!(parse_month(" 7 "), Ok(7));
        assert!(parse_month("13").is_err());
        assert!(parse_month("Smarch").is_err());
    }
}
