use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Number of weighted criteria feeding the horizontal axis.
pub const CRITERIA_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestRecord {
    #[serde(rename = "IsSafraAcquirer", alias = "AcquirerFlag", deserialize_with = "flag")]
    pub acquirer_flag: f64,
    #[serde(rename = "NoiseIndex")]
    pub noise_index: f64,
    #[serde(
        rename = "ExponentialDaysUntilExpiration",
        alias = "ExpirationProximity"
    )]
    pub expiration_proximity: f64,
    #[serde(rename = "TotalExpiredOffers", alias = "FailedContactCount")]
    pub failed_contact_count: f64,
    #[serde(rename = "TotalRefusedOffers", alias = "ExplicitRefusalCount")]
    pub explicit_refusal_count: f64,
    #[serde(rename = "OrderByJR", alias = "SpecialRequestCount")]
    pub special_request_count: f64,
    #[serde(rename = "LogarithmicTimesRouted", alias = "RoutedCount")]
    pub routed_count: f64,
    #[serde(rename = "OrderPR", alias = "PendingReviewFlag", deserialize_with = "flag")]
    pub pending_review_flag: f64,
    #[serde(rename = "Margin")]
    pub margin: f64,
    #[serde(rename = "FlightRoute", alias = "Route")]
    pub route: String,
    #[serde(rename = "flight_class", alias = "FlightClass")]
    pub flight_class: String,
    #[serde(rename = "travel_type", alias = "TravelType")]
    pub travel_type: String,
    #[serde(rename = "TravelMonth")]
    pub travel_month: u32,
    #[serde(rename = "OrderID", alias = "RequestID")]
    pub request_id: String,
    #[serde(rename = "OperationID")]
    pub operation_id: String,
}

impl RequestRecord {
    /// Criterion values in weight order.
    pub fn criteria(&self) -> Vec<f64> {
        vec![
            self.acquirer_flag,
            self.noise_index,
            self.expiration_proximity,
            self.failed_contact_count,
            self.explicit_refusal_count,
            self.special_request_count,
            self.routed_count,
            self.pending_review_flag,
        ]
    }

    pub fn category(&self, column: CategoryColumn) -> &str {
        match column {
            CategoryColumn::Route => &self.route,
            CategoryColumn::FlightClass => &self.flight_class,
            CategoryColumn::TravelType => &self.travel_type,
        }
    }
}

fn flag<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(1.0),
        "false" | "" => Ok(0.0),
        _ => value.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Q1 => "Q1",
            Quadrant::Q2 => "Q2",
            Quadrant::Q3 => "Q3",
            Quadrant::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRequest {
    pub record: RequestRecord,
    pub xscore: f64,
    pub yscore: f64,
    pub score: f64,
    pub quadrant: Quadrant,
}

impl ScoredRequest {
    pub fn discriminator(&self, column: ColorDiscriminator) -> &str {
        match column {
            ColorDiscriminator::Quadrant => self.quadrant.label(),
            ColorDiscriminator::FlightClass => &self.record.flight_class,
            ColorDiscriminator::TravelType => &self.record.travel_type,
            ColorDiscriminator::Route => &self.record.route,
        }
    }

    pub fn hover_label(&self, column: HoverLabel) -> &str {
        match column {
            HoverLabel::RequestId => &self.record.request_id,
            HoverLabel::OperationId => &self.record.operation_id,
            HoverLabel::FlightClass => &self.record.flight_class,
            HoverLabel::TravelType => &self.record.travel_type,
            HoverLabel::Route => &self.record.route,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CategoryColumn {
    Route,
    FlightClass,
    TravelType,
}

impl CategoryColumn {
    pub fn title(self) -> &'static str {
        match self {
            CategoryColumn::Route => "Routes",
            CategoryColumn::FlightClass => "Flight classes",
            CategoryColumn::TravelType => "Travel types",
        }
    }
}

/// Column deciding the color of each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorDiscriminator {
    Quadrant,
    FlightClass,
    TravelType,
    Route,
}

impl ColorDiscriminator {
    pub fn title(self) -> &'static str {
        match self {
            ColorDiscriminator::Quadrant => "quadrant",
            ColorDiscriminator::FlightClass => "flight class",
            ColorDiscriminator::TravelType => "travel type",
            ColorDiscriminator::Route => "route",
        }
    }
}

/// Column used to name each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HoverLabel {
    RequestId,
    OperationId,
    FlightClass,
    TravelType,
    Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MarginDirection {
    Above,
    Below,
}

#[derive(Debug, Clone)]
pub struct QuadrantSummary {
    pub quadrant: Quadrant,
    pub count: usize,
    pub percentage: f64,
}
