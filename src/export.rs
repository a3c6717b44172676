use std::io::Write;

use serde::Serialize;

use crate::models::{ColorDiscriminator, Quadrant, ScoredRequest};
use crate::palette::ColorMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Column order of `ExportRow`, written alone when the view is empty.
const HEADER: [&str; 20] = [
    "OrderID",
    "OperationID",
    "IsSafraAcquirer",
    "NoiseIndex",
    "ExponentialDaysUntilExpiration",
    "TotalExpiredOffers",
    "TotalRefusedOffers",
    "OrderByJR",
    "LogarithmicTimesRouted",
    "OrderPR",
    "Margin",
    "FlightRoute",
    "flight_class",
    "travel_type",
    "TravelMonth",
    "xscore",
    "yscore",
    "score",
    "quadrant",
    "color",
];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "OrderID")]
    request_id: &'a str,
    #[serde(rename = "OperationID")]
    operation_id: &'a str,
    #[serde(rename = "IsSafraAcquirer")]
    acquirer_flag: f64,
    #[serde(rename = "NoiseIndex")]
    noise_index: f64,
    #[serde(rename = "ExponentialDaysUntilExpiration")]
    expiration_proximity: f64,
    #[serde(rename = "TotalExpiredOffers")]
    failed_contact_count: f64,
    #[serde(rename = "TotalRefusedOffers")]
    explicit_refusal_count: f64,
    #[serde(rename = "OrderByJR")]
    special_request_count: f64,
    #[serde(rename = "LogarithmicTimesRouted")]
    routed_count: f64,
    #[serde(rename = "OrderPR")]
    pending_review_flag: f64,
    #[serde(rename = "Margin")]
    margin: f64,
    #[serde(rename = "FlightRoute")]
    route: &'a str,
    flight_class: &'a str,
    travel_type: &'a str,
    #[serde(rename = "TravelMonth")]
    travel_month: u32,
    xscore: f64,
    yscore: f64,
    score: f64,
    quadrant: Quadrant,
    color: Option<&'a str>,
}

fn rows<'a>(
    view: &'a [ScoredRequest],
    discriminator: ColorDiscriminator,
    colors: Option<&'a ColorMap>,
) -> impl Iterator<Item = ExportRow<'a>> {
    view.iter().map(move |request| {
        let record = &request.record;
        ExportRow {
            request_id: &record.request_id,
            operation_id: &record.operation_id,
            acquirer_flag: record.acquirer_flag,
            noise_index: record.noise_index,
            expiration_proximity: record.expiration_proximity,
            failed_contact_count: record.failed_contact_count,
            explicit_refusal_count: record.explicit_refusal_count,
            special_request_count: record.special_request_count,
            routed_count: record.routed_count,
            pending_review_flag: record.pending_review_flag,
            margin: record.margin,
            route: &record.route,
            flight_class: &record.flight_class,
            travel_type: &record.travel_type,
            travel_month: record.travel_month,
            xscore: request.xscore,
            yscore: request.yscore,
            score: request.score,
            quadrant: request.quadrant,
            color: colors
                .and_then(|map| map.get(request.discriminator(discriminator)))
                .map(String::as_str),
        }
    })
}

/// Writes the scored view with its derived columns and assigned colors.
pub fn write_view<W: Write>(
    writer: W,
    format: ExportFormat,
    view: &[ScoredRequest],
    discriminator: ColorDiscriminator,
    colors: Option<&ColorMap>,
) -> anyhow::Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            if view.is_empty() {
                csv_writer.write_record(HEADER)?;
            }
            for row in rows(view, discriminator, colors) {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            let batch: Vec<ExportRow<'_>> = rows(view, discriminator, colors).collect();
            serde_json::to_writer_pretty(writer, &batch)?;
        }
    }

    Ok(())
}
