use tracing::debug;

use crate::models::{RequestRecord, ScoredRequest};
use crate::quadrant;
use crate::weights::WeightVector;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScoringError {
    #[error("shape mismatch: criterion row {row} has {found} columns, weight vector has {expected}")]
    CriterionColumns {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("shape mismatch: {found} margins supplied for {expected} criterion rows")]
    MarginLength { expected: usize, found: usize },
}

/// Axis vectors for a whole backlog, index-aligned with the input rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScores {
    pub xscores: Vec<f64>,
    pub yscores: Vec<f64>,
    pub scores: Vec<f64>,
}

pub fn compute_axes(
    criteria: &[Vec<f64>],
    margins: &[f64],
    weights: &WeightVector,
    margin_weight: f64,
) -> Result<AxisScores, ScoringError> {
    if margins.len() != criteria.len() {
        return Err(ScoringError::MarginLength {
            expected: criteria.len(),
            found: margins.len(),
        });
    }

    if let Some((row, found)) = criteria
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != weights.len())
    {
        return Err(ScoringError::CriterionColumns {
            row,
            expected: weights.len(),
            found,
        });
    }

    let xscores: Vec<f64> = criteria
        .iter()
        .map(|row| dot(weights.as_slice(), row))
        .collect();
    let yscores: Vec<f64> = margins.iter().map(|margin| margin_weight * margin).collect();
    let scores = xscores
        .iter()
        .zip(&yscores)
        .map(|(x, y)| (x * x + y * y).sqrt())
        .collect();

    Ok(AxisScores {
        xscores,
        yscores,
        scores,
    })
}

/// Scores every record and attaches its quadrant. Row order is preserved.
pub fn score_backlog(
    records: &[RequestRecord],
    weights: &WeightVector,
    margin_weight: f64,
) -> Result<Vec<ScoredRequest>, ScoringError> {
    let criteria: Vec<Vec<f64>> = records.iter().map(RequestRecord::criteria).collect();
    let margins: Vec<f64> = records.iter().map(|record| record.margin).collect();

    let axes = compute_axes(&criteria, &margins, weights, margin_weight)?;
    let quadrants = quadrant::classify_all(&axes.xscores, &axes.yscores);
    debug!(rows = records.len(), "scored backlog");

    Ok(records
        .iter()
        .zip(axes.xscores)
        .zip(axes.yscores)
        .zip(axes.scores)
        .zip(quadrants)
        .map(|((((record, xscore), yscore), score), quadrant)| ScoredRequest {
            record: record.clone(),
            xscore,
            yscore,
            score,
            quadrant,
        })
        .collect())
}

/// Highest combined score first; ties keep their original order.
pub fn rank(scored: &[ScoredRequest]) -> Vec<&ScoredRequest> {
    let mut ranked: Vec<&ScoredRequest> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

fn dot(weights: &[f64], row: &[f64]) -> f64 {
    weights.iter().zip(row).map(|(w, c)| w * c).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quadrant;
    use crate::weights::MARGIN_WEIGHT;

    fn sample_record(id: &str, criteria: [f64; 8], margin: f64) -> RequestRecord {
        RequestRecord {
            acquirer_flag: criteria[0],
            noise_index: criteria[1],
            expiration_proximity: criteria[2],
            failed_contact_count: criteria[3],
            explicit_refusal_count: criteria[4],
            special_request_count: criteria[5],
            routed_count: criteria[6],
            pending_review_flag: criteria[7],
            margin,
            route: "GRU-MIA".to_string(),
            flight_class: "economy".to_string(),
            travel_type: "leisure".to_string(),
            travel_month: 3,
            request_id: id.to_string(),
            operation_id: format!("op-{id}"),
        }
    }

    fn unit_weights() -> WeightVector {
        WeightVector::from_raw(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn three_row_scenario_matches_expected_axes() {
        let records = vec![
            sample_record("a", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.1),
            sample_record("b", [0.0; 8], -0.1),
            sample_record("c", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], 0.0),
        ];

        let scored = score_backlog(&records, &unit_weights(), MARGIN_WEIGHT).unwrap();
        let xs: Vec<f64> = scored.iter().map(|s| s.xscore).collect();
        let ys: Vec<f64> = scored.iter().map(|s| s.yscore).collect();
        let quadrants: Vec<Quadrant> = scored.iter().map(|s| s.quadrant).collect();

        assert_eq!(xs, vec![1.0, 0.0, 0.0]);
        assert_eq!(ys, vec![0.1, -0.1, 0.0]);
        assert_eq!(quadrants, vec![Quadrant::Q1, Quadrant::Q4, Quadrant::Q1]);
        assert!((scored[0].score - (1.0f64 + 0.01).sqrt()).abs() < 1e-12);
        assert_eq!(scored[2].score, 0.0);
    }

    #[test]
    fn failed_contact_weight_lowers_xscore() {
        let records = vec![sample_record("a", [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0], 0.2)];
        let weights = WeightVector::from_operator([0, 0, 0, 50, 0, 0, 0, 0]);
        let scored = score_backlog(&records, &weights, MARGIN_WEIGHT).unwrap();
        assert_eq!(scored[0].xscore, -100.0);
        assert_eq!(scored[0].quadrant, Quadrant::Q2);
    }

    #[test]
    fn repeated_scoring_is_bit_identical() {
        let records = vec![
            sample_record("a", [1.0, 0.3, 0.7, 2.0, 1.0, 0.0, 1.4, 1.0], 0.12),
            sample_record("b", [0.0, 0.9, 0.1, 0.0, 3.0, 2.0, 0.2, 0.0], -0.31),
        ];
        let weights = WeightVector::from_operator([12, -40, 77, 5, 9, -3, 100, -100]);

        let first = score_backlog(&records, &weights, MARGIN_WEIGHT).unwrap();
        let second = score_backlog(&records, &weights, MARGIN_WEIGHT).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.xscore.to_bits(), b.xscore.to_bits());
            assert_eq!(a.yscore.to_bits(), b.yscore.to_bits());
            assert_eq!(a.score.to_bits(), b.score.to_bits());
            assert_eq!(a.quadrant, b.quadrant);
        }
    }

    #[test]
    fn positive_scaling_scales_xscore_and_keeps_quadrants() {
        let criteria = vec![
            vec![1.0, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0],
            vec![0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 0.0],
        ];
        let margins = vec![0.2, -0.4];
        let weights = WeightVector::from_operator([3, -2, 1, 4, 5, 0, -6, 2]);
        let scaled = weights.scaled(4.0);

        let base = compute_axes(&criteria, &margins, &weights, MARGIN_WEIGHT).unwrap();
        let wide = compute_axes(&criteria, &margins, &scaled, MARGIN_WEIGHT).unwrap();

        for (x, scaled_x) in base.xscores.iter().zip(&wide.xscores) {
            assert!((scaled_x - 4.0 * x).abs() < 1e-9);
        }
        assert_eq!(
            quadrant::classify_all(&base.xscores, &base.yscores),
            quadrant::classify_all(&wide.xscores, &wide.yscores)
        );
    }

    #[test]
    fn rejects_row_with_wrong_column_count() {
        let criteria = vec![vec![0.0; 8], vec![0.0; 7]];
        let err = compute_axes(&criteria, &[0.0, 0.0], &unit_weights(), 1.0).unwrap_err();
        assert_eq!(
            err,
            ScoringError::CriterionColumns {
                row: 1,
                expected: 8,
                found: 7
            }
        );
    }

    #[test]
    fn rejects_margin_length_mismatch() {
        let criteria = vec![vec![0.0; 8]; 3];
        let err = compute_axes(&criteria, &[0.1, 0.2], &unit_weights(), 1.0).unwrap_err();
        assert_eq!(err, ScoringError::MarginLength { expected: 3, found: 2 });
    }

    #[test]
    fn empty_backlog_scores_to_empty_vectors() {
        let scored = score_backlog(&[], &unit_weights(), MARGIN_WEIGHT).unwrap();
        assert!(scored.is_empty());
    }

    #[test]
    fn rank_orders_by_combined_score() {
        let records = vec![
            sample_record("low", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.0),
            sample_record("high", [5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.0),
            sample_record("mid", [-3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.0),
        ];
        let scored = score_backlog(&records, &unit_weights(), MARGIN_WEIGHT).unwrap();
        let ids: Vec<&str> = rank(&scored)
            .iter()
            .map(|s| s.record.request_id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }
}
