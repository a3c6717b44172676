use std::collections::BTreeMap;

use crate::models::Quadrant;

/// Classifies a point by sign, counting zero as non-negative on both axes.
pub fn classify(x: f64, y: f64) -> Quadrant {
    match (x >= 0.0, y >= 0.0) {
        (true, true) => Quadrant::Q1,
        (false, true) => Quadrant::Q2,
        (false, false) => Quadrant::Q3,
        (true, false) => Quadrant::Q4,
    }
}

pub fn classify_all(xs: &[f64], ys: &[f64]) -> Vec<Quadrant> {
    xs.iter().zip(ys).map(|(x, y)| classify(*x, *y)).collect()
}

pub fn color(quadrant: Quadrant) -> &'static str {
    match quadrant {
        Quadrant::Q1 => "green",
        Quadrant::Q2 => "yellow",
        Quadrant::Q3 => "red",
        Quadrant::Q4 => "orange",
    }
}

pub fn color_map() -> BTreeMap<String, String> {
    Quadrant::ALL
        .iter()
        .map(|quadrant| (quadrant.label().to_string(), color(*quadrant).to_string()))
        .collect()
}
