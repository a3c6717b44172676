use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use tracing::warn;

use crate::models::{ColorDiscriminator, ScoredRequest};
use crate::quadrant;

/// Catalog for categorical coloring. Entries are distinct.
pub const PALETTE: [&str; 36] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94",
    "#f7b6d2", "#c7c7c7", "#dbdb8d", "#9edae5", "#393b79", "#637939", "#8c6d31", "#843c39",
    "#7b4173", "#5254a3", "#6b6ecf", "#9c9ede", "#bd9e39", "#e7ba52", "#ad494a", "#d6616b",
    "#fdbf6f", "#cab2d6", "#6a3d9a", "#b5cf6b",
];

pub type ColorMap = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error(
        "{requested} distinct categories exceed the {available} available colors; \
         reduce the selection to at most {available} categories"
    )]
    Exhausted { requested: usize, available: usize },
}

/// Assigns each distinct value a color drawn without replacement from `palette`.
pub fn allocate<'a, I, R>(
    values: I,
    palette: &[&str],
    rng: &mut R,
) -> Result<ColorMap, PaletteError>
where
    I: IntoIterator<Item = &'a str>,
    R: Rng + ?Sized,
{
    let distinct: BTreeSet<&str> = values.into_iter().collect();
    if distinct.len() > palette.len() {
        warn!(
            requested = distinct.len(),
            available = palette.len(),
            "palette exhausted"
        );
        return Err(PaletteError::Exhausted {
            requested: distinct.len(),
            available: palette.len(),
        });
    }

    let mut pool: Vec<&str> = palette.to_vec();
    let mut colors = ColorMap::new();
    for value in distinct {
        let index = rng.gen_range(0..pool.len());
        colors.insert(value.to_string(), pool.remove(index).to_string());
    }

    Ok(colors)
}

/// Color map for the chosen discriminator over the current view.
pub fn color_map_for<R>(
    scored: &[ScoredRequest],
    discriminator: ColorDiscriminator,
    rng: &mut R,
) -> Result<ColorMap, PaletteError>
where
    R: Rng + ?Sized,
{
    match discriminator {
        ColorDiscriminator::Quadrant => Ok(quadrant::color_map()),
        other => allocate(
            scored.iter().map(|request| request.discriminator(other)),
            &PALETTE,
            rng,
        ),
    }
}
