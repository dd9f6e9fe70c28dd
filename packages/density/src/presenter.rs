//! Display values for the regional choropleth.

use aves_mallorca_density_models::{
    DensitySummary, InvalidSeasonError, RegionAggregate, RegionValue, Season,
};

/// Color scale maximum for the first render when no region has data.
pub const INITIAL_FALLBACK_MAX: u64 = 10;

/// Color scale maximum after a season switch when no region has data.
pub const SEASON_SWITCH_FALLBACK_MAX: u64 = 25;

/// Summarizes `aggregates` for `season`.
///
/// `max_for_season` is the largest season value over all regions, or
/// `fallback_max` when every region is zero for that season.
#[must_use]
pub fn present(aggregates: &[RegionAggregate], season: Season, fallback_max: u64) -> DensitySummary {
    let regions: Vec<RegionValue> = aggregates
        .iter()
        .map(|aggregate| RegionValue {
            value: aggregate.seasons.get(season),
            aggregate: aggregate.clone(),
        })
        .collect();

    let max_for_season = regions
        .iter()
        .map(|region| region.value)
        .filter(|value| *value > 0)
        .max()
        .unwrap_or(fallback_max);
    let subtitle_count = regions.iter().filter(|region| region.value > 0).count();
    let total_for_season = regions.iter().map(|region| region.value).sum();

    DensitySummary {
        season,
        total_regions: regions.len(),
        regions,
        max_for_season,
        subtitle_count,
        total_for_season,
    }
}

/// Like [`present`], with the season given by name.
///
/// # Errors
///
/// * If `season` is not `Primavera`, `Verano`, `Otoño` or `Invierno`
pub fn present_named(
    aggregates: &[RegionAggregate],
    season: &str,
    fallback_max: u64,
) -> Result<DensitySummary, InvalidSeasonError> {
    Ok(present(aggregates, season.parse()?, fallback_max))
}

/// Cached aggregates with a selected season.
///
/// Switching season only re-runs [`present`]; geometry and source fetches
/// are not repeated.
#[derive(Debug, Clone)]
pub struct DensityView {
    aggregates: Vec<RegionAggregate>,
    summary: DensitySummary,
}

impl DensityView {
    /// Creates a view showing spring with [`INITIAL_FALLBACK_MAX`].
    #[must_use]
    pub fn new(aggregates: Vec<RegionAggregate>) -> Self {
        let summary = present(&aggregates, Season::Spring, INITIAL_FALLBACK_MAX);
        Self {
            aggregates,
            summary,
        }
    }

    /// Switches to `season`, using [`SEASON_SWITCH_FALLBACK_MAX`].
    pub fn select(&mut self, season: Season) -> &DensitySummary {
        self.summary = present(&self.aggregates, season, SEASON_SWITCH_FALLBACK_MAX);
        &self.summary
    }

    /// Switches to the season named `season`.
    ///
    /// # Errors
    ///
    /// * If `season` is not one of the four season names; the current
    ///   selection is left untouched
    pub fn select_named(&mut self, season: &str) -> Result<&DensitySummary, InvalidSeasonError> {
        Ok(self.select(season.parse()?))
    }

    /// The summary for the current season.
    #[must_use]
    pub const fn summary(&self) -> &DensitySummary {
        &self.summary
    }

    /// The cached aggregates.
    #[must_use]
    pub fn aggregates(&self) -> &[RegionAggregate] {
        &self.aggregates
    }
}
