//! Concurrent input loading and the end-to-end density run.

use async_trait::async_trait;
use aves_mallorca_density_models::{RegionAggregate, SeasonalGroupRow, SiteObservations};
use aves_mallorca_geometry::{HoleMode, Region};

use crate::{DensityError, DensityView, aggregate_with, estimate};

/// Error type returned by source implementations.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Provides site-level rows: seasonal groups and per-site observations.
#[async_trait]
pub trait SiteSource: Send + Sync {
    /// One row per `(site, reproduction period, migratory pattern)` with
    /// the count of distinct species.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the rows cannot be loaded.
    async fn seasonal_groups(&self) -> Result<Vec<SeasonalGroupRow>, SourceError>;

    /// Located sites with the species observed at each.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the rows cannot be loaded.
    async fn observations(&self) -> Result<Vec<SiteObservations>, SourceError>;
}

/// Provides region boundaries.
#[async_trait]
pub trait RegionSource: Send + Sync {
    /// Every region, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the boundaries cannot be loaded.
    async fn regions(&self) -> Result<Vec<Region>, SourceError>;
}

/// Snapshot of every input for one run.
#[derive(Debug, Clone)]
pub struct DensityInputs {
    /// Seasonal group rows.
    pub groups: Vec<SeasonalGroupRow>,
    /// Observations per site.
    pub observations: Vec<SiteObservations>,
    /// Region boundaries.
    pub regions: Vec<Region>,
}

fn fetch_error(input: &'static str) -> impl FnOnce(SourceError) -> DensityError {
    move |source| {
        log::error!("Failed to fetch {input}: {source}");
        DensityError::SourceFetch { input, source }
    }
}

/// Fetches all inputs concurrently and waits for every one of them.
///
/// # Errors
///
/// * [`DensityError::SourceFetch`] if any fetch fails; nothing is returned
///   for the others
pub async fn load(
    sites: &dyn SiteSource,
    regions: &dyn RegionSource,
) -> Result<DensityInputs, DensityError> {
    let (groups, observations, regions) = futures::try_join!(
        async { sites.seasonal_groups().await.map_err(fetch_error("seasonal groups")) },
        async { sites.observations().await.map_err(fetch_error("observations")) },
        async { regions.regions().await.map_err(fetch_error("regions")) },
    )?;

    log::info!(
        "Loaded {} seasonal groups, {} observed sites, {} regions",
        groups.len(),
        observations.len(),
        regions.len(),
    );

    Ok(DensityInputs {
        groups,
        observations,
        regions,
    })
}

/// Loads the inputs and computes the regional aggregates.
///
/// # Errors
///
/// * [`DensityError::SourceFetch`] if any input cannot be fetched
pub async fn run(
    sites: &dyn SiteSource,
    regions: &dyn RegionSource,
    holes: HoleMode,
) -> Result<Vec<RegionAggregate>, DensityError> {
    let inputs = load(sites, regions).await?;
    let density = estimate(&inputs.groups);

    Ok(aggregate_with(
        &inputs.regions,
        &density.locations,
        &inputs.observations,
        holes,
    ))
}

/// Like [`run`], wrapped in a [`DensityView`] for season switching.
///
/// # Errors
///
/// * [`DensityError::SourceFetch`] if any input cannot be fetched
pub async fn run_view(
    sites: &dyn SiteSource,
    regions: &dyn RegionSource,
    holes: HoleMode,
) -> Result<DensityView, DensityError> {
    Ok(DensityView::new(run(sites, regions, holes).await?))
}
