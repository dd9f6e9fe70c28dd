//! Density input sources backed by the database and boundary fetchers.

use std::sync::Arc;

use async_trait::async_trait;
use aves_mallorca_boundary_models::BoundarySource;
use aves_mallorca_database::queries;
use aves_mallorca_density::{RegionSource, SiteSource, SourceError};
use aves_mallorca_density_models::{SeasonalGroupRow, SiteObservations};
use aves_mallorca_geometry::Region;
use switchy_database::Database;

/// Reads seasonal groups and observations from the database.
pub struct DatabaseSiteSource {
    db: Arc<dyn Database>,
}

impl DatabaseSiteSource {
    /// Creates a source over `db`.
    #[must_use]
    pub const fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SiteSource for DatabaseSiteSource {
    async fn seasonal_groups(&self) -> Result<Vec<SeasonalGroupRow>, SourceError> {
        Ok(queries::seasonal_groups(self.db.as_ref()).await?)
    }

    async fn observations(&self) -> Result<Vec<SiteObservations>, SourceError> {
        Ok(queries::bird_locations(self.db.as_ref()).await?)
    }
}

/// Fetches region boundaries for a configured [`BoundarySource`].
pub struct BoundaryRegionSource {
    client: reqwest::Client,
    source: BoundarySource,
}

impl BoundaryRegionSource {
    /// Creates a region source that fetches `source` with `client`.
    #[must_use]
    pub const fn new(client: reqwest::Client, source: BoundarySource) -> Self {
        Self { client, source }
    }
}

#[async_trait]
impl RegionSource for BoundaryRegionSource {
    async fn regions(&self) -> Result<Vec<Region>, SourceError> {
        Ok(aves_mallorca_boundary::load_regions(&self.client, &self.source).await?)
    }
}
