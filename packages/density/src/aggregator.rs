//! Spatial join of sites onto regions.
//!
//! Every region is tested against every located site. With tens of
//! municipalities and a few hundred sites the brute-force join is cheap,
//! and it keeps overlap semantics trivial: a site inside two regions
//! counts for both.

use std::collections::{BTreeMap, BTreeSet};

use aves_mallorca_density_models::{
    RegionAggregate, SeasonalVector, SiteObservations, SiteSeasons, SpeciesKey,
};
use aves_mallorca_geometry::{HoleMode, Point, Region};

/// A located site with everything the join needs.
#[derive(Debug, Default)]
struct SiteEntry<'a> {
    point: Option<Point>,
    seasons: SeasonalVector,
    species: BTreeSet<&'a SpeciesKey>,
}

/// Merges seasonal vectors and observations into one entry per site id.
///
/// A site may appear in only one of the two inputs. Coordinates come from
/// whichever input provides both.
fn index_sites<'a>(
    site_seasons: &[SiteSeasons],
    observations: &[SiteObservations],
    keys: &'a [Vec<SpeciesKey>],
) -> BTreeMap<i64, SiteEntry<'a>> {
    let mut sites: BTreeMap<i64, SiteEntry<'a>> = BTreeMap::new();

    for location in site_seasons {
        let entry = sites.entry(location.site.id).or_default();
        entry.point = entry.point.or_else(|| location.site.coordinates());
        entry.seasons.merge(&location.seasons);
    }

    for (observed, keys) in observations.iter().zip(keys) {
        let entry = sites.entry(observed.site.id).or_default();
        entry.point = entry.point.or_else(|| observed.site.coordinates());
        entry.species.extend(keys);
    }

    sites
}

/// Aggregates sites onto regions, ignoring polygon holes.
///
/// See [`aggregate_with`].
#[must_use]
pub fn aggregate(
    regions: &[Region],
    site_seasons: &[SiteSeasons],
    observations: &[SiteObservations],
) -> Vec<RegionAggregate> {
    aggregate_with(regions, site_seasons, observations, HoleMode::Ignore)
}

/// Aggregates sites onto regions.
///
/// For each region, in input order, every site with both coordinates that
/// the region contains adds one contributing site, its seasonal vector,
/// and the identities of its observed species to the region's distinct
/// species set. Species without an id or scientific name are skipped.
///
/// Sites outside every region are dropped. Regions with malformed geometry
/// are kept with zero aggregates. The function is pure: identical inputs
/// give identical output.
#[must_use]
pub fn aggregate_with(
    regions: &[Region],
    site_seasons: &[SiteSeasons],
    observations: &[SiteObservations],
    holes: HoleMode,
) -> Vec<RegionAggregate> {
    let keys: Vec<Vec<SpeciesKey>> = observations
        .iter()
        .map(|observed| {
            observed
                .species
                .iter()
                .filter_map(aves_mallorca_density_models::SpeciesObservation::species_key)
                .collect()
        })
        .collect();

    let sites = index_sites(site_seasons, observations, &keys);
    let located: Vec<(Point, &SiteEntry)> = sites
        .values()
        .filter_map(|entry| entry.point.map(|point| (point, entry)))
        .collect();

    log::debug!(
        "Aggregating {} located sites ({} total) onto {} regions",
        located.len(),
        sites.len(),
        regions.len(),
    );

    regions
        .iter()
        .map(|region| {
            let mut seasons = SeasonalVector::default();
            let mut species: BTreeSet<&SpeciesKey> = BTreeSet::new();
            let mut contributing_sites = 0;

            for (point, entry) in &located {
                if region.contains_with(*point, holes) {
                    contributing_sites += 1;
                    seasons.merge(&entry.seasons);
                    species.extend(entry.species.iter().copied());
                }
            }

            RegionAggregate {
                key: region.key.clone(),
                name: region.name.clone(),
                total_distinct_species: species.len(),
                contributing_sites,
                seasons,
            }
        })
        .collect()
}
