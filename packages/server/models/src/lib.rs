#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the bird catalog server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! database row types and density results so the API contract can evolve
//! independently.

use std::collections::BTreeMap;

use aves_mallorca_database_models::{
    BirdRow, CatalogColumn, CatalogFilterValues, CatalogQuery, ContributionSiteRow, InitialField,
    LabelCount, LetterFilter, ParkRow, TeamMemberRow,
};
use aves_mallorca_density_models::{DensitySummary, SiteObservations};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Located parks with the birds recorded at each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBirdLocations {
    /// Number of parks.
    pub count: usize,
    /// Parks with their birds.
    pub locations: Vec<SiteObservations>,
}

/// Park listing with catalog-wide counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParks {
    /// Number of parks.
    pub count: usize,
    /// Every park.
    pub parks: Vec<ParkRow>,
    /// Birds per reproduction period.
    pub reproduction_period_counts: Vec<LabelCount>,
    /// Birds per conservation category.
    pub conservation_category_counts: Vec<LabelCount>,
    /// Birds per family, largest first.
    pub family_counts: Vec<LabelCount>,
}

/// Query parameters for the catalog endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQueryParams {
    /// `common_name` (default) or `scientific_name`.
    pub initial_field: Option<String>,
    /// `A`-`Z` or `#`.
    pub letter: Option<String>,
    /// Substring over common and scientific names.
    pub name: Option<String>,
    /// Family equality filter.
    pub family: Option<String>,
    /// Weight equality filter.
    pub weight: Option<String>,
    /// Size equality filter.
    pub size: Option<String>,
    /// Conservation category equality filter.
    pub conservation_category: Option<String>,
    /// Reproduction period equality filter.
    pub reproduction_period: Option<String>,
    /// Minimum lifespan in years.
    pub lifespan_min: Option<i32>,
    /// Maximum lifespan in years.
    pub lifespan_max: Option<i32>,
    /// Only endemic species.
    pub endemic_only: Option<bool>,
    /// Only species with a recovery plan.
    pub recovery_plan_only: Option<bool>,
}

impl CatalogQueryParams {
    /// Converts the raw parameters into a [`CatalogQuery`].
    ///
    /// Unknown initial fields fall back to the common name and invalid
    /// letters are ignored.
    #[must_use]
    pub fn to_query(&self) -> CatalogQuery {
        let filters: BTreeMap<CatalogColumn, String> = [
            (CatalogColumn::Family, &self.family),
            (CatalogColumn::Weight, &self.weight),
            (CatalogColumn::Size, &self.size),
            (CatalogColumn::ConservationCategory, &self.conservation_category),
            (CatalogColumn::ReproductionPeriod, &self.reproduction_period),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| (column, value.to_string()))
        })
        .collect();

        CatalogQuery {
            initial_field: self
                .initial_field
                .as_deref()
                .and_then(|f| f.parse::<InitialField>().ok())
                .unwrap_or_default(),
            letter: self.letter.as_deref().and_then(LetterFilter::parse),
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            filters,
            lifespan_min: self.lifespan_min,
            lifespan_max: self.lifespan_max,
            endemic_only: self.endemic_only.unwrap_or(false),
            recovery_plan_only: self.recovery_plan_only.unwrap_or(false),
        }
    }
}

/// Catalog response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCatalog {
    /// Number of birds returned.
    pub count: usize,
    /// The filters as applied.
    pub request: CatalogQuery,
    /// Distinct values available for each filter.
    pub filters: CatalogFilterValues,
    /// Letters offered by the index (`A`-`Z` then `#`).
    pub letters: Vec<String>,
    /// Matching birds.
    pub birds: Vec<BirdRow>,
}

/// `A`-`Z` followed by `#`.
#[must_use]
pub fn catalog_letters() -> Vec<String> {
    ('A'..='Z')
        .map(String::from)
        .chain(std::iter::once("#".to_string()))
        .collect()
}

/// Query parameters for the regional density endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDensityParams {
    /// Season name; the initial spring view when absent.
    pub season: Option<String>,
    /// Exclude sites that fall inside polygon holes.
    pub subtract_holes: Option<bool>,
}

/// Regional density for one season, ready for the choropleth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegionDensity {
    /// Summary for the season.
    #[serde(flatten)]
    pub summary: DensitySummary,
    /// Chart subtitle.
    pub subtitle: String,
}

impl From<DensitySummary> for ApiRegionDensity {
    fn from(summary: DensitySummary) -> Self {
        Self {
            subtitle: summary.subtitle(),
            summary,
        }
    }
}

/// Project team listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeam {
    /// Number of members.
    pub count: usize,
    /// Members by display order, then name.
    pub members: Vec<TeamMemberRow>,
    /// Number of species in the catalog.
    pub total_species: i64,
}

/// Text used when a park has no description yet.
pub const DESCRIPTION_UNAVAILABLE: &str = "Descripción no disponible.";

/// Which side the text goes on for a contribution card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContributionLayout {
    /// Text left, image right.
    TextFirst,
    /// Image left, text right.
    ImageFirst,
}

impl ContributionLayout {
    /// Alternates starting with [`Self::TextFirst`].
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::TextFirst
        } else {
            Self::ImageFirst
        }
    }
}

/// A published species recovery or management plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    /// Stable slug.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Cover image path.
    pub image: String,
    /// Link to the official document.
    pub url: String,
}

/// A park card on the contribution page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiContributionSite {
    /// Park id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text location.
    pub location: Option<String>,
    /// Website.
    pub url: Option<String>,
    /// Image path as stored.
    pub image: Option<String>,
    /// Description, or [`DESCRIPTION_UNAVAILABLE`].
    pub description: String,
    /// Card layout.
    pub layout: ContributionLayout,
}

/// Contribution page: parks to visit and recovery plans to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiContribute {
    /// Number of parks.
    pub count: usize,
    /// Recovery and management plans.
    pub recovery_plans: Vec<RecoveryPlan>,
    /// Parks in name order with alternating layouts.
    pub sites: Vec<ApiContributionSite>,
}

impl ApiContribute {
    /// Builds the page from park rows in display order.
    #[must_use]
    pub fn new(rows: Vec<ContributionSiteRow>, recovery_plans: Vec<RecoveryPlan>) -> Self {
        let sites: Vec<ApiContributionSite> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| ApiContributionSite {
                id: row.id,
                name: row.name,
                location: row.location,
                url: row.url,
                image: row.image,
                description: row
                    .description
                    .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string()),
                layout: ContributionLayout::for_index(index),
            })
            .collect();

        Self {
            count: sites.len(),
            recovery_plans,
            sites,
        }
    }
}

#[cfg(test)]
mod tests {
    use aves_mallorca_density_models::Season;

    use super::*;

    #[test]
    fn catalog_params_ignore_blank_and_invalid_values() {
        let params = CatalogQueryParams {
            initial_field: Some("nonsense".to_string()),
            letter: Some("ab".to_string()),
            name: Some("   ".to_string()),
            family: Some("Laridae".to_string()),
            weight: Some(String::new()),
            endemic_only: Some(true),
            ..CatalogQueryParams::default()
        };

        let query = params.to_query();

        assert_eq!(query.initial_field, InitialField::CommonName);
        assert_eq!(query.letter, None);
        assert_eq!(query.name, None);
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[&CatalogColumn::Family], "Laridae");
        assert!(query.endemic_only);
        assert!(!query.recovery_plan_only);
    }

    #[test]
    fn catalog_params_parse_letter_and_initial_field() {
        let params = CatalogQueryParams {
            initial_field: Some("scientific_name".to_string()),
            letter: Some("#".to_string()),
            ..CatalogQueryParams::default()
        };

        let query = params.to_query();

        assert_eq!(query.initial_field, InitialField::ScientificName);
        assert_eq!(query.letter, Some(LetterFilter::NonAlphabetic));
    }

    #[test]
    fn letters_end_with_hash() {
        let letters = catalog_letters();
        assert_eq!(letters.len(), 27);
        assert_eq!(letters[0], "A");
        assert_eq!(letters[26], "#");
    }

    #[test]
    fn region_density_carries_subtitle() {
        let api = ApiRegionDensity::from(DensitySummary {
            season: Season::Summer,
            regions: Vec::new(),
            max_for_season: 25,
            subtitle_count: 0,
            total_regions: 53,
            total_for_season: 0,
        });

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["season"], "Verano");
        assert_eq!(json["maxForSeason"], 25);
        assert_eq!(
            json["subtitle"],
            "0 de 53 municipios con registros de aves (Verano)"
        );
    }

    fn contribution_row(id: i64, name: &str, description: Option<&str>) -> ContributionSiteRow {
        ContributionSiteRow {
            id,
            name: name.to_string(),
            location: Some("Mallorca".to_string()),
            url: None,
            image: Some("dragonera.jpg".to_string()),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn contribution_sites_alternate_layout_and_fill_missing_descriptions() {
        let page = ApiContribute::new(
            vec![
                contribution_row(3, "Jardines de Alfabia", None),
                contribution_row(1, "Parc Natural de Mondragó", Some("Humedales y calas.")),
                contribution_row(2, "Parc Natural de sa Dragonera", None),
            ],
            Vec::new(),
        );

        assert_eq!(page.count, 3);
        let layouts: Vec<_> = page.sites.iter().map(|site| site.layout).collect();
        assert_eq!(
            layouts,
            vec![
                ContributionLayout::TextFirst,
                ContributionLayout::ImageFirst,
                ContributionLayout::TextFirst,
            ]
        );
        assert_eq!(page.sites[0].description, DESCRIPTION_UNAVAILABLE);
        assert_eq!(page.sites[1].description, "Humedales y calas.");
        assert_eq!(page.sites[2].id, 2);
    }

    #[test]
    fn contribute_serializes_layout_in_kebab_case() {
        let page = ApiContribute::new(
            vec![contribution_row(1, "Parc Natural de Mondragó", None)],
            vec![RecoveryPlan {
                id: "milvus-milvus".to_string(),
                title: "Plan de manejo Milvus milvus".to_string(),
                image: "/img/Planes/Milvusmilvus.jpg".to_string(),
                url: "https://example.org/plan".to_string(),
            }],
        );

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["sites"][0]["layout"], "text-first");
        assert_eq!(json["recoveryPlans"][0]["id"], "milvus-milvus");
        assert_eq!(json["count"], 1);
    }

    #[test]
    fn team_serializes_total_species() {
        let team = ApiTeam {
            count: 1,
            members: vec![TeamMemberRow {
                id: 4,
                name: "Marta Pons".to_string(),
                role: Some("Ornitóloga".to_string()),
                description: None,
                specialization: Some("Aves marinas".to_string()),
                photo: None,
                display_order: 1,
            }],
            total_species: 212,
        };

        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["totalSpecies"], 212);
        assert_eq!(json["members"][0]["displayOrder"], 1);
        assert_eq!(json["members"][0]["specialization"], "Aves marinas");
    }
}
