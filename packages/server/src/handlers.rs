//! HTTP handler functions for the bird catalog API.

use actix_web::{HttpResponse, web};
use aves_mallorca_database::{DbError, queries};
use aves_mallorca_density::{RegionSource, SiteSource, estimate, pipeline};
use aves_mallorca_density_models::Season;
use aves_mallorca_geometry::HoleMode;
use aves_mallorca_server_models::{
    ApiBirdLocations, ApiCatalog, ApiContribute, ApiError, ApiHealth, ApiParks, ApiRegionDensity,
    ApiTeam, CatalogQueryParams, RegionDensityParams, catalog_letters,
};

use crate::AppState;
use crate::recovery_plans::recovery_plans;
use crate::sources::{BoundaryRegionSource, DatabaseSiteSource};

fn internal_error(message: &str, e: impl std::fmt::Display) -> HttpResponse {
    log::error!("{message}: {e}");
    HttpResponse::InternalServerError().json(ApiError::new(message))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/seasonal-density`
///
/// Site-level seasonal estimate for every located park.
pub async fn seasonal_density(state: web::Data<AppState>) -> HttpResponse {
    match queries::seasonal_groups(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(estimate(&rows)),
        Err(e) => internal_error("Failed to query seasonal density", e),
    }
}

/// `GET /api/bird-locations`
///
/// Located parks with the birds recorded at each.
pub async fn bird_locations(state: web::Data<AppState>) -> HttpResponse {
    match queries::bird_locations(state.db.as_ref()).await {
        Ok(locations) => HttpResponse::Ok().json(ApiBirdLocations {
            count: locations.len(),
            locations,
        }),
        Err(e) => internal_error("Failed to query bird locations", e),
    }
}

/// `GET /api/parks`
///
/// Every park plus bird counts by reproduction period, conservation
/// category and family.
pub async fn parks(state: web::Data<AppState>) -> HttpResponse {
    let db = state.db.as_ref();

    let result = async {
        let parks = queries::parks(db).await?;
        Ok::<_, DbError>(ApiParks {
            count: parks.len(),
            parks,
            reproduction_period_counts: queries::counts_by_reproduction_period(db).await?,
            conservation_category_counts: queries::counts_by_conservation_category(db).await?,
            family_counts: queries::counts_by_family(db).await?,
        })
    }
    .await;

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => internal_error("Failed to query parks", e),
    }
}

/// `GET /api/catalog`
///
/// Bird catalog filtered by initial letter, name, allow-listed columns,
/// lifespan, endemism and recovery plan.
pub async fn catalog(
    state: web::Data<AppState>,
    params: web::Query<CatalogQueryParams>,
) -> HttpResponse {
    let db = state.db.as_ref();
    let query = params.to_query();

    let birds = match queries::catalog(db, &query).await {
        Ok(birds) => birds,
        Err(e) => return internal_error("Failed to query catalog", e),
    };

    let filters = match queries::catalog_filter_values(db).await {
        Ok(filters) => filters,
        Err(e) => return internal_error("Failed to query catalog filters", e),
    };

    HttpResponse::Ok().json(ApiCatalog {
        count: birds.len(),
        request: query,
        filters,
        letters: catalog_letters(),
        birds,
    })
}

/// `GET /api/team`
///
/// Project team by display order, with the catalog species total.
pub async fn team(state: web::Data<AppState>) -> HttpResponse {
    let db = state.db.as_ref();

    let result = async {
        let members = queries::team_members(db).await?;
        Ok::<_, DbError>(ApiTeam {
            count: members.len(),
            members,
            total_species: queries::total_species(db).await?,
        })
    }
    .await;

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => internal_error("Failed to query team", e),
    }
}

/// `GET /api/contribute`
///
/// Parks to visit and the published species recovery plans.
pub async fn contribute(state: web::Data<AppState>) -> HttpResponse {
    match queries::contribution_sites(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(ApiContribute::new(rows, recovery_plans())),
        Err(e) => internal_error("Failed to query contribution sites", e),
    }
}

/// Parses the optional `season` parameter.
///
/// `None` selects the initial view; unknown names are rejected.
fn parse_season(season: Option<&str>) -> Result<Option<Season>, HttpResponse> {
    season
        .map(str::parse::<Season>)
        .transpose()
        .map_err(|e| HttpResponse::BadRequest().json(ApiError::new(e.to_string())))
}

const fn hole_mode(subtract_holes: Option<bool>) -> HoleMode {
    match subtract_holes {
        Some(true) => HoleMode::Subtract,
        _ => HoleMode::Ignore,
    }
}

/// `GET /api/regions/density?season=&subtractHoles=`
///
/// Per-municipality seasonal aggregate. Without `season` the initial
/// spring view is returned; with `season` the view is switched to it.
pub async fn region_density(
    state: web::Data<AppState>,
    params: web::Query<RegionDensityParams>,
) -> HttpResponse {
    let sites = DatabaseSiteSource::new(state.db.clone());
    let regions = BoundaryRegionSource::new(state.http.clone(), state.boundary_source.clone());

    region_density_response(&sites, &regions, &params).await
}

async fn region_density_response(
    sites: &dyn SiteSource,
    regions: &dyn RegionSource,
    params: &RegionDensityParams,
) -> HttpResponse {
    let season = match parse_season(params.season.as_deref()) {
        Ok(season) => season,
        Err(response) => return response,
    };

    let mut view = match pipeline::run_view(sites, regions, hole_mode(params.subtract_holes)).await
    {
        Ok(view) => view,
        Err(e) => return internal_error("Failed to load density inputs", e),
    };

    if let Some(season) = season {
        view.select(season);
    }

    HttpResponse::Ok().json(ApiRegionDensity::from(view.summary().clone()))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, body::to_bytes, http::StatusCode};
    use async_trait::async_trait;
    use aves_mallorca_density::SourceError;
    use aves_mallorca_density_models::{
        SeasonalGroupRow, Site, SiteObservations, SpeciesObservation,
    };
    use aves_mallorca_geometry::Region;
    use serde_json::json;

    use super::*;

    struct FakeSites {
        empty: bool,
    }

    fn site() -> Site {
        Site {
            id: 7,
            name: "Parc Natural de s'Albufera".to_string(),
            latitude: Some(5.0),
            longitude: Some(5.0),
        }
    }

    #[async_trait]
    impl SiteSource for FakeSites {
        async fn seasonal_groups(&self) -> Result<Vec<SeasonalGroupRow>, SourceError> {
            if self.empty {
                return Ok(Vec::new());
            }
            Ok(vec![SeasonalGroupRow {
                site: site(),
                reproduction_period: Some("Todo el año".to_string()),
                migratory_pattern: Some("Residente".to_string()),
                species_count: 1,
            }])
        }

        async fn observations(&self) -> Result<Vec<SiteObservations>, SourceError> {
            if self.empty {
                return Ok(Vec::new());
            }
            Ok(vec![SiteObservations {
                site: site(),
                species: vec![SpeciesObservation {
                    species_id: Some(31),
                    common_name: Some("Calamón común".to_string()),
                    scientific_name: Some("Porphyrio porphyrio".to_string()),
                    family: Some("Rallidae".to_string()),
                    reproduction_period: Some("Todo el año".to_string()),
                    migratory_pattern: Some("Residente".to_string()),
                    endemic: false,
                    conservation_category: None,
                }],
            }])
        }
    }

    struct FakeRegions {
        fail: bool,
    }

    #[async_trait]
    impl RegionSource for FakeRegions {
        async fn regions(&self) -> Result<Vec<Region>, SourceError> {
            if self.fail {
                return Err("boundary download failed".into());
            }
            // The site at (5, 5) sits inside the hole.
            let geometry = json!({
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]],
                    [[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0], [4.0, 4.0]]
                ]
            });
            Ok(vec![Region::from_geojson("07039", "Muro", Some(&geometry))])
        }
    }

    async fn density_json(
        sites: FakeSites,
        regions: FakeRegions,
        season: Option<&str>,
        subtract_holes: Option<bool>,
    ) -> (StatusCode, serde_json::Value) {
        let params = RegionDensityParams {
            season: season.map(str::to_string),
            subtract_holes,
        };
        let response = region_density_response(&sites, &regions, &params).await;
        let status = response.status();
        let body = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn parse_season_accepts_known_names_and_absence() {
        assert!(matches!(parse_season(None), Ok(None)));
        assert!(matches!(
            parse_season(Some("Invierno")),
            Ok(Some(Season::Winter))
        ));
    }

    #[test]
    fn holes_are_subtracted_only_on_request() {
        assert_eq!(hole_mode(None), HoleMode::Ignore);
        assert_eq!(hole_mode(Some(false)), HoleMode::Ignore);
        assert_eq!(hole_mode(Some(true)), HoleMode::Subtract);
    }

    #[actix_web::test]
    async fn parse_season_rejects_unknown_names_with_400() {
        let Err(response) = parse_season(Some("Winter")) else {
            panic!("unknown season was accepted");
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Winter"));
    }

    #[actix_web::test]
    async fn region_density_without_season_is_the_initial_spring_view() {
        let (status, json) =
            density_json(FakeSites { empty: true }, FakeRegions { fail: false }, None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["season"], "Primavera");
        assert_eq!(json["maxForSeason"], 10);
        assert_eq!(json["subtitleCount"], 0);
        assert_eq!(json["totalRegions"], 1);
    }

    #[actix_web::test]
    async fn region_density_with_season_uses_the_switch_fallback() {
        let (status, json) = density_json(
            FakeSites { empty: true },
            FakeRegions { fail: false },
            Some("Primavera"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["season"], "Primavera");
        assert_eq!(json["maxForSeason"], 25);
    }

    #[actix_web::test]
    async fn region_density_counts_sites_in_holes_unless_subtracted() {
        let (_, ignored) = density_json(
            FakeSites { empty: false },
            FakeRegions { fail: false },
            Some("Invierno"),
            None,
        )
        .await;
        assert_eq!(ignored["season"], "Invierno");
        assert_eq!(ignored["subtitleCount"], 1);
        assert_eq!(ignored["totalForSeason"], 1);
        assert_eq!(ignored["maxForSeason"], 1);

        let (_, subtracted) = density_json(
            FakeSites { empty: false },
            FakeRegions { fail: false },
            Some("Invierno"),
            Some(true),
        )
        .await;
        assert_eq!(subtracted["subtitleCount"], 0);
        assert_eq!(subtracted["totalForSeason"], 0);
        assert_eq!(subtracted["maxForSeason"], 25);
    }

    #[actix_web::test]
    async fn region_density_rejects_unknown_season_before_fetching() {
        let (status, json) = density_json(
            FakeSites { empty: false },
            FakeRegions { fail: true },
            Some("Summer"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Summer"));
    }

    #[actix_web::test]
    async fn region_density_source_failure_is_a_500() {
        let (status, json) =
            density_json(FakeSites { empty: false }, FakeRegions { fail: true }, None, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "Failed to load density inputs" }));
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = actix_web::test::init_service(
            App::new().route("/api/health", web::get().to(health)),
        )
        .await;

        let req = actix_web::test::TestRequest::get().uri("/api/health").to_request();
        let json: serde_json::Value = actix_web::test::call_and_read_body_json(&app, req).await;

        assert_eq!(json["healthy"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
