//! Database query functions for parks and birds.
//!
//! All queries are raw SQL through `query_raw_params()`. User input is
//! always bound as a parameter; the only identifiers interpolated into SQL
//! come from the [`CatalogColumn`] and
//! [`InitialField`](aves_mallorca_database_models::InitialField) allow-lists.

use std::fmt::Write as _;

use aves_mallorca_database_models::{
    BirdRow, CatalogColumn, CatalogFilterValues, CatalogQuery, ContributionSiteRow, LabelCount,
    LetterFilter, ParkRow, TeamMemberRow,
};
use aves_mallorca_density_models::{SeasonalGroupRow, Site, SiteObservations, SpeciesObservation};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Counts distinct species per `(park, reproduction period, migratory
/// pattern)` for every park with coordinates.
///
/// Parks without birds still produce one row with null period and pattern
/// and a count of 0. Rows are ordered by park name, then period.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn seasonal_groups(db: &dyn Database) -> Result<Vec<SeasonalGroupRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT p.id AS park_id, p.name AS park_name, p.latitude, p.longitude,
                    b.reproduction_period, b.migratory_pattern,
                    COUNT(DISTINCT b.id) AS species_count
             FROM parks p
             LEFT JOIN birds b ON b.park_id = p.id
             WHERE p.latitude IS NOT NULL AND p.longitude IS NOT NULL
             GROUP BY p.id, p.name, p.latitude, p.longitude,
                      b.reproduction_period, b.migratory_pattern
             ORDER BY p.name, b.reproduction_period",
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| SeasonalGroupRow {
            site: row_to_site(row),
            reproduction_period: row.to_value("reproduction_period").unwrap_or(None),
            migratory_pattern: row.to_value("migratory_pattern").unwrap_or(None),
            species_count: u64::try_from(row.to_value::<i64>("species_count").unwrap_or(0))
                .unwrap_or(0),
        })
        .collect())
}

/// Returns every park with coordinates together with the birds recorded
/// there, ordered by park name and then common name.
///
/// Parks without birds are not included.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn bird_locations(db: &dyn Database) -> Result<Vec<SiteObservations>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT b.id AS bird_id, b.common_name, b.scientific_name, b.family,
                    b.endemic, b.conservation_category,
                    b.reproduction_period, b.migratory_pattern,
                    p.id AS park_id, p.name AS park_name, p.latitude, p.longitude
             FROM birds b
             JOIN parks p ON b.park_id = p.id
             WHERE p.latitude IS NOT NULL AND p.longitude IS NOT NULL
             ORDER BY p.name ASC, b.common_name ASC",
            &[],
        )
        .await?;

    let mut locations: Vec<SiteObservations> = Vec::new();

    for row in &rows {
        let site = row_to_site(row);
        let species = SpeciesObservation {
            species_id: row.to_value("bird_id").unwrap_or(None),
            common_name: row.to_value("common_name").unwrap_or(None),
            scientific_name: row.to_value("scientific_name").unwrap_or(None),
            family: row.to_value("family").unwrap_or(None),
            reproduction_period: row.to_value("reproduction_period").unwrap_or(None),
            migratory_pattern: row.to_value("migratory_pattern").unwrap_or(None),
            endemic: row.to_value("endemic").unwrap_or(false),
            conservation_category: row.to_value("conservation_category").unwrap_or(None),
        };

        // Rows arrive grouped by park name; two parks may share a name.
        match locations.iter_mut().rev().find(|l| l.site.id == site.id) {
            Some(location) => location.species.push(species),
            None => locations.push(SiteObservations {
                site,
                species: vec![species],
            }),
        }
    }

    log::debug!(
        "Loaded {} birds across {} located parks",
        rows.len(),
        locations.len()
    );

    Ok(locations)
}

/// Lists every park ordered by name.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn parks(db: &dyn Database) -> Result<Vec<ParkRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, name, location, latitude, longitude, url, image
             FROM parks
             ORDER BY name ASC",
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| ParkRow {
            id: row.to_value("id").unwrap_or(0),
            name: row.to_value("name").unwrap_or_default(),
            location: row.to_value("location").unwrap_or(None),
            latitude: row.to_value("latitude").unwrap_or(None),
            longitude: row.to_value("longitude").unwrap_or(None),
            url: row.to_value("url").unwrap_or(None),
            image: row.to_value("image").unwrap_or(None),
        })
        .collect())
}

const CONTRIBUTION_SITES_SQL: &str = "SELECT id, name, location, url, image, description
     FROM parks
     ORDER BY name ASC";

const TEAM_MEMBERS_SQL: &str =
    "SELECT id, name, role, description, specialization, photo, display_order
     FROM team_members
     ORDER BY display_order ASC, name ASC";

/// Lists every park for the contribution page, ordered by name.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn contribution_sites(db: &dyn Database) -> Result<Vec<ContributionSiteRow>, DbError> {
    let rows = db.query_raw_params(CONTRIBUTION_SITES_SQL, &[]).await?;

    Ok(rows
        .iter()
        .map(|row| ContributionSiteRow {
            id: row.to_value("id").unwrap_or(0),
            name: row.to_value("name").unwrap_or_default(),
            location: row.to_value("location").unwrap_or(None),
            url: row.to_value("url").unwrap_or(None),
            image: row.to_value("image").unwrap_or(None),
            description: row
                .to_value::<Option<String>>("description")
                .unwrap_or(None)
                .filter(|d| !d.trim().is_empty()),
        })
        .collect())
}

/// Lists the project team by display order, then name.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn team_members(db: &dyn Database) -> Result<Vec<TeamMemberRow>, DbError> {
    let rows = db.query_raw_params(TEAM_MEMBERS_SQL, &[]).await?;

    Ok(rows
        .iter()
        .map(|row| TeamMemberRow {
            id: row.to_value("id").unwrap_or(0),
            name: row.to_value("name").unwrap_or_default(),
            role: row.to_value("role").unwrap_or(None),
            description: row.to_value("description").unwrap_or(None),
            specialization: row.to_value("specialization").unwrap_or(None),
            photo: row.to_value("photo").unwrap_or(None),
            display_order: row.to_value("display_order").unwrap_or(0),
        })
        .collect())
}

/// Number of species in the catalog.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn total_species(db: &dyn Database) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params("SELECT COUNT(*) AS total FROM birds", &[])
        .await?;

    Ok(rows
        .first()
        .and_then(|row| row.to_value::<i64>("total").ok())
        .unwrap_or(0))
}

/// Counts birds per reproduction period (`"Desconocido"` when unset).
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn counts_by_reproduction_period(db: &dyn Database) -> Result<Vec<LabelCount>, DbError> {
    count_by(db, CatalogColumn::ReproductionPeriod, "Desconocido", false).await
}

/// Counts birds per conservation category (`"Desconocido"` when unset).
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn counts_by_conservation_category(
    db: &dyn Database,
) -> Result<Vec<LabelCount>, DbError> {
    count_by(db, CatalogColumn::ConservationCategory, "Desconocido", false).await
}

/// Counts birds per family (`"Desconocida"` when unset), largest first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn counts_by_family(db: &dyn Database) -> Result<Vec<LabelCount>, DbError> {
    count_by(db, CatalogColumn::Family, "Desconocida", true).await
}

async fn count_by(
    db: &dyn Database,
    column: CatalogColumn,
    unknown_label: &str,
    largest_first: bool,
) -> Result<Vec<LabelCount>, DbError> {
    let column = column.column();
    let mut sql = format!(
        "SELECT COALESCE({column}, $1) AS label, COUNT(*) AS total FROM birds GROUP BY {column}"
    );
    if largest_first {
        sql.push_str(" ORDER BY total DESC");
    } else {
        write!(sql, " ORDER BY {column} ASC").unwrap();
    }

    let rows = db
        .query_raw_params(&sql, &[DatabaseValue::String(unknown_label.to_string())])
        .await?;

    Ok(rows
        .iter()
        .map(|row| LabelCount {
            label: row.to_value("label").unwrap_or_default(),
            total: row.to_value("total").unwrap_or(0),
        })
        .collect())
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the catalog `SELECT` and its bound parameters.
///
/// # Panics
///
/// Never in practice; writing to a `String` cannot fail.
#[must_use]
pub fn build_catalog_sql(query: &CatalogQuery) -> (String, Vec<DatabaseValue>) {
    let mut sql = String::from(
        "SELECT id, common_name, scientific_name, family, bird_type, endemic,
                description, weight, size, lifespan, habitat, wintering_area,
                migratory_pattern, conservation_category, recovery_plan,
                reproduction_period, curiosities, photo
         FROM birds
         WHERE 1=1",
    );

    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut param_idx = 1u32;

    let initial = query.initial_field.column();
    match query.letter {
        Some(LetterFilter::Letter(letter)) => {
            write!(sql, " AND {initial} ILIKE ${param_idx}").unwrap();
            params.push(DatabaseValue::String(format!("{letter}%")));
            param_idx += 1;
        }
        Some(LetterFilter::NonAlphabetic) => {
            write!(sql, " AND {initial} !~ '^[A-Za-z]'").unwrap();
        }
        None => {}
    }

    if let Some(name) = query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        write!(
            sql,
            " AND (common_name ILIKE ${param_idx} OR scientific_name ILIKE ${param_idx})"
        )
        .unwrap();
        params.push(DatabaseValue::String(format!("%{}%", escape_like(name))));
        param_idx += 1;
    }

    for (column, value) in &query.filters {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        write!(sql, " AND {} = ${param_idx}", column.column()).unwrap();
        params.push(DatabaseValue::String(value.to_string()));
        param_idx += 1;
    }

    if let Some(min) = query.lifespan_min {
        write!(sql, " AND lifespan >= ${param_idx}").unwrap();
        params.push(DatabaseValue::Int32(min));
        param_idx += 1;
    }

    if let Some(max) = query.lifespan_max {
        write!(sql, " AND lifespan <= ${param_idx}").unwrap();
        params.push(DatabaseValue::Int32(max));
    }

    if query.endemic_only {
        sql.push_str(" AND endemic = TRUE");
    }

    if query.recovery_plan_only {
        sql.push_str(" AND (recovery_plan IS NOT NULL AND recovery_plan <> '')");
    }

    sql.push_str(" ORDER BY common_name ASC");

    (sql, params)
}

/// Queries the bird catalog with the given filters, ordered by common name.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn catalog(db: &dyn Database, query: &CatalogQuery) -> Result<Vec<BirdRow>, DbError> {
    let (sql, params) = build_catalog_sql(query);
    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows.iter().map(row_to_bird).collect())
}

/// Returns the sorted distinct non-empty values of `column`.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn distinct_values(
    db: &dyn Database,
    column: CatalogColumn,
) -> Result<Vec<String>, DbError> {
    let column = column.column();
    let sql = format!(
        "SELECT DISTINCT {column} AS val FROM birds
         WHERE {column} IS NOT NULL AND {column} <> ''
         ORDER BY {column} ASC"
    );

    let rows = db.query_raw_params(&sql, &[]).await?;

    Ok(rows
        .iter()
        .filter_map(|row| row.to_value::<Option<String>>("val").unwrap_or(None))
        .collect())
}

/// Loads the distinct values of every filterable catalog column.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub async fn catalog_filter_values(db: &dyn Database) -> Result<CatalogFilterValues, DbError> {
    let mut values = CatalogFilterValues::default();
    for column in CatalogColumn::ALL {
        *values.values_mut(column) = distinct_values(db, column).await?;
    }
    Ok(values)
}

fn row_to_site(row: &switchy_database::Row) -> Site {
    Site {
        id: row.to_value("park_id").unwrap_or(0),
        name: row.to_value("park_name").unwrap_or_default(),
        latitude: row.to_value("latitude").unwrap_or(None),
        longitude: row.to_value("longitude").unwrap_or(None),
    }
}

fn row_to_bird(row: &switchy_database::Row) -> BirdRow {
    BirdRow {
        id: row.to_value("id").unwrap_or(0),
        common_name: row.to_value("common_name").unwrap_or_default(),
        scientific_name: row.to_value("scientific_name").unwrap_or(None),
        family: row.to_value("family").unwrap_or(None),
        bird_type: row.to_value("bird_type").unwrap_or(None),
        endemic: row.to_value("endemic").unwrap_or(false),
        description: row.to_value("description").unwrap_or(None),
        weight: row.to_value("weight").unwrap_or(None),
        size: row.to_value("size").unwrap_or(None),
        lifespan: row.to_value("lifespan").unwrap_or(None),
        habitat: row.to_value("habitat").unwrap_or(None),
        wintering_area: row.to_value("wintering_area").unwrap_or(None),
        migratory_pattern: row.to_value("migratory_pattern").unwrap_or(None),
        conservation_category: row.to_value("conservation_category").unwrap_or(None),
        recovery_plan: row.to_value("recovery_plan").unwrap_or(None),
        reproduction_period: row.to_value("reproduction_period").unwrap_or(None),
        curiosities: row.to_value("curiosities").unwrap_or(None),
        photo: row.to_value("photo").unwrap_or(None),
    }
}
