//! Season-weighted species estimate per site.
//!
//! The estimate is display-oriented: it maps each species group onto the
//! seasons in which it is plausibly present, from its reproduction period
//! and free-text migratory pattern. It does not model populations.

use std::collections::BTreeMap;

use aves_mallorca_density_models::{
    ReproductionPeriod, SeasonalDensity, SeasonalGroupRow, SeasonalVector, SiteSeasons,
    SpeciesObservation,
};

/// Share of a migratory group that counts towards autumn, as `3 / 5`.
const MIGRANT_AUTUMN_NUMERATOR: u64 = 3;
const MIGRANT_AUTUMN_DENOMINATOR: u64 = 5;

fn pattern_mentions(pattern: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| pattern.contains(needle))
}

/// Estimates the seasonal contribution of `count` distinct species sharing
/// a reproduction period and migratory pattern.
///
/// * Spring and summer take `count` when the period is that season or
///   `"Todo el año"`.
/// * Autumn takes `floor(count * 0.6)` for migrants (`migrador`,
///   `estival`), otherwise `count` for residents or all-year breeders.
/// * Winter takes `count` for residents and wintering species
///   (`residente`, `hivernante`, `invernada`) or all-year breeders.
///
/// Patterns match case-insensitively on substrings. Unknown periods and
/// missing patterns contribute nothing on their own.
#[must_use]
pub fn estimate_group(period: Option<&str>, pattern: Option<&str>, count: u64) -> SeasonalVector {
    let period = period.and_then(|p| p.parse::<ReproductionPeriod>().ok());
    let pattern = pattern.map(str::to_lowercase).unwrap_or_default();
    let all_year = period == Some(ReproductionPeriod::AllYear);

    let mut seasons = SeasonalVector::default();

    if all_year || period == Some(ReproductionPeriod::Spring) {
        seasons.spring = count;
    }
    if all_year || period == Some(ReproductionPeriod::Summer) {
        seasons.summer = count;
    }

    if pattern_mentions(&pattern, &["migrador", "estival"]) {
        seasons.autumn = count * MIGRANT_AUTUMN_NUMERATOR / MIGRANT_AUTUMN_DENOMINATOR;
    } else if all_year || pattern.contains("residente") {
        seasons.autumn = count;
    }

    if all_year || pattern_mentions(&pattern, &["residente", "hivernante", "invernada"]) {
        seasons.winter = count;
    }

    seasons
}

/// Estimates a single observed species (a group of one).
#[must_use]
pub fn estimate_observation(observation: &SpeciesObservation) -> SeasonalVector {
    estimate_group(
        observation.reproduction_period.as_deref(),
        observation.migratory_pattern.as_deref(),
        1,
    )
}

/// Folds a site's new running autumn total into the global statistic.
///
/// The global autumn figure re-adds the site's cumulative autumn total
/// after every group instead of the group's own increment, so a site with
/// several autumn groups is counted more than once. This is most likely a
/// defect, but the published figures depend on it; changing the body to
/// add the increment is the whole fix.
fn accumulate_autumn_statistic(stats: &mut SeasonalVector, site_autumn_total: u64) {
    stats.autumn += site_autumn_total;
}

/// Builds the site-level seasonal report from grouped storage rows.
///
/// Sites keep the order in which they first appear in `rows`. Rows for
/// sites without species (count 0) still register the site with a zero
/// vector.
#[must_use]
pub fn estimate(rows: &[SeasonalGroupRow]) -> SeasonalDensity {
    let mut locations: Vec<SiteSeasons> = Vec::new();
    let mut index_by_id: BTreeMap<i64, usize> = BTreeMap::new();
    let mut seasonal_stats = SeasonalVector::default();

    for row in rows {
        let index = *index_by_id.entry(row.site.id).or_insert_with(|| {
            locations.push(SiteSeasons {
                site: row.site.clone(),
                seasons: SeasonalVector::default(),
            });
            locations.len() - 1
        });

        let increment = estimate_group(
            row.reproduction_period.as_deref(),
            row.migratory_pattern.as_deref(),
            row.species_count,
        );

        let site = &mut locations[index].seasons;
        site.merge(&increment);

        seasonal_stats.spring += increment.spring;
        seasonal_stats.summer += increment.summer;
        seasonal_stats.winter += increment.winter;
        accumulate_autumn_statistic(&mut seasonal_stats, site.autumn);
    }

    let max_intensity = locations
        .iter()
        .map(|location| location.seasons.max())
        .max()
        .unwrap_or(0);

    log::debug!(
        "Estimated seasons for {} sites from {} groups (max intensity {max_intensity})",
        locations.len(),
        rows.len(),
    );

    SeasonalDensity {
        count: locations.len(),
        max_intensity,
        seasonal_stats,
        locations,
    }
}

#[cfg(test)]
mod tests {
    use aves_mallorca_density_models::Site;

    use super::*;

    fn site(id: i64) -> Site {
        Site {
            id,
            name: format!("Site {id}"),
            latitude: Some(39.6),
            longitude: Some(2.9),
        }
    }

    fn row(id: i64, period: Option<&str>, pattern: Option<&str>, n: u64) -> SeasonalGroupRow {
        SeasonalGroupRow {
            site: site(id),
            reproduction_period: period.map(str::to_string),
            migratory_pattern: pattern.map(str::to_string),
            species_count: n,
        }
    }

    #[test]
    fn all_year_counts_in_every_season() {
        assert_eq!(
            estimate_group(Some("Todo el año"), None, 1),
            SeasonalVector::new(1, 1, 1, 1)
        );
    }

    #[test]
    fn summer_migrant_gets_floored_autumn_share() {
        assert_eq!(
            estimate_group(None, Some("Migrador estival"), 5),
            SeasonalVector::new(0, 0, 3, 0)
        );
        assert_eq!(
            estimate_group(None, Some("migrador"), 4),
            SeasonalVector::new(0, 0, 2, 0)
        );
        assert_eq!(
            estimate_group(None, Some("Estival"), 1),
            SeasonalVector::new(0, 0, 0, 0)
        );
    }

    #[test]
    fn migrant_share_is_floor_of_three_fifths() {
        for n in 0..200_u64 {
            let got = estimate_group(None, Some("migrador"), n).autumn;
            assert!(got * 5 <= n * 3, "n = {n}");
            assert!((got + 1) * 5 > n * 3, "n = {n}");
        }
    }

    #[test]
    fn resident_counts_autumn_and_winter() {
        assert_eq!(
            estimate_group(Some("Primavera"), Some("Residente"), 2),
            SeasonalVector::new(2, 0, 2, 2)
        );
    }

    #[test]
    fn migrant_rule_wins_over_resident_for_autumn() {
        assert_eq!(
            estimate_group(Some("Todo el año"), Some("Residente y migrador"), 10),
            SeasonalVector::new(10, 10, 6, 10)
        );
    }

    #[test]
    fn wintering_patterns_count_winter() {
        assert_eq!(
            estimate_group(Some("Invierno"), Some("Hivernante"), 3),
            SeasonalVector::new(0, 0, 0, 3)
        );
        assert_eq!(
            estimate_group(None, Some("De invernada"), 3),
            SeasonalVector::new(0, 0, 0, 3)
        );
    }

    #[test]
    fn missing_and_unknown_values_contribute_nothing() {
        assert_eq!(estimate_group(None, None, 9), SeasonalVector::default());
        assert_eq!(
            estimate_group(Some("Desconocido"), Some(""), 9),
            SeasonalVector::default()
        );
        assert_eq!(estimate_group(Some("Verano"), None, 9), SeasonalVector::new(0, 9, 0, 0));
    }

    #[test]
    fn observation_is_a_group_of_one() {
        let observation = SpeciesObservation {
            species_id: Some(1),
            common_name: Some("Curruca balear".to_string()),
            scientific_name: Some("Curruca balearica".to_string()),
            family: Some("Sylviidae".to_string()),
            reproduction_period: Some("Todo el año".to_string()),
            migratory_pattern: Some("Residente".to_string()),
            endemic: true,
            conservation_category: None,
        };
        assert_eq!(
            estimate_observation(&observation),
            SeasonalVector::new(1, 1, 1, 1)
        );
    }

    #[test]
    fn site_without_species_has_zero_vector() {
        let density = estimate(&[row(1, None, None, 0)]);
        assert_eq!(density.count, 1);
        assert_eq!(density.locations[0].seasons, SeasonalVector::default());
        assert_eq!(density.max_intensity, 0);
    }

    #[test]
    fn folds_groups_per_site_in_first_appearance_order() {
        let density = estimate(&[
            row(7, Some("Primavera"), Some("Migrador estival"), 5),
            row(3, Some("Todo el año"), None, 2),
            row(7, Some("Invierno"), Some("Hivernante"), 4),
        ]);

        let ids: Vec<_> = density.locations.iter().map(|l| l.site.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(density.locations[0].seasons, SeasonalVector::new(5, 0, 3, 4));
        assert_eq!(density.locations[1].seasons, SeasonalVector::new(2, 2, 2, 2));
        assert_eq!(density.max_intensity, 5);
    }

    #[test]
    fn global_autumn_statistic_re_adds_running_site_total() {
        let density = estimate(&[
            row(1, None, Some("Residente"), 2),
            row(1, None, Some("Residente"), 3),
        ]);

        assert_eq!(density.locations[0].seasons.autumn, 5);
        // 2 after the first group, then the running total 5 again.
        assert_eq!(density.seasonal_stats.autumn, 7);
        assert_eq!(density.seasonal_stats.winter, 5);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let density = estimate(&[]);
        assert_eq!(density.count, 0);
        assert_eq!(density.max_intensity, 0);
        assert!(density.locations.is_empty());
    }
}
