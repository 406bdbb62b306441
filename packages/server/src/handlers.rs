//! HTTP handler functions for the terror map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use terror_map_dataset::DatasetStatus;
use terror_map_filter::aggregate::summarize;
use terror_map_filter::dashboard::recompute;
use terror_map_filter::filter::{apply, map_points};
use terror_map_filter::options::{country_options as derive_country_options, filter_options};
use terror_map_incident_models::Dataset;
use terror_map_server_models::{
    ApiCountryOptions, ApiDashboard, ApiError, ApiHealth, ApiIncidents, ApiStatistics,
    CountryOptionsParams, FilterQueryParams, LimitParams,
};

use crate::AppState;

/// Returns the dataset, or a `503` response if it never loaded.
fn require_dataset(state: &AppState) -> Result<&Arc<Dataset>, HttpResponse> {
    match &state.dataset {
        DatasetStatus::Ready(dataset) => Ok(dataset),
        DatasetStatus::Unavailable { reason } => {
            Err(HttpResponse::ServiceUnavailable().json(ApiError {
                error: "dataset unavailable".to_string(),
                detail: Some(reason.clone()),
            }))
        }
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_loaded: state.dataset.is_ready(),
    })
}

/// `GET /api/options`
///
/// Returns every option list. The country list is narrowed by the
/// `regions` parameter.
pub async fn options(
    state: web::Data<AppState>,
    params: web::Query<CountryOptionsParams>,
) -> HttpResponse {
    let dataset = match require_dataset(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(filter_options(
        dataset,
        &params.selected_regions(),
        state.year_mark_step,
    ))
}

/// `GET /api/options/countries`
///
/// Returns the countries valid for the `regions` parameter.
pub async fn country_options(
    state: web::Data<AppState>,
    params: web::Query<CountryOptionsParams>,
) -> HttpResponse {
    let dataset = match require_dataset(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    let regions = params.selected_regions();
    let countries = derive_country_options(dataset, &regions);

    HttpResponse::Ok().json(ApiCountryOptions { regions, countries })
}

/// `GET /api/incidents`
///
/// Returns plottable points for the filtered subset. Selections are applied
/// exactly as given, so a country outside the selected regions yields no
/// points.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
    limit: web::Query<LimitParams>,
) -> HttpResponse {
    let dataset = match require_dataset(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    let filter_state = params.to_filter_state(dataset.year_bounds());
    let filtered = apply(dataset, &filter_state);
    let mut points = map_points(filtered.iter().copied());
    let plottable = points.len() as u64;

    let truncated = limit.limit.is_some_and(|l| points.len() > l);
    if let Some(l) = limit.limit {
        points.truncate(l);
    }

    HttpResponse::Ok().json(ApiIncidents {
        total: filtered.len() as u64,
        plottable,
        truncated,
        points,
    })
}

/// `GET /api/statistics`
///
/// Returns the summary statistics and rendered panel for the filtered
/// subset.
pub async fn statistics(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let dataset = match require_dataset(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    let filter_state = params.to_filter_state(dataset.year_bounds());
    let stats = summarize(apply(dataset, &filter_state));

    HttpResponse::Ok().json(ApiStatistics::from(stats))
}

/// `GET /api/dashboard`
///
/// Runs one full recomputation pass. Unlike the other endpoints, selected
/// countries outside the selected regions are dropped first, and the
/// effective filter state is echoed back.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let dataset = match require_dataset(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    let filter_state = params.to_filter_state(dataset.year_bounds());
    let view = recompute(dataset, filter_state, state.year_mark_step);

    HttpResponse::Ok().json(ApiDashboard {
        filter_state: view.filter_state,
        options: view.options,
        map_points: view.map_points,
        statistics: view.statistics.into(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use terror_map_filter_models::DEFAULT_YEAR_MARK_STEP;
    use terror_map_incident_models::{Incident, IncidentDetails};

    use super::*;
    use crate::configure;

    fn incident(
        year: i32,
        region: &str,
        country: &str,
        attack_type: &str,
        kill_count: Option<f64>,
    ) -> Incident {
        Incident {
            year,
            region: region.to_string(),
            country: country.to_string(),
            attack_type: attack_type.to_string(),
            latitude: Some(33.0),
            longitude: Some(44.0),
            kill_count,
            details: IncidentDetails::default(),
        }
    }

    fn ready_state() -> web::Data<AppState> {
        let dataset = Dataset::new(vec![
            incident(2001, "MENA", "Iraq", "Bombing", Some(5.0)),
            incident(2005, "MENA", "Iraq", "Assault", None),
            incident(2010, "Asia", "India", "Bombing", Some(3.0)),
        ]);
        web::Data::new(AppState {
            dataset: DatasetStatus::Ready(Arc::new(dataset)),
            year_mark_step: DEFAULT_YEAR_MARK_STEP,
        })
    }

    fn unavailable_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            dataset: DatasetStatus::Unavailable {
                reason: "I/O error: not found".to_string(),
            },
            year_mark_step: DEFAULT_YEAR_MARK_STEP,
        })
    }

    async fn get_json(state: web::Data<AppState>, uri: &str) -> (u16, serde_json::Value) {
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status().as_u16();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn health_reports_dataset_status() {
        let (status, body) = get_json(ready_state(), "/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["datasetLoaded"], true);

        let (status, body) = get_json(unavailable_state(), "/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["datasetLoaded"], false);
    }

    #[actix_web::test]
    async fn country_options_cascade_from_regions() {
        let (_, body) = get_json(ready_state(), "/api/options/countries").await;
        assert_eq!(body["countries"], serde_json::json!(["India", "Iraq"]));

        let (_, body) = get_json(ready_state(), "/api/options/countries?regions=MENA").await;
        assert_eq!(body["countries"], serde_json::json!(["Iraq"]));
    }

    #[actix_web::test]
    async fn options_include_year_marks() {
        let (_, body) = get_json(ready_state(), "/api/options?regions=Asia").await;
        assert_eq!(body["regions"], serde_json::json!(["Asia", "MENA"]));
        assert_eq!(body["countries"], serde_json::json!(["India"]));
        assert_eq!(body["yearBounds"]["min"], 2001);
        assert_eq!(body["yearMarks"][1]["year"], 2006);
    }

    #[actix_web::test]
    async fn statistics_for_region_scenario() {
        let (status, body) = get_json(
            ready_state(),
            "/api/statistics?regions=MENA&yearFrom=2000&yearTo=2020",
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["statistics"]["totalIncidents"], 2);
        assert_eq!(body["statistics"]["totalCasualties"], 5.0);
        assert_eq!(body["statistics"]["topCountry"], "Iraq");
        assert_eq!(body["statistics"]["topAttackType"], "Bombing");
    }

    #[actix_web::test]
    async fn statistics_for_empty_year_gap() {
        let (_, body) = get_json(ready_state(), "/api/statistics?yearFrom=2006&yearTo=2009").await;
        assert_eq!(body["statistics"]["totalIncidents"], 0);
        assert_eq!(body["statistics"]["totalCasualties"], 0.0);
        assert!(body["statistics"]["topCountry"].is_null());
        assert!(body["statistics"]["topAttackType"].is_null());
        assert_eq!(body["panel"][2]["value"], "N/A");
    }

    #[actix_web::test]
    async fn statistics_for_years_after_dataset() {
        let (_, body) = get_json(ready_state(), "/api/statistics?yearFrom=2020&yearTo=2030").await;
        assert_eq!(body["statistics"]["totalIncidents"], 0);

        let (_, body) = get_json(ready_state(), "/api/statistics?yearFrom=2020").await;
        assert_eq!(body["statistics"]["totalIncidents"], 0);
    }

    #[actix_web::test]
    async fn incidents_respect_limit() {
        let (_, body) = get_json(ready_state(), "/api/incidents?attackTypes=Bombing&limit=1").await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["plottable"], 2);
        assert_eq!(body["truncated"], true);
        assert_eq!(body["points"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn incidents_keep_impossible_combination_empty() {
        let (_, body) = get_json(ready_state(), "/api/incidents?regions=Asia&countries=Iraq").await;
        assert_eq!(body["total"], 0);
    }

    #[actix_web::test]
    async fn dashboard_drops_countries_outside_regions() {
        let (_, body) = get_json(
            ready_state(),
            "/api/dashboard?regions=Asia&countries=Iraq,India",
        )
        .await;
        assert_eq!(body["filterState"]["countries"], serde_json::json!(["India"]));
        assert_eq!(body["statistics"]["statistics"]["totalIncidents"], 1);
        assert_eq!(body["mapPoints"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn data_endpoints_report_unavailable_dataset() {
        for uri in [
            "/api/options",
            "/api/options/countries",
            "/api/incidents",
            "/api/statistics",
            "/api/dashboard",
        ] {
            let (status, body) = get_json(unavailable_state(), uri).await;
            assert_eq!(status, 503, "{uri} should be unavailable");
            assert_eq!(body["error"], "dataset unavailable");
        }
    }
}
