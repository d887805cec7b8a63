use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::warn;

use hr_records_storage::Database;
use hr_records_util::Environment;

use crate::auth::{self, CredentialStore};
use crate::services::{DepartmentService, EmployeeService};
use crate::{departments, employees, telemetry};

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    database: Database,
    departments: DepartmentService,
    employees: EmployeeService,
    credentials: Arc<dyn CredentialStore>,
    environment: Environment,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        metrics: PrometheusHandle,
        database: Database,
        credentials: Arc<dyn CredentialStore>,
        environment: Environment,
    ) -> Self {
        let departments = DepartmentService::new(&database);
        let employees = EmployeeService::new(&database, departments.clone());
        Self {
            metrics,
            database,
            departments,
            employees,
            credentials,
            environment,
            started_at: Utc::now(),
        }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn departments(&self) -> &DepartmentService {
        &self.departments
    }

    pub fn employees(&self) -> &EmployeeService {
        &self.employees
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Builds the full HTTP surface. Every route requires Basic credentials;
/// `/mgt-details` additionally requires the admin role.
pub fn app_router(state: AppState) -> Router {
    let management = Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn(auth::require_admin));

    Router::new()
        .route(
            "/api/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/api/departments/:id",
            get(departments::get)
                .put(departments::update)
                .delete(departments::delete),
        )
        .route("/api/employees", get(employees::list).post(employees::create))
        .route(
            "/api/employees/:id",
            get(employees::get)
                .put(employees::update)
                .delete(employees::delete),
        )
        .nest("/mgt-details", management)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_principal,
        ))
        .layer(middleware::from_fn(telemetry::track_http))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    database: &'static str,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    match state.database().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthBody {
                status: "UP",
                database: "UP",
            }),
        ),
        Err(err) => {
            warn!(stage = "health", error = %err, "database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody {
                    status: "DOWN",
                    database: "DOWN",
                }),
            )
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoBody {
    name: &'static str,
    version: &'static str,
    git_sha: &'static str,
    environment: &'static str,
    started_at: DateTime<Utc>,
}

async fn info(State(state): State<AppState>) -> Json<InfoBody> {
    Json(InfoBody {
        name: "hr-records",
        version: telemetry::BUILD_VERSION,
        git_sha: telemetry::build_git_sha(),
        environment: state.environment().as_str(),
        started_at: state.started_at(),
    })
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
