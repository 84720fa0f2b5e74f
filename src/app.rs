use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::analytics::{DashboardSummary, TOP_SOFTWARE_LIMIT, aggregate_by_type, top_software};
use crate::client::{ScriptClient, SheetClient, http_client};
use crate::config::Config;
use crate::downloader::{export_filename, to_csv, to_xlsx};
use crate::error::{Result, ShowcaseError};
use crate::graph::{self, ChartOptions};
use crate::pages::{
    ANALYTICS_UNAVAILABLE, LIST_UNAVAILABLE, Notice, Pages, SHOWCASE_UNAVAILABLE, SubmitStatus,
};
use crate::record::{ProjectRecord, fields};
use crate::store::ProjectStore;
use crate::theme::build_cards;

pub struct AppState {
    pub config: Config,
    pub sheet: SheetClient,
    pub script: ScriptClient,
    pub store: ProjectStore,
    pub pages: Pages,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = http_client(config.request_timeout)?;
        Ok(Self {
            sheet: SheetClient::from_config(http.clone(), &config),
            script: ScriptClient::from_config(http, &config),
            store: ProjectStore::new(),
            pages: Pages::new()?,
            config,
        })
    }
}

/// Fields of the add and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectForm {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Video Link", default)]
    pub video_link: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Materials", default)]
    pub materials: String,
    #[serde(rename = "Software", default)]
    pub software: String,
    #[serde(rename = "Code", default)]
    pub code: String,
}

impl ProjectForm {
    /// Every form field becomes a column, empty ones included.
    pub fn into_record(self) -> ProjectRecord {
        ProjectRecord::from_pairs([
            (fields::NAME, self.name),
            (fields::TYPE, self.kind),
            (fields::VIDEO_LINK, self.video_link),
            (fields::DESCRIPTION, self.description),
            (fields::MATERIALS, self.materials),
            (fields::SOFTWARE, self.software),
            (fields::CODE, self.code),
        ])
    }
}

#[derive(Deserialize)]
struct AddQuery {
    status: Option<SubmitStatus>,
}

#[derive(Deserialize)]
struct ListQuery {
    notice: Option<Notice>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(serve_showcase))
        .route("/dashboard", get(|| async { Redirect::to("/dashboard/add") }))
        .route("/dashboard/add", get(serve_add_view))
        .route("/dashboard/projects", get(list_projects).post(create_project))
        .route("/dashboard/projects/:row", post(update_project))
        .route("/dashboard/projects/:row/edit", get(edit_project))
        .route("/dashboard/projects/:row/delete", post(delete_project))
        .route("/dashboard/analytics", get(serve_analytics))
        .route("/dashboard/charts/types.png", get(type_chart))
        .route("/dashboard/charts/software.png", get(software_chart))
        .route("/dashboard/export.csv", get(export_csv))
        .route("/dashboard/export.xlsx", get(export_xlsx))
        .nest_service("/static", static_files)
        .with_state(state)
}

pub async fn run(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let address = config.bind_address();

    // Setup app state
    let app_state = Arc::new(AppState::new(config)?);
    let app = router(app_state);

    // Start server
    let listener = TcpListener::bind(&address).await?;
    log::info!("Listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}

fn html_response(html: Result<String>) -> Response {
    match html {
        Ok(body) => Html(body).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: ShowcaseError) -> Response {
    if e.is_network_failure() {
        log::error!("upstream failure: {}", e);
        (StatusCode::BAD_GATEWAY, "Upstream data source unavailable").into_response()
    } else {
        log::error!("request failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
    }
}

async fn serve_showcase(State(state): State<Arc<AppState>>) -> Response {
    let html = match state.sheet.fetch_projects().await {
        Ok(projects) => state.pages.showcase(&build_cards(&projects), None),
        Err(e) => {
            log::error!("Error fetching projects: {}", e);
            state.pages.showcase(&[], Some(SHOWCASE_UNAVAILABLE))
        }
    };
    html_response(html)
}

async fn serve_add_view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddQuery>,
) -> Response {
    html_response(state.pages.add_view(params.status))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ProjectForm>,
) -> Redirect {
    let status = match state.script.create(&form.into_record()).await {
        Ok(()) => SubmitStatus::Success,
        Err(e) => {
            log::error!("Error creating project: {}", e);
            SubmitStatus::Error
        }
    };
    Redirect::to(&format!("/dashboard/add?status={}", status.kind()))
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Response {
    let html = match state.script.list().await {
        Ok(projects) => {
            let html = state.pages.projects_view(&projects, params.notice, None);
            state.store.replace(projects);
            html
        }
        Err(e) => {
            log::error!("Error listing projects: {}", e);
            state
                .pages
                .projects_view(&[], params.notice, Some(LIST_UNAVAILABLE))
        }
    };
    html_response(html)
}

async fn edit_project(State(state): State<Arc<AppState>>, Path(row): Path<u32>) -> Response {
    match state.store.find(row) {
        Some(project) => html_response(state.pages.edit_view(row, &project)),
        None => Redirect::to("/dashboard/projects").into_response(),
    }
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(row): Path<u32>,
    Form(form): Form<ProjectForm>,
) -> Redirect {
    let notice = match state.script.update(row, &form.into_record()).await {
        Ok(()) => {
            tokio::time::sleep(state.config.refresh_delay).await;
            Notice::Updated
        }
        Err(e) => {
            log::error!("Error updating row {}: {}", row, e);
            Notice::UpdateFailed
        }
    };
    Redirect::to(&format!("/dashboard/projects?notice={}", notice.query()))
}

async fn delete_project(State(state): State<Arc<AppState>>, Path(row): Path<u32>) -> Redirect {
    let notice = match state.script.delete(row).await {
        Ok(()) => {
            tokio::time::sleep(state.config.refresh_delay).await;
            Notice::Deleted
        }
        Err(e) => {
            log::error!("Error deleting row {}: {}", row, e);
            Notice::DeleteFailed
        }
    };
    Redirect::to(&format!("/dashboard/projects?notice={}", notice.query()))
}

async fn serve_analytics(State(state): State<Arc<AppState>>) -> Response {
    let html = match state.script.list().await {
        Ok(projects) => {
            let summary = DashboardSummary::from_projects(&projects);
            state.store.replace(projects);
            state.pages.analytics_view(Ok(&summary))
        }
        Err(e) => {
            log::error!("Analytics Error: {}", e);
            state.pages.analytics_view(Err(ANALYTICS_UNAVAILABLE))
        }
    };
    html_response(html)
}

/// The last fetched list, or a fresh one when the dashboard has not fetched yet.
async fn current_projects(state: &AppState) -> Result<Vec<ProjectRecord>> {
    if let Some(projects) = state.store.snapshot() {
        return Ok(projects);
    }
    let projects = state.script.list().await?;
    state.store.replace(projects.clone());
    Ok(projects)
}

async fn render_png<F>(state: &AppState, draw: F) -> Response
where
    F: FnOnce(Vec<ProjectRecord>) -> Result<Vec<u8>> + Send + 'static,
{
    let projects = match current_projects(state).await {
        Ok(projects) => projects,
        Err(e) => return error_response(e),
    };

    // plotters rasterises on the CPU
    let png = tokio::task::spawn_blocking(move || draw(projects))
        .await
        .map_err(|e| ShowcaseError::Chart(e.to_string()))
        .and_then(|png| png);

    match png {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => error_response(e),
    }
}

async fn type_chart(State(state): State<Arc<AppState>>) -> Response {
    render_png(&state, |projects| {
        graph::type_chart_png(&aggregate_by_type(&projects), &ChartOptions::types())
    })
    .await
}

async fn software_chart(State(state): State<Arc<AppState>>) -> Response {
    render_png(&state, |projects| {
        graph::software_chart_png(
            &top_software(&projects, TOP_SOFTWARE_LIMIT),
            &ChartOptions::software(),
        )
    })
    .await
}

fn download(bytes: Vec<u8>, content_type: &str, extension: &str) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export_filename(extension));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    match current_projects(&state).await {
        Ok(projects) => download(to_csv(&projects).into_bytes(), "text/csv; charset=utf-8", "csv"),
        Err(e) => error_response(e),
    }
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Response {
    match current_projects(&state).await.and_then(|p| to_xlsx(&p)) {
        Ok(bytes) => download(
            bytes,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "xlsx",
        ),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, body::Body, http::Request};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    type Received = Arc<Mutex<Vec<Value>>>;

    const SHEET_CSV: &str = "Name,Type,Software\n\
        Arm,Robotics,\"ROS, Python\"\n\
        BadRow\n\
        ,Robotics,ROS\n\
        Gripper,Automation,Arduino";

    fn listed_projects() -> Value {
        let kinds = [
            "Robotics", "robotics", "ROBOTICS", "RoBoTiCs", "Automation",
            "Automation", "3D Modeling", "Painting", "", "Other",
        ];
        Value::Array(
            kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| {
                    json!({"Name": format!("Project {i}"), "Type": kind, "Software": "ROS", "_row": i + 2})
                })
                .collect(),
        )
    }

    async fn fake_backend(received: Received) -> String {
        async fn write(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
            received.lock().unwrap().push(body);
            StatusCode::OK
        }
        let router = Router::new()
            .route("/sheet.csv", get(|| async { SHEET_CSV }))
            .route("/exec", get(|| async { Json(listed_projects()) }).post(write))
            .with_state(received);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn app_with(base: &str) -> Router {
        let config = Config {
            csv_url: format!("{base}/sheet.csv"),
            script_url: format!("{base}/exec"),
            refresh_delay: Duration::ZERO,
            request_timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        };
        router(Arc::new(AppState::new(config).unwrap()))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn showcase_renders_named_well_formed_rows() {
        let base = fake_backend(Received::default()).await;
        let response = app_with(&base).await.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Arm"));
        assert!(html.contains("Gripper"));
        assert!(html.contains(">Python<"));
        assert!(!html.contains("BadRow"));
    }

    #[tokio::test]
    async fn showcase_shows_inline_error_when_sheet_is_missing() {
        let base = fake_backend(Received::default()).await;
        let app = app_with(&format!("{base}/nowhere")).await;
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(SHOWCASE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn analytics_reports_top_category() {
        let base = fake_backend(Received::default()).await;
        let response = app_with(&base)
            .await
            .oneshot(get_request("/dashboard/analytics"))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Robotics (4)"));
        assert!(html.contains(">10<"));
        assert!(html.contains("ROS (10)"));
    }

    #[tokio::test]
    async fn create_posts_form_fields() {
        let received = Received::default();
        let base = fake_backend(received.clone()).await;
        let response = app_with(&base)
            .await
            .oneshot(form_request(
                "/dashboard/projects",
                "Name=Arm&Type=Robotics&Video+Link=&Software=ROS%2C+Python",
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/dashboard/add?status=success");

        let bodies = received.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["action"], "create");
        assert_eq!(bodies[0]["Name"], "Arm");
        assert_eq!(bodies[0]["Software"], "ROS, Python");
        assert_eq!(bodies[0]["Video Link"], "");
    }

    #[tokio::test]
    async fn delete_sends_row_and_redirects_with_notice() {
        let received = Received::default();
        let base = fake_backend(received.clone()).await;
        let response = app_with(&base)
            .await
            .oneshot(form_request("/dashboard/projects/5/delete", ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/dashboard/projects?notice=deleted");
        assert_eq!(
            received.lock().unwrap().clone(),
            vec![json!({"action": "delete", "_row": 5})]
        );
    }

    #[tokio::test]
    async fn edit_looks_up_last_fetched_list() {
        let base = fake_backend(Received::default()).await;
        let app = app_with(&base).await;

        let before = app.clone().oneshot(get_request("/dashboard/projects/3/edit")).await.unwrap();
        assert_eq!(location(&before), "/dashboard/projects");

        let list = app.clone().oneshot(get_request("/dashboard/projects")).await.unwrap();
        assert!(body_text(list).await.contains("/dashboard/projects/3/edit"));

        let after = app.oneshot(get_request("/dashboard/projects/3/edit")).await.unwrap();
        assert_eq!(after.status(), StatusCode::OK);
        assert!(body_text(after).await.contains("value=\"Project 1\""));
    }

    #[tokio::test]
    async fn failed_write_reports_error_status() {
        let base = fake_backend(Received::default()).await;
        let app = app_with(&format!("{base}/nowhere")).await;
        let response = app
            .oneshot(form_request("/dashboard/projects", "Name=Arm"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/dashboard/add?status=error");
    }

    #[tokio::test]
    async fn csv_export_is_an_attachment() {
        let base = fake_backend(Received::default()).await;
        let response = app_with(&base)
            .await
            .oneshot(get_request("/dashboard/export.csv"))
            .await
            .unwrap();
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"projects-"));
        let csv = body_text(response).await;
        assert!(csv.starts_with("Name,Type,"));
        assert_eq!(csv.lines().count(), 11);
    }

    #[tokio::test]
    async fn dashboard_root_redirects_to_add_view() {
        let base = fake_backend(Received::default()).await;
        let response = app_with(&base)
            .await
            .oneshot(get_request("/dashboard"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/dashboard/add");
    }
}
