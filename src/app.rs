#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::branding::FileLogo;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::form::ReportForm;
use crate::report::{ReportBuilder, ReportDocument};

const FORM_TEMPLATE: &str = "form";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

pub struct AppState {
    builder: ReportBuilder,
    templates: Handlebars<'static>,
}

/// Settings for the web front
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub logo: Option<PathBuf>,
    pub report: ReportConfig,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to render page: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("report task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{}", self);
        let body = StatusResponse {
            status: "error".to_string(),
            message: Some(self.to_string()),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_string(),
            logo: None,
            report: ReportConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read `[addr] [logo_path] [config_json]` from the command line
    ///
    /// Missing arguments keep their defaults; an empty string or `-` skips
    /// one, so a config file can be given without a logo.
    ///
    /// # Arguments
    /// * `args` - Arguments after the program name
    ///
    /// # Returns
    /// * `Result<ServerConfig, Box<dyn std::error::Error>>` - The config, or an error when
    ///   the report config file cannot be read
    pub fn from_args(args: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
        let given = |index: usize| {
            args.get(index)
                .map(|arg| arg.trim())
                .filter(|arg| !arg.is_empty() && *arg != "-")
        };

        let mut config = ServerConfig::default();
        if let Some(addr) = given(0) {
            config.addr = addr.to_string();
        }
        config.logo = given(1).map(PathBuf::from);
        if let Some(path) = given(2) {
            config.report = ReportConfig::from_json_file(path)?;
        }
        Ok(config)
    }
}

impl AppState {
    pub fn new(builder: ReportBuilder) -> Result<Self, Box<dyn std::error::Error>> {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        templates.register_template_string(FORM_TEMPLATE, include_str!("./static/form.hbs"))?;
        Ok(AppState { builder, templates })
    }
}

/// Build the router serving the form and the report endpoint
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_form))
        .route("/api/report", post(create_report))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ReportBuilder::new(config.report);
    if let Some(path) = config.logo {
        info!("Using logo {}", path.display());
        builder = builder.with_logo(FileLogo::new(path));
    }

    let app = router(Arc::new(AppState::new(builder)?));

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let config = state.builder.config();
    let page = state.templates.render(
        FORM_TEMPLATE,
        &serde_json::json!({
            "title": config.title,
            "hardware_title": config.hardware_title,
            "software_title": config.software_title,
            "file_prefix": config.file_prefix,
            "brand_color": format!("{:06X}", config.brand_color),
        }),
    )?;
    Ok(Html(page))
}

async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ReportForm>,
) -> Result<Response, AppError> {
    let mut report = form.into_report();
    if report.order.report_date.is_none() {
        report.order.report_date = Some(chrono::Local::now().date_naive());
    }

    // Logo resizing and workbook writing are CPU-bound
    let (report, document) = tokio::task::spawn_blocking(move || {
        let document = state.builder.build_document(&report);
        (report, document)
    })
    .await?;
    let document = document?;
    info!(
        "Generated {} ({} bytes, {} hardware / {} software items)",
        document.filename,
        document.bytes.len(),
        report.hardware.len(),
        report.software.len()
    );

    Ok(download(document))
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    })
}

fn download(document: ReportDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response()
}

// Plain filename for old clients, RFC 5987 form for everything else
fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState::new(ReportBuilder::default()).unwrap()))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn form_page_renders() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("Safari Micro - Serial Number Report"));
        assert!(page.contains("Client Name"));
        assert!(page.contains("#004785"));
        assert!(page.contains("decodeURIComponent(encoded[1])"));
    }

    #[tokio::test]
    async fn report_is_downloaded_as_xlsx() {
        let response = app()
            .oneshot(post_json(
                r#"{
                    "client_name": "Acme Co",
                    "order_number": "123",
                    "hardware": [{"product": "Switch", "model": "SW-24", "serials": "S1, S2"}]
                }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment;"));
        assert!(disposition.contains("filename=\"SafariMicro_Acme_Co_123.xlsx\""));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[0..2], b"PK");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_reports_are_built_off_the_runtime() {
        let app = app();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let app = app.clone();
                let body = format!(
                    r#"{{"client_name": "Client {i}", "order_number": "{i}",
                        "hardware": [{{"product": "Switch", "model": "SW", "serials": "S{i}"}}]}}"#
                );
                tokio::spawn(async move { app.oneshot(post_json(&body)).await.unwrap() })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let response = handle.await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
            assert!(disposition.contains(&format!("SafariMicro_Client_{i}_{i}.xlsx")));
        }
    }

    #[tokio::test]
    async fn empty_form_still_produces_a_report() {
        let response = app().oneshot(post_json("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let response = app().oneshot(post_json("{not json")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok","message":null}"#);
    }

    #[test]
    fn non_ascii_filenames_get_both_forms() {
        let value = content_disposition("SafariMicro_Café_1.xlsx");
        assert!(value.contains("filename=\"SafariMicro_Caf__1.xlsx\""));
        assert!(value.contains("filename*=UTF-8''SafariMicro_Caf%C3%A9_1.xlsx"));
    }

    #[test]
    fn server_args() {
        let config = ServerConfig::from_args(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000");
        assert!(config.logo.is_none());

        let args = vec!["0.0.0.0:8080".to_string(), "logo.png".to_string()];
        let config = ServerConfig::from_args(&args).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.logo, Some(PathBuf::from("logo.png")));

        let args = vec!["-".to_string(), "".to_string(), "/missing.json".to_string()];
        assert!(ServerConfig::from_args(&args).is_err());
    }
}
