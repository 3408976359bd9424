//! Maps HTTP requests onto handlers.

use crate::api::{ApiReply, ExitRequest, ParkRequest};
use crate::error::ServerError;
use crate::handler::RequestHandler;
use crate::http::{HttpRequest, HttpResponse, Method};
use crate::static_files::StaticFiles;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// API paths and the methods each accepts.
const API_ROUTES: &[(&str, &str)] = &[
    ("/api/park", "POST, OPTIONS"),
    ("/api/exit", "POST, OPTIONS"),
    ("/api/status", "GET, OPTIONS"),
    ("/api/vehicles", "GET, OPTIONS"),
    ("/api/history", "GET, OPTIONS"),
];

/// HTTP router for the API and, optionally, static files.
#[derive(Clone)]
pub struct Router {
    handler: RequestHandler,
    static_files: Option<StaticFiles>,
    cors: bool,
}

impl Router {
    /// Creates a router; static files and CORS follow the handler's config.
    pub fn new(handler: RequestHandler) -> Self {
        let config = &handler.context().config;
        let static_files = config.static_dir.clone().map(StaticFiles::new);
        let cors = config.cors;
        Self {
            handler,
            static_files,
            cors,
        }
    }

    /// Returns the request handler.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// Produces the response for one request.
    pub async fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        let response = self.route(request).await;
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "request served"
        );
        self.finish(response)
    }

    /// Produces the response for a request that failed before routing.
    pub fn error_response(&self, err: &ServerError) -> HttpResponse {
        if err.is_server_error() {
            warn!(error = %err, "request failed");
        } else {
            debug!(error = %err, "bad request");
        }
        self.finish(failure(err.status_code(), err.to_string()))
    }

    async fn route(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path.as_str();
        match (&request.method, path) {
            (Method::Options, _) => HttpResponse::empty(204)
                .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
                .with_header("Access-Control-Allow-Headers", "Content-Type")
                .with_header("Allow", ALLOWED_METHODS),
            (Method::Post, "/api/park") => self.json_call(request, |req: ParkRequest| {
                self.handler.handle_park(req)
            }),
            (Method::Post, "/api/exit") => self.json_call(request, |req: ExitRequest| {
                self.handler.handle_exit(req)
            }),
            (Method::Get, "/api/status") => HttpResponse::json(200, &self.handler.handle_status()),
            (Method::Get, "/api/vehicles") => {
                HttpResponse::json(200, &self.handler.handle_vehicles())
            }
            (Method::Get, "/api/history") => {
                HttpResponse::json(200, &self.handler.handle_history())
            }
            (method, path) => match allowed_for(path) {
                Some(allow) => failure(405, "Method not allowed").with_header("Allow", allow),
                None => match (&self.static_files, method) {
                    (Some(files), Method::Get) if !path.starts_with("/api/") => {
                        files.serve(path).await
                    }
                    _ => failure(404, "Not found"),
                },
            },
        }
    }

    fn json_call<Req, Res, F>(&self, request: &HttpRequest, call: F) -> HttpResponse
    where
        Req: DeserializeOwned,
        Res: Serialize,
        F: FnOnce(Req) -> Result<ApiReply<Res>, ServerError>,
    {
        let result = serde_json::from_slice::<Req>(&request.body)
            .map_err(ServerError::InvalidJson)
            .and_then(call);
        match result {
            Ok(reply) => HttpResponse::json(200, &reply),
            Err(err) => {
                debug!(path = %request.path, error = %err, "rejected request");
                failure(err.status_code(), err.to_string())
            }
        }
    }

    /// Adds the headers every response carries.
    pub(crate) fn finish(&self, response: HttpResponse) -> HttpResponse {
        if self.cors {
            response.with_header("Access-Control-Allow-Origin", "*")
        } else {
            response
        }
    }
}

fn allowed_for(path: &str) -> Option<&'static str> {
    API_ROUTES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, allow)| *allow)
}

fn failure(status: u16, message: impl Into<String>) -> HttpResponse {
    HttpResponse::json(status, &ApiReply::<()>::failure(message))
}
