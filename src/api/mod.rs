use crate::config::Config;
use crate::services::conversation_service::ConversationService;
use crate::services::directory_service::DirectoryService;
use crate::services::health_service::HealthService;
use crate::services::membership_service::MembershipService;
use crate::services::message_service::MessageService;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod conversations;
pub mod health;
pub mod messages;
pub mod middleware;
pub mod schemas;
pub mod users;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub conversation_service: ConversationService,
    pub message_service: MessageService,
    pub membership_service: MembershipService,
    pub directory_service: DirectoryService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub conversation_service: ConversationService,
    pub message_service: MessageService,
    pub membership_service: MembershipService,
    pub directory_service: DirectoryService,
}

/// Configures and returns the primary application router.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let state = AppState {
        config,
        conversation_service: services.conversation_service,
        message_service: services.message_service,
        membership_service: services.membership_service,
        directory_service: services.directory_service,
    };

    let api_routes = Router::new()
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations", post(conversations::create_conversation))
        .route("/conversations/{conversationId}/messages", get(messages::list_messages))
        .route("/conversations/{conversationId}/messages", post(messages::send_message))
        .route("/conversations/{conversationId}/members", post(conversations::add_members))
        .route("/conversations/{conversationId}/members", delete(conversations::remove_members))
        .route("/messages/{messageId}", delete(messages::delete_message))
        .route("/users", get(users::list_users));

    Router::new()
        .nest("/v1", api_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "user_id" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
