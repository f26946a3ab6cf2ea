use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    application::{
        form_sessions::FormSessions,
        usecases::{
            payment_forms::PaymentFormUseCase, payment_submissions::PaymentSubmissionUseCase,
        },
    },
    config::config_model::{DotEnvyConfig, RecordStore},
    domain::repositories::payment_submissions::PaymentSubmissionRepository,
    infrastructure::{
        axum_http::{default_routers, routers},
        postgres::{
            postgres_connection, repositories::payment_submissions::PaymentSubmissionPostgres,
        },
        supabase::payment_submissions::PaymentSubmissionSupabase,
    },
};

const FORM_EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// All API routes over one record store, without server layers.
pub fn api_router<R>(payment_submission_repository: Arc<R>, sessions: Arc<FormSessions>) -> Router
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let payment_submission_usecase =
        Arc::new(PaymentSubmissionUseCase::new(payment_submission_repository));
    let payment_form_usecase =
        PaymentFormUseCase::new(sessions, Arc::clone(&payment_submission_usecase));

    Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/payment-forms",
            routers::payment_forms::routes(Arc::new(payment_form_usecase)),
        )
        .nest(
            "/api/v1/payment-submissions",
            routers::payment_submissions::routes(payment_submission_usecase),
        )
        .route("/api/v1/offer", get(routers::offers::current_offer))
        .route("/api/v1/health-check", get(default_routers::health_check))
}

pub async fn start(config: Arc<DotEnvyConfig>) -> Result<()> {
    let sessions = Arc::new(FormSessions::new());
    let max_idle = Duration::from_secs(config.server.form_idle_timeout);
    sessions.spawn_eviction(FORM_EVICTION_INTERVAL.min(max_idle), max_idle);

    let api = match &config.record_store {
        RecordStore::Postgres(database) => {
            let postgres_pool = postgres_connection::establish_connection(&database.url)?;
            info!("Postgres connection has been established");
            api_router(
                Arc::new(PaymentSubmissionPostgres::new(Arc::new(postgres_pool))),
                Arc::clone(&sessions),
            )
        }
        RecordStore::Supabase(supabase) => {
            let repository = PaymentSubmissionSupabase::new(supabase)?;
            info!(table = %supabase.payment_table, "Supabase record store configured");
            api_router(Arc::new(repository), Arc::clone(&sessions))
        }
    };

    let app = api
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        stage = %config.stage,
        "Server is running on port {}", config.server.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::payment_submissions::MockPaymentSubmissionRepository;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        api_router(
            Arc::new(MockPaymentSubmissionRepository::new()),
            Arc::new(FormSessions::new()),
        )
    }

    async fn fetch(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        let (status, body) = fetch("/api/v1/health-check").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn unknown_routes_fall_back() {
        let (status, body) = fetch("/api/v1/recipes").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"NOT_FOUND");
    }

    #[tokio::test]
    async fn offer_shows_the_discount() {
        let (status, body) = fetch("/api/v1/offer").await;
        assert_eq!(status, StatusCode::OK);

        let offer: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(offer["originalPrice"], 15.99);
        assert_eq!(offer["discountedPrice"], 2.5);
        assert_eq!(offer["savingsPercent"], 84);
    }

    #[tokio::test]
    async fn payment_forms_are_nested_under_the_api() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/payment-forms")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
