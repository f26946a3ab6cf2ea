use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::usecases::payment_forms::PaymentFormUseCase,
    domain::{
        repositories::payment_submissions::PaymentSubmissionRepository,
        value_objects::{enums::form_fields::FormField, payment_validation::CalendarMonth},
    },
    infrastructure::axum_http::error_responses::AppError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFieldRequest {
    pub field: FormField,
    #[serde(default)]
    pub value: String,
}

pub fn routes<R>(payment_form_usecase: Arc<PaymentFormUseCase<R>>) -> Router
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(open::<R>))
        .route("/:id", get(view::<R>).delete(close::<R>))
        .route("/:id/fields", patch(update_field::<R>))
        .route("/:id/submit", post(submit::<R>))
        .route("/:id/reset", post(reset::<R>))
        .with_state(payment_form_usecase)
}

pub async fn open<R>(
    State(payment_form_usecase): State<Arc<PaymentFormUseCase<R>>>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let view = payment_form_usecase.open().await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn view<R>(
    State(payment_form_usecase): State<Arc<PaymentFormUseCase<R>>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let view = payment_form_usecase.view(id).await?;
    Ok(Json(view))
}

pub async fn update_field<R>(
    State(payment_form_usecase): State<Arc<PaymentFormUseCase<R>>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFieldRequest>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let view = payment_form_usecase
        .update_field(id, request.field, request.value, CalendarMonth::current())
        .await?;
    Ok(Json(view))
}

pub async fn submit<R>(
    State(payment_form_usecase): State<Arc<PaymentFormUseCase<R>>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let view = payment_form_usecase
        .submit(id, CalendarMonth::current())
        .await?;
    Ok(Json(view))
}

pub async fn reset<R>(
    State(payment_form_usecase): State<Arc<PaymentFormUseCase<R>>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let view = payment_form_usecase.reset(id).await?;
    Ok(Json(view))
}

pub async fn close<R>(
    State(payment_form_usecase): State<Arc<PaymentFormUseCase<R>>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    payment_form_usecase.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{
            form_sessions::FormSessions, usecases::payment_submissions::PaymentSubmissionUseCase,
        },
        domain::{
            entities::payment_submissions::PaymentSubmissionEntity,
            repositories::payment_submissions::MockPaymentSubmissionRepository,
        },
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, header::CONTENT_TYPE},
    };
    use chrono::Utc;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(repository: MockPaymentSubmissionRepository) -> Router {
        let submissions = PaymentSubmissionUseCase::new(Arc::new(repository));
        routes(Arc::new(PaymentFormUseCase::new(
            Arc::new(FormSessions::new()),
            Arc::new(submissions),
        )))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn open_form(app: &Router) -> String {
        let (status, body) = call(app, Method::POST, "/", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn set(app: &Router, id: &str, field: &str, value: &str) -> Value {
        let (status, body) = call(
            app,
            Method::PATCH,
            &format!("/{id}/fields"),
            Some(json!({ "field": field, "value": value })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn new_form_is_empty_and_editable() {
        let app = app(MockPaymentSubmissionRepository::new());
        let id = open_form(&app).await;

        let (status, body) = call(&app, Method::GET, &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "editing");
        assert_eq!(body["canSubmit"], true);
        assert_eq!(body["values"]["cardNumber"], "");
        assert_eq!(body["cardBrand"], Value::Null);
    }

    #[tokio::test]
    async fn field_updates_are_masked_and_validated() {
        let app = app(MockPaymentSubmissionRepository::new());
        let id = open_form(&app).await;

        let body = set(&app, &id, "cardNumber", "3782 8224 6310 0051").await;
        assert_eq!(body["values"]["cardNumber"], "3782-8224-6310-0051");
        assert_eq!(body["cardBrand"], "amex");
        assert!(body["errors"].get("cardNumber").is_none());

        let body = set(&app, &id, "expiryDate", "1").await;
        assert_eq!(body["values"]["expiryDate"], "1");
        assert_eq!(body["errors"]["expiryDate"]["kind"], "InvalidFormat");
    }

    #[tokio::test]
    async fn full_flow_submit_and_reset() {
        let mut repository = MockPaymentSubmissionRepository::new();
        repository
            .expect_insert_submission()
            .times(1)
            .returning(|submission| {
                let row = PaymentSubmissionEntity {
                    id: uuid::Uuid::new_v4(),
                    full_name: submission.full_name,
                    email: submission.email,
                    card_last_four: submission.card_last_four,
                    card_type: submission.card_type,
                    purchase_amount: submission.purchase_amount,
                    created_at: Utc::now(),
                };
                Box::pin(async move { Ok(row) })
            });
        let app = app(repository);
        let id = open_form(&app).await;

        set(&app, &id, "fullName", "Jane Doe").await;
        set(&app, &id, "email", "jane@example.com").await;
        set(&app, &id, "cardNumber", "4111111111111111").await;
        set(&app, &id, "expiryDate", "1245").await;
        set(&app, &id, "cvv", "123").await;

        let (status, body) = call(&app, Method::POST, &format!("/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "submitted");
        assert_eq!(body["notifications"][0]["title"], "Payment Successful");

        let (status, body) = call(&app, Method::POST, &format!("/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);

        let (status, body) = call(&app, Method::POST, &format!("/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "editing");
        assert_eq!(body["values"]["fullName"], "");
    }

    #[tokio::test]
    async fn reset_before_submit_conflicts() {
        let app = app(MockPaymentSubmissionRepository::new());
        let id = open_form(&app).await;

        let (status, _) = call(&app, Method::POST, &format!("/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn closed_form_is_gone() {
        let app = app(MockPaymentSubmissionRepository::new());
        let id = open_form(&app).await;

        let (status, _) = call(&app, Method::DELETE, &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(&app, Method::GET, &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "payment form not found");
    }
}
