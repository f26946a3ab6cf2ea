use axum::{Json, response::IntoResponse};

use crate::domain::value_objects::offers::{PriceOffer, PriceOfferDto};

pub async fn current_offer() -> impl IntoResponse {
    Json(PriceOfferDto::from(PriceOffer::COOKBOOK))
}
