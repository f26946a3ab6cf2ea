use serde::{Deserialize, Serialize};

/// Amount written to every stored submission. It does not follow the displayed
/// offer, so changing the price tag does not change what is recorded.
pub const PURCHASE_AMOUNT: f64 = 2.50;

pub const COOKBOOK_TITLE: &str = "Beaconsfield's Culinary Treasures";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceOffer {
    pub original_price: f64,
    pub discounted_price: f64,
}

impl PriceOffer {
    pub const COOKBOOK: PriceOffer = PriceOffer {
        original_price: 15.99,
        discounted_price: 2.50,
    };

    pub fn savings_percent(&self) -> u32 {
        if self.original_price <= 0.0 {
            return 0;
        }
        let ratio = (self.original_price - self.discounted_price) / self.original_price;
        (ratio * 100.0).round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceOfferDto {
    pub title: String,
    pub original_price: f64,
    pub discounted_price: f64,
    pub savings_percent: u32,
}

impl From<PriceOffer> for PriceOfferDto {
    fn from(offer: PriceOffer) -> Self {
        Self {
            title: COOKBOOK_TITLE.to_string(),
            original_price: offer.original_price,
            discounted_price: offer.discounted_price,
            savings_percent: offer.savings_percent(),
        }
    }
}
