pub mod card_brands;
pub mod form_fields;
pub mod form_states;
pub mod notification_variants;
