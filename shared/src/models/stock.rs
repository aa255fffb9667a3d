//! Stock quantity records

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Quantity of one product sitting at one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockQuant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub quantity: Decimal,
}

impl StockQuant {
    pub fn new(product_id: Uuid, location_id: Uuid, quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            location_id,
            quantity,
        }
    }
}
