use serde::Serialize;

// Per-asset slice of a valuation: the spot price and the owner's position
// value in each of the three quote currencies, all rounded to 2 decimals.
#[derive(Debug, Clone, Serialize)]
pub struct AssetValuation {
    pub asset_id: String,
    pub quantity: f64,
    pub price_brl: f64,
    pub value_brl: f64,
    pub price_usd: f64,
    pub value_usd: f64,
    pub price_eur: f64,
    pub value_eur: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValuationReport {
    pub email: String,
    pub total_brl: f64,
    pub total_usd: f64,
    pub total_eur: f64,
    pub assets: Vec<AssetValuation>,
}
