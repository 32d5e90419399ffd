pub mod coingecko;
pub mod price_oracle;
