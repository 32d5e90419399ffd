mod holding;
mod user;
mod valuation;

pub use holding::{Holding, HoldingDto, HoldingRequest};
pub use user::{LoginRequest, Session, User, UserProfile, UserRequest};
pub use valuation::{AssetValuation, ValuationReport};
