pub mod calculator;
pub mod data_structures;
pub mod error;
pub mod estimator;
pub mod loader;
pub mod pricing;
pub mod store;

pub use calculator::Calculator;
pub use data_structures::{
    ElectricityReading, PlanCosts, PlanRecommendation, PricePlan, PricePlanComparison,
    WeeklyUsageCost,
};
pub use error::{EstimateError, EstimateResult};
pub use estimator::CostEstimator;
pub use loader::{DataLoader, EstimatorConfig, MeterReading};
pub use pricing::PricingProvider;
pub use store::{MeterReadingStore, ReadingStore};

pub use anyhow::Result;
pub use chrono::{DateTime, Duration, Utc};
pub use rust_decimal::Decimal;

pub mod prelude {
    pub use crate::data_structures::{ElectricityReading, PricePlan, WeeklyUsageCost};
    pub use crate::estimator::CostEstimator;
    pub use crate::loader::DataLoader;
    pub use crate::store::{MeterReadingStore, ReadingStore};
    pub use anyhow::Result;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
}
