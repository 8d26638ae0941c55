use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Estimated cost per price plan name.
pub type PlanCosts = HashMap<String, Decimal>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricityReading {
    time: DateTime<Utc>,
    reading: Decimal,
}

impl ElectricityReading {
    pub fn new(time: DateTime<Utc>, reading: Decimal) -> Self {
        Self { time, reading }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn reading(&self) -> Decimal {
        self.reading
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePlan {
    plan_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    energy_supplier: Option<String>,
    unit_rate: Decimal,
}

impl PricePlan {
    pub fn new(plan_name: impl Into<String>, unit_rate: Decimal) -> Self {
        Self {
            plan_name: plan_name.into(),
            energy_supplier: None,
            unit_rate,
        }
    }

    pub fn with_supplier(mut self, energy_supplier: impl Into<String>) -> Self {
        self.energy_supplier = Some(energy_supplier.into());
        self
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn energy_supplier(&self) -> Option<&str> {
        self.energy_supplier.as_deref()
    }

    pub fn unit_rate(&self) -> Decimal {
        self.unit_rate
    }
}

/// Cost of the readings taken during the last seven days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyUsageCost {
    #[serde(rename = "Cost")]
    cost: Decimal,
}

impl WeeklyUsageCost {
    pub fn new(cost: Decimal) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePlanComparison {
    price_plan_id: Option<String>,
    price_plan_comparisons: PlanCosts,
}

impl PricePlanComparison {
    pub fn new(price_plan_id: Option<String>, price_plan_comparisons: PlanCosts) -> Self {
        Self {
            price_plan_id,
            price_plan_comparisons,
        }
    }

    /// Plan account the meter is enrolled in, if any.
    pub fn price_plan_id(&self) -> Option<&str> {
        self.price_plan_id.as_deref()
    }

    pub fn price_plan_comparisons(&self) -> &PlanCosts {
        &self.price_plan_comparisons
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecommendation {
    plan_name: String,
    cost: Decimal,
}

impl PlanRecommendation {
    pub fn new(plan_name: String, cost: Decimal) -> Self {
        Self { plan_name, cost }
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }
}
