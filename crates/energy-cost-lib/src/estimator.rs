use crate::calculator::Calculator;
use crate::data_structures::{
    PlanCosts, PlanRecommendation, PricePlan, PricePlanComparison, WeeklyUsageCost,
};
use crate::error::EstimateResult;
use crate::store::ReadingStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Estimates what a meter's readings cost under each configured price plan.
pub struct CostEstimator<S> {
    price_plans: Vec<PricePlan>,
    reading_store: S,
    smart_meter_accounts: HashMap<String, String>,
    calculator: Calculator,
}

impl<S: ReadingStore> CostEstimator<S> {
    /// Without an account mapping no meter is enrolled, so weekly costs are never found.
    pub fn new(price_plans: Vec<PricePlan>, reading_store: S) -> Self {
        Self::with_accounts(price_plans, reading_store, HashMap::new())
    }

    pub fn with_accounts(
        price_plans: Vec<PricePlan>,
        reading_store: S,
        smart_meter_accounts: HashMap<String, String>,
    ) -> Self {
        Self {
            price_plans,
            reading_store,
            smart_meter_accounts,
            calculator: Calculator::new(),
        }
    }

    pub fn price_plans(&self) -> &[PricePlan] {
        &self.price_plans
    }

    pub fn reading_store(&self) -> &S {
        &self.reading_store
    }

    pub fn plan_account(&self, smart_meter_id: &str) -> Option<&str> {
        self.smart_meter_accounts
            .get(smart_meter_id)
            .map(String::as_str)
    }

    /// `Ok(None)` when the store knows nothing about the meter.
    pub fn cost_for_each_plan(
        &self,
        smart_meter_id: &str,
    ) -> EstimateResult<Option<PlanCosts>> {
        let Some(readings) = self.reading_store.get_readings(smart_meter_id) else {
            debug!(smart_meter_id, "no readings stored");
            return Ok(None);
        };

        let mut costs = PlanCosts::with_capacity(self.price_plans.len());
        for price_plan in &self.price_plans {
            let cost = self.calculator.calculate_cost(&readings, price_plan)?;
            costs.insert(price_plan.plan_name().to_string(), cost);
        }

        debug!(
            smart_meter_id,
            readings = readings.len(),
            plans = costs.len(),
            "estimated plan costs"
        );
        Ok(Some(costs))
    }

    /// `Ok(None)` when the meter is not enrolled in a price plan account.
    pub fn weekly_usage_cost(
        &self,
        smart_meter_id: &str,
    ) -> EstimateResult<Option<WeeklyUsageCost>> {
        self.weekly_usage_cost_at(smart_meter_id, Utc::now())
    }

    pub fn weekly_usage_cost_at(
        &self,
        smart_meter_id: &str,
        now: DateTime<Utc>,
    ) -> EstimateResult<Option<WeeklyUsageCost>> {
        if !self.smart_meter_accounts.contains_key(smart_meter_id) {
            debug!(smart_meter_id, "meter is not enrolled in a price plan");
            return Ok(None);
        }

        let readings = self
            .reading_store
            .get_readings(smart_meter_id)
            .unwrap_or_default();
        let last_week = self.calculator.filter_past_window(&readings, now);
        let cost = self.calculator.calculate_usage_cost(&last_week)?;

        debug!(smart_meter_id, readings = last_week.len(), %cost, "estimated weekly usage cost");
        Ok(Some(WeeklyUsageCost::new(cost)))
    }

    pub fn compare_price_plans(
        &self,
        smart_meter_id: &str,
    ) -> EstimateResult<Option<PricePlanComparison>> {
        let comparison = self.cost_for_each_plan(smart_meter_id)?.map(|costs| {
            PricePlanComparison::new(
                self.plan_account(smart_meter_id).map(str::to_string),
                costs,
            )
        });

        Ok(comparison)
    }

    /// Plans ordered from cheapest to most expensive, at most `limit` of them.
    pub fn recommend_cheapest_plans(
        &self,
        smart_meter_id: &str,
        limit: Option<usize>,
    ) -> EstimateResult<Option<Vec<PlanRecommendation>>> {
        let Some(costs) = self.cost_for_each_plan(smart_meter_id)? else {
            return Ok(None);
        };

        let mut recommendations: Vec<PlanRecommendation> = costs
            .into_iter()
            .map(|(plan_name, cost)| PlanRecommendation::new(plan_name, cost))
            .collect();
        recommendations.sort_by(|a, b| {
            a.cost()
                .cmp(&b.cost())
                .then_with(|| a.plan_name().cmp(b.plan_name()))
        });

        if let Some(limit) = limit {
            recommendations.truncate(limit);
        }

        Ok(Some(recommendations))
    }
}
