use crate::data_structures::PricePlan;
use rust_decimal::Decimal;

pub struct PricingProvider {
    price_plans: Vec<PricePlan>,
}

impl PricingProvider {
    pub fn new() -> Self {
        let price_plans = vec![
            PricePlan::new("price-plan-0", Decimal::from(10))
                .with_supplier("Dr Evil's Dark Energy"),
            PricePlan::new("price-plan-1", Decimal::from(2)).with_supplier("The Green Eco"),
            PricePlan::new("price-plan-2", Decimal::from(1)).with_supplier("Power for Everyone"),
        ];

        Self { price_plans }
    }

    pub fn with_plans(price_plans: Vec<PricePlan>) -> Self {
        Self { price_plans }
    }

    /// Last plan declared under `plan_name`, matching how costs are keyed.
    pub fn get_plan(&self, plan_name: &str) -> Option<&PricePlan> {
        self.price_plans
            .iter()
            .rev()
            .find(|plan| plan.plan_name() == plan_name)
    }

    pub fn plan_names(&self) -> Vec<&str> {
        self.price_plans.iter().map(PricePlan::plan_name).collect()
    }

    pub fn into_plans(self) -> Vec<PricePlan> {
        self.price_plans
    }
}

impl Default for PricingProvider {
    fn default() -> Self {
        Self::new()
    }
}
