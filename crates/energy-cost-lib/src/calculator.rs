use crate::data_structures::{ElectricityReading, PricePlan};
use crate::error::{EstimateError, EstimateResult};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: i64 = 3600;

pub struct Calculator {
    window: Duration,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            window: Duration::days(7),
        }
    }

    /// Sum of the readings over their count, rounded half up to the scale of the sum.
    pub fn calculate_average_reading(
        &self,
        readings: &[ElectricityReading],
    ) -> EstimateResult<Decimal> {
        if readings.is_empty() {
            return Err(EstimateError::EmptyReadingSet);
        }

        let summed = readings
            .iter()
            .try_fold(Decimal::ZERO, |sum, r| sum.checked_add(r.reading()))
            .ok_or(EstimateError::Overflow)?;
        let average = summed
            .checked_div(Decimal::from(readings.len()))
            .ok_or(EstimateError::Overflow)?;

        Ok(average.round_dp_with_strategy(summed.scale(), RoundingStrategy::MidpointAwayFromZero))
    }

    /// Hours between the earliest and the latest reading, whatever their order.
    pub fn calculate_time_elapsed(
        &self,
        readings: &[ElectricityReading],
    ) -> EstimateResult<Decimal> {
        let first = readings
            .iter()
            .map(|r| r.time())
            .min()
            .ok_or(EstimateError::EmptyReadingSet)?;
        let last = readings
            .iter()
            .map(|r| r.time())
            .max()
            .ok_or(EstimateError::EmptyReadingSet)?;

        let seconds = (last - first).num_seconds();
        Ok(Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR))
    }

    /// `(average / elapsed hours) * unit rate`.
    pub fn calculate_cost(
        &self,
        readings: &[ElectricityReading],
        price_plan: &PricePlan,
    ) -> EstimateResult<Decimal> {
        let average = self.calculate_average_reading(readings)?;
        let time_elapsed = self.calculate_time_elapsed(readings)?;

        if time_elapsed.is_zero() {
            return Err(EstimateError::ZeroElapsedTime);
        }

        let averaged_cost = average
            .checked_div(time_elapsed)
            .ok_or(EstimateError::Overflow)?
            .round_dp_with_strategy(average.scale(), RoundingStrategy::MidpointAwayFromZero);

        averaged_cost
            .checked_mul(price_plan.unit_rate())
            .ok_or(EstimateError::Overflow)
    }

    /// `average * elapsed hours`. Multiplies where `calculate_cost` divides.
    pub fn calculate_usage_cost(&self, readings: &[ElectricityReading]) -> EstimateResult<Decimal> {
        let average = self.calculate_average_reading(readings)?;
        let time_elapsed = self.calculate_time_elapsed(readings)?;

        average
            .checked_mul(time_elapsed)
            .ok_or(EstimateError::Overflow)
    }

    /// Readings strictly inside `(now - window, now)`.
    pub fn filter_past_window(
        &self,
        readings: &[ElectricityReading],
        now: DateTime<Utc>,
    ) -> Vec<ElectricityReading> {
        let window_start = now - self.window;

        readings
            .iter()
            .filter(|r| r.time() > window_start && r.time() < now)
            .cloned()
            .collect()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn reading(time: DateTime<Utc>, value: i64) -> ElectricityReading {
        ElectricityReading::new(time, Decimal::from(value))
    }

    #[test]
    fn test_calculate_cost() {
        let calculator = Calculator::new();
        let readings = vec![
            reading(start(), 10),
            reading(start() + Duration::hours(1), 20),
        ];
        let plan = PricePlan::new("A", Decimal::from(2));

        let cost = calculator.calculate_cost(&readings, &plan).unwrap();
        assert_eq!(cost, Decimal::from(30));
    }

    #[test]
    fn test_average_rounds_half_up_to_sum_scale() {
        let calculator = Calculator::new();
        let readings = vec![
            ElectricityReading::new(start(), Decimal::new(10, 1)),
            ElectricityReading::new(start(), Decimal::new(5, 1)),
        ];

        // 1.5 / 2 = 0.75, kept at one decimal place
        let average = calculator.calculate_average_reading(&readings).unwrap();
        assert_eq!(average, Decimal::new(8, 1));
    }

    #[test]
    fn test_average_is_order_independent() {
        let calculator = Calculator::new();
        let mut readings = vec![
            reading(start(), 3),
            reading(start() + Duration::hours(2), 7),
            reading(start() + Duration::hours(1), 11),
        ];

        let average = calculator.calculate_average_reading(&readings).unwrap();
        readings.reverse();
        assert_eq!(calculator.calculate_average_reading(&readings).unwrap(), average);
        readings.swap(0, 1);
        assert_eq!(calculator.calculate_average_reading(&readings).unwrap(), average);
    }

    #[test]
    fn test_time_elapsed_uses_min_and_max() {
        let calculator = Calculator::new();
        let readings = vec![
            reading(start() + Duration::minutes(30), 1),
            reading(start() + Duration::hours(3), 1),
            reading(start(), 1),
        ];

        let elapsed = calculator.calculate_time_elapsed(&readings).unwrap();
        assert_eq!(elapsed, Decimal::from(3));
    }

    #[test]
    fn test_time_elapsed_in_fractional_hours() {
        let calculator = Calculator::new();
        let readings = vec![
            reading(start(), 1),
            reading(start() + Duration::minutes(90), 1),
        ];

        let elapsed = calculator.calculate_time_elapsed(&readings).unwrap();
        assert_eq!(elapsed, Decimal::new(15, 1));
    }

    #[test]
    fn test_empty_readings_are_an_error() {
        let calculator = Calculator::new();

        assert_eq!(
            calculator.calculate_average_reading(&[]),
            Err(EstimateError::EmptyReadingSet)
        );
        assert_eq!(
            calculator.calculate_time_elapsed(&[]),
            Err(EstimateError::EmptyReadingSet)
        );
    }

    #[test]
    fn test_single_reading_has_zero_elapsed_time() {
        let calculator = Calculator::new();
        let readings = vec![reading(start(), 5)];
        let plan = PricePlan::new("A", Decimal::from(2));

        assert_eq!(
            calculator.calculate_cost(&readings, &plan),
            Err(EstimateError::ZeroElapsedTime)
        );
        assert_eq!(
            calculator.calculate_usage_cost(&readings).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_overflowing_sum_is_an_error() {
        let calculator = Calculator::new();
        let readings = vec![
            ElectricityReading::new(start(), Decimal::MAX),
            ElectricityReading::new(start() + Duration::hours(1), Decimal::MAX),
        ];

        assert_eq!(
            calculator.calculate_average_reading(&readings),
            Err(EstimateError::Overflow)
        );
    }

    #[test]
    fn test_overflowing_cost_is_an_error() {
        let calculator = Calculator::new();
        let huge = Decimal::from_scientific("1e25").unwrap();
        let readings = vec![
            ElectricityReading::new(start(), huge),
            ElectricityReading::new(start() + Duration::seconds(1), huge),
        ];
        let plan = PricePlan::new("A", Decimal::from(10));

        assert_eq!(
            calculator.calculate_cost(&readings, &plan),
            Err(EstimateError::Overflow)
        );
    }

    #[test]
    fn test_usage_cost_multiplies_by_elapsed_time() {
        let calculator = Calculator::new();
        let readings = vec![
            reading(start(), 10),
            reading(start() + Duration::hours(2), 20),
        ];

        assert_eq!(
            calculator.calculate_usage_cost(&readings).unwrap(),
            Decimal::from(30)
        );
    }

    #[test]
    fn test_filter_past_window_is_open_interval() {
        let calculator = Calculator::new();
        let now = start();
        let readings = vec![
            reading(now, 1),
            reading(now - Duration::days(7), 2),
            reading(now - Duration::days(3), 3),
            reading(now + Duration::hours(1), 4),
            reading(now - Duration::days(10), 5),
        ];

        let filtered = calculator.filter_past_window(&readings, now);
        assert_eq!(filtered, vec![reading(now - Duration::days(3), 3)]);
    }
}
