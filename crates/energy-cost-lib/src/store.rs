use crate::data_structures::ElectricityReading;
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Source of the readings a meter has reported.
pub trait ReadingStore {
    /// `None` when the meter is unknown.
    fn get_readings(&self, smart_meter_id: &str) -> Option<Vec<ElectricityReading>>;
}

#[derive(Debug, Clone, Default)]
pub struct MeterReadingStore {
    meter_associated_readings: HashMap<String, Vec<ElectricityReading>>,
}

impl MeterReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch of readings to the meter, creating it on first use.
    pub fn store_readings(
        &mut self,
        smart_meter_id: &str,
        readings: Vec<ElectricityReading>,
    ) -> Result<()> {
        if smart_meter_id.trim().is_empty() {
            bail!("Smart meter id must not be empty");
        }
        if readings.is_empty() {
            bail!("No readings given for smart meter {}", smart_meter_id);
        }

        self.meter_associated_readings
            .entry(smart_meter_id.to_string())
            .or_default()
            .extend(readings);
        Ok(())
    }

    pub fn meter_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .meter_associated_readings
            .keys()
            .map(String::as_str)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn reading_count(&self) -> usize {
        self.meter_associated_readings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.meter_associated_readings.is_empty()
    }
}

impl ReadingStore for MeterReadingStore {
    fn get_readings(&self, smart_meter_id: &str) -> Option<Vec<ElectricityReading>> {
        self.meter_associated_readings.get(smart_meter_id).cloned()
    }
}
