use crate::data_structures::{ElectricityReading, PricePlan};
use crate::pricing::PricingProvider;
use crate::store::MeterReadingStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Price plans and meter accounts, as read from a JSON configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorConfig {
    #[serde(default = "default_price_plans")]
    pub price_plans: Vec<PricePlan>,
    #[serde(default)]
    pub smart_meter_accounts: HashMap<String, String>,
}

fn default_price_plans() -> Vec<PricePlan> {
    PricingProvider::new().into_plans()
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            price_plans: default_price_plans(),
            smart_meter_accounts: HashMap::new(),
        }
    }
}

/// A reading together with the meter that reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterReading {
    pub smart_meter_id: String,
    pub reading: ElectricityReading,
}

pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_config<P: AsRef<Path>>(&self, path: P) -> Result<EstimatorConfig> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<MeterReading>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;

        let reader = BufReader::new(file);
        let mut readings = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            match self.parse_line(&line) {
                Ok(reading) => readings.push(reading),
                Err(e) => debug!(line = line_num + 1, "skipping line: {:#}", e),
            }
        }

        Ok(readings)
    }

    pub fn load_from_directory<P: AsRef<Path>>(&self, dir_path: P) -> Result<Vec<MeterReading>> {
        let mut all_readings = Vec::new();
        self.load_from_directory_recursive(dir_path.as_ref(), &mut all_readings)?;
        all_readings.sort_by(|a, b| a.reading.time().cmp(&b.reading.time()));
        Ok(all_readings)
    }

    fn load_from_directory_recursive(
        &self,
        dir_path: &Path,
        readings: &mut Vec<MeterReading>,
    ) -> Result<()> {
        let dir = std::fs::read_dir(dir_path)
            .with_context(|| format!("Failed to read directory: {}", dir_path.display()))?;

        for entry in dir {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if path.extension().is_some_and(|extension| extension == "jsonl") {
                    match self.load_from_file(&path) {
                        Ok(mut file_readings) => readings.append(&mut file_readings),
                        Err(e) => warn!("Failed to load file {}: {:#}", path.display(), e),
                    }
                }
            } else if path.is_dir() {
                if let Err(e) = self.load_from_directory_recursive(&path, readings) {
                    warn!("Failed to load from directory {}: {:#}", path.display(), e);
                }
            }
        }

        Ok(())
    }

    /// Loads a reading file or directory and files every reading under its meter.
    pub fn load_into_store<P: AsRef<Path>>(
        &self,
        path: P,
        store: &mut MeterReadingStore,
    ) -> Result<usize> {
        let path = path.as_ref();
        let readings = if path.is_file() {
            self.load_from_file(path)?
        } else if path.is_dir() {
            self.load_from_directory(path)?
        } else {
            return Err(anyhow::anyhow!("Path does not exist: {}", path.display()));
        };

        let count = readings.len();
        let mut per_meter: HashMap<String, Vec<ElectricityReading>> = HashMap::new();
        for MeterReading {
            smart_meter_id,
            reading,
        } in readings
        {
            per_meter.entry(smart_meter_id).or_default().push(reading);
        }

        for (smart_meter_id, readings) in per_meter {
            store.store_readings(&smart_meter_id, readings)?;
        }

        debug!(count, path = %path.display(), "loaded readings");
        Ok(count)
    }

    fn parse_line(&self, line: &str) -> Result<MeterReading> {
        let json: Value = serde_json::from_str(line).context("Failed to parse JSON")?;

        let smart_meter_id = self.extract_string(&json, "smartMeterId")?;
        let time = self.parse_timestamp(&json)?;
        let reading = self.extract_decimal(&json, "reading")?;

        Ok(MeterReading {
            smart_meter_id,
            reading: ElectricityReading::new(time, reading),
        })
    }

    fn parse_timestamp(&self, json: &Value) -> Result<DateTime<Utc>> {
        let timestamp_str = self.extract_string(json, "time")?;

        DateTime::parse_from_rfc3339(&timestamp_str)
            .context("Failed to parse timestamp")
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn extract_string(&self, json: &Value, key: &str) -> Result<String> {
        json.get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Missing or invalid '{}' field", key))
    }

    /// Accepts both JSON numbers and strings. Numbers keep their source text
    /// (`arbitrary_precision`), so every digit and the scale survive.
    fn extract_decimal(&self, json: &Value, key: &str) -> Result<Decimal> {
        let text = match json.get(key) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => return Err(anyhow::anyhow!("Missing or invalid '{}' field", key)),
        };

        text.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&text))
            .with_context(|| format!("Invalid decimal in '{}' field: {}", key, text))
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}
