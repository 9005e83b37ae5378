use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("City not found: {0}")]
    CityNotFound(String),
}

/// Weather data stored for a single city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeatherRecord {
    pub temperature: i64,
    #[serde(rename = "weather")]
    pub condition: String,
}

impl WeatherRecord {
    pub fn new(temperature: i64, condition: impl Into<String>) -> Self {
        Self {
            temperature,
            condition: condition.into(),
        }
    }
}

/// Fields to overwrite on an existing record. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherUpdate {
    pub temperature: Option<i64>,
    pub condition: Option<String>,
}

impl WeatherUpdate {
    fn apply(self, record: &mut WeatherRecord) {
        if let Some(temperature) = self.temperature {
            record.temperature = temperature;
        }
        if let Some(condition) = self.condition {
            record.condition = condition;
        }
    }
}

const SEED_DATA: [(&str, i64, &str); 5] = [
    ("San Francisco", 14, "Cloudy"),
    ("New York", 20, "Sunny"),
    ("Los Angeles", 24, "Sunny"),
    ("Seattle", 10, "Rainy"),
    ("Austin", 32, "Hot"),
];

/// In-memory weather records keyed by city name (case-sensitive).
///
/// Each operation holds the lock for its whole duration, so a merge is never
/// observed half-applied and concurrent updates to one city are linearized.
#[derive(Debug, Default)]
pub struct WeatherStore {
    records: RwLock<HashMap<String, WeatherRecord>>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let records = SEED_DATA
            .iter()
            .map(|(city, temperature, condition)| {
                (city.to_string(), WeatherRecord::new(*temperature, *condition))
            })
            .collect();

        Self {
            records: RwLock::new(records),
        }
    }

    pub fn get(&self, city: &str) -> Option<WeatherRecord> {
        self.records.read().get(city).cloned()
    }

    pub fn contains(&self, city: &str) -> bool {
        self.records.read().contains_key(city)
    }

    /// Inserts the record, replacing any existing one for the city.
    pub fn put(&self, city: impl Into<String>, record: WeatherRecord) {
        let city = city.into();
        tracing::debug!("Storing weather record for {}", city);
        self.records.write().insert(city, record);
    }

    pub fn merge(&self, city: &str, update: WeatherUpdate) -> Result<WeatherRecord, StoreError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(city)
            .ok_or_else(|| StoreError::CityNotFound(city.to_string()))?;
        update.apply(record);
        tracing::debug!("Merged weather update for {}", city);
        Ok(record.clone())
    }

    pub fn remove(&self, city: &str) -> Result<WeatherRecord, StoreError> {
        let removed = self
            .records
            .write()
            .remove(city)
            .ok_or_else(|| StoreError::CityNotFound(city.to_string()))?;
        tracing::debug!("Removed weather record for {}", city);
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_seeded_store() {
        let store = WeatherStore::seeded();
        assert_eq!(store.len(), 5);
        assert_eq!(store.get("New York"), Some(WeatherRecord::new(20, "Sunny")));
        assert_eq!(store.get("Austin"), Some(WeatherRecord::new(32, "Hot")));
        assert!(store.contains("San Francisco"));
        assert!(store.contains("Los Angeles"));
        assert!(store.contains("Seattle"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = WeatherStore::seeded();
        assert!(store.get("new york").is_none());
        assert!(store.get("NEW YORK").is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let store = WeatherStore::new();
        assert!(store.is_empty());

        store.put("Chicago", WeatherRecord::new(18, "Cloudy"));
        store.put("Chicago", WeatherRecord::new(5, "Snow"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Chicago"), Some(WeatherRecord::new(5, "Snow")));
    }

    #[test]
    fn test_merge_only_touches_supplied_fields() {
        let store = WeatherStore::new();
        store.put("Chicago", WeatherRecord::new(18, "Cloudy"));

        let merged = store
            .merge(
                "Chicago",
                WeatherUpdate {
                    temperature: Some(20),
                    condition: None,
                },
            )
            .unwrap();
        assert_eq!(merged, WeatherRecord::new(20, "Cloudy"));

        store
            .merge(
                "Chicago",
                WeatherUpdate {
                    temperature: None,
                    condition: Some("Windy".to_string()),
                },
            )
            .unwrap();
        assert_eq!(store.get("Chicago"), Some(WeatherRecord::new(20, "Windy")));
    }

    #[test]
    fn test_merge_missing_city() {
        let store = WeatherStore::new();
        let result = store.merge("Nowhere", WeatherUpdate::default());
        assert_eq!(result, Err(StoreError::CityNotFound("Nowhere".to_string())));
        assert!(!store.contains("Nowhere"));
    }

    #[test]
    fn test_remove() {
        let store = WeatherStore::seeded();
        let removed = store.remove("Seattle").unwrap();
        assert_eq!(removed, WeatherRecord::new(10, "Rainy"));
        assert!(store.get("Seattle").is_none());
        assert_eq!(store.len(), 4);

        assert!(store.remove("Seattle").is_err());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_concurrent_merges_are_not_lost() {
        let store = Arc::new(WeatherStore::new());
        store.put("Chicago", WeatherRecord::new(0, "Cloudy"));

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store
                            .merge(
                                "Chicago",
                                WeatherUpdate {
                                    temperature: Some(i),
                                    condition: Some(format!("Condition {}", i)),
                                },
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Both fields always come from the same update.
        let record = store.get("Chicago").unwrap();
        assert_eq!(record.condition, format!("Condition {}", record.temperature));
    }
}
