use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::core::traits::PaymentProcessor;
use crate::core::{AppError, Currency, Result};

/// Explicit processor registry the host populates at startup
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn PaymentProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// Register a processor under its slug, replacing any previous one
    pub fn register(&mut self, processor: Arc<dyn PaymentProcessor>) {
        let slug = processor.slug().to_string();
        info!(processor = %slug, "Registering payment processor");
        self.processors.insert(slug, processor);
    }

    /// Get a processor by slug
    pub fn get(&self, slug: &str) -> Result<Arc<dyn PaymentProcessor>> {
        self.processors
            .get(slug)
            .cloned()
            .ok_or_else(|| AppError::configuration(format!("Processor '{}' not registered", slug)))
    }

    /// List all registered processors
    pub fn list(&self) -> Vec<ProcessorInfo> {
        let mut list: Vec<ProcessorInfo> = self
            .processors
            .values()
            .map(|processor| ProcessorInfo {
                slug: processor.slug().to_string(),
                display_name: processor.display_name().to_string(),
                accepted_currencies: processor.accepted_currencies().to_vec(),
            })
            .collect();
        list.sort_by(|a, b| a.slug.cmp(&b.slug));
        list
    }

    /// Check if a processor accepts a currency code
    pub fn supports_currency(&self, slug: &str, currency: &str) -> Result<bool> {
        let processor = self.get(slug)?;
        Ok(match currency.parse::<Currency>() {
            Ok(currency) => processor.accepted_currencies().contains(&currency),
            Err(_) => false,
        })
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Processor information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProcessorInfo {
    pub slug: String,
    pub display_name: String,
    pub accepted_currencies: Vec<Currency>,
}
