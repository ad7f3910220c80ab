//! Resolve user-typed names to entity ids.

use anyhow::{Result, anyhow};

use crate::models::{Department, JobBoard, JobFunction, JobRole, Office};

const SUGGESTION_THRESHOLD: f64 = 0.8;

pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for Office {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Department {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for JobFunction {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for JobRole {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.title
    }
}

impl Named for JobBoard {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.title
    }
}

/// Match by exact id, then by case-insensitive name. When nothing matches the
/// error suggests the closest name.
pub fn resolve<'a, T: Named>(items: &'a [T], query: &str, kind: &str) -> Result<&'a T> {
    let query = query.trim();

    if let Some(item) = items.iter().find(|i| i.id() == query) {
        return Ok(item);
    }
    let query_lower = query.to_lowercase();
    if let Some(item) = items.iter().find(|i| i.name().to_lowercase() == query_lower) {
        return Ok(item);
    }

    let closest = items
        .iter()
        .map(|i| (i, strsim::jaro_winkler(&i.name().to_lowercase(), &query_lower)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    match closest {
        Some((item, _)) => Err(anyhow!(
            "No {} named '{}'. Did you mean '{}'?",
            kind,
            query,
            item.name()
        )),
        None => Err(anyhow!("No {} named '{}'", kind, query)),
    }
}

/// Resolve each query, collecting ids in input order.
pub fn resolve_ids<T: Named>(items: &[T], queries: &[String], kind: &str) -> Result<Vec<String>> {
    queries
        .iter()
        .map(|q| resolve(items, q, kind).map(|i| i.id().to_string()))
        .collect()
}
