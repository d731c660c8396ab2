use buyers_tool::compiler::{CacheError, CacheKey, CompilerOutput, TraceCache};
use buyers_tool::config::CacheConfig;
use chrono::DateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct CacheEntries {
    outputs: HashMap<CacheKey, CompilerOutput>,
    insertion_order: VecDeque<CacheKey>,
}

/// Process-local output cache. Evicts the oldest entry once `max_entries` is reached.
#[derive(Clone)]
pub(crate) struct InMemoryTraceCache {
    max_entries: usize,
    entries: Arc<Mutex<CacheEntries>>,
}

impl InMemoryTraceCache {
    pub(crate) fn new(config: CacheConfig) -> Self {
        Self {
            max_entries: config.max_entries.max(1),
            entries: Arc::new(Mutex::new(CacheEntries::default())),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").outputs.len()
    }
}

impl TraceCache for InMemoryTraceCache {
    fn store(&self, key: CacheKey, output: CompilerOutput) -> Result<bool, CacheError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("cache mutex poisoned".into()))?;

        if guard.outputs.insert(key.clone(), output).is_some() {
            return Ok(true);
        }

        guard.insertion_order.push_back(key);
        while guard.outputs.len() > self.max_entries {
            match guard.insertion_order.pop_front() {
                Some(oldest) => {
                    guard.outputs.remove(&oldest);
                }
                None => break,
            }
        }
        Ok(false)
    }

    fn fetch(&self, key: &CacheKey) -> Result<Option<CompilerOutput>, CacheError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("cache mutex poisoned".into()))?;
        Ok(guard.outputs.get(key).cloned())
    }
}

/// Clap value parser for caller-supplied compile timestamps.
pub(crate) fn parse_timestamp(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::scenarios;
    use buyers_tool::compiler::{compile, CompilerOptions};

    fn outputs() -> Vec<CompilerOutput> {
        let options = CompilerOptions::at("2025-06-01T12:00:00Z");
        scenarios()
            .iter()
            .map(|scenario| compile(&scenario.input, &options))
            .collect()
    }

    #[test]
    fn cache_evicts_oldest_entry_when_full() {
        let cache = InMemoryTraceCache::new(CacheConfig { max_entries: 2 });
        let outputs = outputs();
        assert!(outputs.len() >= 3);

        for output in &outputs[..3] {
            let replaced = cache
                .store(CacheKey::for_output(output), output.clone())
                .expect("store succeeds");
            assert!(!replaced);
        }

        assert_eq!(cache.len(), 2);
        let oldest = CacheKey::for_output(&outputs[0]);
        assert!(cache.fetch(&oldest).expect("fetch succeeds").is_none());
        let newest = CacheKey::for_output(&outputs[2]);
        assert_eq!(
            cache.fetch(&newest).expect("fetch succeeds"),
            Some(outputs[2].clone())
        );
    }

    #[test]
    fn storing_same_key_replaces_in_place() {
        let cache = InMemoryTraceCache::new(CacheConfig { max_entries: 1 });
        let output = outputs().remove(0);
        let key = CacheKey::for_output(&output);

        assert!(!cache.store(key.clone(), output.clone()).expect("first store"));
        assert!(cache.store(key.clone(), output).expect("second store"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn timestamp_parser_accepts_offsets_and_rejects_prose() {
        assert_eq!(
            parse_timestamp(" 2025-06-01T08:00:00-04:00 ").as_deref(),
            Ok("2025-06-01T08:00:00-04:00")
        );
        assert!(parse_timestamp("last tuesday").is_err());
    }
}
