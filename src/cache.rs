use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    sync::{LazyLock, RwLock}
};

/// Global template text cache
static TEMPLATE_CACHE: LazyLock<RwLock<TemplateCache>> =
    LazyLock::new(|| RwLock::new(TemplateCache::new(64)));

/// Cache for SQL template text keyed by resource path
pub struct TemplateCache {
    cache:    HashMap<u64, String>,
    max_size: usize
}

impl TemplateCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size),
            max_size
        }
    }

    fn hash_key(path: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        hasher.finish()
    }

    pub fn get(&self, path: &str) -> Option<String> {
        let key = Self::hash_key(path);
        self.cache.get(&key).cloned()
    }

    pub fn insert(&mut self, path: &str, text: String) {
        // Simple eviction: clear half when full
        if self.cache.len() >= self.max_size {
            let keys: Vec<_> = self.cache.keys().take(self.max_size / 2).copied().collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }

        let key = Self::hash_key(path);
        self.cache.insert(key, text);
    }
}

/// Get cached template text or None
pub fn get_cached(path: &str) -> Option<String> {
    TEMPLATE_CACHE.read().ok()?.get(path)
}

/// Cache template text read from disk
pub fn cache_template(path: &str, text: String) {
    if let Ok(mut cache) = TEMPLATE_CACHE.write() {
        cache.insert(path, text);
    }
}
