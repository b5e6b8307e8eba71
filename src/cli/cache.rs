use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use uuid::Uuid;

use super::config::get_config_dir;

/// Freshness windows, in seconds. Tag data changes rarely and gets a
/// longer window than everything else.
const DEFAULT_TTL_SECS: i64 = 300;
const TAG_TTL_SECS: i64 = 600;

/// Parameters that distinguish one page of a list from another. Two
/// queries that differ in any field are cached independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListKey {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub tag_id: Option<Uuid>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Every cacheable read the CLI performs. Keys are typed so a lane
/// detail can never collide with a lane list, and so invalidation can
/// match on structure instead of string prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    Lanes(ListKey),
    MyLanes(ListKey),
    Lane(Uuid),
    LaneMemories(Uuid, ListKey),
    Tags(Option<String>),
    Profile,
}

/// Writes the CLI performs, each mapped to the reads it stales.
#[derive(Debug, Clone)]
pub enum Mutation {
    LaneCreated,
    LaneUpdated(Uuid),
    LaneDeleted(Uuid),
    MemoriesChanged(Uuid),
    TagsChanged,
    SessionChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub value: Value,
    pub fetched_at: i64,
}

#[derive(Debug, Default)]
pub struct Cache {
    entries: HashMap<CacheKey, Entry>,
    dirty: bool,
}

fn ttl_for(key: &CacheKey) -> i64 {
    match key {
        CacheKey::Tags(_) => TAG_TTL_SECS,
        _ => DEFAULT_TTL_SECS,
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl Cache {
    pub fn load() -> Self {
        let entries = get_config_dir()
            .ok()
            .map(|dir| dir.join("cache.json"))
            .filter(|path| path.exists())
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| serde_json::from_str::<Vec<(CacheKey, Entry)>>(&content).ok())
            .map(|pairs| pairs.into_iter().collect())
            .unwrap_or_default();

        Self { entries, dirty: false }
    }

    /// Flush to disk; a corrupt or missing config dir just means no
    /// persistence, never a failed command.
    pub fn save(&self) {
        if !self.dirty {
            return;
        }
        let Ok(dir) = get_config_dir() else { return };
        let pairs: Vec<(&CacheKey, &Entry)> = self.entries.iter().collect();
        if let Ok(content) = serde_json::to_string(&pairs) {
            let _ = fs::write(dir.join("cache.json"), content);
        }
    }

    /// Returns the cached value if it is still within its TTL.
    pub fn get(&self, key: &CacheKey) -> Option<&Value> {
        let entry = self.entries.get(key)?;
        if now() - entry.fetched_at <= ttl_for(key) {
            Some(&entry.value)
        } else {
            None
        }
    }

    pub fn put(&mut self, key: CacheKey, value: Value) {
        self.entries.insert(key, Entry { value, fetched_at: now() });
        self.dirty = true;
    }

    /// Drop every entry the mutation could have staled. Over-invalidation
    /// is fine, a stale hit is not.
    pub fn invalidate(&mut self, mutation: &Mutation) {
        let before = self.entries.len();
        self.entries.retain(|key, _| !is_staled(key, mutation));
        if self.entries.len() != before {
            self.dirty = true;
        }
    }

    /// Drop everything. Used when a mutation's blast radius is unknown.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.dirty = true;
        }
    }

    #[cfg(test)]
    fn backdate(&mut self, key: &CacheKey, seconds: i64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.fetched_at -= seconds;
        }
    }
}

fn is_staled(key: &CacheKey, mutation: &Mutation) -> bool {
    match mutation {
        Mutation::LaneCreated => matches!(
            key,
            CacheKey::Lanes(_) | CacheKey::MyLanes(_) | CacheKey::Tags(_)
        ),
        Mutation::LaneUpdated(id) | Mutation::LaneDeleted(id) => match key {
            CacheKey::Lane(lane_id) | CacheKey::LaneMemories(lane_id, _) => lane_id == id,
            CacheKey::Lanes(_) | CacheKey::MyLanes(_) | CacheKey::Tags(_) => true,
            _ => false,
        },
        Mutation::MemoriesChanged(id) => match key {
            CacheKey::Lane(lane_id) | CacheKey::LaneMemories(lane_id, _) => lane_id == id,
            CacheKey::Lanes(_) | CacheKey::MyLanes(_) => true,
            _ => false,
        },
        Mutation::TagsChanged => matches!(
            key,
            CacheKey::Tags(_) | CacheKey::Lanes(_) | CacheKey::MyLanes(_) | CacheKey::Lane(_)
        ),
        Mutation::SessionChanged => matches!(key, CacheKey::Profile | CacheKey::MyLanes(_)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lane_id() -> Uuid {
        Uuid::from_u128(1)
    }

    #[test]
    fn fresh_entries_hit() {
        let mut cache = Cache::default();
        cache.put(CacheKey::Profile, json!({"email": "a@b.c"}));
        assert!(cache.get(&CacheKey::Profile).is_some());
    }

    #[test]
    fn expired_entries_miss() {
        let mut cache = Cache::default();
        cache.put(CacheKey::Lane(lane_id()), json!({}));
        cache.backdate(&CacheKey::Lane(lane_id()), DEFAULT_TTL_SECS + 1);
        assert!(cache.get(&CacheKey::Lane(lane_id())).is_none());
    }

    #[test]
    fn tags_get_the_longer_window() {
        let mut cache = Cache::default();
        cache.put(CacheKey::Tags(None), json!([]));
        cache.backdate(&CacheKey::Tags(None), DEFAULT_TTL_SECS + 1);
        assert!(cache.get(&CacheKey::Tags(None)).is_some());
        cache.backdate(&CacheKey::Tags(None), TAG_TTL_SECS);
        assert!(cache.get(&CacheKey::Tags(None)).is_none());
    }

    #[test]
    fn list_keys_with_different_params_are_distinct() {
        let mut cache = Cache::default();
        let page1 = ListKey { page: Some(1), ..Default::default() };
        let page2 = ListKey { page: Some(2), ..Default::default() };
        cache.put(CacheKey::Lanes(page1.clone()), json!([1]));
        assert!(cache.get(&CacheKey::Lanes(page1)).is_some());
        assert!(cache.get(&CacheKey::Lanes(page2)).is_none());
    }

    #[test]
    fn lane_update_stales_detail_and_lists_but_not_others() {
        let mut cache = Cache::default();
        let other = Uuid::from_u128(2);
        cache.put(CacheKey::Lane(lane_id()), json!({}));
        cache.put(CacheKey::Lane(other), json!({}));
        cache.put(CacheKey::Lanes(ListKey::default()), json!([]));
        cache.put(CacheKey::Profile, json!({}));

        cache.invalidate(&Mutation::LaneUpdated(lane_id()));

        assert!(cache.get(&CacheKey::Lane(lane_id())).is_none());
        assert!(cache.get(&CacheKey::Lane(other)).is_some());
        assert!(cache.get(&CacheKey::Lanes(ListKey::default())).is_none());
        assert!(cache.get(&CacheKey::Profile).is_some());
    }

    #[test]
    fn memories_change_stales_the_lane_and_its_pages() {
        let mut cache = Cache::default();
        let page1 = ListKey { page: Some(1), ..Default::default() };
        let page2 = ListKey { page: Some(2), ..Default::default() };
        cache.put(CacheKey::LaneMemories(lane_id(), page1.clone()), json!([]));
        cache.put(CacheKey::LaneMemories(lane_id(), page2.clone()), json!([]));
        cache.put(CacheKey::Lane(lane_id()), json!({}));
        cache.put(CacheKey::Tags(None), json!([]));

        cache.invalidate(&Mutation::MemoriesChanged(lane_id()));

        assert!(cache.get(&CacheKey::LaneMemories(lane_id(), page1)).is_none());
        assert!(cache.get(&CacheKey::LaneMemories(lane_id(), page2)).is_none());
        assert!(cache.get(&CacheKey::Lane(lane_id())).is_none());
        assert!(cache.get(&CacheKey::Tags(None)).is_some());
    }

    #[test]
    fn memory_list_keys_distinguish_limits() {
        let mut cache = Cache::default();
        let small = ListKey { page: Some(1), limit: Some(2), ..Default::default() };
        let large = ListKey { page: Some(1), limit: Some(50), ..Default::default() };
        cache.put(CacheKey::LaneMemories(lane_id(), small.clone()), json!(["a", "b"]));

        assert!(cache.get(&CacheKey::LaneMemories(lane_id(), large)).is_none());
        assert!(cache.get(&CacheKey::LaneMemories(lane_id(), small)).is_some());
    }

    #[test]
    fn session_change_purges_private_reads_only() {
        let mut cache = Cache::default();
        cache.put(CacheKey::Profile, json!({}));
        cache.put(CacheKey::MyLanes(ListKey::default()), json!([]));
        cache.put(CacheKey::Lanes(ListKey::default()), json!([]));

        cache.invalidate(&Mutation::SessionChanged);

        assert!(cache.get(&CacheKey::Profile).is_none());
        assert!(cache.get(&CacheKey::MyLanes(ListKey::default())).is_none());
        assert!(cache.get(&CacheKey::Lanes(ListKey::default())).is_some());
    }
}
