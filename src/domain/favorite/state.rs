//! Favorites state container — app-owned, SDK-provided update logic.
//!
//! Local edits set `needs_sync`; a full refresh from the server
//! (`set_favorites`) or an explicit `mark_synced` clears it.

use super::{Favorite, FavoriteGroup, FavoriteOrder, FavoriteUpdate, GroupUpdate, DEFAULT_GROUP_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteSort {
    Name,
    Code,
    CreatedAt,
    UpdatedAt,
    /// Server-side `sort_order`.
    #[default]
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FavoritesState {
    favorites: Vec<Favorite>,
    groups: Vec<FavoriteGroup>,
    selected_group: Option<String>,
    pub sort_by: FavoriteSort,
    pub direction: SortDirection,
    needs_sync: bool,
    last_sync: Option<DateTime<Utc>>,
    error: Option<String>,
    loading: bool,
}

impl FavoritesState {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Favorites ───────────────────────────────────────────────────────

    /// Replace the list with the server's copy.
    pub fn set_favorites(&mut self, favorites: Vec<Favorite>) {
        self.favorites = favorites;
        self.loading = false;
        self.mark_synced();
    }

    /// Add a favorite unless its code is already saved. Returns whether it was added.
    pub fn add(&mut self, favorite: Favorite) -> bool {
        if self.contains(favorite.ts_code.as_str()) {
            return false;
        }
        self.favorites.push(favorite);
        self.needs_sync = true;
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Favorite> {
        let idx = self.favorites.iter().position(|f| f.id == id)?;
        self.needs_sync = true;
        Some(self.favorites.remove(idx))
    }

    /// Apply the set fields of `update`. Returns false when `id` is unknown.
    pub fn update(&mut self, id: &str, update: &FavoriteUpdate) -> bool {
        let Some(fav) = self.favorites.iter_mut().find(|f| f.id == id) else {
            return false;
        };
        if let Some(d) = update.start_date {
            fav.start_date = Some(d);
        }
        if let Some(d) = update.end_date {
            fav.end_date = Some(d);
        }
        if let Some(g) = &update.group_id {
            fav.group_id = g.clone();
        }
        if let Some(o) = update.sort_order {
            fav.sort_order = o;
        }
        self.needs_sync = true;
        true
    }

    /// Apply new sort orders (and groups), then re-sort by order.
    pub fn reorder(&mut self, orders: &[FavoriteOrder]) {
        for order in orders {
            if let Some(fav) = self.favorites.iter_mut().find(|f| f.id == order.id) {
                fav.sort_order = order.sort_order;
                fav.group_id = order.group_id.clone();
            }
        }
        self.favorites.sort_by_key(|f| f.sort_order);
        self.needs_sync = true;
    }

    pub fn contains(&self, ts_code: &str) -> bool {
        self.favorites.iter().any(|f| f.ts_code.as_str() == ts_code)
    }

    pub fn find_by_code(&self, ts_code: &str) -> Option<&Favorite> {
        self.favorites.iter().find(|f| f.ts_code.as_str() == ts_code)
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    // ─── Groups ──────────────────────────────────────────────────────────

    pub fn set_groups(&mut self, groups: Vec<FavoriteGroup>) {
        self.groups = groups;
    }

    pub fn add_group(&mut self, group: FavoriteGroup) {
        self.groups.push(group);
    }

    pub fn update_group(&mut self, id: &str, update: &GroupUpdate) -> bool {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == id) else {
            return false;
        };
        if let Some(n) = &update.name {
            group.name = n.clone();
        }
        if let Some(c) = &update.color {
            group.color = c.clone();
        }
        if let Some(o) = update.sort_order {
            group.sort_order = o;
        }
        true
    }

    /// Drop a group. Its favorites move to the default group and a
    /// selection pointing at it is cleared.
    pub fn remove_group(&mut self, id: &str) {
        self.groups.retain(|g| g.id != id);
        for fav in self.favorites.iter_mut().filter(|f| f.group_id == id) {
            fav.group_id = DEFAULT_GROUP_ID.to_string();
        }
        if self.selected_group.as_deref() == Some(id) {
            self.selected_group = None;
        }
        self.needs_sync = true;
    }

    pub fn groups(&self) -> &[FavoriteGroup] {
        &self.groups
    }

    /// `None` shows every group.
    pub fn select_group(&mut self, id: Option<String>) {
        self.selected_group = id;
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.selected_group.as_deref()
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// All favorites ordered by the current sort key and direction.
    pub fn sorted(&self) -> Vec<&Favorite> {
        let mut out: Vec<&Favorite> = self.favorites.iter().collect();
        out.sort_by(|a, b| {
            let ord = self.compare(a, b);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        out
    }

    /// Sorted favorites restricted to the selected group.
    pub fn visible(&self) -> Vec<&Favorite> {
        let selected = self.selected_group.as_deref();
        self.sorted()
            .into_iter()
            .filter(|f| selected.map_or(true, |g| f.group_id == g))
            .collect()
    }

    fn compare(&self, a: &Favorite, b: &Favorite) -> Ordering {
        match self.sort_by {
            FavoriteSort::Name => a.name.cmp(&b.name),
            FavoriteSort::Code => a.ts_code.as_str().cmp(b.ts_code.as_str()),
            FavoriteSort::CreatedAt => a.created_at.cmp(&b.created_at),
            FavoriteSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            FavoriteSort::Custom => a.sort_order.cmp(&b.sort_order),
        }
    }

    // ─── Sync / status ───────────────────────────────────────────────────

    pub fn mark_synced(&mut self) {
        self.needs_sync = false;
        self.last_sync = Some(Utc::now());
    }

    pub fn mark_needs_sync(&mut self) {
        self.needs_sync = true;
    }

    pub fn needs_sync(&self) -> bool {
        self.needs_sync
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record a failure; also ends loading.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
        self.loading = false;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Back to empty, keeping the sort preferences.
    pub fn reset(&mut self) {
        *self = Self {
            sort_by: self.sort_by,
            direction: self.direction,
            ..Self::default()
        };
    }
}
