//! Track list view
//!
//! Read-only snapshot of the registry joined with stored progress, ordered
//! and filtered the way the list renders it.

use crate::format::{format_clock, format_hours, format_relative};
use crate::hidden::HiddenList;
use crate::registry::TrackRegistry;
use reprise_core::ProgressRecord;
use reprise_storage::ProgressStore;
use serde::Serialize;

/// One row of the track list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackListing {
    /// Track name
    pub name: String,
    /// Import ordinal (what `activate` takes)
    pub ordinal: usize,
    /// Stored progress, if any
    pub progress: Option<ProgressRecord>,
    /// `"{elapsed} / {duration}"`, absent without a duration
    pub progress_text: Option<String>,
    /// `"First: {relative} • Total: {hours}"`, absent if never started
    pub stats_text: Option<String>,
}

impl TrackListing {
    fn new(name: &str, ordinal: usize, progress: Option<ProgressRecord>, now_ms: i64) -> Self {
        let progress_text = progress.as_ref().and_then(|record| {
            let duration = record.duration?;
            Some(format!(
                "{} / {}",
                format_clock(record.current_time_or_zero()),
                format_clock(duration)
            ))
        });

        let stats_text = progress.as_ref().and_then(|record| {
            let first = record.first_listened?;
            Some(format!(
                "First: {} • Total: {}",
                format_relative(first, now_ms),
                format_hours(record.total_listening_time_or_zero())
            ))
        });

        Self {
            name: name.to_string(),
            ordinal,
            progress,
            progress_text,
            stats_text,
        }
    }

    /// Fraction of the track already heard, for a progress bar
    pub fn fraction(&self) -> Option<f64> {
        let record = self.progress.as_ref()?;
        let duration = record.duration.filter(|d| *d > 0.0)?;
        Some((record.current_time_or_zero() / duration).clamp(0.0, 1.0))
    }
}

/// Build the list as rendered
///
/// Most recently played first; never-played tracks last. Ties keep import
/// order. Only tracks on the current side of the hidden filter are included.
pub fn list_view(
    registry: &TrackRegistry,
    store: &ProgressStore,
    hidden: &HiddenList,
    now_ms: i64,
) -> Vec<TrackListing> {
    let mut rows: Vec<TrackListing> = registry
        .iter()
        .map(|track| TrackListing::new(&track.name, track.ordinal, store.get(&track.name), now_ms))
        .collect();

    // Stable sort keeps import order for ties
    rows.sort_by_key(|row| {
        std::cmp::Reverse(
            row.progress
                .as_ref()
                .map_or(0, ProgressRecord::last_played_or_epoch),
        )
    });

    rows.retain(|row| hidden.shows(&row.name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use reprise_core::ImportedFile;

    fn registry(names: &[&str]) -> TrackRegistry {
        TrackRegistry::import(
            names
                .iter()
                .map(|n| ImportedFile::new(format!("{}.mp3", n), format!("blob:{}", n))),
        )
        .unwrap()
    }

    #[test]
    fn fresh_track_has_no_texts() {
        let store = ProgressStore::in_memory();
        let hidden = HiddenList::load(store.clone());
        let rows = list_view(&registry(&["song"]), &store, &hidden, 0);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].progress, None);
        assert_eq!(rows[0].progress_text, None);
        assert_eq!(rows[0].stats_text, None);
        assert_eq!(rows[0].fraction(), None);
    }

    #[test]
    fn texts_render_from_record() {
        let store = ProgressStore::in_memory();
        store.update("song", |r| {
            r.mark_started(0);
            r.commit_position(45.0, 200.0, 30.0);
            r.add_listening_time(2.0 * 3600.0 + 300.0);
        });
        let hidden = HiddenList::load(store.clone());

        let rows = list_view(&registry(&["song"]), &store, &hidden, 5 * 60_000);
        assert_eq!(rows[0].progress_text.as_deref(), Some("0:45 / 3:20"));
        assert_eq!(
            rows[0].stats_text.as_deref(),
            Some("First: 5 min ago • Total: 2h 5m")
        );
        assert_eq!(rows[0].fraction(), Some(0.225));
    }

    #[test]
    fn sorted_by_last_played_with_stable_ties() {
        let store = ProgressStore::in_memory();
        store.update("c", |r| r.mark_started(2_000));
        store.update("b", |r| r.mark_started(5_000));
        let hidden = HiddenList::load(store.clone());

        let rows = list_view(&registry(&["a", "b", "c", "d"]), &store, &hidden, 10_000);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn hidden_filter_applies_after_sort() {
        let store = ProgressStore::in_memory();
        let mut hidden = HiddenList::load(store.clone());
        hidden.hide("b");

        let reg = registry(&["a", "b", "c"]);
        let visible: Vec<_> = list_view(&reg, &store, &hidden, 0)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(visible, vec!["a", "c"]);

        hidden.toggle_view_mode();
        let only_hidden: Vec<_> = list_view(&reg, &store, &hidden, 0)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(only_hidden, vec!["b"]);
    }
}
