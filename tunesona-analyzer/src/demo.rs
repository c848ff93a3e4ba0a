//! Demo seed data
//!
//! A fixed library that exercises the full statistics and persona path
//! without a network or a credential.

use crate::snapshot::{LibrarySnapshot, SourceSet};
use crate::types::{Collection, Track};
use chrono::{DateTime, Utc};

/// (id, title, artist, album, genre, duration ms, play count, loved, added)
type DemoRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u64,
    u64,
    bool,
    &'static str,
);

const DEMO_ROWS: [DemoRow; 15] = [
    ("1", "Blinding Lights", "The Weeknd", "After Hours", "Pop", 200_000, 45, true, "2023-01-15T10:30:00Z"),
    ("2", "Levitating", "Dua Lipa", "Future Nostalgia", "Pop", 203_000, 38, true, "2023-02-20T14:15:00Z"),
    ("3", "Good 4 U", "Olivia Rodrigo", "SOUR", "Pop Rock", 178_000, 52, true, "2023-03-10T09:45:00Z"),
    ("4", "Heat Waves", "Glass Animals", "Dreamland", "Indie Pop", 238_000, 29, false, "2023-01-25T16:20:00Z"),
    ("5", "Stay", "The Kid LAROI & Justin Bieber", "F*CK LOVE 3", "Pop", 141_000, 67, true, "2023-02-05T11:30:00Z"),
    ("6", "Industry Baby", "Lil Nas X ft. Jack Harlow", "MONTERO", "Hip Hop", 212_000, 41, true, "2023-03-15T13:45:00Z"),
    ("7", "Peaches", "Justin Bieber ft. Daniel Caesar & Giveon", "Justice", "R&B", 198_000, 33, false, "2023-01-30T08:15:00Z"),
    ("8", "Kiss Me More", "Doja Cat ft. SZA", "Planet Her", "Pop", 208_000, 48, true, "2023-02-12T15:30:00Z"),
    ("9", "Montero", "Lil Nas X", "MONTERO", "Hip Hop", 137_000, 55, true, "2023-03-20T12:00:00Z"),
    ("10", "Watermelon Sugar", "Harry Styles", "Fine Line", "Pop Rock", 174_000, 36, false, "2023-01-18T17:45:00Z"),
    ("11", "Positions", "Ariana Grande", "Positions", "R&B", 172_000, 42, true, "2023-02-28T10:20:00Z"),
    ("12", "Dynamite", "BTS", "BE", "K-Pop", 199_000, 39, true, "2023-03-05T14:10:00Z"),
    ("13", "Mood", "24kGoldn ft. iann dior", "El Dorado", "Hip Hop", 140_000, 31, false, "2023-01-22T19:30:00Z"),
    ("14", "Therefore I Am", "Billie Eilish", "Therefore I Am", "Alternative", 174_000, 44, true, "2023-02-15T11:45:00Z"),
    ("15", "Savage", "Megan Thee Stallion", "Suga", "Hip Hop", 160_000, 37, false, "2023-03-12T16:25:00Z"),
];

/// The fifteen demo tracks in catalogue order
pub fn demo_tracks() -> Vec<Track> {
    DEMO_ROWS
        .iter()
        .map(
            |&(id, title, artist, album, genre, duration_ms, play_count, loved, added)| Track {
                id: id.to_string(),
                title: title.to_string(),
                artist_name: artist.to_string(),
                album_name: album.to_string(),
                genre: genre.to_string(),
                duration_ms,
                play_count: Some(play_count),
                loved: Some(loved),
                added_at: DateTime::parse_from_rfc3339(added)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            },
        )
        .collect()
}

/// Snapshot built from the demo tracks
///
/// Recently played is every track, newest addition first; library songs are
/// the loved tracks in catalogue order.
pub fn demo_snapshot() -> LibrarySnapshot {
    let tracks = demo_tracks();

    let mut recently_played = tracks.clone();
    recently_played.sort_by(|a, b| b.added_at.cmp(&a.added_at));

    let library_songs: Vec<Track> = tracks
        .into_iter()
        .filter(|t| t.loved == Some(true))
        .collect();

    let sources = SourceSet {
        recently_played,
        library_songs,
        ..SourceSet::default()
    };

    LibrarySnapshot::build(
        sources,
        vec![Collection::RecentlyPlayed, Collection::LibrarySongs],
        vec![],
    )
}
