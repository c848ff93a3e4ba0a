//! Analysis prompt builder
//!
//! Renders a snapshot as plain text for an external text-generation service.
//! Nothing is sent anywhere from here; the output is a pure function of the
//! snapshot.

use crate::snapshot::LibrarySnapshot;
use std::fmt::Write;
use tunesona_common::time::{millis_to_rounded_hours, millis_to_rounded_minutes};

/// Genres listed in the preferences section
pub const PROMPT_GENRE_COUNT: usize = 5;

/// Entries listed per sample section
pub const PROMPT_SAMPLE_SIZE: usize = 10;

const ANALYSIS_FACETS: [&str; 5] = [
    "Preferred musical styles",
    "Emotional tendencies",
    "Creative inspiration directions",
    "Suggested music types",
    "Prompt suggestions for AI music creation",
];

/// Build the analysis prompt for `snapshot`
pub fn build_analysis_prompt(snapshot: &LibrarySnapshot) -> String {
    let stats = &snapshot.listening_stats;
    let genres = snapshot
        .top_genres
        .iter()
        .take(PROMPT_GENRE_COUNT)
        .map(|g| g.genre.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "Generate a music persona analysis from the following listening data:");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Music preferences:**");
    let _ = writeln!(out, "- Top genres: {}", genres);
    let _ = writeln!(
        out,
        "- Total listening time: about {} hours",
        millis_to_rounded_hours(stats.total_play_time_ms as f64)
    );
    let _ = writeln!(
        out,
        "- Average session length: about {} minutes",
        millis_to_rounded_minutes(stats.average_session_length_ms)
    );
    let _ = writeln!(out, "- Loved songs: {}", snapshot.loved_count());
    let _ = writeln!(out, "- Recently played: {}", snapshot.recently_played.len());
    let _ = writeln!(out, "- Heavy rotation albums: {}", snapshot.heavy_rotation.len());

    write_section(
        &mut out,
        "Recently played",
        snapshot
            .recently_played
            .iter()
            .map(|t| (t.title.as_str(), t.artist_name.as_str())),
    );
    write_section(
        &mut out,
        "Library songs",
        snapshot
            .library_songs
            .iter()
            .map(|t| (t.title.as_str(), t.artist_name.as_str())),
    );
    write_section(
        &mut out,
        "Heavy rotation albums",
        snapshot
            .heavy_rotation
            .iter()
            .map(|a| (a.name.as_str(), a.artist_name.as_str())),
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Please analyze this listener's musical taste, covering:");
    for (i, facet) in ANALYSIS_FACETS.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, facet);
    }

    out
}

fn write_section<'a>(out: &mut String, title: &str, entries: impl Iterator<Item = (&'a str, &'a str)>) {
    let _ = writeln!(out);
    let _ = writeln!(out, "**{}:**", title);
    for (name, artist) in entries.take(PROMPT_SAMPLE_SIZE) {
        let _ = writeln!(out, "- {} - {}", name, artist);
    }
}
