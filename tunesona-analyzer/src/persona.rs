//! Persona Classifier
//!
//! Maps the ranked genre list to one archetype by scanning an ordered rule
//! list against the top three genres. Matching is a case-insensitive
//! substring test; the first rule with any matching genre wins. Rule order is
//! a priority list: hip-hop is checked before pop, K-pop before pop, and so on.
//!
//! When nothing matches the explorer archetype is returned. That is the normal
//! fallback, not an error.

use crate::types::GenreCount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading genres the rules are evaluated against
pub const PERSONA_GENRE_WINDOW: usize = 3;

/// Placeholder in prompt templates replaced by the matched genre list
const GENRES_PLACEHOLDER: &str = "{genres}";

/// Genre list substituted when there are no genres at all
const NO_GENRES: &str = "eclectic";

/// Fixed set of persona archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    StreetMusicPoet,
    CosmicSynthVoyager,
    DreamyLofiDrifter,
    VelvetSoulCrooner,
    IdolStageDreamer,
    PopMelodyMaker,
    RebelGuitarSpirit,
    MidnightJazzWanderer,
    CinematicDreamer,
    StorytellingFolkHeart,
    Explorer,
}

impl Archetype {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Archetype::StreetMusicPoet => "Street Music Poet",
            Archetype::CosmicSynthVoyager => "Cosmic Synth Voyager",
            Archetype::DreamyLofiDrifter => "Dreamy Lofi Drifter",
            Archetype::VelvetSoulCrooner => "Velvet Soul Crooner",
            Archetype::IdolStageDreamer => "Idol Stage Dreamer",
            Archetype::PopMelodyMaker => "Pop Melody Maker",
            Archetype::RebelGuitarSpirit => "Rebel Guitar Spirit",
            Archetype::MidnightJazzWanderer => "Midnight Jazz Wanderer",
            Archetype::CinematicDreamer => "Cinematic Dreamer",
            Archetype::StorytellingFolkHeart => "Storytelling Folk Heart",
            Archetype::Explorer => "Music Explorer",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaResult {
    pub archetype: Archetype,
    pub label: String,
    pub mood: String,
    pub prompt: String,
    /// Genres the rules were evaluated against, in rank order
    pub genres: Vec<String>,
}

/// One (predicate, result) pair of the rule list
struct PersonaRule {
    keywords: &'static [&'static str],
    archetype: Archetype,
    mood: &'static str,
    template: &'static str,
}

impl PersonaRule {
    fn matches(&self, genre: &str) -> bool {
        let genre = genre.to_lowercase();
        self.keywords.iter().any(|k| genre.contains(k))
    }
}

/// Evaluated top to bottom; keywords are lowercase
///
/// Chinese labels are listed alongside English ones because the catalog
/// returns localized genre names for a non-English storefront language.
const RULES: &[PersonaRule] = &[
    PersonaRule {
        keywords: &["hip hop", "hip-hop", "rap", "trap", "说唱", "嘻哈"],
        archetype: Archetype::StreetMusicPoet,
        mood: "Bold • Rhythmic • Confident",
        template: "hard-hitting hip-hop with {genres} influences, punchy drums, deep 808 bass, sharp lyrical flow, urban night atmosphere",
    },
    PersonaRule {
        keywords: &["electronic", "dance", "house", "techno", "edm", "trance", "电子", "舞曲"],
        archetype: Archetype::CosmicSynthVoyager,
        mood: "Euphoric • Futuristic • Energetic",
        template: "dreamy space electronic blending {genres}, ethereal synth textures, pulsing arpeggios, wide stereo pads, driving four-on-the-floor beat",
    },
    PersonaRule {
        keywords: &["lofi", "lo-fi", "chill", "ambient", "氛围"],
        archetype: Archetype::DreamyLofiDrifter,
        mood: "Dreamy • Relaxed • Immersive",
        template: "mellow lofi beats shaped by {genres}, dusty vinyl crackle, soft jazzy chords, slow tempo, late-night study feel",
    },
    PersonaRule {
        keywords: &["r&b", "rnb", "soul", "funk", "节奏布鲁斯", "灵魂乐"],
        archetype: Archetype::VelvetSoulCrooner,
        mood: "Smooth • Warm • Sensual",
        template: "silky contemporary r&b rooted in {genres}, lush vocal harmonies, warm electric piano, laid-back groove",
    },
    PersonaRule {
        keywords: &["k-pop", "kpop", "j-pop", "jpop", "韩流", "日系流行"],
        archetype: Archetype::IdolStageDreamer,
        mood: "Dazzling • Playful • Unstoppable",
        template: "energetic idol pop fusing {genres}, catchy hooks, electronic drops, polished layered vocals, stadium-ready chorus",
    },
    PersonaRule {
        keywords: &["pop", "流行"],
        archetype: Archetype::PopMelodyMaker,
        mood: "Bright • Catchy • Uplifting",
        template: "radio-ready pop inspired by {genres}, shimmering synths, big sing-along chorus, tight modern production",
    },
    PersonaRule {
        keywords: &["rock", "metal", "punk", "alternative", "grunge", "摇滚", "金属", "朋克", "另类"],
        archetype: Archetype::RebelGuitarSpirit,
        mood: "Raw • Defiant • Electric",
        template: "driving guitar music drawing on {genres}, distorted riffs, live drum energy, raspy anthemic vocals",
    },
    PersonaRule {
        keywords: &["jazz", "blues", "swing", "爵士", "蓝调"],
        archetype: Archetype::MidnightJazzWanderer,
        mood: "Smoky • Soulful • Nocturnal",
        template: "late-night jazz club sound steeped in {genres}, brushed drums, walking upright bass, expressive saxophone lines",
    },
    PersonaRule {
        keywords: &["classical", "soundtrack", "instrumental", "orchestral", "古典", "原声", "配乐"],
        archetype: Archetype::CinematicDreamer,
        mood: "Epic • Emotional • Expansive",
        template: "sweeping cinematic score built from {genres}, soaring strings, swelling brass, delicate piano motifs",
    },
    PersonaRule {
        keywords: &["country", "folk", "singer/songwriter", "singer-songwriter", "americana", "乡村", "民谣"],
        archetype: Archetype::StorytellingFolkHeart,
        mood: "Honest • Nostalgic • Heartfelt",
        template: "acoustic storytelling song grounded in {genres}, fingerpicked guitar, gentle harmonica, intimate warm vocals",
    },
];

const EXPLORER_MOOD: &str = "Curious • Open • Eclectic";
const EXPLORER_TEMPLATE: &str = "genre-bending experimental track mixing {genres}, unexpected instrumentation, evolving structure, adventurous sound design";

/// Derive the persona for a ranked genre list
///
/// Only the first three genres are considered. Predicate order, not genre
/// count, decides the match.
pub fn derive_persona(top_genres: &[GenreCount]) -> PersonaResult {
    let genres: Vec<String> = top_genres
        .iter()
        .take(PERSONA_GENRE_WINDOW)
        .map(|g| g.genre.clone())
        .collect();

    let matched = RULES
        .iter()
        .find(|rule| genres.iter().any(|g| rule.matches(g)));

    let (archetype, mood, template) = match matched {
        Some(rule) => (rule.archetype, rule.mood, rule.template),
        None => (Archetype::Explorer, EXPLORER_MOOD, EXPLORER_TEMPLATE),
    };

    PersonaResult {
        archetype,
        label: archetype.label().to_string(),
        mood: mood.to_string(),
        prompt: fill_template(template, &genres),
        genres,
    }
}

fn fill_template(template: &str, genres: &[String]) -> String {
    let genre_text = if genres.is_empty() {
        NO_GENRES.to_string()
    } else {
        genres
            .iter()
            .map(|g| g.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ")
    };
    template.replace(GENRES_PLACEHOLDER, &genre_text)
}
