use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Closed genre vocabulary plus the unclassified sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "post punk")]
    PostPunk,
    #[serde(rename = "pop punk")]
    PopPunk,
    #[serde(rename = "punk")]
    Punk,
    #[serde(rename = "metal")]
    Metal,
    #[serde(rename = "indie rock")]
    IndieRock,
    #[serde(rename = "rock")]
    Rock,
    #[serde(rename = "hip hop")]
    HipHop,
    #[serde(rename = "electronic")]
    Electronic,
    #[serde(rename = "jazz")]
    Jazz,
    #[serde(rename = "blues")]
    Blues,
    #[serde(rename = "folk")]
    Folk,
    #[serde(rename = "country")]
    Country,
    #[serde(rename = "soul")]
    Soul,
    #[serde(rename = "reggae")]
    Reggae,
    #[serde(rename = "classical")]
    Classical,
    #[serde(rename = "pop")]
    Pop,
    #[serde(rename = "comedy")]
    Comedy,
    /// No keyword matched; distinct from an absent description
    #[serde(rename = "unknown")]
    Unknown,
}

/// Keyword table, scanned top to bottom; first entry with any matching keyword wins.
///
/// Narrower genres sit above the broader ones whose keywords they contain
/// ("post-punk" before "punk", "indie rock" before "rock", "pop punk" before
/// both "punk" and "pop"). Comedy outranks every music genre. Keywords match
/// whole words only.
const GENRE_KEYWORDS: &[(Genre, &[&str])] = &[
    (Genre::Comedy, &["comedy", "stand-up", "comedian", "comedians"]),
    (Genre::PostPunk, &["post-punk", "post punk", "postpunk"]),
    (Genre::PopPunk, &["pop-punk", "pop punk"]),
    (Genre::Punk, &["punk", "hardcore"]),
    (Genre::Metal, &["metal", "doom", "thrash", "sludge"]),
    (Genre::IndieRock, &["indie rock", "indie-rock"]),
    (Genre::Rock, &["rock", "garage", "shoegaze", "grunge"]),
    (Genre::HipHop, &["hip-hop", "hip hop", "rapper", "emcee"]),
    (
        Genre::Electronic,
        &["electronic", "techno", "house music", "edm", "synthwave", "dj set"],
    ),
    (Genre::Jazz, &["jazz", "bebop", "big band"]),
    (Genre::Blues, &["blues"]),
    (Genre::Folk, &["folk", "bluegrass", "americana", "singer-songwriter"]),
    (Genre::Country, &["country", "honky tonk", "outlaw"]),
    (Genre::Soul, &["soul", "r&b", "funk", "motown"]),
    (Genre::Reggae, &["reggae", "ska", "dub"]),
    (Genre::Classical, &["classical", "orchestra", "symphony", "chamber"]),
    (Genre::Pop, &["pop"]),
];

/// One case-insensitive whole-word pattern per table entry, in table order
static GENRE_PATTERNS: LazyLock<Vec<(Genre, Regex)>> = LazyLock::new(|| {
    GENRE_KEYWORDS
        .iter()
        .map(|(genre, keywords)| {
            let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
            let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
            (*genre, Regex::new(&pattern).expect("valid genre regex"))
        })
        .collect()
});

impl Genre {
    /// Canonical tag as stored in records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostPunk => "post punk",
            Self::PopPunk => "pop punk",
            Self::Punk => "punk",
            Self::Metal => "metal",
            Self::IndieRock => "indie rock",
            Self::Rock => "rock",
            Self::HipHop => "hip hop",
            Self::Electronic => "electronic",
            Self::Jazz => "jazz",
            Self::Blues => "blues",
            Self::Folk => "folk",
            Self::Country => "country",
            Self::Soul => "soul",
            Self::Reggae => "reggae",
            Self::Classical => "classical",
            Self::Pop => "pop",
            Self::Comedy => "comedy",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies free text into a genre by case-insensitive whole-word match
///
/// # Examples
///
/// ```
/// use event_harvest::normalize::{classify_genre, Genre};
///
/// assert_eq!(classify_genre("Brooding POST-PUNK from Leeds"), Genre::PostPunk);
/// assert_eq!(classify_genre("An evening of poetry"), Genre::Unknown);
/// ```
pub fn classify_genre(text: &str) -> Genre {
    GENRE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(genre, _)| *genre)
        .unwrap_or(Genre::Unknown)
}
