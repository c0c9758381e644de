use futures::TryStreamExt;
use std::cmp::Ordering;

use crate::{
    db::CorpusStore,
    error::AppResult,
    models::{CandidateSong, PreferenceProfile, ScoredCandidate},
};

/// Points for a song by one of the user's artists
pub const ARTIST_WEIGHT: f64 = 10.0;
/// Maximum points for energy similarity
pub const ENERGY_WEIGHT: f64 = 5.0;
/// Maximum points for danceability similarity
pub const DANCEABILITY_WEIGHT: f64 = 5.0;
/// Maximum points for valence similarity
pub const VALENCE_WEIGHT: f64 = 3.0;
/// Half-width of the feature ranges used by the eligibility filter
pub const FEATURE_TOLERANCE: f64 = 0.3;

fn within_tolerance(value: f64, target: f64) -> bool {
    value >= target - FEATURE_TOLERANCE && value <= target + FEATURE_TOLERANCE
}

fn stored_within_tolerance(value: Option<f64>, target: f64) -> bool {
    value.is_some_and(|v| within_tolerance(v, target))
}

/// Whether a song passes the pre-filter and gets scored at all
///
/// A song qualifies by artist, by energy and danceability together, or by valence.
/// Range clauses only match stored values; a missing feature never falls in range.
pub fn is_eligible(song: &CandidateSong, profile: &PreferenceProfile) -> bool {
    let features = &song.features;

    profile.has_artist(&song.artist)
        || (stored_within_tolerance(features.energy, profile.avg_energy)
            && stored_within_tolerance(features.danceability, profile.avg_danceability))
        || stored_within_tolerance(features.valence, profile.avg_valence)
}

/// Weighted similarity of a song to the profile
///
/// Not clamped: features outside [0, 1] can push a similarity term below zero.
pub fn score(song: &CandidateSong, profile: &PreferenceProfile) -> f64 {
    let features = &song.features;
    let artist_bonus = if profile.has_artist(&song.artist) {
        ARTIST_WEIGHT
    } else {
        0.0
    };

    artist_bonus
        + ENERGY_WEIGHT * (1.0 - (features.energy() - profile.avg_energy).abs())
        + DANCEABILITY_WEIGHT * (1.0 - (features.danceability() - profile.avg_danceability).abs())
        + VALENCE_WEIGHT * (1.0 - (features.valence() - profile.avg_valence).abs())
}

/// Highest score first; equal scores ordered by ascending song id
fn by_rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.song.id.cmp(&b.song.id))
}

/// Sorts candidates by rank and keeps the best `limit`
pub fn rank(mut candidates: Vec<ScoredCandidate>, limit: usize) -> Vec<ScoredCandidate> {
    candidates.sort_by(by_rank);
    candidates.truncate(limit);
    candidates
}

/// Scores every eligible song in the corpus and returns the best `limit`
///
/// The corpus is streamed; at most `2 * limit` candidates are held at once.
pub async fn score_corpus(
    profile: &PreferenceProfile,
    corpus: &dyn CorpusStore,
    limit: usize,
) -> AppResult<Vec<ScoredCandidate>> {
    let mut songs = corpus.scan_all();
    let mut kept: Vec<ScoredCandidate> = Vec::new();
    let mut scanned = 0usize;
    let mut eligible = 0usize;

    while let Some(song) = songs.try_next().await? {
        scanned += 1;
        if !is_eligible(&song, profile) {
            continue;
        }

        eligible += 1;
        let points = score(&song, profile);
        kept.push(ScoredCandidate {
            song,
            score: points,
        });

        if kept.len() >= limit.saturating_mul(2).max(1) {
            kept = rank(kept, limit);
        }
    }

    let ranked = rank(kept, limit);

    tracing::info!(
        scanned,
        eligible,
        returned = ranked.len(),
        store = corpus.name(),
        "Scored corpus candidates"
    );

    if let Some(top) = ranked.first() {
        let artist_matches = ranked
            .iter()
            .filter(|c| profile.has_artist(&c.song.artist))
            .count();
        tracing::info!(
            title = %top.song.title,
            artist = %top.song.artist,
            score = top.score,
            artist_matches,
            "Top recommendation"
        );
    }

    Ok(ranked)
}
