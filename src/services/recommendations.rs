use std::collections::HashSet;
use tracing::instrument;

use crate::{
    db::CorpusStore,
    error::AppResult,
    models::{
        CandidateSong, PreferenceProfile, Recommendation, RecommendationResult, ScoredCandidate,
    },
    services::{
        profile::build_profile,
        providers::ListeningHistory,
        scoring::score_corpus,
        seed_resolver::{resolve_seeds, SeedResolution},
    },
};

/// Number of recommendations returned per request
pub const TARGET_SIZE: usize = 20;

/// Below this many scored matches the result is considered sparse
///
/// Only logged. Backfill still tops up any shortfall below [`TARGET_SIZE`]; topping up
/// only below this threshold would break the `min(TARGET_SIZE, corpus)` length guarantee.
pub const MIN_SCORED_MATCHES: usize = 10;

const NO_HISTORY_MESSAGE: &str =
    "No listening history found. Please listen to music on Spotify to get personalized recommendations!";

/// Generates recommendations for the user behind `history`
///
/// Resolves seed tracks, derives a preference profile, scores the corpus and
/// backfills with random songs when scoring comes up short. Fails only on an
/// authentication error from `history` or an unavailable corpus store.
#[instrument(skip_all, fields(provider = history.name(), store = corpus.name()))]
pub async fn recommend(
    history: &dyn ListeningHistory,
    corpus: &dyn CorpusStore,
) -> AppResult<RecommendationResult> {
    let (window, seeds) = match resolve_seeds(history).await? {
        SeedResolution::Found { window, tracks } => (window, tracks),
        SeedResolution::NoHistory => return random_recommendations(corpus).await,
    };

    let sample: Vec<String> = seeds
        .iter()
        .take(3)
        .map(|t| format!("\"{}\" by {}", t.title, t.primary_artist().unwrap_or("unknown")))
        .collect();
    tracing::info!(window = %window, sample = %sample.join(", "), "Sample seed tracks");

    let profile = build_profile(&seeds, corpus).await?;
    let scored = score_corpus(&profile, corpus, TARGET_SIZE).await?;
    let recommendations = backfill(scored, corpus).await?;

    tracing::info!(
        recommendations = recommendations.len(),
        "Personalized recommendations ready"
    );

    Ok(RecommendationResult {
        recommendations,
        profile,
        time_range_used: Some(window),
        message: None,
    })
}

/// Random picks for a user without any listening history
async fn random_recommendations(corpus: &dyn CorpusStore) -> AppResult<RecommendationResult> {
    let songs = corpus.sample_random(TARGET_SIZE, &[]).await?;

    let mut recommendations = Vec::with_capacity(songs.len());
    append_unscored(&mut recommendations, songs);

    tracing::info!(
        recommendations = recommendations.len(),
        "Returning random recommendations without listening history"
    );

    Ok(RecommendationResult {
        recommendations,
        profile: PreferenceProfile::no_history(),
        time_range_used: None,
        message: Some(NO_HISTORY_MESSAGE.to_string()),
    })
}

/// Appends songs as unscored entries, skipping ids already present
fn append_unscored(into: &mut Vec<Recommendation>, songs: Vec<CandidateSong>) {
    let mut seen: HashSet<String> = into.iter().map(|r| r.id().to_string()).collect();

    for song in songs {
        if into.len() >= TARGET_SIZE {
            break;
        }
        if seen.insert(song.id.clone()) {
            into.push(Recommendation::unscored(song));
        }
    }
}

/// Tops up scored candidates with random songs until [`TARGET_SIZE`] is reached
pub async fn backfill(
    scored: Vec<ScoredCandidate>,
    corpus: &dyn CorpusStore,
) -> AppResult<Vec<Recommendation>> {
    let mut seen = HashSet::new();
    let mut recommendations: Vec<Recommendation> = scored
        .into_iter()
        .filter(|c| seen.insert(c.song.id.clone()))
        .take(TARGET_SIZE)
        .map(Recommendation::from)
        .collect();

    if recommendations.len() < MIN_SCORED_MATCHES {
        tracing::warn!(
            matches = recommendations.len(),
            target = TARGET_SIZE,
            "Few scored matches, adding random songs"
        );
    }

    if recommendations.len() < TARGET_SIZE {
        let exclude: Vec<String> = recommendations.iter().map(|r| r.id().to_string()).collect();
        let extra = corpus
            .sample_random(TARGET_SIZE - recommendations.len(), &exclude)
            .await?;
        append_unscored(&mut recommendations, extra);
    }

    Ok(recommendations)
}
