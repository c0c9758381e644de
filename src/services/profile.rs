use crate::{
    db::CorpusStore,
    error::AppResult,
    models::{CandidateSong, PreferenceProfile, SeedTrack},
};

/// Upper bound on corpus songs read to derive feature averages
pub const ARTIST_MATCH_LIMIT: usize = 100;

/// Appends each value not already present, keeping first-seen order
fn push_unique<'a>(into: &mut Vec<String>, values: impl IntoIterator<Item = &'a String>) {
    for value in values {
        if !value.is_empty() && !into.contains(value) {
            into.push(value.clone());
        }
    }
}

/// Artist names across all seed tracks, first occurrence wins
pub fn collect_artists(seeds: &[SeedTrack]) -> Vec<String> {
    let mut artists = Vec::new();
    push_unique(&mut artists, seeds.iter().flat_map(|t| t.artists.iter()));
    artists
}

/// Genre tags across all seed tracks, empty tags dropped
pub fn collect_genres(seeds: &[SeedTrack]) -> Vec<String> {
    let mut genres = Vec::new();
    push_unique(&mut genres, seeds.iter().flat_map(|t| t.genres.iter()));
    genres
}

/// Mean (energy, danceability, valence) over songs, `None` for an empty slice
pub fn average_features(songs: &[CandidateSong]) -> Option<(f64, f64, f64)> {
    if songs.is_empty() {
        return None;
    }

    let n = songs.len() as f64;
    let (energy, danceability, valence) =
        songs.iter().fold((0.0, 0.0, 0.0), |(e, d, v), song| {
            (
                e + song.features.energy(),
                d + song.features.danceability(),
                v + song.features.valence(),
            )
        });

    Some((energy / n, danceability / n, valence / n))
}

/// Derives a preference profile from seed tracks and the corpus songs by the same artists
pub async fn build_profile(
    seeds: &[SeedTrack],
    corpus: &dyn CorpusStore,
) -> AppResult<PreferenceProfile> {
    let top_artists = collect_artists(seeds);
    let top_genres = collect_genres(seeds);

    let matches = corpus
        .find_by_artists(&top_artists, ARTIST_MATCH_LIMIT)
        .await?;

    tracing::info!(
        artists = top_artists.len(),
        genres = top_genres.len(),
        matches = matches.len(),
        "Found corpus songs by favourite artists"
    );

    let mut profile = PreferenceProfile::with_default_features(top_artists, top_genres);
    match average_features(&matches) {
        Some((energy, danceability, valence)) => {
            profile.avg_energy = energy;
            profile.avg_danceability = danceability;
            profile.avg_valence = valence;
        }
        None => {
            tracing::info!("No favourite artists in corpus, using default audio features");
        }
    }

    tracing::info!(
        energy = profile.avg_energy,
        danceability = profile.avg_danceability,
        valence = profile.avg_valence,
        "Preference profile built"
    );

    Ok(profile)
}
