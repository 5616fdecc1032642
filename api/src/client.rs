use crate::henrygd::{HenrygdChampionship, HenrygdResponse, HenrygdTeam};
use crate::{FieldEntry, WireRound};
use log::debug;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const NCAA_HENRYGD: &str = "https://ncaa-api.henrygd.me";

// sectionId 6 is the National/Final Four section.
const NATIONAL_SECTION: u32 = 6;

/// NCAA bracket client backed by the henrygd API.
#[derive(Debug, Clone)]
pub struct NcaaApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NcaaApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("mmsim/0.1 (bracket simulator)")
                .build()
                .unwrap_or_default(),
            base_url: NCAA_HENRYGD.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NcaaApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host, e.g. a local mirror or test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the announced Round of 64 for `year`.
    ///
    /// Slots still waiting on a First Four game carry no team name yet and are
    /// left out, so the caller sees them as unfilled.
    pub async fn fetch_field(&self, year: u16) -> ApiResult<Vec<FieldEntry>> {
        let url = format!("{}/brackets/basketball-men/d1/{year}", self.base_url);
        let raw = self.get::<HenrygdResponse>(&url).await?;
        let champ = raw
            .championships
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("no championship data for {year}")))?;

        let field = map_field(&champ);
        if field.is_empty() {
            return Err(ApiError::NotFound(format!("no first-round teams announced for {year}")));
        }
        debug!("{}: {} first-round teams", champ.title, field.len());
        Ok(field)
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: NCAA henrygd wire types → field entries
// ---------------------------------------------------------------------------

/// Collect every seeded, named team from the championship's first-round games.
///
/// Region names come from the championship's `regions[]` array, falling back
/// to "Region {n}" when a title is still empty. Games are visited in
/// `bracketPositionId` order and a team listed twice is kept once.
pub(crate) fn map_field(champ: &HenrygdChampionship) -> Vec<FieldEntry> {
    let region_names: HashMap<u32, String> = champ
        .regions
        .iter()
        .map(|r| {
            let name = if r.title.trim().is_empty() {
                format!("Region {}", r.section_id)
            } else {
                r.title.trim().to_string()
            };
            (r.section_id, name)
        })
        .collect();

    let mut games: Vec<_> = champ
        .games
        .iter()
        .filter(|g| g.section_id != NATIONAL_SECTION)
        .filter(|g| WireRound::from_position(g.bracket_position_id) == WireRound::First)
        .collect();
    games.sort_by_key(|g| g.bracket_position_id);

    let mut field: Vec<FieldEntry> = Vec::new();
    for game in games {
        let region = region_names
            .get(&game.section_id)
            .cloned()
            .unwrap_or_else(|| format!("Region {}", game.section_id));
        for team in &game.teams {
            let Some((name, seed)) = team_identity(team) else {
                debug!(
                    "position {}: skipping unannounced slot ({})",
                    game.bracket_position_id,
                    team.description.as_deref().unwrap_or("TBA")
                );
                continue;
            };
            if field.iter().any(|e| e.team == name) {
                continue;
            }
            field.push(FieldEntry { team: name, seed, region: region.clone() });
        }
    }
    field
}

fn team_identity(team: &HenrygdTeam) -> Option<(String, u8)> {
    let name = team
        .name
        .as_deref()
        .or(team.short_name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())?;
    let seed = team.seed.filter(|s| (1..=16).contains(s))?;
    Some((name.to_string(), seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::henrygd::{HenrygdGame, HenrygdRegion};

    fn team(name: &str, seed: u8) -> HenrygdTeam {
        HenrygdTeam { name: Some(name.into()), seed: Some(seed), ..Default::default() }
    }

    fn region(section_id: u32, title: &str) -> HenrygdRegion {
        HenrygdRegion { section_id, title: title.into() }
    }

    #[test]
    fn test_map_field_keeps_only_first_round_teams() {
        let champ = HenrygdChampionship {
            title: "2026 DI Men's Basketball Championship".into(),
            games: vec![
                HenrygdGame {
                    bracket_position_id: 101,
                    teams: vec![team("Play In A", 16), team("Play In B", 16)],
                    section_id: 1,
                },
                HenrygdGame {
                    bracket_position_id: 201,
                    teams: vec![team("Duke", 1), team("Mount St. Mary's", 16)],
                    section_id: 1,
                },
                HenrygdGame {
                    bracket_position_id: 301,
                    teams: vec![team("Duke", 1), team("Baylor", 9)],
                    section_id: 1,
                },
            ],
            regions: vec![region(1, "East")],
        };
        let field = map_field(&champ);
        assert_eq!(
            field,
            vec![FieldEntry::new("Duke", 1, "East"), FieldEntry::new("Mount St. Mary's", 16, "East")]
        );
    }

    #[test]
    fn test_map_field_skips_unannounced_play_in_slots() {
        let champ = HenrygdChampionship {
            games: vec![HenrygdGame {
                bracket_position_id: 209,
                teams: vec![
                    team("Houston", 1),
                    HenrygdTeam { description: Some("First Four winner".into()), seed: Some(16), ..Default::default() },
                ],
                section_id: 4,
            }],
            regions: vec![region(4, "Midwest")],
            ..Default::default()
        };
        assert_eq!(map_field(&champ), vec![FieldEntry::new("Houston", 1, "Midwest")]);
    }

    #[test]
    fn test_map_field_empty_region_titles_fall_back_to_region_n() {
        let champ = HenrygdChampionship {
            games: vec![
                HenrygdGame { bracket_position_id: 201, teams: vec![team("A", 1), team("B", 16)], section_id: 2 },
                HenrygdGame { bracket_position_id: 209, teams: vec![team("C", 1), team("D", 16)], section_id: 3 },
            ],
            regions: vec![region(2, "")],
            ..Default::default()
        };
        let regions: Vec<String> = map_field(&champ).into_iter().map(|e| e.region).collect();
        assert_eq!(regions, vec!["Region 2", "Region 2", "Region 3", "Region 3"]);
    }

    #[test]
    fn test_map_field_ignores_national_section_and_bad_seeds() {
        let champ = HenrygdChampionship {
            games: vec![
                HenrygdGame { bracket_position_id: 201, teams: vec![team("A", 0), team("B", 17)], section_id: 1 },
                HenrygdGame { bracket_position_id: 202, teams: vec![team("C", 1)], section_id: NATIONAL_SECTION },
            ],
            ..Default::default()
        };
        assert!(map_field(&champ).is_empty());
    }

    const BRACKET_BODY: &str = r#"{
        "championships": [{
            "title": "2026 DI Men's Basketball Championship",
            "year": 2026,
            "games": [
                {"bracketPositionId": 202, "sectionId": 2, "gameState": "P",
                 "teams": [{"name": "Auburn", "seed": 1}, {"name": "Alabama St.", "seed": 16}]},
                {"bracketPositionId": 201, "sectionId": 1, "gameState": "P",
                 "teams": [{"name": "Duke", "seed": 1, "teamId": "duke"}, {"name": "Mount St. Mary's", "seed": 16}]}
            ],
            "rounds": [],
            "regions": [
                {"id": "1", "sectionId": 1, "title": "East", "regionCode": "TL"},
                {"id": "2", "sectionId": 2, "title": "South", "regionCode": "TR"}
            ]
        }]
    }"#;

    #[tokio::test]
    async fn test_fetch_field_parses_bracket_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/brackets/basketball-men/d1/2026")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BRACKET_BODY)
            .create_async()
            .await;

        let api = NcaaApi::new().with_base_url(server.url());
        let field = api.fetch_field(2026).await.unwrap();
        mock.assert_async().await;

        assert_eq!(field.len(), 4);
        assert_eq!(field[0], FieldEntry::new("Duke", 1, "East"));
        assert_eq!(field[2], FieldEntry::new("Auburn", 1, "South"));
    }

    #[tokio::test]
    async fn test_fetch_field_reads_only_games_and_regions() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/brackets/basketball-men/d1/2026")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"championships": [{
                    "games": [{"bracketPositionId": 216, "sectionId": 4,
                               "teams": [{"shortName": "Houston", "seed": 1}, {"name": "SIUE", "seed": 16}]}],
                    "regions": [{"sectionId": 4, "title": "Midwest"}]
                }]}"#,
            )
            .create_async()
            .await;

        let api = NcaaApi::new().with_base_url(format!("{}/", server.url()));
        let field = api.fetch_field(2026).await.unwrap();
        assert_eq!(
            field,
            vec![FieldEntry::new("Houston", 1, "Midwest"), FieldEntry::new("SIUE", 16, "Midwest")]
        );
    }

    #[tokio::test]
    async fn test_fetch_field_missing_year_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/brackets/basketball-men/d1/1999")
            .with_status(404)
            .create_async()
            .await;

        let api = NcaaApi::new().with_base_url(server.url());
        let err = api.fetch_field(1999).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_field_before_selection_sunday_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/brackets/basketball-men/d1/2027")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"championships": [{"year": 2027, "games": [{"bracketPositionId": 201, "sectionId": 1, "teams": []}], "regions": []}]}"#)
            .create_async()
            .await;

        let api = NcaaApi::new().with_base_url(server.url());
        let err = api.fetch_field(2027).await.unwrap_err();
        assert!(err.to_string().contains("2027"));
    }

    #[tokio::test]
    async fn test_fetch_field_server_error_carries_url() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/brackets/basketball-men/d1/2026")
            .with_status(503)
            .create_async()
            .await;

        let api = NcaaApi::new().with_base_url(format!("{}/", server.url()));
        let err = api.fetch_field(2026).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, ref url) if url.ends_with("/brackets/basketball-men/d1/2026")));
    }

    #[tokio::test]
    async fn test_fetch_field_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/brackets/basketball-men/d1/2026")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let api = NcaaApi::new().with_base_url(server.url());
        let err = api.fetch_field(2026).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)));
    }
}
