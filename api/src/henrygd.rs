/// Wire types for the henrygd NCAA bracket API.
/// Endpoint: https://ncaa-api.henrygd.me/brackets/basketball-men/d1/{year}
use serde::Deserialize;

#[derive(Deserialize, Default, Debug)]
pub struct HenrygdResponse {
    #[serde(default)]
    pub championships: Vec<HenrygdChampionship>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HenrygdChampionship {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub games: Vec<HenrygdGame>,
    #[serde(default)]
    pub regions: Vec<HenrygdRegion>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HenrygdGame {
    /// Round number in the hundreds digit: 1xx First Four, 2xx Round of 64.
    pub bracket_position_id: u32,
    /// Empty vec pre-Selection Sunday; populated once bracket is announced.
    #[serde(default)]
    pub teams: Vec<HenrygdTeam>,
    pub section_id: u32,
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HenrygdTeam {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub seed: Option<u8>,
    /// Play-in placeholder text such as "First Four winner".
    pub description: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HenrygdRegion {
    pub section_id: u32,
    /// Empty string pre-Selection Sunday; populated when regions are assigned.
    #[serde(default)]
    pub title: String,
}
