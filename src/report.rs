use mmsim_engine::{Bracket, FieldReport};
use std::fmt;

/// Plain-text bracket: one section per round, then the champion and, for a
/// partly synthetic field, what was filled in.
pub fn render(bracket: &Bracket, report: &FieldReport) -> String {
    TextBracket { bracket, report }.to_string()
}

struct TextBracket<'a> {
    bracket: &'a Bracket,
    report: &'a FieldReport,
}

impl fmt::Display for TextBracket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for round in &self.bracket.rounds {
            writeln!(f, "\n=== {} ===", round.kind)?;
            for game in &round.games {
                write!(
                    f,
                    "Game {} (ID: {}): {} vs {}",
                    game.game_id, game.unique_game_id, game.team1, game.team2
                )?;
                if let Some(region) = &game.region {
                    write!(f, " ({region})")?;
                }
                writeln!(f)?;
                writeln!(f, "Winner: {}", game.winner)?;
            }
        }

        match self.bracket.champion() {
            Some(t) => writeln!(f, "\nPredicted Champion: {}. {}", t.seed, t.name)?,
            None => writeln!(f, "\nPredicted Champion: TBD")?,
        }

        let report = self.report;
        if !report.is_partial() {
            return Ok(());
        }
        writeln!(f, "\nNote: this bracket was built from an incomplete field.")?;
        if !report.placeholders.is_empty() {
            let slots: Vec<String> = report.placeholders.iter().map(ToString::to_string).collect();
            writeln!(f, "  TBD slots ({}): {}", slots.len(), slots.join(", "))?;
        }
        if !report.data_gaps.is_empty() {
            let gaps: Vec<String> = report
                .data_gaps
                .iter()
                .map(|g| match g.substituted {
                    Some(r) => format!("{} ({} #{}, rated {r:.1})", g.team, g.region, g.seed),
                    None => format!("{} ({} #{})", g.team, g.region, g.seed),
                })
                .collect();
            writeln!(f, "  Unrated teams ({}): {}", gaps.len(), gaps.join(", "))?;
        }
        Ok(())
    }
}
