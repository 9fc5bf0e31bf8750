//! A small team ledger kept in two tables: counters keyed by statistic
//! name, and rosters keyed by playing position.
//!
//! Run with `cargo run --example team_stats`.

use hashy_step_table::{CapacityLadder, HashyStepTable, TableError};
use std::error::Error;

const POSITIONS: [&str; 4] = ["Goalkeeper", "Defender", "Midfielder", "Striker"];
const STATS: [&str; 5] = ["Wins", "Draws", "Losses", "Goals For", "Goals Against"];

#[derive(Copy, Clone, Debug)]
enum Outcome {
    Win,
    Draw,
    Loss,
}

struct Team {
    name: String,
    stats: HashyStepTable<&'static str, i64>,
    players: HashyStepTable<&'static str, Vec<String>>,
}

impl Team {
    fn new(name: &str) -> Result<Self, TableError> {
        // Both tables start above their fixed population so they never rehash.
        let mut stats =
            HashyStepTable::with_ladder(CapacityLadder::default().starting_above(STATS.len()));
        for s in STATS {
            stats.set(s, 0)?;
        }
        let mut players =
            HashyStepTable::with_ladder(CapacityLadder::default().starting_above(POSITIONS.len()));
        for p in POSITIONS {
            players.set(p, Vec::new())?;
        }
        Ok(Self {
            name: name.to_string(),
            stats,
            players,
        })
    }

    fn add_player(&mut self, position: &'static str, player: &str) -> Result<(), TableError> {
        self.players.get_mut(position)?.push(player.to_string());
        Ok(())
    }

    fn remove_player(&mut self, position: &'static str, player: &str) -> Result<(), TableError> {
        let roster = self.players.get_mut(position)?;
        let at = roster.iter().position(|p| p == player).ok_or(TableError::NotFound)?;
        roster.remove(at);
        Ok(())
    }

    fn bump(&mut self, stat: &'static str, by: i64) -> Result<(), TableError> {
        *self.stats.get_mut(stat)? += by;
        Ok(())
    }

    fn record(&mut self, scored: i64, conceded: i64) -> Result<Outcome, TableError> {
        let outcome = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        };
        let stat = match outcome {
            Outcome::Win => "Wins",
            Outcome::Draw => "Draws",
            Outcome::Loss => "Losses",
        };
        self.bump(stat, 1)?;
        self.bump("Goals For", scored)?;
        self.bump("Goals Against", conceded)?;
        Ok(outcome)
    }

    fn points(&mut self) -> Result<i64, TableError> {
        Ok(3 * *self.stats.get("Wins")? + *self.stats.get("Draws")?)
    }

    fn squad_size(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut team = Team::new("Rustaceans FC")?;
    team.add_player("Goalkeeper", "Ferris")?;
    team.add_player("Defender", "Borrow")?;
    team.add_player("Defender", "Lifetime")?;
    team.add_player("Midfielder", "Trait")?;
    team.add_player("Striker", "Unsafe")?;
    team.remove_player("Striker", "Unsafe")?;
    team.add_player("Striker", "Async")?;

    for (scored, conceded) in [(2, 1), (0, 0), (1, 3), (4, 2)] {
        let outcome = team.record(scored, conceded)?;
        println!("{} {scored}-{conceded}: {outcome:?}", team.name);
    }

    println!("points: {}", team.points()?);
    println!("squad size: {}", team.squad_size());
    print!("{}", team.stats);
    for (position, roster) in &team.players {
        println!("{position}: {}", roster.join(", "));
    }

    // Unknown statistics are reported, not silently created.
    assert!(!team.stats.contains("Own Goals"));
    assert_eq!(team.bump("Own Goals", 1), Err(TableError::NotFound));

    // Retire a statistic and show that the remaining ones are intact.
    team.stats.delete("Draws")?;
    println!("tracked statistics: {:?}", team.stats.keys().collect::<Vec<_>>());
    Ok(())
}
