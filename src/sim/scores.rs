/// Leaderboard: ranked name/score table with crash-safe persistence.
///
/// ## File format
///   A toml array-of-tables at `~/.pumpkin_snake/scores.toml`:
///
///   ```toml
///   [[entries]]
///   name = "ABCD"
///   score = 42
///   ```
///
/// ## Durability
///   The cabinet is routinely hard-power-cycled, so every save writes the
///   whole document to `scores.toml.tmp` and renames it over the target.
///   The on-disk file is always either the previous table or the new one,
///   never a torn write.
///
/// ## Fail open
///   Load never aborts a session: missing file, I/O error, or a malformed
///   document all yield an empty table (logged). Loaded records are
///   sanitized (name forced to 4 charset characters, score clamped to
///   non-negative), then re-sorted and truncated — on-disk ordering is not
///   trusted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::name_entry::NAME_LEN;

pub const CAPACITY: usize = 10;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// On-disk schema. Scores come in as i64 so a hand-edited negative value
/// coerces instead of poisoning the whole document.
#[derive(Deserialize, Default)]
struct RawTable {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    score: i64,
}

#[derive(Serialize)]
struct TableDoc<'a> {
    entries: &'a [ScoreEntry],
}

pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    path: PathBuf,
}

impl Leaderboard {
    /// Load the table from `path`, failing open to empty.
    pub fn load(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<RawTable>(&text) {
                Ok(raw) => raw
                    .entries
                    .into_iter()
                    .map(|e| ScoreEntry {
                        name: clean_name(&e.name),
                        score: e.score.clamp(0, u32::MAX as i64) as u32,
                    })
                    .collect(),
                Err(e) => {
                    log::warn!("scores file {} malformed, starting empty: {e}", path.display());
                    vec![]
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => vec![],
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                vec![]
            }
        };
        let mut board = Leaderboard { entries, path };
        board.normalize();
        board
    }

    /// Default on-disk location: `$HOME/.pumpkin_snake/scores.toml`.
    pub fn default_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".pumpkin_snake").join("scores.toml"),
            Err(_) => PathBuf::from("scores.toml"),
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Does this score earn a slot? Zero never qualifies; a non-full table
    /// always accepts; otherwise the score must beat the current minimum.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < CAPACITY {
            return true;
        }
        match self.entries.last() {
            Some(min) => score > min.score,
            None => true,
        }
    }

    /// Would this score take (or tie) the #1 slot?
    pub fn is_top(&self, score: u32) -> bool {
        match self.entries.first() {
            Some(top) => score >= top.score,
            None => score > 0,
        }
    }

    /// Insert an entry, re-rank, persist. The in-memory table is updated
    /// even when the write fails; the session keeps playing.
    pub fn commit(&mut self, name: &str, score: u32) -> Result<(), String> {
        self.entries.push(ScoreEntry {
            name: clean_name(name),
            score,
        });
        self.normalize();
        self.save()
    }

    /// Descending by score; stable, so equal scores keep insertion order.
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(CAPACITY);
    }

    /// Write-to-temp then atomic rename.
    fn save(&self) -> Result<(), String> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| format!("create {}: {e}", dir.display()))?;
            }
        }
        let doc = toml::to_string_pretty(&TableDoc {
            entries: &self.entries,
        })
        .map_err(|e| format!("serialize scores: {e}"))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        std::fs::write(&tmp, doc).map_err(|e| format!("write {}: {e}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| format!("replace {}: {e}", self.path.display()))
    }
}

/// Force a name onto the 4-char charset: uppercase, anything outside
/// [A-Z 0-9 space] becomes a space, clipped and padded to length 4.
fn clean_name(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .take(NAME_LEN)
        .map(|c| {
            let c = c.to_ascii_uppercase();
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();
    while out.chars().count() < NAME_LEN {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-test scratch file under the system temp dir.
    fn scratch(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pumpkin_snake_{}_{}_scores.toml",
            tag,
            std::process::id()
        ))
    }

    fn cleanup(path: &PathBuf) {
        let _ = std::fs::remove_file(path);
    }

    fn board_with(path: PathBuf, scores: &[(&str, u32)]) -> Leaderboard {
        let mut b = Leaderboard::load(path);
        for &(name, score) in scores {
            b.commit(name, score).expect("commit");
        }
        b
    }

    #[test]
    fn zero_never_qualifies() {
        let path = scratch("zero");
        let b = Leaderboard::load(path.clone());
        assert!(!b.qualifies(0));
        assert!(b.qualifies(1));
        cleanup(&path);
    }

    #[test]
    fn non_full_table_accepts_any_positive_score() {
        let path = scratch("nonfull");
        let b = board_with(path.clone(), &[("AAAA", 50), ("BBBB", 40)]);
        assert!(b.qualifies(1));
        assert!(b.qualifies(100));
        cleanup(&path);
    }

    #[test]
    fn full_table_requires_beating_the_minimum() {
        let path = scratch("full");
        let scores: Vec<(&str, u32)> = vec![
            ("P000", 100),
            ("P001", 90),
            ("P002", 80),
            ("P003", 70),
            ("P004", 60),
            ("P005", 50),
            ("P006", 40),
            ("P007", 30),
            ("P008", 20),
            ("P009", 5),
        ];
        let mut b = board_with(path.clone(), &scores);
        assert_eq!(b.entries().len(), CAPACITY);
        // Matching the minimum is not enough.
        assert!(!b.qualifies(5));
        assert!(b.qualifies(6));

        b.commit("NEWP", 6).expect("commit");
        assert_eq!(b.entries().len(), CAPACITY);
        assert_eq!(b.entries().last().map(|e| e.score), Some(6));
        assert!(!b.entries().iter().any(|e| e.score == 5));
        cleanup(&path);
    }

    #[test]
    fn is_top_on_empty_and_populated_tables() {
        let path = scratch("top");
        let mut b = Leaderboard::load(path.clone());
        assert!(!b.is_top(0));
        assert!(b.is_top(1));
        b.commit("ONE ", 10).expect("commit");
        assert!(!b.is_top(9));
        assert!(b.is_top(10)); // a tie takes the crown
        assert!(b.is_top(11));
        cleanup(&path);
    }

    #[test]
    fn table_stays_sorted_with_stable_ties() {
        let path = scratch("sort");
        let b = board_with(
            path.clone(),
            &[("LOW ", 10), ("TIE1", 30), ("HIGH", 50), ("TIE2", 30)],
        );
        let names: Vec<&str> = b.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["HIGH", "TIE1", "TIE2", "LOW "]);
        let scores: Vec<u32> = b.entries().iter().map(|e| e.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
        cleanup(&path);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = scratch("roundtrip");
        let b = board_with(
            path.clone(),
            &[("ABCD", 12), ("EF12", 99), ("GH34", 12), ("  Z9", 1)],
        );
        let reloaded = Leaderboard::load(path.clone());
        assert_eq!(reloaded.entries(), b.entries());
        cleanup(&path);
    }

    #[test]
    fn malformed_file_fails_open_and_recovers() {
        let path = scratch("malformed");
        std::fs::write(&path, "entries = \"this is not a table\"").expect("write");
        let mut b = Leaderboard::load(path.clone());
        assert!(b.entries().is_empty());
        // Still usable: a commit rewrites a valid document.
        b.commit("OKAY", 3).expect("commit");
        let reloaded = Leaderboard::load(path.clone());
        assert_eq!(reloaded.entries().len(), 1);
        cleanup(&path);
    }

    #[test]
    fn loaded_records_are_sanitized() {
        let path = scratch("sanitize");
        std::fs::write(
            &path,
            "[[entries]]\nname = \"toolongname\"\nscore = -7\n\n\
             [[entries]]\nname = \"ok\"\nscore = 21\n",
        )
        .expect("write");
        let b = Leaderboard::load(path.clone());
        assert_eq!(b.entries().len(), 2);
        assert_eq!(b.entries()[0].name, "OK  ");
        assert_eq!(b.entries()[0].score, 21);
        assert_eq!(b.entries()[1].name, "TOOL");
        assert_eq!(b.entries()[1].score, 0);
        cleanup(&path);
    }

    #[test]
    fn missing_file_loads_empty_without_error() {
        let path = scratch("missing");
        cleanup(&path);
        let b = Leaderboard::load(path);
        assert!(b.entries().is_empty());
    }
}
