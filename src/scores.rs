use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

const DELIMITER: char = ':';

#[derive(Debug)]
pub enum ScoreError {
    Io(io::Error),
    Malformed { line: usize, content: String },
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreError::Io(e) => write!(f, "score log IO error: {}", e),
            ScoreError::Malformed { line, content } => {
                write!(f, "malformed score record on line {}: {:?}", line, content)
            }
        }
    }
}

impl std::error::Error for ScoreError {}

impl From<io::Error> for ScoreError {
    fn from(e: io::Error) -> Self {
        ScoreError::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

#[cfg(test)]
impl ScoreRecord {
    pub fn new(name: &str, score: u32) -> Self {
        ScoreRecord { name: name.to_string(), score }
    }
}

/// Append-only `name:score` log, one record per line, oldest first.
///
/// Names containing `:` are written as-is and will not parse back correctly.
pub struct ScoreLog {
    file: File,
}

impl ScoreLog {
    /// Opens the log for reading and appending, creating it if missing.
    pub fn open(path: &Path) -> Result<Self, ScoreError> {
        let file = OpenOptions::new().read(true).write(true).create(true).open(path)?;
        Ok(ScoreLog { file })
    }

    pub fn append(&mut self, name: &str, score: u32) -> Result<(), ScoreError> {
        self.file.seek(SeekFrom::End(0))?;
        writeln!(self.file, "{}{}{}", name, DELIMITER, score)?;
        self.file.flush()?;
        Ok(())
    }

    /// Every record in the order it was appended. A single malformed line
    /// fails the whole read.
    pub fn read_all(&mut self) -> Result<Vec<ScoreRecord>, ScoreError> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        self.file.read_to_string(&mut contents)?;

        parse_records(&contents)
    }
}

pub fn parse_records(contents: &str) -> Result<Vec<ScoreRecord>, ScoreError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            let malformed = || ScoreError::Malformed { line: i + 1, content: line.to_string() };
            let (name, score) = line.split_once(DELIMITER).ok_or_else(malformed)?;
            let score = score.trim().parse().map_err(|_| malformed())?;
            Ok(ScoreRecord { name: name.to_string(), score })
        })
        .collect()
}

/// Sorts by score, highest first. Equal scores keep their log order.
pub fn rank(mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records
}

pub fn top(records: Vec<ScoreRecord>, n: usize) -> Vec<ScoreRecord> {
    let mut ranked = rank(records);
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_then_read_keeps_insertion_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscore");
        let mut log = ScoreLog::open(&path).unwrap();

        log.append("ann", 4).unwrap();
        log.append("bob", 17).unwrap();
        log.append("cy", 9).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(
            records,
            vec![ScoreRecord::new("ann", 4), ScoreRecord::new("bob", 17), ScoreRecord::new("cy", 9)]
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ann:4\nbob:17\ncy:9\n");
    }

    #[test]
    fn reopening_appends_without_truncating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscore");
        std::fs::write(&path, "old:12\n").unwrap();

        let mut log = ScoreLog::open(&path).unwrap();
        log.append("new", 3).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records, vec![ScoreRecord::new("old", 12), ScoreRecord::new("new", 3)]);
    }

    #[test]
    fn read_after_read_still_appends_at_the_end() {
        let dir = tempdir().unwrap();
        let mut log = ScoreLog::open(&dir.path().join("highscore")).unwrap();

        log.append("a", 1).unwrap();
        log.read_all().unwrap();
        log.append("b", 2).unwrap();

        assert_eq!(log.read_all().unwrap().last(), Some(&ScoreRecord::new("b", 2)));
    }

    #[test]
    fn open_fails_in_a_missing_directory() {
        let dir = tempdir().unwrap();
        let res = ScoreLog::open(&dir.path().join("nope").join("highscore"));
        assert!(matches!(res, Err(ScoreError::Io(_))));
    }

    #[test]
    fn parses_legacy_spaced_records_and_skips_blank_lines() {
        let records = parse_records("alice: 10\n\nbob:3\n").unwrap();
        assert_eq!(records, vec![ScoreRecord::new("alice", 10), ScoreRecord::new("bob", 3)]);
    }

    #[test]
    fn splits_at_the_first_delimiter() {
        let err = parse_records("a:b:5\n").unwrap_err();
        assert!(matches!(err, ScoreError::Malformed { line: 1, .. }));
    }

    #[test]
    fn malformed_lines_fail_the_read() {
        assert!(matches!(
            parse_records("ok:1\nbroken\n"),
            Err(ScoreError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            parse_records("ok:1\nbad:ten\n"),
            Err(ScoreError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn ranking_is_descending() {
        let records = vec![ScoreRecord::new("A", 10), ScoreRecord::new("B", 30), ScoreRecord::new("C", 20)];
        assert_eq!(
            rank(records),
            vec![ScoreRecord::new("B", 30), ScoreRecord::new("C", 20), ScoreRecord::new("A", 10)]
        );
    }

    #[test]
    fn ties_keep_log_order() {
        let records = vec![
            ScoreRecord::new("first", 5),
            ScoreRecord::new("big", 9),
            ScoreRecord::new("second", 5),
            ScoreRecord::new("third", 5),
        ];
        let names: Vec<String> = rank(records).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn top_truncates() {
        let records = (1..=8).map(|i| ScoreRecord::new(&format!("p{}", i), i)).collect();
        let best: Vec<u32> = top(records, 5).into_iter().map(|r| r.score).collect();
        assert_eq!(best, vec![8, 7, 6, 5, 4]);
    }
}
