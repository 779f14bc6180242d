use std::io::Read;
use std::path::PathBuf;

const COMMENT_MARKER: char = '#';
const STDIN_MARKER: &str = "-";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("can't read {0}: {1}")]
    Unreadable(Source, std::io::Error),
    #[error("{0} has no records left after dropping blank and '#' lines")]
    Empty(Source),
}

/// Where the record list comes from: a file, or stdin via the '-' marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    pub fn parse(arg: &str) -> Self {
        if arg == STDIN_MARKER {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => write!(f, "stdin"),
            Self::Path(p) => write!(f, "{:?}", p),
        }
    }
}

/// Read the whole source and keep the record lines, in order.
///
/// A line that is blank, whitespace-only, or whose first non-whitespace
/// character is '#' is dropped and does not count toward record indices.
/// Stdin is consumed exactly once; the records are held in memory and
/// the source is never read again.
pub fn read_records(source: &Source) -> Result<Vec<String>, Error> {
    let text = match source {
        Source::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Error::Unreadable(source.clone(), e))?;
            buf
        }
        Source::Path(path) => {
            std::fs::read_to_string(path).map_err(|e| Error::Unreadable(source.clone(), e))?
        }
    };

    let records = filter_records(&text);
    if records.is_empty() {
        return Err(Error::Empty(source.clone()));
    }
    Ok(records)
}

fn filter_records(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with(COMMENT_MARKER)
        })
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_drops_blanks_and_comments() {
        let text = "one\n\n   \n# a comment\n  # indented comment\ntwo three\n";
        assert_eq!(filter_records(text), ["one", "two three"]);
    }

    #[test]
    fn test_filter_keeps_interior_hashes() {
        // '#' only comments out a line when it's the first non-whitespace char
        let text = "keep # this\n";
        assert_eq!(filter_records(text), ["keep # this"]);
    }

    #[test]
    fn test_filter_preserves_leading_whitespace() {
        assert_eq!(filter_records("  indented\n"), ["  indented"]);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let source = Source::parse("definitely/not/a/file.txt");
        assert!(matches!(
            read_records(&source),
            Err(Error::Unreadable(_, _))
        ));
    }

    #[test]
    fn test_empty_after_filtering() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "# only comments\n\n   \n")?;
        let source = Source::Path(path);
        assert!(matches!(read_records(&source), Err(Error::Empty(_))));
        Ok(())
    }

    #[test]
    fn test_stdin_marker() {
        assert_eq!(Source::parse("-"), Source::Stdin);
        assert_eq!(Source::parse("./-"), Source::Path("./-".into()));
    }
}
