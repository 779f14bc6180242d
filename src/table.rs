const FIELD_SEP: char = '\t';

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid header field {0:?} (field names may only contain letters, digits and '_')")]
    BadFieldName(String),
    #[error("row {0} has {1} fields, but the header has {2}")]
    RowWidth(usize, usize, usize),
}

/// A validated tab-separated table: a header of field names plus the
/// data rows, all split on tabs. Field values are opaque bytes; no
/// unescaping or re-interpretation happens here.
#[derive(Debug)]
pub struct Table {
    pub fields: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse retained input lines: the first is the header, the rest
    /// are data rows. Stops at the first invalid field name or the
    /// first row whose width differs from the header's; row numbers in
    /// errors are 1-based and don't count the header.
    pub fn parse(records: &[String]) -> Result<Self, Error> {
        let header = records.first().map(String::as_str).unwrap_or_default();
        let fields: Vec<String> = header.split(FIELD_SEP).map(str::to_owned).collect();

        // header is validated in full before we look at any row:
        for name in &fields {
            if !is_valid_field_name(name) {
                return Err(Error::BadFieldName(name.clone()));
            }
        }

        let mut rows = Vec::with_capacity(records.len().saturating_sub(1));
        for (i, record) in records[1..].iter().enumerate() {
            let row: Vec<String> = record.split(FIELD_SEP).map(str::to_owned).collect();
            if row.len() != fields.len() {
                return Err(Error::RowWidth(i + 1, row.len(), fields.len()));
            }
            rows.push(row);
        }

        Ok(Self { fields, rows })
    }
}

/// Field names become environment variable names, so they have to be
/// identifier-safe: one or more of [A-Za-z0-9_].
fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recs(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic() -> Result<(), Error> {
        let table = Table::parse(&recs(&["sample\tfile", "s1\ta.fq", "s2\tb.fq"]))?;
        assert_eq!(table.fields, ["sample", "file"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], ["s2", "b.fq"]);
        Ok(())
    }

    #[test]
    fn test_field_name_rules() {
        assert!(is_valid_field_name("col_1"));
        assert!(is_valid_field_name("COL1"));
        assert!(is_valid_field_name("_col1"));
        assert!(!is_valid_field_name("col 1"));
        assert!(!is_valid_field_name("col-1"));
        assert!(!is_valid_field_name("col.1"));
        assert!(!is_valid_field_name(""));
    }

    #[test]
    fn test_bad_header_aborts() {
        let err = Table::parse(&recs(&["a\tcol 1", "1\t2"])).unwrap_err();
        assert!(matches!(err, Error::BadFieldName(name) if name == "col 1"));
    }

    #[test]
    fn test_row_width_cites_data_row_number() {
        let err = Table::parse(&recs(&["a\tb\tc", "1\t2"])).unwrap_err();
        assert!(matches!(err, Error::RowWidth(1, 2, 3)));
    }

    #[test]
    fn test_first_error_only() {
        // both rows are bad; row 1 is the one reported
        let err = Table::parse(&recs(&["a\tb", "1", "1\t2\t3"])).unwrap_err();
        assert!(matches!(err, Error::RowWidth(1, 1, 2)));
    }

    #[test]
    fn test_empty_fields_are_fields() -> Result<(), Error> {
        let table = Table::parse(&recs(&["a\tb", "\t"]))?;
        assert_eq!(table.rows[0], ["", ""]);
        Ok(())
    }
}
