//! New-record draft collected from the user before it is committed to the table.

use super::loader::TableError;

/// One text entry per existing column plus the age entered separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    pub columns: Vec<String>,
    pub values: Vec<String>,
    pub age: String,
}

impl RecordDraft {
    pub fn new(columns: Vec<String>) -> Self {
        let values = vec![String::new(); columns.len()];
        Self {
            columns,
            values,
            age: String::new(),
        }
    }

    /// Age as an integer; blank means no age was given.
    pub fn parsed_age(&self) -> Result<Option<i64>, TableError> {
        let age = self.age.trim();
        if age.is_empty() {
            return Ok(None);
        }
        age.parse::<i64>()
            .map(Some)
            .map_err(|_| TableError::InvalidAge(age.to_string()))
    }

    /// Row values aligned with `columns`. Blank entries become missing and the
    /// parsed age replaces whatever was typed for `age_column`.
    pub fn into_row(self, age_column: &str) -> Result<Vec<Option<String>>, TableError> {
        let age = self.parsed_age()?;

        let row = self
            .columns
            .iter()
            .zip(self.values)
            .map(|(column, value)| {
                if column == age_column {
                    age.map(|a| a.to_string())
                } else if value.is_empty() {
                    None
                } else {
                    Some(value)
                }
            })
            .collect();

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecordDraft {
        RecordDraft::new(vec![
            "SEXO".to_string(),
            "EDAD".to_string(),
            "GRAVEDAD".to_string(),
        ])
    }

    #[test]
    fn age_overrides_age_column_and_blanks_are_missing() {
        let mut d = draft();
        d.values[0] = "MASCULINO".to_string();
        d.values[1] = "typed but ignored".to_string();
        d.age = " 42 ".to_string();

        let row = d.into_row("EDAD").unwrap();
        assert_eq!(
            row,
            vec![Some("MASCULINO".to_string()), Some("42".to_string()), None]
        );
    }

    #[test]
    fn blank_age_stores_missing() {
        let row = draft().into_row("EDAD").unwrap();
        assert_eq!(row, vec![None, None, None]);
    }

    #[test]
    fn non_integer_age_is_rejected() {
        let mut d = draft();
        d.age = "forty".to_string();
        assert!(matches!(d.into_row("EDAD"), Err(TableError::InvalidAge(a)) if a == "forty"));
    }

    #[test]
    fn age_is_dropped_when_table_has_no_age_column() {
        let mut d = RecordDraft::new(vec!["A".to_string()]);
        d.values[0] = "x".to_string();
        d.age = "30".to_string();
        assert_eq!(d.into_row("EDAD").unwrap(), vec![Some("x".to_string())]);
    }
}
