//! Session Module
//! The loaded table, the single chart slot and the status line, plus every
//! user operation on them. The GUI owns one `Session` and only translates
//! button presses into these calls.

use crate::charts::{
    ChartBuilder, ChartData, ChartKind, ExportError, HeatmapError, HeatmapRenderer,
    StaticChartRenderer, EXPORT_SIZE,
};
use crate::config::AppConfig;
use crate::data::{LoaderError, Record, RecordDraft, Table, TableError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No data loaded. Load a CSV file first.")]
    NotLoaded,
    #[error("No chart is displayed.")]
    NothingToExport,
    #[error("Error loading data: {0}")]
    Load(#[from] LoaderError),
    #[error("{0}")]
    Table(#[from] TableError),
    #[error("Error showing heat map: {0}")]
    Heatmap(#[from] HeatmapError),
    #[error("Error exporting chart: {0}")]
    Export(#[from] ExportError),
}

impl SessionError {
    /// True for the "column not found" family, reported distinctly from other failures.
    pub fn is_missing_column(&self) -> bool {
        matches!(self, SessionError::Table(TableError::ColumnNotFound(_)))
    }
}

/// Result of a person lookup that ran.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Record),
    NoResults,
    ColumnMissing(String),
}

/// Holds zero or one chart.
#[derive(Debug, Default)]
pub struct DisplaySlot {
    chart: Option<ChartData>,
}

impl DisplaySlot {
    pub fn show(&mut self, chart: ChartData) -> &ChartData {
        self.chart.insert(chart)
    }

    pub fn clear(&mut self) {
        self.chart = None;
    }

    pub fn current(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_none()
    }
}

pub struct Session {
    config: AppConfig,
    table: Option<Table>,
    display: DisplaySlot,
    status: String,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            table: None,
            display: DisplaySlot::default(),
            status: String::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn display(&self) -> &DisplaySlot {
        &self.display
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn loaded_table(&self) -> Result<&Table, SessionError> {
        self.table.as_ref().ok_or(SessionError::NotLoaded)
    }

    /// Replace the table with `path`. On failure the previous table stays.
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<String>, SessionError> {
        let table = Table::load_csv(path, self.config.csv.separator_byte()).map_err(|e| {
            warn!(path = %path.display(), error = %e, "load failed");
            e
        })?;
        let columns = table.columns();

        self.status = format!(
            "Data loaded successfully.\nAvailable columns: {}",
            columns.join(", ")
        );
        self.table = Some(table);
        Ok(columns)
    }

    /// Empty draft with one entry per column of the loaded table.
    pub fn record_draft(&self) -> Result<RecordDraft, SessionError> {
        Ok(RecordDraft::new(self.loaded_table()?.columns()))
    }

    /// Commit a draft as a new last row; returns the new row count.
    pub fn add_record(&mut self, draft: RecordDraft) -> Result<usize, SessionError> {
        let age_column = self.config.columns.age.clone();
        let table = self.table.as_mut().ok_or(SessionError::NotLoaded)?;

        if !table.has_column(&age_column) {
            warn!(column = %age_column, "age column absent; age value discarded");
        }
        let row = draft.into_row(&age_column)?;
        table.append_row(row)?;

        info!(rows = table.row_count(), "record added");
        Ok(table.row_count())
    }

    /// Look up the first row whose identifier equals the trimmed `query`.
    /// A blank query does nothing and yields `None`.
    pub fn search_person(&mut self, query: &str) -> Result<Option<LookupOutcome>, SessionError> {
        let code = query.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let id_column = self.config.columns.person_code.clone();
        let table = self.loaded_table()?;

        let outcome = match table.find_first(&id_column, code) {
            Ok(Some(record)) => LookupOutcome::Found(record),
            Ok(None) => {
                self.status = "No data found for the given person code.".to_string();
                LookupOutcome::NoResults
            }
            Err(TableError::ColumnNotFound(column)) => {
                self.status = format!(
                    "The column '{}' is not present in the loaded data.",
                    column
                );
                LookupOutcome::ColumnMissing(column)
            }
            Err(e) => return Err(e.into()),
        };

        info!(code, found = matches!(outcome, LookupOutcome::Found(_)), "person lookup");
        Ok(Some(outcome))
    }

    /// Build `kind` and put it in the display slot, replacing what was shown.
    /// On error the slot is left as it was.
    pub fn show_chart(&mut self, kind: ChartKind) -> Result<&ChartData, SessionError> {
        let chart = ChartBuilder::build(kind, self.loaded_table()?, &self.config)?;
        Ok(self.display.show(chart))
    }

    /// Write the reference-city heat map into the working directory and open it.
    pub fn open_heatmap(&self) -> Result<PathBuf, SessionError> {
        self.loaded_table()?;
        Ok(HeatmapRenderer::write_and_open(&self.config.heatmap)?)
    }

    /// Save the displayed chart as a PNG.
    pub fn export_chart(&self, path: &Path) -> Result<(), SessionError> {
        let chart = self
            .display
            .current()
            .ok_or(SessionError::NothingToExport)?;
        StaticChartRenderer::save_png(chart, path, EXPORT_SIZE)?;
        Ok(())
    }

    /// Empty the display slot and the status line.
    pub fn clear(&mut self) {
        self.display.clear();
        self.status.clear();
        info!("display cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "CÓDIGO PERSONA;CLASE DE SINIESTRO;GRAVEDAD;FECHA;EDAD;SEXO\n\
                       P1;CHOQUE;LEVE;2021-01-05;34;MASCULINO\n\
                       P2;ATROPELLO;GRAVE;2021-02-11;27;FEMENINO\n\
                       P3;CHOQUE;LEVE;2021-02-20;abc;MASCULINO\n";

    fn loaded(body: &str) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accidents.csv");
        fs::write(&path, body).unwrap();
        let mut session = Session::new(AppConfig::default());
        session.load_file(&path).unwrap();
        (dir, session)
    }

    #[test]
    fn load_sets_status_with_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ab.csv");
        fs::write(&path, "A;B\n1;2\n").unwrap();

        let mut session = Session::new(AppConfig::default());
        let columns = session.load_file(&path).unwrap();

        assert_eq!(columns, vec!["A".to_string(), "B".to_string()]);
        assert!(session.is_loaded());
        assert_eq!(
            session.status(),
            "Data loaded successfully.\nAvailable columns: A, B"
        );
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let (dir, mut session) = loaded(CSV);
        let err = session
            .load_file(&dir.path().join("missing.csv"))
            .unwrap_err();

        assert!(matches!(err, SessionError::Load(_)));
        assert_eq!(session.table().unwrap().row_count(), 3);
    }

    #[test]
    fn malformed_second_file_keeps_first_table() {
        let (dir, mut session) = loaded(CSV);
        session.show_chart(ChartKind::Severity).unwrap();
        let status = session.status().to_string();

        let bad = dir.path().join("bad.csv");
        fs::write(&bad, "A;B\nx;y\n1;2;3\n").unwrap();
        let err = session.load_file(&bad).unwrap_err();

        assert!(matches!(err, SessionError::Load(_)));
        let table = session.table().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns()[0], "CÓDIGO PERSONA");
        assert_eq!(session.status(), status);
        assert!(!session.display().is_empty());
    }

    #[test]
    fn every_chart_is_rejected_before_load() {
        let mut session = Session::new(AppConfig::default());
        for kind in ChartKind::ALL {
            assert!(matches!(
                session.show_chart(kind),
                Err(SessionError::NotLoaded)
            ));
        }
        assert!(matches!(session.open_heatmap(), Err(SessionError::NotLoaded)));
        assert!(matches!(session.record_draft(), Err(SessionError::NotLoaded)));
        assert!(matches!(
            session.search_person("P1"),
            Err(SessionError::NotLoaded)
        ));
        assert!(session.display().is_empty());
    }

    #[test]
    fn add_record_appends_one_row_with_numeric_age() {
        let (_dir, mut session) = loaded(CSV);
        let mut draft = session.record_draft().unwrap();
        draft.values[0] = "P4".to_string();
        draft.values[5] = "FEMENINO".to_string();
        draft.age = "19".to_string();

        let rows = session.add_record(draft).unwrap();
        assert_eq!(rows, 4);

        let table = session.table().unwrap();
        let ages = table.text_values("EDAD").unwrap();
        assert_eq!(ages[3].as_deref(), Some("19"));
        assert_eq!(ages[0].as_deref(), Some("34"));

        match session.search_person("P4").unwrap() {
            Some(LookupOutcome::Found(record)) => assert_eq!(record.get("SEXO"), Some("FEMENINO")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn add_record_with_bad_age_commits_nothing() {
        let (_dir, mut session) = loaded(CSV);
        let mut draft = session.record_draft().unwrap();
        draft.age = "twenty".to_string();

        let err = session.add_record(draft).unwrap_err();
        assert!(matches!(err, SessionError::Table(TableError::InvalidAge(_))));
        assert_eq!(session.table().unwrap().row_count(), 3);
    }

    #[test]
    fn lookup_found_absent_and_column_missing_are_distinct() {
        let (_dir, mut session) = loaded(CSV);

        match session.search_person("  P2 ").unwrap() {
            Some(LookupOutcome::Found(record)) => {
                assert_eq!(
                    record.listing(),
                    "CÓDIGO PERSONA: P2\nCLASE DE SINIESTRO: ATROPELLO\nGRAVEDAD: GRAVE\n\
                     FECHA: 2021-02-11\nEDAD: 27\nSEXO: FEMENINO\n"
                );
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        assert_eq!(
            session.search_person("p2").unwrap(),
            Some(LookupOutcome::NoResults)
        );
        assert_eq!(
            session.status(),
            "No data found for the given person code."
        );

        assert_eq!(session.search_person("   ").unwrap(), None);

        let (_dir2, mut other) = loaded("A;B\n1;2\n");
        assert_eq!(
            other.search_person("1").unwrap(),
            Some(LookupOutcome::ColumnMissing("CÓDIGO PERSONA".to_string()))
        );
        assert_eq!(
            other.status(),
            "The column 'CÓDIGO PERSONA' is not present in the loaded data."
        );
    }

    #[test]
    fn showing_a_chart_replaces_the_previous_one() {
        let (_dir, mut session) = loaded(CSV);

        session.show_chart(ChartKind::AccidentClass).unwrap();
        let shown = session.show_chart(ChartKind::Severity).unwrap();
        assert_eq!(shown.kind, ChartKind::Severity);
        assert_eq!(
            session.display().current().map(|c| c.kind),
            Some(ChartKind::Severity)
        );
    }

    #[test]
    fn missing_chart_column_keeps_display_and_is_flagged() {
        let (_dir, mut session) = loaded("SEXO\nF\n");
        session.show_chart(ChartKind::SexDistribution).unwrap();

        let err = session.show_chart(ChartKind::AgeDistribution).unwrap_err();
        assert!(err.is_missing_column());
        assert!(!SessionError::NotLoaded.is_missing_column());
        assert_eq!(err.to_string(), "Column 'EDAD' not found.");
        assert_eq!(
            session.display().current().map(|c| c.kind),
            Some(ChartKind::SexDistribution)
        );
    }

    #[test]
    fn clear_empties_display_and_status_after_any_chart() {
        for kind in ChartKind::ALL {
            let (_dir, mut session) = loaded(CSV);
            session.show_chart(kind).unwrap();
            assert!(!session.display().is_empty());

            session.clear();
            assert!(session.display().is_empty());
            assert_eq!(session.status(), "");
            assert!(session.is_loaded());
        }
    }

    #[test]
    fn export_without_chart_is_rejected() {
        let (dir, session) = loaded(CSV);
        assert!(matches!(
            session.export_chart(&dir.path().join("chart.png")),
            Err(SessionError::NothingToExport)
        ));
    }
}
