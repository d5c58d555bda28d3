//! CSV outputs of a harvest run
//!
//! The projects file is rewritten on every run. The organizations file
//! accumulates across runs: it is opened for append, its existing rows seed the
//! [`OrganizationMemo`], and its header is written only when it is empty.

use crate::Result;
use crate::facts::{ORGANIZATION_COLUMNS, OrganizationMemo, OrganizationRecord, PROJECT_COLUMNS, ProjectRecord};
use camino::{Utf8Path, Utf8PathBuf};
use csv::StringRecord;
use ohno::IntoAppError;
use std::fs::{self, File, OpenOptions};

const LOG_TARGET: &str = "       csv";
const LOGIN_COLUMN: &str = "organization_user_name";

/// The two CSV writers of a run
#[derive(Debug)]
pub struct CsvSink {
    projects: csv::Writer<File>,
    organizations: csv::Writer<File>,
    projects_path: Utf8PathBuf,
    orgs_path: Utf8PathBuf,
}

impl CsvSink {
    /// Open both outputs, returning the sink and the organizations already on file.
    pub fn open(projects_path: &Utf8Path, orgs_path: &Utf8Path) -> Result<(Self, OrganizationMemo)> {
        ensure_parent(projects_path)?;
        ensure_parent(orgs_path)?;

        let memo = read_organizations(orgs_path)?;
        log::debug!(target: LOG_TARGET, "Loaded {} known organizations from '{orgs_path}'", memo.len());

        let projects_file = File::create(projects_path).into_app_err_with(|| format!("creating '{projects_path}'"))?;
        let mut projects = csv::WriterBuilder::new().has_headers(false).from_writer(projects_file);
        projects
            .write_record(PROJECT_COLUMNS)
            .into_app_err_with(|| format!("writing header to '{projects_path}'"))?;

        let orgs_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(orgs_path)
            .into_app_err_with(|| format!("opening '{orgs_path}'"))?;
        let orgs_empty = orgs_file
            .metadata()
            .into_app_err_with(|| format!("inspecting '{orgs_path}'"))?
            .len()
            == 0;

        let mut organizations = csv::WriterBuilder::new().has_headers(false).from_writer(orgs_file);
        if orgs_empty {
            organizations
                .write_record(ORGANIZATION_COLUMNS)
                .into_app_err_with(|| format!("writing header to '{orgs_path}'"))?;
        }

        Ok((
            Self {
                projects,
                organizations,
                projects_path: projects_path.to_owned(),
                orgs_path: orgs_path.to_owned(),
            },
            memo,
        ))
    }

    pub fn write_project(&mut self, record: &ProjectRecord) -> Result<()> {
        self.projects
            .serialize(record)
            .into_app_err_with(|| format!("writing project row to '{}'", self.projects_path))
    }

    pub fn write_organization(&mut self, record: &OrganizationRecord) -> Result<()> {
        self.organizations
            .serialize(record)
            .into_app_err_with(|| format!("writing organization row to '{}'", self.orgs_path))
    }

    /// Flush both files.
    pub fn finish(mut self) -> Result<()> {
        self.projects
            .flush()
            .into_app_err_with(|| format!("flushing '{}'", self.projects_path))?;
        self.organizations
            .flush()
            .into_app_err_with(|| format!("flushing '{}'", self.orgs_path))
    }
}

fn ensure_parent(path: &Utf8Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{parent}'"))?;
    }
    Ok(())
}

/// Organizations recorded by earlier runs.
///
/// Every row with a login seeds the memo. Rows whose other cells do not parse
/// keep only the cells that do.
fn read_organizations(path: &Utf8Path) -> Result<OrganizationMemo> {
    if !path.exists() {
        return Ok(OrganizationMemo::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .into_app_err_with(|| format!("reading '{path}'"))?;

    let headers = reader
        .headers()
        .into_app_err_with(|| format!("reading header of '{path}'"))?
        .clone();
    let Some(login_col) = headers.iter().position(|h| h == LOGIN_COLUMN) else {
        log::warn!(target: LOG_TARGET, "'{path}' has no '{LOGIN_COLUMN}' column, no organizations loaded");
        return Ok(OrganizationMemo::new());
    };

    let mut memo = OrganizationMemo::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping unreadable row in '{path}': {e}");
                continue;
            }
        };

        let login = row.get(login_col).map_or("", str::trim);
        if login.is_empty() {
            continue;
        }

        let record = row.deserialize::<OrganizationRecord>(Some(&headers)).unwrap_or_else(|e| {
            log::warn!(target: LOG_TARGET, "Organization '{login}' in '{path}' has unreadable cells: {e}");
            partial_record(&headers, &row, login)
        });
        let _ = memo.insert(record);
    }

    Ok(memo)
}

/// Field-by-field fallback for a row that does not deserialize as a whole.
fn partial_record(headers: &StringRecord, row: &StringRecord, login: &str) -> OrganizationRecord {
    let mut record = OrganizationRecord {
        organization_user_name: login.to_string(),
        ..OrganizationRecord::default()
    };

    for (column, cell) in headers.iter().zip(row.iter()) {
        let text = Some(cell.to_string()).filter(|c| !c.is_empty());
        match column {
            "organization_name" => record.organization_name = text,
            "organization_github_url" => record.organization_github_url = text,
            "organization_website" => record.organization_website = text,
            "organization_location" => record.organization_location = text,
            "organization_country" => record.organization_country = text,
            "organization_form" => record.organization_form = text,
            "organization_avatar" => record.organization_avatar = text,
            "organization_public_repos" => record.organization_public_repos = cell.trim().parse().ok(),
            "organization_created" => record.organization_created = text,
            "organization_last_update" => record.organization_last_update = text,
            "organization_rubric" => record.organization_rubric = text,
            _ => {}
        }
    }

    record
}
