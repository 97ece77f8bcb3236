//! Blocking orchestration behind the check endpoints. Handlers call these
//! through `spawn_blocking`.

use crate::engine::fingerprint::fingerprint;
use crate::engine::scanner::{normalize_line_endings, scan};
use crate::engine::summary::{debug_summary, empty_message};
use crate::engine::score_lines;
use crate::error::CheckError;
use crate::format::pdf::{render, PdfSettings};
use crate::format::{display_rows, scored_rows, Report};
use crate::storage::{AttemptOutcome, LedgerKey, Store, StoreError};
use common::model::check::CheckRecord;
use common::model::submission::{CheckResponse, CheckStatus};
use common::model::tool::Tool;
use common::model::user::Identity;
use log::{info, warn};

pub fn validate_filename(filename: &str) -> Result<String, CheckError> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(CheckError::InvalidInput("A filename is required".into()));
    }
    Ok(filename.to_string())
}

fn ledger_key(identity: &Identity, tool: Tool, filename: &str, code_hash: &str) -> LedgerKey {
    LedgerKey {
        user_id: identity.id,
        tool,
        filename: filename.to_string(),
        code_hash: code_hash.to_string(),
    }
}

/// The attempt log is an audit trail; a failed write is logged, not fatal.
fn audit(store: &Store, identity: &Identity, key: &LedgerKey, outcome: AttemptOutcome) {
    if let Err(e) = store.log_attempt(identity, key, outcome) {
        warn!(
            "could not log {} attempt for user {} on '{}': {}",
            outcome.as_str(),
            identity.id,
            key.filename,
            e
        );
    }
}

fn already_checked_message(identity: &Identity) -> String {
    format!(
        "User '{}' has already checked this file. Only one check is allowed.",
        identity.username
    )
}

/// Rebuilds the response of an earlier check from storage.
fn replay(
    store: &Store,
    identity: &Identity,
    key: &LedgerKey,
    record: &CheckRecord,
) -> Result<CheckResponse, CheckError> {
    let rows = store.load_feedback(key)?;
    let summary = match key.tool {
        Tool::Debug => Some(debug_summary(rows.len(), &scan(&record.source))),
        Tool::Comment => None,
    };
    Ok(CheckResponse {
        status: CheckStatus::AlreadyChecked,
        tool: key.tool,
        filename: key.filename.clone(),
        fingerprint: key.code_hash.clone(),
        message: already_checked_message(identity),
        results: display_rows(&rows),
        summary,
    })
}

/// Returns the replayed response when a student already checked exactly this
/// content; `None` when a check may proceed.
pub fn precheck(
    store: &Store,
    identity: &Identity,
    tool: Tool,
    filename: &str,
    code_hash: &str,
) -> Result<Option<CheckResponse>, CheckError> {
    if identity.is_teacher {
        return Ok(None);
    }
    let key = ledger_key(identity, tool, filename, code_hash);
    match store.find_record(&key)? {
        Some(record) => {
            info!(
                "user {} already checked '{}' with the {} tool",
                identity.id, filename, tool
            );
            audit(store, identity, &key, AttemptOutcome::AlreadyChecked);
            Ok(Some(replay(store, identity, &key, &record)?))
        }
        None => Ok(None),
    }
}

/// Scores `text` and records the attempt.
///
/// Students get one attempt per (tool, filename, content); repeating it
/// replays the stored results without scoring again. When two requests race,
/// the ledger's uniqueness constraint lets exactly one commit and the loser is
/// answered from the winner's rows.
pub fn run_check(
    store: &Store,
    identity: &Identity,
    tool: Tool,
    filename: &str,
    text: &str,
) -> Result<CheckResponse, CheckError> {
    let filename = validate_filename(filename)?;
    if text.trim().is_empty() {
        return Err(CheckError::InvalidInput(
            "The submitted file has no content".into(),
        ));
    }

    let source = normalize_line_endings(text);
    let code_hash = fingerprint(&source);
    if let Some(response) = precheck(store, identity, tool, &filename, &code_hash)? {
        return Ok(response);
    }

    let key = ledger_key(identity, tool, &filename, &code_hash);
    let lines = scan(&source);
    let scored = score_lines(tool, &lines);

    match store.commit_check(identity, &key, &source, &scored) {
        Ok(()) => {}
        Err(StoreError::Conflict) => {
            warn!(
                "concurrent check of '{}' by user {}; answering from the stored result",
                filename, identity.id
            );
            audit(store, identity, &key, AttemptOutcome::Conflict);
            let record = store.find_record(&key)?.ok_or_else(|| {
                CheckError::Store(StoreError::Corrupt(format!(
                    "check record for '{}' vanished after a conflict",
                    filename
                )))
            })?;
            return replay(store, identity, &key, &record);
        }
        Err(e) => return Err(e.into()),
    }

    let (status, outcome, message) = if scored.is_empty() {
        (
            CheckStatus::NoAnnotations,
            AttemptOutcome::NoAnnotations,
            empty_message(tool),
        )
    } else {
        (
            CheckStatus::Scored,
            AttemptOutcome::Scored,
            format!(
                "File '{}' checked for user '{}'. {} item(s) scored.",
                filename,
                identity.username,
                scored.len()
            ),
        )
    };
    audit(store, identity, &key, outcome);
    info!(
        "{} check of '{}' for user {}: {} item(s)",
        tool,
        filename,
        identity.id,
        scored.len()
    );

    let summary = match tool {
        Tool::Debug => Some(debug_summary(scored.len(), &lines)),
        Tool::Comment => None,
    };
    Ok(CheckResponse {
        status,
        tool,
        filename,
        fingerprint: code_hash,
        message,
        results: scored_rows(&scored),
        summary,
    })
}

/// The caller's most recent stored result for `filename`.
pub fn stored_results(
    store: &Store,
    identity: &Identity,
    tool: Tool,
    filename: &str,
) -> Result<CheckResponse, CheckError> {
    let filename = validate_filename(filename)?;
    let record = latest(store, identity, tool, &filename)?;
    let key = ledger_key(identity, tool, &filename, &record.code_hash);
    let rows = store.load_feedback(&key)?;

    let (status, message) = if rows.is_empty() {
        (CheckStatus::NoAnnotations, empty_message(tool))
    } else {
        (
            CheckStatus::Scored,
            format!(
                "Results for '{}' checked on {}.",
                filename,
                record.checked_at.format("%Y-%m-%d")
            ),
        )
    };
    let summary = match tool {
        Tool::Debug => Some(debug_summary(rows.len(), &scan(&record.source))),
        Tool::Comment => None,
    };
    Ok(CheckResponse {
        status,
        tool,
        filename,
        fingerprint: record.code_hash,
        message,
        results: display_rows(&rows),
        summary,
    })
}

/// Renders the caller's most recent result for `filename` as a PDF.
/// Returns the attachment name and the document bytes.
pub fn export_pdf(
    store: &Store,
    identity: &Identity,
    tool: Tool,
    filename: &str,
    settings: &PdfSettings,
) -> Result<(String, Vec<u8>), CheckError> {
    let filename = validate_filename(filename)?;
    let record = latest(store, identity, tool, &filename)?;
    let key = ledger_key(identity, tool, &filename, &record.code_hash);
    let rows = store.load_feedback(&key)?;

    let report = Report::build(
        tool,
        &filename,
        record.checked_at.date_naive(),
        &record.source,
        &rows,
    );
    let bytes = render(&report, settings).map_err(|e| CheckError::Render(e.to_string()))?;
    Ok((report.download_name(), bytes))
}

fn latest(
    store: &Store,
    identity: &Identity,
    tool: Tool,
    filename: &str,
) -> Result<CheckRecord, CheckError> {
    store
        .latest_record(identity.id, tool, filename)?
        .ok_or_else(|| {
            CheckError::NotFound(format!(
                "No {} results found for '{}'",
                tool.display_name(),
                filename
            ))
        })
}
