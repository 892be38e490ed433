//! Archive export orchestration
//!
//! Drives one export run: for each media record, in record-source order,
//! fetch the backing object and pipe it into the streaming archive writer
//! under a derived, collision-free member name. One failed record never
//! aborts the run; it is recorded in the [`ExportOutcome`] and the run
//! continues with the next record. Only sink failures (the client went
//! away) and finalize failures end a run early.
//!
//! Records are processed strictly one at a time. Sequential fetching keeps
//! member ordering deterministic and avoids unbounded concurrent
//! connections to the object store; the archive begins streaming with the
//! first member, so time-to-first-byte stays low regardless of export size.

use crate::archive::ArchiveWriter;
use crate::error::{Error, Result};
use crate::fetch::RemoteFetcher;
use crate::types::{ExportOutcome, MediaRecord};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tokio::io::AsyncWrite;

/// Build the download filename for an export started at `now`
///
/// Formats as `<prefix>-<YYYY-MM-DDTHH-MM-SS>.zip`; colons are avoided so
/// the name is safe on every filesystem.
pub fn archive_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.zip", prefix, now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Export `records` as a streaming ZIP archive into `sink`
///
/// Returns the run summary. The summary is also logged here, because on the
/// HTTP path the response status was committed before the first byte and
/// the summary can no longer reach the client.
///
/// # Errors
///
/// Fails only on fatal pipeline errors: the sink rejected a write (client
/// disconnected) or the archive trailer could not be written. Per-record
/// fetch and encoding failures are recorded in the outcome instead.
pub async fn export_archive<S: AsyncWrite + Unpin>(
    fetcher: &RemoteFetcher,
    records: &[MediaRecord],
    sink: S,
    compression_level: u32,
) -> Result<ExportOutcome> {
    let total = records.len();
    let mut writer = ArchiveWriter::new(sink, compression_level);
    let mut outcome = ExportOutcome::new();
    let mut used_names = HashSet::new();

    for record in records {
        let name = derive_member_name(record, &mut used_names);

        let object = match fetcher.fetch(&record.url).await {
            Ok(object) => object,
            Err(e) => {
                tracing::warn!(id = %record.id, url = %record.url, error = %e, "skipping record: fetch failed");
                outcome.record_failure(record.id, e.to_string());
                continue;
            }
        };

        tracing::debug!(
            id = %record.id,
            member = %name,
            size_hint = ?object.content_length(),
            "appending member"
        );

        match writer.append(&name, object.into_stream()).await {
            Ok(bytes) => {
                outcome.record_success();
                tracing::debug!(
                    member = %name,
                    bytes,
                    "added to archive ({}/{})",
                    outcome.attempted,
                    total
                );
            }
            Err(e) if e.is_fatal() => {
                tracing::warn!(
                    error = %e,
                    succeeded = outcome.succeeded,
                    attempted = outcome.attempted,
                    total,
                    "aborting export run"
                );
                return Err(Error::Export(e));
            }
            Err(e) => {
                tracing::warn!(id = %record.id, member = %name, error = %e, "skipping record: append failed");
                outcome.record_failure(record.id, e.to_string());
            }
        }
    }

    let archive_bytes = writer.finalize().await.map_err(|e| {
        tracing::error!(error = %e, "failed to finalize archive; output is truncated");
        Error::Export(e)
    })?;

    tracing::info!(
        attempted = outcome.attempted,
        succeeded = outcome.succeeded,
        failed = outcome.failed.len(),
        archive_bytes,
        "export run complete"
    );

    Ok(outcome)
}

/// Derive a unique archive member name for one record
///
/// The base name is the last path segment of the record's storage key
/// (percent-decoded); the extension comes from the source URL's path, with
/// the record kind supplying a fallback when the URL carries none. Name
/// collisions get a deterministic ` (n)` suffix before the extension.
fn derive_member_name(record: &MediaRecord, used: &mut HashSet<String>) -> String {
    let base = record
        .storage_key
        .rsplit('/')
        .next()
        .unwrap_or(&record.storage_key);
    let base = match urlencoding::decode(base) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => base.to_string(),
    };
    let base = if base.is_empty() {
        format!("media-{}", record.id)
    } else {
        base
    };

    let extension = url_extension(&record.url)
        .unwrap_or_else(|| record.kind.default_extension().to_string());

    unique_name(format!("{}.{}", base, extension), used)
}

/// Extract a plausible file extension from a URL's path
///
/// Query strings never leak into the extension because only the URL path is
/// inspected. Extensions longer than 8 characters or containing anything
/// non-alphanumeric are treated as absent.
fn url_extension(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    let (stem, extension) = segment.rsplit_once('.')?;

    if stem.is_empty() || extension.is_empty() || extension.len() > 8 {
        return None;
    }
    if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(extension.to_ascii_lowercase())
}

/// Reserve `candidate` in `used`, disambiguating with " (n)" on collision
fn unique_name(candidate: String, used: &mut HashSet<String>) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }

    let (stem, extension) = match candidate.rsplit_once('.') {
        Some((stem, extension)) => (stem.to_string(), Some(extension.to_string())),
        None => (candidate, None),
    };

    let mut counter = 1u32;
    loop {
        let next = match &extension {
            Some(extension) => format!("{} ({}).{}", stem, counter, extension),
            None => format!("{} ({})", stem, counter),
        };
        if used.insert(next.clone()) {
            return next;
        }
        counter += 1;
    }
}
