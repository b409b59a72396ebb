//! Monthly mbox archive loading.
//!
//! Archives are expected as `<list>-<YYYY>-<MM>.mbox`, optionally gzip
//! compressed with a `.gz` suffix, all in one directory. Each file becomes one
//! [`MessageBatch`]; batches are returned oldest month first, which is the
//! order the thread builder requires.
//!
//! Separate archives are read and parsed in parallel; nothing is shared
//! between them until the final sort.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use rayon::prelude::*;
use regex::Regex;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Epoch, Message, MessageBatch};

use super::parser::parse_message;

/// Split mbox content into raw messages, without their `From ` separators.
///
/// A separator is a line starting with `From ` at the start of the file or
/// right after a blank line. Anything before the first separator is ignored.
pub fn split_mbox(data: &[u8]) -> Vec<&[u8]> {
    let mut messages = Vec::new();
    let mut current_start: Option<usize> = None;
    let mut previous_blank = true;
    let mut offset = 0;

    while offset < data.len() {
        let line_end = data[offset..]
            .iter()
            .position(|&byte| byte == b'\n')
            .map(|position| offset + position + 1)
            .unwrap_or(data.len());
        let line = &data[offset..line_end];

        if previous_blank && line.starts_with(b"From ") {
            if let Some(start) = current_start {
                messages.push(&data[start..offset]);
            }
            current_start = Some(line_end);
        }

        previous_blank = matches!(line, b"\n" | b"\r\n");
        offset = line_end;
    }

    if let Some(start) = current_start {
        messages.push(&data[start..]);
    }

    messages
}

/// An unparseable message becomes an empty placeholder so later messages
/// keep their archive keys. The thread builder skips it.
fn message_or_placeholder<E: std::fmt::Display>(
    parsed: Result<Message, E>,
    epoch: Epoch,
    key: usize,
) -> Message {
    parsed.unwrap_or_else(|err| {
        log::warn!("skipping {}.{}: {}", epoch, key, err);
        Message::default()
    })
}

/// Parse mbox content into one batch, one entry per archived message.
pub fn parse_mbox(data: &[u8], epoch: Epoch) -> MessageBatch {
    let messages = split_mbox(data)
        .into_iter()
        .enumerate()
        .map(|(key, raw)| message_or_placeholder(parse_message(raw), epoch, key))
        .collect();

    MessageBatch::new(epoch, messages)
}

/// File name pattern for `list` archives.
fn archive_name_pattern(list: &str) -> ReviewResult<Regex> {
    let pattern = format!(
        r"^{}-(?P<year>\d{{4}})-(?P<month>\d{{2}})\.mbox(?:\.gz)?$",
        regex::escape(list)
    );
    Regex::new(&pattern).map_err(|source| ReviewError::InvalidPattern { pattern, source })
}

fn epoch_from_name(pattern: &Regex, path: &Path) -> ReviewResult<Epoch> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ReviewError::ArchiveName(path.to_path_buf()))?;
    let caps = pattern
        .captures(name)
        .ok_or_else(|| ReviewError::ArchiveName(path.to_path_buf()))?;

    format!("{}-{}", &caps["year"], &caps["month"])
        .parse()
        .map_err(|_| ReviewError::ArchiveName(path.to_path_buf()))
}

/// Month covered by an archive file of `list`.
pub fn archive_epoch(path: &Path, list: &str) -> ReviewResult<Epoch> {
    epoch_from_name(&archive_name_pattern(list)?, path)
}

/// Read an archive, decompressing it if the name ends in `.gz`.
pub fn read_archive(path: &Path) -> ReviewResult<Vec<u8>> {
    let raw = fs::read(path).map_err(|err| ReviewError::io(path, err))?;

    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut data = Vec::new();
        GzDecoder::new(&raw[..])
            .read_to_end(&mut data)
            .map_err(|err| ReviewError::io(path, err))?;
        log::debug!("decompressed {} ({} -> {} bytes)", path.display(), raw.len(), data.len());
        return Ok(data);
    }

    Ok(raw)
}

/// Load every `list` archive in `dir`, oldest month first.
///
/// Files that do not follow the archive naming scheme are ignored, as are
/// months before `start`. If a month exists both compressed and
/// uncompressed, the uncompressed file is used.
pub fn load_archive_dir(
    dir: &Path,
    list: &str,
    start: Option<Epoch>,
) -> ReviewResult<Vec<MessageBatch>> {
    let pattern = archive_name_pattern(list)?;
    let mut archives: BTreeMap<Epoch, PathBuf> = BTreeMap::new();

    for entry in fs::read_dir(dir).map_err(|err| ReviewError::io(dir, err))? {
        let path = entry.map_err(|err| ReviewError::io(dir, err))?.path();
        if !path.is_file() {
            continue;
        }

        let epoch = match epoch_from_name(&pattern, &path) {
            Ok(epoch) => epoch,
            Err(_) => {
                log::debug!("ignoring {}", path.display());
                continue;
            }
        };
        if start.is_some_and(|start| epoch < start) {
            continue;
        }

        let compressed = path.extension().is_some_and(|ext| ext == "gz");
        match archives.get(&epoch) {
            Some(existing) if compressed => {
                log::debug!("{} already loaded from {}", epoch, existing.display());
            }
            _ => {
                archives.insert(epoch, path);
            }
        }
    }

    log::info!("loading {} archives from {}", archives.len(), dir.display());

    let mut batches = archives
        .into_par_iter()
        .map(|(epoch, path)| {
            let data = read_archive(&path)?;
            let batch = parse_mbox(&data, epoch);
            log::info!("ingest {} ({} messages)", epoch, batch.messages.len());
            Ok(batch)
        })
        .collect::<ReviewResult<Vec<_>>>()?;

    batches.sort_by_key(|batch| batch.epoch);
    Ok(batches)
}
