//! Streaming ZIP archive encoder
//!
//! A single-writer, append-only encoder that emits a ZIP archive to any
//! `AsyncWrite` sink without ever buffering a whole member. Members are
//! written with the streaming data-descriptor flag (general purpose bit 3):
//! the local header carries zero sizes, the CRC-32 and sizes follow the
//! member's deflated data, and the central directory written by
//! [`ArchiveWriter::finalize`] carries the authoritative values. Memory use
//! is bounded by one compressed-output chunk buffer regardless of member
//! size.
//!
//! The `Open -> (Appending)* -> Finalized` state machine is enforced by
//! ownership: `finalize` consumes the writer, so appending to a finalized
//! archive is a compile error.
//!
//! A member whose source stream fails mid-read is abandoned: it is excluded
//! from the central directory, and the writer stays usable for subsequent
//! members. Readers that follow the central directory (which is all of
//! them, for a non-streamed read) never see the orphaned bytes, so a
//! partial member cannot corrupt later members or the trailer.

use crate::error::ExportError;
use bytes::Bytes;
use chrono::{DateTime, Datelike, Timelike, Utc};
use flate2::{Compress, Compression, FlushCompress, Status};
use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Result alias for archive encoding operations
pub type ArchiveResult<T> = std::result::Result<T, ExportError>;

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIGNATURE: u32 = 0x0605_4b50;

/// Version needed to extract: 2.0 (deflate + data descriptors)
const VERSION_NEEDED: u16 = 20;
/// Version made by: UNIX, spec 2.0
const VERSION_MADE_BY: u16 = (3 << 8) | 20;
/// General purpose flags: bit 3 (sizes in data descriptor), bit 11 (UTF-8 names)
const FLAGS: u16 = 0x0808;
/// Compression method: deflate
const METHOD_DEFLATE: u16 = 8;
/// External attributes: regular file, mode 644
const EXTERNAL_ATTRIBUTES: u32 = 0o100644 << 16;

/// Compressed-output chunk buffer size
const OUT_CHUNK: usize = 32 * 1024;

/// A completed member awaiting its central directory entry
struct EntryRecord {
    name: String,
    crc: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    header_offset: u32,
}

/// Append-only streaming ZIP encoder over an `AsyncWrite` sink
///
/// See the module docs for the encoding strategy and failure behavior.
pub struct ArchiveWriter<S: AsyncWrite + Unpin> {
    sink: S,
    level: Compression,
    entries: Vec<EntryRecord>,
    /// Bytes written to the sink so far; local header offsets derive from it
    offset: u64,
    /// Reusable compressed-output chunk buffer
    buf: Vec<u8>,
    /// DOS date/time stamped on every member
    modified: (u16, u16),
}

impl<S: AsyncWrite + Unpin> ArchiveWriter<S> {
    /// Bind a new writer to an output sink
    ///
    /// `level` is the deflate compression level (0-9).
    pub fn new(sink: S, level: u32) -> Self {
        Self {
            sink,
            level: Compression::new(level),
            entries: Vec::new(),
            offset: 0,
            buf: Vec::with_capacity(OUT_CHUNK),
            modified: dos_date_time(Utc::now()),
        }
    }

    /// Number of members appended so far
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Append one member, draining `stream` to exhaustion
    ///
    /// Member names must be unique within the archive; the caller guarantees
    /// this (a duplicate is a programmer error, not a runtime fault). The
    /// data is deflated and written to the sink incrementally as the stream
    /// yields chunks. Returns the member's uncompressed size.
    ///
    /// On a stream read error the member is abandoned (see module docs) and
    /// the error is tagged with `name`; the writer remains usable. Sink
    /// write failures return [`ExportError::Sink`] and are fatal to the run.
    pub async fn append<St, E>(&mut self, name: &str, mut stream: St) -> ArchiveResult<u64>
    where
        St: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let header_offset = u32::try_from(self.offset).map_err(|_| ExportError::Encoding {
            name: name.to_string(),
            reason: "archive exceeds the 4 GiB offset limit".to_string(),
        })?;

        self.write_local_header(name).await?;

        // Fresh deflate state and CRC per member
        let mut compressor = Compress::new(self.level, false);
        let mut crc = crc32fast::Hasher::new();
        let mut uncompressed: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ExportError::MemberRead {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

            crc.update(&chunk);
            uncompressed += chunk.len() as u64;
            self.deflate_chunk(name, &mut compressor, &chunk).await?;
        }

        self.finish_deflate(name, &mut compressor).await?;

        let compressed = compressor.total_out();
        let (compressed_size, uncompressed_size) =
            match (u32::try_from(compressed), u32::try_from(uncompressed)) {
                (Ok(c), Ok(u)) => (c, u),
                _ => {
                    return Err(ExportError::MemberTooLarge {
                        name: name.to_string(),
                    });
                }
            };

        let crc = crc.finalize();
        self.write_data_descriptor(crc, compressed_size, uncompressed_size)
            .await?;

        self.entries.push(EntryRecord {
            name: name.to_string(),
            crc,
            compressed_size,
            uncompressed_size,
            header_offset,
        });

        self.sink.flush().await.map_err(ExportError::Sink)?;
        Ok(uncompressed)
    }

    /// Write the central directory and end-of-central-directory record,
    /// consuming the writer
    ///
    /// Returns the total number of bytes written to the sink over the
    /// writer's lifetime. A failure here means the archive is incomplete
    /// and must not be treated as a success.
    pub async fn finalize(mut self) -> ArchiveResult<u64> {
        let central_dir_offset = self.offset;

        let mut dir = Vec::new();
        for entry in &self.entries {
            push_u32(&mut dir, CENTRAL_HEADER_SIGNATURE);
            push_u16(&mut dir, VERSION_MADE_BY);
            push_u16(&mut dir, VERSION_NEEDED);
            push_u16(&mut dir, FLAGS);
            push_u16(&mut dir, METHOD_DEFLATE);
            push_u16(&mut dir, self.modified.0);
            push_u16(&mut dir, self.modified.1);
            push_u32(&mut dir, entry.crc);
            push_u32(&mut dir, entry.compressed_size);
            push_u32(&mut dir, entry.uncompressed_size);
            push_u16(&mut dir, entry.name.len() as u16);
            push_u16(&mut dir, 0); // extra field length
            push_u16(&mut dir, 0); // comment length
            push_u16(&mut dir, 0); // disk number start
            push_u16(&mut dir, 0); // internal attributes
            push_u32(&mut dir, EXTERNAL_ATTRIBUTES);
            push_u32(&mut dir, entry.header_offset);
            dir.extend_from_slice(entry.name.as_bytes());
        }

        let central_dir_start = u32::try_from(central_dir_offset).map_err(|_| {
            ExportError::Finalize(std::io::Error::other(
                "archive exceeds the 4 GiB offset limit",
            ))
        })?;
        let central_dir_size = dir.len() as u32;

        let entry_count = self.entries.len() as u16;
        push_u32(&mut dir, END_OF_CENTRAL_DIR_SIGNATURE);
        push_u16(&mut dir, 0); // this disk
        push_u16(&mut dir, 0); // central directory start disk
        push_u16(&mut dir, entry_count);
        push_u16(&mut dir, entry_count);
        push_u32(&mut dir, central_dir_size);
        push_u32(&mut dir, central_dir_start);
        push_u16(&mut dir, 0); // comment length

        self.sink
            .write_all(&dir)
            .await
            .map_err(ExportError::Finalize)?;
        self.offset += dir.len() as u64;

        self.sink.flush().await.map_err(ExportError::Finalize)?;
        self.sink.shutdown().await.map_err(ExportError::Finalize)?;

        Ok(self.offset)
    }

    /// Deflate one input chunk, streaming compressed bytes to the sink
    async fn deflate_chunk(
        &mut self,
        name: &str,
        compressor: &mut Compress,
        mut input: &[u8],
    ) -> ArchiveResult<()> {
        while !input.is_empty() {
            self.buf.clear();
            let before_in = compressor.total_in();
            compressor
                .compress_vec(input, &mut self.buf, FlushCompress::None)
                .map_err(|e| ExportError::Encoding {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            let consumed = (compressor.total_in() - before_in) as usize;
            input = &input[consumed..];

            if !self.buf.is_empty() {
                let buf = std::mem::take(&mut self.buf);
                self.write_raw(&buf).await?;
                self.buf = buf;
            }
        }
        Ok(())
    }

    /// Flush the member's remaining deflate state to the sink
    async fn finish_deflate(&mut self, name: &str, compressor: &mut Compress) -> ArchiveResult<()> {
        loop {
            self.buf.clear();
            let status = compressor
                .compress_vec(&[], &mut self.buf, FlushCompress::Finish)
                .map_err(|e| ExportError::Encoding {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;

            if !self.buf.is_empty() {
                let buf = std::mem::take(&mut self.buf);
                self.write_raw(&buf).await?;
                self.buf = buf;
            }

            if matches!(status, Status::StreamEnd) {
                return Ok(());
            }
        }
    }

    /// Local file header: zero sizes, real values follow in the descriptor
    async fn write_local_header(&mut self, name: &str) -> ArchiveResult<()> {
        let mut header = Vec::with_capacity(30 + name.len());
        push_u32(&mut header, LOCAL_HEADER_SIGNATURE);
        push_u16(&mut header, VERSION_NEEDED);
        push_u16(&mut header, FLAGS);
        push_u16(&mut header, METHOD_DEFLATE);
        push_u16(&mut header, self.modified.0);
        push_u16(&mut header, self.modified.1);
        push_u32(&mut header, 0); // crc32
        push_u32(&mut header, 0); // compressed size
        push_u32(&mut header, 0); // uncompressed size
        push_u16(&mut header, name.len() as u16);
        push_u16(&mut header, 0); // extra field length
        header.extend_from_slice(name.as_bytes());

        self.write_raw(&header).await
    }

    async fn write_data_descriptor(
        &mut self,
        crc: u32,
        compressed_size: u32,
        uncompressed_size: u32,
    ) -> ArchiveResult<()> {
        let mut descriptor = Vec::with_capacity(16);
        push_u32(&mut descriptor, DATA_DESCRIPTOR_SIGNATURE);
        push_u32(&mut descriptor, crc);
        push_u32(&mut descriptor, compressed_size);
        push_u32(&mut descriptor, uncompressed_size);

        self.write_raw(&descriptor).await
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> ArchiveResult<()> {
        self.sink
            .write_all(bytes)
            .await
            .map_err(ExportError::Sink)?;
        self.offset += bytes.len() as u64;
        Ok(())
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Convert a timestamp to MS-DOS (time, date) words
///
/// DOS timestamps start at 1980; earlier times clamp to the epoch.
fn dos_date_time(dt: DateTime<Utc>) -> (u16, u16) {
    let year = dt.year();
    if year < 1980 {
        return (0, 0x21); // 1980-01-01 00:00:00
    }

    let time = ((dt.hour() as u16) << 11)
        | ((dt.minute() as u16) << 5)
        | ((dt.second() as u16) / 2);
    let date = (((year - 1980) as u16) << 9)
        | ((dt.month() as u16) << 5)
        | (dt.day() as u16);
    (time, date)
}
