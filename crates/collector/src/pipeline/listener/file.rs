use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::pipeline::payload::ChunkStream;

use super::Listener;

const MAX_READ_CHUNK_BYTES: u64 = 1024;
const MAX_UTF8_CONTINUATION: usize = 3;

/// Tails a local file, emitting only bytes appended after the stream starts.
pub struct FileListener {
    path: PathBuf,
    poll_interval: Duration,
}

impl FileListener {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
        }
    }
}

impl Listener for FileListener {
    fn listen(&self) -> ChunkStream {
        let path = self.path.clone();
        let poll_interval = self.poll_interval;

        Box::pin(async_stream::stream! {
            let mut read_offset = match fs::metadata(&path).await {
                Ok(meta) => meta.len(),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to open file");
                    return;
                }
            };
            info!(path = %path.display(), offset = read_offset, "Tailing file");
            // bytes of a character cut by the read boundary, prepended to the next chunk
            let mut carry: Vec<u8> = Vec::new();

            loop {
                sleep(poll_interval).await;

                let file_size = match fs::metadata(&path).await {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "File no longer readable");
                        return;
                    }
                };

                if file_size < read_offset {
                    debug!(
                        path = %path.display(),
                        previous_offset = read_offset,
                        current_size = file_size,
                        "File truncated; reading from start"
                    );
                    read_offset = 0;
                    carry.clear();
                }

                while read_offset < file_size {
                    let max_bytes = (file_size - read_offset).min(MAX_READ_CHUNK_BYTES) as usize;
                    match read_new_bytes(&path, read_offset, max_bytes).await {
                        Ok(buffer) if buffer.is_empty() => break,
                        Ok(buffer) => {
                            read_offset += buffer.len() as u64;
                            let mut chunk = std::mem::take(&mut carry);
                            chunk.extend_from_slice(&buffer);
                            carry = split_incomplete_tail(&mut chunk);
                            if !chunk.is_empty() {
                                yield Bytes::from(chunk);
                            }
                        }
                        Err(e) => {
                            error!(path = %path.display(), error = %e, "Failed to read file");
                            return;
                        }
                    }
                }
            }
        })
    }
}

async fn read_new_bytes(path: &Path, offset: u64, max_bytes: usize) -> std::io::Result<Vec<u8>> {
    let mut file = fs::File::open(path).await?;
    file.seek(std::io::SeekFrom::Start(offset)).await?;

    let mut buffer = vec![0u8; max_bytes];
    let mut total_read = 0usize;
    while total_read < max_bytes {
        let bytes_read = file.read(&mut buffer[total_read..]).await?;
        if bytes_read == 0 {
            break;
        }
        total_read += bytes_read;
    }
    buffer.truncate(total_read);
    Ok(buffer)
}

/// Split off a trailing UTF-8 sequence that is cut short, leaving `data`
/// ending on a character boundary. Invalid bytes are left in place.
fn split_incomplete_tail(data: &mut Vec<u8>) -> Vec<u8> {
    let tail_start = data.len().saturating_sub(MAX_UTF8_CONTINUATION);
    for i in (tail_start..data.len()).rev() {
        // skip continuation bytes (10xxxxxx) back to the lead byte
        if data[i] & 0xC0 == 0x80 {
            continue;
        }
        if let Err(e) = std::str::from_utf8(&data[i..]) {
            if e.error_len().is_none() {
                return data.split_off(i);
            }
        }
        break;
    }
    Vec::new()
}
