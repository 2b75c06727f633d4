//! Whole-document import and export.
//!
//! These are the only operations that suspend. Both accept a
//! [`CancellationToken`]. Imports and file exports never truncate their
//! destination: the bytes land in a sibling temp file that is renamed only
//! after the copy completes.

use crate::error::{DocumentError, Result};
use crate::store::{temp_sibling, DocumentStore};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Chunk size for streaming copies (64 KiB).
const COPY_CHUNK_SIZE: usize = 64 * 1024;

impl DocumentStore {
    /// Opens the document file as a byte stream, creating the seeded document
    /// first if none exists.
    pub async fn open_export(&self) -> Result<fs::File> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.ensure_exists())
            .await
            .map_err(|err| {
                DocumentError::IoError(std::io::Error::other(format!(
                    "spawn_blocking failed: {err}"
                )))
            })??;
        Ok(fs::File::open(self.path()).await?)
    }

    /// Copies the whole document into `writer`. Returns the number of bytes copied.
    pub async fn export_to<W>(&self, writer: &mut W, cancel: &CancellationToken) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut file = self.open_export().await?;
        let copied = copy_cancellable(&mut file, writer, cancel).await?;
        log::info!("Exported {copied} bytes from {:?}", self.path());
        Ok(copied)
    }

    /// Copies the whole document into a file at `target`.
    ///
    /// The bytes go to a sibling temp file that replaces `target` only after
    /// the copy completes, so a cancelled or failed export leaves `target` as it
    /// was. `target` may be the document itself.
    pub async fn export_to_path(&self, target: &Path, cancel: &CancellationToken) -> Result<u64> {
        let mut file = self.open_export().await?;
        let copied = write_into_place(&mut file, target, cancel).await?;
        log::info!("Exported {copied} bytes from {:?} to {target:?}", self.path());
        Ok(copied)
    }

    /// Replaces the document with the content of `reader`.
    ///
    /// The destination is either fully replaced or left untouched. The incoming
    /// bytes are not validated; a malformed import surfaces as a format error on
    /// the next load.
    pub async fn replace_with<R>(&self, reader: &mut R, cancel: &CancellationToken) -> Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let copied = match write_into_place(reader, self.path(), cancel).await {
            Ok(copied) => copied,
            Err(err) => {
                if err.is_cancelled() {
                    log::warn!("Import into {:?} cancelled", self.path());
                }
                return Err(err);
            }
        };
        log::info!("Imported {copied} bytes into {:?}", self.path());
        Ok(copied)
    }
}

/// Streams `reader` into a temp sibling of `target`, then renames it over
/// `target`. The temp file is removed on any error.
async fn write_into_place<R>(reader: &mut R, target: &Path, cancel: &CancellationToken) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp = temp_sibling(target);
    let mut file = fs::File::create(&tmp).await?;
    let copied = match copy_cancellable(reader, &mut file, cancel).await {
        Ok(copied) => copied,
        Err(err) => {
            drop(file);
            let _ = fs::remove_file(&tmp).await;
            return Err(err);
        }
    };

    let finished = async {
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, target).await
    }
    .await;
    if let Err(err) = finished {
        let _ = fs::remove_file(&tmp).await;
        return Err(DocumentError::IoError(err));
    }
    Ok(copied)
}

async fn copy_cancellable<R, W>(
    reader: &mut R,
    writer: &mut W,
    cancel: &CancellationToken,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; COPY_CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let n = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(DocumentError::Cancelled { bytes_copied: copied });
            }
            read = reader.read(&mut buf) => read?,
        };
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        copied += n as u64;
    }
    writer.flush().await?;
    Ok(copied)
}
