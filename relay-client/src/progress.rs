//! Transfer progress observers.

use indicatif::ProgressBar;

/// Receives byte counts as a transfer proceeds.
///
/// Counts are ciphertext bytes on the wire, so `start` is given the
/// encrypted size of the file. Observers are moved into the upload body
/// reader, which must stay `Unpin`.
pub trait TransferProgress: Clone + Send + Sync + Unpin + 'static {
    /// A transfer of roughly `total` bytes is starting.
    fn start(&self, total: u64);

    /// `bytes` more bytes were transferred.
    fn advance(&self, bytes: u64);

    /// The transfer completed successfully.
    fn finish(&self);
}

/// Ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl TransferProgress for NoProgress {
    fn start(&self, _total: u64) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

impl TransferProgress for ProgressBar {
    fn start(&self, total: u64) {
        self.set_length(total);
        self.set_position(0);
    }

    fn advance(&self, bytes: u64) {
        self.inc(bytes);
    }

    fn finish(&self) {
        ProgressBar::finish(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_tracks_bytes() {
        let bar = ProgressBar::hidden();
        bar.start(100);
        bar.advance(40);
        bar.advance(60);
        TransferProgress::finish(&bar);

        assert_eq!(bar.length(), Some(100));
        assert_eq!(bar.position(), 100);
        assert!(bar.is_finished());
    }

    #[tokio::test]
    async fn observer_fits_an_upload_body() {
        use relay_crypto::{ChunkKey, ChunkReader, ProgressReader};
        use tokio::io::AsyncReadExt;

        fn body_for<P: TransferProgress>(
            source: &'static [u8],
            progress: P,
        ) -> impl tokio::io::AsyncRead + Unpin {
            ProgressReader::new(
                ChunkReader::encrypting(source, 16, ChunkKey::from_bytes([9; 32])),
                move |n| progress.advance(n),
            )
        }

        let bar = ProgressBar::hidden();
        bar.start(0);
        let mut sealed = Vec::new();
        body_for(b"twenty bytes of data", bar.clone())
            .read_to_end(&mut sealed)
            .await
            .unwrap();

        assert_eq!(sealed.len(), 20 + 2 * relay_crypto::OVERHEAD);
        assert_eq!(bar.position(), sealed.len() as u64);

        let mut sink = Vec::new();
        body_for(b"x", NoProgress).read_to_end(&mut sink).await.unwrap();
        assert_eq!(sink.len(), 1 + relay_crypto::OVERHEAD);
    }
}
