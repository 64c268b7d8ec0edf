//! ReaderSource - ByteSource over any tokio reader

use std::path::Path;

use contracts::{ByteSource, ContractError};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Adapts an `AsyncRead` (stdin, a file, a socket half) to `ByteSource`
pub struct ReaderSource<R> {
    name: String,
    inner: R,
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(name: impl Into<String>, inner: R) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl ReaderSource<tokio::io::Stdin> {
    /// Standard input
    pub fn stdin() -> Self {
        Self::new("stdin", tokio::io::stdin())
    }
}

impl ReaderSource<tokio::fs::File> {
    /// Open a file for reading
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(path.display().to_string(), file))
    }
}

impl<R> ByteSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        self.inner
            .read(buf)
            .await
            .map_err(|e| ContractError::read(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_until_eof() {
        let mut source = ReaderSource::new("slice", &b"hello world"[..]);
        let mut buf = [0u8; 8];

        assert_eq!(source.read(&mut buf).await.unwrap(), 8);
        assert_eq!(&buf, b"hello wo");
        assert_eq!(source.read(&mut buf).await.unwrap(), 3);
        assert_eq!(source.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"payload").unwrap();

        let mut source = ReaderSource::open(file.path()).await.unwrap();
        let mut buf = [0u8; 32];
        assert_eq!(source.read(&mut buf).await.unwrap(), 7);
        assert_eq!(&buf[..7], b"payload");
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        assert!(ReaderSource::open("/nonexistent/delay-input").await.is_err());
    }
}
