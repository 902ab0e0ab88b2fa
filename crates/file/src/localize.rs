//! Materialization of remote objects and local-file lifecycle ownership

use crate::error::Result;
use crate::s3::{ClientConfig, S3Client};
use crate::{FileSource, S3Location};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Transfers a single remote object into a local destination file
///
/// This is the seam to the object-store collaborator: [`S3Client`]
/// implements it against AWS, tests implement it with a stub.
#[async_trait]
pub trait ObjectFetcher {
    /// Download the object at `location` into `dest`, replacing its contents
    async fn fetch(&self, location: &S3Location, dest: &Path) -> Result<()>;
}

/// A path resolved to a file on local disk
///
/// For a local input this is just the normalized path. For an S3 input it is
/// a temporary file holding the object's bytes; the temporary file lives
/// exactly as long as this value and is deleted when it is dropped (or
/// earlier, via [`LocalFile::close`]).
#[derive(Debug)]
pub struct LocalFile {
    original: String,
    resolved: PathBuf,
    temp: Option<NamedTempFile>,
}

impl LocalFile {
    /// Resolve `path` to a local file, downloading it first if it is remote
    ///
    /// Convenience constructor chaining [`FileSource::parse`] with
    /// [`LocalFile::materialize`]; the S3 client session is only constructed
    /// when the input is actually remote.
    pub async fn open(path: &str, config: &ClientConfig) -> Result<Self> {
        match FileSource::parse(path)? {
            FileSource::Local(resolved) => Ok(Self {
                original: path.to_string(),
                resolved,
                temp: None,
            }),
            FileSource::S3(location) => {
                let client = S3Client::connect(config).await?;
                Self::materialize(path, &location, &client).await
            }
        }
    }

    /// Download `location` into a fresh temporary file owned by the result
    ///
    /// The explicit I/O step of the two-step flow. The temporary file gets a
    /// suffix matching the object's extension so consumers that branch on it
    /// behave the same as on the original.
    pub async fn materialize<F>(original: &str, location: &S3Location, fetcher: &F) -> Result<Self>
    where
        F: ObjectFetcher + ?Sized,
    {
        let temp = named_temp(location.extension())?;
        fetcher.fetch(location, temp.path()).await?;

        tracing::debug!(
            uri = %location.uri(),
            local = %temp.path().display(),
            "materialized S3 object"
        );

        Ok(Self {
            original: original.to_string(),
            resolved: temp.path().to_path_buf(),
            temp: Some(temp),
        })
    }

    /// The input string as supplied by the caller
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The resolved local path; for remote inputs, the materialized copy
    pub fn path(&self) -> &Path {
        &self.resolved
    }

    /// Whether this file is a materialized copy of a remote object
    pub fn is_remote(&self) -> bool {
        self.temp.is_some()
    }

    /// Delete the backing temporary file now instead of at drop
    ///
    /// Idempotent; a no-op for local files and for already-closed handles.
    /// Deletion failures are logged and swallowed.
    pub fn close(&mut self) {
        if let Some(temp) = self.temp.take() {
            let path = temp.path().to_path_buf();
            if let Err(e) = temp.close() {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
            }
        }
    }
}

impl Drop for LocalFile {
    fn drop(&mut self) {
        self.close();
    }
}

/// Allocate a uniquely named temporary file, suffixed `.{extension}` when
/// an extension is present.
fn named_temp(extension: &str) -> Result<NamedTempFile> {
    let suffix = if extension.is_empty() {
        String::new()
    } else {
        format!(".{extension}")
    };
    let mut builder = tempfile::Builder::new();
    if !suffix.is_empty() {
        builder.suffix(&suffix);
    }
    Ok(builder.tempfile()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records what it was asked to fetch and writes fixed bytes.
    struct StubFetcher {
        bytes: Vec<u8>,
        requests: Mutex<Vec<S3Location>>,
    }

    impl StubFetcher {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.to_vec(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ObjectFetcher for StubFetcher {
        async fn fetch(&self, location: &S3Location, dest: &Path) -> Result<()> {
            self.requests.lock().unwrap().push(location.clone());
            std::fs::write(dest, &self.bytes)?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_open_local_path() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("data.csv");
        std::fs::write(&file_path, "a,b,c").unwrap();

        let input = format!("{}//data.csv", temp_dir.path().display());
        let file = LocalFile::open(&input, &ClientConfig::default())
            .await
            .unwrap();

        assert!(!file.is_remote());
        assert_eq!(file.original(), input);
        assert_eq!(file.path().to_string_lossy(), normalize(&input));
        assert_eq!(file.path(), file_path);
    }

    #[tokio::test]
    async fn test_materialize_downloads_into_temp_file() {
        let fetcher = StubFetcher::new(b"x,y\n1,2\n");
        let location = S3Location::parse("s3://my-bucket/dir/file.csv").unwrap();

        let file = LocalFile::materialize("s3://my-bucket/dir/file.csv", &location, &fetcher)
            .await
            .unwrap();

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), [location]);

        assert!(file.is_remote());
        assert!(file.path().to_string_lossy().ends_with(".csv"));
        assert_eq!(std::fs::read(file.path()).unwrap(), b"x,y\n1,2\n");
    }

    #[tokio::test]
    async fn test_materialize_without_extension() {
        let fetcher = StubFetcher::new(b"raw");
        let location = S3Location::parse("s3://bucket/blob").unwrap();

        let file = LocalFile::materialize("s3://bucket/blob", &location, &fetcher)
            .await
            .unwrap();

        assert_eq!(std::fs::read(file.path()).unwrap(), b"raw");
    }

    #[tokio::test]
    async fn test_temp_file_removed_on_drop() {
        let fetcher = StubFetcher::new(b"bytes");
        let location = S3Location::parse("s3://bucket/key.txt").unwrap();

        let file = LocalFile::materialize("s3://bucket/key.txt", &location, &fetcher)
            .await
            .unwrap();
        let path = file.path().to_path_buf();
        assert!(path.exists());

        drop(file);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let fetcher = StubFetcher::new(b"bytes");
        let location = S3Location::parse("s3://bucket/key.txt").unwrap();

        let mut file = LocalFile::materialize("s3://bucket/key.txt", &location, &fetcher)
            .await
            .unwrap();
        let path = file.path().to_path_buf();

        file.close();
        assert!(!path.exists());
        file.close();
        assert!(!file.is_remote());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        struct FailingFetcher;

        #[async_trait]
        impl ObjectFetcher for FailingFetcher {
            async fn fetch(&self, location: &S3Location, _dest: &Path) -> Result<()> {
                Err(crate::FileError::DownloadFailed {
                    location: location.uri(),
                    source: "connection reset".into(),
                })
            }
        }

        let location = S3Location::parse("s3://bucket/key.txt").unwrap();
        let result = LocalFile::materialize("s3://bucket/key.txt", &location, &FailingFetcher).await;
        assert!(matches!(
            result,
            Err(crate::FileError::DownloadFailed { .. })
        ));
    }
}
