use crate::config::ReportsConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const FILE_PREFIX: &str = "postmortem-";
const FILE_EXTENSION: &str = "md";

/// Persists rendered postmortems under a reports directory
#[derive(Debug, Clone)]
pub struct PostmortemWriter {
    dir: PathBuf,
}

impl PostmortemWriter {
    /// Writer rooted at `dir`, made absolute against the working directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            dir: std::path::absolute(dir.as_ref())?,
        })
    }

    pub fn from_config(config: &ReportsConfig) -> Result<Self> {
        Self::new(&config.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `content` to a new file stamped with `now`.
    ///
    /// The first candidate is `postmortem-<stamp>.md`; if another report
    /// already took that name within the same second, `-1`, `-2`, ... is
    /// appended. Existing files are never overwritten.
    pub async fn write(&self, content: &str, now: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let stamp = now.format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let mut attempt = 0u32;

        loop {
            let path = self.dir.join(file_name(&stamp, attempt));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(content.as_bytes()).await?;
                    file.flush().await?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn file_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}{}.{}", FILE_PREFIX, stamp, FILE_EXTENSION)
    } else {
        format!("{}{}-{}.{}", FILE_PREFIX, stamp, attempt, FILE_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 5).unwrap()
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("reports").join("ops-healer");
        let writer = PostmortemWriter::new(&dir).unwrap();

        let path = writer.write("# hello\n", fixed_now()).await.unwrap();

        assert!(path.is_absolute());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "postmortem-2024-01-01T12-30-05Z.md"
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
    }

    #[tokio::test]
    async fn test_same_second_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let writer = PostmortemWriter::new(temp_dir.path()).unwrap();

        let first = writer.write("first", fixed_now()).await.unwrap();
        let second = writer.write("second", fixed_now()).await.unwrap();
        let third = writer.write("third", fixed_now()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap().to_str().unwrap(),
            "postmortem-2024-01-01T12-30-05Z-1.md"
        );
        assert_eq!(
            third.file_name().unwrap().to_str().unwrap(),
            "postmortem-2024-01-01T12-30-05Z-2.md"
        );
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_unwritable_directory_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let writer = PostmortemWriter::new(blocker.join("reports")).unwrap();
        let err = writer.write("x", fixed_now()).await.unwrap_err();
        assert!(matches!(err, crate::error::AppError::Io(_)));
    }

    #[test]
    fn test_relative_dir_is_made_absolute() {
        let writer = PostmortemWriter::new("reports/ops-healer").unwrap();
        assert!(writer.dir().is_absolute());
        assert!(writer.dir().ends_with("reports/ops-healer"));
    }
}
