use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};

/// Where the dispatcher looks for static files when no route matches.
#[async_trait]
pub trait FileSource: Send + Sync + 'static {
  /// Whether a file exists for the request path.
  async fn exists(&self, path: &str) -> bool;

  async fn read(&self, path: &str) -> io::Result<Bytes>;

  /// The content type to serve the file with, if known.
  fn content_type(&self, path: &str) -> Option<String> {
    mime_guess::from_path(path).first().map(|mime| mime.to_string())
  }
}

/// Serves files from a directory on disk, ex: `./Public`.
#[derive(Debug, Clone)]
pub struct PublicDir {
  root: PathBuf,
}

impl PublicDir {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Maps a request path onto the directory. Dot-segments, separators hidden
  /// in percent-encoding, and paths naming the root itself are refused.
  fn resolve(&self, path: &str) -> Option<PathBuf> {
    let mut resolved = self.root.clone();
    let mut depth = 0;

    for raw in path.split('/').filter(|s| !s.is_empty()) {
      let segment = percent_decode_str(raw).decode_utf8().ok()?;
      if segment == "." || segment == ".." || segment.contains(|c: char| c == '/' || c == '\\') {
        return None;
      }
      resolved.push(&*segment);
      depth += 1;
    }

    if depth == 0 {
      None
    } else {
      Some(resolved)
    }
  }
}

#[async_trait]
impl FileSource for PublicDir {
  async fn exists(&self, path: &str) -> bool {
    match self.resolve(path) {
      Some(file) => tokio::fs::metadata(file)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false),
      None => false,
    }
  }

  async fn read(&self, path: &str) -> io::Result<Bytes> {
    let file = self
      .resolve(path)
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path escapes the public directory"))?;
    tokio::fs::read(file).await.map(Bytes::from)
  }
}
