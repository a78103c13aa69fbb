//! Local file transport for development and testing without network.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::source::{
    FetchRequest, FetchResponse, FetchTransport, ReadChunks, StreamingResult, DEFAULT_CHUNK_SIZE,
};

/// Transport that answers every request with the contents of one local file.
///
/// The request URL is ignored. The file size is reported as the content
/// length, so progress behaves like a well-behaved HTTP server.
pub struct LocalTransport {
    path: PathBuf,
    id: String,
    chunk_size: usize,
}

impl LocalTransport {
    /// Serves `path` using the default chunk size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be inspected.
    pub fn open<P: AsRef<Path>>(path: P) -> StreamingResult<Self> {
        let path = path.as_ref().to_path_buf();
        // Fail early rather than on the first request.
        std::fs::metadata(&path)?;
        let id = path.to_string_lossy().into_owned();

        Ok(Self {
            path,
            id,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Sets the number of bytes delivered per chunk.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns the path to the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FetchTransport for LocalTransport {
    fn send(&self, request: &FetchRequest) -> StreamingResult<FetchResponse> {
        let file = File::open(&self.path)?;
        let size = file.metadata()?.len();

        tracing::debug!(url = %request.url, path = %self.id, size, "serving local file");

        Ok(FetchResponse::new(
            Some(size.to_string()),
            Box::new(ReadChunks::new(file, self.chunk_size)),
        ))
    }

    fn transport_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn local_transport_chunks_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"Hello, World!").unwrap();
        temp.flush().unwrap();

        let transport = LocalTransport::open(temp.path()).unwrap().with_chunk_size(5);
        let response = transport.send(&FetchRequest::get("ignored")).unwrap();
        assert_eq!(response.declared_total(), 13);

        let mut body = response.body.unwrap();
        let mut chunks = Vec::new();
        while let Some(chunk) = body.next_chunk().unwrap() {
            chunks.push(chunk);
        }
        assert_eq!(chunks, vec![b"Hello".to_vec(), b", Wor".to_vec(), b"ld!".to_vec()]);
    }

    #[test]
    fn local_transport_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalTransport::open(dir.path().join("missing.json")).is_err());
    }
}
