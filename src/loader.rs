use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(thiserror::Error, Debug)]
#[error("Failed to read {}: {source}", path.display())]
pub struct Err {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

impl Err {
    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}

/// Reads the whole compressed mesh artifact into memory.
pub async fn load_mesh(path: &Path) -> Result<Vec<u8>, Err> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| Err { path: path.to_owned(), source })?;
    debug!(path = %path.display(), bytes = data.len(), "loaded compressed mesh");
    Ok(data)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = load_mesh(Path::new("no/such/compressed_mesh.drc")).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("no/such/compressed_mesh.drc"), "{err}");
    }

    #[tokio::test]
    async fn reads_all_bytes() {
        let path = std::env::temp_dir().join(format!("draco-geo-loader-{}.drc", std::process::id()));
        std::fs::write(&path, [1_u8, 2, 3]).unwrap();
        let data = load_mesh(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }
}
