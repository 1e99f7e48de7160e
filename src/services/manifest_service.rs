use std::path::Path;

use tracing::info;

use crate::models::ManifestEntry;
use crate::utils::{write_atomic, CollectorError};

/// Ascending by rank. Equal ranks fall back to id so the output does not
/// depend on the order enrichment finished in.
pub fn sort_by_rank(entries: &mut [ManifestEntry]) {
    entries.sort_by_key(|e| (e.rank, e.id));
}

/// Replace the manifest at `path` with `entries`, sorted by rank
pub async fn write_manifest(path: &Path, mut entries: Vec<ManifestEntry>) -> Result<usize, CollectorError> {
    sort_by_rank(&mut entries);

    let body = serde_json::to_vec(&entries)?;
    write_atomic(path, &body)
        .await
        .map_err(|e| CollectorError::io(path, e))?;

    info!("Wrote {} coins to {}", entries.len(), path.display());
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;
    use temp_dir::TempDir;

    fn entry(id: u64, rank: u32) -> ManifestEntry {
        ManifestEntry {
            id,
            name: format!("Coin {id}"),
            symbol: format!("C{id}"),
            rank,
            color: Color::FALLBACK,
            icon: String::new(),
        }
    }

    #[tokio::test]
    async fn test_manifest_is_sorted_by_rank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cryptocurrency.json");

        write_manifest(&path, vec![entry(10, 2), entry(20, 1), entry(30, 3)])
            .await
            .unwrap();

        let written: Vec<ManifestEntry> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let ranks: Vec<u32> = written.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(written[0].id, 20);
    }

    #[tokio::test]
    async fn test_rewriting_same_set_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cryptocurrency.json");

        write_manifest(&path, vec![entry(1, 5), entry(2, 5), entry(3, 1)]).await.unwrap();
        let first = std::fs::read(&path).unwrap();

        write_manifest(&path, vec![entry(3, 1), entry(2, 5), entry(1, 5)]).await.unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_manifest_is_replaced_not_merged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cryptocurrency.json");

        write_manifest(&path, vec![entry(1, 1), entry(2, 2)]).await.unwrap();
        write_manifest(&path, vec![entry(3, 1)]).await.unwrap();

        let written: Vec<ManifestEntry> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, vec![entry(3, 1)]);
    }
}
