use crate::error::{AppError, AppResult};

/// Parses a JSON array of equal-length float arrays, one per catalog row.
///
/// Shape problems (ragged rows, zero dimensions, non-finite values) are caught
/// again when the embedding space is built; this only rejects what cannot be
/// read as vectors at all.
pub fn parse_vectors(bytes: &[u8]) -> AppResult<Vec<Vec<f32>>> {
    let vectors: Vec<Vec<f32>> = serde_json::from_slice(bytes)
        .map_err(|e| AppError::Data(format!("malformed vector artifact: {}", e)))?;

    if vectors.is_empty() {
        return Err(AppError::Data("vector artifact is empty".to_string()));
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_vectors() {
        let vectors = parse_vectors(b"[[0.1, 0.2], [0.3, 0.4]]").unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(parse_vectors(b"{\"a\": 1}"), Err(AppError::Data(_))));
        assert!(matches!(parse_vectors(b"[[0.1, \"x\"]]"), Err(AppError::Data(_))));
    }

    #[test]
    fn test_rejects_empty_array() {
        assert!(matches!(parse_vectors(b"[]"), Err(AppError::Data(_))));
    }
}
