use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use crate::error::{AppError, AppResult};

use super::stop_words::ENGLISH_STOP_WORDS;
use super::{FeatureVector, SparseVector, VectorSpace};

/// Dense, symmetric item x item cosine similarity matrix stored row-major
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.values[start..start + self.size])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.row(row).and_then(|r| r.get(col).copied())
    }
}

/// TF-IDF vector space over unigrams and bigrams of the composite corpus.
///
/// Weights are raw term counts times a smoothed idf, `ln((1 + n) / (1 + df)) + 1`,
/// and every document vector is L2-normalized, so cosine similarity reduces to a
/// dot product.
pub struct LexicalSpace {
    vocabulary: BTreeMap<String, u32>,
    vectors: Vec<SparseVector>,
    matrix: SimilarityMatrix,
}

impl LexicalSpace {
    /// Fits the vocabulary over `corpus` and computes the full similarity matrix.
    pub fn fit(corpus: &[String]) -> AppResult<Self> {
        if corpus.is_empty() {
            return Err(AppError::Data("feature corpus is empty".to_string()));
        }

        let start = Instant::now();
        let documents: Vec<Vec<String>> = corpus.iter().map(|doc| analyze(doc)).collect();

        // Sorted vocabulary keeps dimension numbering independent of corpus order
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &documents {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(AppError::Data(
                "feature corpus produced an empty vocabulary".to_string(),
            ));
        }

        let n = documents.len() as f32;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (dim, (term, df)) in doc_freq.iter().enumerate() {
            vocabulary.insert(term.to_string(), dim as u32);
            idf.push(((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0);
        }

        let vectors: Vec<SparseVector> = documents
            .iter()
            .map(|terms| weigh(terms, &vocabulary, &idf))
            .collect();

        let matrix = pairwise_cosine(&vectors, vocabulary.len());

        tracing::info!(
            documents = vectors.len(),
            vocabulary = vocabulary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built TF-IDF similarity matrix"
        );

        Ok(Self {
            vocabulary,
            vectors,
            matrix,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

impl VectorSpace for LexicalSpace {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn vector_of(&self, index: usize) -> Option<FeatureVector<'_>> {
        self.vectors.get(index).map(FeatureVector::Sparse)
    }

    fn similarity_row(&self, index: usize) -> Option<Cow<'_, [f32]>> {
        self.matrix.row(index).map(Cow::Borrowed)
    }

    fn full_matrix(&self) -> Option<&SimilarityMatrix> {
        Some(&self.matrix)
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

/// Splits into word tokens of two or more characters, removes stop words, and
/// emits unigrams followed by space-joined bigrams of the remaining tokens.
fn analyze(text: &str) -> Vec<String> {
    let tokens: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !ENGLISH_STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect();

    let mut terms = tokens.clone();
    terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

fn weigh(terms: &[String], vocabulary: &BTreeMap<String, u32>, idf: &[f32]) -> SparseVector {
    let mut counts: HashMap<u32, f32> = HashMap::new();
    for term in terms {
        if let Some(&dim) = vocabulary.get(term) {
            *counts.entry(dim).or_insert(0.0) += 1.0;
        }
    }

    let mut entries: Vec<(u32, f32)> = counts
        .into_iter()
        .map(|(dim, tf)| (dim, tf * idf[dim as usize]))
        .collect();
    entries.sort_unstable_by_key(|(dim, _)| *dim);

    let mut vector = SparseVector { entries };
    let norm = vector.norm();
    if norm > 0.0 {
        for (_, w) in vector.entries.iter_mut() {
            *w /= norm;
        }
    }
    vector
}

/// Accumulates dot products through per-dimension posting lists. Vectors are
/// unit length, so the dot product is the cosine similarity.
fn pairwise_cosine(vectors: &[SparseVector], dims: usize) -> SimilarityMatrix {
    let size = vectors.len();
    let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); dims];
    for (doc, vector) in vectors.iter().enumerate() {
        for &(dim, w) in &vector.entries {
            postings[dim as usize].push((doc, w));
        }
    }

    let mut values = vec![0.0f32; size * size];
    for (doc, vector) in vectors.iter().enumerate() {
        let row = &mut values[doc * size..(doc + 1) * size];
        for &(dim, w) in &vector.entries {
            for &(other, other_w) in &postings[dim as usize] {
                row[other] += w * other_w;
            }
        }
    }

    SimilarityMatrix { size, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_analyze_drops_stop_words_and_short_tokens() {
        let terms = analyze("the dark knight a b rises");
        assert_eq!(
            terms,
            vec!["dark", "knight", "rises", "dark knight", "knight rises"]
        );
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        assert!(matches!(LexicalSpace::fit(&[]), Err(AppError::Data(_))));
    }

    #[test]
    fn test_fit_rejects_empty_vocabulary() {
        let result = LexicalSpace::fit(&corpus(&["", "the of and"]));
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_vocabulary_contains_bigrams() {
        let space = LexicalSpace::fit(&corpus(&["space marines", "space pirates"])).unwrap();
        assert!(space.contains_term("space marines"));
        assert!(space.contains_term("pirates"));
        assert_eq!(space.vocabulary_size(), 5);
    }

    #[test]
    fn test_self_similarity_is_maximal() {
        let space = LexicalSpace::fit(&corpus(&[
            "action adventure cameron cameron cameron",
            "action adventure cameron sequel",
            "romance drama ship iceberg",
        ]))
        .unwrap();

        for i in 0..space.len() {
            let row = space.similarity_row(i).unwrap();
            assert!((row[i] - 1.0).abs() < 1e-5);
            assert!(row.iter().all(|&s| s <= row[i] + 1e-6));
        }
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let space = LexicalSpace::fit(&corpus(&[
            "war drama soldiers",
            "war comedy soldiers",
            "space opera",
            "comedy romance",
        ]))
        .unwrap();
        let matrix = space.full_matrix().unwrap();

        for i in 0..matrix.size() {
            for j in 0..matrix.size() {
                let a = matrix.get(i, j).unwrap();
                let b = matrix.get(j, i).unwrap();
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_disjoint_documents_have_zero_similarity() {
        let space = LexicalSpace::fit(&corpus(&["pirates treasure", "iceberg ship"])).unwrap();
        assert_eq!(space.full_matrix().unwrap().get(0, 1), Some(0.0));
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let space = LexicalSpace::fit(&corpus(&["heist crew vault", "heist"])).unwrap();
        match space.vector_of(0) {
            Some(FeatureVector::Sparse(v)) => assert!((v.norm() - 1.0).abs() < 1e-6),
            other => panic!("expected sparse vector, got {:?}", other),
        }
        assert!(space.vector_of(2).is_none());
    }
}
