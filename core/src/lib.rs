pub mod index;
pub mod persist;
pub mod preprocess;
pub mod query;
pub mod scorer;

pub use index::{DocId, DocMeta, InvertedIndex, Posting};
pub use preprocess::{detect_script, preprocess, Language};
pub use scorer::{Bm25Params, Bm25Scorer, SearchHit, SearchResults};
