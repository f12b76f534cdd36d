pub mod types;
pub mod error;
pub mod text;
pub mod table;
pub mod convergence;
pub mod em;
pub mod lexicon;
pub mod trace;
pub mod phrase;

pub use error::{DegenerateAlignment, Ibm1Error, Ibm1Result};
pub use text::{Text, Sentence, Vocabulary, build_vocabulary, parse_plaintext, write_phrases, write_ranked_alignment};
pub use table::TranslationTable;
pub use convergence::{Convergence, distance, is_converged};
pub use em::{TrainOptions, TrainResult, train, train_with, train_iteration};
pub use lexicon::{BestAlignment, LexicalEntry, Lexicon};
pub use trace::IterationTrace;
pub use phrase::{PhrasePair, PhraseSpan, extract_corpus, extract_phrases, sentence_alignment};
