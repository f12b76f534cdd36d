use hashbrown::HashMap;

use crate::lexicon::BestAlignment;
use crate::phrase::PhrasePair;
use crate::types::*;

/// Distinct words of one corpus, interned to dense ids.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    ids: HashMap<String, Token>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `word`, assigning the next free one on first sight.
    pub fn intern(&mut self, word: &str) -> Token {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as Token;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }

    pub fn id(&self, word: &str) -> Option<Token> {
        self.ids.get(word).copied()
    }

    /// Panics if `token` was not produced by this vocabulary.
    pub fn word(&self, token: Token) -> &str {
        &self.words[token as usize]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.ids.contains_key(word)
    }

    #[inline] pub fn len(&self) -> usize { self.words.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Collect the distinct words of a tokenized corpus.
pub fn build_vocabulary<S: AsRef<str>>(corpus: &[Vec<S>]) -> Vocabulary {
    let mut vocabulary = Vocabulary::new();
    for sentence in corpus {
        for word in sentence {
            vocabulary.intern(word.as_ref());
        }
    }
    vocabulary
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    #[inline] pub fn len(&self) -> usize { self.tokens.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn words<'v>(&self, vocabulary: &'v Vocabulary) -> Vec<&'v str> {
        self.tokens.iter().map(|&t| vocabulary.word(t)).collect()
    }
}

/// One side of a parallel corpus.
#[derive(Clone, Debug, Default)]
pub struct Text {
    pub sentences: Vec<Sentence>,
    pub vocabulary: Vocabulary,
}

impl Text {
    pub fn from_sentences<S: AsRef<str>>(corpus: &[Vec<S>]) -> Self {
        let mut vocabulary = Vocabulary::new();
        let sentences = corpus
            .iter()
            .map(|words| Sentence {
                tokens: words.iter().map(|w| vocabulary.intern(w.as_ref())).collect(),
            })
            .collect();
        Text { sentences, vocabulary }
    }

    #[inline] pub fn n_sentences(&self) -> usize { self.sentences.len() }
}

/// Parse one sentence per line, lowercased and split on whitespace.
///
/// Blank lines stay as empty sentences so line `i` of a corpus still pairs
/// with line `i` of its translation.
pub fn parse_plaintext(s: &str) -> Text {
    let corpus: Vec<Vec<String>> = s
        .lines()
        .map(|line| line.to_lowercase().split_whitespace().map(str::to_string).collect())
        .collect();
    Text::from_sentences(&corpus)
}

// One `target  --  source` line per phrase pair.
pub fn write_phrases(pairs: &[PhrasePair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&pair.target);
        out.push_str(PHRASE_DELIMITER);
        out.push_str(&pair.source);
        out.push('\n');
    }
    out
}

// Tab separated best alignment, most probable first.
pub fn write_ranked_alignment(
    best: &BestAlignment,
    target: &Vocabulary,
    source: &Vocabulary,
) -> String {
    let mut out = String::new();
    for (e, f, p) in best.ranked(target) {
        out.push_str(&format!("{}\t{}\t{}\n", target.word(e), source.word(f), p));
    }
    out
}
