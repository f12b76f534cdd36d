//! Phrase-pair extraction consistent with a word alignment.
//!
//! Positions are 1-indexed throughout, matching the `(target, source)`
//! alignment points.

use crate::error::{Ibm1Error, Ibm1Result};
use crate::lexicon::Lexicon;
use crate::table::check_parallel;
use crate::text::Text;
use crate::types::*;

/// A target phrase and its source phrase, each a space-joined token span.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhrasePair {
    pub target: String,
    pub source: String,
}

/// Inclusive 1-indexed spans behind a [`PhrasePair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhraseSpan {
    pub target: (usize, usize),
    pub source: (usize, usize),
}

// For each source position, the lowest and highest target position linked to it.
struct SourceCoverage {
    ranges: Vec<Option<(usize, usize)>>,
}

impl SourceCoverage {
    fn new(source_len: usize, alignment: &[Link]) -> Self {
        let mut ranges: Vec<Option<(usize, usize)>> = vec![None; source_len + 1];
        for &(e, f) in alignment {
            ranges[f] = Some(match ranges[f] {
                None => (e, e),
                Some((lo, hi)) => (lo.min(e), hi.max(e)),
            });
        }
        SourceCoverage { ranges }
    }

    /// Whether source position `f` exists and links nowhere outside `[e_start, e_end]`.
    #[inline]
    fn fits(&self, f: usize, e_start: usize, e_end: usize) -> bool {
        if f == 0 || f >= self.ranges.len() {
            return false;
        }
        match self.ranges[f] {
            None => true,
            Some((lo, hi)) => lo >= e_start && hi <= e_end,
        }
    }
}

// Smallest source span covering every link from `[e_start, e_end]`.
fn bounding_box(alignment: &[Link], e_start: usize, e_end: usize) -> Option<(usize, usize)> {
    alignment
        .iter()
        .filter(|&&(e, _)| e_start <= e && e <= e_end)
        .fold(None, |acc, &(_, f)| match acc {
            None => Some((f, f)),
            Some((lo, hi)) => Some((lo.min(f), hi.max(f))),
        })
}

fn check_links(target_len: usize, source_len: usize, alignment: &[Link]) -> Ibm1Result<()> {
    for &(e, f) in alignment {
        if e == 0 || e > target_len || f == 0 || f > source_len {
            return Err(Ibm1Error::LinkOutOfBounds { link: (e, f), target_len, source_len });
        }
    }
    Ok(())
}

/// Every span pair consistent with `alignment`.
///
/// For each target span, the bounding source box must not contain a source
/// word linked outside the target span. A consistent box is then widened by
/// unaligned source words on either side, and every left/right boundary
/// combination is emitted: left boundaries outward from the box, right
/// boundaries outward for each left one.
pub fn extract_spans(target_len: usize, source_len: usize, alignment: &[Link]) -> Ibm1Result<Vec<PhraseSpan>> {
    check_links(target_len, source_len, alignment)?;
    let coverage = SourceCoverage::new(source_len, alignment);

    let mut spans = Vec::new();
    for e_start in 1..=target_len {
        for e_end in e_start..=target_len {
            let Some((f_start, f_end)) = bounding_box(alignment, e_start, e_end) else {
                continue;
            };
            if !(f_start..=f_end).all(|f| coverage.fits(f, e_start, e_end)) {
                continue;
            }

            let mut lefts = vec![f_start];
            while coverage.fits(f_start - lefts.len(), e_start, e_end) {
                lefts.push(f_start - lefts.len());
            }
            let mut rights = vec![f_end];
            while coverage.fits(f_end + rights.len(), e_start, e_end) {
                rights.push(f_end + rights.len());
            }

            for &f_s in &lefts {
                for &f_e in &rights {
                    spans.push(PhraseSpan { target: (e_start, e_end), source: (f_s, f_e) });
                }
            }
        }
    }
    Ok(spans)
}

fn join<S: AsRef<str>>(tokens: &[S], (start, end): (usize, usize)) -> String {
    tokens[start - 1..end]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Phrase pairs of one sentence pair, in extraction order.
pub fn extract_phrases<S: AsRef<str>>(
    target: &[S],
    source: &[S],
    alignment: &[Link],
) -> Ibm1Result<Vec<PhrasePair>> {
    let spans = extract_spans(target.len(), source.len(), alignment)?;
    Ok(spans
        .into_iter()
        .map(|span| PhrasePair {
            target: join(target, span.target),
            source: join(source, span.source),
        })
        .collect())
}

/// Word alignment of one sentence pair read off a lexicon.
///
/// Each target position links to at most one source position. The source
/// word is the best-scoring one present in the sentence (ties: smallest
/// word); if it occurs several times, the occurrence closest to the
/// diagonal wins (ties: leftmost). Target words with no scored candidate
/// stay unaligned.
pub fn sentence_alignment<S: AsRef<str>>(target: &[S], source: &[S], lexicon: &Lexicon) -> Vec<Link> {
    let (n_e, n_f) = (target.len(), source.len());
    let mut links = Vec::new();
    for (j, e) in target.iter().enumerate() {
        let Some(entry) = lexicon.get(e.as_ref()) else {
            continue;
        };

        let mut best: Option<(&str, Prob)> = None;
        for f in source.iter().map(AsRef::as_ref) {
            let Some(p) = entry.score(f) else { continue };
            let better = match best {
                None => true,
                Some((bf, bp)) => p > bp || (p == bp && f < bf),
            };
            if better {
                best = Some((f, p));
            }
        }
        let Some((word, _)) = best else { continue };

        let e_pos = j + 1;
        let f_pos = (1..=n_f)
            .filter(|&i| source[i - 1].as_ref() == word)
            .min_by_key(|&i| (i * n_e).abs_diff(e_pos * n_f));
        if let Some(f_pos) = f_pos {
            links.push((e_pos, f_pos));
        }
    }
    links
}

/// Phrase pairs of a whole parallel corpus, sentence by sentence.
pub fn extract_corpus(source: &Text, target: &Text, lexicon: &Lexicon) -> Ibm1Result<Vec<PhrasePair>> {
    check_parallel(source, target)?;

    let mut pairs = Vec::new();
    for (s, (src, tgt)) in source.sentences.iter().zip(&target.sentences).enumerate() {
        let f_words = src.words(&source.vocabulary);
        let e_words = tgt.words(&target.vocabulary);
        let alignment = sentence_alignment(&e_words, &f_words, lexicon);
        let phrases = extract_phrases(&e_words, &f_words, &alignment)?;
        log::debug!("sentence {s}: {} links, {} phrase pairs", alignment.len(), phrases.len());
        pairs.extend(phrases);
    }
    log::info!("extracted {} phrase pairs from {} sentences", pairs.len(), source.n_sentences());
    Ok(pairs)
}
