use ibm1_core::{
    extract_corpus, parse_plaintext, train, write_phrases, write_ranked_alignment, BestAlignment,
    Lexicon, TrainOptions,
};
use wasm_bindgen::prelude::*;

fn js_err(e: ibm1_core::Ibm1Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct TrainOutput {
    model_json: String,
    alignment_json: String,
    alignment_text: String,
    iterations: usize,
    delta: Option<f64>,
    converged: bool,
}

#[wasm_bindgen]
impl TrainOutput {
    /// Full table: target word to source word to probability.
    #[wasm_bindgen(getter)]
    pub fn model_json(&self) -> String {
        self.model_json.clone()
    }
    /// Best source word per target word.
    #[wasm_bindgen(getter)]
    pub fn alignment_json(&self) -> String {
        self.alignment_json.clone()
    }
    #[wasm_bindgen(getter)]
    pub fn alignment_text(&self) -> String {
        self.alignment_text.clone()
    }
    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> Option<f64> {
        self.delta
    }
    #[wasm_bindgen(getter)]
    pub fn converged(&self) -> bool {
        self.converged
    }
}

#[wasm_bindgen]
pub fn train_plaintext(
    source_text: &str,
    target_text: &str,
    epsilon: f64,
    max_iterations: usize,
    with_probability: bool,
) -> Result<TrainOutput, JsValue> {
    let source = parse_plaintext(source_text);
    let target = parse_plaintext(target_text);
    let opts = TrainOptions { epsilon, max_iterations };
    let res = train(&source, &target, &opts).map_err(js_err)?;

    let (tv, sv) = (&target.vocabulary, &source.vocabulary);
    let best = BestAlignment::select(&res.table, sv);
    Ok(TrainOutput {
        model_json: Lexicon::from_table(&res.table, tv, sv).to_json().map_err(js_err)?,
        alignment_json: Lexicon::from_best(&best, tv, sv, with_probability)
            .to_json()
            .map_err(js_err)?,
        alignment_text: write_ranked_alignment(&best, tv, sv),
        iterations: res.iterations,
        delta: res.convergence.map(|c| c.delta),
        converged: res.converged(),
    })
}

/// Phrase pairs as `target  --  source` lines.
#[wasm_bindgen]
pub fn extract_plaintext(
    source_text: &str,
    target_text: &str,
    alignment_json: &str,
) -> Result<String, JsValue> {
    let source = parse_plaintext(source_text);
    let target = parse_plaintext(target_text);
    let lexicon = Lexicon::from_json(alignment_json).map_err(js_err)?;
    let pairs = extract_corpus(&source, &target, &lexicon).map_err(js_err)?;
    Ok(write_phrases(&pairs))
}
