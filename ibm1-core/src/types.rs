/// Interned word id, dense per language.
pub type Token = u32;

/// Lexical translation probability.
pub type Prob = f64;

/// Alignment point `(target_position, source_position)`, both 1-indexed.
pub type Link = (usize, usize);

pub const DEFAULT_EPSILON: Prob = 1e-5;
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Separator between the target and source phrase in phrase output.
pub const PHRASE_DELIMITER: &str = "  --  ";
