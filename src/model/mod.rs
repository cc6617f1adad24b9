// Model capabilities - prediction and vocabulary seams
//
// The decoder consumes the trained seq2seq model and its vocabulary
// as opaque capabilities behind these traits. Production adapters
// live in the submodules; tests supply table-driven fakes.

pub mod onnx;
pub mod vocab;

pub use onnx::OnnxPredictor;
pub use vocab::JsonVocab;

use anyhow::Result;
use ndarray::Array2;

/// Padding token id, implicit in every vocabulary.
pub const PAD_ID: u32 = 0;

/// Step-by-step next-token scorer over a fixed vocabulary.
pub trait Predictor {
    /// Score one decoding state.
    ///
    /// `input_ids` is the padded query sequence, `decoder_ids` the
    /// partial output sequence. Returns one row of vocabulary-wide
    /// scores per output position.
    fn predict(&mut self, input_ids: &[u32], decoder_ids: &[u32]) -> Result<Array2<f32>>;
}

/// Token vocabulary: free text to ids and ids back to words.
pub trait Vocab {
    /// Tokenize `text` into ids (no padding applied here).
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Word for `id`. An id absent from the vocabulary is an error.
    fn word(&self, id: u32) -> Result<String>;

    /// Start-of-sequence token id.
    fn sos_id(&self) -> u32;

    /// End-of-sequence token id.
    fn eos_id(&self) -> u32;
}
