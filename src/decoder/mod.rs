// Greedy autoregressive decoder
//
// Turns one query into one response by querying the predictor one
// output position at a time and always taking the highest-scoring
// token. The loop is bounded: at most MAX_DECODE_STEPS predictor
// calls, whether or not the model ever emits <eos>.

use anyhow::{Context, Result};
use ndarray::ArrayView1;
use tracing::debug;

use crate::model::{Predictor, Vocab, PAD_ID};

/// Fixed length the query is padded/truncated to.
pub const QUERY_LEN: usize = 32;

/// Decoder buffer length: one slot for <sos> plus the generated ids.
pub const RESPONSE_SLOTS: usize = 31;

/// Upper bound on predictor calls per response.
pub const MAX_DECODE_STEPS: usize = 30;

// The assembled text starts with the "<sos> " marker; drop it.
const MARKER_PREFIX_LEN: usize = 6;

/// Generate a response for `query`.
///
/// Predictor and vocabulary failures are not retried or softened
/// here; they propagate to the session as fatal for the turn.
pub fn respond(query: &str, predictor: &mut dyn Predictor, vocab: &dyn Vocab) -> Result<String> {
    let mut input_ids = vocab.encode(query)?;
    debug!("Query tokenized to {} ids", input_ids.len());

    // Pad to the model's fixed input width. Over-long queries keep
    // their tail, matching the training-time padding.
    if input_ids.len() > QUERY_LEN {
        input_ids.drain(..input_ids.len() - QUERY_LEN);
    }
    input_ids.resize(QUERY_LEN, PAD_ID);

    let mut output_ids = vec![PAD_ID; RESPONSE_SLOTS];
    output_ids[0] = vocab.sos_id();
    let eos_id = vocab.eos_id();

    let mut steps = 0;
    for x in 0..MAX_DECODE_STEPS {
        // The predictor's own diagnostics stay out of the transcript:
        // each call runs under a no-op subscriber.
        let scores = tracing::subscriber::with_default(
            tracing::subscriber::NoSubscriber::default(),
            || predictor.predict(&input_ids, &output_ids),
        )?;
        steps += 1;

        if scores.nrows() <= x {
            anyhow::bail!(
                "Predictor returned {} positions, need at least {}",
                scores.nrows(),
                x + 1
            );
        }

        let predicted_id = argmax(scores.row(x));
        if predicted_id == eos_id {
            debug!("End of sequence after {} steps", steps);
            break;
        }
        output_ids[x + 1] = predicted_id;
    }
    debug!("Decoded in {} predictor calls", steps);

    detokenize(&output_ids, eos_id, vocab)
}

/// Highest-scoring id; ties break toward the lowest id.
fn argmax(row: ArrayView1<f32>) -> u32 {
    let mut best_id = 0usize;
    let mut best_score = f32::NEG_INFINITY;
    for (id, &score) in row.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best_id = id;
        }
    }
    best_id as u32
}

/// Walk the buffer up to the first <eos> or pad, map ids to words,
/// join with spaces, and strip the leading marker text.
fn detokenize(output_ids: &[u32], eos_id: u32, vocab: &dyn Vocab) -> Result<String> {
    let mut words = Vec::new();
    for &id in output_ids {
        if id == eos_id || id == PAD_ID {
            break;
        }
        words.push(vocab.word(id).context("Detokenization failed")?);
    }

    let assembled = words.join(" ");
    Ok(assembled
        .get(MARKER_PREFIX_LEN..)
        .unwrap_or_default()
        .to_string())
}
