// ONNX predictor - wraps an ort session over the exported seq2seq model
//
// The model takes two int64 sequences (padded query ids, partial
// decoder ids) and produces one score row per output position:
// shape [1, positions, vocab].

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::{debug, info};

use super::Predictor;

pub struct OnnxPredictor {
    session: Session,
    query_input: String,
    decoder_input: String,
    output: String,
}

impl OnnxPredictor {
    /// Load the model and record its input/output names. The first
    /// graph input carries the query sequence, the second the partial
    /// decoder sequence.
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading ONNX model: {}", path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)?
            .with_intra_threads(4)
            .map_err(ort::Error::<()>::from)?
            .commit_from_file(path)
            .map_err(ort::Error::<()>::from)
            .with_context(|| format!("Failed to create ONNX session from {:?}", path))?;

        if session.inputs().len() != 2 {
            bail!(
                "Expected 2 model inputs (query, decoder state), found {}",
                session.inputs().len()
            );
        }
        let query_input = session.inputs()[0].name().to_string();
        let decoder_input = session.inputs()[1].name().to_string();
        let output = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .context("Model has no outputs")?;

        debug!(
            "Model inputs: {} / {}, output: {}",
            query_input, decoder_input, output
        );

        Ok(Self {
            session,
            query_input,
            decoder_input,
            output,
        })
    }

    fn batch_of_one(ids: &[u32]) -> Result<Tensor<i64>> {
        let values: Vec<i64> = ids.iter().map(|&id| i64::from(id)).collect();
        let array = Array2::from_shape_vec((1, ids.len()), values)
            .context("Failed to shape input tensor")?;
        Tensor::from_array(array).context("Failed to create input tensor")
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&mut self, input_ids: &[u32], decoder_ids: &[u32]) -> Result<Array2<f32>> {
        let query = Self::batch_of_one(input_ids)?;
        let decoder = Self::batch_of_one(decoder_ids)?;

        let outputs = self
            .session
            .run(ort::inputs![
                self.query_input.as_str() => query,
                self.decoder_input.as_str() => decoder,
            ])
            .context("Model inference failed")?;

        let (shape, data) = outputs[self.output.as_str()]
            .try_extract_tensor::<f32>()
            .context("Failed to extract prediction tensor")?;

        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        if dims.len() != 3 || dims[0] != 1 {
            bail!("Unexpected prediction shape: {:?}", dims);
        }

        Array2::from_shape_vec((dims[1], dims[2]), data.to_vec())
            .context("Failed to shape prediction matrix")
    }
}
