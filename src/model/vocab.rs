// Vocabulary adapter backed by a tokenizers tokenizer.json file

use anyhow::{Context, Result};
use std::path::Path;
use tokenizers::Tokenizer;

use super::Vocab;

/// [`Vocab`] implementation over a `tokenizers` file. The `<sos>` and
/// `<eos>` marker ids are resolved once at load time; a vocabulary
/// without them is unusable for decoding and fails here rather than
/// mid-session.
pub struct JsonVocab {
    tokenizer: Tokenizer,
    sos_id: u32,
    eos_id: u32,
}

impl JsonVocab {
    pub fn from_file(path: &Path) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer from {:?}: {}", path, e))?;

        let sos_id = tokenizer
            .token_to_id("<sos>")
            .with_context(|| format!("Tokenizer {:?} has no <sos> token", path))?;
        let eos_id = tokenizer
            .token_to_id("<eos>")
            .with_context(|| format!("Tokenizer {:?} has no <eos> token", path))?;

        Ok(Self {
            tokenizer,
            sos_id,
            eos_id,
        })
    }
}

impl Vocab for JsonVocab {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        // The model supplies its own markers; don't let the tokenizer
        // add special tokens.
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn word(&self, id: u32) -> Result<String> {
        self.tokenizer
            .id_to_token(id)
            .with_context(|| format!("Token id {} missing from vocabulary", id))
    }

    fn sos_id(&self) -> u32 {
        self.sos_id
    }

    fn eos_id(&self) -> u32 {
        self.eos_id
    }
}
