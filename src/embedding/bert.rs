use std::path::Path;
use std::sync::Arc;

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};

/// Files a BERT model directory must contain.
pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Returns the first required file missing from `model_dir`, if any.
pub fn missing_model_file(model_dir: &Path) -> Option<&'static str> {
    [CONFIG_FILE, WEIGHTS_FILE, TOKENIZER_FILE]
        .into_iter()
        .find(|file| !model_dir.join(file).exists())
}

fn read_config(model_dir: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(model_dir.join(CONFIG_FILE))?;
    serde_json::from_str(&content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

fn var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights = model_dir.join(WEIGHTS_FILE);
    unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device) }
}

/// Loads the encoder, accepting bare, `bert.`-prefixed and `roberta.`-prefixed checkpoints.
fn load_backbone(vb: &VarBuilder, config: &Config) -> Result<BertModel> {
    if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("bert"), config)
    } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("roberta"), config)
    } else {
        BertModel::load(vb.clone(), config)
    }
}

/// BERT encoder with masked mean pooling (sentence-transformers layout).
#[derive(Clone)]
pub struct BertEncoder {
    model: Arc<BertModel>,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = read_config(model_dir)?;
        let vb = var_builder(model_dir, device)?;
        let model = load_backbone(&vb, &config)?;

        Ok(Self {
            model: Arc::new(model),
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Returns `[batch, hidden]` mean-pooled embeddings over unmasked tokens.
    pub fn forward_pooled(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .model
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        summed.broadcast_div(&counts)
    }
}

struct BertForSequenceClassification {
    bert: BertModel,
    classifier: Linear,
}

impl BertForSequenceClassification {
    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.classifier.forward(&cls_token)
    }
}

/// BERT with a single-logit classification head (cross-encoder layout).
#[derive(Clone)]
pub struct BertClassifier(Arc<BertForSequenceClassification>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = read_config(model_dir)?;
        let vb = var_builder(model_dir, device)?;

        let bert = load_backbone(&vb, &config)?;
        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self(Arc::new(BertForSequenceClassification {
            bert,
            classifier,
        })))
    }

    /// Returns `[batch, 1]` raw relevance logits.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}
