//! Model weight loading
//!
//! Supported formats, chosen by file extension:
//! - `.safetensors`: candle safetensors
//! - `.pt` / `.pth`: PyTorch `state_dict` pickles
//! - `.bin`: bincode [`ModelBundle`] carrying its own [`ModelConfig`]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TranslitError};
use crate::llm::model::{ModelConfig, TransliterateNet};

/// Serialized weight file layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightFormat {
    SafeTensors,
    PyTorch,
    Bundle,
}

impl WeightFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("safetensors") => Ok(WeightFormat::SafeTensors),
            Some("pt") | Some("pth") => Ok(WeightFormat::PyTorch),
            Some("bin") => Ok(WeightFormat::Bundle),
            _ => Err(TranslitError::artifact(
                path,
                "unrecognized weight file extension (expected .safetensors, .pt, .pth or .bin)",
            )),
        }
    }
}

/// One named, flattened tensor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TensorData {
    pub name: String,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// Config plus every parameter tensor, bincode encoded
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelBundle {
    pub config: ModelConfig,
    pub tensors: Vec<TensorData>,
}

impl ModelBundle {
    /// Snapshot the variables of a `VarMap`
    pub fn from_varmap(config: ModelConfig, varmap: &VarMap) -> Result<Self> {
        let vars = varmap
            .data()
            .lock()
            .map_err(|_| candle_core::Error::Msg("variable map lock poisoned".into()))?;

        let mut tensors = Vec::with_capacity(vars.len());
        for (name, var) in vars.iter() {
            let tensor = var.as_tensor();
            tensors.push(TensorData {
                name: name.clone(),
                shape: tensor.dims().to_vec(),
                data: tensor.flatten_all()?.to_dtype(DType::F32)?.to_vec1::<f32>()?,
            });
        }
        tensors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ModelBundle { config, tensors })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| TranslitError::artifact(path, e))?;
        bincode::deserialize(&bytes).map_err(|e| TranslitError::artifact(path, e))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, bincode::serialize(self)?)?;
        Ok(())
    }

    fn into_tensors(self, device: &Device) -> Result<HashMap<String, Tensor>> {
        let mut map = HashMap::with_capacity(self.tensors.len());
        for TensorData { name, shape, data } in self.tensors {
            let tensor = Tensor::from_vec(data, shape, device)?;
            map.insert(name, tensor);
        }
        Ok(map)
    }
}

/// Build the network and fill it from a weight file
pub fn load_model(path: &Path, config: ModelConfig, device: &Device) -> Result<TransliterateNet> {
    let format = WeightFormat::from_path(path)?;
    if !path.is_file() {
        return Err(TranslitError::artifact(path, "file not found"));
    }

    let vb = match format {
        WeightFormat::SafeTensors => {
            let tensors = candle_core::safetensors::load(path, device)
                .map_err(|e| TranslitError::artifact(path, e))?;
            VarBuilder::from_tensors(tensors, DType::F32, device)
        }
        WeightFormat::PyTorch => VarBuilder::from_pth(path, DType::F32, device)
            .map_err(|e| TranslitError::artifact(path, e))?,
        WeightFormat::Bundle => {
            let bundle = ModelBundle::read(path)?;
            if bundle.config != config {
                return Err(TranslitError::ArchitectureMismatch {
                    expected: format!("{:?}", config),
                    found: format!("{:?}", bundle.config),
                });
            }
            VarBuilder::from_tensors(bundle.into_tensors(device)?, DType::F32, device)
        }
    };

    let model = TransliterateNet::new(config, vb).map_err(|e| TranslitError::ArchitectureMismatch {
        expected: format!("{:?}", config),
        found: e.to_string(),
    })?;
    info!(
        path = %path.display(),
        format = ?format,
        cell = %config.cell,
        feature_size = config.feature_size,
        "model weights loaded"
    );
    Ok(model)
}
