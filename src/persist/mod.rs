//! Scene payload stored in the host's per-scene extended data.

pub mod envelope;

pub use envelope::Envelope;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Serialized `LightSetting` collection.
pub const LIGHT_DATA_KEY: &str = "lightDataBytes";
/// Serialized `ReflectionProbeSetting` collection.
pub const REFLECTION_PROBE_KEY: &str = "reflectionProbeBytes";
/// Set when the default reflection probe was active at save time.
pub const DEFAULT_PROBE_FLAG_KEY: &str = "containsDefaultReflectionProbeData";
/// Global render settings, encoded as a preset.
pub const PRESET_KEY: &str = "presetBytes";

pub const PLUGIN_DATA_VERSION: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("blob is truncated ({len} bytes)")]
    Truncated { len: usize },
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u32),
    #[error("payload digest mismatch")]
    DigestMismatch,
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PluginValue {
    Bytes(Vec<u8>),
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Generic key/value payload the host attaches to a save file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PluginData {
    pub version: i32,
    pub data: BTreeMap<String, PluginValue>,
}

impl Default for PluginData {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginData {
    pub fn new() -> Self {
        Self {
            version: PLUGIN_DATA_VERSION,
            data: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: &str, value: PluginValue) {
        self.data.insert(key.to_string(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        match self.data.get(key) {
            Some(PluginValue::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Missing or non-boolean entries read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.data.get(key), Some(PluginValue::Bool(true)))
    }

    /// Decode a record collection stored under `key`. `None` when the key is absent.
    pub fn records<T: DeserializeOwned>(&self, key: &str) -> Option<Result<Vec<T>>> {
        self.bytes(key).map(decode_records)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        Ok(Envelope::SCENE.seal(&payload))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let payload = Envelope::SCENE.open(bytes)?;
        let (data, _) = bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
        Ok(data)
    }
}

pub fn encode_records<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(records, bincode::config::standard())?)
}

pub fn decode_records<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let (records, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(records)
}

/// The host's per-scene extended data slot.
pub trait ExtendedDataStore {
    fn extended_data(&self) -> Option<PluginData>;
    fn set_extended_data(&mut self, data: PluginData);
}

impl ExtendedDataStore for Option<PluginData> {
    fn extended_data(&self) -> Option<PluginData> {
        self.clone()
    }

    fn set_extended_data(&mut self, data: PluginData) {
        *self = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemoryScene;
    use crate::scene::LightType;
    use crate::settings::{LightAliases, LightSetting};

    #[test]
    fn test_records_roundtrip_through_plugin_data() {
        let mut scene = MemoryScene::new();
        let light = scene.add_light("Sun", None, LightType::Directional, Some(3));
        let records = vec![LightSetting::fill_from(&scene, light, &LightAliases::new())];

        let mut data = PluginData::new();
        data.insert(LIGHT_DATA_KEY, PluginValue::Bytes(encode_records(&records).unwrap()));
        data.insert(DEFAULT_PROBE_FLAG_KEY, PluginValue::Bool(true));

        let loaded = PluginData::from_bytes(&data.to_bytes().unwrap()).unwrap();
        assert_eq!(loaded, data);
        assert!(loaded.flag(DEFAULT_PROBE_FLAG_KEY));
        let decoded: Vec<LightSetting> = loaded.records(LIGHT_DATA_KEY).unwrap().unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_missing_keys() {
        let data = PluginData::new();
        assert!(!data.flag(DEFAULT_PROBE_FLAG_KEY));
        assert!(data.records::<LightSetting>(LIGHT_DATA_KEY).is_none());
    }

    #[test]
    fn test_garbage_record_bytes_fail_to_decode() {
        let mut data = PluginData::new();
        data.insert(LIGHT_DATA_KEY, PluginValue::Bytes(vec![0xFF; 3]));
        assert!(data.records::<LightSetting>(LIGHT_DATA_KEY).unwrap().is_err());
    }
}
