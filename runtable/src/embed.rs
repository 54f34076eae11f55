//! Text embedding of encoded tables.
//!
//! Generated tables are shipped as text: the field stream is base64-encoded
//! (standard alphabet, padded) and stored next to the configuration and the
//! values table in an [`EncodedTable`] artifact.

use std::hash::Hash;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde::Serialize;

use crate::codec::DecodeError;
use crate::codec::EncodeError;
use crate::codec::Encodable;
use crate::config::CodecConfig;
use crate::RunLengthCodec;
use crate::RunTable;
use crate::Runs;
use crate::ValueTable;

/// Encodes bytes as standard, padded base64.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard, padded base64.
pub fn from_base64(text: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(text)?)
}

/// A generated table: everything a decoder needs, in serializable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedTable<V> {
    /// Name the table is exported under.
    pub name: String,
    /// Field layout and domain.
    #[serde(flatten)]
    pub config: CodecConfig,
    /// The field stream, base64-encoded.
    pub data: String,
    /// Values in index order.
    pub values: Vec<V>,
}

impl<V> EncodedTable<V> {
    /// Encodes `runs` and bundles the result with `values`.
    #[tracing::instrument(skip_all, fields(name = %name))]
    pub fn generate(
        name: &str,
        runs: &Runs,
        values: ValueTable<V>,
        config: CodecConfig,
    ) -> Result<Self, EncodeError> {
        let bytes = runs.encode(&config)?;
        let data = to_base64(&bytes);

        tracing::info!(
            runs = runs.len(),
            bytes = bytes.len(),
            base64 = data.len(),
            values = values.len(),
            value_bits = config.value_bits(),
            "generated table"
        );

        Ok(Self {
            name: name.to_string(),
            config,
            data,
            values: values.into_vec(),
        })
    }

    /// Decodes the base64 payload back into the field stream.
    pub fn bytes(&self) -> Result<Vec<u8>, DecodeError> {
        from_base64(&self.data)
    }

    /// Parses the payload into a run table.
    pub fn table(&self) -> Result<RunTable, DecodeError> {
        RunTable::parse(&self.bytes()?, self.config)
    }
}

impl<V: Eq + Hash + Clone> EncodedTable<V> {
    /// Parses the payload into a codec resolving to the table's values.
    pub fn into_codec(self) -> Result<RunLengthCodec<ValueTable<V>>, DecodeError> {
        let table = self.table()?;
        Ok(RunLengthCodec::new(table, ValueTable::from_vec(self.values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LookupError;
    use crate::RunBuilder;
    use assert_matches::assert_matches;

    fn scenario() -> EncodedTable<String> {
        let mut values = ValueTable::new();
        let runs = RunBuilder::from_values(
            ["XX", "XX", "XX", "AL", "AL", "XX"].map(String::from),
            &mut values,
        )
        .unwrap();
        let config = CodecConfig::try_new(4, 32, 5).unwrap();

        EncodedTable::generate("u_test", &runs, values, config).unwrap()
    }

    #[test]
    fn test_base64_payload() {
        let table = scenario();
        // [0x20, 0x11, 0x00]
        assert_eq!(table.data, "IBEA");
        assert_eq!(table.bytes(), Ok(vec![0x20, 0x11, 0x00]));
        assert_eq!(table.values, vec!["XX", "AL"]);
    }

    #[test]
    fn test_json_round_trip_into_codec() {
        let json = serde_json::to_string(&scenario()).unwrap();
        let table: EncodedTable<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(table.name, "u_test");

        let codec = table.into_codec().unwrap();
        assert_eq!(codec.decode(2).as_deref(), Ok("XX"));
        assert_eq!(codec.decode(3).as_deref(), Ok("AL"));
        assert_eq!(codec.decode(6), Err(LookupError::OutOfDomain { key: 6, domain_max: 5 }));
    }

    #[test]
    fn test_invalid_base64() {
        let mut table = scenario();
        table.data = "not base64!".to_string();
        assert_matches!(table.table(), Err(DecodeError::InvalidBase64(_)));
    }
}
