/// Configuration error variants.
#[derive(Debug, thiserror::Error)]
pub enum GenConfigError {
    /// The field layout is invalid.
    #[error("invalid codec settings: {0}")]
    Codec(#[from] runtable::ConfigError),

    /// An explicit `codec.value_bits` is too narrow for the values found in
    /// the input.
    #[error("codec.value_bits ({value_bits}) cannot index {value_count} values")]
    ValueBitsTooNarrow {
        /// The configured width
        value_bits: u8,
        /// Number of distinct values in the input
        value_count: usize,
    },
}
