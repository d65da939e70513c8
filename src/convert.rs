use crate::{
    error::Error,
    query::{IndexValue, ToIndexValue},
};

/// Write-direction value conversion: turns one bound argument into the value
/// the backend stores and compares.
pub trait Conversions: Send + Sync {
    fn convert_on_write(&self, value: &dyn ToIndexValue) -> Result<IndexValue, Error>;
}

/// Uses each argument's own [`ToIndexValue`] impl.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConversions;

impl Conversions for DefaultConversions {
    fn convert_on_write(&self, value: &dyn ToIndexValue) -> Result<IndexValue, Error> {
        Ok(value.to_index_value())
    }
}
