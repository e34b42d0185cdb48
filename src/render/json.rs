//! JSON rendering of conversion results.

use crate::error::{Error, Result};
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value (usually a `ConvertResult`) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitKind;
    use crate::render::ConversionMeta;

    #[test]
    fn test_to_json_pretty() {
        let mut meta = ConversionMeta::new(UnitKind::Slide);
        meta.unit_count = 3;

        let json = to_json(&meta, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"unit_kind\": \"slide\""));
        assert!(json.contains("\"unit_count\": 3"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let meta = ConversionMeta::new(UnitKind::Page);
        let json = to_json(&meta, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }
}
