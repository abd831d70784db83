//! Driver identifier.
//!
//! Drivers are keyed by their permanent car number. The number is
//! serialized as a bare integer, which `serde_json` renders as a string
//! when it is used as an object key (`{"44": [...]}`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A driver's permanent car number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct DriverNumber(pub u32);

impl DriverNumber {
    /// Return the inner car number.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for DriverNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DriverNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn map_keys_render_as_strings_in_numeric_order() {
        let mut map = BTreeMap::new();
        map.insert(DriverNumber(44), "HAM");
        map.insert(DriverNumber(1), "VER");
        map.insert(DriverNumber(11), "PER");

        let json = serde_json::to_string(&map).ok();
        assert_eq!(
            json.as_deref(),
            Some(r#"{"1":"VER","11":"PER","44":"HAM"}"#)
        );
    }

    #[test]
    fn map_keys_parse_back_from_strings() {
        let parsed: Result<BTreeMap<DriverNumber, String>, _> =
            serde_json::from_str(r#"{"16":"LEC","55":"SAI"}"#);
        let parsed = parsed.ok().unwrap_or_default();
        assert_eq!(parsed.get(&DriverNumber(16)).map(String::as_str), Some("LEC"));
        assert_eq!(parsed.len(), 2);
    }
}
