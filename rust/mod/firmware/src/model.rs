use serde::{Deserialize, Serialize};

/// Firmware — a firmware image registered on the ledger.
///
/// Stored as flat JSON under an externally chosen firmware number. The
/// field names are part of the stored format and must not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Firmware {
    /// Record identifier. Independent of the world-state key.
    pub id: String,

    pub name: String,

    pub version: String,

    /// Location of the image.
    pub path: String,

    /// Release date, as supplied by the caller.
    pub date: String,

    /// Service number the firmware belongs to.
    pub service_number_id: String,
}
