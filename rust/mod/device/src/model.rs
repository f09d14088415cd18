use serde::{Deserialize, Serialize};

/// Device — a registered device and the firmware version it runs.
///
/// Immutable once written; replace it by deleting and creating again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub id: String,

    pub uuid: String,

    /// Service number. Stored all-lowercase as `servicenumber`.
    pub servicenumber: String,

    pub version: String,

    pub date: String,
}
