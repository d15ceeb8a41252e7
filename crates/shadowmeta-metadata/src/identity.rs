//! Owned writer identity.

use serde::{Deserialize, Serialize};
use shadowmeta_provider::{RawExtendedIdentity, RawIdentity, SourceKind, UsageKind};
use uuid::Uuid;

/// Identity of a writer instance.
///
/// Captured eagerly when a view adopts its handle and replaced wholesale
/// when metadata is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterIdentity {
    pub instance_id: Uuid,
    pub writer_id: Uuid,
    pub writer_name: String,
    /// Empty when only the base identity query is available.
    pub instance_name: String,
    pub usage: UsageKind,
    pub source: SourceKind,
}

impl WriterIdentity {
    pub(crate) fn from_base(raw: RawIdentity) -> Self {
        Self {
            instance_id: raw.instance_id,
            writer_id: raw.writer_id,
            writer_name: raw.writer_name,
            instance_name: String::new(),
            usage: raw.usage,
            source: raw.source,
        }
    }

    pub(crate) fn from_extended(raw: RawExtendedIdentity) -> Self {
        Self {
            instance_name: raw.instance_name,
            ..Self::from_base(raw.identity)
        }
    }
}
