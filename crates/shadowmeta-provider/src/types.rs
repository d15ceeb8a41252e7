//! Wire-level enumerations and bit sets shared by the provider contracts.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// How a writer's data is used by the host system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UsageKind {
    #[default]
    Undefined,
    /// Data needed to boot the system.
    BootableSystemState,
    /// Data owned by a system service.
    SystemService,
    /// Application or user data.
    UserData,
    Other,
}

/// Where a writer's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceKind {
    #[default]
    Undefined,
    /// A database with transaction logging.
    TransactedDb,
    /// A database without transaction logging.
    NonTransactedDb,
    Other,
}

/// How a writer's data should be put back during restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RestoreMethodKind {
    #[default]
    Undefined,
    RestoreIfNotThere,
    RestoreIfCanReplace,
    StopRestoreStart,
    RestoreToAlternateLocation,
    RestoreAtReboot,
    RestoreAtRebootIfCannotReplace,
    Custom,
    RestoreStopStart,
}

/// Under what condition the writer itself participates in restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WriterRestoreCondition {
    #[default]
    Undefined,
    Never,
    IfCanBeRecovered,
    Always,
}

/// Kind of a writer component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComponentKind {
    #[default]
    Undefined,
    Database,
    FileGroup,
}

/// Bit set of backup schemas a writer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BackupSchema(u32);

impl BackupSchema {
    pub const UNDEFINED: BackupSchema = BackupSchema(0);
    pub const DIFFERENTIAL: BackupSchema = BackupSchema(0x0001);
    pub const INCREMENTAL: BackupSchema = BackupSchema(0x0002);
    pub const EXCLUSIVE_INCREMENTAL_DIFFERENTIAL: BackupSchema = BackupSchema(0x0004);
    pub const LOG: BackupSchema = BackupSchema(0x0008);
    pub const COPY: BackupSchema = BackupSchema(0x0010);
    pub const TIMESTAMPED: BackupSchema = BackupSchema(0x0020);
    pub const LAST_MODIFY: BackupSchema = BackupSchema(0x0040);
    pub const LSN: BackupSchema = BackupSchema(0x0080);
    pub const WRITER_SUPPORTS_NEW_TARGET: BackupSchema = BackupSchema(0x0100);
    pub const INDEPENDENT_SYSTEM_STATE: BackupSchema = BackupSchema(0x0200);
    pub const ROLLFORWARD_RESTORE: BackupSchema = BackupSchema(0x1000);
    pub const RESTORE_RENAME: BackupSchema = BackupSchema(0x2000);
    pub const AUTHORITATIVE_RESTORE: BackupSchema = BackupSchema(0x4000);
    pub const WRITER_SUPPORTS_PARALLEL_RESTORES: BackupSchema = BackupSchema(0x8000);

    pub const fn from_bits(bits: u32) -> Self {
        BackupSchema(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: BackupSchema) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for BackupSchema {
    type Output = BackupSchema;

    fn bitor(self, rhs: BackupSchema) -> BackupSchema {
        BackupSchema(self.0 | rhs.0)
    }
}

impl BitOrAssign for BackupSchema {
    fn bitor_assign(&mut self, rhs: BackupSchema) {
        self.0 |= rhs.0;
    }
}

/// Bit set of backup and snapshot requirements for a described file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FileBackupMask(u32);

impl FileBackupMask {
    pub const FULL_BACKUP_REQUIRED: FileBackupMask = FileBackupMask(0x0001);
    pub const DIFFERENTIAL_BACKUP_REQUIRED: FileBackupMask = FileBackupMask(0x0002);
    pub const INCREMENTAL_BACKUP_REQUIRED: FileBackupMask = FileBackupMask(0x0004);
    pub const LOG_BACKUP_REQUIRED: FileBackupMask = FileBackupMask(0x0008);
    pub const ALL_BACKUP_REQUIRED: FileBackupMask = FileBackupMask(0x000f);
    pub const FULL_SNAPSHOT_REQUIRED: FileBackupMask = FileBackupMask(0x0100);
    pub const DIFFERENTIAL_SNAPSHOT_REQUIRED: FileBackupMask = FileBackupMask(0x0200);
    pub const INCREMENTAL_SNAPSHOT_REQUIRED: FileBackupMask = FileBackupMask(0x0400);
    pub const LOG_SNAPSHOT_REQUIRED: FileBackupMask = FileBackupMask(0x0800);
    pub const ALL_SNAPSHOT_REQUIRED: FileBackupMask = FileBackupMask(0x0f00);

    pub const fn from_bits(bits: u32) -> Self {
        FileBackupMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: FileBackupMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FileBackupMask {
    type Output = FileBackupMask;

    fn bitor(self, rhs: FileBackupMask) -> FileBackupMask {
        FileBackupMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileBackupMask {
    fn bitor_assign(&mut self, rhs: FileBackupMask) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_schema_contains() {
        let schema = BackupSchema::DIFFERENTIAL | BackupSchema::INCREMENTAL;
        assert!(schema.contains(BackupSchema::DIFFERENTIAL));
        assert!(schema.contains(BackupSchema::INCREMENTAL));
        assert!(!schema.contains(BackupSchema::LOG));
        assert!(schema.contains(BackupSchema::UNDEFINED));
    }

    #[test]
    fn test_backup_schema_or_assign() {
        let mut schema = BackupSchema::UNDEFINED;
        assert!(schema.is_empty());
        schema |= BackupSchema::COPY;
        assert_eq!(schema.bits(), 0x0010);
    }

    #[test]
    fn test_file_backup_mask_aggregates() {
        let all = FileBackupMask::FULL_BACKUP_REQUIRED
            | FileBackupMask::DIFFERENTIAL_BACKUP_REQUIRED
            | FileBackupMask::INCREMENTAL_BACKUP_REQUIRED
            | FileBackupMask::LOG_BACKUP_REQUIRED;
        assert_eq!(all, FileBackupMask::ALL_BACKUP_REQUIRED);
        assert!(FileBackupMask::ALL_SNAPSHOT_REQUIRED.contains(FileBackupMask::LOG_SNAPSHOT_REQUIRED));
    }

    #[test]
    fn test_enum_defaults_are_undefined() {
        assert_eq!(UsageKind::default(), UsageKind::Undefined);
        assert_eq!(SourceKind::default(), SourceKind::Undefined);
        assert_eq!(RestoreMethodKind::default(), RestoreMethodKind::Undefined);
        assert_eq!(
            WriterRestoreCondition::default(),
            WriterRestoreCondition::Undefined
        );
        assert_eq!(ComponentKind::default(), ComponentKind::Undefined);
    }
}
