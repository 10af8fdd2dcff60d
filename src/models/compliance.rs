//! Security-compliance and backup-recovery requests and results.
//!
//! Every optional feature is gated by a boolean in the request and surfaces as
//! an `Option` in the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRequirements {
    /// e.g. "SOC2", "GDPR", "HIPAA"
    pub frameworks: Vec<String>,
    pub auditing: bool,
    pub encryption: bool,
    pub access_control: bool,
    pub threat_detection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub id: Uuid,
    pub retention_days: u32,
    pub immutable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionPolicy {
    pub at_rest: String,
    pub in_transit: String,
    pub key_rotation_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControlPolicy {
    pub model: String,
    pub roles: Vec<String>,
    pub mfa_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatDetection {
    pub id: Uuid,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkAssessment {
    pub framework: String,
    pub compliant: bool,
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub assessments: Vec<FrameworkAssessment>,
    /// 0.0 - 100.0
    pub score: f64,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSetup {
    pub audit: Option<AuditTrail>,
    pub encryption: Option<EncryptionPolicy>,
    pub access_control: Option<AccessControlPolicy>,
    pub threat_detection: Option<ThreatDetection>,
    pub report: ComplianceReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRequirements {
    /// Cron-style backup schedule
    pub schedule: String,
    pub retention_days: u32,
    pub cross_region: bool,
    pub point_in_time: bool,
    pub disaster_recovery: bool,
}

impl Default for BackupRequirements {
    fn default() -> Self {
        Self {
            schedule: "0 2 * * *".to_string(),
            retention_days: 30,
            cross_region: false,
            point_in_time: false,
            disaster_recovery: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSchedule {
    pub id: Uuid,
    pub cron: String,
    pub retention_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationPolicy {
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInTimeRecovery {
    pub window_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterRecoveryPlan {
    pub id: Uuid,
    /// Recovery time objective
    pub rto_minutes: u32,
    /// Recovery point objective
    pub rpo_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSetup {
    pub schedule: BackupSchedule,
    pub replication: Option<ReplicationPolicy>,
    pub point_in_time: Option<PointInTimeRecovery>,
    pub disaster_recovery: Option<DisasterRecoveryPlan>,
}
