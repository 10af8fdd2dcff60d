//! Security compliance and backup/recovery automation.
//!
//! Both operations are linear: each optional feature runs only when its flag
//! is set and shows up as `None` otherwise. The first failure aborts.

use crate::error::Result;
use crate::events::PlatformEvent;
use crate::logging::log_platform_operation;
use crate::models::{BackupRequirements, BackupSetup, ComplianceRequirements, ComplianceSetup};
use crate::orchestration::PlatformOrchestrator;
use crate::subsystems::{BackupManager, SecurityManager};
use tracing::{info, instrument};

impl PlatformOrchestrator {
    #[instrument(skip(self, requirements), fields(frameworks = ?requirements.frameworks))]
    pub async fn automate_security_compliance(
        &self,
        requirements: &ComplianceRequirements,
    ) -> Result<ComplianceSetup> {
        log_platform_operation("automate_security_compliance", "started", None);
        let security = &self.subsystems.security_manager;

        let audit = if requirements.auditing {
            Some(security.enable_audit_trail().await?)
        } else {
            None
        };
        let encryption = if requirements.encryption {
            Some(security.configure_encryption().await?)
        } else {
            None
        };
        let access_control = if requirements.access_control {
            Some(security.configure_access_control().await?)
        } else {
            None
        };
        let threat_detection = if requirements.threat_detection {
            Some(security.enable_threat_detection().await?)
        } else {
            None
        };

        let report = security.assess_compliance(&requirements.frameworks).await?;

        self.emit(PlatformEvent::SecurityComplianceAutomated {
            frameworks: requirements.frameworks.clone(),
            auditing: audit.is_some(),
            encryption: encryption.is_some(),
            access_control: access_control.is_some(),
            threat_detection: threat_detection.is_some(),
        });
        log_platform_operation("automate_security_compliance", "completed", None);
        info!(score = report.score, "🔐 COMPLIANCE: Controls applied");

        Ok(ComplianceSetup {
            audit,
            encryption,
            access_control,
            threat_detection,
            report,
        })
    }

    #[instrument(skip(self, requirements), fields(schedule = %requirements.schedule))]
    pub async fn setup_backup_recovery(
        &self,
        requirements: &BackupRequirements,
    ) -> Result<BackupSetup> {
        log_platform_operation("setup_backup_recovery", "started", None);
        let backups = &self.subsystems.backup_manager;

        let schedule = backups.create_backup_schedule(requirements).await?;
        let replication = if requirements.cross_region {
            Some(backups.configure_replication().await?)
        } else {
            None
        };
        let point_in_time = if requirements.point_in_time {
            Some(backups.enable_point_in_time_recovery().await?)
        } else {
            None
        };
        let disaster_recovery = if requirements.disaster_recovery {
            Some(backups.create_disaster_recovery_plan().await?)
        } else {
            None
        };

        self.emit(PlatformEvent::BackupRecoverySetup {
            cross_region: replication.is_some(),
            point_in_time: point_in_time.is_some(),
            disaster_recovery: disaster_recovery.is_some(),
        });
        log_platform_operation("setup_backup_recovery", "completed", None);

        Ok(BackupSetup {
            schedule,
            replication,
            point_in_time,
            disaster_recovery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;

    fn orchestrator() -> PlatformOrchestrator {
        PlatformOrchestrator::new(PlatformConfig::for_organization("Acme")).expect("new")
    }

    #[tokio::test]
    async fn test_disabled_features_are_none() {
        let setup = orchestrator()
            .automate_security_compliance(&ComplianceRequirements {
                frameworks: vec!["GDPR".to_string()],
                auditing: true,
                encryption: true,
                ..ComplianceRequirements::default()
            })
            .await
            .expect("compliance");

        assert!(setup.audit.is_some());
        assert!(setup.encryption.is_some());
        assert!(setup.access_control.is_none());
        assert!(setup.threat_detection.is_none());
        assert_eq!(setup.report.score, 100.0);
    }

    #[tokio::test]
    async fn test_backup_flags_gate_each_step() {
        let setup = orchestrator()
            .setup_backup_recovery(&BackupRequirements {
                cross_region: true,
                disaster_recovery: true,
                ..BackupRequirements::default()
            })
            .await
            .expect("backup");

        assert!(setup.replication.is_some());
        assert!(setup.point_in_time.is_none());
        assert_eq!(
            setup.disaster_recovery.map(|plan| plan.rto_minutes),
            Some(60)
        );
    }

    #[tokio::test]
    async fn test_invalid_schedule_aborts_before_optional_steps() {
        let orchestrator = orchestrator();
        let result = orchestrator
            .setup_backup_recovery(&BackupRequirements {
                schedule: "@hourly".to_string(),
                cross_region: true,
                ..BackupRequirements::default()
            })
            .await;

        assert!(result.is_err());
        assert!(orchestrator
            .events()
            .events_named(crate::events::names::BACKUP_RECOVERY_SETUP)
            .is_empty());
    }
}
