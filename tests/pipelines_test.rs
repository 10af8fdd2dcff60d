//! Report, dashboard and integration pipelines end to end.

mod common;

use common::{
    acme_config, record_events, FaultyDashboardManager, FlakyAlertingSystem, Faults,
    SilentForecastingEngine, StubInsightEngine,
};
use std::sync::Arc;
use techops_platform::events::names;
use techops_platform::models::{
    BusinessInsight, DashboardOptions, DataSourceConfig, InsightImpact, InsightType, KpiColor,
    ReportParameters, ReportTemplate, SectionContent, SectionKind,
};
use techops_platform::subsystems::in_memory::{
    InMemoryDashboardManager, InMemoryReportGenerator,
};
use techops_platform::{PlatformError, PlatformOrchestrator, PlatformSubsystems};
use tokio_test::assert_ok;

fn recommendations(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("action {i}")).collect()
}

#[tokio::test]
async fn test_report_summary_counts_critical_insights_without_forecast() {
    let config = acme_config().with_report_template(ReportTemplate::new("t1", "Quarterly Review"));
    let insights = vec![
        BusinessInsight::new(InsightType::Risk, "Churn spike", InsightImpact::Critical, 0.9)
            .with_recommendations(recommendations(8)),
        BusinessInsight::new(InsightType::Trend, "Flat signups", InsightImpact::Low, 0.4)
            .with_recommendations(recommendations(8)),
    ];
    let subsystems = PlatformSubsystems::in_memory(&config)
        .with_insight_engine(Arc::new(StubInsightEngine::new(insights)));
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");

    let report = orchestrator
        .generate_enterprise_report("t1", &ReportParameters::new(), &[])
        .await
        .expect("report");

    match &report.section(SectionKind::ExecutiveSummary).expect("summary").content {
        SectionContent::Summary { highlights, .. } => {
            assert!(highlights.contains(&"1 critical insight".to_string()));
            assert!(highlights.contains(&"1 low insight".to_string()));
        }
        other => panic!("unexpected summary content {other:?}"),
    }

    let recommendations = &report
        .section(SectionKind::Recommendations)
        .expect("recommendations")
        .content;
    assert!(recommendations.len() <= 10);
    assert!(report.forecasts.is_empty());
    assert_eq!(report.metadata.insight_count, 2);
    assert!(report.metadata.size_bytes > 0);
}

#[tokio::test]
async fn test_forecasts_present_only_when_requested() {
    let config = acme_config()
        .with_report_template(ReportTemplate::new("plain", "Plain"))
        .with_report_template(ReportTemplate::new("outlook", "Outlook").with_forecast(true));
    let orchestrator = PlatformOrchestrator::new(config).expect("orchestrator");
    let params = ReportParameters::new();

    let plain = orchestrator
        .generate_enterprise_report("plain", &params, &[])
        .await
        .expect("plain");
    let outlook = orchestrator
        .generate_enterprise_report("outlook", &params, &[])
        .await
        .expect("outlook");

    assert!(plain.forecasts.is_empty());
    assert!(!outlook.forecasts.is_empty());
}

#[tokio::test]
async fn test_requested_forecast_that_comes_back_empty_fails_the_report() {
    let config = acme_config()
        .with_report_template(ReportTemplate::new("outlook", "Outlook").with_forecast(true));
    let subsystems = PlatformSubsystems::in_memory(&config)
        .with_forecasting_engine(Arc::new(SilentForecastingEngine));
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");

    let err = orchestrator
        .generate_enterprise_report("outlook", &ReportParameters::new(), &[])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlatformError::PipelineStage { ref stage, .. } if stage == "forecast"
    ));
    assert!(orchestrator
        .events()
        .events_named(names::REPORT_GENERATED)
        .is_empty());
    assert_eq!(orchestrator.platform_status().operations.reports_generated, 0);
}

#[tokio::test]
async fn test_report_is_stored_distributed_and_announced() {
    let config = acme_config().with_report_template(ReportTemplate::new("weekly", "Weekly"));
    let reports = Arc::new(InMemoryReportGenerator::new(&config));
    let subsystems = PlatformSubsystems::in_memory(&config).with_report_generator(reports.clone());
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");
    let events = record_events(&orchestrator);

    let recipients = vec!["cfo@acme.test".to_string(), "coo@acme.test".to_string()];
    let report = orchestrator
        .generate_enterprise_report("weekly", &ReportParameters::new(), &recipients)
        .await
        .expect("report");

    assert_eq!(reports.stored_report(report.id).as_ref(), Some(&report));
    let metrics = assert_ok!(orchestrator.get_platform_metrics().await);
    assert_eq!(metrics.reports.reports_distributed, 1);
    assert_eq!(*events.lock(), vec![names::REPORT_GENERATED.to_string()]);
}

#[tokio::test]
async fn test_unknown_template_is_not_found() {
    let orchestrator = PlatformOrchestrator::new(acme_config()).expect("orchestrator");
    let err = orchestrator
        .generate_enterprise_report("missing", &ReportParameters::new(), &[])
        .await
        .unwrap_err();
    assert_eq!(err, PlatformError::TemplateNotFound("missing".to_string()));
}

#[tokio::test]
async fn test_failed_distribution_emits_no_event() {
    let config = acme_config().with_report_template(ReportTemplate::new("weekly", "Weekly"));
    let orchestrator = PlatformOrchestrator::new(config).expect("orchestrator");

    let err = orchestrator
        .generate_enterprise_report("weekly", &ReportParameters::new(), &[" ".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlatformError::PipelineStage { ref stage, .. } if stage == "distribute"
    ));
    assert!(orchestrator
        .events()
        .events_named(names::REPORT_GENERATED)
        .is_empty());
}

#[tokio::test]
async fn test_dashboard_options_gate_side_effects() {
    let config = acme_config();
    let dashboards = Arc::new(InMemoryDashboardManager::new(&config));
    let alerting = Arc::new(FlakyAlertingSystem::new(Faults::default()));
    let subsystems = PlatformSubsystems::in_memory(&config)
        .with_dashboard_manager(dashboards.clone())
        .with_alerting_system(alerting.clone());
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");

    let options = DashboardOptions {
        alerting: false,
        caching: true,
        sharing: false,
        ..DashboardOptions::default()
    };
    let automated = orchestrator
        .automate_real_time_dashboard("executive", &options)
        .await
        .expect("dashboard");

    assert!(automated.alerts.is_empty());
    assert!(alerting.registered.lock().is_empty());
    assert!(automated.cache.is_some());
    assert!(automated.share.is_none());
    assert_eq!(dashboards.cache_enable_count(), 1);
    assert_eq!(dashboards.share_enable_count(), 0);
}

#[tokio::test]
async fn test_one_alert_per_red_kpi() {
    let config = acme_config();
    let alerting = Arc::new(FlakyAlertingSystem::new(Faults::default()));
    let subsystems = PlatformSubsystems::in_memory(&config).with_alerting_system(alerting.clone());
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");

    let automated = orchestrator
        .automate_real_time_dashboard(
            "executive",
            &DashboardOptions {
                sharing: true,
                ..DashboardOptions::default()
            },
        )
        .await
        .expect("dashboard");

    let red = automated
        .kpis
        .iter()
        .filter(|kpi| kpi.color == KpiColor::Red)
        .count();
    assert_eq!(automated.alerts.len(), red);
    assert_eq!(alerting.registered.lock().len(), red);
    assert!(automated.share.is_some());
    assert_eq!(
        orchestrator.events().events_named(names::DASHBOARD_AUTOMATED).len(),
        1
    );
}

#[tokio::test]
async fn test_failed_activation_withdraws_alerts_and_cache() {
    let config = acme_config();
    let dashboards = Arc::new(FaultyDashboardManager::new(Faults::on_operation()));
    let alerting = Arc::new(FlakyAlertingSystem::new(Faults::default()));
    let subsystems = PlatformSubsystems::in_memory(&config)
        .with_dashboard_manager(dashboards.clone())
        .with_alerting_system(alerting.clone());
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");

    let options = DashboardOptions {
        caching: true,
        sharing: true,
        ..DashboardOptions::default()
    };
    let err = orchestrator
        .automate_real_time_dashboard("executive", &options)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlatformError::PipelineStage { ref stage, .. } if stage == "sharing"
    ));
    assert!(alerting.registered.lock().is_empty());
    assert!(!dashboards.inner.is_cached("executive"));
    assert!(orchestrator
        .events()
        .events_named(names::DASHBOARD_AUTOMATED)
        .is_empty());
}

#[tokio::test]
async fn test_repeated_activation_keeps_one_rule_per_red_kpi() {
    let config = acme_config();
    let alerting = Arc::new(FlakyAlertingSystem::new(Faults::default()));
    let subsystems = PlatformSubsystems::in_memory(&config).with_alerting_system(alerting.clone());
    let orchestrator =
        PlatformOrchestrator::with_subsystems(config, subsystems).expect("orchestrator");

    let first = orchestrator
        .automate_real_time_dashboard("executive", &DashboardOptions::default())
        .await
        .expect("first activation");
    let second = orchestrator
        .automate_real_time_dashboard("executive", &DashboardOptions::default())
        .await
        .expect("second activation");

    assert_eq!(alerting.registered.lock().len(), first.alerts.len());
    let first_ids: Vec<_> = first.alerts.iter().map(|a| a.id).collect();
    let second_ids: Vec<_> = second.alerts.iter().map(|a| a.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn test_empty_integration_still_attaches_monitoring() {
    let orchestrator = PlatformOrchestrator::new(acme_config()).expect("orchestrator");

    let setup = orchestrator
        .setup_data_integration(&[])
        .await
        .expect("integration");

    assert!(setup.pipelines.is_empty());
    assert!(setup.quality_monitoring.pipeline_ids.is_empty());
    assert!(setup.lineage.edges.is_empty());
    assert_eq!(setup.metrics.pipeline_count, 0);
    assert_eq!(
        orchestrator
            .events()
            .events_named(names::DATA_INTEGRATION_SETUP)
            .len(),
        1
    );
}

#[tokio::test]
async fn test_running_pipelines_feed_report_data() {
    let config = acme_config()
        .with_data_source(DataSourceConfig::new("events", "kafka"))
        .with_report_template(ReportTemplate::new("ops", "Operations").with_forecast(true));
    let orchestrator = PlatformOrchestrator::new(config.clone()).expect("orchestrator");

    orchestrator
        .setup_data_integration(&config.data_sources)
        .await
        .expect("integration");
    let report = orchestrator
        .generate_enterprise_report("ops", &ReportParameters::new(), &[])
        .await
        .expect("report");

    assert_eq!(report.metadata.data_points, 100_000 * 60);
    let status = orchestrator.platform_status();
    assert_eq!(status.operations.pipelines_started, 1);
    assert_eq!(status.operations.reports_generated, 1);
}
