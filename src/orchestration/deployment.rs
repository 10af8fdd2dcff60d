//! Full BI platform rollout and strategic insight generation.

use crate::error::{PlatformError, Result};
use crate::events::PlatformEvent;
use crate::logging::log_platform_operation;
use crate::models::insight::{rank_insights, top_recommendations};
use crate::models::StrategicScope;
use crate::orchestration::report_pipeline::impact_counts;
use crate::orchestration::types::{BiPlatformDeployment, DeploymentOptions, StrategicInsights};
use crate::orchestration::PlatformOrchestrator;
use crate::subsystems::{InsightEngine, SubsystemKind};
use tracing::{info, instrument};

const STRATEGIC_RECOMMENDATION_SOURCES: usize = 5;
const MAX_STRATEGIC_RECOMMENDATIONS: usize = 10;

impl PlatformOrchestrator {
    /// Bring the whole platform up for the configured organization.
    ///
    /// Initializes the platform, starts a pipeline for every configured data
    /// source and activates every configured dashboard. An unsuccessful
    /// initialization is turned into [`PlatformError::SubsystemInit`] here,
    /// since nothing else can proceed without it.
    #[instrument(skip(self, options), fields(environment = %self.environment))]
    pub async fn deploy_bi_platform(
        &self,
        options: &DeploymentOptions,
    ) -> Result<BiPlatformDeployment> {
        log_platform_operation("deploy_bi_platform", "started", Some(&self.environment));

        let initialization = self.initialize_platform().await;
        if !initialization.success {
            // The first component missing from the list is the one that failed
            let component = SubsystemKind::INITIALIZATION_ORDER
                .get(initialization.initialized_components.len())
                .map_or("platform", |kind| kind.component_name());
            return Err(PlatformError::SubsystemInit {
                component: component.to_string(),
                reason: initialization.errors.join("; "),
            });
        }

        let data_integration = self.setup_data_integration(&self.config.data_sources).await?;

        let mut dashboards = Vec::with_capacity(self.config.dashboards.len());
        for dashboard in &self.config.dashboards {
            dashboards.push(
                self.automate_real_time_dashboard(&dashboard.id, &options.dashboards)
                    .await?,
            );
        }

        self.emit(PlatformEvent::BiPlatformDeployed {
            environment: self.environment.clone(),
            pipeline_count: data_integration.pipelines.len(),
            dashboard_count: dashboards.len(),
        });
        log_platform_operation("deploy_bi_platform", "completed", Some(&self.environment));
        info!(
            pipelines = data_integration.pipelines.len(),
            dashboards = dashboards.len(),
            "🚀 PLATFORM: BI platform deployed"
        );

        Ok(BiPlatformDeployment {
            environment: self.environment.clone(),
            initialization,
            data_integration,
            dashboards,
        })
    }

    /// Rank strategic insights for the given scope by impact, then confidence
    #[instrument(skip(self, scope), fields(focus_areas = ?scope.focus_areas))]
    pub async fn generate_strategic_insights(
        &self,
        scope: &StrategicScope,
    ) -> Result<StrategicInsights> {
        let generated = self
            .subsystems
            .insight_engine
            .generate_strategic_insights(scope)
            .await?;

        let impact_counts = impact_counts(&generated);
        let recommendations = top_recommendations(
            &generated,
            STRATEGIC_RECOMMENDATION_SOURCES,
            MAX_STRATEGIC_RECOMMENDATIONS,
        );
        let insights: Vec<_> = rank_insights(&generated).into_iter().cloned().collect();

        self.emit(PlatformEvent::StrategicInsightsGenerated {
            insight_count: insights.len(),
        });
        log_platform_operation("generate_strategic_insights", "completed", None);

        Ok(StrategicInsights {
            insights,
            impact_counts,
            recommendations,
        })
    }
}
