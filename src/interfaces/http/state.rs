//! HTTP 层共享状态

use std::sync::Arc;
use crate::services::application::{
    AlertService, AuditService, CampusService, DashboardService, EquipmentService, EventService,
    IncidentService, ScenarioService, SettingsService, TrackingService,
};
use crate::services::auth::SessionService;
use crate::services::infrastructure::{DatabaseHandle, ForgeNotificationService};
use crate::services::traits::NotificationService;
use crate::utils::config::AppConfig;
use crate::utils::error::AppResult;

/// 所有处理函数共享的应用状态，克隆开销很小
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseHandle,
    pub session: Arc<SessionService>,
    pub notifier: Arc<dyn NotificationService>,
    pub campus: CampusService,
    pub equipment: EquipmentService,
    pub tracking: TrackingService,
    pub alerts: AlertService,
    pub incidents: IncidentService,
    pub events: EventService,
    pub dashboard: DashboardService,
    pub audit: AuditService,
    pub settings: SettingsService,
    pub scenarios: ScenarioService,
}

impl AppState {
    /// 使用 Forge 通知服务创建状态
    pub fn new(config: AppConfig, db: DatabaseHandle) -> AppResult<Self> {
        let notifier = Arc::new(ForgeNotificationService::new(config.notification.clone())?);
        Self::with_notifier(config, db, notifier)
    }

    /// 使用指定的通知服务创建状态
    pub fn with_notifier(
        config: AppConfig,
        db: DatabaseHandle,
        notifier: Arc<dyn NotificationService>,
    ) -> AppResult<Self> {
        let session = Arc::new(SessionService::new(config.auth.clone())?);

        Ok(Self {
            config: Arc::new(config),
            session,
            notifier,
            campus: CampusService::new(db.clone()),
            equipment: EquipmentService::new(db.clone()),
            tracking: TrackingService::new(db.clone()),
            alerts: AlertService::new(db.clone()),
            incidents: IncidentService::new(db.clone()),
            events: EventService::new(db.clone()),
            dashboard: DashboardService::new(db.clone()),
            audit: AuditService::new(db.clone()),
            settings: SettingsService::new(db.clone()),
            scenarios: ScenarioService::new(db.clone()),
            db,
        })
    }
}
