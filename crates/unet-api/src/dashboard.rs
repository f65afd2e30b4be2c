// Dashboard read endpoints
//
// The six collections polled by the cockpit on every refresh tick.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Alert, AuditLogEntry, DashboardOverview, Device, Integration};

impl ApiClient {
    /// Plant-wide counters and material flow.
    ///
    /// `GET /api/dashboard/overview`
    pub async fn dashboard_overview(&self) -> Result<DashboardOverview, Error> {
        debug!("fetching dashboard overview");
        self.get_json("dashboard/overview", &[]).await
    }

    /// `GET /api/monitoring/devices`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        debug!("listing devices");
        self.get_json("monitoring/devices", &[]).await
    }

    /// `GET /api/alerts`
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, Error> {
        debug!("listing alerts");
        self.get_json("alerts", &[]).await
    }

    /// `GET /api/audit/logs`
    pub async fn list_audit_logs(&self) -> Result<Vec<AuditLogEntry>, Error> {
        debug!("listing audit logs");
        self.get_json("audit/logs", &[]).await
    }

    /// Upstream system links (ERP, MES, PLC gateways).
    ///
    /// `GET /api/integrations`
    pub async fn list_integrations(&self) -> Result<Vec<Integration>, Error> {
        debug!("listing integrations");
        self.get_json("integrations", &[]).await
    }
}
