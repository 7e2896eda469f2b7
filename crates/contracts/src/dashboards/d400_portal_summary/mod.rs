pub mod dto;

pub use dto::{
    AgentReport, AgentSummary, CustomerSummary, DashboardView, MonthlyRevenue, PortalSummary,
    RecentPayment, RECENT_PAYMENTS,
};
