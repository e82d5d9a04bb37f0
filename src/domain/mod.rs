// Domain layer - Dashboard data and presentation rules
pub mod cooldown;
pub mod flow;
pub mod telemetry;
pub mod toast;
