// Application layer - Reactive controllers over the backend clients
pub mod calendar;
pub mod cooldown_service;
pub mod flow_service;
pub mod history_service;
pub mod notification_service;
pub mod observable;
pub mod request_gate;
pub mod scheduler;
pub mod telemetry_client;

#[cfg(test)]
pub mod testing;
