//! Hand-off between the evaluation loop and the presentation layer

pub mod dispatcher;
pub mod sink;

pub use dispatcher::{AlertDispatcher, DispatcherHandle};
pub use sink::{AlertSink, ConfirmationLog, LoggingAlertSink, LoggingConfirmationLog, WebhookAlertSink};
