pub mod notifier;

pub use notifier::{Notification, Notifier, Severity};
