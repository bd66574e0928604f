pub use self::hub::{Hub, SubscribeResult};
pub use self::topic::SubscriptionHandle;

#[allow(clippy::module_inception)]
mod hub;
mod topic;
