mod context;
mod notify;
mod round;

pub use self::context::{DisplayIdentity, SessionContext};
pub use self::notify::{Notification, Notifier, Refresher, Severity};
pub use self::round::RoundInfo;
