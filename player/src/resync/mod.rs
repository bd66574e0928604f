pub use self::handler::{Disposition, ResyncHandler, TransportAnomaly};
pub use self::listener::ResyncListener;

mod handler;
mod listener;
