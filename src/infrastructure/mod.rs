pub mod session_driver;
pub mod timeline_session;

pub use session_driver::SessionDriver;
pub use timeline_session::TimelineSession;
