pub mod connection;
pub mod headless;
pub mod login;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;
pub use login::login_to_twitter;
