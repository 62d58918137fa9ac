pub mod session;

pub use session::{get_current_employee, SessionStore};
