use tower_cookies::{Cookie, Cookies};

use crate::{
    models::Employee,
    state::AppState,
    utils::{create_token, verify_token},
};

pub const SESSION_COOKIE: &str = "employee";
/// Plain copies of common fields for scripts in the pages. Written together
/// with the session cookie, never read back by the server.
pub const NAME_COOKIE: &str = "userName";
pub const ROLE_COOKIE: &str = "userRole";
pub const ID_COOKIE: &str = "userId";

const SESSION_DAYS: i64 = 400;

/// Session storage over signed cookies.
pub struct SessionStore<'a> {
    cookies: &'a Cookies,
    secret: &'a str,
}

impl<'a> SessionStore<'a> {
    pub fn new(cookies: &'a Cookies, secret: &'a str) -> Self {
        Self { cookies, secret }
    }

    /// The stored employee. A missing, tampered or unreadable cookie means
    /// "no session".
    pub fn get(&self) -> Option<Employee> {
        let token = self.cookies.get(SESSION_COOKIE)?.value().to_string();
        match verify_token(&token, self.secret) {
            Ok(claims) => Some(claims.employee),
            Err(e) => {
                log::debug!("ignoring unreadable session cookie: {}", e);
                None
            }
        }
    }

    pub fn set(&self, employee: &Employee) -> Result<(), jsonwebtoken::errors::Error> {
        let token = create_token(employee, self.secret)?;

        self.cookies.add(persistent(SESSION_COOKIE, token, true));

        let name = if employee.name.is_empty() { "Employee" } else { employee.name.as_str() };
        let role = employee.role.as_str();
        let role = if role.is_empty() { "guest" } else { role };
        self.cookies.add(persistent(NAME_COOKIE, urlencoding::encode(name).into_owned(), false));
        self.cookies.add(persistent(ROLE_COOKIE, role.to_string(), false));
        self.cookies.add(persistent(ID_COOKIE, employee.id.clone(), false));
        Ok(())
    }

    pub fn clear(&self) {
        for name in [SESSION_COOKIE, NAME_COOKIE, ROLE_COOKIE, ID_COOKIE] {
            self.cookies.remove(Cookie::build(name).path("/").build());
        }
    }
}

fn persistent(name: &'static str, value: String, http_only: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

pub fn get_current_employee(cookies: &Cookies, state: &AppState) -> Option<Employee> {
    SessionStore::new(cookies, &state.config.jwt_secret).get()
}
