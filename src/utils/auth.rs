use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::Employee;

/// Session token payload. Sessions do not expire; there is no `exp` claim.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // employee id
    pub iat: i64,
    pub employee: Employee,
}

impl Claims {
    pub fn new(employee: &Employee) -> Self {
        Self {
            sub: employee.id.clone(),
            iat: Utc::now().timestamp(),
            employee: employee.clone(),
        }
    }
}

pub fn create_token(employee: &Employee, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        &Claims::new(employee),
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn employee() -> Employee {
        Employee {
            id: "e1".to_string(),
            name: "Asha".to_string(),
            role: Role::Operator,
            mobile: Some("9876543210".to_string()),
            eid: Some("EMP-7".to_string()),
            photo_url: None,
        }
    }

    #[test]
    fn token_round_trips_the_employee() {
        let token = create_token(&employee(), "secret").unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "e1");
        assert_eq!(claims.employee, employee());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(&employee(), "secret").unwrap();
        assert!(verify_token(&token, "other").is_err());
    }
}
