use serde::{Deserialize, Serialize};

/// Body for POST /users. Every field is optional at the wire level so that a
/// missing one is reported as a 400 with a body, not as a deserialization
/// rejection. `null` counts as absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub display_name: Option<String>,
    pub login_id: Option<String>,
    pub password: Option<String>,
    pub balance: Option<f64>,
}

impl CreateAccountRequest {
    /// Presence check only. A zero balance is a valid opening balance and
    /// must pass.
    pub fn into_fields(self) -> Option<(String, String, String, f64)> {
        match (self.display_name, self.login_id, self.password, self.balance) {
            (Some(display_name), Some(login_id), Some(password), Some(balance)) => {
                Some((display_name, login_id, password, balance))
            }
            _ => None,
        }
    }
}

/// Body for PUT /users/:id — any subset of the account fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub display_name: Option<String>,
    pub login_id: Option<String>,
    pub password: Option<String>,
    pub balance: Option<f64>,
}

impl UpdateAccountRequest {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.login_id.is_none()
            && self.password.is_none()
            && self.balance.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub data: Vec<super::repo::Account>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: SessionUser,
}

/// Account view returned on a successful login. The stored hash never leaves
/// the service through this type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub display_name: String,
    pub balance: f64,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_zero_balance() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{"displayName":"Bob","loginId":"bob1","password":"pw","balance":0}"#,
        )
        .unwrap();
        let (display_name, login_id, password, balance) = req.into_fields().unwrap();
        assert_eq!(display_name, "Bob");
        assert_eq!(login_id, "bob1");
        assert_eq!(password, "pw");
        assert_eq!(balance, 0.0);
    }

    #[test]
    fn create_request_rejects_each_missing_field() {
        let bodies = [
            r#"{"loginId":"bob1","password":"pw","balance":1}"#,
            r#"{"displayName":"Bob","password":"pw","balance":1}"#,
            r#"{"displayName":"Bob","loginId":"bob1","balance":1}"#,
            r#"{"displayName":"Bob","loginId":"bob1","password":"pw"}"#,
        ];
        for body in bodies {
            let req: CreateAccountRequest = serde_json::from_str(body).unwrap();
            assert!(req.into_fields().is_none(), "accepted {body}");
        }
    }

    #[test]
    fn null_balance_counts_as_absent() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{"displayName":"Bob","loginId":"bob1","password":"pw","balance":null}"#,
        )
        .unwrap();
        assert!(req.into_fields().is_none());
    }

    #[test]
    fn empty_update_reports_empty() {
        let req: UpdateAccountRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());

        let req: UpdateAccountRequest = serde_json::from_str(r#"{"balance":0}"#).unwrap();
        assert!(!req.is_empty());
    }

    #[test]
    fn session_user_serializes_with_camel_case_keys() {
        let user = SessionUser {
            display_name: "Bob".into(),
            balance: 10.0,
            is_admin: false,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["displayName"], "Bob");
        assert_eq!(json["balance"], 10.0);
        assert_eq!(json["isAdmin"], false);
    }
}
