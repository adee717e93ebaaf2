use serde::{Deserialize, Serialize};

use super::Fixture;

/// Every user's email is `{username}@{EMAIL_DOMAIN}`.
pub const EMAIL_DOMAIN: &str = "example.com";

/// A service account.
///
/// The email is derived from the username on every access, so the two can
/// never drift apart. On the wire it is an ordinary field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "UserRecord", try_from = "UserRecord")]
pub struct User {
    pub id: i64,
    username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub phone: String,
    pub user_status: i64,
}

impl User {
    #[must_use]
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            phone: String::new(),
            user_status: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, user_status: i64) -> Self {
        self.user_status = user_status;
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> String {
        format!("{}@{EMAIL_DOMAIN}", self.username)
    }
}

impl Fixture for User {
    const KIND: &'static str = "user";

    fn validate(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err(format!("id must be positive, got {}", self.id));
        }
        if self.username.is_empty() {
            return Err("username is empty".into());
        }
        if self
            .username
            .chars()
            .any(|c| c.is_whitespace() || c == '@' || c == '/')
        {
            return Err(format!("username {:?} is not path-safe", self.username));
        }
        if self.password.is_empty() {
            return Err("password is empty".into());
        }
        Ok(())
    }
}

/// Stored email does not match the username it should be derived from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("email {email:?} is not derived from username {username:?}")]
pub struct DerivedEmailMismatch {
    pub username: String,
    pub email: String,
}

/// Wire shape: `id, username, firstName, lastName, email, password, phone, userStatus`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    phone: String,
    user_status: i64,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        let email = user.email();
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email,
            password: user.password,
            phone: user.phone,
            user_status: user.user_status,
        }
    }
}

impl TryFrom<UserRecord> for User {
    type Error = DerivedEmailMismatch;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let user = Self {
            id: record.id,
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            password: record.password,
            phone: record.phone,
            user_status: record.user_status,
        };
        if user.email() != record.email {
            return Err(DerivedEmailMismatch {
                username: user.username,
                email: record.email,
            });
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(20_001, "user_1a2b3c4d")
            .with_name("Alice", "Smith")
            .with_password("Secret1234")
            .with_phone("+10000000042")
            .with_status(1)
    }

    #[test]
    fn email_follows_username() {
        assert_eq!(user().email(), "user_1a2b3c4d@example.com");
    }

    #[test]
    fn serializes_camel_case_with_email() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["lastName"], "Smith");
        assert_eq!(json["userStatus"], 1);
        assert_eq!(json["email"], "user_1a2b3c4d@example.com");
    }

    #[test]
    fn deserialize_rejects_foreign_email() {
        let raw = r#"{"id":1,"username":"bob","firstName":"Bob","lastName":"Brown",
            "email":"someone@else.org","password":"pw","phone":"1","userStatus":0}"#;
        let err = serde_json::from_str::<User>(raw).unwrap_err();
        assert!(err.to_string().contains("not derived from username"));
    }

    #[test]
    fn username_with_slash_rejected() {
        let u = User::new(5, "a/b").with_password("x");
        assert!(u.validate().unwrap_err().contains("path-safe"));
    }

    #[test]
    fn empty_password_rejected() {
        let u = User::new(5, "ab");
        assert_eq!(u.validate(), Err("password is empty".to_string()));
    }
}
