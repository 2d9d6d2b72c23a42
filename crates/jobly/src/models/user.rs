use super::nullable;
use crate::changeset::ValidationErrors;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::password::PasswordHasher;
use crate::row::{FromRow, RowExt};
use crate::sql::{GeneratedQuery, PartialUpdate, PartialUpdateSpec, SqlValue};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Everything except the password hash.
const COLUMNS: &str = "username, first_name, last_name, email, photo_url, is_admin";
const RETURNING: &[&str] = &[
    "username",
    "first_name",
    "last_name",
    "email",
    "photo_url",
    "is_admin",
];

const UPDATE: PartialUpdate = PartialUpdate::new("users", "username").returning(RETURNING);

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            photo_url: row.try_get_column("photo_url")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

struct Credentials {
    user: User,
    hash: String,
}

impl FromRow for Credentials {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            user: User::from_row(row)?,
            hash: row.try_get_column("password")?,
        })
    }
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

// Keep plaintext passwords out of logs.
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("photo_url", &self.photo_url)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl NewUser {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("username", &self.username);
        errors.min_len("password", &self.password, MIN_PASSWORD_LEN);
        errors.require_non_blank("first_name", &self.first_name);
        errors.require_non_blank("last_name", &self.last_name);
        errors.email("email", &self.email);
        if let Some(url) = &self.photo_url {
            errors.url("photo_url", url);
        }
        errors.into_result()
    }
}

#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub photo_url: Option<Option<String>>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("photo_url", &self.photo_url)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl UserPatch {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errors = ValidationErrors::new();
        if let Some(password) = &self.password {
            errors.min_len("password", password, MIN_PASSWORD_LEN);
        }
        if let Some(first_name) = &self.first_name {
            errors.require_non_blank("first_name", first_name);
        }
        if let Some(last_name) = &self.last_name {
            errors.require_non_blank("last_name", last_name);
        }
        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        if let Some(Some(url)) = &self.photo_url {
            errors.url("photo_url", url);
        }
        errors.into_result()
    }

    /// Columns to set. A supplied password is stored as its hash.
    pub async fn to_update_spec(&self, hasher: &PasswordHasher) -> JoblyResult<PartialUpdateSpec> {
        let mut fields = PartialUpdateSpec::new();
        if let Some(password) = &self.password {
            fields.set("password", hasher.hash(password).await?);
        }
        fields
            .set_opt("first_name", self.first_name.clone())
            .set_opt("last_name", self.last_name.clone())
            .set_opt("email", self.email.clone())
            .set_opt("photo_url", self.photo_url.clone())
            .set_opt("is_admin", self.is_admin);
        Ok(fields)
    }
}

impl User {
    /// Every user ordered by username.
    pub async fn all(conn: &impl GenericClient) -> JoblyResult<Vec<Self>> {
        GeneratedQuery::raw(format!("SELECT {COLUMNS} FROM users ORDER BY username"))
            .fetch_all_as(conn)
            .await
    }

    pub async fn get(conn: &impl GenericClient, username: &str) -> JoblyResult<Self> {
        GeneratedQuery::new(
            format!("SELECT {COLUMNS} FROM users WHERE username = $1"),
            vec![SqlValue::from(username)],
        )
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found("User not found"))
    }

    pub async fn create(
        conn: &impl GenericClient,
        hasher: &PasswordHasher,
        new: &NewUser,
    ) -> JoblyResult<Self> {
        new.validate()?;
        let hash = hasher.hash(&new.password).await?;

        GeneratedQuery::new(
            format!(
                "INSERT INTO users (username, password, first_name, last_name, email, photo_url, is_admin) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
            ),
            vec![
                new.username.as_str().into(),
                hash.into(),
                new.first_name.as_str().into(),
                new.last_name.as_str().into(),
                new.email.as_str().into(),
                new.photo_url.clone().into(),
                new.is_admin.into(),
            ],
        )
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::Other("INSERT returned no row".to_string()))
    }

    pub async fn update(
        conn: &impl GenericClient,
        hasher: &PasswordHasher,
        username: &str,
        patch: &UserPatch,
    ) -> JoblyResult<Self> {
        patch.validate()?;
        let fields = patch.to_update_spec(hasher).await?;

        UPDATE
            .build(&fields, username)?
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found("User does not exist"))
    }

    pub async fn delete(conn: &impl GenericClient, username: &str) -> JoblyResult<()> {
        let deleted = GeneratedQuery::new(
            "DELETE FROM users WHERE username = $1",
            vec![SqlValue::from(username)],
        )
        .execute(conn)
        .await?;

        if deleted == 0 {
            return Err(JoblyError::not_found("User does not exist"));
        }
        Ok(())
    }

    /// Check a username/password pair.
    ///
    /// An unknown user and a wrong password both fail with
    /// [`JoblyError::Unauthorized`].
    pub async fn authenticate(
        conn: &impl GenericClient,
        hasher: &PasswordHasher,
        username: &str,
        password: &str,
    ) -> JoblyResult<Self> {
        let found: Option<Credentials> = GeneratedQuery::new(
            format!("SELECT {COLUMNS}, password FROM users WHERE username = $1"),
            vec![SqlValue::from(username)],
        )
        .fetch_opt_as(conn)
        .await?;

        let Some(creds) = found else {
            return Err(JoblyError::Unauthorized);
        };
        if hasher.verify(password, &creds.hash).await? {
            Ok(creds.user)
        } else {
            Err(JoblyError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordHasher::MIN_COST)
    }

    #[tokio::test]
    async fn password_is_hashed_in_update() {
        let patch = UserPatch {
            password: Some("new-password".into()),
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        let fields = patch.to_update_spec(&hasher()).await.unwrap();
        assert_eq!(fields.columns().collect::<Vec<_>>(), ["password", "first_name"]);

        let stored = fields.get("password").and_then(SqlValue::as_str).unwrap();
        assert_ne!(stored, "new-password");
        assert!(hasher().verify("new-password", stored).await.unwrap());
    }

    #[tokio::test]
    async fn update_never_returns_the_password() {
        let patch = UserPatch {
            is_admin: Some(true),
            ..Default::default()
        };
        let fields = patch.to_update_spec(&hasher()).await.unwrap();
        let q = UPDATE.build(&fields, "u1").unwrap();
        assert_eq!(
            q.sql(),
            "UPDATE users SET is_admin = $1 WHERE username = $2 \
             RETURNING username, first_name, last_name, email, photo_url, is_admin"
        );
        assert_eq!(q.values(), &[SqlValue::Bool(true), SqlValue::from("u1")]);
    }

    #[test]
    fn username_is_not_patchable() {
        let res: Result<UserPatch, _> = serde_json::from_str(r#"{"username": "other"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn new_user_validation() {
        let new: NewUser = serde_json::from_str(
            r#"{"username": "u1", "password": "short", "first_name": "U",
                "last_name": "One", "email": "not-an-email"}"#,
        )
        .unwrap();
        assert!(!new.is_admin);

        let Err(JoblyError::Invalid(errors)) = new.validate() else {
            panic!("expected validation errors");
        };
        assert!(errors.has("password"));
        assert!(errors.has("email"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn debug_output_hides_passwords() {
        let patch = UserPatch {
            password: Some("secret-value".into()),
            ..Default::default()
        };
        assert!(!format!("{patch:?}").contains("secret-value"));
    }
}
