// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{User, UserId};
use crate::error::Error;
use diesel::prelude::OptionalExtension as _;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Key pair for signing and checking bearer tokens, both derived from one
/// shared secret.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: i32,
    username: String,
    email: String,
    exp: i64,
}

/// The authenticated user a validated credential stands for. Holding one is
/// the precondition for every write operation.
#[derive(Debug, Clone)]
pub struct IdentityClaim {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub diet: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

pub fn register(
    conn: &mut database::Connection,
    registration: &Registration,
) -> Result<RegisterResponse, Error> {
    for (value, field) in [
        (&registration.username, "username"),
        (&registration.email, "email"),
        (&registration.password, "password"),
        (&registration.diet, "diet"),
    ] {
        if value.trim().is_empty() {
            return Err(Error::validation(format!("{field} is required")));
        }
    }

    let hashed = bcrypt::hash(&registration.password, bcrypt::DEFAULT_COST)?;

    {
        use database::schema::users::dsl::*;
        diesel::insert_into(users)
            .values((
                username.eq(&registration.username),
                email.eq(&registration.email),
                password_hash.eq(&hashed),
                diet.eq(&registration.diet),
                created_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::validation("a user with this username or email already exists")
                }
                other => Error::Persistence(other),
            })?;
    }

    let new_id = UserId::from(database::last_insert_id(conn)?);
    log::info!("registered user {} ({new_id})", registration.username);
    Ok(RegisterResponse {
        message: "User added successfully!".into(),
        user_id: new_id,
    })
}

pub fn login(
    conn: &mut database::Connection,
    keys: &AuthKeys,
    login_username: &str,
    password: &str,
) -> Result<LoginResponse, Error> {
    if login_username.trim().is_empty() || password.is_empty() {
        return Err(Error::validation("username and password are required"));
    }

    let rejected = || Error::Unauthenticated("invalid username or password".into());

    let user: User = {
        use database::schema::users::dsl::*;
        users
            .select(User::as_select())
            .filter(username.eq(login_username))
            .get_result(conn)
            .optional()?
            .ok_or_else(rejected)?
    };

    if !bcrypt::verify(password, &user.password_hash)? {
        log::warn!("failed login attempt for {login_username}");
        return Err(rejected());
    }

    let claims = Claims {
        user_id: user.id.into(),
        username: user.username,
        email: user.email,
        exp: chrono::Utc::now().timestamp() + TOKEN_TTL_SECONDS,
    };
    let token = jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)?;
    Ok(LoginResponse {
        success: true,
        token,
    })
}

/// Validates a bearer credential and returns the identity it stands for.
/// Accepts either a bare token or a full `Bearer <token>` header value.
pub fn authenticate(keys: &AuthKeys, credential: &str) -> Result<IdentityClaim, Error> {
    let token = credential.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    if token.is_empty() {
        return Err(Error::Unauthenticated("no credential provided".into()));
    }

    let decoded = jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(IdentityClaim {
        user_id: decoded.claims.user_id.into(),
        username: decoded.claims.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Classification;
    use diesel::QueryDsl as _;
    use diesel::RunQueryDsl as _;
    use diesel::SelectableHelper as _;

    fn test_keys() -> AuthKeys {
        AuthKeys::new("test-secret")
    }

    fn sample_registration() -> Registration {
        Registration {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "hunter2".into(),
            diet: "Veg".into(),
        }
    }

    #[test]
    fn register_login_authenticate_round_trip() {
        let mut conn = database::connection_for_testing();
        let keys = test_keys();

        let registered = register(&mut conn, &sample_registration()).unwrap();

        let stored: User = {
            use database::schema::users::dsl::*;
            users
                .select(User::as_select())
                .get_result(&mut conn)
                .unwrap()
        };
        assert_eq!(stored.id, registered.user_id);
        assert_eq!(stored.diet, "Veg");
        assert_ne!(stored.password_hash, "hunter2");
        assert!(stored.created_at <= chrono::Utc::now().naive_utc());

        let login_response = login(&mut conn, &keys, "alice", "hunter2").unwrap();
        assert!(login_response.success);

        let claim = authenticate(&keys, &login_response.token).unwrap();
        assert_eq!(claim.user_id, registered.user_id);
        assert_eq!(claim.username, "alice");
    }

    #[test]
    fn bearer_prefix_is_accepted() {
        let mut conn = database::connection_for_testing();
        let keys = test_keys();

        register(&mut conn, &sample_registration()).unwrap();
        let token = login(&mut conn, &keys, "alice", "hunter2").unwrap().token;

        let claim = authenticate(&keys, &format!("Bearer {token}")).unwrap();
        assert_eq!(claim.username, "alice");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let mut conn = database::connection_for_testing();
        let keys = test_keys();

        register(&mut conn, &sample_registration()).unwrap();

        let err = login(&mut conn, &keys, "alice", "letmein").unwrap_err();
        assert_eq!(err.classification(), Classification::Auth);
        let err = login(&mut conn, &keys, "nobody", "hunter2").unwrap_err();
        assert_eq!(err.classification(), Classification::Auth);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut conn = database::connection_for_testing();

        register(&mut conn, &sample_registration()).unwrap();
        let err = register(&mut conn, &sample_registration()).unwrap_err();
        assert_eq!(err.classification(), Classification::Validation);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut conn = database::connection_for_testing();

        let mut registration = sample_registration();
        registration.diet = "  ".into();
        let err = register(&mut conn, &registration).unwrap_err();
        assert_eq!(err.classification(), Classification::Validation);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = test_keys();

        let err = authenticate(&keys, "not-a-token").unwrap_err();
        assert_eq!(err.classification(), Classification::Auth);

        let err = authenticate(&keys, "").unwrap_err();
        assert_eq!(err.classification(), Classification::Auth);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = test_keys();

        let stale = Claims {
            user_id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            exp: chrono::Utc::now().timestamp() - 2 * TOKEN_TTL_SECONDS,
        };
        let token = jsonwebtoken::encode(&Header::default(), &stale, &keys.encoding).unwrap();

        let err = authenticate(&keys, &token).unwrap_err();
        assert_eq!(err.classification(), Classification::Auth);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let mut conn = database::connection_for_testing();
        let keys = test_keys();

        register(&mut conn, &sample_registration()).unwrap();
        let token = login(&mut conn, &keys, "alice", "hunter2").unwrap().token;

        let err = authenticate(&AuthKeys::new("other-secret"), &token).unwrap_err();
        assert_eq!(err.classification(), Classification::Auth);
    }
}
