use crate::models::{Claims, ServiceError};
use actix_web::http::header;
use actix_web::{dev::ServiceRequest, HttpMessage, HttpRequest};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, error};

pub mod session_storage;

const ADMIN_ROLE: &str = "admin";

// JWT utility functions
pub mod jwt {
    use super::*;

    // Admin tokens are valid for one event day
    const TOKEN_LIFETIME_HOURS: i64 = 8;

    // Generate a new JWT token for the admin
    pub fn generate_admin_token(username: &str, secret: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
            .map_err(|e| {
                error!("❌ Failed to sign admin token: {:?}", e);
                ServiceError::InternalServerError
            })
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized)?;

        if claims.role != ADMIN_ROLE {
            return Err(ServiceError::Unauthorized);
        }
        Ok(claims)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ServiceError::Unauthorized),
        }
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST)
            .map_err(|_| ServiceError::InternalServerError)
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash)
            .map_err(|_| ServiceError::InternalServerError)
    }
}

// Identity attached to requests carrying a valid admin token
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub username: String,
}

// The "is this caller an admin" predicate used by admin-only routes
pub fn require_admin(req: &HttpRequest) -> Result<AdminContext, ServiceError> {
    req.extensions()
        .get::<AdminContext>()
        .cloned()
        .ok_or(ServiceError::Unauthorized)
}

// Decode the bearer token of a request, if any
fn admin_from_request(req: &ServiceRequest, secret: &str) -> Option<AdminContext> {
    let auth_str = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = jwt::extract_token_from_header(auth_str).ok()?;
    match jwt::decode_token(&token, secret) {
        Ok(claims) => Some(AdminContext { username: claims.sub }),
        Err(_) => {
            debug!("Ignoring invalid bearer token on {}", req.path());
            None
        }
    }
}

// Middleware that resolves the admin bearer token. Requests are never rejected
// here; handlers decide with `require_admin`, since some admin routes are public.
pub mod auth_middleware {
    use super::*;
    use actix_web::dev::{forward_ready, Service, ServiceResponse, Transform};
    use actix_web::Error;
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;

    pub struct Authentication {
        secret: String,
    }

    impl Authentication {
        pub fn new(secret: impl Into<String>) -> Self {
            Self { secret: secret.into() }
        }
    }

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware {
                service,
                secret: self.secret.clone(),
            })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
        secret: String,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            if let Some(admin) = admin_from_request(&req, &self.secret) {
                // Add the admin identity to the request extensions
                req.extensions_mut().insert(admin);
            }

            let fut = self.service.call(req);
            Box::pin(async move {
                fut.await
            })
        }
    }
}
