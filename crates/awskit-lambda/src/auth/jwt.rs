/// JWT validation using JWKS
use super::{AuthorizationOutcome, Authorizer};
use async_trait::async_trait;
use awskit_core::AwsKitError;
use http::StatusCode;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const ERROR_CODE_INVALID_TOKEN: &str = "InvalidToken";
pub const ERROR_CODE_MISSING_TOKEN: &str = "MissingToken";

/// Registered claims the authorizer reads; everything else is ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub iss: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// JWKS Key structure
#[derive(Debug, Deserialize)]
pub struct JwksKey {
    pub kty: String,
    pub kid: String,
    #[serde(default)]
    pub n: String,
    #[serde(default)]
    pub e: String,
}

/// JWKS structure
#[derive(Debug, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JwksKey>,
}

/// RS256 token authorizer
pub struct JwtAuthorizer {
    /// JWKS keys mapped by kid
    keys: HashMap<String, DecodingKey>,
    issuer: Option<String>,
}

impl JwtAuthorizer {
    /// Create an authorizer from JWKS JSON; non-RSA keys are skipped
    pub fn new(jwks_json: &str) -> Result<Self, AwsKitError> {
        let jwks: Jwks = serde_json::from_str(jwks_json)
            .map_err(|e| AwsKitError::Config(format!("Invalid JWKS JSON: {}", e)))?;

        let mut keys = HashMap::new();

        for key in jwks.keys {
            if key.kty == "RSA" {
                let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|e| {
                    AwsKitError::Config(format!("Failed to create decoding key {}: {}", key.kid, e))
                })?;

                keys.insert(key.kid, decoding_key);
            }
        }

        if keys.is_empty() {
            return Err(AwsKitError::Config(
                "No valid RSA keys found in JWKS".to_string(),
            ));
        }

        Ok(Self { keys, issuer: None })
    }

    /// Tokens must carry this `iss` claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Validate a JWT token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims, String> {
        let header =
            decode_header(token).map_err(|e| format!("Failed to decode JWT header: {}", e))?;

        let kid = header
            .kid
            .ok_or_else(|| "JWT header missing 'kid' field".to_string())?;

        let decoding_key = self
            .keys
            .get(&kid)
            .ok_or_else(|| format!("No JWKS key found for kid: {}", kid))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        let token_data = decode::<Claims>(token, decoding_key, &validation)
            .map_err(|e| format!("Failed to validate JWT: {}", e))?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl Authorizer for JwtAuthorizer {
    async fn authorize(&self, token: &str) -> AuthorizationOutcome {
        if token.is_empty() {
            return AuthorizationOutcome::denied(
                StatusCode::UNAUTHORIZED,
                ERROR_CODE_MISSING_TOKEN,
                "Missing bearer token",
            );
        }

        match self.validate(token) {
            Ok(claims) => {
                debug!(subject = ?claims.sub, "Token accepted");
                AuthorizationOutcome::ok()
            }
            Err(reason) => {
                warn!(reason = %reason, "Token rejected");
                AuthorizationOutcome::denied(
                    StatusCode::UNAUTHORIZED,
                    ERROR_CODE_INVALID_TOKEN,
                    reason,
                )
            }
        }
    }
}
